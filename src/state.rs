use std::sync::Arc;

use crate::auth::{SessionKeys, TokenError};
use crate::config::AppConfig;
use crate::database::Database;
use crate::services::{AccountService, AutomationHook, RoomService};

/// Everything a request handler needs, built once at startup and cloned into
/// each request by axum.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub keys: SessionKeys,
    pub hook: AutomationHook,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Result<Self, TokenError> {
        let keys = SessionKeys::from_config(&config.security)?;
        let hook = AutomationHook::from_config(&config.automation);
        Ok(Self {
            config: Arc::new(config),
            db,
            keys,
            hook,
        })
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.db.pool().clone(), self.keys.clone())
    }

    pub fn rooms(&self) -> RoomService {
        RoomService::new(self.db.pool().clone())
    }
}
