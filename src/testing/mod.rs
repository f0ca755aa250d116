use crate::auth::SessionKeys;
use crate::config::AppConfig;
use crate::database::{apply_migrations, Database};
use crate::services::{AccountService, NewAccount, RoomService, SignedIn};

/// Migrated in-memory store plus service constructors for unit tests
pub struct TestContext {
    pub db: Database,
    keys: SessionKeys,
}

impl TestContext {
    pub const PASSWORD: &'static str = "correct-horse";

    pub async fn new() -> Self {
        let db = Database::connect_in_memory().await.expect("in-memory database");
        apply_migrations(db.pool()).await.expect("migrations");
        let keys = SessionKeys::from_config(&AppConfig::development().security).expect("session keys");
        Self { db, keys }
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.db.pool().clone(), self.keys.clone())
    }

    pub fn rooms(&self) -> RoomService {
        RoomService::new(self.db.pool().clone())
    }

    /// Register `email` with [`Self::PASSWORD`]
    pub async fn register(&self, email: &str) -> SignedIn {
        let account = NewAccount {
            email: email.to_string(),
            first_name: "Test".to_string(),
            password: Self::PASSWORD.to_string(),
            confirm_password: Self::PASSWORD.to_string(),
        };
        self.accounts().register(&account).await.expect("registration")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(self.db.pool())
            .await
            .expect("count query")
    }
}
