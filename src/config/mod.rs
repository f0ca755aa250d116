use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub automation: AutomationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub session_expiry_hours: u64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Command line run by `GET /start`. Unset disables the hook.
    pub hook_command: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("SMARTHOME_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours = v.parse().unwrap_or(self.security.session_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_NAME") {
            if !v.trim().is_empty() {
                self.security.cookie_name = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }

        // Automation overrides
        if let Ok(v) = env::var("AUTOMATION_HOOK_COMMAND") {
            let v = v.trim();
            self.automation.hook_command = (!v.is_empty()).then(|| v.to_string());
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite://smart_home.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                session_secret: "development-only-session-secret".to_string(),
                session_expiry_hours: 24 * 7, // 1 week
                cookie_name: "smarthome_session".to_string(),
                cookie_secure: false,
            },
            automation: AutomationConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: "sqlite://smart_home.db".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_expiry_hours: 24,
                cookie_name: "smarthome_session".to_string(),
                cookie_secure: true,
            },
            automation: AutomationConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "sqlite://smart_home.db".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_expiry_hours: 12,
                cookie_name: "smarthome_session".to_string(),
                cookie_secure: true,
            },
            automation: AutomationConfig::default(),
        }
    }

    /// Staging and production carry no built-in secret; startup refuses to run
    /// until `SECURITY_SESSION_SECRET` is set.
    pub fn validate(&self) -> Result<(), String> {
        if self.security.session_secret.is_empty() {
            return Err(format!(
                "SECURITY_SESSION_SECRET must be set in {:?} mode",
                self.environment
            ));
        }
        if self.security.session_expiry_hours == 0 {
            return Err("SECURITY_SESSION_EXPIRY_HOURS must be greater than zero".to_string());
        }
        Ok(())
    }
}
