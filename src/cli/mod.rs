pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::auth::SessionKeys;
use crate::config::AppConfig;
use crate::database::{apply_migrations, Database};
use crate::services::{AccountService, RoomService};

#[derive(Parser)]
#[command(name = "smarthome")]
#[command(about = "SmartHome CLI - manage accounts and rooms directly in the store")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Database URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Schema management")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },

    #[command(about = "Account management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Rooms and their devices")]
    Room {
        #[command(subcommand)]
        cmd: commands::room::RoomCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Open store shared by every subcommand.
pub struct Store {
    pub db: Database,
    pub applied_migrations: usize,
    keys: SessionKeys,
}

impl Store {
    /// Connect with the environment's config, honour `--database-url`, and
    /// bring the schema up to date.
    pub async fn open(database_url: Option<String>) -> anyhow::Result<Self> {
        let mut config = AppConfig::from_env();
        if let Some(url) = database_url {
            config.database.url = url;
        }
        debug!(url = %config.database.url, "Opening store");

        // The CLI never issues session tokens, so a missing secret only needs
        // a throwaway stand-in.
        if config.security.session_secret.is_empty() {
            config.security.session_secret = Uuid::new_v4().to_string();
        }
        let keys = SessionKeys::from_config(&config.security)?;

        let db = Database::connect(&config.database).await?;
        let applied_migrations = apply_migrations(db.pool()).await?;

        Ok(Self {
            db,
            applied_migrations,
            keys,
        })
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.db.pool().clone(), self.keys.clone())
    }

    pub fn rooms(&self) -> RoomService {
        RoomService::new(self.db.pool().clone())
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let store = Store::open(cli.database_url).await?;

    let result = match cli.command {
        Commands::Db { cmd } => commands::db::handle(cmd, &store, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, &store, output_format).await,
        Commands::Room { cmd } => commands::room::handle(cmd, &store, output_format).await,
    };

    store.db.close().await;
    result
}
