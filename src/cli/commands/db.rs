use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{OutputFormat, Store};
use crate::database::migrations::current_version;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations")]
    Migrate,
}

pub async fn handle(cmd: DbCommands, store: &Store, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        // Store::open has already migrated; report what it did
        DbCommands::Migrate => {
            let version = current_version(store.db.pool()).await?;
            let message = match store.applied_migrations {
                0 => format!("Schema already at version {}", version),
                n => format!("Applied {} migration(s), schema at version {}", n, version),
            };
            output_success(
                &output_format,
                &message,
                Some(json!({ "applied": store.applied_migrations, "version": version })),
            )
        }
    }
}
