use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{OutputFormat, Store};
use crate::services::NewAccount;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an account with its three floors")]
    Register {
        #[arg(help = "Email address")]
        email: String,

        #[arg(help = "First name")]
        first_name: String,

        #[arg(long, help = "Password (at least 7 characters)")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, store: &Store, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Register {
            email,
            first_name,
            password,
        } => {
            let account = NewAccount {
                email,
                first_name,
                confirm_password: password.clone(),
                password,
            };
            let user = store.accounts().create_account(&account).await?;

            output_success(
                &output_format,
                &format!("Account created for {} (id {})", user.email, user.id),
                Some(json!({ "user": user })),
            )
        }
    }
}
