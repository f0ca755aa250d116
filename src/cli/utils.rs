use serde_json::{json, Value};

use crate::cli::{OutputFormat, Store};
use crate::database::models::{FloorSlot, User};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Look up an account by email or fail with a readable message
pub async fn require_user(store: &Store, email: &str) -> anyhow::Result<User> {
    store
        .accounts()
        .find_by_email(email)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No account with email '{}'", email.trim()))
}

/// Parse a floor argument: `2` or `Floor 2`
pub fn parse_floor(arg: &str) -> Result<FloorSlot, String> {
    let trimmed = arg.trim();
    let digits = trimmed
        .strip_prefix("Floor")
        .or_else(|| trimmed.strip_prefix("floor"))
        .unwrap_or(trimmed)
        .trim();

    digits
        .parse::<u8>()
        .ok()
        .and_then(FloorSlot::from_number)
        .ok_or_else(|| format!("'{}' is not a floor (expected 1, 2 or 3)", arg))
}
