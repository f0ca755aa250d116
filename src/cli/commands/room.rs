use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_empty_collection, output_success, parse_floor, require_user};
use crate::cli::{OutputFormat, Store};
use crate::database::models::FloorSlot;

#[derive(Subcommand)]
pub enum RoomCommands {
    #[command(about = "List rooms on a floor")]
    List {
        #[arg(help = "Owner email")]
        email: String,

        #[arg(help = "Floor (1, 2 or 3)", value_parser = parse_floor)]
        floor: FloorSlot,
    },

    #[command(about = "Create a room with its devices")]
    Create {
        #[arg(help = "Owner email")]
        email: String,

        #[arg(help = "Floor (1, 2 or 3)", value_parser = parse_floor)]
        floor: FloorSlot,

        #[arg(help = "Room type, e.g. Kitchen")]
        type_of_room: String,

        #[arg(help = "Device names")]
        devices: Vec<String>,
    },

    #[command(about = "Delete a room and its devices")]
    Delete {
        #[arg(help = "Owner email")]
        email: String,

        #[arg(help = "Room id")]
        room_id: i64,
    },
}

pub async fn handle(cmd: RoomCommands, store: &Store, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RoomCommands::List { email, floor } => {
            let user = require_user(store, &email).await?;
            let rooms = store.rooms().list_rooms(&user, floor.label()).await?;

            if rooms.is_empty() {
                return output_empty_collection(&output_format, "rooms", &format!("No rooms on {}", floor.label()));
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "rooms": rooms }))?);
                }
                OutputFormat::Text => {
                    println!("{:<8} {:<20} {}", "ROOM", "TYPE", "DEVICES");
                    println!("{}", "-".repeat(60));
                    for detail in &rooms {
                        println!(
                            "{:<8} {:<20} {}",
                            detail.room.room_id, detail.room.type_of_room, detail.device_names
                        );
                    }
                }
            }
            Ok(())
        }
        RoomCommands::Create {
            email,
            floor,
            type_of_room,
            devices,
        } => {
            let user = require_user(store, &email).await?;
            let detail = store
                .rooms()
                .create_room(&user, floor.label(), &type_of_room, &devices)
                .await?;

            output_success(
                &output_format,
                &format!(
                    "Created {} (room {}) on {} with {} device(s)",
                    detail.room.type_of_room,
                    detail.room.room_id,
                    floor.label(),
                    detail.devices.len()
                ),
                Some(json!({ "room": detail })),
            )
        }
        RoomCommands::Delete { email, room_id } => {
            let user = require_user(store, &email).await?;
            store.rooms().delete_room(&user, room_id).await?;

            output_success(
                &output_format,
                "Room and associated devices deleted successfully!",
                Some(json!({ "room_id": room_id })),
            )
        }
    }
}
