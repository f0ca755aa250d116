// handlers/protected/help.rs - GET /help_info

use serde_json::{json, Value};

use crate::database::models::room::DEVICE_NAME_DELIMITER;
use crate::middleware::ApiResponse;

pub async fn help_info() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "title": "Using your smart home",
        "sections": [
            {
                "heading": "Floors",
                "body": "Every home has three floors: Floor 1, Floor 2 and Floor 3. Open /floor-N-rooms-devices to see the rooms on floor N."
            },
            {
                "heading": "Adding a room",
                "body": "POST to /createpageN with a type_of_room and a list of devices. The room and its devices are created together."
            },
            {
                "heading": "Device names",
                "body": format!(
                    "Blank device names are ignored. A name may not contain '|', which separates names in the '{}' joined view.",
                    DEVICE_NAME_DELIMITER
                )
            },
            {
                "heading": "Removing a room",
                "body": "Open /floor-N-rooms-devices/ROOM_ID/delete. The room's devices are removed with it."
            },
            {
                "heading": "Automation",
                "body": "/start launches the automation hook configured for this home, if any."
            }
        ]
    }))
}
