pub mod device;
pub mod floor;
pub mod room;
pub mod session;
pub mod user;

pub use device::Device;
pub use floor::{Floor, FloorSlot, FloorSummary};
pub use room::{join_device_names, split_device_names, Room, RoomDetail, DEVICE_NAME_DELIMITER};
pub use session::Session;
pub use user::User;
