pub mod account_service;
pub mod automation;
pub mod error;
pub mod room_service;

pub use account_service::{AccountService, NewAccount, SessionToken, SignedIn};
pub use automation::AutomationHook;
pub use error::{AuthFailure, HomeError, HomeResult};
pub use room_service::RoomService;
