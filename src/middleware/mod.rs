pub mod auth;
pub mod response;

pub use auth::{clear_session_cookie, require_session, session_cookie, session_token_from_headers, CurrentUser};
pub use response::{ApiResponse, ApiResult};
