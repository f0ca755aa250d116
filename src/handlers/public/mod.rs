// handlers/public/mod.rs - Handlers reachable without a session
//
// Account creation, sign in and sign out plus the service landing and health
// endpoints.
pub mod auth;
pub mod site;

pub use site::{health, root};
