// handlers/protected/mod.rs - Handlers behind the session gate
//
// Every handler here receives the caller as Extension<CurrentUser>, inserted
// by middleware::require_session, and scopes its queries to that user. Floor
// routes additionally carry their Extension<FloorSlot>.
pub mod automation;
pub mod devices;
pub mod help;
pub mod home;
pub mod rooms;
