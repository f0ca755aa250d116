pub mod manager;
pub mod migrations;
pub mod models;

pub use manager::{Database, DatabaseError};
pub use migrations::apply_migrations;
