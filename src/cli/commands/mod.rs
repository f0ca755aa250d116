pub mod db;
pub mod room;
pub mod user;
