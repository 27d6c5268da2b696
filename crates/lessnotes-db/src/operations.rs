//! Database CRUD operations.

pub mod files;
pub mod messages;
pub mod users;
pub mod vectors;
