//! VELA Storage Layer
//!
//! SQLite-based persistence for browser state. Connections are handed out
//! as scoped closures and released on every return path.

mod database;
mod error;
mod migrations;
pub mod roots;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
