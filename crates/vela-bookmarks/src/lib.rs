//! VELA Bookmarks
//!
//! Materializes the bookmark tree from the flat `bookmarks` table, joins
//! optional favicon metadata, and exposes folder navigation and mutations
//! behind [`BookmarkManager`]. Results are reported through one-shot
//! success/failure continuations.

mod cursor;
mod decode;
mod error;
mod favicons;
mod manager;
mod model;
mod node;

pub use cursor::{Cursor, CursorStatus};
pub use decode::DecodeError;
pub use error::BookmarksError;
pub use favicons::{FaviconStore, SqliteFavicons};
pub use manager::BookmarkManager;
pub use model::{BookmarksModel, PopulatedFolder};
pub use node::{
    BookmarkFolder, BookmarkItem, BookmarkNode, Favicon, IconType, NodeType, ShareItem,
    UNTITLED_FOLDER_TITLE,
};

// Re-export the storage layer
pub use vela_storage::{roots, Database, StorageError};

pub type Result<T> = std::result::Result<T, BookmarksError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
