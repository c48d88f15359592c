//! Favicon persistence behind the store seam.

use rusqlite::Connection;
use vela_storage::StorageError;

use crate::node::Favicon;

/// Destination for icons gathered while sharing a page.
///
/// Implementations receive the caller's connection so the favicon write can
/// join the surrounding bookmark transaction; either both rows land or
/// neither does.
pub trait FaviconStore {
    /// Persists `favicon` and returns the id to reference it by.
    fn add_favicon(&self, conn: &Connection, favicon: &Favicon) -> Result<i64, StorageError>;
}

/// Default store: upserts into the `favicons` table keyed by icon URL, so
/// re-sharing a page refreshes the icon row instead of duplicating it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteFavicons;

impl FaviconStore for SqliteFavicons {
    fn add_favicon(&self, conn: &Connection, favicon: &Favicon) -> Result<i64, StorageError> {
        conn.execute(
            "INSERT INTO favicons (url, date, type) VALUES (?1, ?2, ?3) \
             ON CONFLICT(url) DO UPDATE SET date = excluded.date, type = excluded.type",
            rusqlite::params![
                favicon.url,
                favicon.date.timestamp(),
                favicon.icon_type.code()
            ],
        )?;

        let id = conn.query_row(
            "SELECT id FROM favicons WHERE url = ?1",
            [&favicon.url],
            |row| row.get(0),
        )?;
        Ok(id)
    }
}
