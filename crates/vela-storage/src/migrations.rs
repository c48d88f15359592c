//! Database migrations
//!
//! Schema: bookmarks tree plus the favicons it joins against.

use crate::roots;
use crate::Result;
use rusqlite::Connection;

const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<i32, _> =
        conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        });

    match result {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(_, _)) => {
            // Table doesn't exist yet
            conn.execute(
                "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
                [],
            )?;
            conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1: bookmarks schema");

    // Favicons first: bookmarks carries a foreign key into it
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS favicons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            date INTEGER NOT NULL,
            type INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_favicons_url ON favicons(url);
    "#,
    )?;

    // The bookmark tree is flat in storage: every row names its parent.
    // The type column discriminates items (1) from folders (2).
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type INTEGER NOT NULL,
            guid TEXT NOT NULL UNIQUE,
            url TEXT,
            title TEXT,
            parent INTEGER NOT NULL,
            faviconID INTEGER REFERENCES favicons(id)
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_parent ON bookmarks(parent);
        CREATE INDEX IF NOT EXISTS idx_bookmarks_url ON bookmarks(url);
    "#,
    )?;

    seed_roots(conn)?;

    Ok(())
}

/// Inserts the synthetic root and the "Mobile Bookmarks" folder. The root
/// row is its own parent; child queries exclude it by id.
fn seed_roots(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO bookmarks (id, type, guid, title, parent) \
         VALUES (?1, 2, ?2, 'Root', ?1)",
        rusqlite::params![roots::ROOT_ID, roots::ROOT_GUID],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO bookmarks (id, type, guid, title, parent) \
         VALUES (?1, 2, ?2, ?3, ?4)",
        rusqlite::params![
            roots::MOBILE_ID,
            roots::MOBILE_GUID,
            roots::MOBILE_TITLE,
            roots::ROOT_ID
        ],
    )?;
    Ok(())
}
