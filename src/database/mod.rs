use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub mod document;
pub mod queries;
pub mod schema;
pub mod store;

pub use document::{to_fields, Document, Fields, Filter, Query};
pub use store::{DocumentStore, ListenerRegistration, Snapshot, SnapshotListener, SqliteStore};

pub fn init_database(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;

    // Enable WAL mode so `watch` sessions can read while another process writes
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    log::debug!("Opened {} (journal_mode={})", db_path.display(), mode);

    configure_connection(&conn)?;
    Ok(conn)
}

pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_secs(5))?;

    // Create schema
    schema::create_tables(conn)?;

    Ok(())
}
