use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Creates the `users` and `guilds` tables if they do not exist yet.
/// Never alters an existing table.
pub fn ensure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            uuid        TEXT PRIMARY KEY,
            guild       INTEGER,
            friends     TEXT
        );

        CREATE TABLE IF NOT EXISTS guilds (
            id          INTEGER PRIMARY KEY,
            name        TEXT,
            description TEXT,
            users       TEXT,
            owner       TEXT
        );
        ",
    )?;

    info!("Database schema ready");
    Ok(())
}
