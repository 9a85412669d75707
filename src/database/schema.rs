use rusqlite::{Connection, Result};

/// Initialize the database schema for the report wizard
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Schema version table for future migrations
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_schema(conn)?;
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Schema version 1
fn create_schema(conn: &Connection) -> Result<()> {
    // Table: drafts (reports that have not been submitted yet)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS drafts (
            uuid TEXT PRIMARY KEY NOT NULL,
            latitude REAL,
            longitude REAL,
            category TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            details TEXT NOT NULL DEFAULT '',
            file TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_drafts_updated_at ON drafts(updated_at)",
        [],
    )?;

    Ok(())
}
