//! SQLite schema definition for the horse store
//!
//! A single `horses` table holds one row per (name, age) pair with the
//! career statistics the feature builder reads.

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS horses (
            name TEXT NOT NULL,
            age TEXT NOT NULL,
            country TEXT NOT NULL,
            breed TEXT NOT NULL,
            father TEXT NOT NULL,
            mother TEXT NOT NULL,
            races INTEGER NOT NULL,
            first INTEGER NOT NULL,
            second INTEGER NOT NULL,
            third INTEGER NOT NULL,
            fourth INTEGER NOT NULL,
            first_percent INTEGER NOT NULL,
            second_percent INTEGER NOT NULL,
            third_percent INTEGER NOT NULL,
            fourth_percent INTEGER NOT NULL,
            earnings REAL,
            PRIMARY KEY (name, age)
        )
        "#,
        [],
    )?;

    Ok(())
}
