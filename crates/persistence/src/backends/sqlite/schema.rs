//! SQLite schema definitions.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

fn migration_error(step: &str, e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::MigrationError {
        message: format!("{step}: {e}"),
    })
}

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
        tracing::info!(version = SCHEMA_VERSION, "Created catalog schema");
    } else if current_version > SCHEMA_VERSION {
        return Err(StorageError::Backend(BackendError::MigrationError {
            message: format!(
                "database schema version {current_version} is newer than supported version {SCHEMA_VERSION}"
            ),
        }));
    }

    Ok(())
}

/// Get the current schema version.
pub fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| migration_error("Failed to create schema_version table", e))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| migration_error("Failed to clear schema_version", e))?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| migration_error("Failed to set schema_version", e))?;
    Ok(())
}

/// Create the initial schema (version 1).
///
/// Every entity type shares one table. Ancestor IDs are denormalized out of
/// the resource name so listings can filter and order without parsing names.
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS resources (
            resource_type TEXT NOT NULL,
            name TEXT NOT NULL,
            ancestor_1 TEXT NOT NULL DEFAULT '',
            ancestor_2 TEXT NOT NULL DEFAULT '',
            resource_id TEXT NOT NULL,
            data TEXT NOT NULL,
            create_time TEXT NOT NULL,
            update_time TEXT,
            PRIMARY KEY (resource_type, name)
        )",
        [],
    )
    .map_err(|e| migration_error("Failed to create resources table", e))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_resources_scope
            ON resources(resource_type, ancestor_1, ancestor_2, resource_id)",
        [],
    )
    .map_err(|e| migration_error("Failed to create scope index", e))?;

    Ok(())
}

/// Drop all catalog tables.
pub fn drop_all_tables(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS resources;
         DROP TABLE IF EXISTS schema_version;",
    )
    .map_err(|e| migration_error("Failed to drop tables", e))
}
