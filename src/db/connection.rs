use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::TaskpilotError;

const DATA_DIR: &str = ".taskpilot";

/// Find the store root by walking up from the current directory to the
/// nearest `.taskpilot` directory.
pub fn find_store_root() -> Result<PathBuf, TaskpilotError> {
    let mut dir = env::current_dir().map_err(|e| TaskpilotError::database(e.to_string()))?;
    loop {
        if dir.join(DATA_DIR).is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(TaskpilotError::not_initialized());
        }
    }
}

/// Get the path to the taskpilot database.
pub fn db_path() -> Result<PathBuf, TaskpilotError> {
    let root = find_store_root()?;
    Ok(root.join(DATA_DIR).join("tasks.db"))
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf, TaskpilotError> {
    let root = find_store_root()?;
    Ok(root.join(DATA_DIR).join("config.json"))
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db() -> Result<Connection, TaskpilotError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(TaskpilotError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the store in the current directory: create the data
/// directory, the database, and the schema.
pub fn init_db() -> Result<PathBuf, TaskpilotError> {
    let cwd = env::current_dir().map_err(|e| TaskpilotError::database(e.to_string()))?;
    let path = cwd.join(DATA_DIR).join("tasks.db");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TaskpilotError::database(e.to_string()))?;
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    super::migrations::run_migrations(&conn)?;
    Ok(path)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskpilotError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
