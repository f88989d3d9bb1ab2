#![allow(dead_code)]

use std::path::PathBuf;

use sql_fields::prelude::*;
use tempfile::TempDir;

pub const USERS_DDL: &str = "CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER,
    score REAL,
    avatar BLOB
);";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn create_users_table(db: &Database) -> Result<(), SqlFieldsError> {
    db.exec(USERS_DDL)
}

/// Fresh database with the users table, living in its own temp directory.
pub fn users_db(options: DatabaseOptions) -> Result<(TempDir, PathBuf, Database), SqlFieldsError> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("users.db");
    let db = Database::with_options(options);
    db.create(&path, create_users_table, false)?;
    Ok((dir, path, db))
}
