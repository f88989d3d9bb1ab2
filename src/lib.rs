//! Synchronous `SQLite` access built on named, typed fields.
//!
//! A [`Field`] pairs a column name with a [`FieldValue`]. A [`Database`] owns one
//! connection and turns field lists into parameterized `INSERT` and `UPDATE`
//! statements, and query results back into [`Row`]s of fields:
//! ```rust
//! use sql_fields::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempfile::tempdir()?;
//! # let path = dir.path().join("users.db");
//! let db = Database::new();
//! db.create(&path, |db| {
//!     db.exec("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")
//! }, false)?;
//!
//! let id = db.insert("users", &[Field::new("name", "Ann"), Field::new("age", 30)])?;
//! let rows = db.select(&format!("SELECT name, age FROM users WHERE id={id}"))?;
//! assert_eq!(rows.first().unwrap().get("name").unwrap().as_text()?, "Ann");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod field;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod types;

pub use config::{DatabaseOptions, DatabaseOptionsBuilder};
pub use database::{Database, SQLITE_HEADER, is_database_file};
pub use error::SqlFieldsError;
pub use field::Field;
pub use results::{ResultSet, Row};
pub use statement::{BindPolicy, Statement};
pub use types::{FieldKind, FieldValue};
