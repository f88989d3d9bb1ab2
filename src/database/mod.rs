//! Connection lifecycle and the serialized entry points.

mod file;

pub use file::{SQLITE_HEADER, is_database_file};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OpenFlags};

use crate::config::{DatabaseOptions, DatabaseOptionsBuilder};
use crate::error::{SqlFieldsError, log_engine_error};
use crate::field::Field;
use crate::results::ResultSet;
use crate::statement::Statement;

use file::validate_existing;

struct OpenConnection {
    conn: Connection,
    path: PathBuf,
}

/// Handle owning at most one `SQLite` connection.
///
/// Every engine call runs under the handle's mutex, so a `Database` can be shared
/// between threads behind an `Arc`.
/// ```rust,no_run
/// use sql_fields::{Database, Field};
///
/// # fn main() -> Result<(), sql_fields::SqlFieldsError> {
/// let db = Database::new();
/// db.create("people.db", |db| {
///     db.exec("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")
/// }, false)?;
/// let id = db.insert("users", &[Field::new("name", "Ann"), Field::new("age", 30)])?;
/// db.update("users", &[Field::new("id", id), Field::new("age", 31)])?;
/// # Ok(())
/// # }
/// ```
pub struct Database {
    conn: Mutex<Option<OpenConnection>>,
    options: DatabaseOptions,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DatabaseOptions::default())
    }

    #[must_use]
    pub fn with_options(options: DatabaseOptions) -> Self {
        Self {
            conn: Mutex::new(None),
            options,
        }
    }

    #[must_use]
    pub fn builder() -> DatabaseOptionsBuilder {
        DatabaseOptionsBuilder::new()
    }

    #[must_use]
    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Path of the open database file.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|open| open.path.clone())
    }

    /// Open an existing database file for reading and writing.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if a database is already open,
    /// [`SqlFieldsError::FileValidation`] if the file is missing, not readable, not
    /// writable or lacks the `SQLite` header, and [`SqlFieldsError::Sqlite`] if the
    /// engine refuses to open it.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<(), SqlFieldsError> {
        let path = path.as_ref();
        let mut guard = self.lock();
        if guard.is_some() {
            return Err(already_open());
        }
        validate_existing(path, self.options.verify_header)?;

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| log_engine_error("open", e))?;
        tracing::debug!(path = %path.display(), "database opened");
        *guard = Some(OpenConnection {
            conn,
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Create a new database file and run `initializer` on it, typically to create the schema.
    ///
    /// With `overwrite` an existing file is removed first; without it an existing file
    /// is an error and is left untouched. The initializer's result is the result of the
    /// call; when it fails the new connection is closed again.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if a database is already open,
    /// [`SqlFieldsError::Io`] if the old file cannot be removed,
    /// [`SqlFieldsError::FileValidation`] if the file exists, the engine's error if it
    /// cannot create the file, or whatever `initializer` returns.
    pub fn create<F>(
        &self,
        path: impl AsRef<Path>,
        initializer: F,
        overwrite: bool,
    ) -> Result<(), SqlFieldsError>
    where
        F: FnOnce(&Database) -> Result<(), SqlFieldsError>,
    {
        let path = path.as_ref();
        {
            let mut guard = self.lock();
            if guard.is_some() {
                return Err(already_open());
            }
            if overwrite && path.try_exists()? {
                fs::remove_file(path).inspect_err(|err| {
                    tracing::error!(path = %path.display(), error = %err, "cannot remove old database");
                })?;
            }
            if path.try_exists()? {
                return Err(SqlFieldsError::file_validation(path, "file already exists"));
            }

            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| log_engine_error("create", e))?;
            *guard = Some(OpenConnection {
                conn,
                path: path.to_path_buf(),
            });
        }

        // The lock is released here: the initializer goes through the public entry points.
        match initializer(self) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "database created");
                Ok(())
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "database initializer failed");
                self.discard();
                Err(err)
            }
        }
    }

    /// Close the connection. If the engine refuses (for example while busy) the
    /// connection stays open.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, or the engine's error.
    pub fn close(&self) -> Result<(), SqlFieldsError> {
        let mut guard = self.lock();
        let Some(open) = guard.take() else {
            return Err(not_open());
        };
        match open.conn.close() {
            Ok(()) => {
                tracing::debug!(path = %open.path.display(), "database closed");
                Ok(())
            }
            Err((conn, err)) => {
                *guard = Some(OpenConnection {
                    conn,
                    path: open.path,
                });
                Err(log_engine_error("close", err))
            }
        }
    }

    /// Execute one or more statements that return no rows (DDL, pragmas, ...).
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, or the engine's error.
    pub fn exec(&self, sql: &str) -> Result<(), SqlFieldsError> {
        self.with_connection(|conn| {
            conn.execute_batch(sql)
                .map_err(|e| log_engine_error("exec", e))
        })
    }

    /// See [`Statement::insert`].
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, otherwise as the statement.
    pub fn insert(&self, table: &str, fields: &[Field]) -> Result<i64, SqlFieldsError> {
        self.with_connection(|conn| self.statement(conn).insert(table, fields))
    }

    /// See [`Statement::update`].
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, otherwise as the statement.
    pub fn update(&self, table: &str, fields: &[Field]) -> Result<(), SqlFieldsError> {
        self.with_connection(|conn| self.statement(conn).update(table, fields))
    }

    /// See [`Statement::update_affected`].
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, otherwise as the statement.
    pub fn update_affected(&self, table: &str, fields: &[Field]) -> Result<usize, SqlFieldsError> {
        self.with_connection(|conn| self.statement(conn).update_affected(table, fields))
    }

    /// See [`Statement::select`].
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, otherwise as the statement.
    pub fn select(&self, query: &str) -> Result<ResultSet, SqlFieldsError> {
        self.with_connection(|conn| self.statement(conn).select(query))
    }

    /// See [`Statement::select_with`].
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, otherwise as the statement.
    pub fn select_with(&self, query: &str, fields: &[Field]) -> Result<ResultSet, SqlFieldsError> {
        self.with_connection(|conn| self.statement(conn).select_with(query, fields))
    }

    /// See [`Statement::execute`].
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, otherwise as the statement.
    pub fn execute(&self, sql: &str, fields: &[Field]) -> Result<usize, SqlFieldsError> {
        self.with_connection(|conn| self.statement(conn).execute(sql, fields))
    }

    /// Run `func` against the raw connection while holding the lock.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ConnectionError`] if nothing is open, or whatever `func` returns.
    pub fn with_connection<F, R>(&self, func: F) -> Result<R, SqlFieldsError>
    where
        F: FnOnce(&Connection) -> Result<R, SqlFieldsError>,
    {
        let guard = self.lock();
        let open = guard.as_ref().ok_or_else(not_open)?;
        func(&open.conn)
    }

    fn statement<'c>(&self, conn: &'c Connection) -> Statement<'c> {
        Statement::with_policy(conn, self.options.bind_policy)
    }

    fn discard(&self) {
        if let Some(open) = self.lock().take() {
            if let Err((_, err)) = open.conn.close() {
                log_engine_error("close", err);
            }
        }
    }

    // A panic inside a caller closure cannot leave the connection half-updated.
    fn lock(&self) -> MutexGuard<'_, Option<OpenConnection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // try_lock: formatting must not block on a connection in use.
        let path = self
            .conn
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|open| open.path.clone()));
        f.debug_struct("Database")
            .field("path", &path)
            .field("options", &self.options)
            .finish()
    }
}

fn already_open() -> SqlFieldsError {
    SqlFieldsError::ConnectionError("a database is already open".into())
}

fn not_open() -> SqlFieldsError {
    SqlFieldsError::ConnectionError("no database is open".into())
}
