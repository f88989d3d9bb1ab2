use std::path::PathBuf;

use thiserror::Error;

use crate::types::FieldKind;

#[derive(Debug, Error)]
pub enum SqlFieldsError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("field '{field}' holds {actual}, cannot read it as {expected}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("'{}' is not usable as a database file: {reason}", .path.display())]
    FileValidation { path: PathBuf, reason: String },

    #[error("Parameter error: {0}")]
    ParameterError(String),
}

impl SqlFieldsError {
    pub(crate) fn file_validation(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SqlFieldsError::FileValidation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Extended `SQLite` result code carried by an engine error, if any.
    #[must_use]
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            SqlFieldsError::Sqlite(err) => Some(engine_error_code(err)),
            _ => None,
        }
    }
}

pub(crate) fn engine_error_code(err: &rusqlite::Error) -> i32 {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => failure.extended_code,
        _ => -1,
    }
}

/// Log an engine failure where it happened and hand it back for propagation.
pub(crate) fn log_engine_error(context: &'static str, err: rusqlite::Error) -> SqlFieldsError {
    tracing::error!(
        context,
        code = engine_error_code(&err),
        error = %err,
        "sqlite call failed"
    );
    SqlFieldsError::Sqlite(err)
}
