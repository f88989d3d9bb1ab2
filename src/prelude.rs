//! Convenient imports for common functionality.

pub use crate::config::{DatabaseOptions, DatabaseOptionsBuilder};
pub use crate::database::Database;
pub use crate::error::SqlFieldsError;
pub use crate::field::Field;
pub use crate::results::{ResultSet, Row};
pub use crate::statement::{BindPolicy, Statement};
pub use crate::types::{FieldKind, FieldValue};
