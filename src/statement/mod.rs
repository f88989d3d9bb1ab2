//! Statement execution over a borrowed connection.
//!
//! A [`Statement`] lives for exactly one call. The connection it borrows comes from
//! the [`Database`](crate::Database) lock guard, so holding a `Statement` means
//! holding the lock.

mod bind;
mod sql;

pub use bind::BindPolicy;

use rusqlite::Connection;

use crate::error::{SqlFieldsError, log_engine_error};
use crate::field::Field;
use crate::results::{ResultSet, Row};
use crate::types::FieldValue;

use bind::bind_fields;
use sql::{insert_sql, update_sql};

pub struct Statement<'conn> {
    conn: &'conn Connection,
    policy: BindPolicy,
}

impl<'conn> Statement<'conn> {
    #[must_use]
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_policy(conn, BindPolicy::default())
    }

    #[must_use]
    pub fn with_policy(conn: &'conn Connection, policy: BindPolicy) -> Self {
        Self { conn, policy }
    }

    #[must_use]
    pub fn policy(&self) -> BindPolicy {
        self.policy
    }

    /// Run a query and materialize every row as named fields.
    ///
    /// A statement with no result columns yields an empty set without being stepped.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::Sqlite`] if preparing, stepping or finalizing fails.
    pub fn select(&self, query: &str) -> Result<ResultSet, SqlFieldsError> {
        self.select_with(query, &[])
    }

    /// Like [`Statement::select`], with `fields` bound into the query's named placeholders.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError`] if binding or any engine call fails.
    pub fn select_with(&self, query: &str, fields: &[Field]) -> Result<ResultSet, SqlFieldsError> {
        let mut stmt = self
            .conn
            .prepare(query)
            .map_err(|e| log_engine_error("prepare", e))?;

        bind_fields(&mut stmt, fields, self.policy)?;

        let column_count = stmt.column_count();
        if column_count == 0 {
            return Ok(ResultSet::default());
        }
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();

        let mut result_set = ResultSet::with_capacity(10);
        {
            let mut rows = stmt.raw_query();
            while let Some(row) = rows.next().map_err(|e| log_engine_error("step", e))? {
                let mut out = Row::with_capacity(column_count);
                for (idx, name) in column_names.iter().enumerate() {
                    let value = row
                        .get_ref(idx)
                        .map_err(|e| log_engine_error("column", e))?;
                    out.push(Field::new(name.as_str(), FieldValue::from_value_ref(value)));
                }
                result_set.add_row(out);
            }
        }

        stmt.finalize()
            .map_err(|e| log_engine_error("finalize", e))?;
        Ok(result_set)
    }

    /// Insert one row built from `fields` and return its row id.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ParameterError`] for an empty field list, otherwise any
    /// binding or engine failure.
    pub fn insert(&self, table: &str, fields: &[Field]) -> Result<i64, SqlFieldsError> {
        let sql = insert_sql(table, fields)?;
        self.run(&sql, fields)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update the row whose key equals `fields[0]`, setting every other field.
    ///
    /// Matching zero rows is not an error; use [`Statement::update_affected`] to tell.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::ParameterError`] for fewer than two fields,
    /// [`SqlFieldsError::TypeMismatch`] for a non-integer key, otherwise any binding or
    /// engine failure.
    pub fn update(&self, table: &str, fields: &[Field]) -> Result<(), SqlFieldsError> {
        self.update_affected(table, fields).map(|_| ())
    }

    /// [`Statement::update`] returning the number of rows changed.
    ///
    /// # Errors
    /// See [`Statement::update`].
    pub fn update_affected(&self, table: &str, fields: &[Field]) -> Result<usize, SqlFieldsError> {
        let sql = update_sql(table, fields)?;
        // The key is a literal in the WHERE clause; only the SET fields have placeholders.
        self.run(&sql, &fields[1..])
    }

    /// Run caller-written SQL with `fields` bound to its named placeholders.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError`] if binding or any engine call fails.
    pub fn execute(&self, sql: &str, fields: &[Field]) -> Result<usize, SqlFieldsError> {
        self.run(sql, fields)
    }

    fn run(&self, sql: &str, fields: &[Field]) -> Result<usize, SqlFieldsError> {
        tracing::debug!(sql, "executing");
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| log_engine_error("prepare", e))?;
        bind_fields(&mut stmt, fields, self.policy)?;
        let changed = stmt
            .raw_execute()
            .map_err(|e| log_engine_error("step", e))?;
        stmt.finalize()
            .map_err(|e| log_engine_error("finalize", e))?;
        Ok(changed)
    }
}
