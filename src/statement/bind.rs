use crate::error::{SqlFieldsError, log_engine_error};
use crate::field::Field;

/// What to do with a field whose bind name has no placeholder in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindPolicy {
    /// Leave the field out of the statement. The caller is responsible for matching
    /// field names to column names.
    #[default]
    SkipUnmatched,
    /// Fail the call with [`SqlFieldsError::ParameterError`].
    Strict,
}

/// Bind each field to the placeholder named by its bind name.
pub(crate) fn bind_fields(
    stmt: &mut rusqlite::Statement<'_>,
    fields: &[Field],
    policy: BindPolicy,
) -> Result<(), SqlFieldsError> {
    for field in fields {
        let bind_name = field.bind_name();
        let index = stmt
            .parameter_index(&bind_name)
            .map_err(|e| log_engine_error("parameter_index", e))?;

        match (index, policy) {
            (Some(idx), _) => stmt
                .raw_bind_parameter(idx, field.value())
                .map_err(|e| log_engine_error("bind", e))?,
            (None, BindPolicy::SkipUnmatched) => {
                tracing::trace!(bind_name = %bind_name, "no placeholder for field, skipped");
            }
            (None, BindPolicy::Strict) => {
                return Err(SqlFieldsError::ParameterError(format!(
                    "statement has no placeholder {bind_name}"
                )));
            }
        }
    }
    Ok(())
}
