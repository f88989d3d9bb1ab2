//! SQL text for the generated statements.

use crate::error::SqlFieldsError;
use crate::field::Field;

/// `INSERT INTO t (a,b) VALUES (:a,:b)` over every field.
pub(crate) fn insert_sql(table: &str, fields: &[Field]) -> Result<String, SqlFieldsError> {
    check_names(table, fields)?;
    if fields.is_empty() {
        return Err(SqlFieldsError::ParameterError(format!(
            "insert into '{table}' needs at least one field"
        )));
    }

    let names = fields.iter().map(Field::name).collect::<Vec<_>>().join(",");
    let binds = fields
        .iter()
        .map(Field::bind_name)
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!("INSERT INTO {table} ({names}) VALUES ({binds})"))
}

/// `UPDATE t SET b=:b,c=:c WHERE a=<key>` where `a` is the first field.
///
/// The key is written as an integer literal, so its bind name never appears in the text.
pub(crate) fn update_sql(table: &str, fields: &[Field]) -> Result<String, SqlFieldsError> {
    check_names(table, fields)?;
    let Some((key, values)) = fields.split_first().filter(|(_, rest)| !rest.is_empty()) else {
        return Err(SqlFieldsError::ParameterError(format!(
            "update of '{table}' needs a key field and at least one value field"
        )));
    };
    let key_value = key.as_i64()?;

    let assignments = values
        .iter()
        .map(|f| format!("{}={}", f.name(), f.bind_name()))
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!(
        "UPDATE {table} SET {assignments} WHERE {}={key_value}",
        key.name()
    ))
}

fn check_names(table: &str, fields: &[Field]) -> Result<(), SqlFieldsError> {
    if table.trim().is_empty() {
        return Err(SqlFieldsError::ParameterError("table name is empty".into()));
    }
    if let Some(pos) = fields.iter().position(|f| f.name().trim().is_empty()) {
        return Err(SqlFieldsError::ParameterError(format!(
            "field #{pos} for '{table}' has an empty name"
        )));
    }
    Ok(())
}
