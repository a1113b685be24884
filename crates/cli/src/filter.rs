// Filter arguments: JSON object of "<column>_<operator>" -> value

use anyhow::{Context, Result};
use tablemap_core::coercion::property_to_database_value;
use tablemap_core::{Columns, DataType, JsonValue, ModelObject, Predicate, SqlValue, Where};

/// Parse a JSON filter, coercing each value by its column's declared type
pub fn parse(columns: &Columns, text: &str) -> Result<Where> {
    let filter: ModelObject = serde_json::from_str(text).context("Filter must be a JSON object")?;

    let mut predicates = Where::with_capacity(filter.len());
    for (key, value) in filter {
        let predicate = Predicate::parse(&key)?;
        let data_type = column_type(columns, &predicate.column);
        predicates.insert(key, property_to_database_value(data_type, &value)?);
    }
    Ok(predicates)
}

/// A key given on the command line, typed like the primary key column
pub fn key_value(columns: &Columns, raw: &str) -> Result<SqlValue> {
    let data_type = column_type(columns, columns.primary_key_name());
    Ok(property_to_database_value(data_type, &key_json(raw))?)
}

/// Numbers and other JSON literals parse as such, anything else is text
pub fn key_json(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

// Undeclared columns pass values through untouched
fn column_type(columns: &Columns, name: &str) -> DataType {
    columns.get(name).map(|column| column.data_type).unwrap_or(DataType::Text)
}
