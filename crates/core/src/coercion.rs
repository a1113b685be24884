//! Type coercion between logical values and store primitives.
//!
//! - JSON columns are stored as serialized text and read back as structures.
//! - BOOLEAN columns are stored as `1`/`0` and read back by truthiness.
//! - Every other type passes through; matching the SQL affinity is the caller's job.
//!
//! All functions are pure.

use crate::domain::{Columns, DataType, JsonValue, ModelObject, SqlValue, StorageRecord};
use crate::error::Result;

/// Coerce a logical record into a storage record
///
/// Every key of `record` must be declared in `columns`; callers sanitize first.
pub fn to_database_value(columns: &Columns, record: &ModelObject) -> Result<StorageRecord> {
    record
        .iter()
        .map(|(name, value)| {
            let data_type = columns.data_type(name)?;
            Ok((name.clone(), property_to_database_value(data_type, value)?))
        })
        .collect()
}

/// Coerce a storage record back into a logical record
///
/// Only keys present in both the schema and `record` are copied, in schema order.
pub fn to_model_value(columns: &Columns, record: &StorageRecord) -> Result<ModelObject> {
    let mut model = ModelObject::new();
    for (name, column) in columns.iter() {
        if let Some(value) = record.get(name) {
            model.insert(
                name.to_string(),
                property_to_model_value(column.data_type, value)?,
            );
        }
    }
    Ok(model)
}

pub fn property_to_database_value(data_type: DataType, value: &JsonValue) -> Result<SqlValue> {
    match data_type {
        DataType::Json => Ok(SqlValue::Text(serde_json::to_string(value)?)),
        DataType::Boolean => Ok(SqlValue::Integer(i64::from(is_truthy(value)))),
        _ => primitive_from_json(value),
    }
}

pub fn property_to_model_value(data_type: DataType, value: &SqlValue) -> Result<JsonValue> {
    match data_type {
        DataType::Json => {
            // Absent or falsy storage decodes to null instead of failing
            if !value.is_truthy() {
                return Ok(JsonValue::Null);
            }
            match value {
                SqlValue::Text(text) => Ok(serde_json::from_str(text)?),
                SqlValue::Blob(bytes) => Ok(serde_json::from_slice(bytes)?),
                other => Ok(json_from_primitive(other)),
            }
        }
        DataType::Boolean => Ok(JsonValue::Bool(value.is_truthy())),
        _ => Ok(json_from_primitive(value)),
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn primitive_from_json(value: &JsonValue) -> Result<SqlValue> {
    let primitive = match value {
        JsonValue::Null => SqlValue::Null,
        JsonValue::Bool(b) => SqlValue::Integer(i64::from(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => SqlValue::Text(s.clone()),
        // Nested values have no primitive form; store their text
        JsonValue::Array(_) | JsonValue::Object(_) => SqlValue::Text(serde_json::to_string(value)?),
    };
    Ok(primitive)
}

fn json_from_primitive(value: &SqlValue) -> JsonValue {
    match value {
        SqlValue::Null => JsonValue::Null,
        SqlValue::Integer(i) => JsonValue::from(*i),
        SqlValue::Real(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        SqlValue::Text(s) => JsonValue::String(s.clone()),
        SqlValue::Blob(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
    }
}
