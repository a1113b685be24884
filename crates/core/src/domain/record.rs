// Records, Statements and Result Sets

use super::value::{JsonValue, SqlValue};
use indexmap::IndexMap;

/// Logical record: column name -> application-facing value, insertion ordered
pub type ModelObject = serde_json::Map<String, JsonValue>;

/// Storage record: column name -> store primitive, insertion ordered
pub type StorageRecord = IndexMap<String, SqlValue>;

/// Update input: the primary-key value travels beside the column properties
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateObject {
    pub primary_key: JsonValue,
    pub properties: ModelObject,
}

impl UpdateObject {
    pub fn new(primary_key: impl Into<JsonValue>, properties: ModelObject) -> Self {
        Self {
            primary_key: primary_key.into(),
            properties,
        }
    }

    /// Split the key column out of a full record
    ///
    /// Returns `None` when the record carries no (or a null) key value.
    pub fn from_record(record: ModelObject, primary_key_column: &str) -> Option<Self> {
        let mut primary_key = JsonValue::Null;
        let mut properties = ModelObject::new();
        // Rebuilt rather than removed so the remaining keys keep their order
        for (key, value) in record {
            if key == primary_key_column {
                primary_key = value;
            } else {
                properties.insert(key, value);
            }
        }

        if primary_key.is_null() {
            None
        } else {
            Some(Self {
                primary_key,
                properties,
            })
        }
    }
}

/// SQL text plus positional parameters in placeholder order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Statement without parameters
    pub fn bare(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// What the engine delivers for one executed statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub rows: Vec<StorageRecord>,
    pub rows_affected: u64,
    /// Row id assigned by the engine for the last INSERT, if any
    pub last_insert_id: Option<i64>,
}

impl ResultSet {
    pub fn with_rows(rows: Vec<StorageRecord>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn first_row(mut self) -> Option<StorageRecord> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.rows.swap_remove(0))
        }
    }
}
