// Column Schema Model

use super::record::ModelObject;
use super::value::JsonValue;
use crate::error::{AppError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Logical column type (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Integer,
    Float,
    Text,
    Numeric,
    Date,
    Datetime,
    Boolean,
    Json,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Integer,
        DataType::Float,
        DataType::Text,
        DataType::Numeric,
        DataType::Date,
        DataType::Datetime,
        DataType::Boolean,
        DataType::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::Text => "TEXT",
            DataType::Numeric => "NUMERIC",
            DataType::Date => "DATE",
            DataType::Datetime => "DATETIME",
            DataType::Boolean => "BOOLEAN",
            DataType::Json => "JSON",
        }
    }

    /// Type name emitted in DDL. JSON and BOOLEAN have no native SQLite
    /// affinity and are stored as TEXT and INTEGER.
    pub fn storage_type(&self) -> &'static str {
        match self {
            DataType::Json => "TEXT",
            DataType::Boolean => "INTEGER",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::Config(format!("Unknown column type: {}", s)))
    }
}

/// Default-value producer, evaluated against the record being assembled
pub type DefaultFn = Arc<dyn Fn(&ModelObject) -> JsonValue + Send + Sync>;

/// Column descriptor
///
/// `primary_key`, `not_null` and `unique` only affect DDL generation.
#[derive(Clone)]
pub struct Column {
    pub data_type: DataType,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    pub default: Option<DefaultFn>,
}

impl Column {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            primary_key: false,
            not_null: false,
            unique: false,
            default: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Attach a default producer, called with the record under assembly
    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn(&ModelObject) -> JsonValue + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(producer));
        self
    }

    /// Attach a constant default
    pub fn default_value(self, value: impl Into<JsonValue>) -> Self {
        let value = value.into();
        self.default_with(move |_| value.clone())
    }

    /// Evaluate the default producer, if any
    pub fn default_for(&self, record: &ModelObject) -> Option<JsonValue> {
        self.default.as_ref().map(|producer| producer(record))
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("data_type", &self.data_type)
            .field("primary_key", &self.primary_key)
            .field("not_null", &self.not_null)
            .field("unique", &self.unique)
            .field("default", &self.default.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Column name used when no column is flagged as primary key
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Column schema: column name -> descriptor, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Columns {
    columns: IndexMap<String, Column>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style declaration. Re-declaring a name replaces it in place.
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.insert(name, column);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Option<Column> {
        self.columns.insert(name.into(), column)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Logical type of `name`, or a schema violation if it is not declared
    pub fn data_type(&self, name: &str) -> Result<DataType> {
        self.get(name)
            .map(|column| column.data_type)
            .ok_or_else(|| AppError::schema_violation(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Name of the column flagged `primary_key`, falling back to `id`
    pub fn primary_key_name(&self) -> &str {
        self.iter()
            .find(|(_, column)| column.primary_key)
            .map(|(name, _)| name)
            .unwrap_or(DEFAULT_PRIMARY_KEY)
    }
}

impl<S: Into<String>> FromIterator<(S, Column)> for Columns {
    fn from_iter<I: IntoIterator<Item = (S, Column)>>(iter: I) -> Self {
        let mut columns = Columns::new();
        for (name, column) in iter {
            columns.insert(name, column);
        }
        columns
    }
}

/// Ready-made default producers
pub mod defaults {
    use super::DefaultFn;
    use crate::domain::value::JsonValue;
    use std::sync::Arc;

    /// `YYYY-MM-DD HH:MM:SS` in UTC, the format SQLite's `CURRENT_TIMESTAMP` uses
    pub fn current_timestamp() -> DefaultFn {
        Arc::new(|_| {
            JsonValue::String(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string())
        })
    }

    /// `YYYY-MM-DD` in UTC
    pub fn current_date() -> DefaultFn {
        Arc::new(|_| JsonValue::String(chrono::Utc::now().format("%Y-%m-%d").to_string()))
    }
}
