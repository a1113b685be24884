// Schema files
//
// A schema file is a JSON object of column name -> column spec, in column
// order. An entry is either a bare type name or an object:
//
//   {
//     "id": { "type": "INTEGER", "primary_key": true, "not_null": true },
//     "title": "TEXT",
//     "created_at": { "type": "DATETIME", "not_null": true, "default": "CURRENT_TIMESTAMP" }
//   }
//
// `default` is a constant, or CURRENT_TIMESTAMP / CURRENT_DATE for the
// insert-time clock.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tablemap_core::domain::defaults;
use tablemap_core::{Column, Columns, DataType, JsonValue, ModelObject};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColumnEntry {
    Type(String),
    Spec(ColumnSpec),
}

#[derive(Debug, Deserialize)]
struct ColumnSpec {
    #[serde(rename = "type")]
    data_type: String,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    not_null: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    default: Option<JsonValue>,
}

pub fn load(path: &Path) -> Result<Columns> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid schema file {}", path.display()))
}

pub fn parse(text: &str) -> Result<Columns> {
    let entries: ModelObject = serde_json::from_str(text).context("Schema must be a JSON object")?;
    if entries.is_empty() {
        bail!("Schema declares no columns");
    }

    let mut columns = Columns::new();
    for (name, entry) in entries {
        let entry: ColumnEntry = serde_json::from_value(entry)
            .with_context(|| format!("Invalid spec for column {}", name))?;
        columns.insert(name, build_column(entry)?);
    }
    Ok(columns)
}

fn build_column(entry: ColumnEntry) -> Result<Column> {
    let spec = match entry {
        ColumnEntry::Type(data_type) => return Ok(Column::new(data_type.parse::<DataType>()?)),
        ColumnEntry::Spec(spec) => spec,
    };

    let mut column = Column::new(spec.data_type.parse::<DataType>()?);
    if spec.primary_key {
        column = column.primary_key();
    }
    if spec.not_null {
        column = column.not_null();
    }
    if spec.unique {
        column = column.unique();
    }

    column = match spec.default {
        None => column,
        Some(JsonValue::String(clock)) if clock.eq_ignore_ascii_case("CURRENT_TIMESTAMP") => {
            Column { default: Some(defaults::current_timestamp()), ..column }
        }
        Some(JsonValue::String(clock)) if clock.eq_ignore_ascii_case("CURRENT_DATE") => {
            Column { default: Some(defaults::current_date()), ..column }
        }
        Some(value) => column.default_value(value),
    };

    Ok(column)
}
