// Table lifecycle statements

use crate::domain::{Column, Columns};

/// Column definitions of a CREATE TABLE, in declaration order
pub fn create_table_columns(columns: &Columns) -> String {
    columns
        .iter()
        .map(|(name, column)| column_definition(name, column))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_definition(name: &str, column: &Column) -> String {
    let mut definition = format!("{} {}", name, column.data_type.storage_type());

    if column.unique {
        definition.push_str(" UNIQUE");
    }
    if column.not_null || column.primary_key {
        definition.push_str(" NOT NULL");
    }
    if column.primary_key {
        definition.push_str(" PRIMARY KEY AUTOINCREMENT");
    }

    definition
}

/// Idempotent: safe to re-run against an existing table
pub fn create_table(table_name: &str, columns: &Columns) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        table_name,
        create_table_columns(columns)
    )
}

pub fn drop_table(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", table_name)
}
