// Command output: pretty JSON or a table

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use tablemap_core::{JsonValue, ModelObject};
use tabled::builder::Builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

pub fn print_record(record: Option<&ModelObject>, format: OutputFormat) -> Result<()> {
    match record {
        Some(record) => print_records(std::slice::from_ref(record), format),
        None => {
            match format {
                OutputFormat::Json => println!("null"),
                OutputFormat::Table => println!("{}", "No matching row".yellow()),
            }
            Ok(())
        }
    }
}

pub fn print_records(records: &[ModelObject], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = match records {
                [single] => serde_json::to_string_pretty(single)?,
                _ => serde_json::to_string_pretty(records)?,
            };
            println!("{}", json);
        }
        OutputFormat::Table => {
            if records.is_empty() {
                println!("{}", "No rows".yellow());
            } else {
                println!("{}", render_table(records));
            }
        }
    }
    Ok(())
}

pub fn success(message: &str) {
    println!("{}", format!("✓ {}", message).green().bold());
}

fn render_table(records: &[ModelObject]) -> String {
    // Columns come from the first row; every row of one query has the same keys
    let headers: Vec<String> = records
        .first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for record in records {
        builder.push_record(
            headers
                .iter()
                .map(|name| cell(record.get(name).unwrap_or(&JsonValue::Null))),
        );
    }
    builder.build().to_string()
}

fn cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}
