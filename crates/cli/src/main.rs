//! Tablemap CLI - schema-mapped access to one SQLite table per invocation

mod config;
mod filter;
mod logging;
mod output;
mod schema;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tablemap_core::query_builder::create_table;
use tablemap_core::{ModelObject, QueryOptions, Repository, UpdateObject};
use tablemap_infra_sqlite::{create_pool_with, SqliteEngine};
use tracing::{debug, info};

use crate::config::Settings;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "tablemap")]
#[command(about = "Schema-mapped SQLite table access", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Table name
    #[arg(short, long, global = true, env = "TABLEMAP_TABLE")]
    table: Option<String>,

    /// Schema file (JSON object of column specs)
    #[arg(short, long, global = true, env = "TABLEMAP_SCHEMA")]
    schema: Option<PathBuf>,

    /// Database URL (overrides configuration)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Configuration file (default: tablemap.toml in the config dir and working dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the table if it does not exist
    CreateTable,

    /// Drop the table if it exists
    DropTable,

    /// Print the CREATE TABLE statement without touching the database
    Ddl,

    /// Insert one record (JSON object) and print the stored row
    Insert {
        record: String,
    },

    /// Insert or replace records (JSON array) in one transaction
    Upsert {
        records: String,
    },

    /// Update the row with the given key
    Update {
        id: String,

        /// Properties to set (JSON object)
        record: String,
    },

    /// Update when the record carries a key, insert otherwise
    Save {
        record: String,
    },

    /// Find a row by id
    Find {
        id: String,
    },

    /// Find the first row matching a filter, e.g. '{"status_eq": "ativo"}'
    FindBy {
        filter: String,
    },

    /// List rows
    Query {
        /// Filter (JSON object of "<column>_<operator>" keys)
        #[arg(long = "where")]
        filter: Option<String>,

        /// Page number, 1-indexed; pagination applies only when set
        #[arg(short, long)]
        page: Option<u32>,

        /// Rows per page
        #[arg(short, long, default_value = "30")]
        limit: u32,

        /// ORDER BY expression
        #[arg(short, long, default_value = "id DESC")]
        order: String,

        /// Selected columns
        #[arg(long, default_value = "*")]
        columns: String,
    },

    /// Delete a row by id
    Destroy {
        id: String,
    },

    /// Delete every row
    DestroyAll,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;

    let cli = Cli::parse();

    let table = cli.table.context("Missing --table")?;
    let schema_path = cli.schema.context("Missing --schema")?;
    let columns = schema::load(&schema_path)?;

    if let Commands::Ddl = cli.command {
        println!("{}", create_table(&table, &columns));
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?.with_database_url(cli.database_url);
    debug!(database_url = %settings.database_url, table = %table, "Configuration loaded");

    let pool = create_pool_with(&settings.database_url, &settings.pool_config())
        .await
        .context("DB pool creation failed")?;
    let repository = Repository::new(Arc::new(SqliteEngine::new(pool)), table, columns);

    run(&repository, cli.command, cli.format).await
}

async fn run(repository: &Repository, command: Commands, format: OutputFormat) -> Result<()> {
    let columns = repository.columns();

    match command {
        Commands::Ddl => {
            println!("{}", create_table(repository.table_name(), columns));
        }

        Commands::CreateTable => {
            repository.create_table().await?;
            output::success(&format!("Table {} ready", repository.table_name()));
        }

        Commands::DropTable => {
            repository.drop_table().await?;
            output::success(&format!("Table {} dropped", repository.table_name()));
        }

        Commands::Insert { record } => {
            let record = parse_object(&record)?;
            let stored = repository.insert(&record).await?;
            output::print_record(stored.as_ref(), format)?;
        }

        Commands::Upsert { records } => {
            let records: Vec<ModelObject> =
                serde_json::from_str(&records).context("Records must be a JSON array of objects")?;
            let results = repository.bulk_insert_or_replace(&records).await?;
            info!(table = %repository.table_name(), records = results.len(), "Upsert committed");
            output::success(&format!("{} record(s) written", results.len()));
        }

        Commands::Update { id, record } => {
            let update = UpdateObject::new(filter::key_json(&id), parse_object(&record)?);
            let result = repository.update(update).await?;
            output::success(&format!("{} row(s) updated", result.rows_affected));
        }

        Commands::Save { record } => {
            let saved = repository.save(&parse_object(&record)?).await?;
            output::print_record(saved.as_ref(), format)?;
        }

        Commands::Find { id } => {
            let found = repository.find(filter::key_value(columns, &id)?).await?;
            output::print_record(found.as_ref(), format)?;
        }

        Commands::FindBy { filter: text } => {
            let found = repository.find_by(&filter::parse(columns, &text)?).await?;
            output::print_record(found.as_ref(), format)?;
        }

        Commands::Query {
            filter: text,
            page,
            limit,
            order,
            columns: selected,
        } => {
            let mut options = QueryOptions::new().limit(limit).order(order).columns(selected);
            if let Some(page) = page {
                if page == 0 {
                    bail!("Pages are 1-indexed");
                }
                options = options.page(page);
            }
            if let Some(text) = text {
                options = options.filter(filter::parse(columns, &text)?);
            }

            let rows = repository.query(&options).await?;
            output::print_records(&rows, format)?;
        }

        Commands::Destroy { id } => {
            repository.destroy(filter::key_value(columns, &id)?).await?;
            output::success(&format!("Row {} deleted", id));
        }

        Commands::DestroyAll => {
            repository.destroy_all().await?;
            output::success(&format!("All rows of {} deleted", repository.table_name()));
        }
    }

    Ok(())
}

fn parse_object(text: &str) -> Result<ModelObject> {
    serde_json::from_str(text).context("Record must be a JSON object")
}
