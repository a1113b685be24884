// CLI Configuration
// Layers: defaults -> tablemap.toml (user config dir, then working dir) -> TABLEMAP_* env

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tablemap_infra_sqlite::PoolConfig;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://tablemap.db";
const CONFIG_FILE: &str = "tablemap.toml";
const ENV_PREFIX: &str = "TABLEMAP";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

impl Settings {
    /// Load layered settings
    ///
    /// An explicit `config_file` must exist and replaces the file lookup.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = defaults()?;

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = user_config_file() {
                    builder = builder.add_source(File::from(path).required(false));
                }
                builder = builder.add_source(File::from(Path::new(CONFIG_FILE)).required(false));
            }
        }

        finish(builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)))
    }

    /// Command-line flag wins over every layer
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections,
            busy_timeout: Duration::from_secs(self.busy_timeout_secs),
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(config::Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("max_connections", 5_i64)?
        .set_default("busy_timeout_secs", 5_i64)?)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tablemap").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
