//! Layered configuration
//!
//! Precedence, lowest first:
//! 1. built-in defaults
//! 2. `docflow.toml` in the working directory, or the file given with `--config`
//! 3. environment variables prefixed `DOCFLOW_`, nested with `__`
//!    (e.g. `DOCFLOW_DATABASE__BUSY_TIMEOUT_MS=250`)

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use docflow_core::execution::ExecutionSource;
use docflow_core::logging_facility::Profile;
use docflow_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DocflowConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// Lock wait bound for writers
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `development` or `production`
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Source tag recorded in execution contexts
    pub source: String,
}

impl Default for DocflowConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from(".docflow/docflow.db"),
                busy_timeout_ms: 5_000,
            },
            logging: LoggingConfig {
                profile: "development".to_string(),
            },
            engine: EngineConfig {
                source: "cli".to_string(),
            },
        }
    }
}

impl DocflowConfig {
    /// Load configuration from all layers
    ///
    /// An explicit `config_file` must exist; the default `docflow.toml` is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("docflow").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("DOCFLOW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("failed to read configuration")?;
        let loaded: DocflowConfig = config
            .try_deserialize()
            .context("invalid configuration")?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load `.env` if present
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.profile()?;
        self.source()?;
        Ok(())
    }

    pub fn profile(&self) -> Result<Profile> {
        self.logging
            .profile
            .parse()
            .map_err(|e| anyhow::anyhow!("logging.profile: {}", e))
    }

    pub fn source(&self) -> Result<ExecutionSource> {
        self.engine
            .source
            .parse()
            .map_err(|e| anyhow::anyhow!("engine.source: {}", e))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            busy_timeout: Duration::from_millis(self.database.busy_timeout_ms),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
