//! Subcommand implementations
//!
//! Each module exposes a clap `Args` type and an `execute` function.

pub mod audit;
pub mod dashboard;
pub mod doc;
pub mod init;
pub mod preview;
pub mod queue;
pub mod user;

use crate::config::DocflowConfig;
use docflow_core::errors::WorkflowError;
use docflow_core::model::{ActorIdentity, UserId};
use docflow_store::{db, SqliteRepo};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Resolved settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct Runtime {
    pub config: DocflowConfig,
}

impl Runtime {
    pub fn new(config: DocflowConfig) -> Self {
        Self { config }
    }

    pub fn db_path(&self) -> &Path {
        &self.config.database.path
    }

    /// Open the configured database, creating parent directories
    pub fn connect(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        let path = self.db_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(db::open_configured(path, &self.config.store_config())?)
    }

    /// Open an existing database
    pub fn connect_existing(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        if !self.db_path().exists() {
            return Err(format!(
                "database not found at {} (run `docflow init` first)",
                self.db_path().display()
            )
            .into());
        }
        self.connect()
    }

    pub fn with_db_path(mut self, path: PathBuf) -> Self {
        self.config.database.path = path;
        self
    }
}

/// Look up a user id by username
pub fn resolve_user(
    conn: &Connection,
    username: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    SqliteRepo::find_user_by_username(conn, username)?
        .ok_or_else(|| format!("unknown user: {}", username).into())
}

/// Look up a user with their current roles
pub fn resolve_identity(
    conn: &Connection,
    username: &str,
) -> Result<ActorIdentity, Box<dyn std::error::Error>> {
    let user_id = resolve_user(conn, username)?;
    SqliteRepo::load_identity(conn, user_id)?
        .ok_or_else(|| format!("unknown user: {}", username).into())
}

/// Fail with a permission violation unless `allowed`
pub fn require(allowed: bool, username: &str, what: &str) -> CommandResult {
    if allowed {
        Ok(())
    } else {
        Err(WorkflowError::permission(format!("{} may not {}", username, what)).into())
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
