//! Runtime configuration
//!
//! Values come from command-line flags, falling back to environment
//! variables (optionally loaded from a `.env` file) and then defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{CafeError, Result};

/// Server configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "cafe_finder", version, about = "Browse, add and delete cafes")]
pub struct Config {
    /// Database URL, e.g. sqlite:///cafes.db
    #[arg(long, env = "DATABASE", default_value = "sqlite:///cafes.db")]
    pub database: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Key used to sign add-form tokens
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Directory served under /static
    #[arg(long, env = "STATIC_DIR", default_value = "./src/web/static")]
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from `.env`, the environment and the command line
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Config::parse()
    }

    /// Where the cafe table lives
    pub fn database_location(&self) -> Result<DatabaseLocation> {
        DatabaseLocation::parse(&self.database)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Resolved SQLite location
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

impl DatabaseLocation {
    /// Parse a `sqlite:` URL or a bare file path.
    ///
    /// `sqlite:///cafes.db` is relative to the working directory and
    /// `sqlite:////var/data/cafes.db` is absolute. `sqlite://` and
    /// `sqlite:///:memory:` select an in-memory database.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CafeError::Config("database URL is empty".to_string()));
        }

        let Some((scheme, rest)) = value.split_once("://") else {
            return Ok(DatabaseLocation::from_path(value));
        };

        if !scheme.eq_ignore_ascii_case("sqlite") {
            return Err(CafeError::Config(format!(
                "unsupported database scheme '{}', only sqlite is available",
                scheme
            )));
        }

        // Host part must be empty: sqlite:///path
        match rest.strip_prefix('/') {
            None if rest.is_empty() => Ok(DatabaseLocation::Memory),
            None => Err(CafeError::Config(format!(
                "malformed sqlite URL '{}', expected sqlite:///<path>",
                value
            ))),
            Some(path) => Ok(DatabaseLocation::from_path(path)),
        }
    }

    fn from_path(path: &str) -> Self {
        if path.is_empty() || path == ":memory:" {
            DatabaseLocation::Memory
        } else {
            DatabaseLocation::File(PathBuf::from(path))
        }
    }
}
