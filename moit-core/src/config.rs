//! Environment-driven configuration.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

/// Core settings shared by the server and the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path (`:memory:` for ephemeral runs).
    pub db_path: String,
    /// Base URL of the external AI agent service.
    pub agent_url: String,
    /// Directory uploaded objects are written to.
    pub upload_root: PathBuf,
    /// Public URL prefix under which uploaded objects are served back.
    pub public_upload_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: try_load("MOIT_DB_PATH", "data/moit.db"),
            agent_url: try_load("MOIT_AGENT_URL", "http://127.0.0.1:8000"),
            upload_root: PathBuf::from(try_load::<String>("MOIT_UPLOAD_DIR", "uploads")),
            public_upload_url: try_load(
                "MOIT_PUBLIC_UPLOAD_URL",
                "http://127.0.0.1:3000/uploads",
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .unwrap_or_else(|e| panic!("invalid {key} value {raw:?}: {e}"))
}
