///
/// CLI error types.
///
/// Everything that can stop a `hostsql` invocation: unreadable or invalid
/// config files, malformed parameter batches, and failures reported by the
/// bridge itself.
///

use std::path::PathBuf;
use thiserror::Error;

use hostsql_core::RecordError;
use hostsql_sqlite3::BridgeError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config at {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid parameter JSON: {0}")]
    ParamsJson(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    Params(String),

    #[error("Invalid parameters: {0}")]
    Record(#[from] RecordError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
