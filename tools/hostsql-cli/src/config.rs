///
/// # Configuration
///
/// Optional `hostsql.toml` settings. Every section and key may be omitted;
/// missing values fall back to the defaults below, and command-line flags
/// override whatever the file sets.
///
/// ```toml
/// [connection]
/// read_only = false
/// busy_timeout_ms = 5000
/// create = true
///
/// [output]
/// format = "table"
///
/// [log]
/// level = "warn"
/// ```
///

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::Level;

use hostsql_sqlite3::OpenOptions;

use crate::errors::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "hostsql.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub read_only: bool,
    pub busy_timeout_ms: Option<u64>,
    pub create: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            busy_timeout_ms: None,
            create: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Raise the level by one step per `-v` flag, saturating at trace.
    pub fn raised(self, verbosity: u8) -> Self {
        const ORDER: [LogLevel; 5] = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let current = ORDER.iter().position(|l| *l == self).unwrap_or(1);
        ORDER[(current + verbosity as usize).min(ORDER.len() - 1)]
    }

    pub fn to_tracing(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl ConnectionConfig {
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            read_only: self.read_only,
            create: self.create,
            busy_timeout: self.busy_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Load the config at `explicit`, or `hostsql.toml` in `dir` when it exists.
/// An explicitly named file must exist; the default one is optional.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = dir.join(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(Config::default());
            }
            default
        }
    };
    let content = std::fs::read_to_string(&path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    parse_config_str(&content, path)
}

pub fn parse_config_str(content: &str, path: PathBuf) -> Result<Config, CliError> {
    toml::from_str(content).map_err(|source| CliError::Config { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Config {
        parse_config_str(content, PathBuf::from(DEFAULT_CONFIG_FILE))
            .expect("Failed to parse config")
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[connection]
read_only = true
busy_timeout_ms = 2500
create = false

[output]
format = "json"

[log]
level = "debug"
"#,
        );

        assert!(config.connection.read_only);
        assert_eq!(config.connection.busy_timeout_ms, Some(2500));
        assert!(!config.connection.create);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(
            config.connection.open_options(),
            OpenOptions {
                read_only: true,
                create: false,
                busy_timeout: Some(Duration::from_millis(2500)),
            }
        );
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config, Config::default());
        assert!(config.connection.create);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert_eq!(config.log.level, LogLevel::Warn);
        assert_eq!(config.connection.open_options(), OpenOptions::default());
    }

    #[test]
    fn test_parse_partial_section() {
        let config = parse("[connection]\nbusy_timeout_ms = 10\n");
        assert!(!config.connection.read_only);
        assert!(config.connection.create);
        assert_eq!(config.connection.busy_timeout_ms, Some(10));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let err = parse_config_str("[output]\nformat = \"csv\"\n", PathBuf::from("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_default_file_when_present() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        assert_eq!(load_config(None, temp_dir.path()).unwrap(), Config::default());

        std::fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            "[output]\nformat = \"json\"\n",
        )
        .unwrap();
        let config = load_config(None, temp_dir.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("nope.toml");
        let err = load_config(Some(&missing), temp_dir.path()).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(LogLevel::Warn.raised(0), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.raised(1), LogLevel::Info);
        assert_eq!(LogLevel::Warn.raised(2), LogLevel::Debug);
        assert_eq!(LogLevel::Error.raised(9), LogLevel::Trace);
        assert_eq!(LogLevel::Trace.to_tracing(), Level::TRACE);
    }
}
