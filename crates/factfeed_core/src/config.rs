//! Runtime configuration loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Page size and text length limits are fixed by the feed and are not
//! configurable here.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "factfeed.sqlite3";

/// Configuration load failure.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

/// Feed runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// SQLite file backing the local gateway.
    pub db_path: PathBuf,
    /// One of trace|debug|info|warn|error.
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl FeedConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, FeedConfig};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn empty_document_yields_defaults() {
        let config = FeedConfig::from_toml_str("").unwrap();
        assert_eq!(config, FeedConfig::default());
        assert_eq!(config.db_path, PathBuf::from("factfeed.sqlite3"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn fields_override_defaults() {
        let config = FeedConfig::from_toml_str(
            "db_path = \"/var/lib/factfeed/facts.db\"\nlog_level = \"warn\"\nlog_dir = \"/var/log/factfeed\"\n",
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/factfeed/facts.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/factfeed")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = FeedConfig::from_toml_str("page_size = 100").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"error\"").unwrap();
        let config = FeedConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, "error");

        let err = FeedConfig::load("/nonexistent/factfeed.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
