//! Runtime configuration read from environment variables.
//!
//! | Variable              | Default          |
//! |-----------------------|------------------|
//! | `CMS_DB_PATH`         | required         |
//! | `CMS_STATE_DIR`       | required         |
//! | `CMS_LOG_LEVEL`       | build-mode level |
//! | `CMS_LOG_DIR`         | unset (no logs)  |
//! | `CMS_BUSY_TIMEOUT_MS` | `5000`           |

use crate::db::DEFAULT_BUSY_TIMEOUT;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "CMS_DB_PATH";
pub const ENV_STATE_DIR: &str = "CMS_STATE_DIR";
pub const ENV_LOG_LEVEL: &str = "CMS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CMS_LOG_DIR";
pub const ENV_BUSY_TIMEOUT_MS: &str = "CMS_BUSY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required environment variable `{key}`"),
            Self::Invalid { key, value, reason } => {
                write!(f, "invalid value `{value}` for `{key}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsConfig {
    /// SQLite database file holding every collection.
    pub db_path: PathBuf,
    /// Directory for local state such as the persisted session slot.
    pub state_dir: PathBuf,
    pub log_level: String,
    /// Rolling log directory. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Longest wait on a locked database before reporting the backend as
    /// unavailable.
    pub busy_timeout: Duration,
}

impl CmsConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = non_empty(ENV_DB_PATH)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(ENV_DB_PATH))?;
        let state_dir = non_empty(ENV_STATE_DIR)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(ENV_STATE_DIR))?;
        let log_level =
            non_empty(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = non_empty(ENV_LOG_DIR).map(PathBuf::from);

        let busy_timeout = match non_empty(ENV_BUSY_TIMEOUT_MS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|err| ConfigError::Invalid {
                    key: ENV_BUSY_TIMEOUT_MS,
                    value: raw.clone(),
                    reason: err.to_string(),
                })?,
            None => DEFAULT_BUSY_TIMEOUT,
        };

        Ok(Self {
            db_path,
            state_dir,
            log_level,
            log_dir,
            busy_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CmsConfig, ConfigError, ENV_BUSY_TIMEOUT_MS, ENV_DB_PATH, ENV_STATE_DIR};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_database_path_is_reported() {
        let err = CmsConfig::from_lookup(lookup(&[(ENV_STATE_DIR, "/tmp/cms")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_DB_PATH));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = CmsConfig::from_lookup(lookup(&[(ENV_DB_PATH, "cms.db"), (ENV_STATE_DIR, " ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_STATE_DIR));
    }

    #[test]
    fn defaults_apply_and_timeout_parses() {
        let config = CmsConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "cms.db"),
            (ENV_STATE_DIR, "/tmp/cms"),
            (ENV_BUSY_TIMEOUT_MS, "250"),
        ]))
        .expect("config");

        assert_eq!(config.db_path, PathBuf::from("cms.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = CmsConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "cms.db"),
            (ENV_STATE_DIR, "/tmp/cms"),
            (ENV_BUSY_TIMEOUT_MS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == ENV_BUSY_TIMEOUT_MS));
    }
}
