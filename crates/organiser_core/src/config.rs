//! Runtime configuration resolved from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `ORGANISER_DB_PATH` | `<temp dir>/organiser.sqlite3` |
//! | `ORGANISER_LOG_LEVEL` | [`default_log_level`] |
//! | `ORGANISER_LOCATION_TIMEOUT_MS` | 5000 |

use crate::journey::controller::DEFAULT_LOCATION_TIMEOUT;
use crate::logging::default_log_level;
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_VAR: &str = "ORGANISER_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "ORGANISER_LOG_LEVEL";
pub const LOCATION_TIMEOUT_VAR: &str = "ORGANISER_LOCATION_TIMEOUT_MS";

const DEFAULT_DB_FILE_NAME: &str = "organiser.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub location_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
        }
    }
}

impl CoreConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`; blank or malformed values
    /// keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = non_blank(DB_PATH_VAR) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(LOG_LEVEL_VAR) {
            config.log_level = level;
        }
        if let Some(raw) = non_blank(LOCATION_TIMEOUT_VAR) {
            match raw.parse::<u64>() {
                Ok(millis) if millis > 0 => config.location_timeout = Duration::from_millis(millis),
                _ => warn!("event=config_load module=config status=ignored var={LOCATION_TIMEOUT_VAR}"),
            }
        }
        config
    }
}
