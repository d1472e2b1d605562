//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `env_logger` filter, e.g. `info` or `rowbind_core=debug`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("ROWBIND_LOG_LEVEL") {
            self.level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let bare = !self.level.contains('=') && !self.level.contains(',');
        if bare && !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            bail!("logging.level '{}' is not one of {:?}", self.level, LEVELS);
        }
        Ok(())
    }

    /// Install `env_logger` with this level; a logger already installed is kept
    pub fn init(&self) {
        let result = env_logger::Builder::new().parse_filters(&self.level).try_init();
        if result.is_err() {
            log::debug!("Logger already initialized, keeping it");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_validation() {
        assert!(LoggingConfig::default().validate().is_ok());
        assert!(LoggingConfig { level: "DEBUG".into() }.validate().is_ok());
        assert!(LoggingConfig { level: "rowbind_core=trace".into() }.validate().is_ok());
        assert!(LoggingConfig { level: "loud".into() }.validate().is_err());
    }

    #[test]
    fn test_init_twice() {
        let config = LoggingConfig { level: "warn".into() };
        config.init();
        config.init();
    }
}
