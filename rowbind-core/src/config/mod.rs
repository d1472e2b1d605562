//! Configuration system for Rowbind
//!
//! Values are resolved in the following order (highest priority wins):
//!
//! 1. **Environment Variables** (`ROWBIND_*`)
//! 2. **Config File** (rowbind.toml)
//! 3. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use rowbind_core::config::RowbindConfig;
//!
//! let config = RowbindConfig::load()?;
//! config.validate()?;
//! config.logging.init();
//!
//! let cache = rowbind_core::SchemaCache::new();
//! let placeholder = config.mapping.placeholder();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;
pub mod mapping;

pub use logging::LoggingConfig;
pub use mapping::MappingConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete Rowbind configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowbindConfig {
    pub mapping: MappingConfig,
    pub logging: LoggingConfig,
}

impl RowbindConfig {
    /// Load configuration with full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from("rowbind.toml")
    }

    /// Load configuration from a specific file, falling back to defaults if it is absent
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.mapping.merge(other.mapping);
        self.logging.merge(other.logging);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply variables from an arbitrary lookup
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.mapping.apply_vars(&lookup);
        self.logging.apply_vars(&lookup);
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.mapping.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
