//! Mapping configuration

use crate::query::{Placeholder, PlaceholderStyle};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Annotation namespace used by `Model::from_config` and `SchemaCache::model_with`
    pub namespace: String,
    pub placeholder: PlaceholderStyle,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self { namespace: "sql".to_string(), placeholder: PlaceholderStyle::QuestionMark }
    }
}

impl MappingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(namespace) = lookup("ROWBIND_NAMESPACE") {
            self.namespace = namespace;
        }
        if let Some(style) = lookup("ROWBIND_PLACEHOLDER") {
            match style.parse() {
                Ok(style) => self.placeholder = style,
                Err(err) => log::warn!("Ignoring ROWBIND_PLACEHOLDER: {}", err),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            bail!("mapping.namespace must not be empty");
        }
        Ok(())
    }

    /// Placeholder strategy for statement building
    pub fn placeholder(&self) -> &dyn Placeholder {
        &self.placeholder
    }
}
