//! Error types for Rowbind
//!
//! Every fallible operation returns [`Result`]. Errors are cheap to clone so a
//! [`Model`](crate::Model) can keep the last failure around while the same
//! error is handed back to the caller.

use std::sync::Arc;

/// Boxed error coming from a data source driver
pub type SourceError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Main result type for Rowbind
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Rowbind
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// The record or its field table cannot be mapped
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A dynamic token value has no rendering
    #[error("Unsupported token: {kind} cannot be rendered")]
    UnsupportedToken { kind: &'static str },

    /// A row value could not be written into its slot
    #[error("Scan error on column '{column}': {source}")]
    Scan {
        column: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The row width does not match the number of slots
    #[error("Scan error: expected {expected} columns, row has {found}")]
    ColumnCount { expected: usize, found: usize },

    /// A decoded value could not be written into its slot
    #[error("Decode error on column '{column}': {source}")]
    Decode {
        column: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// A field value could not be turned into a [`serde_json::Value`]
    #[error("Encode error on column '{column}': {source}")]
    Encode {
        column: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// Error reported by the data source, passed through untouched
    #[error("Data source error: {0}")]
    Source(#[source] SourceError),
}

impl Error {
    /// Wrap a driver error
    pub fn from_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Source(Arc::new(err))
    }

    pub(crate) fn scan(column: &str, err: serde_json::Error) -> Self {
        Error::Scan { column: column.to_string(), source: Arc::new(err) }
    }

    pub(crate) fn decode(column: &str, err: serde_json::Error) -> Self {
        Error::Decode { column: column.to_string(), source: Arc::new(err) }
    }

    pub(crate) fn encode(column: &str, err: serde_json::Error) -> Self {
        Error::Encode { column: column.to_string(), source: Arc::new(err) }
    }

    /// Construction-time misconfiguration, as opposed to a runtime failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Malformed input to model construction
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("annotation namespace must not be empty")]
    EmptyNamespace,

    #[error("column '{column}' is declared by both '{first}' and '{second}' in {record}")]
    DuplicateColumn {
        record: &'static str,
        column: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("field '{field}' of {record} is keyed as '{column}' but has no value accessor")]
    CompoundWithoutValue {
        record: &'static str,
        field: &'static str,
        column: String,
    },

    #[error("{record} declares no table; add #[tag(table = \"...\")]")]
    MissingTable { record: &'static str },
}
