//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use rowbind_core::prelude::*;
//! ```

// === Records and models (the derive comes along with the `macros` feature) ===
pub use crate::Record;
pub use crate::cache::SchemaCache;
pub use crate::model::Model;
pub use crate::schema::{FieldKind, Schema};

// === Statements ===
pub use crate::query::{
    from, insert_into, insert_into_with, limit, offset, select, update, where_, Placeholder,
    PlaceholderStyle, Query,
};

// === Reading rows ===
pub use crate::finder::{find, first, Criteria};
pub use crate::iter::{Iter, IterState};
pub use crate::source::{Consistency, Cursor, DataSource, ScanTarget, Statement};

// === Errors and configuration ===
pub use crate::config::RowbindConfig;
pub use crate::error::Error;
