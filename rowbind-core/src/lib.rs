//! Rowbind - Core
//!
//! Struct-to-row mapping for Rust records.
//!
//! # Overview
//!
//! Rowbind maps the fields of a plain struct to ordered database columns. You
//! annotate fields with a key per namespace (`sql`, `cql`, ...) and Rowbind
//! discovers the columns, reads their values, scans result rows back into the
//! struct and decodes loose maps into it. It never talks to a database itself;
//! a driver plugs in through the [`DataSource`] and [`Cursor`] traits.
//!
//! # Quick Start
//!
//! ```toml,ignore
//! [dependencies]
//! rowbind-core = "0.1"
//! ```
//!
//! ```rust,ignore
//! use rowbind_core::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Record, Default)]
//! struct Bio {
//!     #[tag(sql = "name")]
//!     name: String,
//!     #[tag(sql = "last_name")]
//!     surname: String,
//! }
//!
//! #[derive(Record, Default)]
//! #[tag(table = "users")]
//! struct User {
//!     #[tag(sql = "id")]
//!     id: i64,
//!     #[tag(flatten)]
//!     bio: Bio,
//! }
//!
//! let mut user = User::default();
//! let mut model = Model::new(&mut user, "sql")?;
//! first(&mut model, &source, Criteria::new("WHERE id = ?").arg(9))?;
//! println!("{}", model.record().bio.name);
//! ```
//!
//! # Architecture
//!
//! - [`record`] - Field tables generated by `#[derive(Record)]`
//! - [`schema`] - Column discovery per annotation namespace
//! - [`model`] - A schema bound to one live record
//! - [`query`] - Statement token assembly
//! - [`iter`] - Cursor-driven row iteration
//! - [`finder`] - `first` / `find` helpers over a [`DataSource`]
//! - [`cache`] - Shared discovery cache
//! - [`memory`] - In-memory data source

pub mod cache;
pub mod config; // Configuration system with TOML support
pub mod error;
pub mod finder;
pub mod iter;
pub mod memory;
pub mod model;
pub mod query;
pub mod record;
pub mod schema;
pub mod source;

// Re-export derive macros
#[cfg(feature = "macros")]
pub use rowbind_macros::Record;

pub mod prelude;

pub use cache::SchemaCache;
pub use error::{ConfigurationError, Error, Result};
pub use finder::{find, first, Criteria};
pub use iter::{Iter, IterState};
pub use model::{Model, Slots};
pub use query::{Placeholder, PlaceholderStyle, Query, Token};
pub use record::{Accessor, FieldDef, Record, Shape};
pub use schema::{FieldDescriptor, FieldKind, Schema};
pub use source::{Consistency, Cursor, DataSource, ScanTarget, Statement};
