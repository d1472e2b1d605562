//! Data source boundary
//!
//! Rowbind never talks to a database itself. A driver adapter implements
//! [`DataSource`] and [`Cursor`]; the engine only hands it rendered
//! [`Statement`]s and [`ScanTarget`]s to fill.

use crate::error::{Error, Result};
use serde_json::Value;

/// Something a row can be scanned into, column by column
pub trait ScanTarget {
    /// Number of slots
    fn width(&self) -> usize;

    /// Column name of a slot
    fn column(&self, index: usize) -> Option<&str>;

    /// Overwrite one slot
    fn assign(&mut self, index: usize, value: Value) -> Result<()>;

    /// Overwrite every slot from a full row, in order
    fn assign_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.width() {
            return Err(Error::ColumnCount { expected: self.width(), found: row.len() });
        }
        for (index, value) in row.into_iter().enumerate() {
            self.assign(index, value)?;
        }
        Ok(())
    }
}

/// Forward-only row cursor returned by a [`DataSource`]
pub trait Cursor {
    /// Move to the next row; `false` once there are no more rows
    fn advance(&mut self) -> Result<bool>;

    /// Scan the current row into `dest`
    fn scan_into(&mut self, dest: &mut dyn ScanTarget) -> Result<()>;
}

/// Executes rendered statements
pub trait DataSource {
    type Cursor: Cursor;

    /// Run a statement expected to yield one row and scan it into `dest`
    fn query_row(&self, statement: &Statement, dest: &mut dyn ScanTarget) -> Result<()>;

    /// Run a statement and return a cursor over its rows
    fn query(&self, statement: &Statement) -> Result<Self::Cursor>;
}

/// Consistency level forwarded to the data source as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Consistency {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
}

impl std::fmt::Display for Consistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Consistency::Any => "ANY",
            Consistency::One => "ONE",
            Consistency::Two => "TWO",
            Consistency::Three => "THREE",
            Consistency::Quorum => "QUORUM",
            Consistency::All => "ALL",
            Consistency::LocalQuorum => "LOCAL_QUORUM",
            Consistency::EachQuorum => "EACH_QUORUM",
            Consistency::LocalOne => "LOCAL_ONE",
        };
        f.write_str(name)
    }
}

/// Rendered statement text plus its out-of-band arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub args: Vec<Value>,
    pub consistency: Option<Consistency>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), args: Vec::new(), consistency: None }
    }

    /// Append one positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Replace all positional arguments
    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
