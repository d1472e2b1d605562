//! In-memory data source
//!
//! [`MemorySource`] serves canned rows and records every statement it is
//! asked to run. It backs the crate's own tests and is handy for testing code
//! built on the finder helpers without a database.

use crate::error::{Error, Result};
use crate::source::{Cursor, DataSource, ScanTarget, Statement};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Failures raised by [`MemorySource`], surfaced as [`Error::Source`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("no rows in result set")]
    NoRows,

    #[error("cursor is not positioned on a row")]
    NoCurrentRow,

    #[error("row has no column '{0}'")]
    MissingColumn(String),

    #[error("{0}")]
    Injected(String),
}

/// One canned row
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryRow {
    /// Values in slot order
    Positional(Vec<Value>),
    /// Values matched to slots by column name
    Named(Map<String, Value>),
}

impl MemoryRow {
    fn scan_into(&self, dest: &mut dyn ScanTarget) -> Result<()> {
        match self {
            MemoryRow::Positional(values) => dest.assign_row(values.clone()),
            MemoryRow::Named(columns) => {
                for index in 0..dest.width() {
                    let column = dest.column(index).unwrap_or_default().to_string();
                    let value = columns
                        .get(&column)
                        .cloned()
                        .ok_or_else(|| Error::from_source(MemoryError::MissingColumn(column)))?;
                    dest.assign(index, value)?;
                }
                Ok(())
            }
        }
    }
}

/// Data source answering every statement with the same rows
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: Vec<MemoryRow>,
    failure: Option<MemoryError>,
    executed: Mutex<Vec<Statement>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a positional row
    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(MemoryRow::Positional(values));
        self
    }

    /// Add a row keyed by column name
    pub fn named_row<I, K>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let columns = columns.into_iter().map(|(key, value)| (key.into(), value)).collect();
        self.rows.push(MemoryRow::Named(columns));
        self
    }

    /// Make every statement fail with `message`
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(MemoryError::Injected(message.into()));
        self
    }

    /// Statements run so far, oldest first
    pub fn executed(&self) -> Vec<Statement> {
        self.executed.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn execute(&self, statement: &Statement) -> Result<()> {
        log::debug!("MemorySource executing: {}", statement);
        self.executed.lock().unwrap_or_else(PoisonError::into_inner).push(statement.clone());
        match &self.failure {
            Some(err) => Err(Error::from_source(err.clone())),
            None => Ok(()),
        }
    }
}

impl DataSource for MemorySource {
    type Cursor = MemoryCursor;

    fn query_row(&self, statement: &Statement, dest: &mut dyn ScanTarget) -> Result<()> {
        self.execute(statement)?;
        let row = self.rows.first().ok_or_else(|| Error::from_source(MemoryError::NoRows))?;
        row.scan_into(dest)
    }

    fn query(&self, statement: &Statement) -> Result<MemoryCursor> {
        self.execute(statement)?;
        Ok(MemoryCursor { rows: self.rows.iter().cloned().collect(), current: None })
    }
}

/// Cursor over a snapshot of a [`MemorySource`]'s rows
#[derive(Debug)]
pub struct MemoryCursor {
    rows: VecDeque<MemoryRow>,
    current: Option<MemoryRow>,
}

impl MemoryCursor {
    /// Rows not yet visited
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Cursor for MemoryCursor {
    fn advance(&mut self) -> Result<bool> {
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn scan_into(&mut self, dest: &mut dyn ScanTarget) -> Result<()> {
        match &self.current {
            Some(row) => row.scan_into(dest),
            None => Err(Error::from_source(MemoryError::NoCurrentRow)),
        }
    }
}
