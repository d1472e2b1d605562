//! Select helpers over a [`DataSource`]
//!
//! Both helpers select every column of the model from the record's declared
//! table, append the caller's conditions verbatim and pass the arguments
//! through untouched.

use crate::error::Result;
use crate::iter::Iter;
use crate::model::Model;
use crate::query::{select, Query};
use crate::record::Record;
use crate::source::{Consistency, DataSource, Statement};
use serde_json::Value;

/// Conditions, arguments and consistency for a select
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub conditions: String,
    pub args: Vec<Value>,
    pub consistency: Option<Consistency>,
}

impl Criteria {
    /// Conditions text, e.g. `WHERE id = ?`
    pub fn new(conditions: impl Into<String>) -> Self {
        Self { conditions: conditions.into(), ..Default::default() }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }
}

impl From<&str> for Criteria {
    fn from(conditions: &str) -> Self {
        Criteria::new(conditions)
    }
}

impl From<String> for Criteria {
    fn from(conditions: String) -> Self {
        Criteria::new(conditions)
    }
}

/// Load the first matching row into the model's record
///
/// Any failure is recorded on the model and returned; success clears the
/// model's last error.
pub fn first<T, S>(model: &mut Model<'_, T>, source: &S, criteria: impl Into<Criteria>) -> Result<()>
where
    T: Record,
    S: DataSource,
{
    let result = statement(model, criteria.into(), true)
        .and_then(|statement| source.query_row(&statement, &mut model.slots()));
    model.set_error(result.as_ref().err().cloned());
    result
}

/// Open a cursor over every matching row, bound to the model
pub fn find<'m, 'r, T, S>(
    model: &'m mut Model<'r, T>,
    source: &S,
    criteria: impl Into<Criteria>,
) -> Result<Iter<'m, 'r, T, S::Cursor>>
where
    T: Record,
    S: DataSource,
{
    let cursor = statement(model, criteria.into(), false).and_then(|statement| source.query(&statement));
    match cursor {
        Ok(cursor) => Ok(Iter::new(model, cursor)),
        Err(err) => {
            model.set_error(Some(err.clone()));
            Err(err)
        }
    }
}

fn statement<T: Record>(model: &Model<'_, T>, criteria: Criteria, single: bool) -> Result<Statement> {
    let mut query: Query = select(model.columns()).from(model.table()?);
    if !criteria.conditions.is_empty() {
        query = query.push(criteria.conditions);
    }
    if single {
        query = query.limit(1);
    }

    let text = query.render();
    log::trace!("Rendered statement: {} ({} args)", text, criteria.args.len());

    Ok(Statement { text, args: criteria.args, consistency: criteria.consistency })
}
