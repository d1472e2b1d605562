//! Single-pass result iteration
//!
//! An [`Iter`] drives a [`Cursor`] and scans each row into the slots of a bound
//! [`Model`], so after every successful [`Iter::advance`] the caller's record
//! holds the current row. Failures are recorded on the model instead of being
//! returned from `advance`.

use crate::error::Error;
use crate::model::Model;
use crate::record::Record;
use crate::source::Cursor;

/// Iteration progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
    /// Bound, nothing read yet
    Ready,
    /// The record holds a row
    Advanced,
    /// No more rows
    Exhausted,
    /// Stopped on an error, see [`Model::last_error`]
    Failed,
}

impl IterState {
    pub fn is_done(self) -> bool {
        matches!(self, IterState::Exhausted | IterState::Failed)
    }
}

/// Row iterator bound to one model and one cursor
pub struct Iter<'m, 'r, T: Record, C: Cursor> {
    model: &'m mut Model<'r, T>,
    cursor: C,
    state: IterState,
}

impl<'m, 'r, T: Record, C: Cursor> Iter<'m, 'r, T, C> {
    /// Bind `cursor` to `model`; any error left from a previous read is cleared
    pub fn new(model: &'m mut Model<'r, T>, cursor: C) -> Self {
        model.set_error(None);
        Self { model, cursor, state: IterState::Ready }
    }

    /// Move to the next row and scan it into the record
    ///
    /// Returns `false` when rows run out or on failure; the two cases are
    /// told apart by [`Iter::state`] or [`Iter::error`]. Once done, further
    /// calls return `false` without touching the cursor.
    pub fn advance(&mut self) -> bool {
        if self.state.is_done() {
            return false;
        }

        match self.cursor.advance() {
            Ok(true) => {}
            Ok(false) => {
                log::trace!("Cursor exhausted for {}", T::record_name());
                self.state = IterState::Exhausted;
                return false;
            }
            Err(err) => return self.fail(err),
        }

        let mut slots = self.model.slots();
        match self.cursor.scan_into(&mut slots) {
            Ok(()) => {
                self.state = IterState::Advanced;
                true
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: Error) -> bool {
        log::debug!("Iteration over {} failed: {}", T::record_name(), err);
        self.model.set_error(Some(err));
        self.state = IterState::Failed;
        false
    }

    pub fn state(&self) -> IterState {
        self.state
    }

    pub fn error(&self) -> Option<&Error> {
        self.model.last_error()
    }

    pub fn record(&self) -> &T {
        self.model.record()
    }

    pub fn model(&self) -> &Model<'r, T> {
        self.model
    }

    pub fn model_mut(&mut self) -> &mut Model<'r, T> {
        self.model
    }

    /// Release the model and hand back the cursor
    pub fn into_cursor(self) -> C {
        self.cursor
    }
}

impl<T: Record, C: Cursor> std::fmt::Debug for Iter<'_, '_, T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter").field("model", &self.model).field("state", &self.state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::record::{Accessor, FieldDef};
    use crate::source::ScanTarget;
    use serde_json::{json, Value};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Row {
        id: i64,
        name: String,
    }

    impl Record for Row {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::value(
                    "id",
                    &[("sql", "id")],
                    Accessor::new(|r: &Self| &r.id, |r: &mut Self| &mut r.id),
                ),
                FieldDef::value(
                    "name",
                    &[("sql", "name")],
                    Accessor::new(|r: &Self| &r.name, |r: &mut Self| &mut r.name),
                ),
            ]
        }
    }

    #[derive(Default)]
    struct Scripted {
        rows: VecDeque<Vec<Value>>,
        current: Option<Vec<Value>>,
        advances: usize,
        scans: usize,
    }

    impl Scripted {
        fn new(rows: Vec<Vec<Value>>) -> Self {
            Self { rows: rows.into(), ..Default::default() }
        }
    }

    impl Cursor for Scripted {
        fn advance(&mut self) -> Result<bool> {
            self.advances += 1;
            self.current = self.rows.pop_front();
            Ok(self.current.is_some())
        }

        fn scan_into(&mut self, dest: &mut dyn ScanTarget) -> Result<()> {
            self.scans += 1;
            dest.assign_row(self.current.clone().unwrap_or_default())
        }
    }

    #[test]
    fn test_rows_land_in_record() {
        let mut row = Row::default();
        let mut model = Model::new(&mut row, "sql").unwrap();
        let cursor = Scripted::new(vec![vec![json!(1), json!("a")], vec![json!(2), json!("b")]]);

        let mut iter = Iter::new(&mut model, cursor);
        assert_eq!(iter.state(), IterState::Ready);

        let mut seen = Vec::new();
        while iter.advance() {
            seen.push((iter.record().id, iter.record().name.clone()));
        }

        assert_eq!(seen, vec![(1, "a".to_string()), (2, "b".to_string())]);
        assert_eq!(iter.state(), IterState::Exhausted);
        assert!(iter.error().is_none());
        assert_eq!(iter.record().id, 2);
    }

    #[test]
    fn test_exhausted_does_not_touch_cursor() {
        let mut row = Row::default();
        let mut model = Model::new(&mut row, "sql").unwrap();

        let mut iter = Iter::new(&mut model, Scripted::new(vec![vec![json!(7), json!("x")]]));
        assert!(iter.advance());
        assert!(!iter.advance());
        assert!(!iter.advance());
        assert!(!iter.advance());

        let cursor = iter.into_cursor();
        assert_eq!(cursor.advances, 2);
        assert_eq!(cursor.scans, 1);
        assert_eq!(row.id, 7);
    }

    #[test]
    fn test_scan_failure_recorded_on_model() {
        let mut row = Row::default();
        let mut model = Model::new(&mut row, "sql").unwrap();
        let cursor = Scripted::new(vec![
            vec![json!(1), json!("ok")],
            vec![json!("bad"), json!("row")],
            vec![json!(3), json!("never")],
        ]);

        let mut iter = Iter::new(&mut model, cursor);
        assert!(iter.advance());
        assert!(!iter.advance());
        assert_eq!(iter.state(), IterState::Failed);
        assert!(!iter.advance());

        let cursor = iter.into_cursor();
        assert_eq!(cursor.rows.len(), 1);
        assert!(matches!(model.last_error(), Some(Error::Scan { column, .. }) if column == "id"));
    }

    #[test]
    fn test_new_iteration_clears_previous_error() {
        let mut row = Row::default();
        let mut model = Model::new(&mut row, "sql").unwrap();

        let mut iter = Iter::new(&mut model, Scripted::new(vec![vec![json!(1)]]));
        assert!(!iter.advance());
        assert!(matches!(iter.error(), Some(Error::ColumnCount { expected: 2, found: 1 })));

        let iter = Iter::new(&mut model, Scripted::new(vec![]));
        assert!(iter.error().is_none());
    }
}
