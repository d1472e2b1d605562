//! Record models
//!
//! A [`Model`] binds a discovered [`Schema`] to one live record. Every read
//! goes to the record at call time, and every write (scan, decode) lands in
//! the record's own fields, so the caller observes mutations directly.
//!
//! # Example
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
//! struct Person {
//!     #[tag(sql = "id")]
//!     id: i64,
//!     #[tag(flatten)]
//!     bio: Bio,
//! }
//!
//! let mut person = Person::default();
//! let model = Model::new(&mut person, "sql")?;
//! assert_eq!(model.columns(), vec!["id", "name", "last_name"]);
//! ```

use crate::config::MappingConfig;
use crate::error::{ConfigurationError, Error, Result};
use crate::record::Record;
use crate::schema::{FieldDescriptor, Schema};
use crate::source::ScanTarget;
use serde_json::Value;
use std::collections::HashMap;

/// A schema bound to one mutable record
pub struct Model<'r, T: Record> {
    record: &'r mut T,
    schema: Schema<T>,
    last_error: Option<Error>,
}

impl<'r, T: Record> Model<'r, T> {
    /// Discover `T` under `namespace` and bind it to `record`
    pub fn new(record: &'r mut T, namespace: &str) -> Result<Self> {
        let schema = Schema::discover(namespace)?;
        Ok(Self::with_schema(record, schema))
    }

    /// Discover `T` under the configured default namespace
    pub fn from_config(record: &'r mut T, mapping: &MappingConfig) -> Result<Self> {
        Self::new(record, &mapping.namespace)
    }

    /// Bind an already discovered schema
    pub fn with_schema(record: &'r mut T, schema: Schema<T>) -> Self {
        Self { record, schema, last_error: None }
    }

    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    pub fn namespace(&self) -> &str {
        self.schema.namespace()
    }

    pub fn len(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        self.schema.fields()
    }

    /// Column names (annotation keys) in order
    pub fn columns(&self) -> Vec<&str> {
        self.schema.columns()
    }

    /// Declared field names in order
    pub fn names(&self) -> Vec<&'static str> {
        self.schema.names()
    }

    /// Table declared by the record type
    pub fn table(&self) -> Result<&'static str> {
        T::table().ok_or_else(|| ConfigurationError::MissingTable { record: T::record_name() }.into())
    }

    /// Current values, read fresh from the record
    pub fn values(&self) -> Result<Vec<Value>> {
        self.schema
            .fields()
            .iter()
            .map(|field| {
                field.accessor().read(self.record).map_err(|e| Error::encode(field.key(), e))
            })
            .collect()
    }

    /// Current value of one column
    pub fn value(&self, column: &str) -> Result<Option<Value>> {
        match self.schema.field(column) {
            Some(field) => field
                .accessor()
                .read(self.record)
                .map(Some)
                .map_err(|e| Error::encode(field.key(), e)),
            None => Ok(None),
        }
    }

    /// Column name to current value
    pub fn as_map(&self) -> Result<HashMap<String, Value>> {
        let values = self.values()?;
        Ok(self.schema.columns().into_iter().map(str::to_string).zip(values).collect())
    }

    /// Writable slot view, one slot per column
    pub fn slots(&mut self) -> Slots<'_, T> {
        Slots { record: &mut *self.record, fields: self.schema.fields() }
    }

    /// Write a full row into the slots, in column order
    pub fn scan(&mut self, row: Vec<Value>) -> Result<()> {
        self.slots().assign_row(row)
    }

    /// Write matching entries into the record
    ///
    /// Entries are applied in iteration order and the first value that does
    /// not fit its field aborts the call. Writes made before the failure are
    /// kept. Keys without a column are ignored.
    pub fn decode<I, K>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (key, value) in entries {
            let Some(field) = self.schema.field(key.as_ref()) else {
                continue;
            };
            field.accessor().write(self.record, value).map_err(|e| Error::decode(field.key(), e))?;
        }
        Ok(())
    }

    pub fn record(&self) -> &T {
        self.record
    }

    pub fn record_mut(&mut self) -> &mut T {
        self.record
    }

    /// Last failure recorded by a read path (iterator or finder)
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<Error> {
        self.last_error.take()
    }

    pub(crate) fn set_error(&mut self, err: Option<Error>) {
        self.last_error = err;
    }
}

impl<T: Record> std::fmt::Debug for Model<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("record", &T::record_name())
            .field("schema", &self.schema)
            .field("last_error", &self.last_error)
            .finish()
    }
}

/// Writable view over a model's fields
pub struct Slots<'a, T> {
    record: &'a mut T,
    fields: &'a [FieldDescriptor<T>],
}

impl<T> Slots<'_, T> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> ScanTarget for Slots<'_, T> {
    fn width(&self) -> usize {
        self.fields.len()
    }

    fn column(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.key())
    }

    fn assign(&mut self, index: usize, value: Value) -> Result<()> {
        let Some(field) = self.fields.get(index) else {
            return Err(Error::ColumnCount { expected: self.fields.len(), found: index + 1 });
        };
        field.accessor().write(self.record, value).map_err(|e| Error::scan(field.key(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Accessor, FieldDef};
    use serde_json::json;

    #[derive(Default)]
    struct Bio {
        name: String,
        surname: String,
    }

    impl Record for Bio {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::value(
                    "name",
                    &[("tag", "name")],
                    Accessor::new(|b: &Self| &b.name, |b: &mut Self| &mut b.name),
                ),
                FieldDef::value(
                    "surname",
                    &[("tag", "last_name")],
                    Accessor::new(|b: &Self| &b.surname, |b: &mut Self| &mut b.surname),
                ),
            ]
        }
    }

    #[derive(Default)]
    struct Person {
        id: i64,
        bio: Bio,
    }

    impl Record for Person {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::value(
                    "id",
                    &[("tag", "id")],
                    Accessor::new(|p: &Self| &p.id, |p: &mut Self| &mut p.id),
                ),
                FieldDef::embedded("bio", &[], |p: &Self| &p.bio, |p: &mut Self| &mut p.bio),
            ]
        }
    }

    fn stan() -> Person {
        Person { id: 9, bio: Bio { name: "Stan".into(), surname: "Smith".into() } }
    }

    #[test]
    fn test_values_follow_live_record() {
        let mut person = stan();
        let mut model = Model::new(&mut person, "tag").unwrap();

        assert_eq!(model.columns(), vec!["id", "name", "last_name"]);
        assert_eq!(model.values().unwrap(), vec![json!(9), json!("Stan"), json!("Smith")]);

        model.record_mut().bio.name = "Francine".into();
        assert_eq!(model.values().unwrap(), vec![json!(9), json!("Francine"), json!("Smith")]);
    }

    #[test]
    fn test_projections_have_equal_length() {
        let mut person = stan();
        let mut model = Model::new(&mut person, "tag").unwrap();

        let columns = model.columns().len();
        assert_eq!(model.values().unwrap().len(), columns);
        assert_eq!(model.names().len(), columns);
        assert_eq!(model.slots().len(), columns);
    }

    #[test]
    fn test_as_map_and_single_value() {
        let mut person = stan();
        let model = Model::new(&mut person, "tag").unwrap();

        let map = model.as_map().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["last_name"], json!("Smith"));
        assert_eq!(model.value("id").unwrap(), Some(json!(9)));
        assert_eq!(model.value("missing").unwrap(), None);
    }

    #[test]
    fn test_scan_writes_through_slots() {
        let mut person = Person::default();
        {
            let mut model = Model::new(&mut person, "tag").unwrap();
            model.scan(vec![json!(1), json!("Roger"), json!("Smith")]).unwrap();
        }
        assert_eq!(person.id, 1);
        assert_eq!(person.bio.name, "Roger");
        assert_eq!(person.bio.surname, "Smith");
    }

    fn assign_first<T>(slots: &mut Slots<'_, T>, value: Value) -> Result<()> {
        slots.assign(0, value)
    }

    #[test]
    fn test_slots_assign_by_index() {
        let mut person = Person::default();
        {
            let mut model = Model::new(&mut person, "tag").unwrap();
            let mut slots = model.slots();
            assert_eq!(slots.column(2), Some("last_name"));
            assert_eq!(slots.column(3), None);

            assign_first(&mut slots, json!(12)).unwrap();
            slots.assign(2, json!("Smith")).unwrap();
            assert!(matches!(
                slots.assign(3, json!("extra")),
                Err(Error::ColumnCount { expected: 3, found: 4 })
            ));
        }
        assert_eq!(person.id, 12);
        assert_eq!(person.bio.surname, "Smith");
    }

    #[test]
    fn test_scan_type_mismatch_names_column() {
        let mut person = Person::default();
        let mut model = Model::new(&mut person, "tag").unwrap();

        let err = model.scan(vec![json!("nine"), json!("Stan"), json!("Smith")]).unwrap_err();
        match err {
            Error::Scan { column, .. } => assert_eq!(column, "id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let mut person = stan();
        let mut model = Model::new(&mut person, "tag").unwrap();

        model.decode([("last_name", json!("Jones")), ("nickname", json!("Stanny"))]).unwrap();
        assert_eq!(model.record().bio.surname, "Jones");
        assert_eq!(model.record().bio.name, "Stan");
    }

    #[test]
    fn test_decode_keeps_writes_before_failure() {
        let mut person = stan();
        let mut model = Model::new(&mut person, "tag").unwrap();

        let err = model
            .decode([("name", json!("Hayley")), ("id", json!("x")), ("last_name", json!("Jones"))])
            .unwrap_err();

        assert!(matches!(err, Error::Decode { ref column, .. } if column == "id"));
        assert_eq!(model.record().bio.name, "Hayley");
        assert_eq!(model.record().id, 9);
        assert_eq!(model.record().bio.surname, "Smith");
    }

    #[test]
    fn test_decode_after_read_is_noop() {
        let mut person = stan();
        let mut model = Model::new(&mut person, "tag").unwrap();

        let before = model.as_map().unwrap();
        for (key, value) in before.clone() {
            model.decode([(key, value)]).unwrap();
        }
        assert_eq!(model.as_map().unwrap(), before);
    }

    #[test]
    fn test_from_config_uses_default_namespace() {
        let mut person = stan();
        let mapping = MappingConfig { namespace: "tag".into(), ..Default::default() };

        let model = Model::from_config(&mut person, &mapping).unwrap();
        assert_eq!(model.namespace(), "tag");
        assert_eq!(model.columns(), vec!["id", "name", "last_name"]);

        let mapping = MappingConfig::default();
        assert!(Model::from_config(&mut person, &mapping).unwrap().is_empty());
    }

    #[test]
    fn test_table_missing() {
        let mut person = Person::default();
        let model = Model::new(&mut person, "tag").unwrap();

        let err = model.table().unwrap_err();
        assert!(err.is_configuration());
    }
}
