//! Compile-time field tables
//!
//! A [`Record`] describes its own fields once, in declaration order. The table
//! is normally produced by `#[derive(Record)]`, but every constructor here is
//! public so a table can be written by hand:
//!
//! ```rust,ignore
//! impl Record for Bio {
//!     fn fields() -> Vec<FieldDef<Self>> {
//!         vec![
//!             FieldDef::value("name", &[("sql", "name")], Accessor::new(|b: &Self| &b.name, |b: &mut Self| &mut b.name)),
//!             FieldDef::value("surname", &[("sql", "last_name")], Accessor::new(|b: &Self| &b.surname, |b: &mut Self| &mut b.surname)),
//!         ]
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Key marking a field as excluded from a namespace
pub const SKIP: &str = "-";

type ReadFn<T> = dyn Fn(&T) -> serde_json::Result<Value> + Send + Sync;
type WriteFn<T> = dyn Fn(&mut T, Value) -> serde_json::Result<()> + Send + Sync;

/// A struct whose fields can be mapped to columns
pub trait Record: Sized + 'static {
    /// Field table in declaration order
    fn fields() -> Vec<FieldDef<Self>>;

    /// Table marker used by the finder helpers
    fn table() -> Option<&'static str> {
        None
    }

    /// Type name used in diagnostics
    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Read/write pair addressing one field inside a `T`
///
/// Values cross the accessor as [`serde_json::Value`]; writes deserialize into
/// the field's concrete type, so a mismatch is reported instead of coerced.
pub struct Accessor<T> {
    read: Arc<ReadFn<T>>,
    write: Arc<WriteFn<T>>,
}

impl<T: 'static> Accessor<T> {
    /// Build an accessor from a field projection pair
    pub fn new<F>(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: Serialize + DeserializeOwned + 'static,
    {
        Self {
            read: Arc::new(move |record: &T| serde_json::to_value(get(record))),
            write: Arc::new(move |record: &mut T, value: Value| {
                *get_mut(record) = serde_json::from_value(value)?;
                Ok(())
            }),
        }
    }

    /// Re-root this accessor under a parent struct that embeds `T`
    pub fn lift<P: 'static>(self, get: fn(&P) -> &T, get_mut: fn(&mut P) -> &mut T) -> Accessor<P> {
        let Self { read, write } = self;
        Accessor {
            read: Arc::new(move |parent: &P| read(get(parent))),
            write: Arc::new(move |parent: &mut P, value: Value| write(get_mut(parent), value)),
        }
    }

}

impl<T> Accessor<T> {
    pub fn read(&self, record: &T) -> serde_json::Result<Value> {
        (self.read)(record)
    }

    pub fn write(&self, record: &mut T, value: Value) -> serde_json::Result<()> {
        (self.write)(record, value)
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self { read: Arc::clone(&self.read), write: Arc::clone(&self.write) }
    }
}

impl<T> std::fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Accessor")
    }
}

/// What a field table entry points at
#[derive(Debug)]
pub enum Shape<T> {
    /// Plain field
    Value(Accessor<T>),
    /// Embedded record; `fields` are already re-rooted under `T`
    Embedded { whole: Option<Accessor<T>>, fields: Vec<FieldDef<T>> },
}

/// One entry of a [`Record`] field table
#[derive(Debug)]
pub struct FieldDef<T> {
    name: &'static str,
    tags: &'static [(&'static str, &'static str)],
    shape: Shape<T>,
}

impl<T: 'static> FieldDef<T> {
    /// Plain field with its `(namespace, key)` annotations
    pub fn value(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        accessor: Accessor<T>,
    ) -> Self {
        Self { name, tags, shape: Shape::Value(accessor) }
    }

    /// Embedded record without keys of its own; only ever flattened
    pub fn embedded<C: Record>(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        get: fn(&T) -> &C,
        get_mut: fn(&mut T) -> &mut C,
    ) -> Self {
        let fields = C::fields().into_iter().map(|def| def.lift(get, get_mut)).collect();
        Self { name, tags, shape: Shape::Embedded { whole: None, fields } }
    }

    /// Embedded record that can also be mapped as one compound column
    pub fn embedded_with_value<C>(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        get: fn(&T) -> &C,
        get_mut: fn(&mut T) -> &mut C,
    ) -> Self
    where
        C: Record + Serialize + DeserializeOwned,
    {
        let whole = Accessor::new(get, get_mut);
        let fields = C::fields().into_iter().map(|def| def.lift(get, get_mut)).collect();
        Self { name, tags, shape: Shape::Embedded { whole: Some(whole), fields } }
    }

    /// Re-root this entry (and any nested entries) under a parent struct
    pub fn lift<P: 'static>(self, get: fn(&P) -> &T, get_mut: fn(&mut P) -> &mut T) -> FieldDef<P> {
        let shape = match self.shape {
            Shape::Value(accessor) => Shape::Value(accessor.lift(get, get_mut)),
            Shape::Embedded { whole, fields } => Shape::Embedded {
                whole: whole.map(|accessor| accessor.lift(get, get_mut)),
                fields: fields.into_iter().map(|def| def.lift(get, get_mut)).collect(),
            },
        };
        FieldDef { name: self.name, tags: self.tags, shape }
    }
}

impl<T> FieldDef<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &Shape<T> {
        &self.shape
    }

    pub fn into_shape(self) -> Shape<T> {
        self.shape
    }

    /// Key declared for `namespace`, if any
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags.iter().find(|(ns, _)| *ns == namespace).map(|(_, key)| *key)
    }
}
