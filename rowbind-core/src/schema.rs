//! Field discovery
//!
//! A [`Schema`] is the ordered descriptor list of one record type under one
//! annotation namespace. It is discovered once from the type's field table and
//! shared by every [`Model`](crate::Model) built for that pair.
//!
//! Discovery walks the table depth-first in declaration order:
//!
//! - a key equal to [`SKIP`] excludes the field, embedded records included
//! - an embedded record without a key is flattened in place
//! - an embedded record with a key becomes one compound column, and must
//!   have been declared with a value accessor
//! - any other keyed field becomes one column
//! - fields without a key are left out

use crate::error::{ConfigurationError, Result};
use crate::record::{Accessor, FieldDef, Record, Shape, SKIP};
use std::collections::HashMap;
use std::sync::Arc;

/// Whether a column holds a plain value or a whole embedded record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Primitive,
    Compound,
}

/// One discovered column
#[derive(Debug)]
pub struct FieldDescriptor<T> {
    key: String,
    name: &'static str,
    kind: FieldKind,
    accessor: Accessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// Column name (the annotation key)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declared field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn accessor(&self) -> &Accessor<T> {
        &self.accessor
    }
}

struct SchemaInner<T> {
    namespace: String,
    fields: Vec<FieldDescriptor<T>>,
}

/// Immutable descriptor list for one (record type, namespace) pair
pub struct Schema<T> {
    inner: Arc<SchemaInner<T>>,
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Record> Schema<T> {
    /// Run discovery over `T`'s field table
    pub fn discover(namespace: &str) -> Result<Self> {
        if namespace.is_empty() {
            return Err(ConfigurationError::EmptyNamespace.into());
        }

        let mut fields = Vec::new();
        collect::<T>(T::fields(), namespace, &mut fields)?;
        check_unique::<T>(&fields)?;

        log::debug!(
            "Discovered {} columns for {} under '{}'",
            fields.len(),
            T::record_name(),
            namespace
        );

        Ok(Self { inner: Arc::new(SchemaInner { namespace: namespace.to_string(), fields }) })
    }
}

impl<T> Schema<T> {
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.inner.fields
    }

    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Column names in order
    pub fn columns(&self) -> Vec<&str> {
        self.inner.fields.iter().map(|f| f.key()).collect()
    }

    /// Declared field names in order
    pub fn names(&self) -> Vec<&'static str> {
        self.inner.fields.iter().map(|f| f.name()).collect()
    }

    /// Descriptor for a column name
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor<T>> {
        self.inner.fields.iter().find(|f| f.key == key)
    }

    /// Both schemas share the same discovery
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("namespace", &self.inner.namespace)
            .field("columns", &self.columns())
            .finish()
    }
}

fn collect<T: Record>(
    defs: Vec<FieldDef<T>>,
    namespace: &str,
    out: &mut Vec<FieldDescriptor<T>>,
) -> Result<()> {
    for def in defs {
        let key = def.tag(namespace).unwrap_or("");
        if key == SKIP {
            continue;
        }

        let name = def.name();
        match def.into_shape() {
            Shape::Embedded { fields, .. } if key.is_empty() => collect(fields, namespace, out)?,
            Shape::Embedded { whole: Some(accessor), .. } => out.push(FieldDescriptor {
                key: key.to_string(),
                name,
                kind: FieldKind::Compound,
                accessor,
            }),
            Shape::Embedded { whole: None, .. } => {
                return Err(ConfigurationError::CompoundWithoutValue {
                    record: T::record_name(),
                    field: name,
                    column: key.to_string(),
                }
                .into());
            }
            Shape::Value(accessor) if !key.is_empty() => out.push(FieldDescriptor {
                key: key.to_string(),
                name,
                kind: FieldKind::Primitive,
                accessor,
            }),
            Shape::Value(_) => {}
        }
    }
    Ok(())
}

fn check_unique<T: Record>(fields: &[FieldDescriptor<T>]) -> Result<()> {
    let mut seen: HashMap<&str, &'static str> = HashMap::with_capacity(fields.len());
    for field in fields {
        if let Some(first) = seen.insert(field.key(), field.name()) {
            return Err(ConfigurationError::DuplicateColumn {
                record: T::record_name(),
                column: field.key.clone(),
                first,
                second: field.name(),
            }
            .into());
        }
    }
    Ok(())
}
