//! Schema caching
//!
//! Discovery walks the whole field table and allocates one accessor per
//! column. [`SchemaCache`] keeps one [`Schema`] per (record type, namespace)
//! so building a model for every row of a hot path stays cheap.

use crate::config::MappingConfig;
use crate::error::Result;
use crate::model::Model;
use crate::record::Record;
use crate::schema::Schema;
use scc::HashMap as SccHashMap;
use std::any::{Any, TypeId};

type CacheKey = (TypeId, String);

/// Thread-safe cache of discovered schemas
#[derive(Default)]
pub struct SchemaCache {
    schemas: SccHashMap<CacheKey, Box<dyn Any + Send + Sync>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached schema for `T` under `namespace`, discovering it on first use
    pub fn schema<T: Record>(&self, namespace: &str) -> Result<Schema<T>> {
        let key = (TypeId::of::<T>(), namespace.to_string());

        let cached = self
            .schemas
            .read_sync(&key, |_, schema| schema.downcast_ref::<Schema<T>>().cloned())
            .flatten();
        if let Some(schema) = cached {
            log::trace!("Schema cache hit for {} under '{}'", T::record_name(), namespace);
            return Ok(schema);
        }

        let discovered = Schema::<T>::discover(namespace)?;
        // A concurrent discovery may have won; keep whichever was stored first.
        let entry = self
            .schemas
            .entry_sync(key)
            .or_insert_with(|| Box::new(discovered.clone()) as Box<dyn Any + Send + Sync>);
        Ok(entry.get().downcast_ref::<Schema<T>>().cloned().unwrap_or(discovered))
    }

    /// Bind `record` to its cached schema
    pub fn model<'r, T: Record>(&self, record: &'r mut T, namespace: &str) -> Result<Model<'r, T>> {
        let schema = self.schema::<T>(namespace)?;
        Ok(Model::with_schema(record, schema))
    }

    /// Bind `record` under the configured default namespace
    pub fn model_with<'r, T: Record>(
        &self,
        mapping: &MappingConfig,
        record: &'r mut T,
    ) -> Result<Model<'r, T>> {
        self.model(record, &mapping.namespace)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn clear(&self) {
        self.schemas.clear_sync();
    }
}
