//! In-memory cache of built schemas, one per record type
//!
//! A schema depends only on the record's static declaration, so it is
//! built on first use and shared afterwards. Build failures are returned
//! to the caller every time and never cached.

use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::errors::SchemaResult;
use super::record::Record;
use super::validator::Schema;
use crate::config::ValidatorConfig;

type ErasedSchema = Arc<dyn Any + Send + Sync>;

/// Type-keyed registry of built schemas
#[derive(Default)]
pub struct SchemaRegistry {
    config: ValidatorConfig,
    schemas: RwLock<HashMap<TypeId, ErasedSchema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry using the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose schemas use `config`
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Configuration used for every schema built here
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns the cached schema of `T`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns the `SchemaError` from building `T`'s schema.
    pub fn get_or_build<T: Record>(&self) -> SchemaResult<Arc<Schema<T>>> {
        if let Some(schema) = self.get::<T>() {
            return Ok(schema);
        }

        let built = Arc::new(Schema::<T>::build_with(&self.config)?);
        let erased: ErasedSchema = built.clone();

        let (entry, inserted) = self.insert_first(TypeId::of::<T>(), erased);
        if inserted {
            debug!(event = "SCHEMA_CACHED", record = type_name::<T>());
        }

        Ok(entry.downcast::<Schema<T>>().unwrap_or(built))
    }

    /// Stores `schema` unless another caller raced us here; returns the
    /// entry that landed first and whether it was ours
    fn insert_first(&self, key: TypeId, schema: ErasedSchema) -> (ErasedSchema, bool) {
        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        match schemas.entry(key) {
            Entry::Occupied(existing) => (existing.get().clone(), false),
            Entry::Vacant(slot) => (slot.insert(schema).clone(), true),
        }
    }

    /// Returns the cached schema of `T` if it was built already
    pub fn get<T: Record>(&self) -> Option<Arc<Schema<T>>> {
        let schemas = self.schemas.read().unwrap_or_else(PoisonError::into_inner);
        schemas
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<Schema<T>>().ok())
    }

    /// Number of cached schemas
    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
