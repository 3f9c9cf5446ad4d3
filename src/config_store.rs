//! Metadata registry keyed by class identity.
//!
//! The store is deliberately ignorant of what a value means. Annotation kinds
//! (prefix, converters, aliases, ...) each pick a reserved key and share the
//! same storage without coordinating on value shapes.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::class::ClassId;

/// A type-erased configuration value.
pub type ConfigValue = Arc<dyn Any + Send + Sync>;

static GLOBAL_STORE: LazyLock<RwLock<ConfigStore>> =
    LazyLock::new(|| RwLock::new(ConfigStore::new()));

/// Everything configured for one class.
#[derive(Default)]
struct ClassEntry {
    class: HashMap<String, ConfigValue>,
    /// field name -> key -> value, in first-declaration order
    fields: IndexMap<String, HashMap<String, ConfigValue>>,
}

/// Per-class and per-field configuration storage.
///
/// Writes overwrite (last write wins). Reads never fail: anything that was
/// not written, or was written with a different value type, reads as `None`.
#[derive(Default)]
pub struct ConfigStore {
    classes: HashMap<ClassId, ClassEntry>,
}

impl ConfigStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// The process-wide store.
    ///
    /// Created on first use and never torn down. Declarations take the write
    /// lock, conversions take the read lock.
    pub fn global() -> &'static RwLock<ConfigStore> {
        &GLOBAL_STORE
    }

    /// Associate `value` with `(class, key)`.
    pub fn set_class_config<V>(&mut self, class: ClassId, key: &str, value: V)
    where
        V: Any + Send + Sync,
    {
        tracing::debug!(class = class.name(), key, "set class config");
        self.classes
            .entry(class)
            .or_default()
            .class
            .insert(key.to_string(), Arc::new(value));
    }

    /// Look up the value stored under `(class, key)`.
    pub fn get_class_config<V>(&self, class: ClassId, key: &str) -> Option<V>
    where
        V: Any + Clone,
    {
        self.classes
            .get(&class)?
            .class
            .get(key)?
            .downcast_ref::<V>()
            .cloned()
    }

    /// Associate `value` with `(runtime class of instance, field, key)`.
    ///
    /// `instance` is only used for its type; it is typically a
    /// `Default`-constructed prototype at the declaration site.
    pub fn set_field_config<T, V>(&mut self, instance: &T, field: &str, key: &str, value: V)
    where
        T: Any,
        V: Any + Send + Sync,
    {
        self.set_field_config_for(ClassId::of_val(instance), field, key, value);
    }

    /// Associate `value` with `(class, field, key)`.
    pub fn set_field_config_for<V>(&mut self, class: ClassId, field: &str, key: &str, value: V)
    where
        V: Any + Send + Sync,
    {
        tracing::debug!(class = class.name(), field, key, "set field config");
        self.classes
            .entry(class)
            .or_default()
            .fields
            .entry(field.to_string())
            .or_default()
            .insert(key.to_string(), Arc::new(value));
    }

    /// Look up the value stored under exactly `(class, field, key)`.
    pub fn get_field_config<V>(&self, class: ClassId, field: &str, key: &str) -> Option<V>
    where
        V: Any + Clone,
    {
        self.classes
            .get(&class)?
            .fields
            .get(field)?
            .get(key)?
            .downcast_ref::<V>()
            .cloned()
    }

    /// Check whether anything at all has been configured for `class`.
    pub fn has_class(&self, class: ClassId) -> bool {
        self.classes.contains_key(&class)
    }

    /// Fields of `class` with at least one entry, in first-declaration order.
    pub fn configured_fields(&self, class: ClassId) -> Vec<&str> {
        self.classes
            .get(&class)
            .map(|entry| entry.fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of classes with configuration.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.classes.iter().map(|(class, entry)| {
                let mut keys: Vec<&str> = entry.class.keys().map(String::as_str).collect();
                keys.sort_unstable();
                (class.name(), (keys, entry.fields.keys().collect::<Vec<_>>()))
            }))
            .finish()
    }
}
