//! Conversion between plain JSON objects and `Transformer` instances.
//!
//! The engine reads all per-class and per-field policy from the
//! [`ConfigStore`] it borrows; it owns no configuration of its own.

use serde_json::Value;

use crate::annotation::{get_alias, get_ignore_prefix, get_prefix, get_to_class, get_to_json};
use crate::class::{IJson, Transformer};
use crate::config_store::ConfigStore;
use crate::error::TransformError;

/// Converter between data objects and instances, driven by a store.
///
/// # Example
///
/// ```
/// use metaform::annotation::{ClassAnnotation, Prefix};
/// use metaform::{transformer, ConfigStore, TransformerEngine};
/// use serde_json::json;
///
/// #[derive(Debug, Default)]
/// struct User {
///     name: String,
/// }
///
/// transformer!(User { name });
///
/// let mut store = ConfigStore::new();
/// Prefix::new("u_").apply::<User>(&mut store);
///
/// let engine = TransformerEngine::new(&store);
/// let user: User = engine.parse_value(&json!({"u_name": "Alice"})).unwrap();
/// assert_eq!(user.name, "Alice");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TransformerEngine<'a> {
    store: &'a ConfigStore,
}

impl<'a> TransformerEngine<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a ConfigStore {
        self.store
    }

    /// Data key for `field` of `T`: `prefix + (alias or field name)`, without
    /// the prefix when the field ignores it.
    pub fn data_key<T: Transformer>(&self, field: &str) -> String {
        let name = get_alias::<T>(self.store, field).unwrap_or_else(|| field.to_string());
        if get_ignore_prefix::<T>(self.store, field) {
            name
        } else {
            format!("{}{}", get_prefix::<T>(self.store), name)
        }
    }

    /// Build a `T` from a data object.
    ///
    /// For each declared field a `ToClass` converter, when present, is called
    /// with the whole input. Otherwise the value under the field's data key is
    /// copied. Missing and `null` values leave the field at its default.
    /// Converter errors are returned unchanged and abort the conversion.
    pub fn parse<T: Transformer>(&self, json: &IJson) -> Result<T, TransformError> {
        let mut instance = T::default();

        for &field in T::field_names() {
            if let Some(converter) = get_to_class::<T>(self.store, field) {
                tracing::debug!(class = T::NAME, field, "applying custom converter");
                let value = converter.convert(json)?;
                instance.set_field(field, value)?;
                continue;
            }

            let key = self.data_key::<T>(field);
            match json.get(&key) {
                None | Some(Value::Null) => {
                    tracing::trace!(class = T::NAME, field, key = %key, "no value, keeping default");
                }
                Some(value) => {
                    tracing::trace!(class = T::NAME, field, key = %key, "copying value");
                    instance.set_field(field, value.clone())?;
                }
            }
        }

        Ok(instance)
    }

    /// Like [`parse`](Self::parse), for an arbitrary JSON value that must be
    /// an object.
    pub fn parse_value<T: Transformer>(&self, value: &Value) -> Result<T, TransformError> {
        match value {
            Value::Object(json) => self.parse(json),
            other => Err(TransformError::InvalidInput(format!(
                "expected an object to build {}, got {}",
                T::NAME,
                json_kind(other)
            ))),
        }
    }

    /// Build one `T` per element of `values`. Fails on the first bad element.
    pub fn parse_array<T: Transformer>(&self, values: &[Value]) -> Result<Vec<T>, TransformError> {
        values.iter().map(|value| self.parse_value(value)).collect()
    }

    /// Write `instance` into a data object, mirroring [`parse`](Self::parse)
    /// with `ToJson` converters on the output side.
    pub fn to_json<T: Transformer>(&self, instance: &T) -> Result<IJson, TransformError> {
        let mut json = IJson::new();

        for &field in T::field_names() {
            let key = self.data_key::<T>(field);
            let value = match get_to_json::<T>(self.store, field) {
                Some(converter) => {
                    tracing::debug!(class = T::NAME, field, "applying custom output converter");
                    converter.convert(instance)?
                }
                None => instance
                    .get_field(field)?
                    .ok_or_else(|| TransformError::UnknownField {
                        class: T::NAME,
                        field: field.to_string(),
                    })?,
            };
            if let Some(previous) = json.insert(key, value) {
                tracing::warn!(
                    class = T::NAME,
                    field,
                    overwritten = %previous,
                    "data key already written by another field"
                );
            }
        }

        Ok(json)
    }

    pub fn to_json_array<T: Transformer>(&self, instances: &[T]) -> Result<Vec<Value>, TransformError> {
        instances
            .iter()
            .map(|instance| self.to_json(instance).map(Value::Object))
            .collect()
    }
}

// The global helpers take the read lock recursively: a converter may call
// back into them for a nested object while a writer is queued.

/// [`TransformerEngine::parse`] against the process-wide store.
pub fn parse<T: Transformer>(json: &IJson) -> Result<T, TransformError> {
    let store = ConfigStore::global().read_recursive();
    TransformerEngine::new(&store).parse(json)
}

/// [`TransformerEngine::parse_value`] against the process-wide store.
pub fn parse_value<T: Transformer>(value: &Value) -> Result<T, TransformError> {
    let store = ConfigStore::global().read_recursive();
    TransformerEngine::new(&store).parse_value(value)
}

pub fn parse_array<T: Transformer>(values: &[Value]) -> Result<Vec<T>, TransformError> {
    let store = ConfigStore::global().read_recursive();
    TransformerEngine::new(&store).parse_array(values)
}

/// [`TransformerEngine::to_json`] against the process-wide store.
pub fn to_json<T: Transformer>(instance: &T) -> Result<IJson, TransformError> {
    let store = ConfigStore::global().read_recursive();
    TransformerEngine::new(&store).to_json(instance)
}

pub fn to_json_array<T: Transformer>(instances: &[T]) -> Result<Vec<Value>, TransformError> {
    let store = ConfigStore::global().read_recursive();
    TransformerEngine::new(&store).to_json_array(instances)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
