use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::class::Transformer;
use crate::config_store::ConfigStore;
use crate::error::TransformError;

use super::{write_field, FieldAnnotation};

/// Custom instance -> data conversion for one field.
///
/// Mirror of [`ToClassFn`](super::ToClassFn): the converter sees the whole
/// instance and its result is written under the field's data key.
pub trait ToJsonFn<T>: Send + Sync {
    fn convert(&self, instance: &T) -> Result<Value, TransformError>;
}

impl<T, F> ToJsonFn<T> for F
where
    F: Fn(&T) -> Result<Value, TransformError> + Send + Sync,
{
    fn convert(&self, instance: &T) -> Result<Value, TransformError> {
        self(instance)
    }
}

pub type ToJsonConverter<T> = Arc<dyn ToJsonFn<T>>;

/// Field annotation carrying a [`ToJsonFn`] for class `T`.
pub struct ToJson<T>(ToJsonConverter<T>);

impl<T: Transformer> ToJson<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&T) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    pub fn from_converter(converter: ToJsonConverter<T>) -> Self {
        Self(converter)
    }

    pub fn converter(&self) -> &ToJsonConverter<T> {
        &self.0
    }
}

impl<T> Clone for ToJson<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for ToJson<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToJson(..)")
    }
}

impl<T: Transformer> FieldAnnotation<T> for ToJson<T> {
    const KEY: &'static str = "[ToJson]";

    fn apply(self, store: &mut ConfigStore, instance: &T, field: &str) {
        write_field(store, instance, field, <Self as FieldAnnotation<T>>::KEY, self.0);
    }
}

/// Output-side converter declared on `(T, field)`, if any.
pub fn get_to_json<T: Transformer>(store: &ConfigStore, field: &str) -> Option<ToJsonConverter<T>> {
    store.get_field_config(T::class_id(), field, <ToJson<T> as FieldAnnotation<T>>::KEY)
}
