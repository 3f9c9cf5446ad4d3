use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::class::{IJson, Transformer};
use crate::config_store::ConfigStore;
use crate::error::TransformError;

use super::{write_field, FieldAnnotation};

/// Custom data -> instance conversion for one field.
///
/// The converter receives the whole input object, not just the field's
/// slice, and is trusted to find its own keys. Its output is not checked
/// against the field type until it is written into the instance.
pub trait ToClassFn: Send + Sync {
    fn convert(&self, json: &IJson) -> Result<Value, TransformError>;
}

impl<F> ToClassFn for F
where
    F: Fn(&IJson) -> Result<Value, TransformError> + Send + Sync,
{
    fn convert(&self, json: &IJson) -> Result<Value, TransformError> {
        self(json)
    }
}

/// Shared handle to a registered converter.
pub type ToClassConverter = Arc<dyn ToClassFn>;

/// Field annotation carrying a [`ToClassFn`].
#[derive(Clone)]
pub struct ToClass(ToClassConverter);

impl ToClass {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&IJson) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// Wrap an existing converter handle without copying it.
    pub fn from_converter(converter: ToClassConverter) -> Self {
        Self(converter)
    }

    pub fn converter(&self) -> &ToClassConverter {
        &self.0
    }
}

impl fmt::Debug for ToClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToClass(..)")
    }
}

impl<T: Transformer> FieldAnnotation<T> for ToClass {
    const KEY: &'static str = "[ToClass]";

    fn apply(self, store: &mut ConfigStore, instance: &T, field: &str) {
        write_field(store, instance, field, <Self as FieldAnnotation<T>>::KEY, self.0);
    }
}

/// Converter declared on `(T, field)`, if any.
pub fn get_to_class<T: Transformer>(store: &ConfigStore, field: &str) -> Option<ToClassConverter> {
    store.get_field_config(T::class_id(), field, <ToClass as FieldAnnotation<T>>::KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer;
    use serde_json::json;

    #[derive(Default)]
    struct User {
        name: String,
        age: u32,
    }

    transformer!(User { name, age });

    #[derive(Default)]
    struct Pet {
        age: u32,
    }

    transformer!(Pet { age });

    fn double_age(json: &IJson) -> Result<Value, TransformError> {
        let age = json.get("age").and_then(Value::as_u64).unwrap_or(0);
        Ok(json!(age * 2))
    }

    #[test]
    fn test_unconfigured_converter_is_none() {
        let store = ConfigStore::new();
        assert!(get_to_class::<User>(&store, "age").is_none());
    }

    #[test]
    fn test_registered_converter_is_same_reference() {
        let mut store = ConfigStore::new();
        let annotation = ToClass::new(double_age);
        let handle = annotation.converter().clone();

        annotation.apply(&mut store, &User::default(), "age");

        let resolved = get_to_class::<User>(&store, "age").unwrap();
        assert!(Arc::ptr_eq(&handle, &resolved));

        let input = json!({"age": 21});
        assert_eq!(resolved.convert(input.as_object().unwrap()).unwrap(), json!(42));
    }

    #[test]
    fn test_converter_scoped_to_class_and_field() {
        let mut store = ConfigStore::new();
        ToClass::new(double_age).apply(&mut store, &User::default(), "age");

        assert!(get_to_class::<User>(&store, "name").is_none());
        assert!(get_to_class::<Pet>(&store, "age").is_none());
    }

    #[test]
    fn test_reapplying_replaces_converter() {
        let mut store = ConfigStore::new();
        ToClass::new(double_age).apply(&mut store, &User::default(), "age");

        let second = ToClass::new(|_json: &IJson| Ok(json!(7)));
        let handle = second.converter().clone();
        second.apply(&mut store, &User::default(), "age");

        let resolved = get_to_class::<User>(&store, "age").unwrap();
        assert!(Arc::ptr_eq(&handle, &resolved));
    }
}
