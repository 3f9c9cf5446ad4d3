use crate::class::Transformer;
use crate::config_store::ConfigStore;

use super::{write_field, FieldAnnotation};

/// Replaces the field name when deriving the field's data key.
///
/// The class prefix still applies unless the field also carries
/// [`IgnorePrefix`](super::IgnorePrefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias(String);

impl Alias {
    pub fn new(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }
}

impl<T: Transformer> FieldAnnotation<T> for Alias {
    const KEY: &'static str = "[Alias]";

    fn apply(self, store: &mut ConfigStore, instance: &T, field: &str) {
        write_field(store, instance, field, <Self as FieldAnnotation<T>>::KEY, self.0);
    }
}

pub fn get_alias<T: Transformer>(store: &ConfigStore, field: &str) -> Option<String> {
    store.get_field_config(T::class_id(), field, <Alias as FieldAnnotation<T>>::KEY)
}
