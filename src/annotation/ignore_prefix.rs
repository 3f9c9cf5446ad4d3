use crate::class::Transformer;
use crate::config_store::ConfigStore;

use super::{write_field, FieldAnnotation};

/// Excludes a field from the class prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IgnorePrefix;

impl<T: Transformer> FieldAnnotation<T> for IgnorePrefix {
    const KEY: &'static str = "[IgnorePrefix]";

    fn apply(self, store: &mut ConfigStore, instance: &T, field: &str) {
        write_field(store, instance, field, <Self as FieldAnnotation<T>>::KEY, true);
    }
}

/// Whether `field` of `T` ignores the class prefix. Defaults to `false`.
pub fn get_ignore_prefix<T: Transformer>(store: &ConfigStore, field: &str) -> bool {
    store
        .get_field_config::<bool>(T::class_id(), field, <IgnorePrefix as FieldAnnotation<T>>::KEY)
        .unwrap_or(false)
}
