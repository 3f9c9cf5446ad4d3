//! Declaration surface for class and field configuration.
//!
//! Every annotation is used in two stages: constructing the value captures
//! the options (a prefix, a converter, ...), and `apply` attaches it to a
//! class or to a `(class, field)` pair with exactly one store write under
//! the kind's reserved key. Applying twice overwrites.
//!
//! # Example
//!
//! ```
//! use metaform::annotation::{get_prefix, ClassAnnotation, FieldAnnotation, Prefix, ToClass};
//! use metaform::{transformer, ConfigStore, TransformError};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! transformer!(User { name, age });
//!
//! let mut store = ConfigStore::new();
//! Prefix::new("u_").apply::<User>(&mut store);
//! ToClass::new(|json| {
//!     json.get("raw_age")
//!         .and_then(|v| v.as_str())
//!         .and_then(|s| s.parse::<u32>().ok())
//!         .map(|age| json!(age))
//!         .ok_or_else(|| TransformError::converter("raw_age is not a number"))
//! })
//! .apply(&mut store, &User::default(), "age");
//!
//! assert_eq!(get_prefix::<User>(&store), "u_");
//! ```

mod alias;
mod ignore_prefix;
mod prefix;
mod to_class;
mod to_json;

pub use alias::{get_alias, Alias};
pub use ignore_prefix::{get_ignore_prefix, IgnorePrefix};
pub use prefix::{get_prefix, Prefix};
pub use to_class::{get_to_class, ToClass, ToClassConverter, ToClassFn};
pub use to_json::{get_to_json, ToJson, ToJsonConverter, ToJsonFn};

use crate::class::Transformer;
use crate::config_store::ConfigStore;

/// An annotation attached to a whole class.
pub trait ClassAnnotation: Sized {
    /// Reserved store key of this annotation kind.
    const KEY: &'static str;

    /// Attach this annotation to class `T` in `store`.
    fn apply<T: Transformer>(self, store: &mut ConfigStore);

    /// Attach this annotation to class `T` in the process-wide store.
    fn register<T: Transformer>(self) {
        self.apply::<T>(&mut ConfigStore::global().write());
    }
}

/// An annotation attached to one field of a class.
///
/// `instance` identifies the class by its runtime type; `T::default()` is
/// the usual prototype at a declaration site.
pub trait FieldAnnotation<T: Transformer>: Sized {
    /// Reserved store key of this annotation kind.
    const KEY: &'static str;

    fn apply(self, store: &mut ConfigStore, instance: &T, field: &str);

    /// Attach this annotation to `field` in the process-wide store.
    fn register(self, instance: &T, field: &str) {
        self.apply(&mut ConfigStore::global().write(), instance, field);
    }
}

/// Shared field-annotation write path. Warns when the field is not declared
/// on the class, since such an entry can never be read by the engine.
fn write_field<T, V>(store: &mut ConfigStore, instance: &T, field: &str, key: &str, value: V)
where
    T: Transformer,
    V: std::any::Any + Send + Sync,
{
    if !T::has_field(field) {
        tracing::warn!(class = T::NAME, field, key, "annotation on undeclared field");
    }
    store.set_field_config(instance, field, key, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer;

    #[derive(Default)]
    struct Account {
        id: u64,
        owner: String,
    }

    transformer!(Account { id, owner });

    #[test]
    fn test_reserved_keys_are_distinct() {
        let mut keys = vec![
            <Prefix as ClassAnnotation>::KEY,
            <ToClass as FieldAnnotation<Account>>::KEY,
            <ToJson<Account> as FieldAnnotation<Account>>::KEY,
            <Alias as FieldAnnotation<Account>>::KEY,
            <IgnorePrefix as FieldAnnotation<Account>>::KEY,
        ];
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_kinds_on_same_field_do_not_collide() {
        let mut store = ConfigStore::new();
        let proto = Account::default();

        Alias::new("account_owner").apply(&mut store, &proto, "owner");
        IgnorePrefix.apply(&mut store, &proto, "owner");

        assert_eq!(get_alias::<Account>(&store, "owner"), Some("account_owner".to_string()));
        assert!(get_ignore_prefix::<Account>(&store, "owner"));
        assert!(get_to_class::<Account>(&store, "owner").is_none());
        assert!(get_alias::<Account>(&store, "id").is_none());
    }
}
