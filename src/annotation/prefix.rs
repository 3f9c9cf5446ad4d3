use crate::class::Transformer;
use crate::config_store::ConfigStore;

use super::ClassAnnotation;

/// Prefix prepended to every field name when deriving its data key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ClassAnnotation for Prefix {
    const KEY: &'static str = "[Prefix]";

    fn apply<T: Transformer>(self, store: &mut ConfigStore) {
        store.set_class_config(T::class_id(), Self::KEY, self.0);
    }
}

/// Prefix declared on `T`, or `""` when none was declared.
pub fn get_prefix<T: Transformer>(store: &ConfigStore) -> String {
    store
        .get_class_config::<String>(T::class_id(), <Prefix as ClassAnnotation>::KEY)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer;

    #[derive(Default)]
    struct User {
        name: String,
    }

    transformer!(User { name });

    #[derive(Default)]
    struct Group {
        title: String,
    }

    transformer!(Group { title });

    #[test]
    fn test_missing_prefix_is_empty() {
        let store = ConfigStore::new();
        assert_eq!(get_prefix::<User>(&store), "");
    }

    #[test]
    fn test_prefix_last_applied_wins() {
        let mut store = ConfigStore::new();
        Prefix::new("u_").apply::<User>(&mut store);
        assert_eq!(get_prefix::<User>(&store), "u_");

        Prefix::new("usr_").apply::<User>(&mut store);
        assert_eq!(get_prefix::<User>(&store), "usr_");
    }

    #[test]
    fn test_same_prefix_twice_is_idempotent() {
        let mut store = ConfigStore::new();
        let prefix = Prefix::new("x");
        prefix.clone().apply::<User>(&mut store);
        prefix.apply::<User>(&mut store);
        assert_eq!(get_prefix::<User>(&store), "x");
    }

    #[test]
    fn test_prefix_does_not_leak_to_other_classes() {
        let mut store = ConfigStore::new();
        Prefix::new("u_").apply::<User>(&mut store);
        assert_eq!(get_prefix::<Group>(&store), "");
    }
}
