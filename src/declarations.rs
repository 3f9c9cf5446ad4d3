//! Declaration files: class and field configuration loaded from YAML.
//!
//! A declaration file is the data-driven counterpart of applying
//! annotations in code. Only plain values can be declared (prefix, alias,
//! ignore_prefix); converters must be registered in code.
//!
//! ```yaml
//! classes:
//!   User:
//!     prefix: u_
//!     fields:
//!       name:
//!         alias: full_name
//!       id:
//!         ignore_prefix: true
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::annotation::{Alias, ClassAnnotation, FieldAnnotation, IgnorePrefix, Prefix};
use crate::class::{ClassId, Transformer};
use crate::config_store::ConfigStore;
use crate::error::TransformError;

/// Parsed declaration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationFile {
    /// Class name (`Transformer::NAME`) -> declaration
    #[serde(default)]
    pub classes: IndexMap<String, ClassDeclaration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default)]
    pub fields: IndexMap<String, FieldDeclaration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default)]
    pub ignore_prefix: bool,
}

impl ClassDeclaration {
    /// Data key `field` maps to under this declaration. Fields without an
    /// entry use their own name with the class prefix.
    pub fn data_key(&self, field: &str) -> String {
        let decl = self.fields.get(field);
        let name = decl.and_then(|d| d.alias.as_deref()).unwrap_or(field);
        if decl.is_some_and(|d| d.ignore_prefix) {
            name.to_string()
        } else {
            format!("{}{}", self.prefix.as_deref().unwrap_or(""), name)
        }
    }

    /// Data keys of the declared fields, in declaration order.
    pub fn effective_keys(&self) -> Vec<(&str, String)> {
        self.fields
            .keys()
            .map(|field| (field.as_str(), self.data_key(field)))
            .collect()
    }
}

/// Reject two fields resolving to the same data key.
fn check_unique_keys<'f>(
    class: &str,
    decl: &ClassDeclaration,
    fields: impl IntoIterator<Item = &'f str>,
) -> Result<(), TransformError> {
    let mut seen = HashSet::new();
    for field in fields {
        let key = decl.data_key(field);
        if !seen.insert(key.clone()) {
            return Err(TransformError::Declaration(format!(
                "{}.{}: data key '{}' is already used by another field",
                class, field, key
            )));
        }
    }
    Ok(())
}

impl DeclarationFile {
    /// Load a declaration file from disk.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read and `Declaration` if it is not
    /// valid YAML of the expected shape.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TransformError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            TransformError::Io(format!("Failed to read declaration file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded declaration file");
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, TransformError> {
        serde_yaml::from_str(contents)
            .map_err(|e| TransformError::Declaration(format!("Failed to parse YAML: {}", e)))
    }

    /// Checks that need no knowledge of the Rust classes: empty aliases and
    /// two fields of one class resolving to the same data key.
    pub fn validate(&self) -> Result<(), TransformError> {
        for (class, decl) in &self.classes {
            for (field, field_decl) in &decl.fields {
                if field_decl.alias.as_deref() == Some("") {
                    return Err(TransformError::Declaration(format!(
                        "{}.{}: alias must not be empty",
                        class, field
                    )));
                }
            }

            check_unique_keys(class, decl, decl.fields.keys().map(String::as_str))?;
        }
        Ok(())
    }

    /// Validate against `catalog` and write every declaration into `store`.
    ///
    /// Nothing is written unless the whole file is valid.
    pub fn apply(&self, store: &mut ConfigStore, catalog: &ClassCatalog) -> Result<(), TransformError> {
        self.validate()?;

        let mut resolved = Vec::with_capacity(self.classes.len());
        for (name, decl) in &self.classes {
            let entry = catalog.get(name).ok_or_else(|| {
                TransformError::Declaration(format!("Unknown class '{}'", name))
            })?;
            if let Some(field) = decl.fields.keys().find(|f| !entry.fields.contains(&f.as_str())) {
                return Err(TransformError::Declaration(format!(
                    "Class '{}' has no field '{}'",
                    name, field
                )));
            }
            // Undeclared fields of the class keep their default key, so an
            // alias must not land on one of them either.
            check_unique_keys(name, decl, entry.fields.iter().copied())?;
            resolved.push((entry, decl));
        }

        for (entry, decl) in resolved {
            tracing::debug!(class = entry.id.name(), fields = decl.fields.len(), "applying declarations");
            (entry.apply)(store, decl);
        }
        Ok(())
    }

    /// Human-readable listing of each class's prefix and declared data keys.
    /// With `only`, just that class is listed.
    pub fn key_report(&self, only: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();
        for (name, class) in &self.classes {
            if only.is_some_and(|o| o != name.as_str()) {
                continue;
            }
            lines.push(format!("{} (prefix: {:?})", name, class.prefix.as_deref().unwrap_or("")));
            for (field, key) in class.effective_keys() {
                lines.push(format!("  {} -> {}", field, key));
            }
        }
        lines
    }

    /// [`apply`](Self::apply) against the process-wide store.
    pub fn apply_global(&self, catalog: &ClassCatalog) -> Result<(), TransformError> {
        self.apply(&mut ConfigStore::global().write(), catalog)
    }
}

/// A class known to a [`ClassCatalog`].
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub id: ClassId,
    pub fields: &'static [&'static str],
    apply: fn(&mut ConfigStore, &ClassDeclaration),
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("id", &self.id)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Name -> class lookup used to resolve declaration files.
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: IndexMap<&'static str, CatalogEntry>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `T` addressable by `T::NAME`. Registering a second class under
    /// the same name replaces the first.
    pub fn register<T: Transformer>(&mut self) -> &mut Self {
        let entry = CatalogEntry {
            id: T::class_id(),
            fields: T::field_names(),
            apply: apply_class_declaration::<T>,
        };
        if let Some(previous) = self.classes.insert(T::NAME, entry) {
            if previous.id != entry.id {
                tracing::warn!(name = T::NAME, previous = previous.id.name(), "class name re-registered");
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.classes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.classes.keys().copied()
    }
}

fn apply_class_declaration<T: Transformer>(store: &mut ConfigStore, decl: &ClassDeclaration) {
    if let Some(prefix) = &decl.prefix {
        Prefix::new(prefix.clone()).apply::<T>(store);
    }

    let proto = T::default();
    for (field, field_decl) in &decl.fields {
        if let Some(alias) = &field_decl.alias {
            Alias::new(alias.clone()).apply(store, &proto, field);
        }
        if field_decl.ignore_prefix {
            IgnorePrefix.apply(store, &proto, field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{get_alias, get_ignore_prefix, get_prefix};
    use crate::transformer;

    #[derive(Default)]
    struct User {
        id: u64,
        name: String,
    }

    transformer!(User { id, name });

    const YAML: &str = r#"
classes:
  User:
    prefix: u_
    fields:
      name:
        alias: full_name
      id:
        ignore_prefix: true
"#;

    fn catalog() -> ClassCatalog {
        let mut catalog = ClassCatalog::new();
        catalog.register::<User>();
        catalog
    }

    #[test]
    fn test_parse_declarations() {
        let file = DeclarationFile::from_yaml_str(YAML).unwrap();
        let user = &file.classes["User"];

        assert_eq!(user.prefix.as_deref(), Some("u_"));
        assert_eq!(user.fields["name"].alias.as_deref(), Some("full_name"));
        assert!(user.fields["id"].ignore_prefix);
        assert_eq!(
            user.effective_keys(),
            vec![("name", "u_full_name".to_string()), ("id", "id".to_string())]
        );
    }

    #[test]
    fn test_apply_writes_store() {
        let file = DeclarationFile::from_yaml_str(YAML).unwrap();
        let mut store = ConfigStore::new();

        file.apply(&mut store, &catalog()).unwrap();

        assert_eq!(get_prefix::<User>(&store), "u_");
        assert_eq!(get_alias::<User>(&store, "name"), Some("full_name".to_string()));
        assert!(get_ignore_prefix::<User>(&store, "id"));
        assert!(!get_ignore_prefix::<User>(&store, "name"));
    }

    #[test]
    fn test_unknown_class_writes_nothing() {
        let yaml = "classes:\n  User:\n    prefix: u_\n  Ghost:\n    prefix: g_\n";
        let file = DeclarationFile::from_yaml_str(yaml).unwrap();
        let mut store = ConfigStore::new();

        let result = file.apply(&mut store, &catalog());

        assert!(matches!(result, Err(TransformError::Declaration(msg)) if msg.contains("Ghost")));
        assert_eq!(store.class_count(), 0);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let yaml = "classes:\n  User:\n    fields:\n      email:\n        alias: mail\n";
        let file = DeclarationFile::from_yaml_str(yaml).unwrap();

        let result = file.apply(&mut ConfigStore::new(), &catalog());

        assert!(matches!(result, Err(TransformError::Declaration(msg)) if msg.contains("email")));
    }

    #[test]
    fn test_validate_detects_key_collision() {
        let yaml = r#"
classes:
  User:
    prefix: u_
    fields:
      id:
        alias: name
      name: {}
"#;
        let file = DeclarationFile::from_yaml_str(yaml).unwrap();

        let result = file.validate();

        assert!(matches!(result, Err(TransformError::Declaration(msg)) if msg.contains("u_name")));
    }

    #[test]
    fn test_alias_onto_undeclared_field_is_rejected() {
        let yaml = "classes:\n  User:\n    prefix: u_\n    fields:\n      id:\n        alias: name\n";
        let file = DeclarationFile::from_yaml_str(yaml).unwrap();
        assert!(file.validate().is_ok());

        let mut store = ConfigStore::new();
        let result = file.apply(&mut store, &catalog());

        assert!(matches!(result, Err(TransformError::Declaration(msg)) if msg.contains("u_name")));
        assert_eq!(store.class_count(), 0);
    }

    #[test]
    fn test_data_key_for_undeclared_field() {
        let file = DeclarationFile::from_yaml_str(YAML).unwrap();
        let user = &file.classes["User"];

        assert_eq!(user.data_key("email"), "u_email");
        assert_eq!(user.data_key("id"), "id");
    }

    #[test]
    fn test_key_report() {
        let file = DeclarationFile::from_yaml_str(YAML).unwrap();

        assert_eq!(
            file.key_report(None),
            vec![
                "User (prefix: \"u_\")".to_string(),
                "  name -> u_full_name".to_string(),
                "  id -> id".to_string(),
            ]
        );
        assert!(file.key_report(Some("Ghost")).is_empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = DeclarationFile::from_yaml_str("classes: [not, a, map]");
        assert!(matches!(result, Err(TransformError::Declaration(_))));
    }

    #[test]
    fn test_catalog_names() {
        let catalog = catalog();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["User"]);
        assert_eq!(catalog.get("User").unwrap().fields, &["id", "name"]);
        assert!(catalog.get("Ghost").is_none());
    }
}
