//! # Metaform: Metadata-Driven Object Transformation
//!
//! Metaform converts between plain JSON objects and typed Rust structs.
//! How each class and each field is converted is declared separately from
//! the struct itself, as configuration attached to the class identity.
//!
//! ## Features
//!
//! - **Config store**: per-class and per-field metadata keyed by `TypeId`
//! - **Annotations**: `Prefix`, `Alias`, `IgnorePrefix`, `ToClass`, `ToJson`
//! - **Transformer engine**: builds instances from data and data from instances
//! - **Declaration files**: YAML-driven prefixes and aliases
//!
//! ## Example
//!
//! ```
//! use metaform::annotation::{ClassAnnotation, FieldAnnotation, Prefix, ToClass};
//! use metaform::{transformer, ConfigStore, TransformError, TransformerEngine};
//! use serde_json::{json, Value};
//!
//! #[derive(Debug, Default)]
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
//!     let raw = json.get("raw_age").and_then(Value::as_str).unwrap_or("0");
//!     raw.parse::<u32>()
//!         .map(|age| json!(age))
//!         .map_err(|e| TransformError::converter(e.to_string()))
//! })
//! .apply(&mut store, &User::default(), "age");
//!
//! let engine = TransformerEngine::new(&store);
//! let user: User = engine
//!     .parse_value(&json!({"u_name": "Alice", "raw_age": "30"}))
//!     .unwrap();
//!
//! assert_eq!(user.name, "Alice");
//! assert_eq!(user.age, 30);
//! ```

// Core modules
pub mod error;
pub mod class;
pub mod config_store;
pub mod annotation;
pub mod engine;

// YAML declaration files
pub mod declarations;

// Re-export key types
pub use error::TransformError;
pub use class::{ClassId, IJson, Transformer};
pub use config_store::{ConfigStore, ConfigValue};
pub use engine::{parse, parse_array, parse_value, to_json, to_json_array, TransformerEngine};
pub use declarations::{ClassCatalog, DeclarationFile};
pub use serde_json::Value;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
