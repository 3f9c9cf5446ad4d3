//! Class identity and the `Transformer` trait.
//!
//! A "class" is any Rust type that can be built from a plain JSON object and
//! written back into one. Its identity is the type's `TypeId`, so two types
//! with the same name in different modules never share configuration.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::error::TransformError;

/// Plain structured data: a string-keyed JSON object.
pub type IJson = serde_json::Map<String, Value>;

/// Runtime descriptor of a class, used as the registry key.
#[derive(Clone, Copy)]
pub struct ClassId {
    type_id: TypeId,
    name: &'static str,
}

impl ClassId {
    /// Identity of the type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Identity of the runtime type of `instance`.
    pub fn of_val<T: 'static>(_instance: &T) -> Self {
        Self::of::<T>()
    }

    /// Fully qualified type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.name)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Core trait for every class the engine can convert.
///
/// `Default` stands in for the zero-argument constructor. Field access goes
/// through JSON values so the engine can stay independent of field types.
/// Usually implemented with the [`transformer!`](crate::transformer) macro.
///
/// # Example
///
/// ```
/// use metaform::{transformer, Transformer};
///
/// #[derive(Debug, Default)]
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// transformer!(User { name, age });
///
/// assert_eq!(User::NAME, "User");
/// assert_eq!(User::field_names(), &["name", "age"]);
/// ```
pub trait Transformer: Default + 'static {
    /// Short class name, used by declaration files.
    const NAME: &'static str;

    /// Declared fields, in declaration order.
    fn field_names() -> &'static [&'static str];

    /// Read a field as a JSON value. `Ok(None)` means the field is unknown.
    fn get_field(&self, field: &str) -> Result<Option<Value>, TransformError>;

    /// Write a JSON value into a field.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), TransformError>;

    fn class_id() -> ClassId {
        ClassId::of::<Self>()
    }

    fn has_field(field: &str) -> bool {
        Self::field_names().contains(&field)
    }
}

/// Implement [`Transformer`] for a struct with serde-compatible fields.
///
/// ```
/// use metaform::transformer;
///
/// #[derive(Default)]
/// struct Order {
///     id: u64,
///     note: Option<String>,
/// }
///
/// transformer!(Order { id, note });
/// ```
#[macro_export]
macro_rules! transformer {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Transformer for $ty {
            const NAME: &'static str = stringify!($ty);

            fn field_names() -> &'static [&'static str] {
                &[$(stringify!($field)),*]
            }

            fn get_field(
                &self,
                field: &str,
            ) -> ::std::result::Result<Option<$crate::Value>, $crate::TransformError> {
                $(
                    if field == stringify!($field) {
                        return $crate::__private::serde_json::to_value(&self.$field)
                            .map(Some)
                            .map_err(|e| $crate::TransformError::field_value(field, e));
                    }
                )*
                Ok(None)
            }

            fn set_field(
                &mut self,
                field: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::TransformError> {
                $(
                    if field == stringify!($field) {
                        self.$field = $crate::__private::serde_json::from_value(value)
                            .map_err(|e| $crate::TransformError::field_value(field, e))?;
                        return Ok(());
                    }
                )*
                Err($crate::TransformError::UnknownField {
                    class: stringify!($ty),
                    field: field.to_string(),
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Point {
        x: i32,
        y: i32,
        label: Option<String>,
    }

    crate::transformer!(Point { x, y, label });

    mod other {
        #[derive(Debug, Default)]
        pub struct Point {
            pub x: i32,
        }

        crate::transformer!(Point { x });
    }

    #[test]
    fn test_class_id_distinguishes_same_named_types() {
        assert_eq!(Point::NAME, other::Point::NAME);
        assert_ne!(Point::class_id(), other::Point::class_id());
        assert_eq!(Point::class_id(), ClassId::of_val(&Point::default()));
    }

    #[test]
    fn test_get_and_set_field() {
        let mut point = Point::default();
        point.set_field("x", json!(3)).unwrap();
        point.set_field("label", json!("origin")).unwrap();

        assert_eq!(point.x, 3);
        assert_eq!(point.get_field("label").unwrap(), Some(json!("origin")));
        assert_eq!(point.get_field("y").unwrap(), Some(json!(0)));
        assert_eq!(point.get_field("z").unwrap(), None);
    }

    #[test]
    fn test_set_field_type_mismatch() {
        let mut point = Point::default();
        let result = point.set_field("x", json!("three"));
        assert!(matches!(result, Err(TransformError::FieldValue { field, .. }) if field == "x"));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut point = Point::default();
        let result = point.set_field("z", json!(1));
        assert!(matches!(result, Err(TransformError::UnknownField { class: "Point", .. })));
        assert!(!Point::has_field("z"));
        assert!(Point::has_field("y"));
    }
}
