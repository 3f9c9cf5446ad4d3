//! Error type shared by the registry, the engine and declaration loading.

use std::fmt;

/// Error type for transform operations
///
/// Missing configuration is never an error; every variant here describes
/// either bad input data, a failing converter, or a misdeclared class.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Raised by a user-supplied converter. The engine returns it untouched.
    Converter(String),
    /// A value could not be written into (or read out of) a typed field.
    FieldValue { field: String, reason: String },
    /// The field is not declared on the class.
    UnknownField { class: &'static str, field: String },
    /// The conversion input was not a JSON object.
    InvalidInput(String),
    /// A declaration file referenced something that does not exist.
    Declaration(String),
    Io(String),
}

impl TransformError {
    /// Convenience constructor for converter failures.
    pub fn converter(msg: impl Into<String>) -> Self {
        TransformError::Converter(msg.into())
    }

    pub fn field_value(field: &str, reason: impl fmt::Display) -> Self {
        TransformError::FieldValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Converter(msg) => write!(f, "Converter error: {}", msg),
            TransformError::FieldValue { field, reason } => {
                write!(f, "Invalid value for field '{}': {}", field, reason)
            }
            TransformError::UnknownField { class, field } => {
                write!(f, "Field '{}' is not declared on {}", field, class)
            }
            TransformError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TransformError::Declaration(msg) => write!(f, "Declaration error: {}", msg),
            TransformError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TransformError {}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::Io(err.to_string())
    }
}
