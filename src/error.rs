//! Error types for freeview.

use std::fmt;

/// Result type alias for freeview operations.
pub type Result<T> = std::result::Result<T, BindingError>;

/// Errors that can occur when binding, dispatching or discovering types.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// A change notification or observable was given an empty property name.
    #[error("Property name must not be empty")]
    InvalidPropertyName,

    /// A type entry was registered with an empty name.
    #[error("Type name must not be empty (capability {capability})")]
    InvalidTypeName {
        /// Capability the entry was registered under
        capability: &'static str,
    },

    /// The same type name was registered twice for one capability.
    #[error("Type '{type_name}' is already registered for capability {capability}")]
    DuplicateType {
        /// Capability the entry was registered under
        capability: &'static str,
        /// The duplicated type name
        type_name: String,
    },

    /// A discovered concrete type could not be constructed.
    #[error("Failed to instantiate '{type_name}': {reason}")]
    Instantiation {
        /// Name of the type whose factory failed
        type_name: String,
        /// Why construction failed
        reason: ConstructionError,
    },

    /// Discovered instances could not be put in order.
    #[error("Cannot order instances of {capability}: {reason}")]
    Ordering {
        /// Capability whose comparison relation failed
        capability: &'static str,
        /// Why sorting failed
        reason: String,
    },

    /// Failed to load settings from a source.
    #[error("Failed to load settings: {0}")]
    Load(String),

    /// Failed to deserialize settings.
    #[error("Failed to deserialize settings: {0}")]
    Deserialization(String),

    /// Settings validation failed.
    #[error("Settings validation failed: {0}")]
    Validation(String),
}

impl BindingError {
    /// Returns the offending type name for instantiation failures and
    /// duplicate registrations.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Instantiation { type_name, .. } | Self::DuplicateType { type_name, .. } => {
                Some(type_name)
            }
            _ => None,
        }
    }
}

/// Reasons a factory can reject its constructor arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// Wrong number of arguments.
    Arity {
        /// Number of arguments the constructor takes
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },

    /// An argument has the wrong kind.
    ArgumentType {
        /// Position of the argument
        index: usize,
        /// Kind the constructor wanted
        expected: &'static str,
        /// Kind that was supplied
        actual: &'static str,
    },

    /// The constructor itself failed.
    Failed(String),
}

impl ConstructionError {
    /// Create a constructor failure with a message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity { expected, actual } => {
                write!(f, "expected {} argument(s), got {}", expected, actual)
            }
            Self::ArgumentType {
                index,
                expected,
                actual,
            } => write!(
                f,
                "argument {} must be {}, got {}",
                index, expected, actual
            ),
            Self::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConstructionError {}

/// Validation error for settings validation.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name/path
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for BindingError {
    fn from(err: ValidationError) -> Self {
        BindingError::Validation(err.to_string())
    }
}

/// Extract the message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}
