//! Constructor arguments passed to discovered factories.

use crate::core::{Handle, Value};
use crate::error::ConstructionError;

/// Ordered arguments handed to every factory during discovery.
///
/// The typed accessors report mismatches as [`ConstructionError`]s so a
/// factory can reject its arguments with `?`.
///
/// # Examples
///
/// ```rust
/// use freeview::discovery::ConstructorArgs;
///
/// let args = ConstructorArgs::new().with(3).with("triangle");
///
/// assert!(args.expect_arity(2).is_ok());
/// assert_eq!(args.int_at(0).unwrap(), 3);
/// assert_eq!(args.text_at(1).unwrap(), "triangle");
/// assert!(args.bool_at(0).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructorArgs {
    values: Vec<Value>,
}

impl ConstructorArgs {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append an argument.
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw access to an argument.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// All arguments in order.
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Fail unless exactly `expected` arguments were supplied.
    pub fn expect_arity(&self, expected: usize) -> Result<(), ConstructionError> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(ConstructionError::Arity {
                expected,
                actual: self.values.len(),
            })
        }
    }

    /// The boolean at `index`.
    pub fn bool_at(&self, index: usize) -> Result<bool, ConstructionError> {
        self.typed(index, "bool", Value::as_bool)
    }

    /// The integer at `index`.
    pub fn int_at(&self, index: usize) -> Result<i64, ConstructionError> {
        self.typed(index, "int", Value::as_int)
    }

    /// The number at `index`; integers are widened.
    pub fn float_at(&self, index: usize) -> Result<f64, ConstructionError> {
        self.typed(index, "float", Value::as_float)
    }

    /// The string at `index`.
    pub fn text_at(&self, index: usize) -> Result<&str, ConstructionError> {
        self.typed(index, "text", Value::as_text)
    }

    /// The handle at `index`.
    pub fn handle_at(&self, index: usize) -> Result<&Handle, ConstructionError> {
        self.typed(index, "handle", Value::as_handle)
    }

    fn typed<'a, R>(
        &'a self,
        index: usize,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<R>,
    ) -> Result<R, ConstructionError> {
        let value = self.values.get(index).ok_or(ConstructionError::Arity {
            expected: index + 1,
            actual: self.values.len(),
        })?;
        extract(value).ok_or(ConstructionError::ArgumentType {
            index,
            expected,
            actual: value.kind(),
        })
    }
}

impl From<Vec<Value>> for ConstructorArgs {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<Value> for ConstructorArgs {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
