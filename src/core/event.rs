//! The change notification payload.

use crate::core::Value;
use crate::error::{BindingError, Result};
use std::fmt;

/// A single property change raised by an observable object.
///
/// Carries the name of the changed property and its new value. Both are
/// fixed at construction. The name is not checked against the emitter's
/// actual members.
///
/// # Examples
///
/// ```rust
/// use freeview::core::{ChangeNotification, Value};
///
/// let change = ChangeNotification::new("IsOpen", true).unwrap();
/// assert_eq!(change.property_name(), "IsOpen");
/// assert_eq!(change.value(), &Value::Bool(true));
///
/// assert!(ChangeNotification::new("", true).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeNotification {
    property_name: String,
    value: Value,
}

impl ChangeNotification {
    /// Create a notification for `property_name` changing to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidPropertyName`] if `property_name` is empty.
    pub fn new(property_name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let property_name = property_name.into();
        if property_name.is_empty() {
            return Err(BindingError::InvalidPropertyName);
        }
        Ok(Self {
            property_name,
            value: value.into(),
        })
    }

    /// Name of the property that changed.
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// The new value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the notification, returning its name and value.
    pub fn into_parts(self) -> (String, Value) {
        (self.property_name, self.value)
    }
}

impl fmt::Display for ChangeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.property_name, self.value)
    }
}
