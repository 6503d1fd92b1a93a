//! Settings validation support.

use crate::error::ValidationError;

/// Trait for settings validation.
///
/// [`SettingsBuilder::build`](crate::settings::SettingsBuilder::build) runs
/// this on the loaded settings before returning them.
///
/// # Examples
///
/// ```rust
/// use freeview::error::ValidationError;
/// use freeview::settings::{FreeviewSettings, Validate};
///
/// let mut settings = FreeviewSettings::default();
/// settings.presentation.default_container = String::new();
///
/// assert!(matches!(
///     settings.validate(),
///     Err(ValidationError::InvalidField { .. })
/// ));
/// ```
pub trait Validate {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}
