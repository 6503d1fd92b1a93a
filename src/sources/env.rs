//! Environment variable settings source.

use super::SettingsSource;
use crate::error::{BindingError, Result};
use config::Environment;
use std::collections::HashMap;

/// Environment variable settings source.
///
/// Loads settings from environment variables with a specified prefix
/// and separator for nested keys.
///
/// # Examples
///
/// ```rust
/// use freeview::sources::EnvSource;
///
/// // FREEVIEW_DISPATCH__ISOLATE_PANICS=false -> dispatch.isolate_panics = false
/// let source = EnvSource::new("FREEVIEW", "__");
/// ```
pub struct EnvSource {
    prefix: String,
    separator: String,
    priority: i32,
}

impl EnvSource {
    /// Create a new environment variable source.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "FREEVIEW")
    /// * `separator` - Separator for nested keys (e.g., "__")
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            priority: 300,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl SettingsSource for EnvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let env_source = Environment::with_prefix(&self.prefix)
            .prefix_separator("_")
            .separator(&self.separator)
            .try_parsing(true);

        let parsed = config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| {
                BindingError::Load(format!("Failed to load environment variables: {}", e))
            })?;

        parsed
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                BindingError::Deserialization(format!(
                    "Failed to parse environment variables: {}",
                    e
                ))
            })
    }

    fn name(&self) -> String {
        format!("env:{}*", self.prefix)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
