//! Settings loader that merges multiple sources.

use crate::error::{BindingError, Result};
use crate::sources::SettingsSource;
use config::ValueKind;
use serde::de::DeserializeOwned;

/// Loads and merges settings from multiple sources.
///
/// Sources are applied in priority order (lower priority first). Nested
/// tables are merged key by key, so a higher priority source that sets
/// `dispatch.isolate_panics` leaves the rest of `dispatch` untouched.
pub struct SettingsLoader {
    sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsLoader {
    /// Create a new settings loader.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a settings source.
    pub fn add_source(&mut self, source: Box<dyn SettingsSource>) {
        self.sources.push(source);
    }

    /// Load and merge settings from all sources.
    ///
    /// With no sources the target type's serde defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any source fails to load
    /// - Deserialization fails
    pub fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut sorted_sources: Vec<_> = self.sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());

        let mut builder = config::Config::builder();

        for source in sorted_sources {
            let values = source.load().map_err(|e| {
                BindingError::Load(format!("Failed to load source '{}': {}", source.name(), e))
            })?;

            let mut leaves = Vec::new();
            for (key, value) in values {
                flatten(key, value, &mut leaves);
            }

            for (key, value) in leaves {
                builder = builder.set_override(&key, value).map_err(|e| {
                    BindingError::Load(format!(
                        "Failed to merge source '{}': {}",
                        source.name(),
                        e
                    ))
                })?;
            }
        }

        let merged = builder
            .build()
            .map_err(|e| BindingError::Load(format!("Failed to build settings: {}", e)))?;

        merged
            .try_deserialize::<T>()
            .map_err(|e| BindingError::Deserialization(e.to_string()))
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        let mut sorted_sources: Vec<_> = self.sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());
        sorted_sources.iter().map(|s| s.name()).collect()
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand nested tables into dotted `(key, leaf)` pairs.
fn flatten(prefix: String, value: config::Value, out: &mut Vec<(String, config::Value)>) {
    match value.kind {
        ValueKind::Table(table) => {
            for (key, nested) in table {
                flatten(format!("{}.{}", prefix, key), nested, out);
            }
        }
        _ => out.push((prefix, value)),
    }
}
