//! Builder for loading FreeviewSettings.

use crate::error::{BindingError, Result, ValidationError};
use crate::settings::{FreeviewSettings, SettingsLoader, Validate};
use crate::sources::{EnvSource, FileSource, SettingsSource};
use std::path::PathBuf;
use std::sync::Arc;

type Validator = Arc<dyn Fn(&FreeviewSettings) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// Builder for loading [`FreeviewSettings`] from layered sources.
///
/// Precedence, lowest to highest: settings files in the order added, custom
/// sources at their own priority, environment variables.
///
/// # Examples
///
/// ```rust,no_run
/// use freeview::settings::FreeviewSettings;
///
/// # fn example() -> freeview::error::Result<()> {
/// let settings = FreeviewSettings::builder()
///     .with_file("settings/freeview.yaml")
///     .with_env_overrides("FREEVIEW", "__")
///     .build()?;
///
/// settings.apply();
/// # Ok(())
/// # }
/// ```
pub struct SettingsBuilder {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    custom_sources: Vec<Box<dyn SettingsSource>>,
    validators: Vec<Validator>,
}

impl SettingsBuilder {
    /// Create a new builder with no sources.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            env_prefix: None,
            env_separator: None,
            custom_sources: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Add a settings file.
    ///
    /// Later files have higher priority and override earlier files.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add environment variable overrides.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "FREEVIEW")
    /// * `separator` - Separator for nested keys (e.g., "__" for
    ///   FREEVIEW_DISPATCH__ISOLATE_PANICS)
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Add a custom settings source.
    pub fn with_source<S: SettingsSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Add a validation function run after loading, in addition to
    /// [`Validate`].
    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FreeviewSettings) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Load, merge and validate the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A source cannot be read
    /// - Deserialization fails
    /// - Validation fails
    pub fn build(self) -> Result<FreeviewSettings> {
        let mut loader = SettingsLoader::new();

        for (index, path) in self.file_paths.iter().enumerate() {
            let priority = 100 + (index as i32 * 10);
            loader.add_source(Box::new(FileSource::new(path).with_priority(priority)));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        if let (Some(prefix), Some(separator)) = (self.env_prefix, self.env_separator) {
            loader.add_source(Box::new(EnvSource::new(prefix, separator)));
        }

        tracing::debug!(sources = ?loader.source_names(), "Loading freeview settings");
        let settings: FreeviewSettings = loader.load()?;

        settings
            .validate()
            .map_err(|e| BindingError::Validation(e.to_string()))?;
        for validator in &self.validators {
            validator(&settings).map_err(|e| BindingError::Validation(e.to_string()))?;
        }

        Ok(settings)
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_files() {
        let builder = SettingsBuilder::new()
            .with_file("a.yaml")
            .with_file("b.yaml")
            .with_file("c.yaml");

        assert_eq!(builder.file_paths.len(), 3);
    }

    #[test]
    fn test_builder_env_overrides() {
        let builder = SettingsBuilder::new().with_env_overrides("FREEVIEW", "__");

        assert_eq!(builder.env_prefix, Some("FREEVIEW".to_string()));
        assert_eq!(builder.env_separator, Some("__".to_string()));
    }

    #[test]
    fn test_build_without_sources() {
        let settings = SettingsBuilder::new().build().unwrap();
        assert_eq!(settings, FreeviewSettings::default());
    }

    #[test]
    fn test_custom_validator_runs() {
        let result = SettingsBuilder::new()
            .with_validation(|settings| {
                if settings.dispatch.isolate_panics {
                    return Err(ValidationError::invalid_field(
                        "dispatch.isolate_panics",
                        "must be disabled in this test",
                    ));
                }
                Ok(())
            })
            .build();

        assert!(matches!(result, Err(BindingError::Validation(_))));
    }
}
