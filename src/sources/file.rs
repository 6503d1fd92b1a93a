//! File-based settings source.

use super::SettingsSource;
use crate::error::{BindingError, Result};
use config::File;
use std::collections::HashMap;
use std::path::PathBuf;

/// File-based settings source.
///
/// Loads settings from YAML, TOML, or JSON files, detecting the format from
/// the file extension.
///
/// # Examples
///
/// ```rust,no_run
/// use freeview::sources::FileSource;
///
/// let source = FileSource::new("settings/freeview.yaml");
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
    required: bool,
}

impl FileSource {
    /// Create a new file source.
    ///
    /// The format is detected from the file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
            required: true,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Treat a missing file as empty instead of failing.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn validate_extension(&self) -> Result<()> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                BindingError::Load(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" | "toml" | "json" => Ok(()),
            _ => Err(BindingError::Load(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            ))),
        }
    }
}

impl SettingsSource for FileSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        self.validate_extension()?;

        if !self.path.exists() {
            if self.required {
                return Err(BindingError::Load(format!(
                    "Settings file not found: {}",
                    self.path.display()
                )));
            }
            tracing::debug!(path = %self.path.display(), "Optional settings file missing");
            return Ok(HashMap::new());
        }

        let parsed = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| BindingError::Load(format!("Failed to load file: {}", e)))?;

        parsed
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| BindingError::Deserialization(format!("Failed to parse file: {}", e)))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
