//! Process-wide binding settings.
//!
//! Settings are loaded from layered sources with [`SettingsBuilder`] and
//! installed with [`FreeviewSettings::apply`]. Components read the installed
//! settings through [`current`] when they are created.

mod builder;
mod loader;
mod validation;

pub use builder::SettingsBuilder;
pub(crate) use loader::SettingsLoader;
pub use validation::Validate;

use crate::error::ValidationError;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

static CURRENT: LazyLock<ArcSwap<FreeviewSettings>> =
    LazyLock::new(|| ArcSwap::from_pointee(FreeviewSettings::default()));

/// Get the currently installed settings.
///
/// Returns the defaults until [`FreeviewSettings::apply`] has been called.
pub fn current() -> Arc<FreeviewSettings> {
    CURRENT.load_full()
}

/// Top-level settings.
///
/// # Examples
///
/// ```rust
/// use freeview::settings::FreeviewSettings;
///
/// let settings = FreeviewSettings::default();
/// assert!(settings.dispatch.isolate_panics);
/// assert_eq!(settings.presentation.default_container, "MainCanvas");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeviewSettings {
    /// Notification dispatch behaviour
    pub dispatch: DispatchSettings,
    /// Type discovery behaviour
    pub discovery: DiscoverySettings,
    /// View presentation defaults
    pub presentation: PresentationSettings,
}

/// Settings for listener registries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Catch listener panics so later listeners still run
    pub isolate_panics: bool,
    /// Log every dispatched notification at debug level
    pub trace_notifications: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            isolate_panics: true,
            trace_notifications: false,
        }
    }
}

/// Settings for capability discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Name given to the process-wide type scope before one is installed
    pub scope_name: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            scope_name: "default".to_string(),
        }
    }
}

/// Settings for view presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    /// Canvas container used by views that do not name one
    pub default_container: String,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            default_container: "MainCanvas".to_string(),
        }
    }
}

impl FreeviewSettings {
    /// Create a new builder for loading settings.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Install these settings process-wide.
    ///
    /// Components created afterwards pick up the new values; existing
    /// registries keep the values they were created with.
    pub fn apply(self) {
        tracing::debug!(settings = ?self, "Applying freeview settings");
        CURRENT.store(Arc::new(self));
    }
}

impl Validate for FreeviewSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.discovery.scope_name.trim().is_empty() {
            errors.push(ValidationError::invalid_field(
                "discovery.scope_name",
                "must not be empty",
            ));
        }
        if self.presentation.default_container.trim().is_empty() {
            errors.push(ValidationError::invalid_field(
                "presentation.default_container",
                "must not be empty",
            ));
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}
