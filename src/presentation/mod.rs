//! View presentation metadata.
//!
//! Views declare which canvas container hosts them. The catalog answers
//! "where does this view go" and "which views share a container" for the
//! engine-side view manager.

use crate::error::{BindingError, Result};
use serde::{Deserialize, Serialize};

/// Where a view is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPresentation {
    /// Name of the canvas container the view is attached to
    pub canvas_container_name: String,
}

impl ViewPresentation {
    /// Present in the named container.
    pub fn in_container(name: impl Into<String>) -> Self {
        Self {
            canvas_container_name: name.into(),
        }
    }
}

impl Default for ViewPresentation {
    /// Uses `presentation.default_container` from the installed settings.
    fn default() -> Self {
        Self::in_container(
            crate::settings::current()
                .presentation
                .default_container
                .clone(),
        )
    }
}

/// A view type with presentation metadata.
///
/// # Examples
///
/// ```rust
/// use freeview::presentation::{PresentationCatalog, PresentedView, ViewPresentation};
///
/// struct WinScreenView;
///
/// impl PresentedView for WinScreenView {
///     const VIEW_NAME: &'static str = "WinScreenView";
///
///     fn presentation() -> ViewPresentation {
///         ViewPresentation::in_container("MainCanvas")
///     }
/// }
///
/// let mut catalog = PresentationCatalog::new();
/// catalog.register::<WinScreenView>().unwrap();
/// assert_eq!(catalog.container_for("WinScreenView"), Some("MainCanvas"));
/// ```
pub trait PresentedView {
    /// Name the view is catalogued under.
    const VIEW_NAME: &'static str;

    /// Where the view is presented.
    fn presentation() -> ViewPresentation {
        ViewPresentation::default()
    }
}

/// Registry of view presentations, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PresentationCatalog {
    views: Vec<(String, ViewPresentation)>,
}

impl PresentationCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    /// Record a view's presentation, replacing any earlier record.
    ///
    /// Returns the replaced presentation.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidTypeName`] if `view_name` is empty.
    pub fn insert(
        &mut self,
        view_name: impl Into<String>,
        presentation: ViewPresentation,
    ) -> Result<Option<ViewPresentation>> {
        let view_name = view_name.into();
        if view_name.is_empty() {
            return Err(BindingError::InvalidTypeName {
                capability: "view",
            });
        }

        tracing::trace!(
            view = %view_name,
            container = %presentation.canvas_container_name,
            "Registering view presentation"
        );
        match self.views.iter_mut().find(|(name, _)| *name == view_name) {
            Some((_, existing)) => Ok(Some(std::mem::replace(existing, presentation))),
            None => {
                self.views.push((view_name, presentation));
                Ok(None)
            }
        }
    }

    /// Record `V`'s declared presentation.
    pub fn register<V: PresentedView>(&mut self) -> Result<Option<ViewPresentation>> {
        self.insert(V::VIEW_NAME, V::presentation())
    }

    /// The presentation recorded for `view_name`.
    pub fn get(&self, view_name: &str) -> Option<&ViewPresentation> {
        self.views
            .iter()
            .find(|(name, _)| name == view_name)
            .map(|(_, presentation)| presentation)
    }

    /// The container hosting `view_name`.
    pub fn container_for(&self, view_name: &str) -> Option<&str> {
        self.get(view_name)
            .map(|presentation| presentation.canvas_container_name.as_str())
    }

    /// Views hosted by `container`, in registration order.
    pub fn views_in(&self, container: &str) -> Vec<&str> {
        self.views
            .iter()
            .filter(|(_, presentation)| presentation.canvas_container_name == container)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Number of catalogued views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HudView;

    impl PresentedView for HudView {
        const VIEW_NAME: &'static str = "HudView";
    }

    #[test]
    fn test_default_container() {
        assert_eq!(
            ViewPresentation::default().canvas_container_name,
            crate::settings::current().presentation.default_container
        );
    }

    #[test]
    fn test_views_in_container() {
        let mut catalog = PresentationCatalog::new();
        catalog
            .insert("PlaygroundView", ViewPresentation::in_container("MainCanvas"))
            .unwrap();
        catalog
            .insert("PauseView", ViewPresentation::in_container("Overlay"))
            .unwrap();
        catalog
            .insert("WinScreenView", ViewPresentation::in_container("MainCanvas"))
            .unwrap();

        assert_eq!(
            catalog.views_in("MainCanvas"),
            vec!["PlaygroundView", "WinScreenView"]
        );
        assert_eq!(catalog.container_for("PauseView"), Some("Overlay"));
        assert!(catalog.container_for("Missing").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = PresentationCatalog::new();
        catalog.register::<HudView>().unwrap();

        let previous = catalog
            .insert("HudView", ViewPresentation::in_container("Overlay"))
            .unwrap();
        assert!(previous.is_some());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.container_for("HudView"), Some("Overlay"));
    }

    #[test]
    fn test_empty_view_name_rejected() {
        let mut catalog = PresentationCatalog::new();
        assert!(
            catalog
                .insert("", ViewPresentation::in_container("MainCanvas"))
                .is_err()
        );
        assert!(catalog.is_empty());
    }
}
