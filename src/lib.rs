//! # freeview
//!
//! MVVM binding core for game-engine front-ends.
//!
//! ## Overview
//!
//! `freeview` provides the engine-independent half of a Model-View-ViewModel
//! layer:
//! - Observable view-model state (`ObservableProperty`, `DataContext`) with
//!   lock-free reads using `arc-swap`
//! - Synchronous change notifications delivered in subscription order, with
//!   per-listener panic isolation
//! - Explicit capability registries for discovering every implementation of
//!   a plugin trait (converters, command handlers, ...)
//! - View presentation metadata
//! - Layered settings (files → env vars)
//!
//! ## Quick Start
//!
//! ```rust
//! use freeview::prelude::*;
//!
//! # fn main() -> freeview::error::Result<()> {
//! let is_door_opened = ObservableProperty::new("IsDoorOpened", false)?;
//!
//! // A view binds its label to the view-model property
//! let _binding = is_door_opened.subscribe(|change| {
//!     let opened = change.value().as_bool().unwrap_or(false);
//!     println!("Door is {}", if opened { "opened" } else { "closed" });
//! });
//!
//! is_door_opened.update(|open| !open)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `yaml`, `toml`, `json` (default): settings file formats
//! - `metrics`: OpenTelemetry counters for dispatch and discovery

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod discovery;
pub mod error;
pub mod notify;
pub mod presentation;
pub mod settings;
pub mod sources;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ChangeNotification, DataContext, Handle, ObservableProperty, Value};
    pub use crate::discovery::{
        Capability, ConstructorArgs, RegisterTypes, TypeDecl, TypeScope, TypeScopeBuilder,
        discover, discover_in,
    };
    pub use crate::error::{BindingError, ConstructionError, Result};
    pub use crate::notify::{ListenerRegistry, Subscription};
    pub use crate::presentation::{PresentationCatalog, PresentedView, ViewPresentation};
    pub use crate::settings::FreeviewSettings;
}
