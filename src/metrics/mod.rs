//! Built-in metrics for binding operations.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Notifications delivered
//! - Listener panics
//! - Discovery runs, failures and instances created
//!
//! Install a collector once at start-up; listener registries created
//! afterwards and every discovery call report to it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use freeview::metrics::{self, BindingMetrics};
//! use opentelemetry::global;
//!
//! metrics::install_global(BindingMetrics::new(global::meter("my-game")));
//! ```

mod binding_metrics;

pub use binding_metrics::BindingMetrics;

use std::sync::OnceLock;

static GLOBAL: OnceLock<BindingMetrics> = OnceLock::new();

/// Install the process-wide metrics collector.
///
/// Returns `false` if one was already installed; the first one stays.
pub fn install_global(metrics: BindingMetrics) -> bool {
    GLOBAL.set(metrics).is_ok()
}

/// The process-wide metrics collector, if installed.
pub fn global() -> Option<&'static BindingMetrics> {
    GLOBAL.get()
}
