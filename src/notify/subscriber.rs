//! Listener registry delivering change notifications.

use crate::core::ChangeNotification;
use crate::error::panic_message;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

#[cfg(feature = "metrics")]
use crate::metrics::BindingMetrics;

type Listener = Arc<dyn Fn(&ChangeNotification) + Send + Sync>;

/// Handle for a subscription that can be dropped to unsubscribe.
///
/// When the handle is dropped, the listener is removed before `drop` returns.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<RegistryInner>>,
}

impl Subscription {
    /// Keep the listener registered for the lifetime of the registry.
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let removed = {
                let mut inner = registry.lock();
                inner
                    .listeners
                    .iter()
                    .position(|(listener_id, _)| *listener_id == self.id)
                    .map(|index| inner.listeners.remove(index))
            };
            // Listener captures may own other subscriptions; drop them unlocked
            drop(removed);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Internal registry state.
struct RegistryInner {
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Outcome of delivering one notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Listeners that returned normally
    pub delivered: usize,
    /// Listeners that panicked
    pub failed: usize,
}

/// Registry of listeners for change notifications.
///
/// Listeners are invoked synchronously in the order they subscribed. A
/// listener that panics is isolated: the panic is logged and counted, and
/// delivery continues with the next listener. Every listener in the
/// snapshot is called, whatever the isolation setting.
///
/// # Examples
///
/// ```rust
/// use freeview::core::ChangeNotification;
/// use freeview::notify::ListenerRegistry;
///
/// let registry = ListenerRegistry::new();
///
/// let handle = registry.subscribe(|change| {
///     println!("{} changed", change.property_name());
/// });
///
/// let change = ChangeNotification::new("IsDoorOpened", true).unwrap();
/// let report = registry.notify(&change);
/// assert_eq!(report.delivered, 1);
///
/// // Unsubscribe by dropping the handle
/// drop(handle);
/// assert_eq!(registry.listener_count(), 0);
/// ```
pub struct ListenerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
    isolate_panics: bool,
    trace_notifications: bool,
    #[cfg(feature = "metrics")]
    metrics: Option<BindingMetrics>,
}

impl ListenerRegistry {
    /// Create a new registry using the process-wide dispatch settings and,
    /// with the `metrics` feature, the process-wide metrics collector.
    pub fn new() -> Self {
        let settings = crate::settings::current();
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                listeners: Vec::new(),
                next_id: 0,
            })),
            isolate_panics: settings.dispatch.isolate_panics,
            trace_notifications: settings.dispatch.trace_notifications,
            #[cfg(feature = "metrics")]
            metrics: crate::metrics::global().cloned(),
        }
    }

    /// Override whether listener panics are isolated.
    ///
    /// When disabled, the first listener panic is resumed once every other
    /// listener has received the notification.
    pub fn with_panic_isolation(mut self, isolate: bool) -> Self {
        self.isolate_panics = isolate;
        self
    }

    /// Record dispatch counters on `metrics`.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: BindingMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Register a listener.
    ///
    /// Returns a handle that unsubscribes the listener when dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `change` to every listener in registration order.
    ///
    /// Listeners run on a snapshot of the registry, so they may subscribe
    /// or unsubscribe while being called.
    pub fn notify(&self, change: &ChangeNotification) -> DispatchReport {
        let snapshot: Vec<Listener> = self
            .inner
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        if self.trace_notifications {
            tracing::debug!(
                property = change.property_name(),
                value = %change.value(),
                listeners = snapshot.len(),
                "Dispatching change notification"
            );
        }

        let mut report = DispatchReport::default();
        let mut first_panic = None;
        for listener in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(change))) {
                Ok(()) => report.delivered += 1,
                Err(payload) => {
                    report.failed += 1;
                    tracing::warn!(
                        property = change.property_name(),
                        panic = panic_message(payload.as_ref()),
                        "Change listener panicked"
                    );
                    first_panic.get_or_insert(payload);
                }
            }
        }

        self.record(report);
        if let Some(payload) = first_panic {
            if !self.isolate_panics {
                panic::resume_unwind(payload);
            }
        }
        report
    }

    /// Get the number of active listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    #[cfg(feature = "metrics")]
    fn record(&self, report: DispatchReport) {
        if let Some(metrics) = &self.metrics {
            metrics.record_dispatch(report.delivered, report.failed);
        }
    }

    #[cfg(not(feature = "metrics"))]
    fn record(&self, _report: DispatchReport) {}
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
