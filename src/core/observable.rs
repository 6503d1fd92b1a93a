//! Observable properties providing lock-free reads and change notifications.

use crate::core::{ChangeNotification, Value};
use crate::error::{BindingError, Result};
use crate::notify::{ListenerRegistry, Subscription};
use arc_swap::ArcSwap;
use parking_lot::ReentrantMutex;
use std::sync::Arc;

/// A single named value that notifies listeners when it changes.
///
/// Reads go through `arc-swap` and never block. Writes are serialized
/// through their notification: a second writer waits until listeners have
/// seen the first write, so listeners observe writes in store order and the
/// last notified value is the stored one. A write that does not change the
/// value emits nothing.
///
/// The write lock is reentrant, so a listener may write back to the same
/// property from the notifying thread. Listeners that write to another
/// property whose listeners write back to this one from a different thread
/// can deadlock.
///
/// # Examples
///
/// ```rust
/// use freeview::core::ObservableProperty;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let is_open = ObservableProperty::new("IsDoorOpened", false).unwrap();
///
/// let seen = Arc::new(AtomicBool::new(false));
/// let seen_clone = Arc::clone(&seen);
/// let _handle = is_open.subscribe(move |change| {
///     seen_clone.store(change.value().as_bool().unwrap(), Ordering::SeqCst);
/// });
///
/// assert!(is_open.set(true).unwrap());
/// assert!(seen.load(Ordering::SeqCst));
///
/// // Same value again: no notification
/// assert!(!is_open.set(true).unwrap());
/// ```
pub struct ObservableProperty<T> {
    name: Arc<str>,
    current: Arc<ArcSwap<T>>,
    write_lock: Arc<ReentrantMutex<()>>,
    listeners: Arc<ListenerRegistry>,
}

impl<T> ObservableProperty<T>
where
    T: Clone + PartialEq + Into<Value>,
{
    /// Create a property with an initial value.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidPropertyName`] if `name` is empty.
    pub fn new(name: impl Into<String>, initial: T) -> Result<Self> {
        Self::with_registry(name, initial, ListenerRegistry::new())
    }

    /// Create a property that dispatches through a preconfigured registry.
    pub fn with_registry(
        name: impl Into<String>,
        initial: T,
        listeners: ListenerRegistry,
    ) -> Result<Self> {
        let name: String = name.into();
        if name.is_empty() {
            return Err(BindingError::InvalidPropertyName);
        }
        Ok(Self {
            name: name.into(),
            current: Arc::new(ArcSwap::new(Arc::new(initial))),
            write_lock: Arc::new(ReentrantMutex::new(())),
            listeners: Arc::new(listeners),
        })
    }

    /// Name reported in this property's notifications.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a reference-counted handle to the current value.
    ///
    /// This operation is lock-free.
    pub fn get(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Replace the value, notifying listeners if it changed.
    ///
    /// Returns whether the value changed. Listeners run on the calling
    /// thread after the new value is visible to readers.
    pub fn set(&self, value: T) -> Result<bool> {
        let _guard = self.write_lock.lock();
        if **self.current.load() == value {
            return Ok(false);
        }
        let change = ChangeNotification::new(self.name.as_ref(), value.clone())?;
        self.current.store(Arc::new(value));

        self.listeners.notify(&change);
        Ok(true)
    }

    /// Apply `f` to the current value and store the result.
    ///
    /// The read and the write happen under the write lock, so concurrent
    /// updates are not lost.
    pub fn update<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&T) -> T,
    {
        let _guard = self.write_lock.lock();
        let next = f(&self.get());
        self.set(next)
    }

    /// Subscribe to changes of this property.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Get the number of active listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }
}

impl<T> Clone for ObservableProperty<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            current: Arc::clone(&self.current),
            write_lock: Arc::clone(&self.write_lock),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_create_and_read() {
        let prop = ObservableProperty::new("Score", 42i64).unwrap();
        assert_eq!(*prop.get(), 42);
        assert_eq!(prop.name(), "Score");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            ObservableProperty::new("", 1i64),
            Err(BindingError::InvalidPropertyName)
        ));
    }

    #[test]
    fn test_equal_value_does_not_emit() {
        let prop = ObservableProperty::new("IsDoorOpened", false).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        let _handle = prop.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!prop.set(false).unwrap());
        assert!(prop.set(true).unwrap());
        assert!(!prop.set(true).unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notification_carries_new_value() {
        let prop = ObservableProperty::new("Title", String::from("a")).unwrap();
        let seen = Arc::new(Mutex::new(None));

        let seen_clone = Arc::clone(&seen);
        let _handle = prop.subscribe(move |change| {
            *seen_clone.lock() = Some(change.clone());
        });

        prop.set("b".to_string()).unwrap();
        let change = seen.lock().clone().unwrap();
        assert_eq!(change.property_name(), "Title");
        assert_eq!(change.value().as_text(), Some("b"));
    }

    #[test]
    fn test_listener_sees_new_value() {
        let prop = ObservableProperty::new("Count", 0i64).unwrap();
        let observed = Arc::new(AtomicUsize::new(0));

        let reader = prop.clone();
        let observed_clone = Arc::clone(&observed);
        let _handle = prop.subscribe(move |_| {
            observed_clone.store(*reader.get() as usize, Ordering::SeqCst);
        });

        prop.update(|n| n + 5).unwrap();
        assert_eq!(observed.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let prop = ObservableProperty::new("Count", 0i64).unwrap();
        let last_seen = Arc::new(Mutex::new(0i64));

        let last_seen_clone = Arc::clone(&last_seen);
        let _handle = prop.subscribe(move |change| {
            *last_seen_clone.lock() = change.value().as_int().unwrap();
        });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let prop = prop.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        prop.update(|n| n + 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*prop.get(), 800);
        assert_eq!(*last_seen.lock(), 800);
    }

    #[test]
    fn test_listener_can_write_back() {
        let prop = ObservableProperty::new("Count", 0i64).unwrap();

        let writer = prop.clone();
        let _handle = prop.subscribe(move |change| {
            // Clamp to 10
            if change.value().as_int().unwrap() > 10 {
                writer.set(10).unwrap();
            }
        });

        prop.set(15).unwrap();
        assert_eq!(*prop.get(), 10);
    }

    #[test]
    fn test_clone_shares_state() {
        let prop = ObservableProperty::new("Count", 1i64).unwrap();
        let other = prop.clone();

        other.set(2).unwrap();
        assert_eq!(*prop.get(), 2);
    }
}
