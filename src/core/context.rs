//! A dynamically-shaped view-model.

use crate::core::{ChangeNotification, Value};
use crate::error::{BindingError, Result};
use crate::notify::{ListenerRegistry, Subscription};
use parking_lot::{ReentrantMutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A bag of named values that views bind to by property name.
///
/// The property set is open: any non-empty name may be written, and the
/// first write creates the property. Every write that changes a value raises
/// a [`ChangeNotification`] with the property's name. Writes are serialized
/// through their notification, so listeners see changes in store order.
/// Listeners may read the context and write back to it from the notifying
/// thread.
///
/// # Examples
///
/// ```rust
/// use freeview::core::DataContext;
///
/// let context = DataContext::new();
/// let _handle = context.subscribe_property("IsDoorOpened", |change| {
///     println!("door is now {}", change.value());
/// });
///
/// assert!(context.set("IsDoorOpened", true).unwrap());
/// assert_eq!(context.get("IsDoorOpened").and_then(|v| v.as_bool()), Some(true));
/// ```
#[derive(Clone)]
pub struct DataContext {
    values: Arc<RwLock<BTreeMap<String, Value>>>,
    write_lock: Arc<ReentrantMutex<()>>,
    listeners: Arc<ListenerRegistry>,
}

impl DataContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::with_registry(ListenerRegistry::new())
    }

    /// Create an empty context that dispatches through `listeners`.
    pub fn with_registry(listeners: ListenerRegistry) -> Self {
        Self {
            values: Arc::new(RwLock::new(BTreeMap::new())),
            write_lock: Arc::new(ReentrantMutex::new(())),
            listeners: Arc::new(listeners),
        }
    }

    /// Write a property, notifying listeners if the value changed.
    ///
    /// Returns whether the value changed. Creating a property counts as a
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidPropertyName`] if `name` is empty.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        if name.is_empty() {
            return Err(BindingError::InvalidPropertyName);
        }
        let value = value.into();

        let _guard = self.write_lock.lock();
        let change = {
            let mut values = self.values.write();
            if values.get(name) == Some(&value) {
                return Ok(false);
            }
            values.insert(name.to_string(), value.clone());
            ChangeNotification::new(name, value)?
        };

        self.listeners.notify(&change);
        Ok(true)
    }

    /// Read a property.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.read().get(name).cloned()
    }

    /// Whether `name` has been written.
    pub fn contains(&self, name: &str) -> bool {
        self.values.read().contains_key(name)
    }

    /// Names of all properties, sorted.
    pub fn property_names(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Subscribe to changes of every property.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Subscribe to changes of a single property.
    pub fn subscribe_property<F>(&self, name: impl Into<String>, listener: F) -> Subscription
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        let name = name.into();
        self.listeners.subscribe(move |change| {
            if change.property_name() == name {
                listener(change);
            }
        })
    }
}

impl Default for DataContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DataContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContext")
            .field("values", &*self.values.read())
            .field("listeners", &self.listeners.listener_count())
            .finish()
    }
}
