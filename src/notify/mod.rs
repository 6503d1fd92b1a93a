//! Change notification dispatch.
//!
//! Provides the listener registry that observables use to deliver
//! [`ChangeNotification`](crate::core::ChangeNotification)s.

pub mod subscriber;

pub use subscriber::{DispatchReport, ListenerRegistry, Subscription};
