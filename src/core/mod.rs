//! Observable view-model state and the change notification payload.

mod context;
mod event;
mod observable;
mod value;

pub use context::DataContext;
pub use event::ChangeNotification;
pub use observable::ObservableProperty;
pub use value::{Handle, Value};
