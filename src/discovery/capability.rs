//! The capability contract discovered types implement.

use std::cmp::Ordering;

/// A base type whose implementations can be discovered.
///
/// Implement this for the trait object type of a plugin trait
/// (`impl Capability for dyn Shape {}`). Override [`compare`](Self::compare)
/// to give discovered instances an order; without it, discovering more than
/// one instance fails with an ordering error.
///
/// The relation must order every pair of instances that can be discovered
/// together. A partial order is rejected as soon as the sort meets an
/// incomparable pair: `compare` returning `None` for any pair fails the
/// whole discovery with [`BindingError::Ordering`](crate::error::BindingError::Ordering).
///
/// # Examples
///
/// ```rust
/// use freeview::discovery::Capability;
/// use std::cmp::Ordering;
///
/// trait Converter: Send {
///     fn priority(&self) -> u32;
/// }
///
/// impl Capability for dyn Converter {
///     fn compare(a: &Self, b: &Self) -> Option<Ordering> {
///         Some(a.priority().cmp(&b.priority()))
///     }
/// }
/// ```
pub trait Capability: 'static {
    /// Order two instances, or `None` if they cannot be compared.
    ///
    /// Returning `None` for any compared pair fails discovery.
    fn compare(a: &Self, b: &Self) -> Option<Ordering> {
        let _ = (a, b);
        None
    }

    /// Name used in logs and errors.
    fn capability_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
