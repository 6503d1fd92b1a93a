//! Capability discovery.
//!
//! Modules register their implementations of a capability into a
//! [`TypeScope`]; [`discover`] and [`discover_in`] instantiate every
//! concrete implementation and return them in the capability's order.
//!
//! Registration is explicit. At start-up the application builds a scope by
//! running each module's [`RegisterTypes`] routine in a fixed order, then
//! installs it with [`install_global_scope`].

mod args;
mod capability;
mod discover;
mod scope;

pub use args::ConstructorArgs;
pub use capability::Capability;
pub use discover::{discover, discover_in, global_scope, install_global_scope};
pub use scope::{Factory, RegisterTypes, TypeDecl, TypeEntry, TypeScope, TypeScopeBuilder};
