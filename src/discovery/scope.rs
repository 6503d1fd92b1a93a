//! Type scopes: explicit registries of capability implementations.

use crate::discovery::{Capability, ConstructorArgs};
use crate::error::{BindingError, ConstructionError, Result};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Factory building one concrete variant of capability `T`.
pub type Factory<T> =
    Arc<dyn Fn(&ConstructorArgs) -> std::result::Result<Box<T>, ConstructionError> + Send + Sync>;

/// Name and optional parent of a registered type.
///
/// Converts from a plain `&str` for types without a recorded parent.
///
/// ```rust
/// use freeview::discovery::TypeDecl;
///
/// let decl = TypeDecl::new("Square").extends("Polygon");
/// assert_eq!(decl.parent(), Some("Polygon"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    name: String,
    parent: Option<String>,
}

impl TypeDecl {
    /// Declare a type by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// Record the type this one derives from.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// The type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent's name, if one was recorded.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

impl From<&str> for TypeDecl {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeDecl {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

enum EntryKind {
    Abstract,
    /// Holds a `Factory<T>` for the entry's capability.
    Concrete(Box<dyn Any + Send + Sync>),
}

/// One registered type.
pub struct TypeEntry {
    decl: TypeDecl,
    capability: TypeId,
    capability_name: &'static str,
    kind: EntryKind,
}

impl TypeEntry {
    /// The registered type name.
    pub fn name(&self) -> &str {
        self.decl.name()
    }

    /// The recorded parent type, if any.
    pub fn parent(&self) -> Option<&str> {
        self.decl.parent()
    }

    /// Rust type name of the capability this entry implements.
    pub fn capability_name(&self) -> &'static str {
        self.capability_name
    }

    /// Whether the entry can be instantiated.
    pub fn is_concrete(&self) -> bool {
        matches!(self.kind, EntryKind::Concrete(_))
    }

    pub(crate) fn belongs_to<T: Capability + ?Sized>(&self) -> bool {
        self.capability == TypeId::of::<T>()
    }

    pub(crate) fn factory<T: Capability + ?Sized>(&self) -> Option<&Factory<T>> {
        match &self.kind {
            EntryKind::Concrete(factory) => factory.downcast_ref::<Factory<T>>(),
            EntryKind::Abstract => None,
        }
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.decl.name)
            .field("parent", &self.decl.parent)
            .field("capability", &self.capability_name)
            .field("concrete", &self.is_concrete())
            .finish()
    }
}

/// An immutable, ordered set of registered types.
///
/// A scope plays the part of a loaded module: discovery enumerates its
/// entries in registration order.
///
/// # Examples
///
/// ```rust
/// use freeview::discovery::{Capability, TypeDecl, TypeScope};
///
/// trait Shape: Send {
///     fn name(&self) -> &str;
/// }
///
/// impl Capability for dyn Shape {}
///
/// struct Square;
/// impl Shape for Square {
///     fn name(&self) -> &str { "Square" }
/// }
///
/// # fn main() -> freeview::error::Result<()> {
/// let mut builder = TypeScope::builder("shapes");
/// builder
///     .abstract_type::<dyn Shape>(TypeDecl::new("Polygon"))?
///     .concrete::<dyn Shape, _>(TypeDecl::new("Square").extends("Polygon"), |args| {
///         args.expect_arity(0)?;
///         Ok(Box::new(Square))
///     })?;
/// let scope = builder.build();
///
/// assert_eq!(scope.len(), 2);
/// assert_eq!(scope.ancestry::<dyn Shape>("Square"), vec!["Square", "Polygon"]);
/// # Ok(())
/// # }
/// ```
pub struct TypeScope {
    name: String,
    entries: Vec<TypeEntry>,
}

impl TypeScope {
    /// Create a scope with no entries.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Start building a scope.
    pub fn builder(name: impl Into<String>) -> TypeScopeBuilder {
        TypeScopeBuilder::new(name)
    }

    /// The scope's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    /// Number of entries across all capabilities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scope has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries registered for capability `T`, abstract ones included.
    pub fn variants_of<T: Capability + ?Sized>(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.iter().filter(|entry| entry.belongs_to::<T>())
    }

    /// Look up an entry of capability `T` by name.
    pub fn find<T: Capability + ?Sized>(&self, name: &str) -> Option<&TypeEntry> {
        self.variants_of::<T>().find(|entry| entry.name() == name)
    }

    /// `name` followed by its recorded parents, nearest first.
    ///
    /// The walk stops at a parent that is not registered for `T`, after
    /// including that parent's name. Returns an empty vector if `name` is
    /// not registered.
    pub fn ancestry<T: Capability + ?Sized>(&self, name: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut current = self.find::<T>(name);
        while let Some(entry) = current {
            if chain.iter().any(|seen| seen == entry.name()) {
                break;
            }
            chain.push(entry.name().to_string());
            current = match entry.parent() {
                Some(parent) => match self.find::<T>(parent) {
                    Some(found) => Some(found),
                    None => {
                        chain.push(parent.to_string());
                        None
                    }
                },
                None => None,
            };
        }
        chain
    }
}

impl fmt::Debug for TypeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeScope")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .finish()
    }
}

/// A module's registration routine.
///
/// Each module that contributes variants implements this and is passed to
/// [`TypeScopeBuilder::register`] in an explicit order at start-up.
pub trait RegisterTypes {
    /// Add this module's types to `scope`.
    fn register_all(&self, scope: &mut TypeScopeBuilder) -> Result<()>;
}

impl<F> RegisterTypes for F
where
    F: Fn(&mut TypeScopeBuilder) -> Result<()>,
{
    fn register_all(&self, scope: &mut TypeScopeBuilder) -> Result<()> {
        self(scope)
    }
}

/// Builder for [`TypeScope`].
pub struct TypeScopeBuilder {
    scope: TypeScope,
}

impl TypeScopeBuilder {
    /// Create a builder for a scope called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scope: TypeScope::empty(name),
        }
    }

    /// Register a concrete variant of capability `T`.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or already registered for `T`.
    pub fn concrete<T, F>(&mut self, decl: impl Into<TypeDecl>, factory: F) -> Result<&mut Self>
    where
        T: Capability + ?Sized,
        F: Fn(&ConstructorArgs) -> std::result::Result<Box<T>, ConstructionError>
            + Send
            + Sync
            + 'static,
    {
        let factory: Factory<T> = Arc::new(factory);
        self.insert::<T>(decl.into(), EntryKind::Concrete(Box::new(factory)))
    }

    /// Register an abstract type of capability `T`.
    ///
    /// Abstract entries appear in listings and ancestry but are never
    /// instantiated.
    pub fn abstract_type<T>(&mut self, decl: impl Into<TypeDecl>) -> Result<&mut Self>
    where
        T: Capability + ?Sized,
    {
        self.insert::<T>(decl.into(), EntryKind::Abstract)
    }

    /// Run a module's registration routine.
    pub fn register(&mut self, module: &dyn RegisterTypes) -> Result<&mut Self> {
        module.register_all(self)?;
        Ok(self)
    }

    /// Finish building.
    pub fn build(self) -> TypeScope {
        tracing::debug!(
            scope = %self.scope.name,
            types = self.scope.entries.len(),
            "Built type scope"
        );
        self.scope
    }

    fn insert<T: Capability + ?Sized>(&mut self, decl: TypeDecl, kind: EntryKind) -> Result<&mut Self> {
        let capability_name = T::capability_name();
        if decl.name().is_empty() {
            return Err(BindingError::InvalidTypeName {
                capability: capability_name,
            });
        }
        if self.scope.find::<T>(decl.name()).is_some() {
            return Err(BindingError::DuplicateType {
                capability: capability_name,
                type_name: decl.name().to_string(),
            });
        }

        tracing::trace!(
            scope = %self.scope.name,
            capability = capability_name,
            type_name = decl.name(),
            concrete = matches!(kind, EntryKind::Concrete(_)),
            "Registering type"
        );
        self.scope.entries.push(TypeEntry {
            decl,
            capability: TypeId::of::<T>(),
            capability_name,
            kind,
        });
        Ok(self)
    }
}
