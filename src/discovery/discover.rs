//! Instantiating every concrete implementation of a capability.

use crate::discovery::{Capability, ConstructorArgs, TypeScope};
use crate::error::{BindingError, ConstructionError, Result, panic_message};
use arc_swap::ArcSwap;
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock};

#[cfg(feature = "metrics")]
use crate::metrics;

static GLOBAL_SCOPE: LazyLock<ArcSwap<TypeScope>> = LazyLock::new(|| {
    let name = crate::settings::current().discovery.scope_name.clone();
    ArcSwap::from_pointee(TypeScope::empty(name))
});

/// Install `scope` as the process-wide discovery scope.
///
/// Returns the scope it replaced. Discoveries already running keep using
/// the scope they started with.
pub fn install_global_scope(scope: TypeScope) -> Arc<TypeScope> {
    tracing::debug!(scope = scope.name(), types = scope.len(), "Installing global type scope");
    GLOBAL_SCOPE.swap(Arc::new(scope))
}

/// Get the process-wide discovery scope.
///
/// This operation is lock-free.
pub fn global_scope() -> Arc<TypeScope> {
    GLOBAL_SCOPE.load_full()
}

/// Instantiate every concrete `T` in the process-wide scope.
///
/// See [`discover_in`].
pub fn discover<T>(args: &ConstructorArgs) -> Result<Vec<Box<T>>>
where
    T: Capability + ?Sized,
{
    discover_in(&global_scope(), args)
}

/// Instantiate every concrete `T` registered in `scope`, sorted by
/// [`Capability::compare`].
///
/// Each concrete entry's factory is called once, in registration order,
/// with `args`. Abstract entries and entries of other capabilities are
/// skipped. Nothing is cached: every call builds fresh instances.
///
/// # Errors
///
/// - [`BindingError::Instantiation`] naming the first type whose factory
///   rejected `args` or panicked. No instances are returned.
/// - [`BindingError::Ordering`] if two or more instances were built and
///   `T::compare` returned `None` for any pair it was asked about, or
///   panicked. Partial orders are therefore only accepted when every pair
///   the sort compares is related.
///
/// # Examples
///
/// ```rust
/// use freeview::discovery::{discover_in, Capability, ConstructorArgs, TypeScope};
/// use std::cmp::Ordering;
///
/// trait Shape: Send {
///     fn name(&self) -> &'static str;
/// }
///
/// impl Capability for dyn Shape {
///     fn compare(a: &Self, b: &Self) -> Option<Ordering> {
///         Some(a.name().cmp(b.name()))
///     }
/// }
///
/// struct Circle;
/// struct Square;
/// impl Shape for Circle { fn name(&self) -> &'static str { "Circle" } }
/// impl Shape for Square { fn name(&self) -> &'static str { "Square" } }
///
/// # fn main() -> freeview::error::Result<()> {
/// let mut builder = TypeScope::builder("shapes");
/// builder
///     .concrete::<dyn Shape, _>("Square", |_| Ok(Box::new(Square)))?
///     .concrete::<dyn Shape, _>("Circle", |_| Ok(Box::new(Circle)))?;
/// let scope = builder.build();
///
/// let shapes = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new())?;
/// let names: Vec<_> = shapes.iter().map(|s| s.name()).collect();
/// assert_eq!(names, vec!["Circle", "Square"]);
/// # Ok(())
/// # }
/// ```
pub fn discover_in<T>(scope: &TypeScope, args: &ConstructorArgs) -> Result<Vec<Box<T>>>
where
    T: Capability + ?Sized,
{
    let capability = T::capability_name();
    let result = instantiate_all::<T>(scope, args).and_then(sort_instances::<T>);

    match &result {
        Ok(instances) => tracing::debug!(
            scope = scope.name(),
            capability,
            instances = instances.len(),
            "Discovered capability implementations"
        ),
        Err(e) => tracing::debug!(
            scope = scope.name(),
            capability,
            error = %e,
            "Capability discovery failed"
        ),
    }

    record_outcome(&result);
    result
}

#[cfg(feature = "metrics")]
fn record_outcome<T: ?Sized>(result: &Result<Vec<Box<T>>>) {
    if let Some(metrics) = metrics::global() {
        match result {
            Ok(instances) => metrics.record_discovery(instances.len()),
            Err(_) => metrics.record_discovery_failure(),
        }
    }
}

#[cfg(not(feature = "metrics"))]
fn record_outcome<T: ?Sized>(_result: &Result<Vec<Box<T>>>) {}

fn instantiate_all<T>(scope: &TypeScope, args: &ConstructorArgs) -> Result<Vec<Box<T>>>
where
    T: Capability + ?Sized,
{
    let mut instances = Vec::new();

    for entry in scope.variants_of::<T>().filter(|entry| entry.is_concrete()) {
        let instantiation_error = |reason| BindingError::Instantiation {
            type_name: entry.name().to_string(),
            reason,
        };

        let factory = entry.factory::<T>().ok_or_else(|| {
            instantiation_error(ConstructionError::failed(
                "registered factory does not produce this capability",
            ))
        })?;

        let instance = match panic::catch_unwind(AssertUnwindSafe(|| factory(args))) {
            Ok(built) => built.map_err(instantiation_error)?,
            Err(payload) => {
                return Err(instantiation_error(ConstructionError::failed(format!(
                    "constructor panicked: {}",
                    panic_message(payload.as_ref())
                ))));
            }
        };
        instances.push(instance);
    }

    Ok(instances)
}

fn sort_instances<T>(mut instances: Vec<Box<T>>) -> Result<Vec<Box<T>>>
where
    T: Capability + ?Sized,
{
    if instances.len() < 2 {
        return Ok(instances);
    }

    let mut incomparable = false;
    let sorted = panic::catch_unwind(AssertUnwindSafe(|| {
        instances.sort_by(|a, b| {
            T::compare(a, b).unwrap_or_else(|| {
                incomparable = true;
                Ordering::Equal
            })
        });
    }));

    let reason = match sorted {
        Err(payload) => format!("comparison panicked: {}", panic_message(payload.as_ref())),
        Ok(()) if incomparable => "no ordering defined between some instances".to_string(),
        Ok(()) => return Ok(instances),
    };

    Err(BindingError::Ordering {
        capability: T::capability_name(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::TypeDecl;

    trait Shape: Send {
        fn name(&self) -> String;
    }

    impl Capability for dyn Shape {
        fn compare(a: &Self, b: &Self) -> Option<Ordering> {
            Some(a.name().cmp(&b.name()))
        }
    }

    trait Unordered: Send {}

    impl Capability for dyn Unordered {}

    struct Named(&'static str);

    impl Shape for Named {
        fn name(&self) -> String {
            self.0.to_string()
        }
    }

    impl Unordered for Named {}

    fn names(shapes: &[Box<dyn Shape>]) -> Vec<String> {
        shapes.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_sorted_by_capability_order() {
        let mut builder = TypeScope::builder("shapes");
        builder
            .concrete::<dyn Shape, _>("Square", |_| Ok(Box::new(Named("Square"))))
            .unwrap()
            .concrete::<dyn Shape, _>("Circle", |_| Ok(Box::new(Named("Circle"))))
            .unwrap();
        let scope = builder.build();

        let shapes = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new()).unwrap();
        assert_eq!(names(&shapes), vec!["Circle", "Square"]);
    }

    #[test]
    fn test_abstract_and_foreign_entries_skipped() {
        let mut builder = TypeScope::builder("shapes");
        builder
            .abstract_type::<dyn Shape>("Polygon")
            .unwrap()
            .concrete::<dyn Shape, _>(TypeDecl::new("Square").extends("Polygon"), |_| {
                Ok(Box::new(Named("Square")))
            })
            .unwrap()
            .concrete::<dyn Unordered, _>("Loose", |_| Ok(Box::new(Named("Loose"))))
            .unwrap();
        let scope = builder.build();

        let shapes = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new()).unwrap();
        assert_eq!(names(&shapes), vec!["Square"]);
    }

    #[test]
    fn test_empty_scope() {
        let scope = TypeScope::empty("nothing");
        let shapes = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new()).unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_factory_rejection_names_type() {
        let mut builder = TypeScope::builder("shapes");
        builder
            .concrete::<dyn Shape, _>("Circle", |_| Ok(Box::new(Named("Circle"))))
            .unwrap()
            .concrete::<dyn Shape, _>("Triangle", |args| {
                args.expect_arity(1)?;
                args.int_at(0)?;
                Ok(Box::new(Named("Triangle")))
            })
            .unwrap();
        let scope = builder.build();

        let err = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new()).err().unwrap();
        match err {
            BindingError::Instantiation { type_name, reason } => {
                assert_eq!(type_name, "Triangle");
                assert_eq!(
                    reason,
                    ConstructionError::Arity {
                        expected: 1,
                        actual: 0
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_factory_panic_becomes_instantiation_error() {
        let mut builder = TypeScope::builder("shapes");
        builder
            .concrete::<dyn Shape, _>("Broken", |_| panic!("no canvas"))
            .unwrap();
        let scope = builder.build();

        let err = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new()).err().unwrap();
        assert_eq!(err.type_name(), Some("Broken"));
        assert!(err.to_string().contains("no canvas"));
    }

    #[test]
    fn test_missing_ordering() {
        let mut builder = TypeScope::builder("loose");
        builder
            .concrete::<dyn Unordered, _>("A", |_| Ok(Box::new(Named("A"))))
            .unwrap()
            .concrete::<dyn Unordered, _>("B", |_| Ok(Box::new(Named("B"))))
            .unwrap();
        let scope = builder.build();

        let result = discover_in::<dyn Unordered>(&scope, &ConstructorArgs::new());
        assert!(matches!(result, Err(BindingError::Ordering { .. })));
    }

    #[test]
    fn test_panicking_comparison() {
        trait Fragile: Send {}

        impl Capability for dyn Fragile {
            fn compare(_: &Self, _: &Self) -> Option<Ordering> {
                panic!("comparator broke")
            }
        }

        impl Fragile for Named {}

        let mut builder = TypeScope::builder("fragile");
        builder
            .concrete::<dyn Fragile, _>("A", |_| Ok(Box::new(Named("A"))))
            .unwrap()
            .concrete::<dyn Fragile, _>("B", |_| Ok(Box::new(Named("B"))))
            .unwrap();
        let scope = builder.build();

        match discover_in::<dyn Fragile>(&scope, &ConstructorArgs::new()) {
            Err(BindingError::Ordering { reason, .. }) => {
                assert!(reason.contains("comparison panicked"), "{}", reason);
                assert!(reason.contains("comparator broke"), "{}", reason);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(found) => panic!("expected an ordering error, got {} instances", found.len()),
        }
    }

    #[test]
    fn test_partial_order_with_incomparable_pair_rejected() {
        trait Numbered: Send {
            fn number(&self) -> i64;
        }

        // Evens and odds are ordered among themselves only
        impl Capability for dyn Numbered {
            fn compare(a: &Self, b: &Self) -> Option<Ordering> {
                (a.number() % 2 == b.number() % 2).then(|| a.number().cmp(&b.number()))
            }
        }

        struct Number(i64);

        impl Numbered for Number {
            fn number(&self) -> i64 {
                self.0
            }
        }

        let mut builder = TypeScope::builder("numbers");
        builder
            .concrete::<dyn Numbered, _>("Four", |_| Ok(Box::new(Number(4))))
            .unwrap()
            .concrete::<dyn Numbered, _>("Two", |_| Ok(Box::new(Number(2))))
            .unwrap();
        let scope = builder.build();
        let found = discover_in::<dyn Numbered>(&scope, &ConstructorArgs::new()).unwrap();
        let numbers: Vec<_> = found.iter().map(|n| n.number()).collect();
        assert_eq!(numbers, vec![2, 4]);

        let mut builder = TypeScope::builder("numbers");
        builder
            .concrete::<dyn Numbered, _>("Two", |_| Ok(Box::new(Number(2))))
            .unwrap()
            .concrete::<dyn Numbered, _>("Three", |_| Ok(Box::new(Number(3))))
            .unwrap();
        let scope = builder.build();
        assert!(matches!(
            discover_in::<dyn Numbered>(&scope, &ConstructorArgs::new()),
            Err(BindingError::Ordering { .. })
        ));
    }

    #[test]
    fn test_single_instance_needs_no_ordering() {
        let mut builder = TypeScope::builder("loose");
        builder
            .concrete::<dyn Unordered, _>("A", |_| Ok(Box::new(Named("A"))))
            .unwrap();
        let scope = builder.build();

        let found = discover_in::<dyn Unordered>(&scope, &ConstructorArgs::new()).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_each_call_builds_fresh_instances() {
        use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

        static BUILT: AtomicUsize = AtomicUsize::new(0);

        let mut builder = TypeScope::builder("shapes");
        builder
            .concrete::<dyn Shape, _>("Circle", |_| {
                BUILT.fetch_add(1, AtomicOrdering::SeqCst);
                Ok(Box::new(Named("Circle")))
            })
            .unwrap();
        let scope = builder.build();

        let first = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new()).unwrap();
        let second = discover_in::<dyn Shape>(&scope, &ConstructorArgs::new()).unwrap();

        assert_eq!(BUILT.load(AtomicOrdering::SeqCst), 2);
        assert_eq!(names(&first), names(&second));
        let first_ptr = &*first[0] as *const dyn Shape as *const u8;
        let second_ptr = &*second[0] as *const dyn Shape as *const u8;
        assert_ne!(first_ptr, second_ptr);
    }
}
