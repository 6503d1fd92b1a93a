//! Example demonstrating capability discovery.
//!
//! This example shows how to:
//! - Declare a capability trait with an ordering
//! - Register implementations from several modules in a fixed order
//! - Install the scope process-wide and discover fresh instances
//! - Handle a variant that rejects the constructor arguments
//!
//! Run with: cargo run --example plugin_registry
//!
//! Set FREEVIEW_DISCOVERY__SCOPE_NAME to rename the default scope.

use freeview::discovery::{global_scope, install_global_scope};
use freeview::prelude::*;
use std::cmp::Ordering;

/// Converts a bound value before it reaches a view.
trait ValueConverter: Send + Sync {
    fn name(&self) -> &'static str;
    fn priority(&self) -> i64;
    fn convert(&self, value: &Value) -> Option<Value>;
}

impl Capability for dyn ValueConverter {
    fn compare(a: &Self, b: &Self) -> Option<Ordering> {
        Some(
            a.priority()
                .cmp(&b.priority())
                .then_with(|| a.name().cmp(b.name())),
        )
    }
}

struct BoolToText {
    priority: i64,
}

impl ValueConverter for BoolToText {
    fn name(&self) -> &'static str {
        "BoolToText"
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    fn convert(&self, value: &Value) -> Option<Value> {
        value
            .as_bool()
            .map(|b| Value::from(if b { "opened" } else { "closed" }))
    }
}

struct IntToText {
    priority: i64,
}

impl ValueConverter for IntToText {
    fn name(&self) -> &'static str {
        "IntToText"
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    fn convert(&self, value: &Value) -> Option<Value> {
        value.as_int().map(|i| Value::from(i.to_string()))
    }
}

struct Clamp {
    max: i64,
}

impl ValueConverter for Clamp {
    fn name(&self) -> &'static str {
        "Clamp"
    }

    fn priority(&self) -> i64 {
        0
    }

    fn convert(&self, value: &Value) -> Option<Value> {
        value.as_int().map(|i| Value::from(i.min(self.max)))
    }
}

/// Text converters shipped with the UI module.
struct TextConverters;

impl RegisterTypes for TextConverters {
    fn register_all(&self, scope: &mut TypeScopeBuilder) -> Result<()> {
        scope
            .abstract_type::<dyn ValueConverter>("TextConverter")?
            .concrete::<dyn ValueConverter, _>(
                TypeDecl::new("BoolToText").extends("TextConverter"),
                |args| {
                    args.expect_arity(1)?;
                    Ok(Box::new(BoolToText {
                        priority: args.int_at(0)?,
                    }))
                },
            )?
            .concrete::<dyn ValueConverter, _>(
                TypeDecl::new("IntToText").extends("TextConverter"),
                |args| {
                    args.expect_arity(1)?;
                    Ok(Box::new(IntToText {
                        priority: args.int_at(0)?,
                    }))
                },
            )?;
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Plugin Registry Example ===\n");

    FreeviewSettings::builder()
        .with_env_overrides("FREEVIEW", "__")
        .build()?
        .apply();

    let scope_name = freeview::settings::current().discovery.scope_name.clone();
    let mut builder = TypeScope::builder(scope_name);
    builder.register(&TextConverters)?;
    install_global_scope(builder.build());

    let converters = discover::<dyn ValueConverter>(&ConstructorArgs::new().with(10))?;
    println!("Discovered {} converters in scope '{}':", converters.len(), global_scope().name());
    for converter in &converters {
        println!(
            "  {} (priority {}) -> {:?}",
            converter.name(),
            converter.priority(),
            converter.convert(&Value::from(true))
        );
    }

    // A module whose converter needs a different constructor signature
    let mut builder = TypeScope::builder("with-clamp");
    builder.register(&TextConverters)?.register(&|scope: &mut TypeScopeBuilder| -> Result<()> {
        scope.concrete::<dyn ValueConverter, _>("Clamp", |args| {
            args.expect_arity(2)?;
            Ok(Box::new(Clamp {
                max: args.int_at(1)?,
            }))
        })?;
        Ok(())
    })?;
    install_global_scope(builder.build());

    match discover::<dyn ValueConverter>(&ConstructorArgs::new().with(10)) {
        Ok(found) => println!("\nUnexpectedly discovered {} converters", found.len()),
        Err(e) => println!(
            "\nDiscovery aborted on {:?}: {}",
            e.type_name().unwrap_or("<unknown>"),
            e
        ),
    }

    Ok(())
}
