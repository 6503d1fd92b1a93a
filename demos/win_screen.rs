//! Example demonstrating a dynamically-shaped view-model.
//!
//! This example shows how to:
//! - Store view-model state in a `DataContext`
//! - Subscribe a view to a single property by name
//! - Reset the state from a button handler
//!
//! Run with: cargo run --example win_screen

use freeview::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct WinScreenViewModel {
    context: DataContext,
}

impl WinScreenViewModel {
    fn new() -> Result<Self> {
        let context = DataContext::new();
        context.set("Score", 0)?;
        context.set("IsWon", false)?;
        Ok(Self { context })
    }

    fn win(&self, score: i64) -> Result<()> {
        self.context.set("Score", score)?;
        self.context.set("IsWon", true)?;
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.context.set("Score", 0)?;
        self.context.set("IsWon", false)?;
        Ok(())
    }
}

struct WinScreenView;

impl PresentedView for WinScreenView {
    const VIEW_NAME: &'static str = "WinScreenView";
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Win Screen Example ===\n");

    let view_model = WinScreenViewModel::new()?;
    let redraws = Arc::new(AtomicUsize::new(0));

    let redraws_clone = Arc::clone(&redraws);
    let _visibility = view_model.context.subscribe_property("IsWon", move |change| {
        redraws_clone.fetch_add(1, Ordering::SeqCst);
        let shown = change.value().as_bool().unwrap_or(false);
        println!("[{}] visible: {}", WinScreenView::VIEW_NAME, shown);
    });

    let _log = view_model.context.subscribe(|change| {
        println!("  changed: {}", change);
    });

    view_model.win(1200)?;

    // The reset button handler
    view_model.reset()?;
    view_model.reset()?;

    println!(
        "\nProperties: {:?}, visibility redraws: {}",
        view_model.context.property_names(),
        redraws.load(Ordering::SeqCst)
    );
    println!(
        "Presented in: {}",
        WinScreenView::presentation().canvas_container_name
    );

    Ok(())
}
