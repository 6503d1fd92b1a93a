//! Example demonstrating a view bound to a view-model property.
//!
//! This example shows how to:
//! - Expose observable state from a view-model
//! - Bind a view property to it so the label follows the state
//! - Route a button click to a view-model command
//!
//! Run with: cargo run --example playground

use freeview::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

/// View-model for the playground scene.
struct PlaygroundViewModel {
    is_door_opened: ObservableProperty<bool>,
}

impl PlaygroundViewModel {
    fn new() -> Result<Self> {
        Ok(Self {
            is_door_opened: ObservableProperty::new("IsDoorOpened", false)?,
        })
    }

    fn toggle_door(&self) -> Result<()> {
        self.is_door_opened.update(|opened| !opened)?;
        Ok(())
    }
}

/// The playground view: a toggle button and a label showing the door state.
struct PlaygroundView {
    view_model: Arc<PlaygroundViewModel>,
    door_state_text: Arc<Mutex<String>>,
    _binding: Subscription,
}

impl PresentedView for PlaygroundView {
    const VIEW_NAME: &'static str = "PlaygroundView";

    fn presentation() -> ViewPresentation {
        ViewPresentation::in_container("MainCanvas")
    }
}

impl PlaygroundView {
    fn bind(view_model: Arc<PlaygroundViewModel>) -> Self {
        let door_state_text = Arc::new(Mutex::new(door_label(*view_model.is_door_opened.get())));

        let text = Arc::clone(&door_state_text);
        let binding = view_model.is_door_opened.subscribe(move |change| {
            let opened = change.value().as_bool().unwrap_or(false);
            *text.lock() = door_label(opened);
        });

        Self {
            view_model,
            door_state_text,
            _binding: binding,
        }
    }

    fn on_toggle_door_clicked(&self) -> Result<()> {
        self.view_model.toggle_door()
    }

    fn door_state_text(&self) -> String {
        self.door_state_text.lock().clone()
    }
}

fn door_label(opened: bool) -> String {
    format!("Door is {}", if opened { "opened" } else { "closed" })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Playground Binding Example ===\n");

    let mut catalog = PresentationCatalog::new();
    catalog.register::<PlaygroundView>()?;

    let view_model = Arc::new(PlaygroundViewModel::new()?);
    let view = PlaygroundView::bind(Arc::clone(&view_model));

    println!(
        "{} presented in {:?}",
        PlaygroundView::VIEW_NAME,
        catalog.container_for(PlaygroundView::VIEW_NAME)
    );
    println!("Initial label: {}", view.door_state_text());

    for click in 1..=3 {
        view.on_toggle_door_clicked()?;
        println!("After click {}: {}", click, view.door_state_text());
    }

    // Writing the current value again does not notify the view
    let changed = view_model.is_door_opened.set(*view_model.is_door_opened.get())?;
    println!("\nRe-setting the same value changed anything: {}", changed);

    Ok(())
}
