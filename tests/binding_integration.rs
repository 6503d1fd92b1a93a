//! End-to-end binding tests: view-model state, listeners and presentation.

use freeview::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A view-model for a door, as a game screen would declare it.
struct DoorViewModel {
    is_door_opened: ObservableProperty<bool>,
}

impl DoorViewModel {
    fn new() -> Result<Self> {
        Ok(Self {
            is_door_opened: ObservableProperty::new("IsDoorOpened", false)?,
        })
    }

    fn toggle_door(&self) -> Result<bool> {
        self.is_door_opened.update(|open| !open)
    }
}

/// A view that mirrors the view-model into a label.
struct DoorView {
    label: Arc<Mutex<String>>,
    _binding: Subscription,
}

impl DoorView {
    fn bind(view_model: &DoorViewModel) -> Self {
        let label = Arc::new(Mutex::new(String::from("Door is closed")));
        let target = Arc::clone(&label);
        let binding = view_model.is_door_opened.subscribe(move |change| {
            let opened = change.value().as_bool().unwrap_or(false);
            *target.lock() = format!("Door is {}", if opened { "opened" } else { "closed" });
        });
        Self {
            label,
            _binding: binding,
        }
    }

    fn label(&self) -> String {
        self.label.lock().clone()
    }
}

impl PresentedView for DoorView {
    const VIEW_NAME: &'static str = "DoorView";

    fn presentation() -> ViewPresentation {
        ViewPresentation::in_container("MainCanvas")
    }
}

#[test]
fn test_view_follows_view_model() {
    let view_model = DoorViewModel::new().unwrap();
    let view = DoorView::bind(&view_model);

    assert_eq!(view.label(), "Door is closed");

    assert!(view_model.toggle_door().unwrap());
    assert_eq!(view.label(), "Door is opened");

    assert!(view_model.toggle_door().unwrap());
    assert_eq!(view.label(), "Door is closed");
}

#[test]
fn test_dropped_view_stops_listening() {
    let view_model = DoorViewModel::new().unwrap();
    let view = DoorView::bind(&view_model);
    assert_eq!(view_model.is_door_opened.listener_count(), 1);

    drop(view);
    assert_eq!(view_model.is_door_opened.listener_count(), 0);

    // Still updates state with nobody listening
    assert!(view_model.toggle_door().unwrap());
    assert!(*view_model.is_door_opened.get());
}

#[test]
fn test_unchanged_value_is_silent() {
    let property = ObservableProperty::new("Score", 10_i64).unwrap();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    let _handle = property.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!property.set(10).unwrap());
    assert!(property.set(11).unwrap());
    assert!(!property.set(11).unwrap());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_data_context_routes_by_property_name() {
    let context = DataContext::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let score_log = Arc::clone(&seen);
    let _score = context.subscribe_property("Score", move |change| {
        score_log.lock().push(change.to_string());
    });

    let all_log = Arc::clone(&seen);
    let _all = context.subscribe(move |change| {
        all_log.lock().push(format!("* {}", change.property_name()));
    });

    context.set("Score", 100).unwrap();
    context.set("IsWon", true).unwrap();
    context.set("Score", 100).unwrap(); // unchanged

    assert_eq!(
        *seen.lock(),
        vec![
            "Score = 100".to_string(),
            "* Score".to_string(),
            "* IsWon".to_string(),
        ]
    );
    assert_eq!(context.property_names(), vec!["IsWon", "Score"]);
}

#[test]
fn test_handle_values_carry_engine_objects() {
    #[derive(Debug, PartialEq)]
    struct Sprite {
        id: u32,
    }

    let context = DataContext::new();
    let sprite = Handle::new(Sprite { id: 7 });
    context.set("Portrait", sprite.clone()).unwrap();

    let stored = context.get("Portrait").unwrap();
    let handle = stored.as_handle().unwrap();
    assert_eq!(handle.downcast_ref::<Sprite>(), Some(&Sprite { id: 7 }));

    // Same handle again is not a change
    assert!(!context.set("Portrait", sprite).unwrap());
    // A different object with equal contents is
    assert!(context.set("Portrait", Handle::new(Sprite { id: 7 })).unwrap());
}

#[test]
fn test_faulty_view_does_not_starve_others() {
    let registry = ListenerRegistry::new().with_panic_isolation(true);
    let context = DataContext::with_registry(registry);
    let count = Arc::new(AtomicUsize::new(0));

    let _faulty = context.subscribe(|_| panic!("view crashed"));
    let counter = Arc::clone(&count);
    let _healthy = context.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(context.set("IsWon", true).unwrap());
    assert!(context.set("IsWon", false).unwrap());
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_views_grouped_by_container() {
    struct WinScreenView;

    impl PresentedView for WinScreenView {
        const VIEW_NAME: &'static str = "WinScreenView";

        fn presentation() -> ViewPresentation {
            ViewPresentation::in_container("MainCanvas")
        }
    }

    struct HudView;

    impl PresentedView for HudView {
        const VIEW_NAME: &'static str = "HudView";

        fn presentation() -> ViewPresentation {
            ViewPresentation::in_container("HudCanvas")
        }
    }

    let mut catalog = PresentationCatalog::new();
    catalog.register::<DoorView>().unwrap();
    catalog.register::<WinScreenView>().unwrap();
    catalog.register::<HudView>().unwrap();

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.container_for("HudView"), Some("HudCanvas"));
    assert_eq!(catalog.views_in("MainCanvas"), vec!["DoorView", "WinScreenView"]);
    assert!(catalog.views_in("Nowhere").is_empty());
}

#[test]
fn test_every_view_updated_even_when_panics_propagate() {
    for isolate in [true, false] {
        let registry = ListenerRegistry::new().with_panic_isolation(isolate);
        let property = ObservableProperty::with_registry("IsDoorOpened", false, registry).unwrap();
        let later_calls = Arc::new(AtomicUsize::new(0));

        let _faulty = property.subscribe(|_| panic!("view crashed"));
        let counter = Arc::clone(&later_calls);
        let _later = property.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| property.set(true)));

        assert_eq!(result.is_err(), !isolate, "isolate = {}", isolate);
        assert!(*property.get());
        assert_eq!(later_calls.load(Ordering::SeqCst), 1, "isolate = {}", isolate);
    }
}
