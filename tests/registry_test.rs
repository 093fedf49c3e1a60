// Instance registry used by the page-level API

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{event_log, labels, recorder, FakeHost, ROOT};
use layered_menu_wasm::{LayerChangePayload, MenuConfig, MenuEvent, MenuRegistry, MenuState};

#[test]
fn test_create_registers_and_get_finds_by_root() {
    let mut registry = MenuRegistry::new();
    let menu = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");
    menu.run(|menu| menu.init());

    assert_eq!(registry.len(), 1);
    let found = registry.get(&ROOT).expect("instance for root");
    assert!(Rc::ptr_eq(&found, &menu));
    assert!(registry.get(&42).is_none());
}

#[test]
fn test_register_ignores_duplicates() {
    let mut registry = MenuRegistry::new();
    let menu = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");

    registry.register(Rc::clone(&menu));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_destroy_removes_instance() {
    let log = event_log();
    let config = MenuConfig::default().with_event(MenuEvent::Destroy, recorder(&log, "destroy"));
    let mut registry = MenuRegistry::new();
    let menu = registry.create(FakeHost::catalog(), config).expect("config should be valid");
    menu.run(|menu| menu.init());

    assert!(registry.destroy(&ROOT));
    assert!(registry.is_empty());
    assert_eq!(menu.view().state, MenuState::Destroyed);
    assert_eq!(labels(&log), vec!["destroy"]);

    // Already gone
    assert!(!registry.destroy(&ROOT));
}

#[test]
fn test_reinit_through_registry() {
    let log = event_log();
    let config = MenuConfig::default().with_event(MenuEvent::Reinit, recorder(&log, "reinit"));
    let mut registry = MenuRegistry::new();
    let menu = registry.create(FakeHost::catalog(), config).expect("config should be valid");
    menu.run(|menu| menu.init());
    menu.run(|menu| menu.set_layer("catalog", false));

    assert!(registry.reinit(&ROOT));
    assert_eq!(labels(&log), vec!["reinit"]);
    assert_eq!(menu.view().current_layer_key.as_deref(), Some("main"));
    assert!(!registry.reinit(&7));
}

#[test]
fn test_on_change_subscribes_one_instance() {
    let log = event_log();
    let mut registry = MenuRegistry::new();
    let menu = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");
    menu.run(|menu| menu.init());

    assert!(registry.on_change(&ROOT, recorder(&log, "change")).is_some());
    assert!(registry.on_change(&99, recorder(&log, "missing")).is_none());

    menu.run(|menu| menu.set_layer("profile", false));
    assert_eq!(labels(&log), vec!["change"]);
}

#[test]
fn test_bulk_subscription_covers_current_instances_only() {
    let log = event_log();
    let mut registry = MenuRegistry::new();
    let first = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");

    assert_eq!(registry.on_any_init(recorder(&log, "init")), 1);

    let second = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");
    first.run(|menu| menu.init());
    second.run(|menu| menu.init());

    assert_eq!(labels(&log), vec!["init"]);
    assert_eq!(registry.on_all(MenuEvent::LayerChange, recorder(&log, "change")), 2);
}

#[test]
fn test_on_any_change_fires_for_every_instance() {
    let log = event_log();
    let mut registry = MenuRegistry::new();
    let first = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");
    let second = registry
        .create(FakeHost::with_layers(&[("a", None), ("b", Some("a"))]), MenuConfig::default())
        .expect("config should be valid");
    first.run(|menu| menu.init());
    second.run(|menu| menu.init());

    assert_eq!(registry.on_any_change(recorder(&log, "change")), 2);
    first.run(|menu| menu.set_layer("catalog", false));
    second.run(|menu| menu.set_layer("b", false));

    assert_eq!(labels(&log), vec!["change", "change"]);
}

#[test]
fn test_registry_works_while_instance_is_mid_operation() {
    let log = event_log();
    let registry = Rc::new(RefCell::new(MenuRegistry::new()));
    let menu = registry
        .borrow_mut()
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");

    // An init handler looks the instance up again and subscribes to it
    let seen = Rc::new(RefCell::new(Vec::new()));
    let handler = {
        let registry = Rc::clone(&registry);
        let seen = Rc::clone(&seen);
        let change = recorder(&log, "change");
        Rc::new(move |_: &LayerChangePayload<usize>| -> Result<(), String> {
            let registry = registry.borrow();
            let instance = registry.get(&ROOT).ok_or("instance missing")?;
            seen.borrow_mut().push(instance.is_busy());
            registry.on_change(&ROOT, Rc::clone(&change));
            Ok(())
        })
    };
    assert!(registry.borrow().on_init(&ROOT, handler).is_some());

    menu.run(|menu| menu.init());
    assert_eq!(*seen.borrow(), vec![true]);
    assert_eq!(registry.borrow().instances()[0].view().state, MenuState::Ready);

    menu.run(|menu| menu.set_layer("catalog", false));
    assert_eq!(labels(&log), vec!["change"]);
}

#[test]
fn test_remove_keeps_instance_alive() {
    let mut registry = MenuRegistry::new();
    let menu = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");
    menu.run(|menu| menu.init());

    let removed = registry.remove(&ROOT).expect("instance for root");
    assert!(Rc::ptr_eq(&removed, &menu));
    assert!(registry.is_empty());
    assert_eq!(menu.view().state, MenuState::Ready);
    assert!(registry.remove(&ROOT).is_none());
}

#[test]
fn test_destroy_all_empties_registry() {
    let mut registry = MenuRegistry::new();
    let first = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");
    let second = registry
        .create(FakeHost::catalog(), MenuConfig::default())
        .expect("config should be valid");
    first.run(|menu| menu.init());
    second.run(|menu| menu.init());

    registry.destroy_all();

    assert!(registry.is_empty());
    assert_eq!(first.view().state, MenuState::Destroyed);
    assert_eq!(second.view().state, MenuState::Destroyed);
}
