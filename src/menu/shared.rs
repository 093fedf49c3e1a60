//! Shared handle to a menu for callback-driven hosts
//!
//! JS listeners and event handlers call back into the same instance while it
//! is in the middle of an operation. [`MenuCell`] keeps everything those
//! callbacks need outside the engine borrow:
//!
//! - the emitter, so `on`/`off` work at any time
//! - a [`MenuView`] of the observable state, refreshed before every event
//!   and error report, so getters see the state the event describes
//! - a queue of deferred operations: work requested while the engine is
//!   borrowed runs right after the current operation returns, in request order

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::{EventEmitter, EventHandler, LayeredMenu, ListenerId, MenuHost, MenuState};
use crate::models::{LayerKey, MenuEvent, MenuSettings};

/// Observable state of one menu
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuView {
    pub state: MenuState,
    pub current_layer_key: Option<LayerKey>,
    pub history: Vec<LayerKey>,
    /// `(key, parent key)` in discovery order
    pub layers: Vec<(LayerKey, Option<LayerKey>)>,
}

impl MenuView {
    pub fn layer_keys(&self) -> Vec<LayerKey> {
        self.layers.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn parent_key(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .find(|(layer, _)| layer == key)
            .and_then(|(_, parent)| parent.as_deref())
    }
}

type Deferred<H> = Box<dyn FnOnce(&mut LayeredMenu<H>)>;

pub struct MenuCell<H: MenuHost> {
    engine: RefCell<LayeredMenu<H>>,
    host: Rc<H>,
    settings: Rc<MenuSettings>,
    emitter: Rc<EventEmitter<H::Node>>,
    view: Rc<RefCell<MenuView>>,
    deferred: RefCell<VecDeque<Deferred<H>>>,
}

impl<H: MenuHost> MenuCell<H> {
    pub fn new(menu: LayeredMenu<H>) -> Self {
        menu.publish();
        Self {
            host: Rc::clone(&menu.host),
            settings: Rc::clone(&menu.settings),
            emitter: Rc::clone(&menu.emitter),
            view: Rc::clone(&menu.view),
            engine: RefCell::new(menu),
            deferred: RefCell::new(VecDeque::new()),
        }
    }

    /// Run `f` on the engine now, or after the operation in progress.
    ///
    /// Work queued by handlers while `f` runs is drained before returning.
    pub fn run(&self, f: impl FnOnce(&mut LayeredMenu<H>) + 'static) {
        match self.engine.try_borrow_mut() {
            Ok(mut menu) => {
                f(&mut menu);
                menu.publish();
            }
            Err(_) => {
                log::debug!("LayeredMenu is busy, deferring call until the current operation returns");
                self.deferred.borrow_mut().push_back(Box::new(f));
                return;
            }
        }
        self.drain();
    }

    fn drain(&self) {
        loop {
            let Some(task) = self.deferred.borrow_mut().pop_front() else {
                return;
            };
            match self.engine.try_borrow_mut() {
                Ok(mut menu) => {
                    task(&mut menu);
                    menu.publish();
                }
                Err(_) => {
                    // Still borrowed further up; that caller drains
                    self.deferred.borrow_mut().push_front(task);
                    return;
                }
            }
        }
    }

    /// Read the engine directly; `None` while an operation is in progress
    pub fn read<R>(&self, f: impl FnOnce(&LayeredMenu<H>) -> R) -> Option<R> {
        self.engine.try_borrow().ok().map(|menu| f(&menu))
    }

    pub fn view(&self) -> Ref<'_, MenuView> {
        self.view.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.engine.try_borrow_mut().is_err()
    }

    pub fn pending(&self) -> usize {
        self.deferred.borrow().len()
    }

    pub fn on(&self, event: MenuEvent, handler: EventHandler<H::Node>) -> ListenerId {
        self.emitter.on(event, handler)
    }

    pub fn off(&self, event: MenuEvent, id: ListenerId) -> bool {
        self.emitter.off(event, id)
    }

    pub fn layer_meta(&self, key: &str) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.settings.layer(key).map(|layer| &layer.meta)
    }

    pub fn root(&self) -> &H::Node {
        self.host.root()
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: MenuHost> std::fmt::Debug for MenuCell<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuCell")
            .field("view", &*self.view.borrow())
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MenuView {
        MenuView {
            state: MenuState::Ready,
            current_layer_key: Some("b".to_string()),
            history: vec!["a".to_string()],
            layers: vec![("a".to_string(), None), ("b".to_string(), Some("a".to_string()))],
        }
    }

    #[test]
    fn test_view_lookups() {
        let view = view();
        assert_eq!(view.layer_keys(), vec!["a", "b"]);
        assert_eq!(view.parent_key("b"), Some("a"));
        assert_eq!(view.parent_key("a"), None);
        assert_eq!(view.parent_key("missing"), None);
    }

    #[test]
    fn test_default_view_is_uninitialized() {
        let view = MenuView::default();
        assert_eq!(view.state, MenuState::Uninitialized);
        assert!(view.layer_keys().is_empty());
    }
}
