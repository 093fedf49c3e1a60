//! Minimal typed event emitter
//!
//! Listeners are keyed by [`MenuEvent`] and run synchronously in
//! registration order. There is no wildcard, no once-semantics and no replay
//! of past events.
//!
//! The emitter is shared (`&self` everywhere) so a listener may subscribe or
//! unsubscribe while an event is being dispatched. Changes made during a
//! dispatch apply from the next `emit`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::MenuError;
use crate::models::{LayerChangePayload, MenuEvent};

/// Event listener; an `Err` aborts the emitting operation
pub type EventHandler<N> = Rc<dyn Fn(&LayerChangePayload<N>) -> Result<(), String>>;

/// Handle returned by [`EventEmitter::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener<N> {
    id: ListenerId,
    handler: EventHandler<N>,
}

pub struct EventEmitter<N> {
    listeners: RefCell<HashMap<MenuEvent, Vec<Listener<N>>>>,
    next_id: Cell<u64>,
}

impl<N> Default for EventEmitter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> EventEmitter<N> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn on(&self, event: MenuEvent, handler: EventHandler<N>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .entry(event)
            .or_default()
            .push(Listener { id, handler });
        id
    }

    /// Remove one listener; returns whether it was registered for `event`
    pub fn off(&self, event: MenuEvent, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&event) else {
            return false;
        };
        let before = list.len();
        list.retain(|listener| listener.id != id);
        list.len() != before
    }

    /// Run every listener for `event`, stopping at the first failure
    pub fn emit(&self, event: MenuEvent, payload: &LayerChangePayload<N>) -> Result<(), MenuError> {
        // Handlers run without the table borrowed
        let handlers: Vec<EventHandler<N>> = match self.listeners.borrow().get(&event) {
            Some(list) => list.iter().map(|listener| Rc::clone(&listener.handler)).collect(),
            None => return Ok(()),
        };
        for handler in handlers {
            handler(payload).map_err(|message| MenuError::Handler { event, message })?;
        }
        Ok(())
    }

    pub fn listener_count(&self, event: MenuEvent) -> usize {
        self.listeners.borrow().get(&event).map_or(0, Vec::len)
    }
}

impl<N> std::fmt::Debug for EventEmitter<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<_, _> = self
            .listeners
            .borrow()
            .iter()
            .map(|(event, list)| (event.name(), list.len()))
            .collect();
        f.debug_struct("EventEmitter").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use std::cell::RefCell;

    fn payload() -> LayerChangePayload<()> {
        LayerChangePayload {
            current_layer: None,
            prev_layer: None,
            current_layer_key: Some("a".to_string()),
            prev_layer_key: None,
            direction: Direction::None,
            current_layer_index: Some(0),
            prev_layer_index: None,
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> EventHandler<()> {
        let log = Rc::clone(log);
        Rc::new(move |_: &LayerChangePayload<()>| {
            log.borrow_mut().push(tag);
            Ok(())
        })
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = EventEmitter::new();
        emitter.on(MenuEvent::Init, recorder(&log, "first"));
        emitter.on(MenuEvent::Init, recorder(&log, "second"));
        emitter.on(MenuEvent::Destroy, recorder(&log, "other"));

        emitter.emit(MenuEvent::Init, &payload()).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_off_removes_only_that_listener() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = EventEmitter::new();
        let first = emitter.on(MenuEvent::LayerChange, recorder(&log, "first"));
        emitter.on(MenuEvent::LayerChange, recorder(&log, "second"));

        assert!(emitter.off(MenuEvent::LayerChange, first));
        assert!(!emitter.off(MenuEvent::LayerChange, first));
        assert!(!emitter.off(MenuEvent::Init, first));

        emitter.emit(MenuEvent::LayerChange, &payload()).unwrap();
        assert_eq!(*log.borrow(), vec!["second"]);
        assert_eq!(emitter.listener_count(MenuEvent::LayerChange), 1);
    }

    #[test]
    fn test_failing_listener_stops_emission() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = EventEmitter::new();
        emitter.on(MenuEvent::Init, Rc::new(|_: &LayerChangePayload<()>| Err("boom".to_string())));
        emitter.on(MenuEvent::Init, recorder(&log, "after"));

        let err = emitter.emit(MenuEvent::Init, &payload()).unwrap_err();
        assert_eq!(
            err,
            MenuError::Handler { event: MenuEvent::Init, message: "boom".to_string() }
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_emit_without_listeners() {
        let emitter: EventEmitter<()> = EventEmitter::new();
        assert!(emitter.emit(MenuEvent::Reinit, &payload()).is_ok());
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter: Rc<EventEmitter<()>> = Rc::new(EventEmitter::new());
        let late = recorder(&log, "late");
        let handle = Rc::downgrade(&emitter);
        emitter.on(
            MenuEvent::LayerChange,
            Rc::new(move |_: &LayerChangePayload<()>| {
                if let Some(emitter) = handle.upgrade() {
                    emitter.on(MenuEvent::LayerChange, Rc::clone(&late));
                }
                Ok(())
            }),
        );

        emitter.emit(MenuEvent::LayerChange, &payload()).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(emitter.listener_count(MenuEvent::LayerChange), 2);

        emitter.emit(MenuEvent::LayerChange, &payload()).unwrap();
        assert_eq!(*log.borrow(), vec!["late"]);
    }
}
