// Shared in-memory host for menu integration tests
//
// Nodes are plain integers: the root is 0 and layer markers are numbered
// from 1 in document order.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use layered_menu_wasm::animation::{Animator, Step, Visual};
use layered_menu_wasm::menu::MenuHost;
use layered_menu_wasm::errors::ErrorHandler;
use layered_menu_wasm::{ErrorContext, LayerChangePayload, LayerMarker, MenuError};

pub const ROOT: usize = 0;

/// Tween engine that applies `set` immediately and queues tweens
#[derive(Default)]
pub struct FakeAnimator {
    visuals: RefCell<HashMap<usize, Visual>>,
    pending: RefCell<Vec<Step<usize>>>,
    pub killed: RefCell<Vec<usize>>,
    pub tweened: RefCell<Vec<usize>>,
}

impl FakeAnimator {
    pub fn visual(&self, node: usize) -> Visual {
        self.visuals.borrow().get(&node).cloned().unwrap_or_default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run every queued tween to completion
    pub fn flush(&self) {
        let steps: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for step in steps {
            self.apply(step.node, &step.to);
            for (node, visual) in &step.finally {
                self.apply(*node, visual);
            }
            if let Some(done) = step.on_complete {
                done();
            }
        }
    }

    fn apply(&self, node: usize, visual: &Visual) {
        self.visuals.borrow_mut().entry(node).or_default().merge(visual);
    }
}

impl Animator<usize> for FakeAnimator {
    fn kill_tweens(&self, nodes: &[usize]) -> Result<(), MenuError> {
        self.killed.borrow_mut().extend_from_slice(nodes);
        self.pending.borrow_mut().retain(|step| !nodes.contains(&step.node));
        Ok(())
    }

    fn set(&self, node: &usize, visual: &Visual) -> Result<(), MenuError> {
        self.apply(*node, visual);
        Ok(())
    }

    fn tween(&self, step: Step<usize>) -> Result<(), MenuError> {
        self.tweened.borrow_mut().push(step.node);
        self.pending.borrow_mut().push(step);
        Ok(())
    }

    fn width(&self, _node: &usize) -> f64 {
        400.0
    }
}

pub struct FakeHost {
    /// `(data-menu-layer, data-menu-parent)` per marker
    pub markers: RefCell<Vec<(Option<String>, Option<String>)>>,
    pub classes: RefCell<Vec<(usize, String)>>,
    pub styles: RefCell<Vec<(usize, BTreeMap<String, String>)>>,
    /// Forward trigger values inside each layer node
    pub triggers: RefCell<HashMap<usize, Vec<Option<String>>>>,
    pub viewport: Cell<f64>,
    pub clicks: Cell<bool>,
    /// Layer nodes currently carrying touch listeners
    pub swipes: RefCell<Vec<usize>>,
    pub resize: Cell<bool>,
    pub animator: FakeAnimator,
}

impl FakeHost {
    /// Host with one marker per `(key, parent)` pair, on a mobile viewport
    pub fn with_layers(layers: &[(&str, Option<&str>)]) -> Self {
        let markers = layers
            .iter()
            .map(|(key, parent)| (Some(key.to_string()), parent.map(str::to_string)))
            .collect();
        Self {
            markers: RefCell::new(markers),
            classes: RefCell::new(Vec::new()),
            styles: RefCell::new(Vec::new()),
            triggers: RefCell::new(HashMap::new()),
            viewport: Cell::new(375.0),
            clicks: Cell::new(false),
            swipes: RefCell::new(Vec::new()),
            resize: Cell::new(false),
            animator: FakeAnimator::default(),
        }
    }

    /// `main > catalog > filters`, plus `profile` under `main`
    pub fn catalog() -> Self {
        Self::with_layers(&[
            ("main", None),
            ("catalog", Some("main")),
            ("filters", Some("catalog")),
            ("profile", Some("main")),
        ])
    }

    pub fn node_of(&self, key: &str) -> usize {
        self.markers
            .borrow()
            .iter()
            .position(|(k, _)| k.as_deref() == Some(key))
            .map(|idx| idx + 1)
            .unwrap_or_else(|| panic!("no marker '{}'", key))
    }

    pub fn set_triggers(&self, key: &str, values: &[Option<&str>]) {
        let node = self.node_of(key);
        self.triggers
            .borrow_mut()
            .insert(node, values.iter().map(|v| v.map(str::to_string)).collect());
    }

    pub fn has_swipe_listeners(&self, key: &str) -> bool {
        self.swipes.borrow().contains(&self.node_of(key))
    }
}

impl MenuHost for FakeHost {
    type Node = usize;

    fn root(&self) -> &usize {
        &ROOT
    }

    fn scan_layers(&self) -> Result<Vec<LayerMarker<usize>>, MenuError> {
        Ok(self
            .markers
            .borrow()
            .iter()
            .enumerate()
            .map(|(idx, (key, parent))| LayerMarker {
                node: idx + 1,
                key: key.clone(),
                parent: parent.clone(),
            })
            .collect())
    }

    fn add_class(&self, node: &usize, class_name: &str) -> Result<(), MenuError> {
        self.classes.borrow_mut().push((*node, class_name.to_string()));
        Ok(())
    }

    fn apply_style(&self, node: &usize, style: &BTreeMap<String, String>) -> Result<(), MenuError> {
        self.styles.borrow_mut().push((*node, style.clone()));
        Ok(())
    }

    fn forward_triggers(&self, layer: &usize) -> Result<Vec<Option<String>>, MenuError> {
        Ok(self.triggers.borrow().get(layer).cloned().unwrap_or_default())
    }

    fn viewport_width(&self) -> f64 {
        self.viewport.get()
    }

    fn animator(&self) -> &dyn Animator<usize> {
        &self.animator
    }

    fn listen_clicks(&self) -> Result<(), MenuError> {
        self.clicks.set(true);
        Ok(())
    }

    fn unlisten_clicks(&self) -> Result<(), MenuError> {
        self.clicks.set(false);
        Ok(())
    }

    fn listen_swipes(&self, layer: &usize) -> Result<(), MenuError> {
        let mut swipes = self.swipes.borrow_mut();
        if !swipes.contains(layer) {
            swipes.push(*layer);
        }
        Ok(())
    }

    fn unlisten_swipes(&self, layer: &usize) -> Result<(), MenuError> {
        self.swipes.borrow_mut().retain(|node| node != layer);
        Ok(())
    }

    fn listen_resize(&self) -> Result<(), MenuError> {
        self.resize.set(true);
        Ok(())
    }

    fn unlisten_resize(&self) -> Result<(), MenuError> {
        self.resize.set(false);
        Ok(())
    }
}

/// Event log shared between handlers: `(event label, payload)`
pub type EventLog = Rc<RefCell<Vec<(String, LayerChangePayload<usize>)>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Handler appending `label` and the payload to `log`
pub fn recorder(
    log: &EventLog,
    label: &str,
) -> Rc<dyn Fn(&LayerChangePayload<usize>) -> Result<(), String>> {
    let log = Rc::clone(log);
    let label = label.to_string();
    Rc::new(move |payload: &LayerChangePayload<usize>| {
        log.borrow_mut().push((label.clone(), payload.clone()));
        Ok(())
    })
}

pub fn labels(log: &EventLog) -> Vec<String> {
    log.borrow().iter().map(|(label, _)| label.clone()).collect()
}

/// Errors passed to `onError`, with their context
pub type ErrorLog = Rc<RefCell<Vec<(MenuError, ErrorContext)>>>;

pub fn error_log() -> (ErrorLog, ErrorHandler) {
    let log: ErrorLog = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let handler: ErrorHandler = Rc::new(move |error: &MenuError, context: &ErrorContext| {
        sink.borrow_mut().push((error.clone(), context.clone()));
    });
    (log, handler)
}
