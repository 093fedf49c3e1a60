//! Layered navigation menu engine
//!
//! [`LayeredMenu`] owns the layer registry of one root, the active layer,
//! the navigation history and the listener wiring. Transitions run through a
//! [`TransitionStrategy`] chosen by the global animation type and are
//! announced through the [`EventEmitter`].
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --init--> Ready --set_layer/reinit/reset/back--> Ready
//!       |                   |
//!       +------destroy------+--> Destroyed (terminal)
//! ```
//!
//! State (current key, history, swipe wiring) is updated synchronously in
//! `set_layer`; only the visual part of a transition finishes later. A new
//! transition kills in-flight tweens on the nodes it touches, so rapid
//! re-triggering converges visually.
//!
//! None of the lifecycle operations return errors: failures are caught at the
//! operation boundary and passed to the `on_error` hook (or logged).
//!
//! Handlers run while the engine is mutably borrowed. Hosts that let them
//! call back in wrap the engine in a [`MenuCell`], which serves reads from a
//! published [`MenuView`] and defers re-entrant operations.

pub mod emitter;
pub mod gesture;
pub mod host;
pub mod registry;
pub mod shared;

pub use emitter::{EventEmitter, EventHandler, ListenerId};
pub use gesture::{Swipe, SwipeTracker, DESKTOP_BREAKPOINT_PX, SWIPE_DISTANCE_PX, SWIPE_MIN_VELOCITY};
pub use host::MenuHost;
pub use registry::{MenuRegistry, SharedMenu};
pub use shared::{MenuCell, MenuView};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::animation::{self, Timing, TransitionStrategy, Visual};
use crate::errors::{ErrorContext, ErrorHandler, MenuError, Operation};
use crate::models::{
    Direction, Layer, LayerChangePayload, LayerKey, LayerTarget, MenuConfig, MenuEvent,
    MenuSettings, Trigger,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Uninitialized,
    Ready,
    Destroyed,
}

impl MenuState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuState::Uninitialized => "uninitialized",
            MenuState::Ready => "ready",
            MenuState::Destroyed => "destroyed",
        }
    }
}

pub struct LayeredMenu<H: MenuHost> {
    host: Rc<H>,
    settings: Rc<MenuSettings>,
    on_error: Option<ErrorHandler>,
    emitter: Rc<EventEmitter<H::Node>>,
    /// Refreshed before every event and error report
    view: Rc<RefCell<MenuView>>,
    /// Discovery order
    layers: Vec<Layer<H::Node>>,
    index: HashMap<LayerKey, usize>,
    current: Option<LayerKey>,
    history: Vec<LayerKey>,
    state: MenuState,
    swipe: SwipeTracker,
    strategies: HashMap<String, Rc<dyn TransitionStrategy<H::Node>>>,
    listening_resize: bool,
}

impl<H: MenuHost> LayeredMenu<H> {
    /// Create an uninitialized menu; call [`init`](Self::init) to show it.
    ///
    /// Global and per-layer handlers from `config` are subscribed here.
    pub fn new(host: H, config: MenuConfig<H::Node>) -> Result<Self, MenuError> {
        validate_settings(&config.settings)?;

        let emitter = EventEmitter::new();
        for (event, handler) in config.events {
            emitter.on(event, handler);
        }
        for (key, event, handler) in config.layer_events {
            emitter.on(event, scoped_to_layer(key, handler));
        }

        Ok(Self {
            host: Rc::new(host),
            settings: Rc::new(config.settings),
            on_error: config.on_error,
            emitter: Rc::new(emitter),
            view: Rc::new(RefCell::new(MenuView::default())),
            layers: Vec::new(),
            index: HashMap::new(),
            current: None,
            history: Vec::new(),
            state: MenuState::Uninitialized,
            swipe: SwipeTracker::new(),
            strategies: HashMap::new(),
            listening_resize: false,
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Collect layers, show the first one and wire listeners
    pub fn init(&mut self) {
        if let Err(error) = self.rebuild(MenuEvent::Init) {
            self.report(error, Operation::Init);
        }
    }

    /// Rebuild after DOM changes: same as `init`, emitting `onReinit`
    pub fn reinit(&mut self) {
        if let Err(error) = self.rebuild(MenuEvent::Reinit) {
            self.report(error, Operation::Reinit);
        }
    }

    pub fn destroy(&mut self) {
        if self.state == MenuState::Destroyed {
            log::warn!("LayeredMenu: destroy called on a destroyed instance");
            return;
        }
        if let Err(error) = self.try_destroy() {
            self.report(error, Operation::Destroy);
        }
    }

    /// Navigate to a key or by a clamped offset from the current layer.
    ///
    /// `is_back` marks back-navigation: it may enter layers without direct
    /// access, and it pops the history instead of pushing.
    pub fn set_layer(&mut self, target: impl Into<LayerTarget>, is_back: bool) {
        let target = target.into();
        if let Err(error) = self.try_set_layer(&target, is_back) {
            self.report(error, Operation::SetLayer);
        }
    }

    /// Go back to the first discovered layer
    pub fn reset(&mut self) {
        let Some(first) = self.first_key() else {
            return;
        };
        if self.current.as_deref() == Some(first.as_str()) {
            return;
        }
        if let Some(current) = self.current.clone() {
            if let Err(error) = self.remove_swipe_handlers(&current) {
                self.report(error, Operation::Reset);
                return;
            }
        }
        if let Err(error) = self.try_set_layer(&LayerTarget::Key(first), false) {
            self.report(error, Operation::Reset);
        }
    }

    /// Return to the most recent history entry; no-op with empty history
    pub fn back(&mut self) {
        let Some(previous) = self.history.last().cloned() else {
            return;
        };
        if let Err(error) = self.try_set_layer(&LayerTarget::Key(previous), true) {
            self.report(error, Operation::Back);
        }
    }

    pub fn on(&self, event: MenuEvent, handler: EventHandler<H::Node>) -> ListenerId {
        self.emitter.on(event, handler)
    }

    pub fn off(&self, event: MenuEvent, id: ListenerId) -> bool {
        self.emitter.off(event, id)
    }

    /// Make a custom strategy available under `name` for `animation.type`
    pub fn register_animation(&mut self, name: impl Into<String>, strategy: Rc<dyn TransitionStrategy<H::Node>>) {
        self.strategies.insert(name.into(), strategy);
    }

    // ------------------------------------------------------------------
    // Input dispatch (called by the host's listeners)
    // ------------------------------------------------------------------

    /// A declarative trigger was clicked.
    ///
    /// Both kinds navigate forward in the history sense: they push, and
    /// restricted layers stay restricted. Only swipe-back and `back()` use
    /// back-navigation.
    pub fn handle_trigger(&mut self, trigger: Trigger) {
        if trigger.key().is_empty() {
            return;
        }
        let key = match trigger {
            Trigger::Next(key) | Trigger::Prev(key) => key,
        };
        self.set_layer(key, false);
    }

    pub fn handle_touch_start(&mut self, x: f64, y: f64, time_ms: f64) {
        self.swipe.touch_start(x, y, time_ms);
    }

    pub fn handle_touch_end(&mut self, x: f64, time_ms: f64) {
        match self.swipe.touch_end(x, time_ms) {
            Some(Swipe::Back) => {
                let parent = self.current.as_deref().and_then(|key| self.parent_key(key));
                if let Some(parent) = parent.map(str::to_string) {
                    log::debug!("swipe back to parent '{}'", parent);
                    self.set_layer(parent, true);
                }
            }
            Some(Swipe::Forward) => self.swipe_forward(),
            None => {}
        }
    }

    pub fn handle_resize(&mut self) {
        log::debug!(
            "LayeredMenu resize: viewport {}px, current {:?}",
            self.host.viewport_width(),
            self.current
        );
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn current_layer_key(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn layer_keys(&self) -> Vec<LayerKey> {
        self.layers.iter().map(|layer| layer.key.clone()).collect()
    }

    pub fn history(&self) -> &[LayerKey] {
        &self.history
    }

    pub fn parent_key(&self, key: &str) -> Option<&str> {
        self.layer(key).and_then(|layer| layer.parent_key.as_deref())
    }

    pub fn layer_node(&self, key: &str) -> Option<&H::Node> {
        self.layer(key).map(|layer| &layer.node)
    }

    pub fn layer_meta(&self, key: &str) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.settings.layer(key).map(|layer| &layer.meta)
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn root(&self) -> &H::Node {
        self.host.root()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    pub fn is_tracking_touch(&self) -> bool {
        self.swipe.is_tracking()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn rebuild(&mut self, event: MenuEvent) -> Result<(), MenuError> {
        if self.state == MenuState::Destroyed {
            return Err(MenuError::Destroyed);
        }
        if self.state == MenuState::Ready || event == MenuEvent::Reinit {
            self.detach_handlers()?;
            if let Some(current) = self.current.clone() {
                self.remove_swipe_handlers(&current)?;
            }
        }
        self.current = None;
        self.history.clear();
        self.swipe.cancel();

        self.collect_layers()?;
        self.current = self.first_key();
        self.show_instantly(self.current.as_deref())?;
        self.state = MenuState::Ready;

        let payload = self.payload(None, self.current.as_deref(), Direction::None);
        self.emit(event, &payload)?;
        self.attach_handlers()?;
        if let Some(current) = self.current.clone() {
            self.init_swipe_handlers(&current)?;
        }
        if !self.listening_resize {
            self.host.listen_resize()?;
            self.listening_resize = true;
        }

        log::info!(
            "LayeredMenu {}: {} layers, showing {:?}",
            if event == MenuEvent::Init { "initialized" } else { "reinitialized" },
            self.layers.len(),
            self.current
        );
        Ok(())
    }

    fn try_destroy(&mut self) -> Result<(), MenuError> {
        self.detach_handlers()?;
        if let Some(current) = self.current.clone() {
            self.remove_swipe_handlers(&current)?;
        }
        self.layers.clear();
        self.index.clear();
        self.history.clear();
        self.swipe.cancel();
        self.current = None;
        self.state = MenuState::Destroyed;

        let payload = self.payload(None, None, Direction::None);
        self.emit(MenuEvent::Destroy, &payload)?;
        if self.listening_resize {
            self.host.unlisten_resize()?;
            self.listening_resize = false;
        }
        log::info!("LayeredMenu destroyed");
        Ok(())
    }

    fn try_set_layer(&mut self, target: &LayerTarget, is_back: bool) -> Result<(), MenuError> {
        let prev = self.current.clone();
        let keys = self.layer_keys();
        let next = match target.resolve(&keys, prev.as_deref()) {
            Some(key) if self.index.contains_key(&key) => key,
            Some(key) => return Err(MenuError::LayerNotFound(key)),
            None => return Err(MenuError::LayerNotFound("<none>".to_string())),
        };
        if prev.as_deref() == Some(next.as_str()) {
            return Ok(());
        }
        if !is_back && !self.settings.allows_direct_access(&next) {
            return Err(MenuError::AccessDenied(next));
        }

        let direction = self.direction(prev.as_deref(), Some(next.as_str()));
        let before = self.payload(prev.as_deref(), Some(next.as_str()), direction);
        self.emit(MenuEvent::BeforeLayerChange, &before)?;

        self.show_layer(&next, prev.as_deref(), direction)?;

        if let Some(prev) = prev.as_deref() {
            self.remove_swipe_handlers(prev)?;
        }
        self.init_swipe_handlers(&next)?;

        // The pop is unconditional on back-navigation, whatever the target
        if is_back {
            self.history.pop();
        } else if let Some(prev) = prev.clone() {
            self.history.push(prev);
        }
        self.current = Some(next.clone());

        let after = self.payload(prev.as_deref(), Some(next.as_str()), direction);
        self.emit(MenuEvent::LayerChange, &after)?;
        self.emit(MenuEvent::AfterLayerChange, &after)?;
        Ok(())
    }

    fn swipe_forward(&mut self) {
        let Some(node) = self.current.as_deref().and_then(|key| self.layer_node(key)).cloned() else {
            return;
        };
        let triggers = match self.host.forward_triggers(&node) {
            Ok(triggers) => triggers,
            Err(error) => {
                self.report(error, Operation::SetLayer);
                return;
            }
        };
        match triggers.as_slice() {
            [Some(key)] if !key.is_empty() => {
                log::debug!("swipe forward to '{}'", key);
                let key = key.clone();
                self.set_layer(key, false);
            }
            [_] => {}
            other => log::debug!("swipe forward ignored: {} forward triggers on layer", other.len()),
        }
    }

    /// Scan the root. Either the whole registry is rebuilt or it is left empty.
    fn collect_layers(&mut self) -> Result<(), MenuError> {
        self.layers.clear();
        self.index.clear();

        let markers = self.host.scan_layers()?;
        let mut layers = Vec::with_capacity(markers.len());
        let mut index = HashMap::with_capacity(markers.len());
        for marker in markers {
            let key = marker
                .key
                .filter(|key| !key.is_empty())
                .ok_or(MenuError::MissingLayerKey)?;
            if index.contains_key(&key) {
                return Err(MenuError::DuplicateLayerKey(key));
            }
            index.insert(key.clone(), layers.len());
            layers.push(Layer {
                key,
                parent_key: marker.parent.filter(|parent| !parent.is_empty()),
                node: marker.node,
            });
        }

        for layer in &layers {
            let Some(config) = self.settings.layer(&layer.key) else {
                continue;
            };
            if let Some(class_name) = config.class_name.as_deref().filter(|c| !c.is_empty()) {
                self.host.add_class(&layer.node, class_name)?;
            }
            if !config.style.is_empty() {
                self.host.apply_style(&layer.node, &config.style)?;
            }
            if config.animation.is_some() {
                log::warn!(
                    "LayeredMenu: per-layer animation for '{}' is ignored, using global '{}'",
                    layer.key,
                    self.settings.animation.kind
                );
            }
        }

        log::debug!("LayeredMenu collected {} layers", layers.len());
        self.layers = layers;
        self.index = index;
        Ok(())
    }

    fn show_layer(&self, next: &str, prev: Option<&str>, direction: Direction) -> Result<(), MenuError> {
        let (Some(to), Some(from)) = (self.layer_node(next), prev.and_then(|key| self.layer_node(key))) else {
            return self.show_instantly(Some(next));
        };
        if direction == Direction::None {
            return self.show_instantly(Some(next));
        }

        let kind = self.settings.animation_kind_for(next);
        let Some(strategy) = self.strategy(kind) else {
            log::debug!("LayeredMenu: no animation named '{}', switching instantly", kind);
            return self.show_instantly(Some(next));
        };

        log::debug!("LayeredMenu transition {:?} -> '{}' ({}, {})", prev, next, strategy.name(), direction);
        let key = next.to_string();
        strategy.transition(
            self.host.animator(),
            from,
            to,
            direction,
            &Timing::from_settings(&self.settings.animation),
            Some(Box::new(move || log::debug!("LayeredMenu transition to '{}' complete", key))),
        )
    }

    /// Show `next`, hide every other layer, drop transform leftovers
    fn show_instantly(&self, next: Option<&str>) -> Result<(), MenuError> {
        let animator = self.host.animator();
        let nodes: Vec<_> = self.layers.iter().map(|layer| layer.node.clone()).collect();
        if !nodes.is_empty() {
            animator.kill_tweens(&nodes)?;
        }
        for layer in &self.layers {
            let base = if next == Some(layer.key.as_str()) {
                Visual::shown()
            } else {
                Visual::hidden()
            };
            animator.set(&layer.node, &base.x(0.0).scale(1.0).z_index(animation::ZIndex::Auto))?;
        }
        Ok(())
    }

    fn strategy(&self, kind: &str) -> Option<Rc<dyn TransitionStrategy<H::Node>>> {
        self.strategies
            .get(kind)
            .cloned()
            .or_else(|| animation::builtin(kind).map(Rc::from))
    }

    fn init_swipe_handlers(&self, key: &str) -> Result<(), MenuError> {
        if !gesture::gestures_allowed(self.host.viewport_width()) {
            return Ok(());
        }
        let Some(layer) = self.layer(key) else {
            return Ok(());
        };
        if !self.settings.swipe_enabled_for(key) {
            log::debug!("LayeredMenu: swipe disabled for '{}'", key);
            return Ok(());
        }
        self.host.listen_swipes(&layer.node)
    }

    fn remove_swipe_handlers(&self, key: &str) -> Result<(), MenuError> {
        match self.layer(key) {
            Some(layer) => self.host.unlisten_swipes(&layer.node),
            None => Ok(()),
        }
    }

    fn attach_handlers(&self) -> Result<(), MenuError> {
        self.host.listen_clicks()
    }

    fn detach_handlers(&self) -> Result<(), MenuError> {
        self.host.unlisten_clicks()
    }

    /// Route `error` to `on_error`, or log it when no hook is configured
    pub fn report(&self, error: MenuError, operation: Operation) {
        self.publish();
        let context = ErrorContext {
            operation,
            current_layer_key: self.current.clone(),
        };
        match &self.on_error {
            Some(handler) => handler(&error, &context),
            None => log::error!("LayeredMenu error in {}: {}", operation, error),
        }
    }

    fn emit(&self, event: MenuEvent, payload: &LayerChangePayload<H::Node>) -> Result<(), MenuError> {
        self.publish();
        self.emitter.emit(event, payload)
    }

    /// Copy the observable state into the shared view
    fn publish(&self) {
        let Ok(mut view) = self.view.try_borrow_mut() else {
            log::warn!("LayeredMenu: view is being read, state not published");
            return;
        };
        view.state = self.state;
        view.current_layer_key.clone_from(&self.current);
        view.history.clone_from(&self.history);
        view.layers = self
            .layers
            .iter()
            .map(|layer| (layer.key.clone(), layer.parent_key.clone()))
            .collect();
    }

    fn layer(&self, key: &str) -> Option<&Layer<H::Node>> {
        self.index.get(key).and_then(|&idx| self.layers.get(idx))
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn first_key(&self) -> Option<LayerKey> {
        self.layers.first().map(|layer| layer.key.clone())
    }

    fn direction(&self, prev: Option<&str>, next: Option<&str>) -> Direction {
        Direction::between(
            prev.and_then(|key| self.index_of(key)),
            next.and_then(|key| self.index_of(key)),
        )
    }

    fn payload(&self, prev: Option<&str>, current: Option<&str>, direction: Direction) -> LayerChangePayload<H::Node> {
        LayerChangePayload {
            current_layer: current.and_then(|key| self.layer_node(key)).cloned(),
            prev_layer: prev.and_then(|key| self.layer_node(key)).cloned(),
            current_layer_key: current.map(str::to_string),
            prev_layer_key: prev.map(str::to_string),
            direction,
            current_layer_index: current.and_then(|key| self.index_of(key)),
            prev_layer_index: prev.and_then(|key| self.index_of(key)),
        }
    }
}

impl<H: MenuHost + std::fmt::Debug> std::fmt::Debug for LayeredMenu<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredMenu")
            .field("host", &self.host)
            .field("state", &self.state)
            .field("layers", &self.layer_keys())
            .field("current", &self.current)
            .field("history", &self.history)
            .finish()
    }
}

fn validate_settings(settings: &MenuSettings) -> Result<(), MenuError> {
    let animation = &settings.animation;
    if let Some(duration) = animation.duration {
        if !duration.is_finite() || duration < 0.0 {
            return Err(MenuError::InvalidConfig(format!("animation.duration must be >= 0, got {}", duration)));
        }
    }
    if let Some(delay) = animation.delay {
        if !delay.is_finite() || delay < 0.0 {
            return Err(MenuError::InvalidConfig(format!("animation.delay must be >= 0, got {}", delay)));
        }
    }
    if animation.kind.is_empty() {
        return Err(MenuError::InvalidConfig("animation.type must not be empty".to_string()));
    }
    Ok(())
}

/// Per-layer handlers only observe transitions into their own layer
fn scoped_to_layer<N: 'static>(key: LayerKey, handler: EventHandler<N>) -> EventHandler<N> {
    Rc::new(move |payload: &LayerChangePayload<N>| {
        if payload.current_layer_key.as_deref() == Some(key.as_str()) {
            handler(payload)
        } else {
            Ok(())
        }
    })
}
