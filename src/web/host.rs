//! Browser implementation of [`MenuHost`]

use std::cell::RefCell;
use std::collections::BTreeMap;

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Window};

use super::gsap::GsapAnimator;
use super::helpers::dom_error;
use super::listeners::Listeners;
use crate::animation::Animator;
use crate::errors::MenuError;
use crate::menu::{ListenerId, MenuHost};
use crate::models::{LayerMarker, MenuEvent, LAYER_ATTR, NEXT_TRIGGER_ATTR, PARENT_ATTR};

/// JS handler registered through `on`, kept so `off` can find it again
#[derive(Debug, Clone)]
pub struct JsSubscription {
    pub event: MenuEvent,
    pub function: Function,
    pub id: ListenerId,
}

#[derive(Debug)]
pub struct WebHost {
    root: HtmlElement,
    window: Window,
    animator: GsapAnimator,
    /// Bound once the owning menu exists (the closures hold a weak handle to it)
    listeners: RefCell<Option<Listeners>>,
    subscriptions: RefCell<Vec<JsSubscription>>,
}

impl WebHost {
    pub fn new(root: HtmlElement) -> Result<Self, MenuError> {
        let window = web_sys::window().ok_or_else(|| MenuError::Dom("no global window".to_string()))?;
        Ok(Self {
            root,
            window,
            animator: GsapAnimator::new(),
            listeners: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
        })
    }

    /// Resolve the root from a CSS selector
    pub fn from_selector(selector: &str) -> Result<Self, MenuError> {
        Self::new(find_element(selector).ok_or(MenuError::MissingRoot)?)
    }

    /// Resolve the root from a selector string or an element
    pub fn from_js(root: &JsValue) -> Result<Self, MenuError> {
        Self::new(resolve_root(root).ok_or(MenuError::MissingRoot)?)
    }

    pub fn bind(&self, listeners: Listeners) {
        *self.listeners.borrow_mut() = Some(listeners);
    }

    pub fn subscribe(&self, subscription: JsSubscription) {
        self.subscriptions.borrow_mut().push(subscription);
    }

    /// Forget the subscription of `function` to `event`, returning its id
    pub fn unsubscribe(&self, event: MenuEvent, function: &Function) -> Option<ListenerId> {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let idx = subscriptions
            .iter()
            .position(|s| s.event == event && &s.function == function)?;
        Some(subscriptions.remove(idx).id)
    }

    pub fn is_subscribed(&self, event: MenuEvent, function: &Function) -> bool {
        self.subscriptions
            .borrow()
            .iter()
            .any(|s| s.event == event && &s.function == function)
    }

    fn with_listeners(
        &self,
        what: &str,
        f: impl FnOnce(&Listeners) -> Result<(), JsValue>,
    ) -> Result<(), MenuError> {
        match self.listeners.borrow().as_ref() {
            Some(listeners) => f(listeners).map_err(|e| dom_error(what, e)),
            None => {
                log::warn!("LayeredMenu: listeners not bound, {} skipped", what);
                Ok(())
            }
        }
    }
}

/// `document.querySelector(selector)` narrowed to an HTML element
pub fn find_element(selector: &str) -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}

pub fn resolve_root(root: &JsValue) -> Option<HtmlElement> {
    match root.as_string() {
        Some(selector) => find_element(&selector),
        None => root.dyn_ref::<HtmlElement>().cloned(),
    }
}

fn elements_matching(scope: &Element, selector: &str) -> Result<Vec<Element>, MenuError> {
    let list = scope
        .query_selector_all(selector)
        .map_err(|e| dom_error("querySelectorAll", e))?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

impl MenuHost for WebHost {
    type Node = HtmlElement;

    fn root(&self) -> &HtmlElement {
        &self.root
    }

    fn scan_layers(&self) -> Result<Vec<LayerMarker<HtmlElement>>, MenuError> {
        let selector = format!("[{}]", LAYER_ATTR);
        let markers = elements_matching(&self.root, &selector)?
            .into_iter()
            .filter_map(|element| {
                let key = element.get_attribute(LAYER_ATTR);
                let parent = element.get_attribute(PARENT_ATTR);
                match element.dyn_into::<HtmlElement>() {
                    Ok(node) => Some(LayerMarker { node, key, parent }),
                    Err(_) => {
                        log::warn!("LayeredMenu: ignoring non-HTML layer marker {:?}", key);
                        None
                    }
                }
            })
            .collect();
        Ok(markers)
    }

    fn add_class(&self, node: &HtmlElement, class_name: &str) -> Result<(), MenuError> {
        node.class_list()
            .add_1(class_name)
            .map_err(|e| dom_error("classList.add", e))
    }

    fn apply_style(&self, node: &HtmlElement, style: &BTreeMap<String, String>) -> Result<(), MenuError> {
        // Assign like `Object.assign(node.style, style)` so JS property names work
        let declaration = node.style();
        for (property, value) in style {
            Reflect::set(&declaration, &JsValue::from_str(property), &JsValue::from_str(value))
                .map_err(|e| dom_error("style", e))?;
        }
        Ok(())
    }

    fn forward_triggers(&self, layer: &HtmlElement) -> Result<Vec<Option<String>>, MenuError> {
        let selector = format!("[{}]", NEXT_TRIGGER_ATTR);
        Ok(elements_matching(layer, &selector)?
            .iter()
            .map(|element| element.get_attribute(NEXT_TRIGGER_ATTR))
            .collect())
    }

    fn viewport_width(&self) -> f64 {
        // Unknown width counts as desktop: no swipe listeners
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(f64::INFINITY)
    }

    fn animator(&self) -> &dyn Animator<HtmlElement> {
        &self.animator
    }

    fn listen_clicks(&self) -> Result<(), MenuError> {
        self.with_listeners("click listener", |l| {
            self.root
                .add_event_listener_with_callback("click", l.click.as_ref().unchecked_ref())
        })
    }

    fn unlisten_clicks(&self) -> Result<(), MenuError> {
        self.with_listeners("click listener", |l| {
            self.root
                .remove_event_listener_with_callback("click", l.click.as_ref().unchecked_ref())
        })
    }

    fn listen_swipes(&self, layer: &HtmlElement) -> Result<(), MenuError> {
        self.with_listeners("touch listeners", |l| {
            for (name, callback) in l.touch_callbacks() {
                layer.add_event_listener_with_callback(name, callback)?;
            }
            Ok(())
        })
    }

    fn unlisten_swipes(&self, layer: &HtmlElement) -> Result<(), MenuError> {
        self.with_listeners("touch listeners", |l| {
            for (name, callback) in l.touch_callbacks() {
                layer.remove_event_listener_with_callback(name, callback)?;
            }
            Ok(())
        })
    }

    fn listen_resize(&self) -> Result<(), MenuError> {
        self.with_listeners("resize listener", |l| {
            self.window
                .add_event_listener_with_callback("resize", l.resize.as_ref().unchecked_ref())
        })
    }

    fn unlisten_resize(&self) -> Result<(), MenuError> {
        self.with_listeners("resize listener", |l| {
            self.window
                .remove_event_listener_with_callback("resize", l.resize.as_ref().unchecked_ref())
        })
    }
}
