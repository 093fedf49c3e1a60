//! JavaScript-facing API
//!
//! - `LayeredMenu`: one menu instance (`new LayeredMenu(root, config)`)
//! - `LayeredMenuApi`: static functions over the process-wide instance
//!   registry, the integration surface for host pages
//!
//! Roots are accepted as CSS selectors or elements. Lifecycle calls never
//! throw: failures go to the configured `onError` hook.
//!
//! Event handlers may call back into the instance. Getters answer from the
//! published view of the menu; lifecycle and navigation calls made while an
//! operation is running are queued and run once it returns.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::config::{js_event_handler, parse_config};
use super::helpers::{serialize, to_js_error};
use super::host::{resolve_root, JsSubscription, WebHost};
use super::listeners::Listeners;
use crate::errors::{MenuError, Operation};
use crate::menu::{LayeredMenu, MenuCell, MenuRegistry, SharedMenu};
use crate::models::{LayerTarget, MenuEvent};

thread_local! {
    static REGISTRY: RefCell<MenuRegistry<WebHost>> = RefCell::new(MenuRegistry::new());
}

/// Build a menu for `root` and bind its DOM listeners
pub fn create_menu(root: &JsValue, config: &JsValue) -> Result<SharedMenu<WebHost>, MenuError> {
    let host = WebHost::from_js(root)?;
    let config = parse_config(config)?;
    let menu = Rc::new(MenuCell::new(LayeredMenu::new(host, config)?));
    let listeners = Listeners::bind(&menu);
    menu.host().bind(listeners);
    Ok(menu)
}

fn with_registry<R>(f: impl FnOnce(&mut MenuRegistry<WebHost>) -> R) -> Result<R, JsValue> {
    REGISTRY.with(|registry| match registry.try_borrow_mut() {
        Ok(mut registry) => Ok(f(&mut registry)),
        Err(_) => Err(JsValue::from_str("LayeredMenu registry is busy")),
    })
}

fn parse_event(name: &str) -> Result<MenuEvent, JsValue> {
    name.parse::<MenuEvent>().map_err(|e| to_js_error(&e).into())
}

/// `layerKey` string or signed offset
fn parse_target(target: &JsValue) -> Option<LayerTarget> {
    if let Some(key) = target.as_string() {
        return Some(LayerTarget::Key(key));
    }
    target
        .as_f64()
        .filter(|offset| offset.is_finite())
        .map(|offset| LayerTarget::Offset(offset.trunc() as i64))
}

#[wasm_bindgen(js_name = LayeredMenu)]
pub struct WasmLayeredMenu {
    inner: SharedMenu<WebHost>,
}

impl WasmLayeredMenu {
    fn from_shared(inner: SharedMenu<WebHost>) -> Self {
        Self { inner }
    }
}

#[wasm_bindgen(js_class = LayeredMenu)]
impl WasmLayeredMenu {
    /// Throws when the root cannot be resolved or the config is invalid
    #[wasm_bindgen(constructor)]
    pub fn new(root: JsValue, config: JsValue) -> Result<WasmLayeredMenu, JsValue> {
        create_menu(&root, &config)
            .map(Self::from_shared)
            .map_err(|e| to_js_error(&e).into())
    }

    pub fn init(&self) {
        self.inner.run(|menu| menu.init());
    }

    pub fn reinit(&self) {
        self.inner.run(|menu| menu.reinit());
    }

    pub fn destroy(&self) {
        self.inner.run(|menu| menu.destroy());
    }

    #[wasm_bindgen(js_name = setLayer)]
    pub fn set_layer(&self, target: JsValue, is_back: Option<bool>) {
        let is_back = is_back.unwrap_or(false);
        match parse_target(&target) {
            Some(target) => self.inner.run(move |menu| menu.set_layer(target, is_back)),
            None => {
                let error = MenuError::LayerNotFound(format!("{:?}", target));
                self.inner.run(move |menu| menu.report(error, Operation::SetLayer));
            }
        }
    }

    pub fn reset(&self) {
        self.inner.run(|menu| menu.reset());
    }

    pub fn back(&self) {
        self.inner.run(|menu| menu.back());
    }

    /// Subscribe `handler` to `event`; unknown event names throw
    pub fn on(&self, event: &str, handler: Function) -> Result<(), JsValue> {
        let event = parse_event(event)?;
        let host = self.inner.host();
        if host.is_subscribed(event, &handler) {
            return Ok(());
        }
        let id = self.inner.on(event, js_event_handler(handler.clone()));
        host.subscribe(JsSubscription {
            event,
            function: handler,
            id,
        });
        Ok(())
    }

    /// Remove a handler added with `on`; returns whether it was subscribed
    pub fn off(&self, event: &str, handler: Function) -> Result<bool, JsValue> {
        let event = parse_event(event)?;
        Ok(match self.inner.host().unsubscribe(event, &handler) {
            Some(id) => self.inner.off(event, id),
            None => false,
        })
    }

    #[wasm_bindgen(js_name = currentLayerKey)]
    pub fn current_layer_key(&self) -> Option<String> {
        self.inner.view().current_layer_key.clone()
    }

    #[wasm_bindgen(js_name = layerKeys)]
    pub fn layer_keys(&self) -> Array {
        self.inner.view().layer_keys().into_iter().map(JsValue::from).collect()
    }

    pub fn history(&self) -> Array {
        self.inner.view().history.iter().map(|key| JsValue::from_str(key)).collect()
    }

    #[wasm_bindgen(js_name = parentKey)]
    pub fn parent_key(&self, key: &str) -> Option<String> {
        self.inner.view().parent_key(key).map(str::to_string)
    }

    /// `meta` of a configured layer, or `undefined`
    #[wasm_bindgen(js_name = layerMeta)]
    pub fn layer_meta(&self, key: &str) -> Result<JsValue, JsValue> {
        match self.inner.layer_meta(key) {
            Some(meta) => serialize(meta, "layerMeta"),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn state(&self) -> String {
        self.inner.view().state.as_str().to_string()
    }

    pub fn root(&self) -> HtmlElement {
        self.inner.root().clone()
    }
}

/// Static entry points over the instance registry
#[wasm_bindgen]
pub struct LayeredMenuApi;

#[wasm_bindgen]
impl LayeredMenuApi {
    /// Create and register a menu; the caller runs `init()` on it
    pub fn init(root: JsValue, config: JsValue) -> Result<WasmLayeredMenu, JsValue> {
        let menu = create_menu(&root, &config).map_err(|e| JsValue::from(to_js_error(&e)))?;
        with_registry(|registry| registry.register(Rc::clone(&menu)))?;
        Ok(WasmLayeredMenu::from_shared(menu))
    }

    /// Destroy and deregister; false when no instance owns `root`
    pub fn destroy(root: JsValue) -> Result<bool, JsValue> {
        let Some(root) = resolve_root(&root) else {
            return Ok(false);
        };
        // Handlers fire after the registry is released, so they may use it
        let Some(menu) = with_registry(|registry| registry.remove(&root))? else {
            return Ok(false);
        };
        menu.run(|menu| menu.destroy());
        Ok(true)
    }

    pub fn reinit(root: JsValue) -> Result<bool, JsValue> {
        let Some(root) = resolve_root(&root) else {
            return Ok(false);
        };
        let Some(menu) = with_registry(|registry| registry.get(&root))? else {
            return Ok(false);
        };
        menu.run(|menu| menu.reinit());
        Ok(true)
    }

    #[wasm_bindgen(js_name = getInstance)]
    pub fn get_instance(root: JsValue) -> Result<Option<WasmLayeredMenu>, JsValue> {
        let Some(root) = resolve_root(&root) else {
            return Ok(None);
        };
        with_registry(|registry| registry.get(&root).map(WasmLayeredMenu::from_shared))
    }

    #[wasm_bindgen(js_name = getInstances)]
    pub fn get_instances() -> Result<Array, JsValue> {
        with_registry(|registry| {
            registry
                .instances()
                .iter()
                .map(|menu| JsValue::from(WasmLayeredMenu::from_shared(Rc::clone(menu))))
                .collect()
        })
    }

    /// Subscribe on one instance; false when no instance owns `root`
    pub fn on(root: JsValue, event: &str, handler: Function) -> Result<bool, JsValue> {
        let event = parse_event(event)?;
        let Some(root) = resolve_root(&root) else {
            return Ok(false);
        };
        with_registry(|registry| registry.on(&root, event, js_event_handler(handler)).is_some())
    }

    /// Subscribe on every currently registered instance; returns the count
    #[wasm_bindgen(js_name = onAll)]
    pub fn on_all(event: &str, handler: Function) -> Result<u32, JsValue> {
        let event = parse_event(event)?;
        with_registry(|registry| registry.on_all(event, js_event_handler(handler)) as u32)
    }

    #[wasm_bindgen(js_name = onInit)]
    pub fn on_init(root: JsValue, handler: Function) -> Result<bool, JsValue> {
        let Some(root) = resolve_root(&root) else {
            return Ok(false);
        };
        with_registry(|registry| registry.on_init(&root, js_event_handler(handler)).is_some())
    }

    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(root: JsValue, handler: Function) -> Result<bool, JsValue> {
        let Some(root) = resolve_root(&root) else {
            return Ok(false);
        };
        with_registry(|registry| registry.on_change(&root, js_event_handler(handler)).is_some())
    }

    #[wasm_bindgen(js_name = onAnyInit)]
    pub fn on_any_init(handler: Function) -> Result<u32, JsValue> {
        with_registry(|registry| registry.on_any_init(js_event_handler(handler)) as u32)
    }

    #[wasm_bindgen(js_name = onAnyChange)]
    pub fn on_any_change(handler: Function) -> Result<u32, JsValue> {
        with_registry(|registry| registry.on_any_change(js_event_handler(handler)) as u32)
    }

    /// Destroy every instance and empty the registry
    #[wasm_bindgen(js_name = destroyAll)]
    pub fn destroy_all() -> Result<(), JsValue> {
        for menu in with_registry(|registry| registry.take_all())? {
            menu.run(|menu| menu.destroy());
        }
        Ok(())
    }
}
