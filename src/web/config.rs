//! Parsing the JS configuration object
//!
//! Plain settings go through serde; `events`, `layers.<key>.events` and
//! `onError` are function-valued and are read by reflection. Event names are
//! checked against [`MenuEvent`] here, so a typo fails construction instead
//! of silently never firing.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use super::helpers::{describe, deserialize, error_context_to_js, payload_to_js, to_js_error};
use crate::errors::{ErrorContext, ErrorHandler, MenuError};
use crate::menu::EventHandler;
use crate::models::{LayerChangePayload, MenuConfig, MenuEvent, MenuSettings};

/// Wrap a JS function as an event handler; a throw becomes `Err`
pub fn js_event_handler(function: Function) -> EventHandler<HtmlElement> {
    Rc::new(move |payload: &LayerChangePayload<HtmlElement>| {
        let js_payload = payload_to_js(payload).map_err(|e| describe(&e))?;
        function
            .call1(&JsValue::NULL, &js_payload)
            .map(|_| ())
            .map_err(|e| describe(&e))
    })
}

fn js_error_handler(function: Function) -> ErrorHandler {
    Rc::new(move |error: &MenuError, context: &ErrorContext| {
        let js_error = to_js_error(error);
        let delivered = error_context_to_js(context)
            .and_then(|ctx| function.call2(&JsValue::NULL, &js_error, &ctx));
        if let Err(thrown) = delivered {
            log::error!("LayeredMenu onError handler threw: {}", describe(&thrown));
        }
    })
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, MenuError> {
    Reflect::get(target, &JsValue::from_str(key))
        .map_err(|e| MenuError::InvalidConfig(format!("{}: {}", key, describe(&e))))
}

fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

/// `[name, value]` pairs of a plain object; absent objects yield nothing
fn entries(value: &JsValue, path: &str) -> Result<Vec<(String, JsValue)>, MenuError> {
    if is_absent(value) {
        return Ok(Vec::new());
    }
    let object = value
        .dyn_ref::<Object>()
        .ok_or_else(|| MenuError::InvalidConfig(format!("{} must be an object", path)))?;
    Object::entries(object)
        .iter()
        .map(|entry| {
            let pair: Array = entry.unchecked_into();
            let name = pair
                .get(0)
                .as_string()
                .ok_or_else(|| MenuError::InvalidConfig(format!("{}: non-string key", path)))?;
            Ok((name, pair.get(1)))
        })
        .collect()
}

/// Parse an `events` map into typed handlers
fn parse_events(value: &JsValue, path: &str) -> Result<Vec<(MenuEvent, EventHandler<HtmlElement>)>, MenuError> {
    let mut handlers = Vec::new();
    for (name, handler) in entries(value, path)? {
        let event: MenuEvent = name.parse()?;
        if is_absent(&handler) {
            continue;
        }
        let function = handler
            .dyn_into::<Function>()
            .map_err(|_| MenuError::InvalidConfig(format!("{}.{} must be a function", path, name)))?;
        handlers.push((event, js_event_handler(function)));
    }
    Ok(handlers)
}

pub fn parse_config(config: &JsValue) -> Result<MenuConfig<HtmlElement>, MenuError> {
    if is_absent(config) {
        return Ok(MenuConfig::default());
    }
    if !config.is_object() {
        return Err(MenuError::InvalidConfig("config must be an object".to_string()));
    }

    let settings: MenuSettings = deserialize(config.clone(), "config")?;
    let mut menu_config = MenuConfig::new(settings);

    for (event, handler) in parse_events(&get(config, "events")?, "events")? {
        menu_config = menu_config.with_event(event, handler);
    }

    for (key, layer) in entries(&get(config, "layers")?, "layers")? {
        if is_absent(&layer) {
            continue;
        }
        let path = format!("layers.{}.events", key);
        for (event, handler) in parse_events(&get(&layer, "events")?, &path)? {
            menu_config = menu_config.with_layer_event(key.clone(), event, handler);
        }
    }

    let on_error = get(config, "onError")?;
    if !is_absent(&on_error) {
        let function = on_error
            .dyn_into::<Function>()
            .map_err(|_| MenuError::InvalidConfig("onError must be a function".to_string()))?;
        menu_config = menu_config.with_error_handler(js_error_handler(function));
    }

    Ok(menu_config)
}
