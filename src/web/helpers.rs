//! Shared helpers for the JS boundary
//!
//! Serialization in and out of JS values, error conversion, and payload
//! construction.

use js_sys::{Object, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::errors::{ErrorContext, MenuError};
use crate::models::LayerChangePayload;

// ============================================================================
// Error Conversion
// ============================================================================

/// Best-effort message of a thrown JS value
pub fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Build a JS `Error` whose `name` is the menu error class
pub fn to_js_error(error: &MenuError) -> js_sys::Error {
    let js = js_sys::Error::new(&error.to_string());
    js.set_name(error.kind());
    js
}

pub fn dom_error(context: &str, value: JsValue) -> MenuError {
    MenuError::Dom(format!("{}: {}", context, describe(&value)))
}

pub fn animation_error(context: &str, value: JsValue) -> MenuError {
    MenuError::Animation(format!("{}: {}", context, describe(&value)))
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript, mapping failures to `InvalidConfig`
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, MenuError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| MenuError::InvalidConfig(format!("{}: {}", error_context, e)))
}

/// Serialize to plain JS objects (maps become objects, not `Map`)
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| {
            let msg = format!("{}: {}", error_context, e);
            log::error!("{}", msg);
            JsValue::from_str(&msg)
        })
}

// ============================================================================
// Object Construction
// ============================================================================

pub fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn opt_str(value: Option<&str>) -> JsValue {
    value.map_or(JsValue::NULL, JsValue::from_str)
}

fn opt_node(node: Option<&HtmlElement>) -> JsValue {
    node.map_or(JsValue::NULL, |node| node.clone().into())
}

fn opt_index(index: Option<usize>) -> JsValue {
    JsValue::from_f64(index.map_or(-1.0, |idx| idx as f64))
}

/// Payload object as host pages expect it (absent indices are `-1`)
pub fn payload_to_js(payload: &LayerChangePayload<HtmlElement>) -> Result<JsValue, JsValue> {
    let object = Object::new();
    set(&object, "currentLayer", &opt_node(payload.current_layer.as_ref()))?;
    set(&object, "prevLayer", &opt_node(payload.prev_layer.as_ref()))?;
    set(&object, "currentLayerKey", &opt_str(payload.current_layer_key.as_deref()))?;
    set(&object, "prevLayerKey", &opt_str(payload.prev_layer_key.as_deref()))?;
    set(&object, "direction", &JsValue::from_str(payload.direction.as_str()))?;
    set(&object, "currentLayerIndex", &opt_index(payload.current_layer_index))?;
    set(&object, "prevLayerIndex", &opt_index(payload.prev_layer_index))?;
    Ok(object.into())
}

/// Second argument of a JS `onError` hook: `{ context, currentLayerKey }`
pub fn error_context_to_js(context: &ErrorContext) -> Result<JsValue, JsValue> {
    let object = Object::new();
    set(&object, "context", &JsValue::from_str(context.operation.as_str()))?;
    set(&object, "currentLayerKey", &opt_str(context.current_layer_key.as_deref()))?;
    Ok(object.into())
}
