//! GSAP-backed [`Animator`]
//!
//! The page is expected to load GSAP as the global `gsap`. Property names
//! follow GSAP's CSS plugin (`x`, `scale`, `opacity`, `pointerEvents`, ...).

use js_sys::Object;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::helpers::{animation_error, set};
use crate::animation::{Animator, PointerEvents, Step, Tween, Visibility, Visual, ZIndex};
use crate::errors::MenuError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = gsap, js_name = set, catch)]
    fn gsap_set(target: &JsValue, vars: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = gsap, js_name = to, catch)]
    fn gsap_to(target: &JsValue, vars: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = gsap, js_name = killTweensOf, catch)]
    fn gsap_kill_tweens_of(targets: &JsValue) -> Result<(), JsValue>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GsapAnimator;

impl GsapAnimator {
    pub fn new() -> Self {
        Self
    }
}

fn vars(visual: &Visual) -> Result<Object, JsValue> {
    let object = Object::new();
    if let Some(x) = visual.x {
        set(&object, "x", &JsValue::from_f64(x))?;
    }
    if let Some(scale) = visual.scale {
        set(&object, "scale", &JsValue::from_f64(scale))?;
    }
    if let Some(opacity) = visual.opacity {
        set(&object, "opacity", &JsValue::from_f64(opacity))?;
    }
    if let Some(pointer_events) = visual.pointer_events {
        let value = match pointer_events {
            PointerEvents::Auto => "auto",
            PointerEvents::None => "none",
        };
        set(&object, "pointerEvents", &JsValue::from_str(value))?;
    }
    if let Some(visibility) = visual.visibility {
        let value = match visibility {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        };
        set(&object, "visibility", &JsValue::from_str(value))?;
    }
    if let Some(z_index) = visual.z_index {
        let value = match z_index {
            ZIndex::Auto => JsValue::from_str(""),
            ZIndex::Value(z) => JsValue::from_f64(z as f64),
        };
        set(&object, "zIndex", &value)?;
    }
    Ok(object)
}

fn timed_vars(visual: &Visual, tween: &Tween) -> Result<Object, JsValue> {
    let object = vars(visual)?;
    set(&object, "duration", &JsValue::from_f64(tween.duration))?;
    if tween.delay > 0.0 {
        set(&object, "delay", &JsValue::from_f64(tween.delay))?;
    }
    if let Some(easing) = tween.easing.as_deref() {
        set(&object, "ease", &JsValue::from_str(easing))?;
    }
    Ok(object)
}

impl Animator<HtmlElement> for GsapAnimator {
    fn kill_tweens(&self, nodes: &[HtmlElement]) -> Result<(), MenuError> {
        let targets: js_sys::Array = nodes.iter().map(|node| JsValue::from(node.clone())).collect();
        gsap_kill_tweens_of(&targets).map_err(|e| animation_error("gsap.killTweensOf", e))
    }

    fn set(&self, node: &HtmlElement, visual: &Visual) -> Result<(), MenuError> {
        let vars = vars(visual).map_err(|e| animation_error("gsap.set vars", e))?;
        gsap_set(node, &vars)
            .map(|_| ())
            .map_err(|e| animation_error("gsap.set", e))
    }

    fn tween(&self, step: Step<HtmlElement>) -> Result<(), MenuError> {
        let Step {
            node,
            to,
            timing,
            finally,
            on_complete,
        } = step;
        let tween_vars = timed_vars(&to, &timing).map_err(|e| animation_error("gsap.to vars", e))?;

        if !finally.is_empty() || on_complete.is_some() {
            let complete = Closure::once_into_js(move || {
                for (target, visual) in &finally {
                    let applied = vars(visual).and_then(|v| gsap_set(target, &v));
                    if let Err(err) = applied {
                        log::warn!("gsap completion set failed: {}", super::helpers::describe(&err));
                    }
                }
                if let Some(done) = on_complete {
                    done();
                }
            });
            set(&tween_vars, "onComplete", &complete).map_err(|e| animation_error("gsap.to onComplete", e))?;
        }

        gsap_to(&node, &tween_vars)
            .map(|_| ())
            .map_err(|e| animation_error("gsap.to", e))
    }

    fn width(&self, node: &HtmlElement) -> f64 {
        node.offset_width() as f64
    }
}
