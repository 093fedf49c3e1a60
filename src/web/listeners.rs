//! JS event listeners forwarding into a menu
//!
//! The closures keep only a weak handle to the menu so a dropped menu can be
//! collected even while the DOM still references its callbacks. They are
//! created once per instance and re-attached as the active layer changes;
//! `removeEventListener` needs the very same function objects.
//!
//! Input arriving while the menu is mid-operation (a handler calling `click()`
//! on a trigger, say) is deferred by the [`MenuCell`], not dropped.

use std::rc::{Rc, Weak};

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, TouchEvent};

use super::host::WebHost;
use crate::menu::{LayeredMenu, MenuCell};
use crate::models::{Trigger, NEXT_TRIGGER_ATTR, PREV_TRIGGER_ATTR};

pub struct Listeners {
    pub(crate) click: Closure<dyn FnMut(Event)>,
    pub(crate) touch_start: Closure<dyn FnMut(TouchEvent)>,
    pub(crate) touch_move: Closure<dyn FnMut(TouchEvent)>,
    pub(crate) touch_end: Closure<dyn FnMut(TouchEvent)>,
    pub(crate) resize: Closure<dyn FnMut()>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").finish_non_exhaustive()
    }
}

/// Run `f` against the menu unless it is gone
fn with_menu(
    menu: &Weak<MenuCell<WebHost>>,
    what: &str,
    f: impl FnOnce(&mut LayeredMenu<WebHost>) + 'static,
) {
    match menu.upgrade() {
        Some(menu) => menu.run(f),
        None => log::debug!("LayeredMenu dropped, {} ignored", what),
    }
}

/// Nearest declarative trigger around the click target; forward wins
pub fn find_trigger(target: &Element) -> Option<Trigger> {
    let closest = |attr: &str| -> Option<String> {
        let element = target.closest(&format!("[{}]", attr)).ok().flatten()?;
        Some(element.get_attribute(attr).unwrap_or_default())
    };
    if let Some(key) = closest(NEXT_TRIGGER_ATTR) {
        return Some(Trigger::Next(key));
    }
    closest(PREV_TRIGGER_ATTR).map(Trigger::Prev)
}

impl Listeners {
    pub fn bind(menu: &Rc<MenuCell<WebHost>>) -> Self {
        let weak = Rc::downgrade(menu);

        let click = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let Some(trigger) = find_trigger(&target) else {
                    return;
                };
                event.prevent_default();
                with_menu(&weak, "click", move |menu| menu.handle_trigger(trigger));
            }) as Box<dyn FnMut(Event)>)
        };

        let touch_start = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |event: TouchEvent| {
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let (x, y) = (touch.client_x() as f64, touch.client_y() as f64);
                let now = js_sys::Date::now();
                with_menu(&weak, "touchstart", move |menu| menu.handle_touch_start(x, y, now));
            }) as Box<dyn FnMut(TouchEvent)>)
        };

        // Reserved: movement is only evaluated on touchend
        let touch_move = Closure::wrap(Box::new(|_event: TouchEvent| {}) as Box<dyn FnMut(TouchEvent)>);

        let touch_end = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |event: TouchEvent| {
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let x = touch.client_x() as f64;
                let now = js_sys::Date::now();
                with_menu(&weak, "touchend", move |menu| menu.handle_touch_end(x, now));
            }) as Box<dyn FnMut(TouchEvent)>)
        };

        let resize = Closure::wrap(Box::new(move || {
            with_menu(&weak, "resize", |menu| menu.handle_resize());
        }) as Box<dyn FnMut()>);

        Self {
            click,
            touch_start,
            touch_move,
            touch_end,
            resize,
        }
    }

    pub(crate) fn touch_callbacks(&self) -> [(&'static str, &Function); 3] {
        [
            ("touchstart", self.touch_start.as_ref().unchecked_ref()),
            ("touchmove", self.touch_move.as_ref().unchecked_ref()),
            ("touchend", self.touch_end.as_ref().unchecked_ref()),
        ]
    }
}
