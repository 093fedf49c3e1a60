//! Layered Menu WASM Module
//!
//! A multi-level navigation menu: nested "layers" inside one root element,
//! one visible at a time, switched with animated transitions, declarative
//! `data-menu-*` triggers and swipe gestures on narrow viewports.
//!
//! The engine ([`menu::LayeredMenu`]) is generic over a [`menu::MenuHost`]
//! and runs headless in tests; [`web`] binds it to the DOM and GSAP.

pub mod animation;
pub mod errors;
pub mod menu;
pub mod models;
pub mod web;

// Re-export commonly used types
pub use errors::{ErrorContext, MenuError, Operation};
pub use menu::{LayeredMenu, MenuCell, MenuRegistry, MenuState, MenuView, SharedMenu};
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if let Err(err) = console_log::init_with_level(log::Level::Debug) {
            web_sys::console::warn_1(&format!("logger already initialized: {}", err).into());
        }
    }

    log::info!("Layered menu WASM module initialized");
}
