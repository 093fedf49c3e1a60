//! Browser binding
//!
//! - `host`: [`WebHost`], the DOM implementation of `MenuHost`
//! - `listeners`: click/touch/resize closures forwarding into a menu
//! - `gsap`: [`GsapAnimator`] over the page's global `gsap`
//! - `config`: JS config object to `MenuConfig`
//! - `helpers`: serialization and error conversion at the JS boundary
//! - `api`: the exported `LayeredMenu` class and `LayeredMenuApi` statics

pub mod api;
pub mod config;
pub mod gsap;
pub mod helpers;
pub mod host;
pub mod listeners;

pub use api::{create_menu, LayeredMenuApi, WasmLayeredMenu};
pub use config::parse_config;
pub use gsap::GsapAnimator;
pub use host::WebHost;
pub use listeners::{find_trigger, Listeners};
