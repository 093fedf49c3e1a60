//! Data models for the layered menu
//!
//! Layer identity, navigation targets, configuration and event payloads.

pub mod config;
pub mod events;
pub mod layer;

pub use config::*;
pub use events::*;
pub use layer::*;
