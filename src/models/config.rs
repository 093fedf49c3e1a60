//! Menu configuration
//!
//! Configuration comes in two halves. [`MenuSettings`] is plain data and is
//! deserialized straight from the host page's config object. Handlers
//! (global events, per-layer events, the error hook) cannot travel through
//! serde, so [`MenuConfig`] carries them next to the settings.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::events::MenuEvent;
use super::layer::LayerKey;
use crate::errors::ErrorHandler;
use crate::menu::emitter::EventHandler;

/// Animation type used when none is configured
pub const DEFAULT_ANIMATION: &str = "slide";

/// Global animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationSettings {
    /// `slide`, `cards`, `fade` or the name of a registered custom strategy
    #[serde(rename = "type")]
    pub kind: String,
    /// Total transition length in seconds (strategy default when absent)
    pub duration: Option<f64>,
    /// Easing name handed to the tween engine, e.g. `power2.out`
    pub easing: Option<String>,
    /// Delay before the tweens start, in seconds
    pub delay: Option<f64>,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            kind: DEFAULT_ANIMATION.to_string(),
            duration: None,
            easing: None,
            delay: None,
        }
    }
}

/// Per-layer overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerSettings {
    pub swipe_enabled: Option<bool>,
    /// Arbitrary host data, never interpreted by the menu
    pub meta: serde_json::Map<String, serde_json::Value>,
    /// `false` restricts the layer to back-navigation only
    pub allow_direct_access: Option<bool>,
    pub class_name: Option<String>,
    /// Inline style properties (JS property names, e.g. `backgroundColor`)
    pub style: BTreeMap<String, String>,
    /// Accepted for compatibility; transitions always use the global animation
    pub animation: Option<AnimationSettings>,
}

/// Serializable part of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuSettings {
    pub animation: AnimationSettings,
    pub swipe_enabled: bool,
    pub layers: HashMap<LayerKey, LayerSettings>,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            animation: AnimationSettings::default(),
            swipe_enabled: true,
            layers: HashMap::new(),
        }
    }
}

impl MenuSettings {
    pub fn layer(&self, key: &str) -> Option<&LayerSettings> {
        self.layers.get(key)
    }

    /// Layer override first, then the global default
    pub fn swipe_enabled_for(&self, key: &str) -> bool {
        self.layer(key)
            .and_then(|layer| layer.swipe_enabled)
            .unwrap_or(self.swipe_enabled)
    }

    pub fn allows_direct_access(&self, key: &str) -> bool {
        self.layer(key)
            .and_then(|layer| layer.allow_direct_access)
            .unwrap_or(true)
    }

    /// Animation type for a transition into `key`
    ///
    /// Per-layer `animation` entries are not consulted.
    pub fn animation_kind_for(&self, _key: &str) -> &str {
        &self.animation.kind
    }
}

/// Full configuration passed to a menu at construction
pub struct MenuConfig<N> {
    pub settings: MenuSettings,
    pub events: Vec<(MenuEvent, EventHandler<N>)>,
    pub layer_events: Vec<(LayerKey, MenuEvent, EventHandler<N>)>,
    pub on_error: Option<ErrorHandler>,
}

impl<N> Default for MenuConfig<N> {
    fn default() -> Self {
        Self::new(MenuSettings::default())
    }
}

impl<N> MenuConfig<N> {
    pub fn new(settings: MenuSettings) -> Self {
        Self {
            settings,
            events: Vec::new(),
            layer_events: Vec::new(),
            on_error: None,
        }
    }

    /// Add a global listener applied at construction
    pub fn with_event(mut self, event: MenuEvent, handler: EventHandler<N>) -> Self {
        self.events.push((event, handler));
        self
    }

    /// Add a listener that only fires while `key` is the incoming layer
    pub fn with_layer_event(
        mut self,
        key: impl Into<LayerKey>,
        event: MenuEvent,
        handler: EventHandler<N>,
    ) -> Self {
        self.layer_events.push((key.into(), event, handler));
        self
    }

    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }
}

impl<N> std::fmt::Debug for MenuConfig<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuConfig")
            .field("settings", &self.settings)
            .field("events", &self.events.len())
            .field("layer_events", &self.layer_events.len())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
