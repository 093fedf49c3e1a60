//! Lifecycle events and their payload

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::layer::{Direction, LayerKey};
use crate::errors::MenuError;

/// Closed set of events a menu emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuEvent {
    #[serde(rename = "onInit")]
    Init,
    #[serde(rename = "onReinit")]
    Reinit,
    #[serde(rename = "onDestroy")]
    Destroy,
    #[serde(rename = "onBeforeLayerChange")]
    BeforeLayerChange,
    #[serde(rename = "onLayerChange")]
    LayerChange,
    #[serde(rename = "onAfterLayerChange")]
    AfterLayerChange,
}

impl MenuEvent {
    pub const ALL: [MenuEvent; 6] = [
        MenuEvent::Init,
        MenuEvent::Reinit,
        MenuEvent::Destroy,
        MenuEvent::BeforeLayerChange,
        MenuEvent::LayerChange,
        MenuEvent::AfterLayerChange,
    ];

    /// Name as used in configuration objects and JS subscriptions
    pub fn name(&self) -> &'static str {
        match self {
            MenuEvent::Init => "onInit",
            MenuEvent::Reinit => "onReinit",
            MenuEvent::Destroy => "onDestroy",
            MenuEvent::BeforeLayerChange => "onBeforeLayerChange",
            MenuEvent::LayerChange => "onLayerChange",
            MenuEvent::AfterLayerChange => "onAfterLayerChange",
        }
    }
}

impl fmt::Display for MenuEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MenuEvent {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MenuEvent::ALL
            .iter()
            .copied()
            .find(|event| event.name() == s)
            .ok_or_else(|| MenuError::UnknownEvent(s.to_string()))
    }
}

/// Payload carried by every event
///
/// Indices are discovery-order positions; `None` when the key is absent
/// (it is exposed to JS as `-1`).
#[derive(Debug, Clone, PartialEq)]
pub struct LayerChangePayload<N> {
    pub current_layer: Option<N>,
    pub prev_layer: Option<N>,
    pub current_layer_key: Option<LayerKey>,
    pub prev_layer_key: Option<LayerKey>,
    pub direction: Direction,
    pub current_layer_index: Option<usize>,
    pub prev_layer_index: Option<usize>,
}
