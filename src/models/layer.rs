//! Layer identity and navigation primitives
//!
//! A layer is one navigable panel inside a menu root. Layers are discovered
//! by scanning the root subtree for the [`LAYER_ATTR`] marker; the order in
//! which markers are met (document order) is the *discovery order* used for
//! direction and offset resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker attribute carrying a layer's key
pub const LAYER_ATTR: &str = "data-menu-layer";

/// Optional attribute naming the parent layer's key
pub const PARENT_ATTR: &str = "data-menu-parent";

/// Trigger attribute: navigate forward to the named layer
pub const NEXT_TRIGGER_ATTR: &str = "data-menu-next";

/// Trigger attribute: navigate back to the named layer
pub const PREV_TRIGGER_ATTR: &str = "data-menu-prev";

/// Unique key of a layer within one menu instance
pub type LayerKey = String;

/// Direction of a transition, derived from discovery-order positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    None,
}

impl Direction {
    /// Compare the discovery indices of the outgoing and incoming layers.
    ///
    /// Either side missing (no previous layer, or no target) yields `None`.
    pub fn between(prev: Option<usize>, next: Option<usize>) -> Self {
        match (prev, next) {
            (Some(p), Some(n)) if n > p => Direction::Forward,
            (Some(p), Some(n)) if n < p => Direction::Backward,
            _ => Direction::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::None => "none",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation target accepted by `set_layer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerTarget {
    /// Absolute layer key
    Key(LayerKey),
    /// Signed offset from the current layer's discovery index (clamped)
    Offset(i64),
}

impl LayerTarget {
    /// Resolve the target against the discovery-ordered key list.
    ///
    /// Offsets clamp to `[0, len - 1]` and never wrap. With no current layer
    /// the offset is taken from index 0. Returns `None` only when there is
    /// nothing to resolve to (empty registry); key targets are returned as-is
    /// and checked for existence by the caller.
    pub fn resolve(&self, keys: &[LayerKey], current: Option<&str>) -> Option<LayerKey> {
        match self {
            LayerTarget::Key(key) => Some(key.clone()),
            LayerTarget::Offset(offset) => {
                if keys.is_empty() {
                    return None;
                }
                let idx = current
                    .and_then(|c| keys.iter().position(|k| k == c))
                    .unwrap_or(0) as i64;
                let last = keys.len() as i64 - 1;
                let next = idx.saturating_add(*offset).clamp(0, last);
                keys.get(next as usize).cloned()
            }
        }
    }
}

impl From<&str> for LayerTarget {
    fn from(key: &str) -> Self {
        LayerTarget::Key(key.to_string())
    }
}

impl From<String> for LayerTarget {
    fn from(key: String) -> Self {
        LayerTarget::Key(key)
    }
}

impl From<i64> for LayerTarget {
    fn from(offset: i64) -> Self {
        LayerTarget::Offset(offset)
    }
}

impl From<i32> for LayerTarget {
    fn from(offset: i32) -> Self {
        LayerTarget::Offset(offset as i64)
    }
}

/// Declarative navigation trigger found by click delegation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// [`NEXT_TRIGGER_ATTR`]: forward navigation
    Next(LayerKey),
    /// [`PREV_TRIGGER_ATTR`]: link towards a previous layer, navigated like `Next`
    Prev(LayerKey),
}

impl Trigger {
    pub fn key(&self) -> &str {
        match self {
            Trigger::Next(key) | Trigger::Prev(key) => key,
        }
    }
}

/// Raw record produced by the host for each marker found under the root
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMarker<N> {
    pub node: N,
    /// Value of [`LAYER_ATTR`]; `None` or empty is malformed markup
    pub key: Option<String>,
    /// Value of [`PARENT_ATTR`]; empty means no parent
    pub parent: Option<String>,
}

/// A registered layer
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<N> {
    pub key: LayerKey,
    pub parent_key: Option<LayerKey>,
    pub node: N,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<LayerKey> {
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between(Some(0), Some(2)), Direction::Forward);
        assert_eq!(Direction::between(Some(2), Some(0)), Direction::Backward);
        assert_eq!(Direction::between(None, Some(1)), Direction::None);
        assert_eq!(Direction::between(Some(1), None), Direction::None);
    }

    #[test]
    fn test_offset_clamps_at_both_ends() {
        let keys = keys();
        assert_eq!(LayerTarget::Offset(1).resolve(&keys, Some("c")), Some("c".to_string()));
        assert_eq!(LayerTarget::Offset(-5).resolve(&keys, Some("b")), Some("a".to_string()));
        assert_eq!(LayerTarget::Offset(1).resolve(&keys, Some("a")), Some("b".to_string()));
    }

    #[test]
    fn test_offset_without_current_starts_at_zero() {
        let keys = keys();
        assert_eq!(LayerTarget::Offset(2).resolve(&keys, None), Some("c".to_string()));
    }

    #[test]
    fn test_offset_on_empty_registry() {
        assert_eq!(LayerTarget::Offset(1).resolve(&[], None), None);
    }

    #[test]
    fn test_key_target_passes_through() {
        // Existence is checked by the menu, not here
        assert_eq!(
            LayerTarget::from("missing").resolve(&keys(), Some("a")),
            Some("missing".to_string())
        );
    }
}
