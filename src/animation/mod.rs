//! Layer transition animations
//!
//! The tween engine itself is external: an [`Animator`] can set properties
//! immediately, tween them over time and kill in-flight tweens. Strategies
//! ([`SlideAnimation`], [`CardsAnimation`], [`FadeAnimation`]) are stateless
//! and describe a transition in terms of those three primitives.
//!
//! Every strategy kills running tweens on both nodes before starting, and
//! once its completion callback fires the outgoing node is hidden and
//! non-interactive while the incoming node is visible and interactive.
//! Click and swipe handling rely on that.

pub mod cards;
pub mod fade;
pub mod slide;

#[cfg(test)]
pub(crate) mod recording;

pub use cards::CardsAnimation;
pub use fade::FadeAnimation;
pub use slide::SlideAnimation;

use crate::errors::MenuError;
use crate::models::{AnimationSettings, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvents {
    Auto,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZIndex {
    /// Inline z-index removed
    Auto,
    Value(i32),
}

/// Animatable property bag; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visual {
    /// Horizontal translation in pixels
    pub x: Option<f64>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
    pub pointer_events: Option<PointerEvents>,
    pub visibility: Option<Visibility>,
    pub z_index: Option<ZIndex>,
}

impl Visual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active layer: opaque, visible, interactive
    pub fn shown() -> Self {
        Self::new()
            .opacity(1.0)
            .pointer_events(PointerEvents::Auto)
            .visibility(Visibility::Visible)
    }

    /// Inactive layer: transparent, hidden, inert
    pub fn hidden() -> Self {
        Self::new()
            .opacity(0.0)
            .pointer_events(PointerEvents::None)
            .visibility(Visibility::Hidden)
    }

    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn pointer_events(mut self, pointer_events: PointerEvents) -> Self {
        self.pointer_events = Some(pointer_events);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn z_index(mut self, z_index: ZIndex) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Overlay `other` onto `self` (fields set in `other` win)
    pub fn merge(&mut self, other: &Visual) {
        self.x = other.x.or(self.x);
        self.scale = other.scale.or(self.scale);
        self.opacity = other.opacity.or(self.opacity);
        self.pointer_events = other.pointer_events.or(self.pointer_events);
        self.visibility = other.visibility.or(self.visibility);
        self.z_index = other.z_index.or(self.z_index);
    }
}

/// Timing of a single tween, seconds
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub duration: f64,
    pub delay: f64,
    pub easing: Option<String>,
}

pub type Completion = Box<dyn FnOnce()>;

/// One tween request
pub struct Step<N> {
    pub node: N,
    pub to: Visual,
    pub timing: Tween,
    /// Properties set immediately when the tween completes
    pub finally: Vec<(N, Visual)>,
    pub on_complete: Option<Completion>,
}

impl<N> Step<N> {
    pub fn new(node: N, to: Visual, timing: Tween) -> Self {
        Self {
            node,
            to,
            timing,
            finally: Vec::new(),
            on_complete: None,
        }
    }

    pub fn finally(mut self, node: N, visual: Visual) -> Self {
        self.finally.push((node, visual));
        self
    }

    pub fn on_complete(mut self, on_complete: Option<Completion>) -> Self {
        self.on_complete = on_complete;
        self
    }
}

impl<N: std::fmt::Debug> std::fmt::Debug for Step<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("node", &self.node)
            .field("to", &self.to)
            .field("timing", &self.timing)
            .field("finally", &self.finally)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// The tween engine capability
pub trait Animator<N> {
    /// Stop every running tween on `nodes`; their completions never fire
    fn kill_tweens(&self, nodes: &[N]) -> Result<(), MenuError>;

    fn set(&self, node: &N, visual: &Visual) -> Result<(), MenuError>;

    fn tween(&self, step: Step<N>) -> Result<(), MenuError>;

    /// Rendered width of `node` in pixels
    fn width(&self, node: &N) -> f64;
}

/// Timing derived from the global animation settings
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub duration: Option<f64>,
    pub delay: f64,
    pub easing: Option<String>,
}

impl Timing {
    pub fn from_settings(settings: &AnimationSettings) -> Self {
        Self {
            duration: settings.duration.filter(|d| d.is_finite() && *d >= 0.0),
            delay: settings.delay.unwrap_or(0.0).max(0.0),
            easing: settings.easing.clone(),
        }
    }

    /// Tween `nominal` seconds long in a strategy whose default length is
    /// `total`, starting `offset` nominal seconds into the transition.
    ///
    /// A configured duration rescales both `nominal` and `offset`.
    pub fn tween(&self, nominal: f64, offset: f64, total: f64) -> Tween {
        let factor = match self.duration {
            Some(duration) if total > 0.0 => duration / total,
            _ => 1.0,
        };
        Tween {
            duration: nominal * factor,
            delay: self.delay + offset * factor,
            easing: self.easing.clone(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_settings(&AnimationSettings::default())
    }
}

/// A named, direction-aware transition between two layers
pub trait TransitionStrategy<N> {
    fn name(&self) -> &str;

    /// Animate from `from` to `to`. `Direction::None` is never passed by the
    /// menu; strategies treat it as a no-op.
    fn transition(
        &self,
        animator: &dyn Animator<N>,
        from: &N,
        to: &N,
        direction: Direction,
        timing: &Timing,
        on_complete: Option<Completion>,
    ) -> Result<(), MenuError>;
}

/// Look up one of the built-in strategies by name
pub fn builtin<N: Clone + 'static>(name: &str) -> Option<Box<dyn TransitionStrategy<N>>> {
    match name {
        "slide" => Some(Box::new(SlideAnimation)),
        "cards" => Some(Box::new(CardsAnimation)),
        "fade" => Some(Box::new(FadeAnimation)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_defaults_to_nominal() {
        let timing = Timing::default();
        let tween = timing.tween(0.3, 0.3, 0.6);
        assert_eq!(tween.duration, 0.3);
        assert_eq!(tween.delay, 0.3);
        assert_eq!(tween.easing, None);
    }

    #[test]
    fn test_configured_duration_rescales() {
        let timing = Timing::from_settings(&AnimationSettings {
            kind: "slide".to_string(),
            duration: Some(1.2),
            easing: Some("power2.out".to_string()),
            delay: Some(0.1),
        });
        let tween = timing.tween(0.3, 0.3, 0.6);
        assert!((tween.duration - 0.6).abs() < 1e-9);
        assert!((tween.delay - 0.7).abs() < 1e-9);
        assert_eq!(tween.easing.as_deref(), Some("power2.out"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut visual = Visual::shown().x(10.0);
        visual.merge(&Visual::new().x(0.0).z_index(ZIndex::Value(2)));
        assert_eq!(visual.x, Some(0.0));
        assert_eq!(visual.opacity, Some(1.0));
        assert_eq!(visual.z_index, Some(ZIndex::Value(2)));
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin::<u8>("slide").unwrap().name(), "slide");
        assert_eq!(builtin::<u8>("cards").unwrap().name(), "cards");
        assert_eq!(builtin::<u8>("fade").unwrap().name(), "fade");
        assert!(builtin::<u8>("flip").is_none());
    }
}
