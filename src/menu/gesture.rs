//! Touch swipe recognition
//!
//! The tracker only classifies; deciding what a swipe navigates to is the
//! menu's job. A swipe counts when the horizontal travel exceeds
//! [`SWIPE_DISTANCE_PX`] and the average speed exceeds
//! [`SWIPE_MIN_VELOCITY`]. Listeners are never wired above
//! [`DESKTOP_BREAKPOINT_PX`].

/// Minimum horizontal travel in CSS pixels
pub const SWIPE_DISTANCE_PX: f64 = 50.0;

/// Minimum average speed in px/ms
pub const SWIPE_MIN_VELOCITY: f64 = 0.3;

/// Viewports wider than this get no swipe listeners
pub const DESKTOP_BREAKPOINT_PX: f64 = 1200.0;

/// Swipe navigation is a mobile-only affordance
pub fn gestures_allowed(viewport_width: f64) -> bool {
    viewport_width <= DESKTOP_BREAKPOINT_PX
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Rightward (positive dx): go to the parent layer
    Back,
    /// Leftward (negative dx): follow the layer's single forward trigger
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchStart {
    x: f64,
    y: f64,
    time_ms: f64,
}

#[derive(Debug, Default, Clone)]
pub struct SwipeTracker {
    start: Option<TouchStart>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f64, y: f64, time_ms: f64) {
        self.start = Some(TouchStart { x, y, time_ms });
    }

    /// Finish the gesture and classify it; always clears the start point
    pub fn touch_end(&mut self, x: f64, time_ms: f64) -> Option<Swipe> {
        let start = self.start.take()?;
        let dx = x - start.x;
        let abs_dx = dx.abs();
        // A zero-length interval is infinitely fast
        let elapsed = (time_ms - start.time_ms).max(0.0);
        let velocity = abs_dx / elapsed;

        log::debug!(
            "swipe candidate: dx={:.1}px dt={:.1}ms v={:.3}px/ms (start y={:.1})",
            dx,
            elapsed,
            velocity,
            start.y
        );

        if abs_dx > SWIPE_DISTANCE_PX && velocity > SWIPE_MIN_VELOCITY {
            if dx > 0.0 {
                Some(Swipe::Back)
            } else {
                Some(Swipe::Forward)
            }
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}
