//! Cross-fade transition

use super::{Animator, Completion, PointerEvents, Step, Timing, TransitionStrategy, Visibility, Visual};
use crate::errors::MenuError;
use crate::models::Direction;

const TOTAL: f64 = 0.4;

#[derive(Debug, Clone, Copy, Default)]
pub struct FadeAnimation;

impl<N: Clone + 'static> TransitionStrategy<N> for FadeAnimation {
    fn name(&self) -> &str {
        "fade"
    }

    fn transition(
        &self,
        animator: &dyn Animator<N>,
        from: &N,
        to: &N,
        direction: Direction,
        timing: &Timing,
        on_complete: Option<Completion>,
    ) -> Result<(), MenuError> {
        if direction == Direction::None {
            return Ok(());
        }

        animator.kill_tweens(&[from.clone(), to.clone()])?;
        let interactive = Visual::new()
            .pointer_events(PointerEvents::Auto)
            .visibility(Visibility::Visible);
        animator.set(from, &interactive.clone().opacity(1.0))?;
        animator.set(to, &interactive.opacity(0.0))?;

        animator.tween(
            Step::new(from.clone(), Visual::new().opacity(0.0), timing.tween(TOTAL, 0.0, TOTAL))
                .finally(from.clone(), Visual::hidden())
                .on_complete(on_complete),
        )?;
        animator.tween(Step::new(
            to.clone(),
            Visual::new().opacity(1.0),
            timing.tween(TOTAL, 0.0, TOTAL),
        ))
    }
}
