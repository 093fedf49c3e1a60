//! Cards transition
//!
//! Going forward, the incoming card slides over the outgoing one, which stays
//! put and shrinks slightly. Going back, the outgoing card stays on top while
//! it slides off, and the card underneath grows back to full size.

use super::{Animator, Completion, Step, Timing, TransitionStrategy, Visual, ZIndex};
use crate::errors::MenuError;
use crate::models::Direction;

const PHASE: f64 = 0.3;
const TOTAL: f64 = 0.6;
const DEPTH_SCALE: f64 = 0.95;

#[derive(Debug, Clone, Copy, Default)]
pub struct CardsAnimation;

impl<N: Clone + 'static> TransitionStrategy<N> for CardsAnimation {
    fn name(&self) -> &str {
        "cards"
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
        let width = animator.width(to);
        animator.set(from, &Visual::shown())?;
        animator.set(to, &Visual::shown())?;

        if direction == Direction::Forward {
            animator.set(to, &Visual::new().z_index(ZIndex::Value(2)).x(width).opacity(0.0).scale(1.0))?;
            animator.set(from, &Visual::new().z_index(ZIndex::Value(1)).x(0.0))?;

            animator.tween(Step::new(
                to.clone(),
                Visual::new().x(width * 0.5).opacity(1.0),
                timing.tween(PHASE, 0.0, TOTAL),
            ))?;
            animator.tween(
                Step::new(to.clone(), Visual::new().x(0.0), timing.tween(PHASE, PHASE, TOTAL))
                    .finally(to.clone(), Visual::new().x(0.0)),
            )?;
            // The card underneath keeps its reduced scale until it is shown again
            animator.tween(
                Step::new(
                    from.clone(),
                    Visual::new().scale(DEPTH_SCALE),
                    timing.tween(TOTAL, 0.0, TOTAL),
                )
                .finally(from.clone(), Visual::hidden())
                .on_complete(on_complete),
            )
        } else {
            animator.set(from, &Visual::new().z_index(ZIndex::Value(2)))?;
            animator.set(to, &Visual::new().z_index(ZIndex::Value(1)).x(0.0).opacity(1.0))?;

            animator.tween(Step::new(
                from.clone(),
                Visual::new().x(width * 0.5),
                timing.tween(PHASE, 0.0, TOTAL),
            ))?;
            animator.tween(
                Step::new(
                    from.clone(),
                    Visual::new().x(width).opacity(0.0),
                    timing.tween(PHASE, PHASE, TOTAL),
                )
                .finally(
                    from.clone(),
                    Visual::hidden().x(0.0).scale(1.0).z_index(ZIndex::Value(1)),
                )
                .finally(to.clone(), Visual::new().z_index(ZIndex::Value(2)))
                .on_complete(on_complete),
            )?;
            animator.tween(Step::new(
                to.clone(),
                Visual::new().scale(1.0),
                timing.tween(TOTAL, 0.0, TOTAL),
            ))
        }
    }
}
