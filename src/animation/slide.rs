//! Slide transition
//!
//! Both layers move together: the incoming one enters from the trailing edge
//! (right when going forward, left when going back) while the outgoing one
//! leaves across the opposite edge.

use super::{Animator, Completion, Step, Timing, TransitionStrategy, Visual, ZIndex};
use crate::errors::MenuError;
use crate::models::Direction;

const PHASE: f64 = 0.3;
const TOTAL: f64 = 0.6;

#[derive(Debug, Clone, Copy, Default)]
pub struct SlideAnimation;

impl<N: Clone + 'static> TransitionStrategy<N> for SlideAnimation {
    fn name(&self) -> &str {
        "slide"
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
        // Sign of the incoming layer's starting edge
        let edge = match direction {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
            Direction::None => return Ok(()),
        };

        animator.kill_tweens(&[from.clone(), to.clone()])?;
        let width = animator.width(to);

        animator.set(from, &Visual::shown().z_index(ZIndex::Value(1)))?;
        animator.set(to, &Visual::shown().z_index(ZIndex::Value(2)))?;
        animator.set(to, &Visual::new().x(edge * width).opacity(0.0))?;

        animator.tween(Step::new(
            to.clone(),
            Visual::new().x(edge * width * 0.5).opacity(1.0),
            timing.tween(PHASE, 0.0, TOTAL),
        ))?;
        animator.tween(
            Step::new(to.clone(), Visual::new().x(0.0), timing.tween(PHASE, PHASE, TOTAL))
                .finally(to.clone(), Visual::new().x(0.0)),
        )?;

        let out_done = Visual::hidden().z_index(ZIndex::Auto).x(0.0);
        match direction {
            Direction::Forward => animator.tween(
                Step::new(from.clone(), Visual::new().x(-width), timing.tween(TOTAL, 0.0, TOTAL))
                    .finally(from.clone(), out_done)
                    .on_complete(on_complete),
            ),
            _ => {
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
                    .finally(from.clone(), out_done)
                    .on_complete(on_complete),
                )
            }
        }
    }
}
