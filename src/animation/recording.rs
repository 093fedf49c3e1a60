//! In-memory animator for strategy tests
//!
//! `set` applies immediately; tweens queue until [`RecordingAnimator::flush`]
//! runs them to completion in request order.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Animator, Step, Visual};
use crate::errors::MenuError;

pub(crate) struct RecordingAnimator {
    pub visuals: RefCell<HashMap<u8, Visual>>,
    pub pending: RefCell<Vec<Step<u8>>>,
    pub killed: RefCell<Vec<u8>>,
    pub width: f64,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self {
            visuals: RefCell::new(HashMap::new()),
            pending: RefCell::new(Vec::new()),
            killed: RefCell::new(Vec::new()),
            width: 320.0,
        }
    }

    pub fn visual(&self, node: u8) -> Visual {
        self.visuals.borrow().get(&node).cloned().unwrap_or_default()
    }

    pub fn flush(&self) {
        let steps: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for step in steps {
            self.apply(step.node, &step.to);
            for (node, visual) in &step.finally {
                self.apply(*node, visual);
            }
            if let Some(done) = step.on_complete {
                done();
            }
        }
    }

    fn apply(&self, node: u8, visual: &Visual) {
        self.visuals.borrow_mut().entry(node).or_default().merge(visual);
    }
}

impl Animator<u8> for RecordingAnimator {
    fn kill_tweens(&self, nodes: &[u8]) -> Result<(), MenuError> {
        self.killed.borrow_mut().extend_from_slice(nodes);
        self.pending.borrow_mut().retain(|step| !nodes.contains(&step.node));
        Ok(())
    }

    fn set(&self, node: &u8, visual: &Visual) -> Result<(), MenuError> {
        self.apply(*node, visual);
        Ok(())
    }

    fn tween(&self, step: Step<u8>) -> Result<(), MenuError> {
        self.pending.borrow_mut().push(step);
        Ok(())
    }

    fn width(&self, _node: &u8) -> f64 {
        self.width
    }
}
