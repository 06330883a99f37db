//! The cooperative step pipeline.
//!
//! An ordered, mutable queue of deferred steps organized as a stack of
//! frames. The innermost frame drains completely - including
//! everything its steps transitively enqueue - before the frame below
//! it resumes; that is what makes a nested sequence a single step from
//! its parent's point of view.
//!
//! A running step may insert work at the front of its frame (runs
//! next) or append to the back (runs after the frame's remaining
//! steps). Steps never run concurrently; the driver pops one step at a
//! time and runs it to completion or suspension.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::step::Step;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Frame {
    label: String,
    steps: VecDeque<Step>,
}

/// The step queue driving all resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pipeline {
    /// Frame stack; the last frame is innermost and drains first.
    frames: Vec<Frame>,
}

impl Pipeline {
    /// Create an empty pipeline with its root frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                label: "root".to_string(),
                steps: VecDeque::new(),
            }],
        }
    }

    /// Append a step to the back of the current (innermost) frame.
    pub fn queue_step(&mut self, step: Step) {
        self.current().steps.push_back(step);
    }

    /// Insert a step at the front of the current frame; it runs next.
    pub fn insert_step(&mut self, step: Step) {
        self.current().steps.push_front(step);
    }

    /// Open a nested frame. Its steps (and anything they enqueue into
    /// it) run to completion before the current frame continues.
    pub fn open_frame(&mut self, label: impl Into<String>, steps: Vec<Step>) {
        self.frames.push(Frame {
            label: label.into(),
            steps: steps.into(),
        });
    }

    /// Pop the next step to execute, unwinding finished frames.
    pub fn next_step(&mut self) -> Option<Step> {
        while self.frames.len() > 1 && self.frames.last().is_some_and(|f| f.steps.is_empty()) {
            self.frames.pop();
        }
        self.current().steps.pop_front()
    }

    /// Is there nothing left to run?
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.frames.iter().all(|f| f.steps.is_empty())
    }

    /// Current frame-stack depth (root = 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Labels of every queued step, in execution order.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        self.frames
            .iter()
            .rev()
            .flat_map(|f| f.steps.iter().map(Step::label))
            .collect()
    }

    fn current(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("pipeline always has a root frame")
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
