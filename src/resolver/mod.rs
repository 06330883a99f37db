//! Ability resolver: the per-activation state machine.
//!
//! One resolution drives a single ability through pre-targeting, cost
//! payment, targeting, and effect execution, with cancel/pass checks
//! at the stage boundaries, on top of the step pipeline.

mod context;
mod resolution;
pub(crate) mod stages;

pub use context::{AbilityContext, CostOutcome, Stage};
pub use resolution::Resolution;
pub use stages::StepOutcome;
