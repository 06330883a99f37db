//! Game systems: the abstraction every state mutation flows through.
//!
//! A system declares what it does, which targets are legal for it,
//! and produces re-validated events; the `departure` rules synthesize
//! contingent events when cards leave play.

mod departure;
mod system;

pub use departure::{contingents_after, contingents_before};
pub use system::{
    all_targets_legal, can_affect, condition_holds, generate_events_for_all_targets,
    has_legal_target, resolve_shape_targets, source_target, GameSystem, GeneratedEvents,
    SystemEffect, SystemTag, TargetShape, UnlessCost, UnlessPrompt, WhichPlayer,
};
