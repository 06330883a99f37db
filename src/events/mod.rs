//! Event system: atomic state changes, batch windows, reactions.
//!
//! Systems produce [`Event`]s; [`EventWindow`]s batch, order, and
//! apply them with apply-time re-validation; the [`ReactionRegistry`]
//! is the interrupt point where other abilities may cancel or alter
//! events before they land.

mod apply;
mod event;
mod reactions;
mod window;

pub use apply::{apply_mutation, ApplyOutcome};
pub use event::{
    Event, EventCondition, EventKind, EventMutation, EventPlacement, LegalitySnapshot, TargetRef,
};
pub use reactions::{Reaction, ReactionRegistry, ReactionResponse};
pub use window::{EventWindow, WindowOutcome};
