//! Event windows: batch resolution of related events.
//!
//! A window receives the events produced by one or more systems and
//! resolves them as one logical unit, so reactive abilities see "this
//! batch of things happened" rather than isolated changes. The window
//! enforces:
//!
//! - explicit per-event ordering keys (stable sort, queue order breaks
//!   ties);
//! - contingent events resolving strictly before or after the primary
//!   they depend on, per their placement;
//! - the apply-time condition re-check - creation-time legality never
//!   suffices;
//! - full cancellation - a cancelled event's mutation and contingents
//!   never run.
//!
//! The batch is transactional-looking but not atomic: when a later
//! event is cancelled, earlier events in the same window have already
//! applied and stay applied.

use crate::core::GameState;
use crate::error::Result;
use crate::systems::{condition_holds, contingents_after, contingents_before};

use super::apply::{apply_mutation, ApplyOutcome};
use super::event::{Event, EventKind};
use super::reactions::{ReactionRegistry, ReactionResponse};

/// A batch of events resolved as one unit.
#[derive(Clone, Debug, Default)]
pub struct EventWindow {
    label: String,
    events: Vec<Event>,
}

/// What happened when a window resolved.
#[derive(Clone, Debug, Default)]
pub struct WindowOutcome {
    /// Events whose mutations ran, in application order.
    pub applied: Vec<Event>,

    /// Events that were cancelled or failed their condition.
    pub canceled: Vec<Event>,
}

impl WindowOutcome {
    /// Did any event in the batch get cancelled?
    #[must_use]
    pub fn any_canceled(&self) -> bool {
        !self.canceled.is_empty()
    }

    /// Did an event of this kind apply?
    #[must_use]
    pub fn applied_kind(&self, kind: EventKind) -> bool {
        self.applied.iter().any(|e| e.kind == kind)
    }
}

impl EventWindow {
    /// Create an empty window.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            events: Vec::new(),
        }
    }

    /// Create a window over a batch of events.
    pub fn with_events(label: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            label: label.into(),
            events,
        }
    }

    /// Add an event to the batch.
    pub fn add(&mut self, event: Event) {
        self.events.push(event);
    }

    /// The window's debug label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Resolve the batch against game state.
    ///
    /// Reactions see every event (including lazily created contingents)
    /// before it applies and may cancel it, replace its mutation, or
    /// append follow-ups.
    pub fn resolve(
        mut self,
        state: &mut GameState,
        reactions: &ReactionRegistry,
    ) -> Result<WindowOutcome> {
        self.events.sort_by_key(|e| e.order);

        let mut outcome = WindowOutcome::default();
        for event in std::mem::take(&mut self.events) {
            resolve_one(state, reactions, event, &mut outcome)?;
        }
        Ok(outcome)
    }
}

/// Run the reaction pass for one event. Returns appended follow-ups.
fn react(
    state: &GameState,
    reactions: &ReactionRegistry,
    event: &mut Event,
) -> Vec<Event> {
    let mut appended = Vec::new();
    for response in reactions.collect(state, event) {
        match response {
            ReactionResponse::CancelEvent => event.cancel(),
            ReactionResponse::ReplaceMutation(mutation) => event.mutation = mutation,
            ReactionResponse::AppendEvent { kind, target, mutation } => {
                appended.push(Event::new(kind, target, mutation).with_order(event.order));
            }
        }
    }
    appended
}

/// Resolve a single event: reactions, condition re-check, contingents
/// placed before, the mutation itself, then contingents placed after.
fn resolve_one(
    state: &mut GameState,
    reactions: &ReactionRegistry,
    mut event: Event,
    outcome: &mut WindowOutcome,
) -> Result<()> {
    let appended = react(state, reactions, &mut event);

    // The condition is evaluated now, not at creation time.
    if event.canceled || !condition_holds(state, &event.condition, event.target) {
        event.cancel();
        outcome.canceled.push(event);
        return Ok(());
    }

    // Confirmed: contingents are generated lazily, only now.
    for contingent in contingents_before(state, &event) {
        resolve_one(state, reactions, contingent, outcome)?;
    }

    match apply_mutation(state, &event)? {
        ApplyOutcome::Applied => {
            let after = contingents_after(state, &event);
            outcome.applied.push(event);
            for contingent in after {
                resolve_one(state, reactions, contingent, outcome)?;
            }
        }
        ApplyOutcome::Failed => {
            event.cancel();
            outcome.canceled.push(event);
            return Ok(());
        }
    }

    for follow_up in appended {
        resolve_one(state, reactions, follow_up, outcome)?;
    }
    Ok(())
}
