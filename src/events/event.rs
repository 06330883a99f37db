//! Events: atomic, re-validated state changes.
//!
//! A game system does not mutate state directly; it produces events.
//! Each event carries a plain-data description of its mutation, an
//! ordering key, a placement relative to the event it is contingent
//! on, and a condition that is re-evaluated immediately before the
//! mutation applies. State may have changed between queuing and
//! resolution - a stale event must no-op, not corrupt state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, PlayerId, ResolutionId};
use crate::filters::{CardTypeFilter, ZoneFilter};
use crate::systems::SystemTag;
use crate::zones::ZoneKind;

/// What an event is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // Ability lifecycle. The four initiation kinds are distinct so
    // reactive abilities can key on how the ability entered play.
    AbilityInitiated,
    CardAbilityInitiated,
    CardPlayed,
    ActivatedAbilityTriggered,
    /// Fired in the "then" window right before effects run.
    EffectsInitiated,

    // State changes.
    DamageDealt,
    Healed,
    CardDefeated,
    CardMoved,
    CardExhausted,
    CardReadied,
    CardsDrawn,
    ResourcesPaid,
}

/// What an event acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    Card(CardId),
    Player(PlayerId),
    None,
}

impl TargetRef {
    /// The card id, if this targets a card.
    #[must_use]
    pub fn card(self) -> Option<CardId> {
        match self {
            TargetRef::Card(c) => Some(c),
            _ => None,
        }
    }

    /// The player id, if this targets a player.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            TargetRef::Player(p) => Some(p),
            _ => None,
        }
    }
}

/// Where an event resolves relative to the event it depends on.
///
/// Contingent events never use arithmetic on the ordering key; their
/// position is this explicit placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPlacement {
    /// An independent event, ordered by its key.
    Standard,
    /// Resolves strictly before the event it is contingent on.
    BeforePrimary,
    /// Resolves strictly after the event it is contingent on.
    AfterPrimary,
}

/// Frozen legality data for apply-time re-validation.
///
/// A snapshot of everything the generating system's `can_affect` check
/// needs, so the check can be repeated when the event actually
/// resolves without holding a reference to the system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalitySnapshot {
    /// The system that produced the event.
    pub tag: SystemTag,

    /// Card types the system may affect.
    pub types: CardTypeFilter,

    /// Zones the target must occupy.
    pub zones: ZoneFilter,

    /// Non-cancellable systems override restrictions mid-effect.
    pub cannot_be_canceled: bool,

    /// Systems already entered in the producing resolution chain.
    pub chain: SmallVec<[SystemTag; 4]>,

    /// Was the resolution in its effect stage when the event was made?
    pub mid_effect: bool,
}

/// Apply-time condition for an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCondition {
    /// Always applies (markers, draws).
    Always,
    /// Applies only if the generating system could still affect the
    /// target, checked against the snapshot at apply time.
    StillAffectable(LegalitySnapshot),
}

/// Plain-data description of one state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventMutation {
    /// No state change; marks a lifecycle moment for reactions and
    /// resolver bookkeeping.
    Marker { resolution: ResolutionId },

    DealDamage { card: CardId, amount: i32 },
    Heal { card: CardId, amount: i32 },
    Defeat { card: CardId },
    Move { card: CardId, to: ZoneKind },
    Exhaust { card: CardId },
    Ready { card: CardId },
    Draw { player: PlayerId, count: u32 },
    PayResources { player: PlayerId, amount: i32 },
}

/// One atomic, re-validated state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// What kind of event this is.
    pub kind: EventKind,

    /// What the event acts on.
    pub target: TargetRef,

    /// Ordering key within a window. Lower resolves first; ties keep
    /// queue order.
    pub order: i32,

    /// Placement relative to a primary event, for contingents.
    pub placement: EventPlacement,

    /// Cancelled events never apply and never spawn contingents.
    pub canceled: bool,

    /// Re-checked immediately before the mutation applies.
    pub condition: EventCondition,

    /// The state change itself.
    pub mutation: EventMutation,
}

impl Event {
    /// Create a standard event with order 0 and no condition.
    #[must_use]
    pub fn new(kind: EventKind, target: TargetRef, mutation: EventMutation) -> Self {
        Self {
            kind,
            target,
            order: 0,
            placement: EventPlacement::Standard,
            canceled: false,
            condition: EventCondition::Always,
            mutation,
        }
    }

    /// Set the ordering key (builder pattern).
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Set the placement (builder pattern).
    #[must_use]
    pub fn with_placement(mut self, placement: EventPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the apply-time condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: EventCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Cancel this event.
    pub fn cancel(&mut self) {
        self.canceled = true;
    }
}
