//! Reaction registry: interrupt abilities over event windows.
//!
//! Before a window applies its batch, registered reactions get to see
//! each event and may cancel it, replace its mutation, or append a
//! follow-up event. This is how keyword abilities like Bounty hook
//! defeat events without the window knowing about card content.

use smallvec::SmallVec;

use crate::core::{CardId, GameState};

use super::event::{Event, EventKind, EventMutation, TargetRef};

/// What a reaction does to the event it matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReactionResponse {
    /// Cancel the event: its mutation and contingents never run.
    CancelEvent,

    /// Swap the event's mutation before it applies.
    ReplaceMutation(EventMutation),

    /// Append a follow-up event that resolves after the matched one.
    AppendEvent {
        kind: EventKind,
        target: TargetRef,
        mutation: EventMutation,
    },
}

/// One registered reaction.
#[derive(Clone, Debug)]
pub struct Reaction {
    /// The card whose ability registered this reaction; used for
    /// cleanup when the card leaves play.
    pub source: CardId,

    /// Event kinds this reaction watches.
    pub kinds: SmallVec<[EventKind; 2]>,

    /// Decide whether and how to respond to a matched event.
    pub respond: fn(&GameState, &Event) -> Option<ReactionResponse>,
}

impl Reaction {
    /// Create a reaction watching a single event kind.
    #[must_use]
    pub fn new(
        source: CardId,
        kind: EventKind,
        respond: fn(&GameState, &Event) -> Option<ReactionResponse>,
    ) -> Self {
        Self {
            source,
            kinds: SmallVec::from_slice(&[kind]),
            respond,
        }
    }

    /// Watch an additional event kind (builder pattern).
    #[must_use]
    pub fn also_watching(mut self, kind: EventKind) -> Self {
        self.kinds.push(kind);
        self
    }
}

/// Registry of active reactions.
#[derive(Clone, Debug, Default)]
pub struct ReactionRegistry {
    reactions: Vec<Reaction>,
}

impl ReactionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reaction.
    pub fn register(&mut self, reaction: Reaction) {
        self.reactions.push(reaction);
    }

    /// Drop every reaction registered by a source card.
    pub fn remove_for_source(&mut self, source: CardId) {
        self.reactions.retain(|r| r.source != source);
    }

    /// Number of registered reactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Collect responses from every reaction matching an event.
    pub fn collect(&self, state: &GameState, event: &Event) -> Vec<ReactionResponse> {
        self.reactions
            .iter()
            .filter(|r| r.kinds.contains(&event.kind))
            .filter_map(|r| (r.respond)(state, event))
            .collect()
    }
}
