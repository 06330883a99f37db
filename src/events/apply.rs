//! Event mutation application.
//!
//! The single place where event mutations touch game state, dispatched
//! by an exhaustive match. Moves that target a zone no longer legal
//! for the card's type are redirected to the owner's deck with a log
//! message instead of failing.

use crate::core::GameState;
use crate::error::Result;
use crate::zones::{legal_destination, ZoneKind, ZonePosition};

use super::event::{Event, EventMutation};

/// Did the mutation actually change state?
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The mutation applied (possibly redirected).
    Applied,
    /// The mutation could not apply (e.g. resources ran out between
    /// queuing and resolution). The event is treated as cancelled.
    Failed,
}

/// Apply one event's mutation to the game state.
///
/// Returns `Err` only for invariant violations (a card id that no
/// longer exists anywhere). Rule-level impossibility is `Failed`.
pub fn apply_mutation(state: &mut GameState, event: &Event) -> Result<ApplyOutcome> {
    match &event.mutation {
        EventMutation::Marker { .. } => Ok(ApplyOutcome::Applied),

        EventMutation::DealDamage { card, amount } => {
            state.card_result_mut(*card)?.damage += amount;
            Ok(ApplyOutcome::Applied)
        }

        EventMutation::Heal { card, amount } => {
            let instance = state.card_result_mut(*card)?;
            instance.damage = (instance.damage - amount).max(0);
            Ok(ApplyOutcome::Applied)
        }

        EventMutation::Defeat { card } => {
            state.move_card(*card, ZoneKind::Discard, ZonePosition::Top)?;
            Ok(ApplyOutcome::Applied)
        }

        EventMutation::Move { card, to } => {
            let def = state.definition_of(*card)?;
            let (card_type, title) = (def.card_type, def.title.clone());

            if legal_destination(card_type, *to) {
                state.move_card(*card, *to, ZonePosition::Top)?;
            } else {
                // The destination stopped being legal between queuing
                // and resolution; the card goes to the bottom of its
                // owner's deck instead.
                state.move_card(*card, ZoneKind::Deck, ZonePosition::Bottom)?;
                state
                    .messages
                    .announce(format!("{title} could not be moved to the {to}; it was returned to its owner's deck"));
            }
            Ok(ApplyOutcome::Applied)
        }

        EventMutation::Exhaust { card } => {
            state.card_result_mut(*card)?.exhausted = true;
            Ok(ApplyOutcome::Applied)
        }

        EventMutation::Ready { card } => {
            state.card_result_mut(*card)?.exhausted = false;
            Ok(ApplyOutcome::Applied)
        }

        EventMutation::Draw { player, count } => {
            state.draw_cards(*player, *count);
            Ok(ApplyOutcome::Applied)
        }

        EventMutation::PayResources { player, amount } => {
            if state.pay_resources(*player, *amount) {
                Ok(ApplyOutcome::Applied)
            } else {
                Ok(ApplyOutcome::Failed)
            }
        }
    }
}
