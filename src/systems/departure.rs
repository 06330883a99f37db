//! Leaves-play contract: contingent events around a primary event.
//!
//! When an event takes a card out of an arena, its attached upgrades
//! do not linger: the window synthesizes contingent defeat events for
//! them, placed strictly before the primary. When damage becomes
//! lethal, the defeat is a contingent placed after the damage applies.
//!
//! Contingents are generated lazily - only once the primary event has
//! been confirmed to resolve - so a cancelled primary never spawns
//! them.

use smallvec::SmallVec;

use crate::core::{CardId, GameState};
use crate::events::{
    Event, EventCondition, EventKind, EventMutation, EventPlacement, LegalitySnapshot, TargetRef,
};
use crate::filters::{CardTypeFilter, ZoneFilter};

use super::system::SystemTag;

/// Legality snapshot for an engine-synthesized defeat.
fn defeat_snapshot() -> LegalitySnapshot {
    LegalitySnapshot {
        tag: SystemTag::Defeat,
        types: CardTypeFilter::any_of([
            crate::cards::CardType::Unit,
            crate::cards::CardType::Upgrade,
            crate::cards::CardType::Leader,
        ]),
        zones: ZoneFilter::AnyArena,
        cannot_be_canceled: false,
        chain: SmallVec::new(),
        mid_effect: true,
    }
}

/// A contingent defeat event for an attached upgrade.
fn upgrade_defeat(upgrade: CardId, order: i32) -> Event {
    Event::new(
        EventKind::CardDefeated,
        TargetRef::Card(upgrade),
        EventMutation::Defeat { card: upgrade },
    )
    .with_order(order)
    .with_placement(EventPlacement::BeforePrimary)
    .with_condition(EventCondition::StillAffectable(defeat_snapshot()))
}

/// Does this event take the card out of an arena?
fn leaves_play(state: &GameState, event: &Event) -> Option<CardId> {
    let card = match event.mutation {
        EventMutation::Defeat { card } => card,
        EventMutation::Move { card, to } if !to.is_arena() => card,
        _ => return None,
    };
    state.card(card)?.in_play().then_some(card)
}

/// Contingent events that resolve strictly before the primary.
///
/// Currently: attached upgrades are sent to their owners' discard
/// when their host leaves play.
#[must_use]
pub fn contingents_before(state: &GameState, event: &Event) -> Vec<Event> {
    let Some(card) = leaves_play(state, event) else {
        return Vec::new();
    };
    let Some(instance) = state.card(card) else {
        return Vec::new();
    };

    instance
        .upgrades
        .iter()
        .map(|&upgrade| upgrade_defeat(upgrade, event.order))
        .collect()
}

/// Contingent events that resolve strictly after the primary.
///
/// Currently: a unit whose marked damage reaches its hp is defeated.
#[must_use]
pub fn contingents_after(state: &GameState, event: &Event) -> Vec<Event> {
    let EventMutation::DealDamage { card, .. } = event.mutation else {
        return Vec::new();
    };
    let Some(instance) = state.card(card) else {
        return Vec::new();
    };
    if !instance.in_play() {
        return Vec::new();
    }
    let Some(def) = state.definitions.get(instance.definition) else {
        return Vec::new();
    };

    if def.card_type == crate::cards::CardType::Unit && instance.damage >= def.hp {
        vec![Event::new(
            EventKind::CardDefeated,
            TargetRef::Card(card),
            EventMutation::Defeat { card },
        )
        .with_order(event.order)
        .with_placement(EventPlacement::AfterPrimary)
        .with_condition(EventCondition::StillAffectable(defeat_snapshot()))]
    } else {
        Vec::new()
    }
}
