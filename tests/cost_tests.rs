//! Cost adjustment integration and property tests.

use proptest::prelude::*;

use duelcore::cards::{Aspect, CardDefinition, CardType};
use duelcore::core::{CardId, DefinitionId, GameState, PlayerId};
use duelcore::costs::{
    adjusted_cost, mark_used_adjusters, AdjusterScope, CostAdjuster, PlayDetails, PlayType,
};
use duelcore::zones::ZoneKind;

const P0: PlayerId = PlayerId(0);

fn state_with_card(cost: i32, aspects: &[Aspect], pool: &[Aspect]) -> (GameState, PlayDetails) {
    let mut state = GameState::new(0);
    let mut def = CardDefinition::new(DefinitionId::new(0), "Subject", CardType::Unit).with_cost(cost);
    for &a in aspects {
        def = def.with_aspect(a);
    }
    let def = state.definitions.register(def);
    let card = state.spawn(def, P0, ZoneKind::Hand).unwrap();
    state.player_mut(P0).aspects.extend_from_slice(pool);

    let play = PlayDetails {
        player: P0,
        card,
        play_type: PlayType::PlayFromHand,
        target: None,
    };
    (state, play)
}

/// The worked scenario: a 2-cost card with one aspect penalty and a
/// single -1 adjuster with floor 0 costs max(0, (2+2) - 1) = 3.
#[test]
fn test_two_cost_one_penalty_minus_one() {
    let (mut state, play) = state_with_card(2, &[Aspect::Command], &[]);
    state.player_mut(P0).add_adjuster(
        CostAdjuster::new(CardId::new(50), AdjusterScope::any(), -1).with_floor(0),
    );

    assert_eq!(adjusted_cost(&state, &play).unwrap(), 3);
}

/// Repeated computation without state change is idempotent even with
/// limited-use adjusters registered (computation never consumes uses).
#[test]
fn test_compute_does_not_consume_uses() {
    let (mut state, play) = state_with_card(4, &[], &[]);
    state.player_mut(P0).add_adjuster(
        CostAdjuster::new(CardId::new(50), AdjusterScope::any(), -2)
            .with_floor(0)
            .with_uses(1),
    );

    assert_eq!(adjusted_cost(&state, &play).unwrap(), 2);
    assert_eq!(adjusted_cost(&state, &play).unwrap(), 2);
    assert_eq!(state.player(P0).adjusters.len(), 1);

    // Paying the play consumes the single use.
    mark_used_adjusters(&mut state, &play).unwrap();
    assert!(state.player(P0).adjusters.is_empty());
    assert_eq!(adjusted_cost(&state, &play).unwrap(), 4);
}

proptest! {
    /// For any base cost, decrease, and floor, the adjusted cost never
    /// drops below min(pre-decrease cost, floor), and never below zero.
    #[test]
    fn prop_floor_clamps_decreases(base in 0i32..12, decrease in 1i32..10, floor in 0i32..8) {
        let (mut state, play) = state_with_card(base, &[], &[]);
        state.player_mut(P0).add_adjuster(
            CostAdjuster::new(CardId::new(50), AdjusterScope::any(), -decrease).with_floor(floor),
        );

        let adjusted = adjusted_cost(&state, &play).unwrap();
        prop_assert!(adjusted >= base.min(floor));
        prop_assert!(adjusted >= 0);
        prop_assert!(adjusted <= base);
    }

    /// Cost computation is idempotent for a fixed adjuster set.
    #[test]
    fn prop_idempotent(base in 0i32..12, amount in -6i32..6) {
        let (mut state, play) = state_with_card(base, &[Aspect::Fury], &[]);
        state.player_mut(P0).add_adjuster(
            CostAdjuster::new(CardId::new(50), AdjusterScope::any(), amount).with_floor(0),
        );

        prop_assert_eq!(
            adjusted_cost(&state, &play).unwrap(),
            adjusted_cost(&state, &play).unwrap()
        );
    }

    /// Increases always apply in full; only decreases are clamped.
    #[test]
    fn prop_increase_applies_in_full(base in 0i32..10, increase in 0i32..10) {
        let (mut state, play) = state_with_card(base, &[], &[]);
        state.player_mut(P0).add_adjuster(
            CostAdjuster::new(CardId::new(50), AdjusterScope::any(), increase),
        );

        prop_assert_eq!(adjusted_cost(&state, &play).unwrap(), base + increase);
    }
}

/// Aspect penalties price per unmatched icon and honor multiset
/// matching against the player's leader-and-base pool.
#[test]
fn test_duplicate_aspect_icons_each_need_a_match() {
    let (state, play) = state_with_card(1, &[Aspect::Fury, Aspect::Fury], &[Aspect::Fury]);
    // One icon covered, one penalized.
    assert_eq!(adjusted_cost(&state, &play).unwrap(), 3);
}

/// Penalty-aspect-scoped adjusters touch only their own pass.
#[test]
fn test_penalty_scoped_adjuster_leaves_base_alone() {
    let (mut state, play) = state_with_card(3, &[Aspect::Shadow], &[]);
    state.player_mut(P0).add_adjuster(
        CostAdjuster::new(
            CardId::new(50),
            AdjusterScope::any().for_penalty_aspect(Aspect::Shadow),
            -2,
        )
        .with_floor(0),
    );

    // Base 3 untouched; Shadow penalty 2 - 2 = 0.
    assert_eq!(adjusted_cost(&state, &play).unwrap(), 3);
}

/// Adjusters scoped to a play type ignore other plays when consumed.
#[test]
fn test_mark_used_respects_scope() {
    let (mut state, play) = state_with_card(2, &[], &[]);
    state.player_mut(P0).add_adjuster(
        CostAdjuster::new(
            CardId::new(50),
            AdjusterScope::any().for_play_type(PlayType::Activate),
            -1,
        )
        .with_uses(1),
    );

    mark_used_adjusters(&mut state, &play).unwrap();
    // The adjuster matched nothing about this play and keeps its use.
    assert_eq!(state.player(P0).adjusters.len(), 1);
}
