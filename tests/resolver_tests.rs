//! Ability resolver integration tests: the full state machine driven
//! through the engine, prompts answered as a player would.

use duelcore::abilities::{
    AbilityDefinition, AbilityKind, AbilityRegistry, ControllerFilter, CostDirective, TargetCount,
    TargetResolver,
};
use duelcore::cards::{CardDefinition, CardType};
use duelcore::core::{AbilityId, CardId, DefinitionId, GameState, PlayerId, Prop};
use duelcore::events::{
    Event, EventKind, EventMutation, Reaction, ReactionResponse, TargetRef,
};
use duelcore::filters::CardTypeFilter;
use duelcore::prompts::{PromptKind, PromptRequest};
use duelcore::systems::{GameSystem, SystemEffect, TargetShape, WhichPlayer};
use duelcore::zones::ZoneKind;
use duelcore::{Engine, RunStatus};

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

/// Drive the engine to idle, answering prompts with the given policy
/// and recording every prompt seen.
fn drive(
    engine: &mut Engine,
    mut answer: impl FnMut(&PromptRequest) -> usize,
) -> Vec<PromptRequest> {
    let mut seen = Vec::new();
    let mut status = engine.run().unwrap();
    while let RunStatus::AwaitingChoice(prompt) = status {
        seen.push(prompt.clone());
        let index = answer(&prompt);
        status = engine.choose(index).unwrap();
    }
    seen
}

fn pass_prompts(seen: &[PromptRequest]) -> usize {
    seen.iter()
        .filter(|p| matches!(p.kind, PromptKind::PassAbility { .. }))
        .count()
}

struct Fixture {
    engine: Engine,
    source: CardId,
    ability: AbilityId,
    enemies: Vec<CardId>,
}

/// A gunner unit for player 0 with the given ability, two enemy units,
/// and `resources` ready resources for player 0.
fn fixture(build: impl FnOnce(AbilityId) -> AbilityDefinition, resources: usize) -> Fixture {
    let mut state = GameState::new(7);
    let mut abilities = AbilityRegistry::new();

    let ability = abilities.next_id();
    abilities.register(build(ability));

    let gunner = state.definitions.register(
        CardDefinition::new(DefinitionId::new(0), "Gunner", CardType::Unit)
            .with_stats(2, 4)
            .with_ability(ability),
    );
    let grunt = state.definitions.register(
        CardDefinition::new(DefinitionId::new(1), "Grunt", CardType::Unit).with_stats(1, 3),
    );
    let supply = state
        .definitions
        .register(CardDefinition::new(DefinitionId::new(2), "Supply", CardType::Event));

    let source = state.spawn(gunner, P0, ZoneKind::GroundArena).unwrap();
    let enemies = vec![
        state.spawn(grunt, P1, ZoneKind::GroundArena).unwrap(),
        state.spawn(grunt, P1, ZoneKind::GroundArena).unwrap(),
    ];
    for _ in 0..resources {
        state.spawn(supply, P0, ZoneKind::Resource).unwrap();
    }

    Fixture {
        engine: Engine::new(state, abilities),
        source,
        ability,
        enemies,
    }
}

fn snipe(ability: AbilityId) -> AbilityDefinition {
    AbilityDefinition::new(ability, "Snipe", AbilityKind::Activated)
        .with_cost(CostDirective::ExhaustSource)
        .with_cost(CostDirective::PayFixedResources { amount: 1 })
        .with_target(
            TargetResolver::single(CardTypeFilter::One(CardType::Unit))
                .controlled_by(ControllerFilter::Opponent),
        )
        .with_effect(GameSystem::on_slot(SystemEffect::DealDamage { amount: Prop::Value(2) }, 0))
}

/// Happy path: costs paid, target chosen, damage applied.
#[test]
fn test_activated_ability_full_resolution() {
    let mut fx = fixture(snipe, 2);
    let id = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap()
        .unwrap();

    let seen = drive(&mut fx.engine, |prompt| {
        assert!(matches!(prompt.kind, PromptKind::ChooseTarget { .. }));
        0
    });

    assert_eq!(seen.len(), 1);
    let state = fx.engine.state();
    assert_eq!(state.card(fx.enemies[0]).unwrap().damage, 2);
    assert_eq!(state.card(fx.enemies[1]).unwrap().damage, 0);
    assert!(state.card(fx.source).unwrap().exhausted);
    assert_eq!(state.ready_resources(P0), 1);
    assert_eq!(state.messages.containing("uses Snipe").count(), 1);

    let res = fx.engine.resolution(id).unwrap();
    assert!(res.initiated);
    assert!(!res.canceled);
    assert!(res
        .resolved_events
        .iter()
        .any(|e| e.kind == EventKind::DamageDealt));
}

/// An optional ability shows the Pass affordance exactly once per
/// resolution, even though the resolver re-enters the pipeline for
/// each prompt and checks again at the target stage.
#[test]
fn test_pass_affordance_shown_once_per_resolution() {
    fn optional_snipe(ability: AbilityId) -> AbilityDefinition {
        snipe(ability).optional().targeting_before_costs()
    }

    let mut fx = fixture(optional_snipe, 4);

    fx.engine.activate_ability(P0, fx.source, fx.ability).unwrap().unwrap();
    let seen = drive(&mut fx.engine, |_| 0);
    assert_eq!(pass_prompts(&seen), 1);

    // A second resolution gets its own single affordance.
    fx.engine.state_mut().card_mut(fx.source).unwrap().exhausted = false;
    fx.engine.activate_ability(P0, fx.source, fx.ability).unwrap().unwrap();
    let seen = drive(&mut fx.engine, |_| 0);
    assert_eq!(pass_prompts(&seen), 1);
}

/// Passing an optional ability cancels it: no costs, no effects, one
/// message.
#[test]
fn test_pass_cancels_everything() {
    fn optional_snipe(ability: AbilityId) -> AbilityDefinition {
        snipe(ability).optional()
    }

    let mut fx = fixture(optional_snipe, 2);
    let id = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap()
        .unwrap();

    drive(&mut fx.engine, |prompt| match prompt.kind {
        PromptKind::PassAbility { .. } => 1,
        _ => panic!("no other prompt should appear after passing"),
    });

    let state = fx.engine.state();
    assert!(!state.card(fx.source).unwrap().exhausted);
    assert_eq!(state.ready_resources(P0), 2);
    assert_eq!(state.card(fx.enemies[0]).unwrap().damage, 0);
    assert_eq!(state.messages.containing("passes on Snipe").count(), 1);

    let res = fx.engine.resolution(id).unwrap();
    assert!(res.canceled && res.passed && !res.initiated);
    assert!(res.resolved_events.is_empty());
}

/// Unpayable costs cancel with the "did not pay" message and touch
/// nothing.
#[test]
fn test_unpayable_cost_cancels_with_message() {
    let mut fx = fixture(snipe, 0);
    let id = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap()
        .unwrap();

    let seen = drive(&mut fx.engine, |_| 0);

    assert!(seen.is_empty());
    let state = fx.engine.state();
    assert!(!state.card(fx.source).unwrap().exhausted);
    assert_eq!(state.card(fx.enemies[0]).unwrap().damage, 0);
    assert_eq!(
        state.messages.containing("did not pay the costs of Snipe").count(),
        1
    );
    assert!(fx.engine.resolution(id).unwrap().canceled);
}

/// A reaction cancelling a cost event cancels the whole ability.
#[test]
fn test_cancelled_cost_event_cancels_ability() {
    fn refuse_exhaust(_state: &GameState, _event: &Event) -> Option<ReactionResponse> {
        Some(ReactionResponse::CancelEvent)
    }

    let mut fx = fixture(snipe, 2);
    fx.engine
        .reactions_mut()
        .register(Reaction::new(fx.source, EventKind::CardExhausted, refuse_exhaust));

    let id = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap()
        .unwrap();
    drive(&mut fx.engine, |_| 0);

    let state = fx.engine.state();
    assert!(!state.card(fx.source).unwrap().exhausted);
    assert_eq!(state.card(fx.enemies[0]).unwrap().damage, 0);
    assert_eq!(
        state.messages.containing("did not pay the costs of Snipe").count(),
        1
    );
    assert!(fx.engine.resolution(id).unwrap().canceled);
}

/// With no legal target the ability cancels with one message.
#[test]
fn test_no_legal_targets_cancels_with_message() {
    let mut fx = fixture(snipe, 2);
    // Remove both enemies before activating.
    for enemy in fx.enemies.clone() {
        fx.engine
            .state_mut()
            .move_card(enemy, ZoneKind::Discard, duelcore::ZonePosition::Top)
            .unwrap();
    }

    let id = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap()
        .unwrap();
    drive(&mut fx.engine, |_| 0);

    let state = fx.engine.state();
    assert_eq!(
        state.messages.containing("has no legal targets for Snipe").count(),
        1
    );
    assert!(fx.engine.resolution(id).unwrap().canceled);
    // Costs were paid before targeting failed; there is no rollback.
    assert!(state.card(fx.source).unwrap().exhausted);
}

/// An early-chosen target invalidated while costs are paid forces a
/// retarget; with no replacement available the ability cancels, and
/// the paid costs stay paid.
#[test]
fn test_target_invalidated_during_costs_retargets() {
    fn bounce_first_enemy(state: &GameState, _event: &Event) -> Option<ReactionResponse> {
        let card = state
            .zones
            .cards_in(PlayerId(1), ZoneKind::GroundArena)
            .first()
            .copied()?;
        Some(ReactionResponse::AppendEvent {
            kind: EventKind::CardMoved,
            target: TargetRef::Card(card),
            mutation: EventMutation::Move { card, to: ZoneKind::Hand },
        })
    }

    fn early_snipe(ability: AbilityId) -> AbilityDefinition {
        AbilityDefinition::new(ability, "Snipe", AbilityKind::Activated)
            .targeting_before_costs()
            .with_cost(CostDirective::PayFixedResources { amount: 1 })
            .with_target(
                TargetResolver::single(CardTypeFilter::One(CardType::Unit))
                    .controlled_by(ControllerFilter::Opponent),
            )
            .with_effect(GameSystem::on_slot(
                SystemEffect::DealDamage { amount: Prop::Value(2) },
                0,
            ))
    }

    let mut fx = fixture(early_snipe, 2);
    // Leave exactly one enemy so the early choice is forced and the
    // retarget finds nothing.
    let second = fx.enemies[1];
    fx.engine
        .state_mut()
        .move_card(second, ZoneKind::Discard, duelcore::ZonePosition::Top)
        .unwrap();

    fx.engine
        .reactions_mut()
        .register(Reaction::new(fx.source, EventKind::ResourcesPaid, bounce_first_enemy));

    let id = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap()
        .unwrap();
    drive(&mut fx.engine, |_| 0);

    let state = fx.engine.state();
    // The bounced enemy is safe in hand, undamaged.
    assert_eq!(state.card(fx.enemies[0]).unwrap().zone, ZoneKind::Hand);
    assert_eq!(state.card(fx.enemies[0]).unwrap().damage, 0);
    assert_eq!(
        state.messages.containing("has no legal targets for Snipe").count(),
        1
    );
    assert!(fx.engine.resolution(id).unwrap().canceled);
    // The resource spent on the cost is not refunded.
    assert_eq!(state.ready_resources(P0), 1);
}

/// An unpayable "unless" cost on one of three targets omits exactly
/// that target's event; the other two still apply.
#[test]
fn test_unless_cost_per_target_independence() {
    let mut state = GameState::new(3);
    let mut abilities = AbilityRegistry::new();

    let ability = abilities.next_id();
    abilities.register(
        AbilityDefinition::new(ability, "Purge", AbilityKind::CardAbility)
            .with_target(
                TargetResolver::single(CardTypeFilter::One(CardType::Unit))
                    .counting(TargetCount::Exactly(3)),
            )
            .with_effect(
                GameSystem::on_slot(SystemEffect::Defeat, 0).with_unless_cost(Prop::Value(1)),
            ),
    );

    let base = state.definitions.register(
        CardDefinition::new(DefinitionId::new(0), "Command Post", CardType::Base)
            .with_stats(0, 20)
            .with_ability(ability),
    );
    let grunt = state.definitions.register(
        CardDefinition::new(DefinitionId::new(1), "Grunt", CardType::Unit).with_stats(1, 2),
    );
    let supply = state
        .definitions
        .register(CardDefinition::new(DefinitionId::new(2), "Supply", CardType::Event));

    let source = state.spawn(base, P0, ZoneKind::Base).unwrap();
    let mine_a = state.spawn(grunt, P0, ZoneKind::GroundArena).unwrap();
    let mine_b = state.spawn(grunt, P0, ZoneKind::GroundArena).unwrap();
    let theirs = state.spawn(grunt, P1, ZoneKind::GroundArena).unwrap();
    // Player 0 can pay both unless-costs; player 1 can pay nothing.
    for _ in 0..2 {
        state.spawn(supply, P0, ZoneKind::Resource).unwrap();
    }

    let mut engine = Engine::new(state, abilities);
    engine.activate_ability(P0, source, ability).unwrap().unwrap();

    let seen = drive(&mut engine, |prompt| {
        assert!(matches!(prompt.kind, PromptKind::PayUnlessCost { .. }));
        0 // pay
    });

    // Only the two payable targets ever prompted.
    assert_eq!(seen.len(), 2);
    let state = engine.state();
    assert_eq!(state.card(mine_a).unwrap().zone, ZoneKind::Discard);
    assert_eq!(state.card(mine_b).unwrap().zone, ZoneKind::Discard);
    assert_eq!(state.card(theirs).unwrap().zone, ZoneKind::GroundArena);
}

/// Usage limits refuse further activations with a message.
#[test]
fn test_usage_limit_enforced() {
    fn limited(ability: AbilityId) -> AbilityDefinition {
        AbilityDefinition::new(ability, "Overdrive", AbilityKind::Activated)
            .with_limit(1)
            .with_effect(GameSystem::on_source(SystemEffect::DealDamage {
                amount: Prop::Value(1),
            }))
    }

    let mut fx = fixture(limited, 0);

    fx.engine.activate_ability(P0, fx.source, fx.ability).unwrap().unwrap();
    drive(&mut fx.engine, |_| 0);
    assert_eq!(fx.engine.state().card(fx.source).unwrap().damage, 1);

    let refused = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap();
    assert!(refused.is_none());
    assert_eq!(
        fx.engine
            .state()
            .messages
            .containing("has no uses of Overdrive remaining")
            .count(),
        1
    );
}

/// An activated ability on an event card discards the card before the
/// effect resolves.
#[test]
fn test_event_card_discarded_before_effect() {
    let mut state = GameState::new(1);
    let mut abilities = AbilityRegistry::new();

    let ability = abilities.next_id();
    abilities.register(
        AbilityDefinition::new(ability, "Resupply", AbilityKind::Activated).with_effect(
            GameSystem::new(
                SystemEffect::Draw { count: Prop::Value(1) },
                TargetShape::Player { who: WhichPlayer::Controller },
            ),
        ),
    );

    let event_def = state.definitions.register(
        CardDefinition::new(DefinitionId::new(0), "Resupply Order", CardType::Event)
            .with_ability(ability),
    );
    let filler = state.definitions.register(
        CardDefinition::new(DefinitionId::new(1), "Filler", CardType::Unit).with_stats(1, 1),
    );

    let card = state.spawn(event_def, P0, ZoneKind::Hand).unwrap();
    state.spawn(filler, P0, ZoneKind::Deck).unwrap();

    let mut engine = Engine::new(state, abilities);
    engine.activate_ability(P0, card, ability).unwrap().unwrap();
    drive(&mut engine, |_| 0);

    let state = engine.state();
    assert_eq!(state.card(card).unwrap().zone, ZoneKind::Discard);
    assert_eq!(state.zones.count(P0, ZoneKind::Hand), 1);
}

/// Opponent-chosen target slots defer to the target stage and prompt
/// the opponent, not the controller.
#[test]
fn test_opponent_chooses_deferred_targets() {
    fn sacrifice(ability: AbilityId) -> AbilityDefinition {
        AbilityDefinition::new(ability, "Tribute", AbilityKind::CardAbility)
            .targeting_before_costs()
            .with_target(
                TargetResolver::single(CardTypeFilter::One(CardType::Unit))
                    .controlled_by(ControllerFilter::Opponent)
                    .chosen_by_opponent(),
            )
            .with_effect(GameSystem::on_slot(SystemEffect::Defeat, 0))
    }

    let mut fx = fixture(sacrifice, 0);
    fx.engine.activate_ability(P0, fx.source, fx.ability).unwrap().unwrap();

    let seen = drive(&mut fx.engine, |prompt| {
        assert_eq!(prompt.player, P1, "the opponent chooses");
        0
    });

    assert_eq!(seen.len(), 1);
    assert_eq!(
        fx.engine.state().card(fx.enemies[0]).unwrap().zone,
        ZoneKind::Discard
    );
}

/// A reaction cancelling the initiation marker stops the handler from
/// ever running.
#[test]
fn test_cancelled_initiation_blocks_handler() {
    fn veto(_state: &GameState, _event: &Event) -> Option<ReactionResponse> {
        Some(ReactionResponse::CancelEvent)
    }

    fn self_damage(ability: AbilityId) -> AbilityDefinition {
        AbilityDefinition::new(ability, "Overload", AbilityKind::Ability).with_effect(
            GameSystem::on_source(SystemEffect::DealDamage { amount: Prop::Value(2) }),
        )
    }

    let mut fx = fixture(self_damage, 0);
    fx.engine
        .reactions_mut()
        .register(Reaction::new(fx.source, EventKind::EffectsInitiated, veto));

    let id = fx
        .engine
        .activate_ability(P0, fx.source, fx.ability)
        .unwrap()
        .unwrap();
    drive(&mut fx.engine, |_| 0);

    let res = fx.engine.resolution(id).unwrap();
    assert!(!res.initiated);
    assert_eq!(fx.engine.state().card(fx.source).unwrap().damage, 0);
}
