//! Stage executors: the ability-resolution state machine.
//!
//! Each executor implements one named pipeline step. A resolution
//! walks PreTarget -> Cost -> Target -> Effect, with cancel/pass
//! checks at the stage boundaries; cancellation at any point stops
//! further stage work and cancels the resolution's queued events.
//!
//! Executors never block. A stage needing player input re-inserts
//! itself at the front of the pipeline and suspends with a prompt;
//! after the answer is handled the re-entered step picks up exactly
//! where targeting left off.

use rustc_hash::FxHashMap;

use crate::abilities::{
    AbilityDefinition, AbilityKind, AbilityRegistry, ChoosingPlayer, CostDirective, TargetResolver,
};
use crate::cards::CardType;
use crate::core::{CardId, GameState, ResolutionId};
use crate::costs::{adjusted_cost, mark_used_adjusters, PlayDetails};
use crate::error::{EngineError, Result};
use crate::events::{
    Event, EventKind, EventMutation, EventWindow, ReactionRegistry, TargetRef,
};
use crate::pipeline::{Pipeline, Step};
use crate::prompts::{PromptKind, PromptRequest};
use crate::systems::{
    can_affect, generate_events_for_all_targets, GameSystem, TargetShape, UnlessPrompt,
};
use crate::zones::ZoneKind;

use super::context::Stage;
use super::resolution::Resolution;

/// What a step execution produced.
#[derive(Debug)]
pub enum StepOutcome {
    /// The step finished; run the next one.
    Continue,
    /// The step needs player input; park the pipeline.
    Suspend(PromptRequest),
}

/// Borrowed engine internals the executors work against.
pub(crate) struct ResolverEnv<'a> {
    pub state: &'a mut GameState,
    pub abilities: &'a AbilityRegistry,
    pub reactions: &'a ReactionRegistry,
    pub pipeline: &'a mut Pipeline,
}

impl ResolverEnv<'_> {
    fn definition(&self, res: &Resolution) -> Result<&AbilityDefinition> {
        self.abilities
            .get(res.context.ability)
            .ok_or(EngineError::UnknownAbility(res.context.ability))
    }
}

/// Cancel with the single explanatory message the player sees.
fn cancel_with_message(env: &mut ResolverEnv, res: &mut Resolution, text: String) {
    res.cancel();
    env.state.messages.say(res.context.player, text);
}

// === Stage 1: early targeting ===

pub(crate) fn resolve_early_targets(env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    if res.canceled {
        return Ok(StepOutcome::Continue);
    }
    let def = env.definition(res)?.clone();

    // The Pass affordance is recorded here and shown exactly once per
    // resolution, guarded by the shown-flag rather than re-prompting
    // on every pipeline re-entry.
    if def.optional && !res.pass_shown {
        res.pass_shown = true;
        env.pipeline
            .insert_step(Step::ResolveEarlyTargets { resolution: res.id });
        return Ok(StepOutcome::Suspend(pass_prompt(res, &def)));
    }

    if !def.targets_before_costs {
        return Ok(StepOutcome::Continue);
    }

    match advance_targeting(env, res, &def, true)? {
        TargetProgress::Prompt(prompt) => {
            env.pipeline
                .insert_step(Step::ResolveEarlyTargets { resolution: res.id });
            Ok(StepOutcome::Suspend(prompt))
        }
        TargetProgress::NoLegal => {
            cancel_with_message(env, res, format!("has no legal targets for {}", def.title));
            Ok(StepOutcome::Continue)
        }
        TargetProgress::Done => {
            res.early_targeted = true;
            Ok(StepOutcome::Continue)
        }
    }
}

// === Stages 2 and 7: cancel/pass check ===

pub(crate) fn check_cancel(_env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    if res.passed || res.canceled {
        // Already-created events are emitted as cancelled, not applied.
        res.cancel();
    }
    Ok(StepOutcome::Continue)
}

// === Stage 3: announcement window ===

pub(crate) fn announce_ability(env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    if res.canceled {
        return Ok(StepOutcome::Continue);
    }
    let def = env.definition(res)?.clone();

    let kind = def.kind.initiation_kind();
    let event = Event::new(
        kind,
        TargetRef::Card(res.context.source),
        EventMutation::Marker { resolution: res.id },
    );
    let window = EventWindow::with_events(format!("announce {}", def.title), vec![event]);
    let outcome = window.resolve(env.state, env.reactions)?;

    if !outcome.applied_kind(kind) {
        cancel_with_message(env, res, format!("{} was interrupted", def.title));
        return Ok(StepOutcome::Continue);
    }

    // The announcement window resolved: other abilities have seen
    // "this ability is about to resolve". Only now do the remaining
    // stages enter the queue.
    for step in [
        Step::ResolveCosts { resolution: res.id },
        Step::PayCosts { resolution: res.id },
        Step::ResolveTargets { resolution: res.id },
        Step::CheckCancel { resolution: res.id },
        Step::InitiateEffects { resolution: res.id },
        Step::ExecuteHandler { resolution: res.id },
    ] {
        env.pipeline.queue_step(step);
    }
    Ok(StepOutcome::Continue)
}

// === Stage 4: cost resolution ===

pub(crate) fn resolve_costs(env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    if res.canceled {
        return Ok(StepOutcome::Continue);
    }
    res.context = res.context.advance(Stage::Cost);
    let def = env.definition(res)?.clone();

    let mut outcome = crate::resolver::CostOutcome {
        play_cost: def.kind == AbilityKind::CardPlay,
        trigger_cost: def.kind == AbilityKind::Activated,
        ..Default::default()
    };
    let source = res.context.source;
    let player = res.context.player;

    for cost in &def.costs {
        match cost {
            CostDirective::ExhaustSource => {
                if env.state.card_result(source)?.exhausted {
                    outcome.canceled = true;
                } else {
                    outcome.events.push(Event::new(
                        EventKind::CardExhausted,
                        TargetRef::Card(source),
                        EventMutation::Exhaust { card: source },
                    ));
                }
            }
            CostDirective::PayAdjustedCost { play_type } => {
                let play = PlayDetails {
                    player,
                    card: source,
                    play_type: *play_type,
                    target: res.context.chosen(0).first().copied(),
                };
                let amount = adjusted_cost(env.state, &play)?;
                if env.state.ready_resources(player) < amount {
                    outcome.canceled = true;
                } else {
                    outcome.adjusted_play = Some(play);
                    outcome.events.push(Event::new(
                        EventKind::ResourcesPaid,
                        TargetRef::Player(player),
                        EventMutation::PayResources { player, amount },
                    ));
                }
            }
            CostDirective::PayFixedResources { amount } => {
                if env.state.ready_resources(player) < *amount {
                    outcome.canceled = true;
                } else {
                    outcome.events.push(Event::new(
                        EventKind::ResourcesPaid,
                        TargetRef::Player(player),
                        EventMutation::PayResources { player, amount: *amount },
                    ));
                }
            }
        }
    }

    res.context.cost = outcome;
    Ok(StepOutcome::Continue)
}

// === Stage 5: cost payment window ===

pub(crate) fn pay_costs(env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    if res.canceled {
        return Ok(StepOutcome::Continue);
    }
    let def = env.definition(res)?.clone();
    let outcome = res.context.cost.clone();

    if outcome.canceled {
        cancel_with_message(env, res, format!("did not pay the costs of {}", def.title));
        return Ok(StepOutcome::Continue);
    }
    if outcome.events.is_empty() {
        return Ok(StepOutcome::Continue);
    }

    let window = EventWindow::with_events(format!("{} costs", def.title), outcome.events);
    let window_outcome = window.resolve(env.state, env.reactions)?;

    if window_outcome.any_canceled() {
        // Cancellation of any cost event cancels the whole ability.
        cancel_with_message(env, res, format!("did not pay the costs of {}", def.title));
    } else {
        res.resolved_events.extend(window_outcome.applied);
        if let Some(play) = outcome.adjusted_play {
            mark_used_adjusters(env.state, &play)?;
        }
    }
    Ok(StepOutcome::Continue)
}

// === Stage 6: targeting ===

pub(crate) fn resolve_targets(env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    if res.canceled {
        return Ok(StepOutcome::Continue);
    }
    res.context = res.context.advance(Stage::Target);
    let def = env.definition(res)?.clone();

    if def.target_resolvers.is_empty() {
        return Ok(StepOutcome::Continue);
    }

    if def.optional && !res.pass_shown {
        res.pass_shown = true;
        env.pipeline
            .insert_step(Step::ResolveTargets { resolution: res.id });
        return Ok(StepOutcome::Suspend(pass_prompt(res, &def)));
    }

    // A previously chosen target may have become illegal while costs
    // were paid; if so, retarget from scratch.
    if res.early_targeted && !chosen_targets_still_legal(env.state, res, &def) {
        res.context.clear_targets();
        res.slots_done.clear();
        res.early_targeted = false;
    }

    match advance_targeting(env, res, &def, false)? {
        TargetProgress::Prompt(prompt) => {
            env.pipeline
                .insert_step(Step::ResolveTargets { resolution: res.id });
            Ok(StepOutcome::Suspend(prompt))
        }
        TargetProgress::NoLegal => {
            cancel_with_message(env, res, format!("has no legal targets for {}", def.title));
            Ok(StepOutcome::Continue)
        }
        TargetProgress::Done => Ok(StepOutcome::Continue),
    }
}

// === Stage 8: effect initiation ===

pub(crate) fn initiate_effects(env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    if res.canceled {
        // Cancel pending events instead of initiating.
        res.cancel();
        return Ok(StepOutcome::Continue);
    }
    let def = env.definition(res)?.clone();
    let source = res.context.source;
    let player = res.context.player;

    // Usage limits: not spent when the source is in hand, or when it
    // moved since initiation (the in-play copy that fired is gone).
    let (zone, card_type) = {
        let instance = env.state.card_result(source)?;
        let def_card = env.state.definition_of(source)?;
        (instance.zone, def_card.card_type)
    };
    if def.limit.is_some() && zone != ZoneKind::Hand && zone == res.zone_at_start {
        env.state.card_result_mut(source)?.spend_use(def.id);
    }

    match &def.message {
        Some(message) => env.state.messages.say(player, message.clone()),
        None => env
            .state
            .messages
            .say(player, format!("uses {}", def.title)),
    }

    // An activated ability on an event card discards the card before
    // the effect resolves.
    if def.kind == AbilityKind::Activated
        && card_type == CardType::Event
        && zone != ZoneKind::Discard
    {
        env.state
            .move_card(source, ZoneKind::Discard, crate::zones::ZonePosition::Top)?;
    }

    let event = Event::new(
        EventKind::EffectsInitiated,
        TargetRef::Card(source),
        EventMutation::Marker { resolution: res.id },
    );
    let window = EventWindow::with_events(format!("{} initiation", def.title), vec![event]);
    let outcome = window.resolve(env.state, env.reactions)?;
    if outcome.applied_kind(EventKind::EffectsInitiated) {
        res.initiated = true;
    }
    Ok(StepOutcome::Continue)
}

// === Stage 9: handler execution ===

pub(crate) fn execute_handler(env: &mut ResolverEnv, res: &mut Resolution) -> Result<StepOutcome> {
    res.context = res.context.advance(Stage::Effect);
    if res.canceled || !res.initiated {
        return Ok(StepOutcome::Continue);
    }
    let def = env.definition(res)?.clone();

    for system in &def.effects {
        let generated = generate_events_for_all_targets(env.state, system, &res.context);
        res.pending_events.extend(generated.events);
        for unless in generated.unless_prompts {
            env.pipeline.queue_step(Step::AskChoice {
                prompt: unless_prompt(env.state, res.id, &def, unless),
            });
        }
        res.context.chain.push(system.effect.tag());
    }

    env.pipeline.queue_step(Step::OpenPendingWindow {
        resolution: res.id,
        label: format!("{} effects", def.title),
    });
    Ok(StepOutcome::Continue)
}

/// Drain a resolution's pending events into a window and resolve it.
pub(crate) fn open_pending_window(
    env: &mut ResolverEnv,
    res: &mut Resolution,
    label: &str,
) -> Result<StepOutcome> {
    let events = std::mem::take(&mut res.pending_events);
    if res.canceled {
        res.canceled_events.extend(events.into_iter().map(|mut e| {
            e.cancel();
            e
        }));
        return Ok(StepOutcome::Continue);
    }
    if events.is_empty() {
        return Ok(StepOutcome::Continue);
    }

    let window = EventWindow::with_events(label.to_string(), events);
    let outcome = window.resolve(env.state, env.reactions)?;
    res.resolved_events.extend(outcome.applied);
    res.canceled_events.extend(outcome.canceled);
    Ok(StepOutcome::Continue)
}

// === Choice handling ===

/// Apply a player's answer to a suspended prompt.
///
/// The stage step that suspended has already re-inserted itself where
/// needed; this only records the decision.
pub(crate) fn handle_choice(
    env: &mut ResolverEnv,
    resolutions: &mut FxHashMap<ResolutionId, Resolution>,
    kind: PromptKind,
    index: usize,
) -> Result<()> {
    match kind {
        PromptKind::PassAbility { resolution } => {
            // Index 0 proceeds; nothing to record.
            if index == 1 {
                let res = resolutions
                    .get_mut(&resolution)
                    .ok_or(EngineError::UnknownResolution(resolution))?;
                let title = env.definition(res)?.title.clone();
                res.passed = true;
                res.cancel();
                env.state
                    .messages
                    .say(res.context.player, format!("passes on {title}"));
            }
        }

        PromptKind::ChooseTarget { resolution, slot, candidates, can_finish } => {
            let res = resolutions
                .get_mut(&resolution)
                .ok_or(EngineError::UnknownResolution(resolution))?;
            if index < candidates.len() {
                res.context.choose(slot, candidates[index]);
            } else if can_finish && index == candidates.len() {
                res.slots_done.insert(slot, true);
            } else {
                // Cancel option.
                let title = env.definition(res)?.title.clone();
                cancel_with_message(env, res, format!("cancels {title}"));
            }
        }

        PromptKind::PayUnlessCost { resolution, payer, amount, event } => {
            let res = resolutions
                .get_mut(&resolution)
                .ok_or(EngineError::UnknownResolution(resolution))?;
            // Index 0 pays. Paying may fail if resources were spent on
            // another target's cost in the meantime; independence means
            // only this target's event is dropped.
            if index == 0 && env.state.pay_resources(payer, amount) {
                res.pending_events.push(event);
            }
        }
    }
    Ok(())
}

// === Targeting internals ===

enum TargetProgress {
    /// A choice is owed; suspend with this prompt.
    Prompt(PromptRequest),
    /// A required slot cannot be satisfied.
    NoLegal,
    /// Every applicable slot is resolved.
    Done,
}

fn system_uses_slot(system: &GameSystem, slot: usize) -> bool {
    matches!(
        system.shape,
        TargetShape::SingleCard { slot: s } | TargetShape::MultiCard { slot: s } if s == slot
    )
}

/// Candidates for a slot: the resolver's filter-level candidates,
/// narrowed to cards the slot's systems can actually affect.
fn slot_candidates(
    state: &GameState,
    res: &Resolution,
    def: &AbilityDefinition,
    slot: usize,
    resolver: &TargetResolver,
) -> Vec<CardId> {
    let mut candidates = resolver.candidates(state, &res.context);
    candidates.retain(|c| !res.context.chosen(slot).contains(c));

    let slot_systems: Vec<&GameSystem> = def
        .effects
        .iter()
        .filter(|s| system_uses_slot(s, slot))
        .collect();
    if !slot_systems.is_empty() {
        candidates.retain(|&c| {
            slot_systems
                .iter()
                .any(|s| can_affect(state, s, TargetRef::Card(c), &res.context))
        });
    }
    candidates
}

/// Find the next slot owing a decision and either auto-resolve forced
/// choices or build the prompt for the choosing player.
fn advance_targeting(
    env: &mut ResolverEnv,
    res: &mut Resolution,
    def: &AbilityDefinition,
    early: bool,
) -> Result<TargetProgress> {
    'outer: loop {
        for slot in 0..def.target_resolvers.len() {
            let resolver = &def.target_resolvers[slot];
            if res.slot_done(slot) {
                continue;
            }
            // Opponent-chosen slots are deferred past the early phase.
            if early && resolver.choosing == ChoosingPlayer::Opponent {
                continue;
            }
            if let Some(dep) = resolver.depends_on {
                if !res.slot_done(dep) {
                    continue;
                }
            }

            let chosen = res.context.chosen(slot).len();
            let min = resolver.count.min();
            let max = resolver.count.max();

            if chosen >= max {
                res.slots_done.insert(slot, true);
                continue 'outer;
            }

            let candidates = slot_candidates(env.state, res, def, slot, resolver);

            if candidates.is_empty() {
                if chosen >= min {
                    res.slots_done.insert(slot, true);
                    continue 'outer;
                }
                return Ok(TargetProgress::NoLegal);
            }

            if chosen + candidates.len() < min {
                return Ok(TargetProgress::NoLegal);
            }

            // A forced choice resolves without a prompt.
            if chosen + candidates.len() == min {
                for card in candidates {
                    res.context.choose(slot, card);
                }
                res.slots_done.insert(slot, true);
                continue 'outer;
            }

            return Ok(TargetProgress::Prompt(choose_target_prompt(
                env.state,
                res,
                def,
                slot,
                resolver,
                candidates,
                chosen >= min,
            )));
        }
        return Ok(TargetProgress::Done);
    }
}

/// Do the chosen targets survive re-validation after costs?
fn chosen_targets_still_legal(
    state: &GameState,
    res: &Resolution,
    def: &AbilityDefinition,
) -> bool {
    for (slot, resolver) in def.target_resolvers.iter().enumerate() {
        for &card in res.context.chosen(slot) {
            if !resolver.accepts(state, card, &res.context) {
                return false;
            }
            let slot_systems: Vec<&GameSystem> = def
                .effects
                .iter()
                .filter(|s| system_uses_slot(s, slot))
                .collect();
            if !slot_systems.is_empty()
                && !slot_systems
                    .iter()
                    .any(|s| can_affect(state, s, TargetRef::Card(card), &res.context))
            {
                return false;
            }
        }
    }
    true
}

// === Prompt construction ===

fn pass_prompt(res: &Resolution, def: &AbilityDefinition) -> PromptRequest {
    PromptRequest {
        player: res.context.player,
        title: format!("Use {}?", def.title),
        options: vec!["Use ability".to_string(), "Pass".to_string()],
        kind: PromptKind::PassAbility { resolution: res.id },
    }
}

fn choose_target_prompt(
    state: &GameState,
    res: &Resolution,
    def: &AbilityDefinition,
    slot: usize,
    resolver: &TargetResolver,
    candidates: Vec<CardId>,
    can_finish: bool,
) -> PromptRequest {
    let player = match resolver.choosing {
        ChoosingPlayer::Controller => res.context.player,
        ChoosingPlayer::Opponent => res.context.player.opponent(),
    };

    let mut options: Vec<String> = candidates
        .iter()
        .map(|&c| {
            state
                .definition_of(c)
                .map(|d| d.title.clone())
                .unwrap_or_else(|_| format!("{c}"))
        })
        .collect();
    if can_finish {
        options.push("Done".to_string());
    }
    options.push("Cancel".to_string());

    PromptRequest {
        player,
        title: format!("Choose a target for {}", def.title),
        options,
        kind: PromptKind::ChooseTarget {
            resolution: res.id,
            slot,
            candidates,
            can_finish,
        },
    }
}

fn unless_prompt(
    state: &GameState,
    resolution: ResolutionId,
    def: &AbilityDefinition,
    unless: UnlessPrompt,
) -> PromptRequest {
    let target_title = unless
        .event
        .target
        .card()
        .and_then(|c| state.definition_of(c).ok().map(|d| d.title.clone()))
        .unwrap_or_else(|| "the target".to_string());

    PromptRequest {
        player: unless.payer,
        title: format!(
            "{}: pay {} resources for {target_title} to be affected?",
            def.title, unless.amount
        ),
        options: vec![format!("Pay {}", unless.amount), "Decline".to_string()],
        kind: PromptKind::PayUnlessCost {
            resolution,
            payer: unless.payer,
            amount: unless.amount,
            event: unless.event,
        },
    }
}
