//! The engine driver.
//!
//! `Engine` owns the game state, the step pipeline, every in-flight
//! resolution, and at most one pending prompt. `run` drives the
//! pipeline until it is idle or a step suspends for player input;
//! `choose` answers the pending prompt and resumes exactly where
//! execution left off, with all queued steps intact.
//!
//! An `Err` out of `run` is an engine defect (invariant violation) and
//! aborts the pipeline. Rule-legality failures never surface here -
//! they cancel their resolution and leave a chat message.

use rustc_hash::FxHashMap;

use crate::abilities::AbilityRegistry;
use crate::core::{AbilityId, CardId, GameState, PlayerId, ResolutionId};
use crate::error::{EngineError, Result};
use crate::events::{EventWindow, ReactionRegistry};
use crate::pipeline::{Pipeline, Step};
use crate::prompts::PromptRequest;
use crate::resolver::{stages, AbilityContext, Resolution, StepOutcome};

/// Where a run left off.
#[derive(Clone, Debug)]
pub enum RunStatus {
    /// The pipeline drained; nothing is pending.
    Idle,
    /// A step suspended; answer with [`Engine::choose`].
    AwaitingChoice(PromptRequest),
}

/// The rules-resolution driver for one game.
pub struct Engine {
    state: GameState,
    abilities: AbilityRegistry,
    reactions: ReactionRegistry,
    pipeline: Pipeline,
    resolutions: FxHashMap<ResolutionId, Resolution>,
    pending: Option<PromptRequest>,
    next_resolution_id: u32,
}

impl Engine {
    /// Create an engine over prepared state and ability definitions.
    #[must_use]
    pub fn new(state: GameState, abilities: AbilityRegistry) -> Self {
        Self {
            state,
            abilities,
            reactions: ReactionRegistry::new(),
            pipeline: Pipeline::new(),
            resolutions: FxHashMap::default(),
            pending: None,
            next_resolution_id: 0,
        }
    }

    /// The game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable game state, for setup and tests.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The reaction registry.
    pub fn reactions_mut(&mut self) -> &mut ReactionRegistry {
        &mut self.reactions
    }

    /// The pipeline, for introspection.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// A resolution record, if the engine still tracks it.
    #[must_use]
    pub fn resolution(&self, id: ResolutionId) -> Option<&Resolution> {
        self.resolutions.get(&id)
    }

    /// The prompt awaiting an answer, if any.
    #[must_use]
    pub fn pending_prompt(&self) -> Option<&PromptRequest> {
        self.pending.as_ref()
    }

    /// Append a step to the pipeline (phase scheduling, tests).
    pub fn queue_step(&mut self, step: Step) {
        self.pipeline.queue_step(step);
    }

    /// Begin resolving an ability of a card for a player.
    ///
    /// Returns `Ok(None)` (with a chat message) when the activation is
    /// not legal: wrong controller, or a usage limit already spent.
    /// The resolution still needs [`Engine::run`] to make progress.
    pub fn activate_ability(
        &mut self,
        player: PlayerId,
        card: CardId,
        ability: AbilityId,
    ) -> Result<Option<ResolutionId>> {
        let (controller, zone_at_start, uses) = {
            let instance = self.state.card_result(card)?;
            (instance.controller, instance.zone, instance.uses_of(ability))
        };
        let def = self
            .abilities
            .get(ability)
            .ok_or(EngineError::UnknownAbility(ability))?;

        if controller != player {
            self.state
                .messages
                .say(player, format!("cannot use {}", def.title));
            return Ok(None);
        }
        if let Some(limit) = def.limit {
            if uses >= limit {
                self.state
                    .messages
                    .say(player, format!("has no uses of {} remaining", def.title));
                return Ok(None);
            }
        }

        let id = ResolutionId::new(self.next_resolution_id);
        self.next_resolution_id += 1;

        let title = def.title.clone();
        let context = AbilityContext::new(ability, card, player);
        self.resolutions
            .insert(id, Resolution::new(id, context, zone_at_start));

        // One activation is one nested frame: everything it enqueues
        // runs to completion before whatever queued it continues.
        self.pipeline.open_frame(
            title,
            vec![
                Step::ResolveEarlyTargets { resolution: id },
                Step::CheckCancel { resolution: id },
                Step::AnnounceAbility { resolution: id },
            ],
        );
        Ok(Some(id))
    }

    /// Drive the pipeline until idle or suspended.
    pub fn run(&mut self) -> Result<RunStatus> {
        if let Some(prompt) = &self.pending {
            return Ok(RunStatus::AwaitingChoice(prompt.clone()));
        }

        while let Some(step) = self.pipeline.next_step() {
            match self.execute(step)? {
                StepOutcome::Continue => {}
                StepOutcome::Suspend(prompt) => {
                    self.pending = Some(prompt.clone());
                    return Ok(RunStatus::AwaitingChoice(prompt));
                }
            }
        }
        Ok(RunStatus::Idle)
    }

    /// Answer the pending prompt by option index and resume.
    pub fn choose(&mut self, index: usize) -> Result<RunStatus> {
        let prompt = self.pending.take().ok_or(EngineError::NoPendingPrompt)?;
        if index >= prompt.options.len() {
            let count = prompt.options.len();
            self.pending = Some(prompt);
            return Err(EngineError::ChoiceOutOfRange { index, count });
        }

        let mut env = stages::ResolverEnv {
            state: &mut self.state,
            abilities: &self.abilities,
            reactions: &self.reactions,
            pipeline: &mut self.pipeline,
        };
        stages::handle_choice(&mut env, &mut self.resolutions, prompt.kind, index)?;
        self.run()
    }

    /// Execute one step.
    fn execute(&mut self, step: Step) -> Result<StepOutcome> {
        let mut env = stages::ResolverEnv {
            state: &mut self.state,
            abilities: &self.abilities,
            reactions: &self.reactions,
            pipeline: &mut self.pipeline,
        };

        match step {
            Step::ResolveEarlyTargets { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::resolve_early_targets(&mut env, res)
            }
            Step::CheckCancel { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::check_cancel(&mut env, res)
            }
            Step::AnnounceAbility { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::announce_ability(&mut env, res)
            }
            Step::ResolveCosts { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::resolve_costs(&mut env, res)
            }
            Step::PayCosts { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::pay_costs(&mut env, res)
            }
            Step::ResolveTargets { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::resolve_targets(&mut env, res)
            }
            Step::InitiateEffects { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::initiate_effects(&mut env, res)
            }
            Step::ExecuteHandler { resolution } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::execute_handler(&mut env, res)
            }
            Step::OpenPendingWindow { resolution, label } => {
                let res = Self::resolution_mut(&mut self.resolutions, resolution)?;
                stages::open_pending_window(&mut env, res, &label)
            }

            Step::OpenWindow { label, events } => {
                let window = EventWindow::with_events(label, events);
                window.resolve(env.state, env.reactions)?;
                Ok(StepOutcome::Continue)
            }
            Step::AskChoice { prompt } => Ok(StepOutcome::Suspend(prompt)),
            Step::Sequence { label, steps } => {
                env.pipeline.open_frame(label, steps);
                Ok(StepOutcome::Continue)
            }
            Step::EmitMessage { speaker, text } => {
                match speaker {
                    Some(player) => env.state.messages.say(player, text),
                    None => env.state.messages.announce(text),
                }
                Ok(StepOutcome::Continue)
            }
        }
    }

    fn resolution_mut(
        resolutions: &mut FxHashMap<ResolutionId, Resolution>,
        id: ResolutionId,
    ) -> Result<&mut Resolution> {
        resolutions
            .get_mut(&id)
            .ok_or(EngineError::UnknownResolution(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{AbilityDefinition, AbilityKind};
    use crate::cards::{CardDefinition, CardType};
    use crate::core::DefinitionId;
    use crate::zones::ZoneKind;

    fn simple_setup() -> (Engine, CardId, AbilityId) {
        let mut state = GameState::new(5);
        let mut abilities = AbilityRegistry::new();

        let ability = abilities.next_id();
        abilities.register(AbilityDefinition::new(ability, "Salvo", AbilityKind::Ability));

        let def = state.definitions.register(
            CardDefinition::new(DefinitionId::new(0), "Gunship", CardType::Unit)
                .with_stats(3, 3)
                .with_ability(ability),
        );
        let card = state
            .spawn(def, PlayerId::new(0), ZoneKind::SpaceArena)
            .unwrap();

        (Engine::new(state, abilities), card, ability)
    }

    #[test]
    fn test_effectless_ability_runs_to_idle() {
        let (mut engine, card, ability) = simple_setup();

        let id = engine
            .activate_ability(PlayerId::new(0), card, ability)
            .unwrap()
            .unwrap();
        let status = engine.run().unwrap();

        assert!(matches!(status, RunStatus::Idle));
        let res = engine.resolution(id).unwrap();
        assert!(!res.canceled);
        assert!(res.initiated);
        assert!(engine.pipeline().is_idle());
    }

    #[test]
    fn test_wrong_controller_is_refused_with_message() {
        let (mut engine, card, ability) = simple_setup();

        let id = engine
            .activate_ability(PlayerId::new(1), card, ability)
            .unwrap();

        assert!(id.is_none());
        assert_eq!(engine.state().messages.containing("cannot use").count(), 1);
    }

    #[test]
    fn test_choose_without_prompt_errors() {
        let (mut engine, _card, _ability) = simple_setup();
        assert!(matches!(
            engine.choose(0),
            Err(EngineError::NoPendingPrompt)
        ));
    }
}
