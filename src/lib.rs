//! # duelcore
//!
//! The rules-resolution core of a two-player collectible card game:
//! given a requested action - playing a card, activating an ability,
//! paying a cost, moving a card between zones - decide in what order
//! and under what conditions it actually changes game state.
//!
//! ## Design Principles
//!
//! 1. **Cooperative, single-threaded**: all resolution runs on one
//!    pipeline of named steps. A step needing player input suspends;
//!    nothing ever runs concurrently with anything else.
//!
//! 2. **Events over direct mutation**: systems produce events whose
//!    legality is re-checked at the moment they apply, not when they
//!    were queued. Stale events no-op instead of corrupting state.
//!
//! 3. **Two error classes**: invariant violations are engine-fatal
//!    `EngineError`s; rule-legality failures cancel cleanly with one
//!    chat message and never abort the pipeline.
//!
//! ## Modules
//!
//! - `core`: ids, players, cards-in-state, RNG, messages
//! - `cards`: definitions, instances, keyword config, registry
//! - `filters`: wildcard-aware zone/card-type predicates
//! - `zones`: zone ownership and movement
//! - `pipeline`: steps and the cooperative pipeline
//! - `systems`: the action/effect abstraction producing events
//! - `events`: events, batch windows, reactions
//! - `resolver`: the per-activation state machine
//! - `costs`: aspect penalties and cost adjusters
//! - `abilities`: ability definitions and registry
//! - `prompts`: the player-choice seam
//! - `engine`: the driver tying it all together

pub mod abilities;
pub mod cards;
pub mod core;
pub mod costs;
pub mod engine;
pub mod error;
pub mod events;
pub mod filters;
pub mod pipeline;
pub mod prompts;
pub mod resolver;
pub mod systems;
pub mod zones;

// Re-export commonly used types
pub use crate::abilities::{
    AbilityDefinition, AbilityKind, AbilityRegistry, ChoosingPlayer, ControllerFilter,
    CostDirective, TargetCount, TargetResolver,
};
pub use crate::cards::{
    Aspect, CardDefinition, CardInstance, CardRegistry, CardType, KeywordInstance, NumericKeyword,
};
pub use crate::core::{
    AbilityId, CardId, DefinitionId, GameRng, GameState, Message, MessageLog, PlayerId, PlayerMap,
    PlayerState, Prop, ResolutionId,
};
pub use crate::costs::{
    adjusted_cost, mark_used_adjusters, penalty_aspects, AdjusterScope, AdjusterUses, CostAdjuster,
    PlayDetails, PlayType, ASPECT_PENALTY,
};
pub use crate::engine::{Engine, RunStatus};
pub use crate::error::{EngineError, Result};
pub use crate::events::{
    apply_mutation, ApplyOutcome, Event, EventCondition, EventKind, EventMutation, EventPlacement,
    EventWindow, LegalitySnapshot, Reaction, ReactionRegistry, ReactionResponse, TargetRef,
    WindowOutcome,
};
pub use crate::filters::{CardTypeFilter, ZoneFilter};
pub use crate::pipeline::{Pipeline, Step};
pub use crate::prompts::{PromptKind, PromptRequest};
pub use crate::resolver::{AbilityContext, CostOutcome, Resolution, Stage, StepOutcome};
pub use crate::systems::{
    all_targets_legal, can_affect, condition_holds, generate_events_for_all_targets,
    has_legal_target, resolve_shape_targets, GameSystem, GeneratedEvents, SystemEffect, SystemTag,
    TargetShape, UnlessCost, WhichPlayer,
};
pub use crate::zones::{legal_destination, ZoneKind, ZoneManager, ZonePosition};
