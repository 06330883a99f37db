//! Ability context: the record threaded through one resolution.
//!
//! The context identifies the ability, its source card, and the acting
//! player, and accumulates chosen targets and cost results as the
//! stages run. Stage transitions go through [`AbilityContext::advance`],
//! which returns a new context value with the transition recorded -
//! resolution history stays inspectable instead of being overwritten
//! in place.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{AbilityId, CardId, PlayerId};
use crate::costs::PlayDetails;
use crate::events::Event;
use crate::systems::SystemTag;

/// Resolution stages, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    /// Initial stage; early targeting happens here.
    PreTarget,
    /// Costs are being resolved and paid.
    Cost,
    /// Targets are being (re-)resolved.
    Target,
    /// The effect handler is executing.
    Effect,
}

/// Result of resolving an ability's costs.
#[derive(Clone, Debug, Default)]
pub struct CostOutcome {
    /// A cost could not be resolved; the ability must cancel.
    pub canceled: bool,

    /// Cost events to pay in a window.
    pub events: Vec<Event>,

    /// Whether a play cost applies to this resolution.
    pub play_cost: bool,

    /// Whether a trigger (activation) cost applies.
    pub trigger_cost: bool,

    /// The priced play, kept so paying can consume matching adjusters.
    pub adjusted_play: Option<PlayDetails>,
}

/// The per-resolution record handed to systems and stages.
#[derive(Clone, Debug)]
pub struct AbilityContext {
    /// The ability being resolved.
    pub ability: AbilityId,

    /// The card the ability belongs to.
    pub source: CardId,

    /// The controlling player.
    pub player: PlayerId,

    /// Current stage.
    pub stage: Stage,

    /// Cost resolution results.
    pub cost: CostOutcome,

    /// Systems already entered during this resolution; guards against
    /// a system re-entering itself.
    pub chain: SmallVec<[SystemTag; 4]>,

    /// Chosen targets per slot.
    targets: FxHashMap<usize, Vec<CardId>>,

    /// Every stage entered, in order.
    history: Vec<Stage>,
}

impl AbilityContext {
    /// Create a context at the initial stage.
    #[must_use]
    pub fn new(ability: AbilityId, source: CardId, player: PlayerId) -> Self {
        Self {
            ability,
            source,
            player,
            stage: Stage::PreTarget,
            cost: CostOutcome::default(),
            chain: SmallVec::new(),
            targets: FxHashMap::default(),
            history: vec![Stage::PreTarget],
        }
    }

    /// Transition to a stage, returning the new context value with the
    /// transition recorded.
    #[must_use]
    pub fn advance(&self, stage: Stage) -> Self {
        let mut next = self.clone();
        next.stage = stage;
        next.history.push(stage);
        next
    }

    /// Every stage this resolution has entered, in order.
    #[must_use]
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Chosen targets for a slot.
    #[must_use]
    pub fn chosen(&self, slot: usize) -> &[CardId] {
        self.targets.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record a chosen target.
    pub fn choose(&mut self, slot: usize, card: CardId) {
        self.targets.entry(slot).or_default().push(card);
    }

    /// Discard every chosen target (retargeting from scratch).
    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Total number of chosen targets across all slots.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.values().map(Vec::len).sum()
    }
}
