//! Ability definitions: the card-content seam.
//!
//! Card implementations register `AbilityDefinition`s describing how
//! an ability targets, what it costs, and which systems its effect
//! runs. The resolver drives these declaratively; the only opaque
//! callback is the per-target legality predicate.

use crate::core::{AbilityId, CardId, GameState};
use crate::costs::PlayType;
use crate::events::EventKind;
use crate::filters::{CardTypeFilter, ZoneFilter};
use crate::resolver::AbilityContext;
use crate::systems::GameSystem;

/// How an ability entered resolution; decides the initiation event
/// kind other abilities can react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityKind {
    /// A generic (engine- or effect-created) ability.
    Ability,
    /// A triggered/constant ability printed on a card.
    CardAbility,
    /// The act of playing a card.
    CardPlay,
    /// A player-activated ability with costs.
    Activated,
}

impl AbilityKind {
    /// The initiation event kind announced for this ability.
    #[must_use]
    pub fn initiation_kind(self) -> EventKind {
        match self {
            AbilityKind::Ability => EventKind::AbilityInitiated,
            AbilityKind::CardAbility => EventKind::CardAbilityInitiated,
            AbilityKind::CardPlay => EventKind::CardPlayed,
            AbilityKind::Activated => EventKind::ActivatedAbilityTriggered,
        }
    }
}

/// A cost the ability's controller must pay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostDirective {
    /// Exhaust the source card. Unpayable if already exhausted.
    ExhaustSource,
    /// Pay the source card's printed cost, run through the
    /// cost-adjustment pipeline for the given play type.
    PayAdjustedCost { play_type: PlayType },
    /// Pay a fixed number of resources.
    PayFixedResources { amount: i32 },
}

/// Which player's cards a target resolver accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerFilter {
    Any,
    Controller,
    Opponent,
}

/// How many targets a resolver wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetCount {
    Exactly(usize),
    UpTo(usize),
}

impl TargetCount {
    /// Minimum number of targets required for legality.
    #[must_use]
    pub fn min(self) -> usize {
        match self {
            TargetCount::Exactly(n) => n,
            TargetCount::UpTo(_) => 0,
        }
    }

    /// Maximum number of targets that may be chosen.
    #[must_use]
    pub fn max(self) -> usize {
        match self {
            TargetCount::Exactly(n) | TargetCount::UpTo(n) => n,
        }
    }
}

/// Who picks the targets for a resolver.
///
/// Opponent-chosen resolvers are deferred: they resolve in the target
/// stage even when the ability targets before costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoosingPlayer {
    Controller,
    Opponent,
}

/// One target slot of an ability.
#[derive(Clone, Debug)]
pub struct TargetResolver {
    /// Card types that may be chosen.
    pub types: CardTypeFilter,

    /// Zones candidates may occupy.
    pub zone: ZoneFilter,

    /// Whose cards may be chosen, relative to the acting player.
    pub controller: ControllerFilter,

    /// How many targets to choose.
    pub count: TargetCount,

    /// Who makes the choice.
    pub choosing: ChoosingPlayer,

    /// Index of a slot that must be resolved before this one.
    pub depends_on: Option<usize>,

    /// Card-supplied legality predicate, if any.
    pub legal: Option<fn(&GameState, CardId, &AbilityContext) -> bool>,
}

impl TargetResolver {
    /// A resolver for one card anywhere in the arenas.
    #[must_use]
    pub fn single(types: CardTypeFilter) -> Self {
        Self {
            types,
            zone: ZoneFilter::AnyArena,
            controller: ControllerFilter::Any,
            count: TargetCount::Exactly(1),
            choosing: ChoosingPlayer::Controller,
            depends_on: None,
            legal: None,
        }
    }

    /// Set the zone filter (builder pattern).
    #[must_use]
    pub fn in_zone(mut self, zone: ZoneFilter) -> Self {
        self.zone = zone;
        self
    }

    /// Set the controller filter (builder pattern).
    #[must_use]
    pub fn controlled_by(mut self, controller: ControllerFilter) -> Self {
        self.controller = controller;
        self
    }

    /// Set the target count (builder pattern).
    #[must_use]
    pub fn counting(mut self, count: TargetCount) -> Self {
        self.count = count;
        self
    }

    /// Let the opponent choose (builder pattern).
    #[must_use]
    pub fn chosen_by_opponent(mut self) -> Self {
        self.choosing = ChoosingPlayer::Opponent;
        self
    }

    /// Require another slot to resolve first (builder pattern).
    #[must_use]
    pub fn after_slot(mut self, slot: usize) -> Self {
        self.depends_on = Some(slot);
        self
    }

    /// Attach a legality predicate (builder pattern).
    #[must_use]
    pub fn with_legality(
        mut self,
        legal: fn(&GameState, CardId, &AbilityContext) -> bool,
    ) -> Self {
        self.legal = Some(legal);
        self
    }

    /// Filter-level candidates for this slot: every card matching the
    /// type, zone, controller, and legality predicate.
    #[must_use]
    pub fn candidates(&self, state: &GameState, ctx: &AbilityContext) -> Vec<CardId> {
        let mut out = Vec::new();
        for owner in crate::core::PlayerId::both() {
            for zone in crate::zones::ZoneKind::ALL {
                if !self.zone.matches(zone) {
                    continue;
                }
                for &card in state.zones.cards_in(owner, zone) {
                    if self.accepts(state, card, ctx) {
                        out.push(card);
                    }
                }
            }
        }
        out
    }

    /// Does a single card pass this resolver's filters?
    pub(crate) fn accepts(&self, state: &GameState, card: CardId, ctx: &AbilityContext) -> bool {
        let Some(instance) = state.card(card) else {
            return false;
        };
        let Some(def) = state.definitions.get(instance.definition) else {
            return false;
        };

        if !self.types.matches(def.card_type) || !self.zone.matches(instance.zone) {
            return false;
        }
        match self.controller {
            ControllerFilter::Any => {}
            ControllerFilter::Controller => {
                if instance.controller != ctx.player {
                    return false;
                }
            }
            ControllerFilter::Opponent => {
                if instance.controller != ctx.player.opponent() {
                    return false;
                }
            }
        }
        match self.legal {
            Some(legal) => legal(state, card, ctx),
            None => true,
        }
    }
}

/// A registered ability: targeting, costs, effect systems, messaging.
#[derive(Clone, Debug)]
pub struct AbilityDefinition {
    /// Unique id.
    pub id: AbilityId,

    /// Display title used in messages.
    pub title: String,

    /// How the ability enters resolution.
    pub kind: AbilityKind,

    /// Optional abilities offer the Pass affordance.
    pub optional: bool,

    /// Resolve targets before costs are paid.
    pub targets_before_costs: bool,

    /// Costs to resolve and pay.
    pub costs: Vec<CostDirective>,

    /// Target slots, indexed by position.
    pub target_resolvers: Vec<TargetResolver>,

    /// The effect: systems run against the chosen targets.
    pub effects: Vec<GameSystem>,

    /// Message displayed when effects initiate.
    pub message: Option<String>,

    /// Per-card-instance usage limit, if any.
    pub limit: Option<u32>,
}

impl AbilityDefinition {
    /// Create an ability with no targets, costs, or effects.
    pub fn new(id: AbilityId, title: impl Into<String>, kind: AbilityKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            optional: false,
            targets_before_costs: false,
            costs: Vec::new(),
            target_resolvers: Vec::new(),
            effects: Vec::new(),
            message: None,
            limit: None,
        }
    }

    /// Mark optional (builder pattern).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Target before paying costs (builder pattern).
    #[must_use]
    pub fn targeting_before_costs(mut self) -> Self {
        self.targets_before_costs = true;
        self
    }

    /// Add a cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: CostDirective) -> Self {
        self.costs.push(cost);
        self
    }

    /// Add a target slot (builder pattern).
    #[must_use]
    pub fn with_target(mut self, resolver: TargetResolver) -> Self {
        self.target_resolvers.push(resolver);
        self
    }

    /// Add an effect system (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, system: GameSystem) -> Self {
        self.effects.push(system);
        self
    }

    /// Set the display message (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Limit uses per card instance (builder pattern).
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
