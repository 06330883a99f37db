//! Game systems: the action/effect abstraction.
//!
//! A `GameSystem` is the single abstraction through which game-state
//! mutation flows. It is stateless aside from configuration: what the
//! effect does ([`SystemEffect`]), how it finds its targets
//! ([`TargetShape`]), whether it can be cancelled mid-effect, and any
//! "unless" cost a target's controller may pay to receive the effect.
//!
//! Targets are supplied per call; a system never owns them. Shared
//! target, legality, and event logic is free functions over the
//! variants rather than methods on a hierarchy.

use smallvec::SmallVec;

use crate::cards::CardType;
use crate::core::{CardId, GameState, PlayerId, Prop};
use crate::events::{Event, EventCondition, EventKind, EventMutation, LegalitySnapshot, TargetRef};
use crate::filters::{CardTypeFilter, ZoneFilter};
use crate::resolver::{AbilityContext, Stage};
use crate::zones::ZoneKind;

/// Identifies a system for restriction effects and re-entry guards.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum SystemTag {
    Damage,
    Heal,
    Defeat,
    Exhaust,
    Ready,
    Move,
    Draw,
    PayResources,
}

/// What a system does, with properties that are literal or computed
/// from the resolution context.
#[derive(Clone, Debug)]
pub enum SystemEffect {
    DealDamage { amount: Prop<i32, AbilityContext> },
    Heal { amount: Prop<i32, AbilityContext> },
    Defeat,
    Exhaust,
    Ready,
    MoveCard { to: ZoneKind },
    Draw { count: Prop<u32, AbilityContext> },
    PayResources { amount: Prop<i32, AbilityContext> },
}

impl SystemEffect {
    /// The tag naming this system.
    #[must_use]
    pub fn tag(&self) -> SystemTag {
        match self {
            SystemEffect::DealDamage { .. } => SystemTag::Damage,
            SystemEffect::Heal { .. } => SystemTag::Heal,
            SystemEffect::Defeat => SystemTag::Defeat,
            SystemEffect::Exhaust => SystemTag::Exhaust,
            SystemEffect::Ready => SystemTag::Ready,
            SystemEffect::MoveCard { .. } => SystemTag::Move,
            SystemEffect::Draw { .. } => SystemTag::Draw,
            SystemEffect::PayResources { .. } => SystemTag::PayResources,
        }
    }

    /// Card types this system may affect.
    #[must_use]
    pub fn affected_types(&self) -> CardTypeFilter {
        match self {
            SystemEffect::DealDamage { .. } | SystemEffect::Heal { .. } => {
                CardTypeFilter::any_of([CardType::Unit, CardType::Base, CardType::Leader])
            }
            SystemEffect::Defeat | SystemEffect::Exhaust | SystemEffect::Ready => {
                CardTypeFilter::any_of([CardType::Unit, CardType::Upgrade, CardType::Leader])
            }
            SystemEffect::MoveCard { .. } => CardTypeFilter::Any,
            SystemEffect::Draw { .. } | SystemEffect::PayResources { .. } => CardTypeFilter::Any,
        }
    }

    /// Zones a card target must occupy for this system to reach it.
    #[must_use]
    pub fn affected_zones(&self) -> ZoneFilter {
        match self {
            SystemEffect::DealDamage { .. } | SystemEffect::Heal { .. } => ZoneFilter::any_of([
                ZoneKind::GroundArena,
                ZoneKind::SpaceArena,
                ZoneKind::Base,
            ]),
            SystemEffect::Defeat => ZoneFilter::AnyArena,
            SystemEffect::Exhaust | SystemEffect::Ready => ZoneFilter::any_of([
                ZoneKind::GroundArena,
                ZoneKind::SpaceArena,
                ZoneKind::Resource,
            ]),
            SystemEffect::MoveCard { .. } => ZoneFilter::Any,
            SystemEffect::Draw { .. } | SystemEffect::PayResources { .. } => ZoneFilter::Any,
        }
    }

    /// Does this system act on players rather than cards?
    #[must_use]
    pub fn targets_players(&self) -> bool {
        matches!(
            self,
            SystemEffect::Draw { .. } | SystemEffect::PayResources { .. }
        )
    }

    /// The event kind this system's events carry.
    #[must_use]
    pub fn event_kind(&self) -> EventKind {
        match self {
            SystemEffect::DealDamage { .. } => EventKind::DamageDealt,
            SystemEffect::Heal { .. } => EventKind::Healed,
            SystemEffect::Defeat => EventKind::CardDefeated,
            SystemEffect::MoveCard { .. } => EventKind::CardMoved,
            SystemEffect::Exhaust => EventKind::CardExhausted,
            SystemEffect::Ready => EventKind::CardReadied,
            SystemEffect::Draw { .. } => EventKind::CardsDrawn,
            SystemEffect::PayResources { .. } => EventKind::ResourcesPaid,
        }
    }

    /// Describe the effect for chat messages.
    #[must_use]
    pub fn describe(&self, ctx: &AbilityContext) -> String {
        match self {
            SystemEffect::DealDamage { amount } => {
                format!("deal {} damage", amount.resolve(ctx))
            }
            SystemEffect::Heal { amount } => format!("heal {} damage", amount.resolve(ctx)),
            SystemEffect::Defeat => "defeat".to_string(),
            SystemEffect::Exhaust => "exhaust".to_string(),
            SystemEffect::Ready => "ready".to_string(),
            SystemEffect::MoveCard { to } => format!("move to the {to}"),
            SystemEffect::Draw { count } => format!("draw {}", count.resolve(ctx)),
            SystemEffect::PayResources { amount } => {
                format!("pay {} resources", amount.resolve(ctx))
            }
        }
    }
}

/// Which player a player-shaped system acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhichPlayer {
    Controller,
    Opponent,
}

/// How a system finds its targets.
///
/// The two shapes that matter for the contract: systems with no
/// inherent target derive one from the context; systems with a
/// card/player target pull from the resolution's chosen-target slots.
#[derive(Clone, Debug)]
pub enum TargetShape {
    /// No inherent target; derived from context at resolution time.
    NoTarget {
        default: Prop<TargetRef, AbilityContext>,
    },
    /// One card from a chosen-target slot.
    SingleCard { slot: usize },
    /// Every card in a chosen-target slot.
    MultiCard { slot: usize },
    /// A player relative to the ability's controller.
    Player { who: WhichPlayer },
}

/// An additional cost the affected card's controller may pay; the
/// event is only emitted for targets whose cost was paid.
#[derive(Clone, Debug)]
pub struct UnlessCost {
    /// Resources the target's controller must pay.
    pub amount: Prop<i32, AbilityContext>,
}

/// One configured action/effect.
#[derive(Clone, Debug)]
pub struct GameSystem {
    /// What the system does.
    pub effect: SystemEffect,

    /// How it finds targets.
    pub shape: TargetShape,

    /// Mid-effect, a non-cancellable system ignores restriction tags.
    pub cannot_be_canceled: bool,

    /// Optional per-target additional cost.
    pub unless_cost: Option<UnlessCost>,
}

/// Derive the ability's source card as a target.
pub fn source_target(ctx: &AbilityContext) -> TargetRef {
    TargetRef::Card(ctx.source)
}

impl GameSystem {
    /// Create a system with an explicit shape.
    #[must_use]
    pub fn new(effect: SystemEffect, shape: TargetShape) -> Self {
        Self {
            effect,
            shape,
            cannot_be_canceled: false,
            unless_cost: None,
        }
    }

    /// Create a system acting on the ability's source card.
    #[must_use]
    pub fn on_source(effect: SystemEffect) -> Self {
        Self::new(
            effect,
            TargetShape::NoTarget {
                default: Prop::Derived(source_target),
            },
        )
    }

    /// Create a system acting on a chosen-target slot.
    #[must_use]
    pub fn on_slot(effect: SystemEffect, slot: usize) -> Self {
        Self::new(effect, TargetShape::MultiCard { slot })
    }

    /// Mark as non-cancellable (builder pattern).
    #[must_use]
    pub fn non_cancellable(mut self) -> Self {
        self.cannot_be_canceled = true;
        self
    }

    /// Attach an unless-cost (builder pattern).
    #[must_use]
    pub fn with_unless_cost(mut self, amount: Prop<i32, AbilityContext>) -> Self {
        self.unless_cost = Some(UnlessCost { amount });
        self
    }

    /// Freeze the legality data this system's events re-check at
    /// apply time.
    #[must_use]
    pub fn snapshot(&self, ctx: &AbilityContext) -> LegalitySnapshot {
        LegalitySnapshot {
            tag: self.effect.tag(),
            types: self.effect.affected_types(),
            zones: self.effect.affected_zones(),
            cannot_be_canceled: self.cannot_be_canceled,
            chain: ctx.chain.clone(),
            mid_effect: ctx.stage == Stage::Effect,
        }
    }

    /// Build the event for one target, resolving computed properties
    /// against the context now and freezing them into the mutation.
    #[must_use]
    pub fn build_event(&self, ctx: &AbilityContext, target: TargetRef) -> Option<Event> {
        let mutation = match (&self.effect, target) {
            (SystemEffect::DealDamage { amount }, TargetRef::Card(card)) => {
                EventMutation::DealDamage { card, amount: amount.resolve(ctx) }
            }
            (SystemEffect::Heal { amount }, TargetRef::Card(card)) => {
                EventMutation::Heal { card, amount: amount.resolve(ctx) }
            }
            (SystemEffect::Defeat, TargetRef::Card(card)) => EventMutation::Defeat { card },
            (SystemEffect::MoveCard { to }, TargetRef::Card(card)) => {
                EventMutation::Move { card, to: *to }
            }
            (SystemEffect::Exhaust, TargetRef::Card(card)) => EventMutation::Exhaust { card },
            (SystemEffect::Ready, TargetRef::Card(card)) => EventMutation::Ready { card },
            (SystemEffect::Draw { count }, TargetRef::Player(player)) => {
                EventMutation::Draw { player, count: count.resolve(ctx) }
            }
            (SystemEffect::PayResources { amount }, TargetRef::Player(player)) => {
                EventMutation::PayResources { player, amount: amount.resolve(ctx) }
            }
            _ => return None,
        };

        Some(
            Event::new(self.effect.event_kind(), target, mutation)
                .with_condition(EventCondition::StillAffectable(self.snapshot(ctx))),
        )
    }
}

// === Shared legality logic ===

/// Core legality check shared by generation-time `can_affect` and the
/// apply-time condition re-check.
fn card_affectable(
    state: &GameState,
    card: CardId,
    tag: SystemTag,
    types: &CardTypeFilter,
    zones: &ZoneFilter,
    override_restrictions: bool,
    chain: &[SystemTag],
) -> bool {
    let Some(instance) = state.card(card) else {
        return false;
    };
    let Some(def) = state.definitions.get(instance.definition) else {
        return false;
    };

    if !types.matches(def.card_type) || !zones.matches(instance.zone) {
        return false;
    }

    // A system already entered earlier in the chain cannot re-enter.
    if chain.contains(&tag) {
        return false;
    }

    if instance.restricted_against(tag) && !override_restrictions {
        return false;
    }

    true
}

/// Can this system affect this target right now, in this resolution?
///
/// True iff the target's runtime type and zone match the system's
/// declared filters, the system is not re-entering the resolution
/// chain, and no restriction effect on the target names this system -
/// unless resolution is mid-effect and the system is marked
/// non-cancellable.
#[must_use]
pub fn can_affect(
    state: &GameState,
    system: &GameSystem,
    target: TargetRef,
    ctx: &AbilityContext,
) -> bool {
    match target {
        TargetRef::Card(card) => {
            let override_restrictions =
                ctx.stage == Stage::Effect && system.cannot_be_canceled;
            card_affectable(
                state,
                card,
                system.effect.tag(),
                &system.effect.affected_types(),
                &system.effect.affected_zones(),
                override_restrictions,
                &ctx.chain,
            )
        }
        TargetRef::Player(_) => system.effect.targets_players(),
        TargetRef::None => false,
    }
}

/// Apply-time re-check of an event condition.
///
/// Re-validation supersedes creation-time legality: an event queued
/// against a then-legal target must not apply if the target has since
/// become illegal.
#[must_use]
pub fn condition_holds(state: &GameState, condition: &EventCondition, target: TargetRef) -> bool {
    match condition {
        EventCondition::Always => true,
        EventCondition::StillAffectable(snap) => match target {
            TargetRef::Card(card) => card_affectable(
                state,
                card,
                snap.tag,
                &snap.types,
                &snap.zones,
                snap.mid_effect && snap.cannot_be_canceled,
                &snap.chain,
            ),
            TargetRef::Player(_) => true,
            TargetRef::None => false,
        },
    }
}

/// Resolve the targets a system acts on, from its shape plus the
/// resolution's chosen-target slots.
#[must_use]
pub fn resolve_shape_targets(
    system: &GameSystem,
    ctx: &AbilityContext,
) -> SmallVec<[TargetRef; 3]> {
    match &system.shape {
        TargetShape::NoTarget { default } => SmallVec::from_elem(default.resolve(ctx), 1),
        TargetShape::SingleCard { slot } => ctx
            .chosen(*slot)
            .first()
            .map(|&c| SmallVec::from_elem(TargetRef::Card(c), 1))
            .unwrap_or_default(),
        TargetShape::MultiCard { slot } => ctx
            .chosen(*slot)
            .iter()
            .map(|&c| TargetRef::Card(c))
            .collect(),
        TargetShape::Player { who } => {
            let player = match who {
                WhichPlayer::Controller => ctx.player,
                WhichPlayer::Opponent => ctx.player.opponent(),
            };
            SmallVec::from_elem(TargetRef::Player(player), 1)
        }
    }
}

/// Existential quantification of `can_affect` over the resolved targets.
#[must_use]
pub fn has_legal_target(state: &GameState, system: &GameSystem, ctx: &AbilityContext) -> bool {
    resolve_shape_targets(system, ctx)
        .iter()
        .any(|&t| can_affect(state, system, t, ctx))
}

/// Universal quantification of `can_affect` over the resolved targets.
#[must_use]
pub fn all_targets_legal(state: &GameState, system: &GameSystem, ctx: &AbilityContext) -> bool {
    let targets = resolve_shape_targets(system, ctx);
    !targets.is_empty() && targets.iter().all(|&t| can_affect(state, system, t, ctx))
}

/// A target whose unless-cost must be offered to its controller
/// before the event may be emitted.
#[derive(Clone, Debug)]
pub struct UnlessPrompt {
    /// The player who may pay.
    pub payer: PlayerId,

    /// Resources to pay.
    pub amount: i32,

    /// The event to emit if (and only if) the cost is paid.
    pub event: Event,
}

/// Events generated for a system across all its targets.
#[derive(Clone, Debug, Default)]
pub struct GeneratedEvents {
    /// Events ready to queue directly.
    pub events: Vec<Event>,

    /// Per-target unless-cost decisions still owed to a player.
    /// Paying (or failing to pay) one target's cost never affects
    /// another target's event.
    pub unless_prompts: Vec<UnlessPrompt>,
}

/// Generate events for every legal target of a system.
///
/// Targets with an unpayable unless-cost are omitted outright; targets
/// with a payable one become prompts; the rest become events.
#[must_use]
pub fn generate_events_for_all_targets(
    state: &GameState,
    system: &GameSystem,
    ctx: &AbilityContext,
) -> GeneratedEvents {
    let mut generated = GeneratedEvents::default();

    for target in resolve_shape_targets(system, ctx) {
        if !can_affect(state, system, target, ctx) {
            continue;
        }
        let Some(event) = system.build_event(ctx, target) else {
            continue;
        };

        match &system.unless_cost {
            None => generated.events.push(event),
            Some(unless) => {
                let amount = unless.amount.resolve(ctx);
                let payer = match target {
                    TargetRef::Card(card) => match state.card(card) {
                        Some(instance) => instance.controller,
                        None => continue,
                    },
                    TargetRef::Player(player) => player,
                    TargetRef::None => continue,
                };

                if state.ready_resources(payer) < amount {
                    // Unpayable: exactly this target's event is omitted.
                    continue;
                }
                generated.unless_prompts.push(UnlessPrompt { payer, amount, event });
            }
        }
    }

    generated
}
