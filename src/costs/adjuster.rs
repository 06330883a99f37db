//! Cost adjusters: registered modifiers of a play's resource cost.
//!
//! Each player owns a registry of adjusters. An adjuster matches a
//! play through its scope (play type, card type, a specific card, a
//! specific penalty aspect), contributes a signed amount, may declare
//! a floor below which it refuses to let the cost drop, and expires
//! after a number of uses.

use smallvec::SmallVec;

use crate::cards::{Aspect, CardType};
use crate::core::{CardId, PlayerId, Prop};
use crate::filters::CardTypeFilter;

/// How a card is being played or used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayType {
    /// Played from hand for its printed cost.
    PlayFromHand,
    /// Played from the resource zone via its Smuggle cost.
    Smuggle,
    /// An activated ability being used.
    Activate,
}

/// Everything an adjuster may inspect about the play being priced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayDetails {
    /// The player making the play.
    pub player: PlayerId,

    /// The card being played or whose ability is being activated.
    pub card: CardId,

    /// How the card is being played.
    pub play_type: PlayType,

    /// The play's chosen target, when one exists at pricing time.
    pub target: Option<CardId>,
}

/// The applicability predicate of an adjuster.
#[derive(Clone, Debug)]
pub struct AdjusterScope {
    /// Play types this adjuster applies to. Empty means any.
    pub play_types: SmallVec<[PlayType; 2]>,

    /// Card types this adjuster applies to.
    pub card_types: CardTypeFilter,

    /// Restrict to plays of one specific card instance.
    pub card: Option<CardId>,

    /// Restrict to plays targeting one specific card.
    pub target: Option<CardId>,

    /// `None`: adjusts the base-cost pass. `Some(aspect)`: adjusts the
    /// penalty pass for that aspect only.
    pub penalty_aspect: Option<Aspect>,
}

impl AdjusterScope {
    /// A scope matching every base-cost pass.
    #[must_use]
    pub fn any() -> Self {
        Self {
            play_types: SmallVec::new(),
            card_types: CardTypeFilter::Any,
            card: None,
            target: None,
            penalty_aspect: None,
        }
    }

    /// Restrict to one play type (builder pattern).
    #[must_use]
    pub fn for_play_type(mut self, play_type: PlayType) -> Self {
        self.play_types.push(play_type);
        self
    }

    /// Restrict to a card-type filter (builder pattern).
    #[must_use]
    pub fn for_card_types(mut self, filter: CardTypeFilter) -> Self {
        self.card_types = filter;
        self
    }

    /// Restrict to one card instance (builder pattern).
    #[must_use]
    pub fn for_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }

    /// Apply to the penalty pass for one aspect (builder pattern).
    #[must_use]
    pub fn for_penalty_aspect(mut self, aspect: Aspect) -> Self {
        self.penalty_aspect = Some(aspect);
        self
    }

    /// Does this scope match the given play and pricing pass?
    ///
    /// `penalty` is `None` for the base-cost pass, or the aspect of
    /// the penalty pass being priced.
    #[must_use]
    pub fn matches(
        &self,
        play: &PlayDetails,
        card_type: CardType,
        penalty: Option<Aspect>,
    ) -> bool {
        if !self.play_types.is_empty() && !self.play_types.contains(&play.play_type) {
            return false;
        }
        if !self.card_types.matches(card_type) {
            return false;
        }
        if let Some(card) = self.card {
            if card != play.card {
                return false;
            }
        }
        if let Some(target) = self.target {
            if play.target != Some(target) {
                return false;
            }
        }
        self.penalty_aspect == penalty
    }
}

/// Remaining uses of an adjuster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdjusterUses {
    /// Never expires.
    Unlimited,
    /// Expires when the count reaches zero.
    Limited(u32),
}

/// A registered cost modifier.
#[derive(Clone, Debug)]
pub struct CostAdjuster {
    /// The card whose effect registered this adjuster.
    pub source: CardId,

    /// When the adjuster applies.
    pub scope: AdjusterScope,

    /// Signed amount: positive increases the cost, negative decreases
    /// it. Literal or computed from the play.
    pub amount: Prop<i32, PlayDetails>,

    /// A decrease never drags the cost below this floor.
    pub floor: Option<i32>,

    /// Uses before the adjuster expires.
    pub uses: AdjusterUses,
}

impl CostAdjuster {
    /// Create an unlimited adjuster with a literal amount.
    #[must_use]
    pub fn new(source: CardId, scope: AdjusterScope, amount: i32) -> Self {
        Self {
            source,
            scope,
            amount: Prop::Value(amount),
            floor: None,
            uses: AdjusterUses::Unlimited,
        }
    }

    /// Set a computed amount (builder pattern).
    #[must_use]
    pub fn with_amount(mut self, amount: Prop<i32, PlayDetails>) -> Self {
        self.amount = amount;
        self
    }

    /// Declare a floor (builder pattern).
    #[must_use]
    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Limit the number of uses (builder pattern).
    #[must_use]
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.uses = AdjusterUses::Limited(uses);
        self
    }

    /// Consume one use. Returns `false` when the adjuster is spent
    /// and should be removed.
    pub fn spend_use(&mut self) -> bool {
        match &mut self.uses {
            AdjusterUses::Unlimited => true,
            AdjusterUses::Limited(n) => {
                *n = n.saturating_sub(1);
                *n > 0
            }
        }
    }
}
