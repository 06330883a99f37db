//! Card definitions - static printed-card data.
//!
//! A `CardDefinition` is the shared, immutable description of a card:
//! type, printed cost, aspects, keyword configuration, and the
//! abilities it grants. Runtime state lives on `CardInstance`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AbilityId, DefinitionId};
use crate::zones::ZoneKind;

use super::keywords::KeywordInstance;

/// Card/player alignment tag used to compute cost penalties.
///
/// A player's leader and base grant aspects; playing a card whose
/// aspects the player does not have incurs a penalty per missing
/// aspect. Aspects are multiset-valued: a card may carry the same
/// aspect twice and each copy must be matched separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    Command,
    Valor,
    Fury,
    Guile,
    Light,
    Shadow,
}

/// The printed type of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Leader,
    Base,
    Unit,
    Upgrade,
    Event,
}

impl CardType {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::Leader => "leader",
            CardType::Base => "base",
            CardType::Unit => "unit",
            CardType::Upgrade => "upgrade",
            CardType::Event => "event",
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static definition of a card.
#[derive(Clone, Debug)]
pub struct CardDefinition {
    /// Unique identifier for this definition.
    pub id: DefinitionId,

    /// Card title.
    pub title: String,

    /// Printed type.
    pub card_type: CardType,

    /// Printed resource cost.
    pub cost: i32,

    /// Hit points (units and bases).
    pub hp: i32,

    /// Attack power (units).
    pub power: i32,

    /// Aspect icons on the card (multiset).
    pub aspects: SmallVec<[Aspect; 2]>,

    /// The arena this card enters when played (units only).
    pub arena: Option<ZoneKind>,

    /// Parsed keyword configuration, supplied at setup time.
    pub keywords: Vec<KeywordInstance>,

    /// Abilities this card grants.
    pub abilities: Vec<AbilityId>,
}

impl CardDefinition {
    /// Create a new definition with no aspects, keywords, or abilities.
    pub fn new(id: DefinitionId, title: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            title: title.into(),
            card_type,
            cost: 0,
            hp: 0,
            power: 0,
            aspects: SmallVec::new(),
            arena: None,
            keywords: Vec::new(),
            abilities: Vec::new(),
        }
    }

    /// Set the printed cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    /// Set power and hp (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, power: i32, hp: i32) -> Self {
        self.power = power;
        self.hp = hp;
        self
    }

    /// Add an aspect icon (builder pattern).
    #[must_use]
    pub fn with_aspect(mut self, aspect: Aspect) -> Self {
        self.aspects.push(aspect);
        self
    }

    /// Set the entry arena for a unit (builder pattern).
    #[must_use]
    pub fn with_arena(mut self, arena: ZoneKind) -> Self {
        self.arena = Some(arena);
        self
    }

    /// Add a keyword instance (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: KeywordInstance) -> Self {
        self.keywords.push(keyword);
        self
    }

    /// Grant an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.abilities.push(ability);
        self
    }

    /// The Smuggle keyword instance, if the card has one.
    #[must_use]
    pub fn smuggle(&self) -> Option<&KeywordInstance> {
        self.keywords
            .iter()
            .find(|k| matches!(k, KeywordInstance::Smuggle { .. }))
    }
}
