//! Zone system: where cards live and how they move.
//!
//! Zones are owned by exactly one player. All movement goes through
//! [`ZoneManager`], which always mutates the owning player's zone
//! lists regardless of who requested the move - the single-owner
//! invariant from the concurrency model.

mod manager;

pub use manager::{ZoneManager, ZonePosition};

use serde::{Deserialize, Serialize};

use crate::cards::CardType;

/// The kinds of zone a player owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Hand,
    Deck,
    Discard,
    Resource,
    GroundArena,
    SpaceArena,
    Base,
}

impl ZoneKind {
    /// Is this an in-play arena?
    #[must_use]
    pub const fn is_arena(self) -> bool {
        matches!(self, ZoneKind::GroundArena | ZoneKind::SpaceArena)
    }

    /// Every zone kind, in a stable order.
    pub const ALL: [ZoneKind; 7] = [
        ZoneKind::Hand,
        ZoneKind::Deck,
        ZoneKind::Discard,
        ZoneKind::Resource,
        ZoneKind::GroundArena,
        ZoneKind::SpaceArena,
        ZoneKind::Base,
    ];

    /// Human-readable zone name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ZoneKind::Hand => "hand",
            ZoneKind::Deck => "deck",
            ZoneKind::Discard => "discard",
            ZoneKind::Resource => "resources",
            ZoneKind::GroundArena => "ground arena",
            ZoneKind::SpaceArena => "space arena",
            ZoneKind::Base => "base",
        }
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Can a card of this type legally sit in this zone?
///
/// In-play zones are restrictive: only units, upgrades, and deployed
/// leaders belong in an arena; only the base card and leader belong in
/// the base zone. Out-of-play zones accept anything.
#[must_use]
pub fn legal_destination(card_type: CardType, zone: ZoneKind) -> bool {
    match zone {
        ZoneKind::GroundArena | ZoneKind::SpaceArena => matches!(
            card_type,
            CardType::Unit | CardType::Upgrade | CardType::Leader
        ),
        ZoneKind::Base => matches!(card_type, CardType::Base | CardType::Leader),
        ZoneKind::Hand | ZoneKind::Deck | ZoneKind::Discard | ZoneKind::Resource => true,
    }
}
