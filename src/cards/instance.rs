//! Card instances - runtime card state.
//!
//! `CardInstance` is a specific card in a specific game: who owns and
//! controls it, where it is, how much damage it has taken, what is
//! attached to it, and which systems are currently forbidden from
//! affecting it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AbilityId, CardId, DefinitionId, PlayerId};
use crate::systems::SystemTag;
use crate::zones::ZoneKind;

/// A card instance in a game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique id for this instance.
    pub id: CardId,

    /// Reference to the card definition.
    pub definition: DefinitionId,

    /// Owner (whose deck this card came from). Zones are keyed by
    /// owner, never by controller.
    pub owner: PlayerId,

    /// Controller (who currently makes decisions for it).
    pub controller: PlayerId,

    /// Current zone (mirror of the zone manager's bookkeeping).
    pub zone: ZoneKind,

    /// Exhausted cards cannot pay exhaust costs or attack.
    pub exhausted: bool,

    /// Damage marked on the card.
    pub damage: i32,

    /// Upgrades attached to this card, in attachment order.
    pub upgrades: SmallVec<[CardId; 2]>,

    /// The card this upgrade is attached to, if any.
    pub attached_to: Option<CardId>,

    /// Systems forbidden from affecting this card while the
    /// restriction lasts.
    pub restrictions: SmallVec<[SystemTag; 2]>,

    /// Uses spent per ability, for usage-limited abilities.
    #[serde(default)]
    pub ability_uses: FxHashMap<AbilityId, u32>,
}

impl CardInstance {
    /// Create a fresh instance owned and controlled by one player.
    #[must_use]
    pub fn new(id: CardId, definition: DefinitionId, owner: PlayerId, zone: ZoneKind) -> Self {
        Self {
            id,
            definition,
            owner,
            controller: owner,
            zone,
            exhausted: false,
            damage: 0,
            upgrades: SmallVec::new(),
            attached_to: None,
            restrictions: SmallVec::new(),
            ability_uses: FxHashMap::default(),
        }
    }

    /// Is this card in an arena?
    #[must_use]
    pub fn in_play(&self) -> bool {
        self.zone.is_arena()
    }

    /// Does a restriction forbid the given system from affecting this card?
    #[must_use]
    pub fn restricted_against(&self, tag: SystemTag) -> bool {
        self.restrictions.contains(&tag)
    }

    /// Uses spent on an ability.
    #[must_use]
    pub fn uses_of(&self, ability: AbilityId) -> u32 {
        self.ability_uses.get(&ability).copied().unwrap_or(0)
    }

    /// Spend one use of an ability.
    pub fn spend_use(&mut self, ability: AbilityId) {
        *self.ability_uses.entry(ability).or_insert(0) += 1;
    }

    /// Reset transient combat state (used when a card leaves play).
    pub fn reset_on_leave(&mut self) {
        self.exhausted = false;
        self.damage = 0;
        self.upgrades.clear();
        self.attached_to = None;
        self.restrictions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance() {
        let card = CardInstance::new(
            CardId::new(10),
            DefinitionId::new(1),
            PlayerId::new(0),
            ZoneKind::Hand,
        );

        assert_eq!(card.owner, card.controller);
        assert!(!card.in_play());
        assert!(!card.exhausted);
        assert_eq!(card.damage, 0);
    }

    #[test]
    fn test_restrictions() {
        let mut card = CardInstance::new(
            CardId::new(10),
            DefinitionId::new(1),
            PlayerId::new(0),
            ZoneKind::GroundArena,
        );

        assert!(!card.restricted_against(SystemTag::Damage));
        card.restrictions.push(SystemTag::Damage);
        assert!(card.restricted_against(SystemTag::Damage));
        assert!(!card.restricted_against(SystemTag::Defeat));
    }

    #[test]
    fn test_ability_uses() {
        let mut card = CardInstance::new(
            CardId::new(10),
            DefinitionId::new(1),
            PlayerId::new(0),
            ZoneKind::GroundArena,
        );
        let ability = AbilityId::new(3);

        assert_eq!(card.uses_of(ability), 0);
        card.spend_use(ability);
        card.spend_use(ability);
        assert_eq!(card.uses_of(ability), 2);
    }

    #[test]
    fn test_reset_on_leave() {
        let mut card = CardInstance::new(
            CardId::new(10),
            DefinitionId::new(1),
            PlayerId::new(0),
            ZoneKind::GroundArena,
        );
        card.exhausted = true;
        card.damage = 4;
        card.upgrades.push(CardId::new(11));

        card.reset_on_leave();

        assert!(!card.exhausted);
        assert_eq!(card.damage, 0);
        assert!(card.upgrades.is_empty());
    }
}
