//! Zone manager for card locations and movement.
//!
//! Tracks where every card is and handles movement between zones.
//! Decks are ordered (top = end of the list); other zones keep
//! insertion order for stable iteration.

use rustc_hash::FxHashMap;

use crate::core::{CardId, PlayerId};

use super::ZoneKind;

/// Position for inserting a card into an ordered zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ZonePosition {
    /// Add to top of zone (e.g. top of deck).
    Top,
    /// Add to bottom of zone.
    Bottom,
}

/// Manages card locations across both players' zones.
///
/// Every zone belongs to exactly one player; a card's location is the
/// pair (owner, zone kind). Movement keeps the owner fixed - cards
/// always travel between their owner's zones, which is how the
/// single-owner invariant survives cross-player effects.
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    /// Card locations: card -> (owner, zone).
    locations: FxHashMap<CardId, (PlayerId, ZoneKind)>,

    /// Zone contents in order. Deck top is the end of the list.
    contents: FxHashMap<(PlayerId, ZoneKind), Vec<CardId>>,
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card in a zone.
    ///
    /// Panics if the card is already tracked - spawning the same
    /// instance twice is an engine defect.
    pub fn add(&mut self, card: CardId, owner: PlayerId, zone: ZoneKind, position: ZonePosition) {
        if self.locations.contains_key(&card) {
            panic!("{card} already tracked by zone manager");
        }

        self.locations.insert(card, (owner, zone));
        let list = self.contents.entry((owner, zone)).or_default();
        match position {
            ZonePosition::Top => list.push(card),
            ZonePosition::Bottom => list.insert(0, card),
        }
    }

    /// Move a card to another of its owner's zones.
    ///
    /// The owner is looked up, never supplied: a move requested by the
    /// non-owning player still lands in the owner's zone.
    ///
    /// Returns the old zone, or `None` if the card is not tracked.
    pub fn move_card(
        &mut self,
        card: CardId,
        new_zone: ZoneKind,
        position: ZonePosition,
    ) -> Option<ZoneKind> {
        let (owner, old_zone) = self.locations.get(&card).copied()?;

        if old_zone == new_zone {
            return Some(old_zone);
        }

        if let Some(list) = self.contents.get_mut(&(owner, old_zone)) {
            list.retain(|&c| c != card);
        }

        self.locations.insert(card, (owner, new_zone));
        let list = self.contents.entry((owner, new_zone)).or_default();
        match position {
            ZonePosition::Top => list.push(card),
            ZonePosition::Bottom => list.insert(0, card),
        }

        Some(old_zone)
    }

    /// Remove a card from tracking entirely.
    ///
    /// Returns the zone it was in, or `None` if not tracked.
    pub fn remove(&mut self, card: CardId) -> Option<(PlayerId, ZoneKind)> {
        let location = self.locations.remove(&card)?;
        if let Some(list) = self.contents.get_mut(&location) {
            list.retain(|&c| c != card);
        }
        Some(location)
    }

    /// Get a card's (owner, zone) location.
    #[must_use]
    pub fn location(&self, card: CardId) -> Option<(PlayerId, ZoneKind)> {
        self.locations.get(&card).copied()
    }

    /// Get the zone kind a card is in.
    #[must_use]
    pub fn zone_of(&self, card: CardId) -> Option<ZoneKind> {
        self.locations.get(&card).map(|&(_, z)| z)
    }

    /// Check if a card is in a specific zone of its owner.
    #[must_use]
    pub fn is_in(&self, card: CardId, zone: ZoneKind) -> bool {
        self.zone_of(card) == Some(zone)
    }

    /// Cards in a player's zone, in order (deck top last).
    #[must_use]
    pub fn cards_in(&self, owner: PlayerId, zone: ZoneKind) -> &[CardId] {
        self.contents
            .get(&(owner, zone))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of cards in a player's zone.
    #[must_use]
    pub fn count(&self, owner: PlayerId, zone: ZoneKind) -> usize {
        self.cards_in(owner, zone).len()
    }

    /// Pop the top card of a player's deck.
    pub fn pop_deck(&mut self, owner: PlayerId) -> Option<CardId> {
        let top = *self.contents.get(&(owner, ZoneKind::Deck))?.last()?;
        self.remove(top);
        Some(top)
    }

    /// Mutable access to an ordered zone list, for shuffling.
    pub(crate) fn contents_mut(&mut self, owner: PlayerId, zone: ZoneKind) -> &mut Vec<CardId> {
        self.contents.entry((owner, zone)).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    #[test]
    fn test_add_and_locate() {
        let mut zones = ZoneManager::new();
        zones.add(CardId(10), P0, ZoneKind::Hand, ZonePosition::Top);

        assert_eq!(zones.location(CardId(10)), Some((P0, ZoneKind::Hand)));
        assert!(zones.is_in(CardId(10), ZoneKind::Hand));
        assert_eq!(zones.cards_in(P0, ZoneKind::Hand), &[CardId(10)]);
        assert_eq!(zones.count(P1, ZoneKind::Hand), 0);
    }

    #[test]
    fn test_move_keeps_owner() {
        let mut zones = ZoneManager::new();
        zones.add(CardId(10), P0, ZoneKind::GroundArena, ZonePosition::Top);

        let old = zones.move_card(CardId(10), ZoneKind::Discard, ZonePosition::Top);

        assert_eq!(old, Some(ZoneKind::GroundArena));
        // Still player 0's card, in player 0's discard.
        assert_eq!(zones.location(CardId(10)), Some((P0, ZoneKind::Discard)));
        assert!(zones.cards_in(P0, ZoneKind::GroundArena).is_empty());
    }

    #[test]
    fn test_move_to_same_zone_is_noop() {
        let mut zones = ZoneManager::new();
        zones.add(CardId(1), P0, ZoneKind::Hand, ZonePosition::Top);
        zones.add(CardId(2), P0, ZoneKind::Hand, ZonePosition::Top);

        zones.move_card(CardId(1), ZoneKind::Hand, ZonePosition::Top);

        // Order unchanged.
        assert_eq!(zones.cards_in(P0, ZoneKind::Hand), &[CardId(1), CardId(2)]);
    }

    #[test]
    fn test_deck_ordering() {
        let mut zones = ZoneManager::new();
        zones.add(CardId(1), P0, ZoneKind::Deck, ZonePosition::Top);
        zones.add(CardId(2), P0, ZoneKind::Deck, ZonePosition::Top);
        zones.add(CardId(3), P0, ZoneKind::Deck, ZonePosition::Bottom);

        // Top of deck is the end of the list.
        assert_eq!(zones.cards_in(P0, ZoneKind::Deck), &[CardId(3), CardId(1), CardId(2)]);
        assert_eq!(zones.pop_deck(P0), Some(CardId(2)));
        assert_eq!(zones.pop_deck(P0), Some(CardId(1)));
        assert_eq!(zones.pop_deck(P0), Some(CardId(3)));
        assert_eq!(zones.pop_deck(P0), None);
    }

    #[test]
    fn test_remove() {
        let mut zones = ZoneManager::new();
        zones.add(CardId(5), P1, ZoneKind::SpaceArena, ZonePosition::Top);

        assert_eq!(zones.remove(CardId(5)), Some((P1, ZoneKind::SpaceArena)));
        assert_eq!(zones.location(CardId(5)), None);
        assert_eq!(zones.remove(CardId(5)), None);
    }

    #[test]
    #[should_panic(expected = "already tracked")]
    fn test_double_add_panics() {
        let mut zones = ZoneManager::new();
        zones.add(CardId(1), P0, ZoneKind::Hand, ZonePosition::Top);
        zones.add(CardId(1), P0, ZoneKind::Deck, ZonePosition::Top);
    }
}
