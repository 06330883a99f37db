//! Complete game state.
//!
//! `GameState` owns everything the rules core mutates: both players'
//! zone contents, every card instance, the card definitions, the
//! message log, and the RNG. All mutation happens on the single
//! pipeline thread, so there is no locking discipline - but card moves
//! always route through the owning player's zones (see `zones`).

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cards::{Aspect, CardDefinition, CardInstance, CardRegistry};
use crate::costs::CostAdjuster;
use crate::error::{EngineError, Result};
use crate::zones::{ZoneKind, ZoneManager, ZonePosition};

use super::entity::{CardId, DefinitionId};
use super::message::MessageLog;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;

/// Per-player registries and identity.
#[derive(Clone, Debug)]
pub struct PlayerState {
    /// This player's id.
    pub id: PlayerId,

    /// Aspects granted by the player's leader and base (multiset).
    pub aspects: SmallVec<[Aspect; 4]>,

    /// Registered cost adjusters, removed as they expire.
    pub adjusters: Vec<CostAdjuster>,
}

impl PlayerState {
    fn new(id: PlayerId) -> Self {
        Self {
            id,
            aspects: SmallVec::new(),
            adjusters: Vec::new(),
        }
    }

    /// Register a cost adjuster.
    pub fn add_adjuster(&mut self, adjuster: CostAdjuster) {
        self.adjusters.push(adjuster);
    }
}

/// Full game state for one two-player game.
pub struct GameState {
    /// Per-player state.
    players: PlayerMap<PlayerState>,

    /// Card locations.
    pub zones: ZoneManager,

    /// Card instances by id.
    cards: FxHashMap<CardId, CardInstance>,

    /// Card definitions.
    pub definitions: CardRegistry,

    /// Chat-style message log.
    pub messages: MessageLog,

    /// Deterministic RNG.
    pub rng: GameRng,

    /// Next card instance id to allocate.
    next_card_id: u32,
}

impl GameState {
    /// Create a new game state.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            players: PlayerMap::new(PlayerState::new),
            zones: ZoneManager::new(),
            cards: FxHashMap::default(),
            definitions: CardRegistry::new(),
            messages: MessageLog::new(),
            rng: GameRng::new(seed),
            next_card_id: 0,
        }
    }

    // === Players ===

    /// Get a player's state.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    /// Get a player's state mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id]
    }

    // === Cards ===

    /// Spawn a card instance from a definition into a zone.
    pub fn spawn(&mut self, definition: DefinitionId, owner: PlayerId, zone: ZoneKind) -> Result<CardId> {
        if self.definitions.get(definition).is_none() {
            return Err(EngineError::UnknownDefinition(definition));
        }

        let id = CardId::new(self.next_card_id);
        self.next_card_id += 1;

        self.cards
            .insert(id, CardInstance::new(id, definition, owner, zone));
        self.zones.add(id, owner, zone, ZonePosition::Top);
        Ok(id)
    }

    /// Get a card instance.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    /// Get a mutable card instance.
    pub fn card_mut(&mut self, id: CardId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&id)
    }

    /// Get a card instance, or an invariant error.
    pub fn card_result(&self, id: CardId) -> Result<&CardInstance> {
        self.cards.get(&id).ok_or(EngineError::UnregisteredCard(id))
    }

    /// Get a mutable card instance, or an invariant error.
    pub fn card_result_mut(&mut self, id: CardId) -> Result<&mut CardInstance> {
        self.cards
            .get_mut(&id)
            .ok_or(EngineError::UnregisteredCard(id))
    }

    /// Get the definition behind a card instance.
    pub fn definition_of(&self, id: CardId) -> Result<&CardDefinition> {
        let card = self.card_result(id)?;
        self.definitions
            .get(card.definition)
            .ok_or(EngineError::UnknownDefinition(card.definition))
    }

    // === Movement ===

    /// Move a card to another of its owner's zones.
    ///
    /// This is the mechanical move routine: it keeps the zone manager
    /// and the instance's zone mirror in sync, detaches the card from
    /// any host, and clears transient state when the card leaves play.
    /// Destination legality is the caller's concern (the event applier
    /// redirects illegal moves).
    pub fn move_card(&mut self, id: CardId, to: ZoneKind, position: ZonePosition) -> Result<ZoneKind> {
        let from = self
            .zones
            .move_card(id, to, position)
            .ok_or(EngineError::UnregisteredCard(id))?;

        // Detach from a host before updating the instance.
        let host = self.card_result(id)?.attached_to;
        if let Some(host_id) = host {
            if let Some(host_card) = self.cards.get_mut(&host_id) {
                host_card.upgrades.retain(|u| *u != id);
            }
        }

        let card = self.card_result_mut(id)?;
        card.zone = to;
        card.attached_to = None;
        if from.is_arena() && !to.is_arena() {
            card.reset_on_leave();
        }

        Ok(from)
    }

    /// Attach an upgrade to a host card in play.
    ///
    /// The upgrade moves into the host's arena and is tracked on the
    /// host's upgrade list.
    pub fn attach(&mut self, upgrade: CardId, host: CardId) -> Result<()> {
        let host_zone = self.card_result(host)?.zone;
        if !host_zone.is_arena() {
            return Err(EngineError::Invariant(format!(
                "cannot attach {upgrade} to {host}: host is not in an arena"
            )));
        }

        let _ = self.zones.move_card(upgrade, host_zone, ZonePosition::Top);
        {
            let card = self.card_result_mut(upgrade)?;
            card.zone = host_zone;
            card.attached_to = Some(host);
        }
        self.card_result_mut(host)?.upgrades.push(upgrade);
        Ok(())
    }

    // === Resources ===

    /// Number of ready (unexhausted) cards in a player's resource zone.
    #[must_use]
    pub fn ready_resources(&self, player: PlayerId) -> i32 {
        self.zones
            .cards_in(player, ZoneKind::Resource)
            .iter()
            .filter(|&&c| self.cards.get(&c).is_some_and(|card| !card.exhausted))
            .count() as i32
    }

    /// Exhaust `amount` ready resources.
    ///
    /// Returns `false` (and exhausts nothing) if the player cannot pay.
    pub fn pay_resources(&mut self, player: PlayerId, amount: i32) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.ready_resources(player) < amount {
            return false;
        }

        let ready: Vec<CardId> = self
            .zones
            .cards_in(player, ZoneKind::Resource)
            .iter()
            .copied()
            .filter(|&c| self.cards.get(&c).is_some_and(|card| !card.exhausted))
            .take(amount as usize)
            .collect();
        for id in ready {
            if let Some(card) = self.cards.get_mut(&id) {
                card.exhausted = true;
            }
        }
        true
    }

    // === Deck ===

    /// Draw up to `count` cards from a player's deck into hand.
    ///
    /// Returns the number actually drawn.
    pub fn draw_cards(&mut self, player: PlayerId, count: u32) -> u32 {
        let mut drawn = 0;
        for _ in 0..count {
            let Some(top) = self.zones.pop_deck(player) else {
                break;
            };
            self.zones.add(top, player, ZoneKind::Hand, ZonePosition::Top);
            if let Some(card) = self.cards.get_mut(&top) {
                card.zone = ZoneKind::Hand;
            }
            drawn += 1;
        }
        drawn
    }

    /// Shuffle a player's deck.
    pub fn shuffle_deck(&mut self, player: PlayerId) {
        let mut deck = std::mem::take(self.zones.contents_mut(player, ZoneKind::Deck));
        self.rng.shuffle(&mut deck);
        *self.zones.contents_mut(player, ZoneKind::Deck) = deck;
    }
}
