//! Core engine types: ids, players, cards-in-state, RNG, messages.

pub mod entity;
pub mod message;
pub mod player;
pub mod prop;
pub mod rng;
pub mod state;

pub use entity::{AbilityId, CardId, DefinitionId, ResolutionId};
pub use message::{Message, MessageLog};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use prop::Prop;
pub use rng::GameRng;
pub use state::{GameState, PlayerState};
