//! Parsed keyword configuration.
//!
//! Keyword text parsing happens outside this crate; the parser hands
//! the engine fully-structured keyword instances at card-setup time
//! and the engine treats them as opaque configuration. Numeric
//! keywords carry their value, Bounty carries the reward ability, and
//! Smuggle captures an alternate cost plus the extra aspect icons it
//! adds.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::AbilityId;

use super::definition::Aspect;

/// A keyword that takes a numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKeyword {
    Raid,
    Restore,
    Overwhelm,
}

/// One parsed keyword on a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordInstance {
    /// A numeric keyword, e.g. Raid 2.
    Numeric {
        keyword: NumericKeyword,
        value: u32,
    },

    /// Bounty: the reward ability granted to whoever defeats this card.
    Bounty { reward: AbilityId },

    /// Smuggle: the card may be played from the resource zone for the
    /// captured cost, with the captured aspects added to its icons.
    Smuggle {
        cost: i32,
        aspects: SmallVec<[Aspect; 2]>,
    },
}
