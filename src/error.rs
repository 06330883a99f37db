//! Engine-fatal error types.
//!
//! Only invariant violations live here: a card id with no registered
//! instance, a definition or ability that was never registered, a
//! resolution id the driver does not know about. These indicate an
//! engine defect and abort the pipeline run.
//!
//! Rule-legality failures (no legal target, unpayable cost, a target
//! that became illegal mid-resolution) are NOT errors. They are
//! represented as flags on the resolution plus a chat message, and the
//! pipeline runs to clean termination.

use thiserror::Error;

use crate::core::{AbilityId, CardId, DefinitionId, ResolutionId};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} is not registered in the game state")]
    UnregisteredCard(CardId),

    #[error("{0} is not registered")]
    UnknownDefinition(DefinitionId),

    #[error("{0} is not registered")]
    UnknownAbility(AbilityId),

    #[error("{0} is not tracked by the engine")]
    UnknownResolution(ResolutionId),

    #[error("no prompt is pending")]
    NoPendingPrompt,

    #[error("choice index {index} out of range ({count} options)")]
    ChoiceOutOfRange { index: usize, count: usize },

    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
