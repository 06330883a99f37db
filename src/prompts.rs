//! Prompt requests: the seam to the choice-collecting UI.
//!
//! When a step needs player input, the pipeline suspends and the
//! engine surfaces a `PromptRequest`. The embedding layer shows the
//! options and answers with `Engine::choose`, which resumes execution
//! exactly where it left off. Exactly one option is eventually taken.
//!
//! Prompt kinds are plain data so a suspended pipeline remains
//! introspectable.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId, ResolutionId};
use crate::events::Event;

/// What decision a prompt is collecting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PromptKind {
    /// The always-visible Pass option for an optional ability.
    /// Options: `["Use ability", "Pass"]`.
    PassAbility { resolution: ResolutionId },

    /// Choose one target for a slot. Options are the candidate cards
    /// in order, then `"Done"` when `can_finish`, then `"Cancel"`.
    ChooseTarget {
        resolution: ResolutionId,
        slot: usize,
        candidates: Vec<CardId>,
        can_finish: bool,
    },

    /// Pay an additional cost so the held event may be emitted.
    /// Options: `["Pay <amount>", "Decline"]`.
    PayUnlessCost {
        resolution: ResolutionId,
        payer: PlayerId,
        amount: i32,
        event: Event,
    },
}

/// A pending request for player input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// The player who must answer.
    pub player: PlayerId,

    /// Short description shown to the player.
    pub title: String,

    /// The options, answered by index.
    pub options: Vec<String>,

    /// The structured decision being collected.
    pub kind: PromptKind,
}
