//! Step representation: named operations with typed payloads.
//!
//! Steps are a tagged union rather than opaque closures, so a queued
//! pipeline can be inspected, logged, and serialized for debugging or
//! replay. Each variant names the operation it performs; payloads are
//! ids and plain data, never captured state.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, ResolutionId};
use crate::events::Event;
use crate::prompts::PromptRequest;

/// One deferred unit of work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Step {
    // === Ability resolution stages ===
    /// Resolve targets before costs, when the ability allows it, and
    /// offer the Pass affordance for optional abilities.
    ResolveEarlyTargets { resolution: ResolutionId },

    /// Check for cancellation or a pass; cancel pending events.
    CheckCancel { resolution: ResolutionId },

    /// Announce the ability's initiation in an event window; the
    /// window's resolution enqueues the remaining stages.
    AnnounceAbility { resolution: ResolutionId },

    /// Resolve the ability's costs into a cost outcome.
    ResolveCosts { resolution: ResolutionId },

    /// Pay resolved costs in an event window.
    PayCosts { resolution: ResolutionId },

    /// Resolve (or re-resolve) targets after costs.
    ResolveTargets { resolution: ResolutionId },

    /// Spend usage limits, display the message, open the "then"
    /// window that marks effects as initiated.
    InitiateEffects { resolution: ResolutionId },

    /// Generate effect events and schedule the window that applies
    /// them.
    ExecuteHandler { resolution: ResolutionId },

    /// Drain a resolution's pending events into a window and resolve
    /// it.
    OpenPendingWindow {
        resolution: ResolutionId,
        label: String,
    },

    // === Generic operations ===
    /// Resolve a standalone batch of events.
    OpenWindow { label: String, events: Vec<Event> },

    /// Suspend for player input.
    AskChoice { prompt: PromptRequest },

    /// Run a nested sequence to completion before the current frame
    /// continues.
    Sequence { label: String, steps: Vec<Step> },

    /// Append a chat message.
    EmitMessage {
        speaker: Option<PlayerId>,
        text: String,
    },
}

impl Step {
    /// Debug label for pipeline introspection.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Step::ResolveEarlyTargets { resolution } => format!("early targets ({resolution})"),
            Step::CheckCancel { resolution } => format!("check cancel ({resolution})"),
            Step::AnnounceAbility { resolution } => format!("announce ({resolution})"),
            Step::ResolveCosts { resolution } => format!("resolve costs ({resolution})"),
            Step::PayCosts { resolution } => format!("pay costs ({resolution})"),
            Step::ResolveTargets { resolution } => format!("resolve targets ({resolution})"),
            Step::InitiateEffects { resolution } => format!("initiate effects ({resolution})"),
            Step::ExecuteHandler { resolution } => format!("execute handler ({resolution})"),
            Step::OpenPendingWindow { label, .. } => format!("window: {label}"),
            Step::OpenWindow { label, .. } => format!("window: {label}"),
            Step::AskChoice { prompt } => format!("prompt: {}", prompt.title),
            Step::Sequence { label, .. } => format!("sequence: {label}"),
            Step::EmitMessage { .. } => "message".to_string(),
        }
    }
}
