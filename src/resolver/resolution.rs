//! Per-activation resolution bookkeeping.

use rustc_hash::FxHashMap;

use crate::core::ResolutionId;
use crate::events::Event;
use crate::zones::ZoneKind;

use super::context::AbilityContext;

/// The live record of one ability activation.
///
/// Owned by the engine from initiation until the pipeline drains or
/// the ability is cancelled; tests inspect it afterwards.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// Unique id.
    pub id: ResolutionId,

    /// The resolution context (current value; history inside).
    pub context: AbilityContext,

    /// Cancelled resolutions run no further stage work.
    pub canceled: bool,

    /// The player took the Pass option.
    pub passed: bool,

    /// The Pass affordance has been shown; it is never shown twice.
    pub pass_shown: bool,

    /// Early targeting completed before costs.
    pub early_targeted: bool,

    /// The "then" window confirmed effect initiation.
    pub initiated: bool,

    /// Where the source card was when resolution started.
    pub zone_at_start: ZoneKind,

    /// Events generated but not yet resolved in a window.
    pub pending_events: Vec<Event>,

    /// Target slots that have finished choosing.
    pub slots_done: FxHashMap<usize, bool>,

    /// Events applied on this resolution's behalf, for inspection.
    pub resolved_events: Vec<Event>,

    /// Events cancelled on this resolution's behalf.
    pub canceled_events: Vec<Event>,
}

impl Resolution {
    /// Create a fresh resolution record.
    #[must_use]
    pub fn new(id: ResolutionId, context: AbilityContext, zone_at_start: ZoneKind) -> Self {
        Self {
            id,
            context,
            canceled: false,
            passed: false,
            pass_shown: false,
            early_targeted: false,
            initiated: false,
            zone_at_start,
            pending_events: Vec::new(),
            slots_done: FxHashMap::default(),
            resolved_events: Vec::new(),
            canceled_events: Vec::new(),
        }
    }

    /// Is a target slot finished?
    #[must_use]
    pub fn slot_done(&self, slot: usize) -> bool {
        self.slots_done.get(&slot).copied().unwrap_or(false)
    }

    /// Cancel the resolution and mark every pending event cancelled.
    pub fn cancel(&mut self) {
        self.canceled = true;
        for event in &mut self.pending_events {
            event.cancel();
        }
    }
}
