//! Cost adjustment: aspect penalties and stacked cost modifiers.

mod adjuster;
mod compute;

pub use adjuster::{
    AdjusterScope, AdjusterUses, CostAdjuster, PlayDetails, PlayType,
};
pub use compute::{adjusted_cost, mark_used_adjusters, penalty_aspects, ASPECT_PENALTY};
