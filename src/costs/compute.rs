//! Adjusted-cost computation.
//!
//! The resource cost of a play is the base cost plus a fixed penalty
//! for every aspect icon the playing player's leader and base do not
//! grant, with each component independently adjusted by the player's
//! matching cost adjusters.
//!
//! The adjuster pass partitions matching adjusters into increases and
//! decreases, sums increases onto the base, subtracts the decreases,
//! then clamps: the result never drops below the smaller of the
//! pre-decrease cost and the highest floor declared among the
//! matching adjusters. A floor can stop a discount; it can never
//! raise a cost.

use smallvec::SmallVec;

use crate::cards::{Aspect, KeywordInstance};
use crate::core::GameState;
use crate::error::Result;

use super::adjuster::{CostAdjuster, PlayDetails, PlayType};

/// Penalty contributed by each unmatched aspect icon.
pub const ASPECT_PENALTY: i32 = 2;

/// Multiset difference: aspects on the card that the player's aspect
/// pool does not cover. Duplicated icons must each find their own
/// match.
#[must_use]
pub fn penalty_aspects(card_aspects: &[Aspect], pool: &[Aspect]) -> SmallVec<[Aspect; 2]> {
    let mut remaining: SmallVec<[Aspect; 4]> = SmallVec::from_slice(pool);
    let mut penalties = SmallVec::new();

    for &aspect in card_aspects {
        if let Some(pos) = remaining.iter().position(|&a| a == aspect) {
            remaining.swap_remove(pos);
        } else {
            penalties.push(aspect);
        }
    }
    penalties
}

/// One pricing pass: apply matching adjusters to a base amount.
fn adjust_pass(base: i32, matching: &[&CostAdjuster], play: &PlayDetails) -> i32 {
    let mut increase = 0;
    let mut decrease = 0;
    let mut highest_floor: Option<i32> = None;

    for adjuster in matching {
        let amount = adjuster.amount.resolve(play);
        if amount >= 0 {
            increase += amount;
        } else {
            decrease += -amount;
        }
        if let Some(floor) = adjuster.floor {
            highest_floor = Some(highest_floor.map_or(floor, |f| f.max(floor)));
        }
    }

    let pre_decrease = base + increase;
    let floor = highest_floor.unwrap_or(0);
    (pre_decrease - decrease).max(pre_decrease.min(floor))
}

/// The base cost and cost-relevant aspects for a play.
///
/// Smuggle plays price from the keyword's captured cost and add its
/// captured aspect icons.
fn cost_basis(state: &GameState, play: &PlayDetails) -> Result<(i32, SmallVec<[Aspect; 4]>)> {
    let def = state.definition_of(play.card)?;
    let mut aspects: SmallVec<[Aspect; 4]> = SmallVec::from_slice(&def.aspects);

    if play.play_type == PlayType::Smuggle {
        if let Some(KeywordInstance::Smuggle { cost, aspects: extra }) = def.smuggle() {
            aspects.extend(extra.iter().copied());
            return Ok((*cost, aspects));
        }
    }
    Ok((def.cost, aspects))
}

/// Compute the adjusted resource cost of a play.
///
/// Pure with respect to game state: calling it twice without an
/// intervening state change yields the same value.
pub fn adjusted_cost(state: &GameState, play: &PlayDetails) -> Result<i32> {
    let card_type = state.definition_of(play.card)?.card_type;
    let (base, aspects) = cost_basis(state, play)?;

    let pool = &state.player(play.player).aspects;
    let penalties = penalty_aspects(&aspects, pool);
    let adjusters = &state.player(play.player).adjusters;

    let base_matching: Vec<&CostAdjuster> = adjusters
        .iter()
        .filter(|a| a.scope.matches(play, card_type, None))
        .collect();
    let mut total = adjust_pass(base, &base_matching, play);

    // Each penalty aspect is priced independently.
    for &aspect in &penalties {
        let matching: Vec<&CostAdjuster> = adjusters
            .iter()
            .filter(|a| a.scope.matches(play, card_type, Some(aspect)))
            .collect();
        total += adjust_pass(ASPECT_PENALTY, &matching, play);
    }

    Ok(total.max(0))
}

/// Consume one use from every adjuster that matched the resolved
/// play (base pass or any of its penalty passes), removing adjusters
/// whose remaining uses reach zero.
pub fn mark_used_adjusters(state: &mut GameState, play: &PlayDetails) -> Result<()> {
    let card_type = state.definition_of(play.card)?.card_type;
    let (_, aspects) = cost_basis(state, play)?;
    let penalties = penalty_aspects(&aspects, &state.player(play.player).aspects);

    let adjusters = &mut state.player_mut(play.player).adjusters;
    adjusters.retain_mut(|adjuster| {
        let matched = adjuster.scope.matches(play, card_type, None)
            || penalties
                .iter()
                .any(|&a| adjuster.scope.matches(play, card_type, Some(a)));
        if matched {
            adjuster.spend_use()
        } else {
            true
        }
    });
    Ok(())
}
