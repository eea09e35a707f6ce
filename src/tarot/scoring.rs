//! Contract scoring for a single Tarot round.

use serde::{Deserialize, Serialize};

use super::models::{Bid, Chelem, PoigneeLevel};

/// Points awarded for any contract before the margin is added.
pub const CONTRACT_BASE: i32 = 25;

/// Petit au bout bonus before the bid multiplier is applied.
pub const PETIT_AU_BOUT_POINTS: i32 = 10;

/// Card points the taker's side must reach, by oudler count. Fewer oudlers
/// mean a harder contract.
pub fn contract_target(oudlers: u8) -> i32 {
    match oudlers {
        0 => 56,
        1 => 51,
        2 => 41,
        3 => 36,
        // Unexpected counts score against the hardest target.
        _ => 56,
    }
}

/// Full breakdown of one round's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    pub base_points: i32,
    pub bonus_points: i32,
    /// Unsigned point pool, base plus every bonus.
    pub total: i32,
    /// Signed result: `total` when the contract was made, `-total` otherwise.
    pub score: i32,
    pub contract_made: bool,
    pub taker_points: i32,
    pub target: i32,
}

/// Scores one round. Total over well-typed input: bad enum states cannot be
/// expressed, and unexpected oudler counts fall back to the hardest target.
///
/// The whole point pool flips sign together when the contract fails;
/// bonuses are not separately won or lost.
pub fn score_round(
    bid: Bid,
    oudlers: u8,
    taker_points: i32,
    petit_au_bout: bool,
    poignee: Option<PoigneeLevel>,
    chelem: Chelem,
) -> RoundScore {
    let target = contract_target(oudlers);
    let diff = taker_points - target;
    let contract_made = diff >= 0;

    let base_points = (CONTRACT_BASE + diff.abs()) * bid.multiplier();

    let mut bonus_points = 0;
    if petit_au_bout {
        bonus_points += PETIT_AU_BOUT_POINTS * bid.multiplier();
    }
    if let Some(level) = poignee {
        bonus_points += level.points();
    }
    bonus_points += chelem.points();

    let total = base_points + bonus_points;
    let score = if contract_made { total } else { -total };

    RoundScore {
        base_points,
        bonus_points,
        total,
        score,
        contract_made,
        taker_points,
        target,
    }
}
