//! Cross-round aggregation for Tarot players and games.
//!
//! Every operation here is a pure transformation over collections the
//! caller fetched; the only shared building block is the role-aware
//! per-round attribution, which is zero-sum across the table.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Bid, TarotGame, TarotRound, MAX_TAROT_PLAYERS};

/// Splits one round's signed score across the table.
///
/// The taker receives the raw score, a called partner in a 5-player game
/// receives it as well, and the remaining seats share the combined pool as
/// an equal negative amount. Sums to zero for any valid round.
pub fn round_attribution(round: &TarotRound, player_ids: &[Uuid]) -> HashMap<Uuid, f64> {
    let mut shares: HashMap<Uuid, f64> = player_ids.iter().map(|id| (*id, 0.0)).collect();

    if !player_ids.contains(&round.taker_id) {
        // Round references a taker that is not seated; attribute nothing.
        return shares;
    }

    let mut beneficiaries = vec![round.taker_id];
    if player_ids.len() == MAX_TAROT_PLAYERS {
        if let Some(partner_id) = round.called_partner_id {
            if partner_id != round.taker_id && player_ids.contains(&partner_id) {
                beneficiaries.push(partner_id);
            }
        }
    }

    let defenders: Vec<Uuid> = player_ids
        .iter()
        .copied()
        .filter(|id| !beneficiaries.contains(id))
        .collect();
    if defenders.is_empty() {
        return shares;
    }

    let score = f64::from(round.score);
    let debit = score * beneficiaries.len() as f64 / defenders.len() as f64;

    for id in &beneficiaries {
        *shares.entry(*id).or_insert(0.0) += score;
    }
    for id in &defenders {
        *shares.entry(*id).or_insert(0.0) -= debit;
    }

    shares
}

/// Signed totals per seat after all supplied rounds.
pub fn game_totals(player_ids: &[Uuid], rounds: &[TarotRound]) -> HashMap<Uuid, f64> {
    let mut totals: HashMap<Uuid, f64> = player_ids.iter().map(|id| (*id, 0.0)).collect();
    for round in rounds {
        for (id, share) in round_attribution(round, player_ids) {
            *totals.entry(id).or_insert(0.0) += share;
        }
    }
    totals
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarotPlayerStatistics {
    pub player_id: Uuid,
    pub games_played: u32,
    pub rounds_played: u32,
    pub taker_rounds: u32,
    pub taker_wins: u32,
    pub taker_win_rate: f64,
    pub average_taker_score: f64,
    /// Net score via role-aware attribution, summed over all games.
    pub total_net_score: f64,
    pub average_net_score: f64,
}

/// Aggregates one player's record across every game they were seated in.
///
/// `taker_rounds` are the rounds this player declared; `all_rounds` are all
/// rounds of the supplied games, needed for net-score attribution.
pub fn player_statistics(
    player_id: Uuid,
    games: &[TarotGame],
    taker_rounds: &[TarotRound],
    all_rounds: &[TarotRound],
) -> TarotPlayerStatistics {
    let taker_count = taker_rounds.len() as u32;
    let taker_wins = taker_rounds.iter().filter(|r| r.contract_made()).count() as u32;

    let taker_win_rate = if taker_count > 0 {
        f64::from(taker_wins) / f64::from(taker_count)
    } else {
        0.0
    };
    let average_taker_score = if taker_count > 0 {
        taker_rounds.iter().map(|r| f64::from(r.score)).sum::<f64>() / f64::from(taker_count)
    } else {
        0.0
    };

    let seats_by_game: HashMap<Uuid, &TarotGame> = games.iter().map(|g| (g.id, g)).collect();
    let mut total_net_score = 0.0;
    for round in all_rounds {
        if let Some(game) = seats_by_game.get(&round.game_id) {
            if let Some(share) = round_attribution(round, &game.player_ids).get(&player_id) {
                total_net_score += share;
            }
        }
    }

    let games_played = games.len() as u32;
    let average_net_score = if games_played > 0 {
        total_net_score / f64::from(games_played)
    } else {
        0.0
    };

    TarotPlayerStatistics {
        player_id,
        games_played,
        rounds_played: all_rounds.len() as u32,
        taker_rounds: taker_count,
        taker_wins,
        taker_win_rate,
        average_taker_score,
        total_net_score,
        average_net_score,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidStatistics {
    pub bid: Bid,
    pub times_played: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub average_score: f64,
}

/// Per-bid record over the rounds a player declared, restricted to bids
/// actually used and sorted by frequency descending. Ties keep the order
/// the bids were first encountered in.
pub fn bid_statistics(taker_rounds: &[TarotRound]) -> Vec<BidStatistics> {
    let mut grouped: Vec<(Bid, Vec<&TarotRound>)> = Vec::new();
    for round in taker_rounds {
        match grouped.iter_mut().find(|(bid, _)| *bid == round.bid) {
            Some((_, rounds)) => rounds.push(round),
            None => grouped.push((round.bid, vec![round])),
        }
    }

    let mut stats: Vec<BidStatistics> = grouped
        .into_iter()
        .map(|(bid, rounds)| {
            let times_played = rounds.len() as u32;
            let wins = rounds.iter().filter(|r| r.contract_made()).count() as u32;
            let average_score =
                rounds.iter().map(|r| f64::from(r.score)).sum::<f64>() / f64::from(times_played);
            BidStatistics {
                bid,
                times_played,
                wins,
                win_rate: f64::from(wins) / f64::from(times_played),
                average_score,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.times_played.cmp(&a.times_played));
    stats
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRanking {
    /// Dense 1-based rank: ties get distinct consecutive ranks.
    pub rank: u32,
    pub player_id: Uuid,
    pub player_name: String,
    pub total: f64,
}

/// Ranks every seated player by attribution total, descending. Equal totals
/// get consecutive distinct ranks in seating order (stable sort), never a
/// shared rank number.
pub fn player_rankings(
    game: &TarotGame,
    rounds: &[TarotRound],
    names: &HashMap<Uuid, String>,
) -> Vec<PlayerRanking> {
    let totals = game_totals(&game.player_ids, rounds);

    let mut seats: Vec<(Uuid, f64)> = game
        .player_ids
        .iter()
        .map(|id| (*id, totals.get(id).copied().unwrap_or(0.0)))
        .collect();
    seats.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    seats
        .into_iter()
        .enumerate()
        .map(|(index, (player_id, total))| PlayerRanking {
            rank: index as u32 + 1,
            player_id,
            player_name: names
                .get(&player_id)
                .cloned()
                .unwrap_or_else(|| crate::shared::UNKNOWN_LABEL.to_string()),
            total,
        })
        .collect()
}
