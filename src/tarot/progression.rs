//! Replays a game's round history into per-player trajectories and derives
//! highlights, streaks, and taker-role breakdowns from them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Bid, Chelem, PoigneeLevel, TarotRound, MAX_TAROT_PLAYERS};
use super::statistics::round_attribution;

/// Highlights and momentum need a minimum sample before they say anything.
pub const MIN_ROUNDS_FOR_INSIGHTS: usize = 3;

/// The "current streak" only looks at a player's most recent taker rounds.
pub const CURRENT_STREAK_WINDOW: usize = 10;

/// Cumulative score trajectory per player: one entry per round boundary,
/// index 0 always the pre-game zero.
///
/// Running totals are accumulated round by round, so a game of n rounds
/// costs O(n) rather than a full recompute per boundary.
pub fn build_score_history(
    player_ids: &[Uuid],
    rounds: &[TarotRound],
) -> HashMap<Uuid, Vec<f64>> {
    let ordered = by_round_number(rounds);

    let mut history: HashMap<Uuid, Vec<f64>> =
        player_ids.iter().map(|id| (*id, vec![0.0])).collect();
    let mut totals: HashMap<Uuid, f64> = player_ids.iter().map(|id| (*id, 0.0)).collect();

    for round in ordered {
        let shares = round_attribution(round, player_ids);
        for id in player_ids {
            let total = totals.entry(*id).or_insert(0.0);
            *total += shares.get(id).copied().unwrap_or(0.0);
            history.entry(*id).or_default().push(*total);
        }
    }

    history
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comeback {
    pub player_id: Uuid,
    pub lowest: f64,
    pub finish: f64,
    pub recovery: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LargestLead {
    pub player_id: Uuid,
    /// Round boundary at which the lead peaked.
    pub round_number: u32,
    pub margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestRound {
    pub player_id: Uuid,
    pub round_number: u32,
    pub delta: f64,
    pub bid: Bid,
    pub taker_points: i32,
    pub petit_au_bout: bool,
    pub poignee: Option<PoigneeLevel>,
    pub chelem: Chelem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameHighlights {
    pub comeback: Option<Comeback>,
    pub largest_lead: Option<LargestLead>,
    pub best_round: Option<BestRound>,
}

/// Derives the game's notable moments. Returns `None` below
/// [`MIN_ROUNDS_FOR_INSIGHTS`] rounds.
pub fn game_highlights(player_ids: &[Uuid], rounds: &[TarotRound]) -> Option<GameHighlights> {
    if rounds.len() < MIN_ROUNDS_FOR_INSIGHTS {
        return None;
    }

    let ordered = by_round_number(rounds);
    let history = build_score_history(player_ids, rounds);
    let boundaries = ordered.len();

    // Comeback: deepest negative trough a player climbed back out of.
    // Strict comparison keeps the first-encountered player on ties.
    let mut comeback: Option<Comeback> = None;
    for id in player_ids {
        let Some(trajectory) = history.get(id) else {
            continue;
        };
        let Some(lowest) = trajectory.iter().copied().reduce(f64::min) else {
            continue;
        };
        let Some(finish) = trajectory.last().copied() else {
            continue;
        };
        if lowest < 0.0 && finish > lowest {
            let recovery = finish - lowest;
            if comeback.as_ref().is_none_or(|c| recovery > c.recovery) {
                comeback = Some(Comeback {
                    player_id: *id,
                    lowest,
                    finish,
                    recovery,
                });
            }
        }
    }

    // Largest lead: biggest 1st-vs-2nd gap across all round boundaries.
    let mut largest_lead: Option<LargestLead> = None;
    for boundary in 1..=boundaries {
        let mut standings: Vec<(Uuid, f64)> = player_ids
            .iter()
            .filter_map(|id| history.get(id).and_then(|t| t.get(boundary)).map(|v| (*id, *v)))
            .collect();
        if standings.len() < 2 {
            continue;
        }
        standings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let margin = standings[0].1 - standings[1].1;
        if largest_lead.as_ref().is_none_or(|l| margin > l.margin) {
            largest_lead = Some(LargestLead {
                player_id: standings[0].0,
                round_number: boundary as u32,
                margin,
            });
        }
    }

    // Best round: single largest positive per-round delta.
    let mut best_round: Option<BestRound> = None;
    for (index, round) in ordered.iter().enumerate() {
        if !player_ids.contains(&round.taker_id) {
            continue;
        }
        for id in player_ids {
            let Some(trajectory) = history.get(id) else {
                continue;
            };
            let (Some(before), Some(after)) = (trajectory.get(index), trajectory.get(index + 1))
            else {
                continue;
            };
            let delta = after - before;
            if delta > 0.0 && best_round.as_ref().is_none_or(|b| delta > b.delta) {
                best_round = Some(BestRound {
                    player_id: *id,
                    round_number: round.round_number,
                    delta,
                    bid: round.bid,
                    taker_points: round.taker_points,
                    petit_au_bout: round.petit_au_bout,
                    poignee: round.poignee,
                    chelem: round.chelem,
                });
            }
        }
    }

    Some(GameHighlights {
        comeback,
        largest_lead,
        best_round,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakKind {
    Winning,
    Losing,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub length: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Momentum {
    pub current: Streak,
    pub longest_win_streak: u32,
    pub longest_loss_streak: u32,
}

/// Win/loss streaks per player over the rounds they declared. Returns an
/// empty map below [`MIN_ROUNDS_FOR_INSIGHTS`] rounds.
pub fn momentum(player_ids: &[Uuid], rounds: &[TarotRound]) -> HashMap<Uuid, Momentum> {
    if rounds.len() < MIN_ROUNDS_FOR_INSIGHTS {
        return HashMap::new();
    }

    let ordered = by_round_number(rounds);
    let mut result = HashMap::new();

    for id in player_ids {
        let outcomes: Vec<bool> = ordered
            .iter()
            .filter(|r| r.taker_id == *id)
            .map(|r| r.contract_made())
            .collect();

        // Current streak: newest rounds first, capped at the window size,
        // extended while outcomes keep agreeing with the newest one.
        let recent: Vec<bool> = outcomes
            .iter()
            .rev()
            .take(CURRENT_STREAK_WINDOW)
            .copied()
            .collect();
        let current = match recent.first() {
            None => Streak {
                kind: StreakKind::Neutral,
                length: 0,
            },
            Some(&won) => {
                let length = recent.iter().take_while(|o| **o == won).count() as u32;
                Streak {
                    kind: if won {
                        StreakKind::Winning
                    } else {
                        StreakKind::Losing
                    },
                    length,
                }
            }
        };

        // Longest streaks: forward scan, reset on every break. Not capped
        // by the current-streak window.
        let mut longest_win = 0u32;
        let mut longest_loss = 0u32;
        let mut win_run = 0u32;
        let mut loss_run = 0u32;
        for won in &outcomes {
            if *won {
                win_run += 1;
                loss_run = 0;
            } else {
                loss_run += 1;
                win_run = 0;
            }
            longest_win = longest_win.max(win_run);
            longest_loss = longest_loss.max(loss_run);
        }

        result.insert(
            *id,
            Momentum {
                current,
                longest_win_streak: longest_win,
                longest_loss_streak: longest_loss,
            },
        );
    }

    result
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerPerformance {
    pub partner_id: Uuid,
    pub rounds: u32,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakerPerformance {
    pub player_id: Uuid,
    pub rounds_taken: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    /// Most frequently declared bid; frequency ties keep the bid first
    /// encountered.
    pub favorite_bid: Option<Bid>,
    /// Mean winning score, zero if the player never won as taker.
    pub average_win: f64,
    /// Mean losing magnitude, zero if the player never lost as taker.
    pub average_loss: f64,
    pub total_points_won: i32,
    pub total_points_lost: i32,
    /// Per-partner record; only populated in 5-player games.
    pub partners: Vec<PartnerPerformance>,
}

/// Taker-role breakdown per player. Returns an empty map below
/// [`MIN_ROUNDS_FOR_INSIGHTS`] rounds; players who never declared get no
/// entry.
pub fn taker_performance(
    player_ids: &[Uuid],
    rounds: &[TarotRound],
) -> HashMap<Uuid, TakerPerformance> {
    if rounds.len() < MIN_ROUNDS_FOR_INSIGHTS {
        return HashMap::new();
    }

    let ordered = by_round_number(rounds);
    let mut result = HashMap::new();

    for id in player_ids {
        let taken: Vec<&TarotRound> = ordered
            .iter()
            .copied()
            .filter(|r| r.taker_id == *id)
            .collect();
        if taken.is_empty() {
            continue;
        }

        let rounds_taken = taken.len() as u32;
        let wins = taken.iter().filter(|r| r.contract_made()).count() as u32;
        let losses = rounds_taken - wins;

        let mut bid_counts: Vec<(Bid, u32)> = Vec::new();
        for round in &taken {
            match bid_counts.iter_mut().find(|(bid, _)| *bid == round.bid) {
                Some((_, count)) => *count += 1,
                None => bid_counts.push((round.bid, 1)),
            }
        }
        let mut favorite: Option<(Bid, u32)> = None;
        for (bid, count) in &bid_counts {
            if favorite.as_ref().is_none_or(|(_, best)| count > best) {
                favorite = Some((*bid, *count));
            }
        }
        let favorite_bid = favorite.map(|(bid, _)| bid);

        let total_points_won: i32 = taken
            .iter()
            .filter(|r| r.contract_made())
            .map(|r| r.score)
            .sum();
        let total_points_lost: i32 = taken
            .iter()
            .filter(|r| !r.contract_made())
            .map(|r| r.score.abs())
            .sum();

        let average_win = if wins > 0 {
            f64::from(total_points_won) / f64::from(wins)
        } else {
            0.0
        };
        let average_loss = if losses > 0 {
            f64::from(total_points_lost) / f64::from(losses)
        } else {
            0.0
        };

        let partners = if player_ids.len() == MAX_TAROT_PLAYERS {
            partner_performance(*id, &taken)
        } else {
            Vec::new()
        };

        result.insert(
            *id,
            TakerPerformance {
                player_id: *id,
                rounds_taken,
                wins,
                losses,
                win_rate: f64::from(wins) / f64::from(rounds_taken),
                favorite_bid,
                average_win,
                average_loss,
                total_points_won,
                total_points_lost,
                partners,
            },
        );
    }

    result
}

fn partner_performance(taker_id: Uuid, taken: &[&TarotRound]) -> Vec<PartnerPerformance> {
    let mut grouped: Vec<(Uuid, Vec<bool>)> = Vec::new();
    for round in taken {
        let Some(partner_id) = round.called_partner_id else {
            continue;
        };
        if partner_id == taker_id {
            continue;
        }
        let won = round.contract_made();
        match grouped.iter_mut().find(|(id, _)| *id == partner_id) {
            Some((_, outcomes)) => outcomes.push(won),
            None => grouped.push((partner_id, vec![won])),
        }
    }

    grouped
        .into_iter()
        .map(|(partner_id, outcomes)| {
            let rounds = outcomes.len() as u32;
            let wins = outcomes.iter().filter(|won| **won).count() as u32;
            PartnerPerformance {
                partner_id,
                rounds,
                wins,
                win_rate: f64::from(wins) / f64::from(rounds),
            }
        })
        .collect()
}

fn by_round_number(rounds: &[TarotRound]) -> Vec<&TarotRound> {
    let mut ordered: Vec<&TarotRound> = rounds.iter().collect();
    ordered.sort_by_key(|r| r.round_number);
    ordered
}
