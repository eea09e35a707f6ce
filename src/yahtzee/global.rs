//! Corpus-wide Yahtzee statistics: records, leaderboards, and category
//! heatmaps across every player and game.
//!
//! Display names come from one precomputed id -> name table supplied by the
//! caller; a single batch lookup instead of one query per score row.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::shared::UNKNOWN_LABEL;

use super::models::{Category, DiceGame, DiceScore};
use super::scoring::total_score;
use super::statistics::{compare_desc, mean, scorecard, variance};

pub const LEADERBOARD_SIZE: usize = 5;

/// Rolls are not persisted, so the corpus-wide count is an estimate:
/// thirteen turns of up to three rolls per finished game.
pub const TURNS_PER_GAME: u64 = 13;
pub const ROLLS_PER_TURN: u64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_id: Uuid,
    pub player_name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: i32,
    pub player_id: Uuid,
    pub player_name: String,
    pub game_id: Uuid,
    pub game_name: String,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalCategoryStatistics {
    pub category: Category,
    pub average: f64,
    pub times_scored: u32,
    pub best: i32,
    pub best_player_id: Option<Uuid>,
    pub best_player_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStatistics {
    pub player_count: u32,
    pub game_count: u32,
    pub finished_game_count: u32,
    pub estimated_dice_rolls: u64,
    pub most_active_player: Option<LeaderboardEntry>,
    pub high_score: Option<HighScoreRecord>,
    /// Highest yahtzee-per-game ratio.
    pub luckiest_player: Option<LeaderboardEntry>,
    /// Lowest score variance over at least two finished games.
    pub most_consistent_player: Option<LeaderboardEntry>,
    pub top_wins: Vec<LeaderboardEntry>,
    pub top_scores: Vec<LeaderboardEntry>,
    pub top_yahtzees: Vec<LeaderboardEntry>,
    pub categories: Vec<GlobalCategoryStatistics>,
    pub most_scored_category: Option<Category>,
    pub least_scored_category: Option<Category>,
    pub highest_average_category: Option<Category>,
}

#[derive(Default)]
struct PlayerLedger {
    games_played: u32,
    wins: u32,
    yahtzees: u32,
    best_total: i32,
    finished_totals: Vec<i32>,
}

/// Computes the whole-corpus report. Pure over the supplied snapshot; ties
/// everywhere keep the first-encountered player (game order, then seating
/// order).
pub fn global_statistics(
    games: &[DiceGame],
    scores: &[DiceScore],
    names: &HashMap<Uuid, String>,
) -> GlobalStatistics {
    let finished_game_count = games.iter().filter(|g| g.finished).count() as u32;

    // One pass over games builds every per-player ledger; encounter order
    // doubles as the deterministic tie-break order.
    let mut order: Vec<Uuid> = Vec::new();
    let mut ledgers: HashMap<Uuid, PlayerLedger> = HashMap::new();
    let mut high_score: Option<HighScoreRecord> = None;

    for game in games {
        for player_id in &game.player_ids {
            if !ledgers.contains_key(player_id) {
                order.push(*player_id);
            }
            let ledger = ledgers.entry(*player_id).or_default();
            ledger.games_played += 1;

            if game.finished {
                if game.winner_id == Some(*player_id) {
                    ledger.wins += 1;
                }
                let card = scorecard(scores, game.id, *player_id);
                if card.is_empty() {
                    continue;
                }
                let total = total_score(&card, 0);
                ledger.finished_totals.push(total);
                ledger.best_total = ledger.best_total.max(total);

                if high_score.as_ref().is_none_or(|record| total > record.score) {
                    high_score = Some(HighScoreRecord {
                        score: total,
                        player_id: *player_id,
                        player_name: resolve(names, *player_id),
                        game_id: game.id,
                        game_name: game.name.clone(),
                        achieved_at: game.updated_at,
                    });
                }
            }
        }
    }

    for score in scores {
        if score.category == Category::Yahtzee && score.value > 0 {
            if let Some(ledger) = ledgers.get_mut(&score.player_id) {
                ledger.yahtzees += 1;
            }
        }
    }

    let most_active_player = pick_max(&order, &ledgers, names, |ledger| {
        (ledger.games_played > 0).then_some(f64::from(ledger.games_played))
    });
    let luckiest_player = pick_max(&order, &ledgers, names, |ledger| {
        (ledger.yahtzees > 0)
            .then(|| f64::from(ledger.yahtzees) / f64::from(ledger.games_played))
    });
    // Consistency wants the *lowest* variance, so negate for the picker.
    let most_consistent_player = pick_max(&order, &ledgers, names, |ledger| {
        (ledger.finished_totals.len() >= 2).then(|| -variance(&ledger.finished_totals))
    })
    .map(|entry| LeaderboardEntry {
        value: -entry.value,
        ..entry
    });

    let top_wins = leaderboard(&order, &ledgers, names, |ledger| {
        (ledger.wins > 0).then_some(f64::from(ledger.wins))
    });
    let top_scores = leaderboard(&order, &ledgers, names, |ledger| {
        (!ledger.finished_totals.is_empty()).then_some(f64::from(ledger.best_total))
    });
    let top_yahtzees = leaderboard(&order, &ledgers, names, |ledger| {
        (ledger.yahtzees > 0).then_some(f64::from(ledger.yahtzees))
    });

    let categories = global_category_statistics(scores, names);
    let (most_scored_category, least_scored_category, highest_average_category) =
        category_extremes(&categories, scores);

    GlobalStatistics {
        player_count: names.len() as u32,
        game_count: games.len() as u32,
        finished_game_count,
        estimated_dice_rolls: u64::from(finished_game_count) * TURNS_PER_GAME * ROLLS_PER_TURN,
        most_active_player,
        high_score,
        luckiest_player,
        most_consistent_player,
        top_wins,
        top_scores,
        top_yahtzees,
        categories,
        most_scored_category,
        least_scored_category,
        highest_average_category,
    }
}

fn global_category_statistics(
    scores: &[DiceScore],
    names: &HashMap<Uuid, String>,
) -> Vec<GlobalCategoryStatistics> {
    Category::iter()
        .map(|category| {
            let rows: Vec<&DiceScore> = scores.iter().filter(|s| s.category == category).collect();
            let values: Vec<i32> = rows.iter().map(|s| s.value).collect();
            let times_scored = values.iter().filter(|v| **v > 0).count() as u32;

            let mut best: Option<&DiceScore> = None;
            for row in rows.iter().copied() {
                if row.value > 0 && best.is_none_or(|b| row.value > b.value) {
                    best = Some(row);
                }
            }

            GlobalCategoryStatistics {
                category,
                average: mean(&values),
                times_scored,
                best: best.map(|b| b.value).unwrap_or(0),
                best_player_id: best.map(|b| b.player_id),
                best_player_name: best.map(|b| resolve(names, b.player_id)),
            }
        })
        .collect()
}

fn category_extremes(
    categories: &[GlobalCategoryStatistics],
    scores: &[DiceScore],
) -> (Option<Category>, Option<Category>, Option<Category>) {
    if scores.is_empty() {
        return (None, None, None);
    }

    let mut most: Option<&GlobalCategoryStatistics> = None;
    let mut least: Option<&GlobalCategoryStatistics> = None;
    let mut highest: Option<&GlobalCategoryStatistics> = None;
    for stats in categories {
        if most.is_none_or(|m| stats.times_scored > m.times_scored) {
            most = Some(stats);
        }
        if least.is_none_or(|l| stats.times_scored < l.times_scored) {
            least = Some(stats);
        }
        if highest.is_none_or(|h| stats.average > h.average) {
            highest = Some(stats);
        }
    }

    (
        most.map(|s| s.category),
        least.map(|s| s.category),
        highest.map(|s| s.category),
    )
}

/// First-encountered player with the strictly largest metric.
fn pick_max(
    order: &[Uuid],
    ledgers: &HashMap<Uuid, PlayerLedger>,
    names: &HashMap<Uuid, String>,
    metric: impl Fn(&PlayerLedger) -> Option<f64>,
) -> Option<LeaderboardEntry> {
    let mut best: Option<(Uuid, f64)> = None;
    for player_id in order {
        let Some(value) = ledgers.get(player_id).and_then(&metric) else {
            continue;
        };
        if best.is_none_or(|(_, current)| value > current) {
            best = Some((*player_id, value));
        }
    }
    best.map(|(player_id, value)| LeaderboardEntry {
        rank: 1,
        player_id,
        player_name: resolve(names, player_id),
        value,
    })
}

/// Top-N by metric, descending; ties keep encounter order (stable sort).
fn leaderboard(
    order: &[Uuid],
    ledgers: &HashMap<Uuid, PlayerLedger>,
    names: &HashMap<Uuid, String>,
    metric: impl Fn(&PlayerLedger) -> Option<f64>,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<(Uuid, f64)> = order
        .iter()
        .filter_map(|id| {
            ledgers
                .get(id)
                .and_then(&metric)
                .map(|value| (*id, value))
        })
        .collect();
    entries.sort_by(|a, b| compare_desc(a.1, b.1));

    entries
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(index, (player_id, value))| LeaderboardEntry {
            rank: index as u32 + 1,
            player_id,
            player_name: resolve(names, player_id),
            value,
        })
        .collect()
}

fn resolve(names: &HashMap<Uuid, String>, player_id: Uuid) -> String {
    names
        .get(&player_id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}
