//! Per-player aggregation over Yahtzee score sheets.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use uuid::Uuid;

use super::models::{Category, DiceGame, DiceScore};
use super::scoring::{lower_total, total_score, upper_section_bonus, upper_total};

/// How many finished games the per-player report looks back over.
pub const RECENT_GAMES_LIMIT: usize = 10;

/// One player's scorecard for one game.
pub fn scorecard(scores: &[DiceScore], game_id: Uuid, player_id: Uuid) -> HashMap<Category, i32> {
    scores
        .iter()
        .filter(|s| s.game_id == game_id && s.player_id == player_id)
        .map(|s| (s.category, s.value))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceRanking {
    /// Dense 1-based rank: ties get distinct consecutive ranks.
    pub rank: u32,
    pub player_id: Uuid,
    pub total: i32,
}

/// Ranks one game's seated players by grand total, descending. Equal totals
/// get consecutive distinct ranks in seating order (stable sort).
pub fn game_rankings(game: &DiceGame, scores: &[DiceScore]) -> Vec<DiceRanking> {
    let mut seats: Vec<(Uuid, i32)> = game
        .player_ids
        .iter()
        .map(|id| {
            let card = scorecard(scores, game.id, *id);
            (*id, total_score(&card, 0))
        })
        .collect();
    seats.sort_by(|a, b| b.1.cmp(&a.1));

    seats
        .into_iter()
        .enumerate()
        .map(|(index, (player_id, total))| DiceRanking {
            rank: index as u32 + 1,
            player_id,
            total,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStatistics {
    pub category: Category,
    /// Mean over every recorded value, zeroes included.
    pub average: f64,
    pub times_scored: u32,
    pub times_zeroed: u32,
    pub zero_rate: f64,
    pub best: i32,
}

/// Category-by-category record over a set of score rows.
pub fn category_statistics(scores: &[DiceScore]) -> Vec<CategoryStatistics> {
    Category::iter()
        .map(|category| {
            let values: Vec<i32> = scores
                .iter()
                .filter(|s| s.category == category)
                .map(|s| s.value)
                .collect();
            let recorded = values.len() as u32;
            let times_zeroed = values.iter().filter(|v| **v == 0).count() as u32;
            let times_scored = recorded - times_zeroed;
            CategoryStatistics {
                category,
                average: if recorded > 0 {
                    values.iter().map(|v| f64::from(*v)).sum::<f64>() / f64::from(recorded)
                } else {
                    0.0
                },
                times_scored,
                times_zeroed,
                zero_rate: if recorded > 0 {
                    f64::from(times_zeroed) / f64::from(recorded)
                } else {
                    0.0
                },
                best: values.iter().copied().max().unwrap_or(0),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentGame {
    pub game_id: Uuid,
    pub game_name: String,
    pub played_at: DateTime<Utc>,
    pub score: i32,
    pub rank: u32,
    pub player_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YahtzeePlayerStatistics {
    pub player_id: Uuid,
    pub games_played: u32,
    pub games_finished: u32,
    pub wins: u32,
    pub win_rate: f64,
    /// Grand totals are recomputed from the stored scorecards, averaged
    /// over games with at least one recorded score.
    pub average_score: f64,
    pub best_score: i32,
    pub yahtzee_count: u32,
    pub yahtzee_rate: f64,
    pub upper_bonus_rate: f64,
    pub average_upper: f64,
    pub average_lower: f64,
    pub categories: Vec<CategoryStatistics>,
    pub recent_games: Vec<RecentGame>,
}

/// Aggregates one player's record across every game they were seated in.
///
/// `player_scores` are this player's rows; `all_scores` are every row of
/// the supplied games, needed for intra-game ranks.
pub fn player_statistics(
    player_id: Uuid,
    games: &[DiceGame],
    player_scores: &[DiceScore],
    all_scores: &[DiceScore],
) -> YahtzeePlayerStatistics {
    let games_played = games.len() as u32;
    let games_finished = games.iter().filter(|g| g.finished).count() as u32;
    let wins = games
        .iter()
        .filter(|g| g.finished && g.winner_id == Some(player_id))
        .count() as u32;

    // Grand totals, one per game the player actually scored in.
    let mut totals: Vec<i32> = Vec::new();
    let mut upper_totals: Vec<i32> = Vec::new();
    let mut lower_totals: Vec<i32> = Vec::new();
    let mut bonuses = 0u32;
    for game in games {
        let card = scorecard(player_scores, game.id, player_id);
        if card.is_empty() {
            continue;
        }
        totals.push(total_score(&card, 0));
        upper_totals.push(upper_total(&card));
        lower_totals.push(lower_total(&card));
        if upper_section_bonus(&card) > 0 {
            bonuses += 1;
        }
    }

    let scored_games = totals.len() as u32;
    let yahtzee_count = player_scores
        .iter()
        .filter(|s| s.category == Category::Yahtzee && s.value > 0)
        .count() as u32;

    let mut recent: Vec<&DiceGame> = games.iter().filter(|g| g.finished).collect();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let recent_games = recent
        .into_iter()
        .take(RECENT_GAMES_LIMIT)
        .map(|game| {
            let rankings = game_rankings(game, all_scores);
            let own = rankings.iter().find(|r| r.player_id == player_id);
            RecentGame {
                game_id: game.id,
                game_name: game.name.clone(),
                played_at: game.updated_at,
                score: own.map(|r| r.total).unwrap_or(0),
                rank: own.map(|r| r.rank).unwrap_or(0),
                player_count: game.player_count() as u32,
            }
        })
        .collect();

    YahtzeePlayerStatistics {
        player_id,
        games_played,
        games_finished,
        wins,
        win_rate: rate(wins, games_finished),
        average_score: mean(&totals),
        best_score: totals.iter().copied().max().unwrap_or(0),
        yahtzee_count,
        yahtzee_rate: rate(yahtzee_count, games_played),
        upper_bonus_rate: rate(bonuses, scored_games),
        average_upper: mean(&upper_totals),
        average_lower: mean(&lower_totals),
        categories: category_statistics(player_scores),
        recent_games,
    }
}

pub(crate) fn rate(count: u32, out_of: u32) -> f64 {
    if out_of > 0 {
        f64::from(count) / f64::from(out_of)
    } else {
        0.0
    }
}

pub(crate) fn mean(values: &[i32]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64
    }
}

/// Population variance of per-game totals; the consistency measure.
pub(crate) fn variance(values: &[i32]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    values
        .iter()
        .map(|v| {
            let diff = f64::from(*v) - avg;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64
}

// Keeps float comparisons in one place for the global leaderboards.
pub(crate) fn compare_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
