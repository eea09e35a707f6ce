use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::StatsError;

use super::models::{DiceGame, DiceScore};

/// Boundary to the Yahtzee game/score store. Scores are upserted on
/// `(game, player, category)`; deleting a game cascades to them.
#[async_trait]
pub trait YahtzeeRepository: Send + Sync {
    async fn create_game(&self, game: &DiceGame) -> Result<(), StatsError>;
    async fn get_game(&self, game_id: Uuid) -> Result<Option<DiceGame>, StatsError>;
    async fn list_games(&self) -> Result<Vec<DiceGame>, StatsError>;
    async fn upsert_score(&self, score: &DiceScore) -> Result<(), StatsError>;
    async fn list_scores_for_game(&self, game_id: Uuid) -> Result<Vec<DiceScore>, StatsError>;
    async fn list_scores_for_player(&self, player_id: Uuid) -> Result<Vec<DiceScore>, StatsError>;
    async fn list_all_scores(&self) -> Result<Vec<DiceScore>, StatsError>;
    async fn finish_game(&self, game_id: Uuid, winner_id: Option<Uuid>) -> Result<(), StatsError>;
    async fn delete_game(&self, game_id: Uuid) -> Result<(), StatsError>;
}

#[derive(Debug, Default)]
pub struct InMemoryYahtzeeRepository {
    games: Arc<RwLock<HashMap<Uuid, DiceGame>>>,
    scores: Arc<RwLock<HashMap<Uuid, Vec<DiceScore>>>>,
}

impl InMemoryYahtzeeRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
            scores: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl YahtzeeRepository for InMemoryYahtzeeRepository {
    async fn create_game(&self, game: &DiceGame) -> Result<(), StatsError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(StatsError::Validation(format!(
                "Game {} already exists",
                game.id
            )));
        }
        games.insert(game.id, game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: Uuid) -> Result<Option<DiceGame>, StatsError> {
        let games = self.games.read().await;
        Ok(games.get(&game_id).cloned())
    }

    async fn list_games(&self) -> Result<Vec<DiceGame>, StatsError> {
        let games = self.games.read().await;
        let mut all: Vec<DiceGame> = games.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn upsert_score(&self, score: &DiceScore) -> Result<(), StatsError> {
        let games = self.games.read().await;
        let game = games
            .get(&score.game_id)
            .ok_or_else(|| StatsError::NotFound(format!("Game {}", score.game_id)))?;
        if game.finished {
            return Err(StatsError::Validation(format!(
                "Game {} is finished",
                game.id
            )));
        }
        drop(games);

        let mut scores = self.scores.write().await;
        let game_scores = scores.entry(score.game_id).or_default();
        match game_scores
            .iter_mut()
            .find(|s| s.player_id == score.player_id && s.category == score.category)
        {
            Some(existing) => *existing = score.clone(),
            None => game_scores.push(score.clone()),
        }
        drop(scores);

        let mut games = self.games.write().await;
        if let Some(game) = games.get_mut(&score.game_id) {
            game.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_scores_for_game(&self, game_id: Uuid) -> Result<Vec<DiceScore>, StatsError> {
        let scores = self.scores.read().await;
        Ok(scores.get(&game_id).cloned().unwrap_or_default())
    }

    async fn list_scores_for_player(&self, player_id: Uuid) -> Result<Vec<DiceScore>, StatsError> {
        let scores = self.scores.read().await;
        Ok(scores
            .values()
            .flatten()
            .filter(|s| s.player_id == player_id)
            .cloned()
            .collect())
    }

    async fn list_all_scores(&self) -> Result<Vec<DiceScore>, StatsError> {
        let scores = self.scores.read().await;
        Ok(scores.values().flatten().cloned().collect())
    }

    async fn finish_game(&self, game_id: Uuid, winner_id: Option<Uuid>) -> Result<(), StatsError> {
        let mut games = self.games.write().await;
        let game = games
            .get_mut(&game_id)
            .ok_or_else(|| StatsError::NotFound(format!("Game {}", game_id)))?;
        game.finished = true;
        game.winner_id = winner_id;
        game.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_game(&self, game_id: Uuid) -> Result<(), StatsError> {
        let mut games = self.games.write().await;
        games
            .remove(&game_id)
            .ok_or_else(|| StatsError::NotFound(format!("Game {}", game_id)))?;
        let mut scores = self.scores.write().await;
        scores.remove(&game_id);
        Ok(())
    }
}
