use std::sync::Arc;

use uuid::Uuid;

use crate::player::{name_index, PlayerRepository};
use crate::shared::StatsError;

use super::global::{self, GlobalStatistics};
use super::models::{Category, DiceGame, DiceRoll, DiceScore};
use super::repository::YahtzeeRepository;
use super::scoring::{score_category, total_score};
use super::statistics::{self, scorecard, DiceRanking, YahtzeePlayerStatistics};

/// Orchestrates the Yahtzee engines over the game and player stores.
pub struct YahtzeeService {
    games: Arc<dyn YahtzeeRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl YahtzeeService {
    pub fn new(games: Arc<dyn YahtzeeRepository>, players: Arc<dyn PlayerRepository>) -> Self {
        Self { games, players }
    }

    pub async fn create_game(
        &self,
        name: &str,
        player_ids: Vec<Uuid>,
    ) -> Result<DiceGame, StatsError> {
        if name.trim().is_empty() {
            return Err(StatsError::Validation(
                "Game name cannot be empty".to_string(),
            ));
        }
        let game = DiceGame::new(name, player_ids)?;
        self.games.create_game(&game).await?;
        tracing::info!(game_id = %game.id, players = game.player_count(), "Created yahtzee game");
        Ok(game)
    }

    /// Scores a roll against a category and upserts the scorecard cell.
    pub async fn record_roll(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        category: Category,
        roll: DiceRoll,
    ) -> Result<DiceScore, StatsError> {
        let game = self.require_game(game_id).await?;
        let value = score_category(&roll, category);
        let score = DiceScore::new(&game, player_id, category, value)?;
        self.games.upsert_score(&score).await?;
        tracing::debug!(
            game_id = %game_id,
            player_id = %player_id,
            category = %category,
            value,
            "Recorded roll"
        );
        Ok(score)
    }

    /// Direct score entry for a category, validated against its rule.
    pub async fn record_value(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        category: Category,
        value: i32,
    ) -> Result<DiceScore, StatsError> {
        let game = self.require_game(game_id).await?;
        let score = DiceScore::new(&game, player_id, category, value)?;
        self.games.upsert_score(&score).await?;
        Ok(score)
    }

    /// A player's current grand total for one game. Extra yahtzee bonus
    /// points accumulated at the table are passed through by the caller.
    pub async fn game_total(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        extra_bonus_points: i32,
    ) -> Result<i32, StatsError> {
        let game = self.require_game(game_id).await?;
        if !game.has_player(player_id) {
            return Err(StatsError::Validation(format!(
                "Player {} is not seated in game {}",
                player_id, game_id
            )));
        }
        let scores = self.games.list_scores_for_game(game_id).await?;
        let card = scorecard(&scores, game_id, player_id);
        Ok(total_score(&card, extra_bonus_points))
    }

    pub async fn game_rankings(&self, game_id: Uuid) -> Result<Vec<DiceRanking>, StatsError> {
        let game = self.require_game(game_id).await?;
        let scores = self.games.list_scores_for_game(game_id).await?;
        Ok(statistics::game_rankings(&game, &scores))
    }

    /// Marks a game finished, with the current ranking leader as winner.
    pub async fn finish_game(&self, game_id: Uuid) -> Result<DiceGame, StatsError> {
        let rankings = self.game_rankings(game_id).await?;
        let winner_id = rankings.first().map(|r| r.player_id);
        self.games.finish_game(game_id, winner_id).await?;
        self.require_game(game_id).await
    }

    /// Aggregates a player's record across every game they were seated in.
    pub async fn player_statistics(
        &self,
        player_id: Uuid,
    ) -> Result<YahtzeePlayerStatistics, StatsError> {
        let games: Vec<DiceGame> = self
            .games
            .list_games()
            .await?
            .into_iter()
            .filter(|g| g.has_player(player_id))
            .collect();

        let mut all_scores = Vec::new();
        for game in &games {
            all_scores.extend(self.games.list_scores_for_game(game.id).await?);
        }
        let player_scores = self.games.list_scores_for_player(player_id).await?;

        Ok(statistics::player_statistics(
            player_id,
            &games,
            &player_scores,
            &all_scores,
        ))
    }

    /// The whole-corpus report: records, leaderboards, category heatmap.
    /// Names are resolved once up front and injected into the aggregate.
    pub async fn global_statistics(&self) -> Result<GlobalStatistics, StatsError> {
        let games = self.games.list_games().await?;
        let scores = self.games.list_all_scores().await?;
        let players = self.players.list_players().await?;

        tracing::debug!(
            games = games.len(),
            scores = scores.len(),
            players = players.len(),
            "Computing global yahtzee statistics"
        );
        Ok(global::global_statistics(
            &games,
            &scores,
            &name_index(&players),
        ))
    }

    async fn require_game(&self, game_id: Uuid) -> Result<DiceGame, StatsError> {
        self.games
            .get_game(game_id)
            .await?
            .ok_or_else(|| StatsError::NotFound(format!("Game {}", game_id)))
    }
}
