use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::player::{name_index, PlayerRepository};
use crate::shared::StatsError;

use super::models::{RoundEntry, TarotGame, TarotRound};
use super::progression::{self, GameHighlights, Momentum, TakerPerformance};
use super::repository::TarotRepository;
use super::scoring::RoundScore;
use super::statistics::{self, BidStatistics, PlayerRanking, TarotPlayerStatistics};

/// Orchestrates the Tarot engines over the game and player stores. All
/// computation happens in the pure engine modules; this layer only fetches
/// snapshots and resolves display names.
pub struct TarotService {
    games: Arc<dyn TarotRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl TarotService {
    pub fn new(games: Arc<dyn TarotRepository>, players: Arc<dyn PlayerRepository>) -> Self {
        Self { games, players }
    }

    pub async fn create_game(
        &self,
        name: &str,
        player_ids: Vec<Uuid>,
    ) -> Result<TarotGame, StatsError> {
        if name.trim().is_empty() {
            return Err(StatsError::Validation(
                "Game name cannot be empty".to_string(),
            ));
        }
        let game = TarotGame::new(name, player_ids)?;
        self.games.create_game(&game).await?;
        tracing::info!(game_id = %game.id, players = game.player_count(), "Created tarot game");
        Ok(game)
    }

    /// Scores a round at entry time, persists it with the next round number,
    /// and returns the stored round together with its full breakdown.
    pub async fn record_round(
        &self,
        game_id: Uuid,
        entry: RoundEntry,
    ) -> Result<(TarotRound, RoundScore), StatsError> {
        let game = self.require_game(game_id).await?;
        let played = self.games.list_rounds_for_game(game_id).await?;
        let round_number = played.len() as u32 + 1;

        let round = TarotRound::new(&game, round_number, entry)?;
        self.games.add_round(&round).await?;

        let breakdown = round.score_breakdown();
        tracing::debug!(
            game_id = %game_id,
            round_number,
            score = breakdown.score,
            "Recorded tarot round"
        );
        Ok((round, breakdown))
    }

    /// Marks a game finished, with the current ranking leader as winner.
    pub async fn finish_game(&self, game_id: Uuid) -> Result<TarotGame, StatsError> {
        let game = self.require_game(game_id).await?;
        let rounds = self.games.list_rounds_for_game(game_id).await?;

        let rankings = statistics::player_rankings(&game, &rounds, &HashMap::new());
        let winner_id = rankings.first().map(|r| r.player_id);
        self.games.finish_game(game_id, winner_id).await?;

        self.require_game(game_id).await
    }

    pub async fn score_history(
        &self,
        game_id: Uuid,
    ) -> Result<HashMap<Uuid, Vec<f64>>, StatsError> {
        let game = self.require_game(game_id).await?;
        let rounds = self.games.list_rounds_for_game(game_id).await?;
        Ok(progression::build_score_history(&game.player_ids, &rounds))
    }

    pub async fn highlights(&self, game_id: Uuid) -> Result<Option<GameHighlights>, StatsError> {
        let game = self.require_game(game_id).await?;
        let rounds = self.games.list_rounds_for_game(game_id).await?;
        Ok(progression::game_highlights(&game.player_ids, &rounds))
    }

    pub async fn momentum(&self, game_id: Uuid) -> Result<HashMap<Uuid, Momentum>, StatsError> {
        let game = self.require_game(game_id).await?;
        let rounds = self.games.list_rounds_for_game(game_id).await?;
        Ok(progression::momentum(&game.player_ids, &rounds))
    }

    pub async fn taker_performance(
        &self,
        game_id: Uuid,
    ) -> Result<HashMap<Uuid, TakerPerformance>, StatsError> {
        let game = self.require_game(game_id).await?;
        let rounds = self.games.list_rounds_for_game(game_id).await?;
        Ok(progression::taker_performance(&game.player_ids, &rounds))
    }

    /// Rankings for one game, with display names resolved in one batch.
    pub async fn game_rankings(&self, game_id: Uuid) -> Result<Vec<PlayerRanking>, StatsError> {
        let game = self.require_game(game_id).await?;
        let rounds = self.games.list_rounds_for_game(game_id).await?;
        let players = self.players.list_players_by_ids(&game.player_ids).await?;
        Ok(statistics::player_rankings(
            &game,
            &rounds,
            &name_index(&players),
        ))
    }

    /// Aggregates a player's record across every game they were seated in.
    pub async fn player_statistics(
        &self,
        player_id: Uuid,
    ) -> Result<TarotPlayerStatistics, StatsError> {
        let games: Vec<TarotGame> = self
            .games
            .list_games()
            .await?
            .into_iter()
            .filter(|g| g.has_player(player_id))
            .collect();

        let mut all_rounds = Vec::new();
        for game in &games {
            all_rounds.extend(self.games.list_rounds_for_game(game.id).await?);
        }
        let taker_rounds = self.games.list_rounds_for_taker(player_id).await?;

        Ok(statistics::player_statistics(
            player_id,
            &games,
            &taker_rounds,
            &all_rounds,
        ))
    }

    pub async fn bid_statistics(&self, player_id: Uuid) -> Result<Vec<BidStatistics>, StatsError> {
        let taker_rounds = self.games.list_rounds_for_taker(player_id).await?;
        Ok(statistics::bid_statistics(&taker_rounds))
    }

    async fn require_game(&self, game_id: Uuid) -> Result<TarotGame, StatsError> {
        self.games
            .get_game(game_id)
            .await?
            .ok_or_else(|| StatsError::NotFound(format!("Game {}", game_id)))
    }
}
