use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::StatsError;

use super::models::{TarotGame, TarotRound};

/// Boundary to the Tarot game/round store. Rounds are append-only and live
/// with their parent game; deleting a game cascades to them.
#[async_trait]
pub trait TarotRepository: Send + Sync {
    async fn create_game(&self, game: &TarotGame) -> Result<(), StatsError>;
    async fn get_game(&self, game_id: Uuid) -> Result<Option<TarotGame>, StatsError>;
    async fn list_games(&self) -> Result<Vec<TarotGame>, StatsError>;
    async fn add_round(&self, round: &TarotRound) -> Result<(), StatsError>;
    /// Rounds ordered by round number.
    async fn list_rounds_for_game(&self, game_id: Uuid) -> Result<Vec<TarotRound>, StatsError>;
    /// Every round a player declared, across all games.
    async fn list_rounds_for_taker(&self, player_id: Uuid) -> Result<Vec<TarotRound>, StatsError>;
    async fn finish_game(&self, game_id: Uuid, winner_id: Option<Uuid>) -> Result<(), StatsError>;
    async fn delete_game(&self, game_id: Uuid) -> Result<(), StatsError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTarotRepository {
    games: Arc<RwLock<HashMap<Uuid, TarotGame>>>,
    rounds: Arc<RwLock<HashMap<Uuid, Vec<TarotRound>>>>,
}

impl InMemoryTarotRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
            rounds: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TarotRepository for InMemoryTarotRepository {
    async fn create_game(&self, game: &TarotGame) -> Result<(), StatsError> {
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

    async fn get_game(&self, game_id: Uuid) -> Result<Option<TarotGame>, StatsError> {
        let games = self.games.read().await;
        Ok(games.get(&game_id).cloned())
    }

    async fn list_games(&self) -> Result<Vec<TarotGame>, StatsError> {
        let games = self.games.read().await;
        let mut all: Vec<TarotGame> = games.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn add_round(&self, round: &TarotRound) -> Result<(), StatsError> {
        let games = self.games.read().await;
        let game = games
            .get(&round.game_id)
            .ok_or_else(|| StatsError::NotFound(format!("Game {}", round.game_id)))?;
        if game.finished {
            return Err(StatsError::Validation(format!(
                "Game {} is finished",
                game.id
            )));
        }
        drop(games);

        let mut rounds = self.rounds.write().await;
        let game_rounds = rounds.entry(round.game_id).or_default();
        if game_rounds
            .iter()
            .any(|r| r.round_number == round.round_number)
        {
            return Err(StatsError::Validation(format!(
                "Round {} already recorded for game {}",
                round.round_number, round.game_id
            )));
        }
        game_rounds.push(round.clone());
        drop(rounds);

        let mut games = self.games.write().await;
        if let Some(game) = games.get_mut(&round.game_id) {
            game.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_rounds_for_game(&self, game_id: Uuid) -> Result<Vec<TarotRound>, StatsError> {
        let rounds = self.rounds.read().await;
        let mut game_rounds = rounds.get(&game_id).cloned().unwrap_or_default();
        game_rounds.sort_by_key(|r| r.round_number);
        Ok(game_rounds)
    }

    async fn list_rounds_for_taker(&self, player_id: Uuid) -> Result<Vec<TarotRound>, StatsError> {
        let rounds = self.rounds.read().await;
        let mut taken: Vec<TarotRound> = rounds
            .values()
            .flatten()
            .filter(|r| r.taker_id == player_id)
            .cloned()
            .collect();
        taken.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(taken)
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
        let mut rounds = self.rounds.write().await;
        rounds.remove(&game_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tarot::models::{Bid, Chelem, RoundEntry};

    fn sample_game() -> TarotGame {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        TarotGame::new("Thursday", ids).unwrap()
    }

    fn sample_round(game: &TarotGame, number: u32) -> TarotRound {
        TarotRound::new(
            game,
            number,
            RoundEntry {
                taker_id: game.player_ids[0],
                bid: Bid::Garde,
                oudlers: 2,
                taker_points: 50,
                petit_au_bout: false,
                poignee: None,
                chelem: Chelem::None,
                called_partner_id: None,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn rounds_are_listed_in_round_order() {
        let repo = InMemoryTarotRepository::new();
        let game = sample_game();
        repo.create_game(&game).await.unwrap();

        repo.add_round(&sample_round(&game, 2)).await.unwrap();
        repo.add_round(&sample_round(&game, 1)).await.unwrap();

        let rounds = repo.list_rounds_for_game(game.id).await.unwrap();
        let numbers: Vec<u32> = rounds.iter().map(|r| r.round_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn duplicate_round_numbers_are_rejected() {
        let repo = InMemoryTarotRepository::new();
        let game = sample_game();
        repo.create_game(&game).await.unwrap();

        repo.add_round(&sample_round(&game, 1)).await.unwrap();
        let result = repo.add_round(&sample_round(&game, 1)).await;
        assert!(matches!(result, Err(StatsError::Validation(_))));
    }

    #[tokio::test]
    async fn adding_round_to_unknown_game_is_not_found() {
        let repo = InMemoryTarotRepository::new();
        let game = sample_game();
        let result = repo.add_round(&sample_round(&game, 1)).await;
        assert!(matches!(result, Err(StatsError::NotFound(_))));
    }

    #[tokio::test]
    async fn finished_games_reject_new_rounds() {
        let repo = InMemoryTarotRepository::new();
        let game = sample_game();
        repo.create_game(&game).await.unwrap();
        repo.finish_game(game.id, Some(game.player_ids[0]))
            .await
            .unwrap();

        let result = repo.add_round(&sample_round(&game, 1)).await;
        assert!(matches!(result, Err(StatsError::Validation(_))));

        let stored = repo.get_game(game.id).await.unwrap().unwrap();
        assert!(stored.finished);
        assert_eq!(stored.winner_id, Some(game.player_ids[0]));
    }

    #[tokio::test]
    async fn deleting_a_game_cascades_to_rounds() {
        let repo = InMemoryTarotRepository::new();
        let game = sample_game();
        repo.create_game(&game).await.unwrap();
        repo.add_round(&sample_round(&game, 1)).await.unwrap();

        repo.delete_game(game.id).await.unwrap();

        assert!(repo.get_game(game.id).await.unwrap().is_none());
        assert!(repo
            .list_rounds_for_game(game.id)
            .await
            .unwrap()
            .is_empty());
        assert!(repo
            .list_rounds_for_taker(game.player_ids[0])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn taker_rounds_span_games() {
        let repo = InMemoryTarotRepository::new();
        let shared_taker = Uuid::new_v4();

        let mut ids_a: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        ids_a[0] = shared_taker;
        let game_a = TarotGame::new("A", ids_a).unwrap();

        let mut ids_b: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        ids_b[0] = shared_taker;
        let game_b = TarotGame::new("B", ids_b).unwrap();

        repo.create_game(&game_a).await.unwrap();
        repo.create_game(&game_b).await.unwrap();
        repo.add_round(&sample_round(&game_a, 1)).await.unwrap();
        repo.add_round(&sample_round(&game_b, 1)).await.unwrap();

        let taken = repo.list_rounds_for_taker(shared_taker).await.unwrap();
        assert_eq!(taken.len(), 2);
    }
}
