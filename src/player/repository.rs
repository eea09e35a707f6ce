use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::StatsError;

use super::models::Player;

/// Read-oriented boundary to the player store. The engines only ever need
/// identity resolution; creation and (de)activation exist for the
/// player-management side that owns these records.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn create_player(&self, player: &Player) -> Result<(), StatsError>;
    async fn get_player(&self, player_id: Uuid) -> Result<Option<Player>, StatsError>;
    async fn list_players(&self) -> Result<Vec<Player>, StatsError>;
    async fn list_players_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Player>, StatsError>;
    async fn set_active(&self, player_id: Uuid, active: bool) -> Result<(), StatsError>;
}

#[derive(Debug, Default)]
pub struct InMemoryPlayerRepository {
    players: Arc<RwLock<HashMap<Uuid, Player>>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), StatsError> {
        let mut players = self.players.write().await;
        if players.contains_key(&player.id) {
            return Err(StatsError::Validation(format!(
                "Player {} already exists",
                player.id
            )));
        }
        players.insert(player.id, player.clone());
        Ok(())
    }

    async fn get_player(&self, player_id: Uuid) -> Result<Option<Player>, StatsError> {
        let players = self.players.read().await;
        Ok(players.get(&player_id).cloned())
    }

    async fn list_players(&self) -> Result<Vec<Player>, StatsError> {
        let players = self.players.read().await;
        let mut all: Vec<Player> = players.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn list_players_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Player>, StatsError> {
        let players = self.players.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| players.get(id).cloned())
            .collect())
    }

    async fn set_active(&self, player_id: Uuid, active: bool) -> Result<(), StatsError> {
        let mut players = self.players.write().await;
        let player = players
            .get_mut(&player_id)
            .ok_or_else(|| StatsError::NotFound(format!("Player {}", player_id)))?;
        if active {
            player.reactivate();
        } else {
            player.deactivate();
        }
        Ok(())
    }
}
