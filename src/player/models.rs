use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered player. Owned by the player-management side of the app;
/// the engines only read identity to label statistics output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub avatar_color: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl Player {
    pub fn new(name: impl Into<String>, avatar_color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            avatar_color: avatar_color.into(),
            is_active: true,
            created_at: Utc::now(),
            deactivated_at: None,
        }
    }

    /// Deactivation is the only mutation a player record supports.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.deactivated_at = Some(Utc::now());
    }

    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.deactivated_at = None;
    }
}

/// Builds an id -> display-name lookup from a batch of players. Aggregates
/// resolve names through one of these instead of querying per row.
pub fn name_index(players: &[Player]) -> HashMap<Uuid, String> {
    players
        .iter()
        .map(|player| (player.id, player.name.clone()))
        .collect()
}
