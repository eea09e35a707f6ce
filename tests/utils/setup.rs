use std::sync::Arc;

use uuid::Uuid;

use tablier::player::{InMemoryPlayerRepository, Player, PlayerRepository};
use tablier::tarot::{
    Bid, Chelem, InMemoryTarotRepository, PoigneeLevel, RoundEntry, TarotGame, TarotService,
};
use tablier::yahtzee::{InMemoryYahtzeeRepository, YahtzeeService};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TarotSetup {
    pub service: TarotService,
    pub player_ids: Vec<Uuid>,
}

pub struct TarotSetupBuilder {
    player_names: Vec<String>,
}

impl TarotSetupBuilder {
    pub fn new() -> Self {
        Self {
            player_names: vec![],
        }
    }

    pub fn with_players(mut self, names: Vec<&str>) -> Self {
        self.player_names = names.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie", "david"])
    }

    pub fn with_five_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie", "david", "eve"])
    }

    pub async fn build(self) -> TarotSetup {
        let players = Arc::new(InMemoryPlayerRepository::new());
        let mut player_ids = Vec::new();
        for name in &self.player_names {
            let player = Player::new(name.clone(), "#808080");
            players.create_player(&player).await.unwrap();
            player_ids.push(player.id);
        }

        let service = TarotService::new(Arc::new(InMemoryTarotRepository::new()), players);
        TarotSetup {
            service,
            player_ids,
        }
    }
}

impl TarotSetup {
    pub async fn game(&self, name: &str) -> TarotGame {
        self.service
            .create_game(name, self.player_ids.clone())
            .await
            .unwrap()
    }
}

/// A plain contract round: no bonuses, taker chosen by seat index.
pub fn round_entry(setup: &TarotSetup, taker_seat: usize, taker_points: i32) -> RoundEntry {
    RoundEntry {
        taker_id: setup.player_ids[taker_seat],
        bid: Bid::Garde,
        oudlers: 1,
        taker_points,
        petit_au_bout: false,
        poignee: None,
        chelem: Chelem::None,
        called_partner_id: None,
    }
}

/// A garde at one oudler with 60 points and the petit au bout.
pub fn garde_with_petit(setup: &TarotSetup, taker_seat: usize) -> RoundEntry {
    RoundEntry {
        petit_au_bout: true,
        ..round_entry(setup, taker_seat, 60)
    }
}

/// A loud round with every bonus declared.
pub fn all_bonuses(setup: &TarotSetup, taker_seat: usize, taker_points: i32) -> RoundEntry {
    RoundEntry {
        petit_au_bout: true,
        poignee: Some(PoigneeLevel::Double),
        chelem: Chelem::Announced,
        ..round_entry(setup, taker_seat, taker_points)
    }
}

pub struct YahtzeeSetup {
    pub service: YahtzeeService,
    pub player_ids: Vec<Uuid>,
}

pub struct YahtzeeSetupBuilder {
    player_names: Vec<String>,
}

impl YahtzeeSetupBuilder {
    pub fn new() -> Self {
        Self {
            player_names: vec![],
        }
    }

    pub fn with_players(mut self, names: Vec<&str>) -> Self {
        self.player_names = names.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub async fn build(self) -> YahtzeeSetup {
        let players = Arc::new(InMemoryPlayerRepository::new());
        let mut player_ids = Vec::new();
        for name in &self.player_names {
            let player = Player::new(name.clone(), "#808080");
            players.create_player(&player).await.unwrap();
            player_ids.push(player.id);
        }

        let service = YahtzeeService::new(Arc::new(InMemoryYahtzeeRepository::new()), players);
        YahtzeeSetup {
            service,
            player_ids,
        }
    }
}
