use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use uuid::Uuid;

use crate::shared::StatsError;
use crate::tarot::scoring::{self, RoundScore};

pub const MIN_TAROT_PLAYERS: usize = 3;
pub const MAX_TAROT_PLAYERS: usize = 5;

/// Card points reachable in a round. The taker's side holds between none
/// and all of the deck's point total.
pub const MAX_TAKER_POINTS: i32 = 91;

pub const MAX_OUDLERS: u8 = 3;

/// Contract levels a taker can announce, ordered by risk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum Bid {
    Petite,
    Garde,
    GardeSans,
    GardeContre,
}

impl Bid {
    /// Risk multiplier applied to the base contract points and to the
    /// petit au bout bonus.
    pub fn multiplier(&self) -> i32 {
        match self {
            Bid::Petite => 1,
            Bid::Garde => 2,
            Bid::GardeSans => 4,
            Bid::GardeContre => 6,
        }
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Bid::Petite => "Petite",
                Bid::Garde => "Garde",
                Bid::GardeSans => "Garde Sans",
                Bid::GardeContre => "Garde Contre",
            }
        )
    }
}

/// Announced trump handful. Worth a fixed amount, independent of the bid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum PoigneeLevel {
    Simple,
    Double,
    Triple,
}

impl PoigneeLevel {
    pub fn points(&self) -> i32 {
        match self {
            PoigneeLevel::Simple => 20,
            PoigneeLevel::Double => 30,
            PoigneeLevel::Triple => 40,
        }
    }
}

impl fmt::Display for PoigneeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PoigneeLevel::Simple => "Simple",
                PoigneeLevel::Double => "Double",
                PoigneeLevel::Triple => "Triple",
            }
        )
    }
}

/// Slam declaration state. Worth a fixed amount, independent of the bid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum Chelem {
    None,
    Announced,
    AnnouncedAndMade,
}

impl Chelem {
    pub fn points(&self) -> i32 {
        match self {
            Chelem::None => 0,
            Chelem::Announced => 200,
            Chelem::AnnouncedAndMade => 400,
        }
    }
}

impl fmt::Display for Chelem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Chelem::None => "None",
                Chelem::Announced => "Announced",
                Chelem::AnnouncedAndMade => "Announced and made",
            }
        )
    }
}

/// A Tarot score sheet: fixed seating, rounds appended as they are played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarotGame {
    pub id: Uuid,
    pub name: String,
    /// Seating order, fixed for the whole game.
    pub player_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished: bool,
    pub winner_id: Option<Uuid>,
}

impl TarotGame {
    pub fn new(name: impl Into<String>, player_ids: Vec<Uuid>) -> Result<Self, StatsError> {
        if player_ids.len() < MIN_TAROT_PLAYERS || player_ids.len() > MAX_TAROT_PLAYERS {
            return Err(StatsError::Validation(format!(
                "Tarot takes {} to {} players, got {}",
                MIN_TAROT_PLAYERS,
                MAX_TAROT_PLAYERS,
                player_ids.len()
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &player_ids {
            if !seen.insert(id) {
                return Err(StatsError::Validation(
                    "All seated players must be unique".to_string(),
                ));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            player_ids,
            created_at: now,
            updated_at: now,
            finished: false,
            winner_id: None,
        })
    }

    pub fn player_count(&self) -> usize {
        self.player_ids.len()
    }

    pub fn has_player(&self, player_id: Uuid) -> bool {
        self.player_ids.contains(&player_id)
    }
}

/// One played round. Append-only: never mutated after creation, deleted
/// only together with its parent game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarotRound {
    pub id: Uuid,
    pub game_id: Uuid,
    /// 1-based, sequential and unique within a game.
    pub round_number: u32,
    pub taker_id: Uuid,
    pub bid: Bid,
    pub oudlers: u8,
    pub taker_points: i32,
    pub petit_au_bout: bool,
    pub poignee: Option<PoigneeLevel>,
    pub chelem: Chelem,
    /// Only meaningful in 5-player games.
    pub called_partner_id: Option<Uuid>,
    /// Signed result, positive when the contract was made. Always equal to
    /// what the scoring engine derives from the fields above.
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// Everything a taker declares for one round, before scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoundEntry {
    pub taker_id: Uuid,
    pub bid: Bid,
    pub oudlers: u8,
    pub taker_points: i32,
    pub petit_au_bout: bool,
    pub poignee: Option<PoigneeLevel>,
    pub chelem: Chelem,
    pub called_partner_id: Option<Uuid>,
}

impl TarotRound {
    /// Validates the entry against the game's seating and scores it. The
    /// stored `score` is derived here so it can never drift from the fields.
    pub fn new(game: &TarotGame, round_number: u32, entry: RoundEntry) -> Result<Self, StatsError> {
        if round_number == 0 {
            return Err(StatsError::Validation(
                "Round numbers start at 1".to_string(),
            ));
        }
        if !game.has_player(entry.taker_id) {
            return Err(StatsError::Validation(format!(
                "Taker {} is not seated in game {}",
                entry.taker_id, game.id
            )));
        }
        if entry.oudlers > MAX_OUDLERS {
            return Err(StatsError::Validation(format!(
                "Oudler count must be 0-{}, got {}",
                MAX_OUDLERS, entry.oudlers
            )));
        }
        if entry.taker_points < 0 || entry.taker_points > MAX_TAKER_POINTS {
            return Err(StatsError::Validation(format!(
                "Taker points must be 0-{}, got {}",
                MAX_TAKER_POINTS, entry.taker_points
            )));
        }
        if let Some(partner_id) = entry.called_partner_id {
            if game.player_count() != MAX_TAROT_PLAYERS {
                return Err(StatsError::Validation(
                    "A partner can only be called in a 5-player game".to_string(),
                ));
            }
            if !game.has_player(partner_id) {
                return Err(StatsError::Validation(format!(
                    "Called partner {} is not seated in game {}",
                    partner_id, game.id
                )));
            }
        }

        let result = scoring::score_round(
            entry.bid,
            entry.oudlers,
            entry.taker_points,
            entry.petit_au_bout,
            entry.poignee,
            entry.chelem,
        );

        Ok(Self {
            id: Uuid::new_v4(),
            game_id: game.id,
            round_number,
            taker_id: entry.taker_id,
            bid: entry.bid,
            oudlers: entry.oudlers,
            taker_points: entry.taker_points,
            petit_au_bout: entry.petit_au_bout,
            poignee: entry.poignee,
            chelem: entry.chelem,
            called_partner_id: entry.called_partner_id,
            score: result.score,
            created_at: Utc::now(),
        })
    }

    /// Re-derives the full score breakdown from the stored fields.
    pub fn score_breakdown(&self) -> RoundScore {
        scoring::score_round(
            self.bid,
            self.oudlers,
            self.taker_points,
            self.petit_au_bout,
            self.poignee,
            self.chelem,
        )
    }

    pub fn contract_made(&self) -> bool {
        self.score >= 0
    }
}
