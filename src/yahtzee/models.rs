use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use uuid::Uuid;

use crate::shared::StatsError;

pub const MIN_DICE_PLAYERS: usize = 1;
pub const MAX_DICE_PLAYERS: usize = 8;

pub const DICE_PER_ROLL: usize = 5;
pub const MIN_FACE: u8 = 1;
pub const MAX_FACE: u8 = 6;

/// The 13 scorecard categories. The upper section is keyed by face value,
/// the lower by combination pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    /// The face this upper-section category counts, if it is one.
    pub fn face_value(&self) -> Option<u8> {
        match self {
            Category::Ones => Some(1),
            Category::Twos => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }

    pub fn is_upper(&self) -> bool {
        self.face_value().is_some()
    }

    /// The all-or-nothing value of a fixed-score category.
    pub fn fixed_score(&self) -> Option<i32> {
        match self {
            Category::FullHouse => Some(25),
            Category::SmallStraight => Some(30),
            Category::LargeStraight => Some(40),
            Category::Yahtzee => Some(50),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Category::Ones => "Ones",
                Category::Twos => "Twos",
                Category::Threes => "Threes",
                Category::Fours => "Fours",
                Category::Fives => "Fives",
                Category::Sixes => "Sixes",
                Category::ThreeOfAKind => "Three of a Kind",
                Category::FourOfAKind => "Four of a Kind",
                Category::FullHouse => "Full House",
                Category::SmallStraight => "Small Straight",
                Category::LargeStraight => "Large Straight",
                Category::Yahtzee => "Yahtzee",
                Category::Chance => "Chance",
            }
        )
    }
}

/// A validated hand of five dice, faces 1-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceRoll([u8; DICE_PER_ROLL]);

impl DiceRoll {
    pub fn new(faces: [u8; DICE_PER_ROLL]) -> Result<Self, StatsError> {
        for face in faces {
            if !(MIN_FACE..=MAX_FACE).contains(&face) {
                return Err(StatsError::Validation(format!(
                    "Die face must be {}-{}, got {}",
                    MIN_FACE, MAX_FACE, face
                )));
            }
        }
        Ok(Self(faces))
    }

    pub fn faces(&self) -> &[u8; DICE_PER_ROLL] {
        &self.0
    }

    pub fn sum(&self) -> i32 {
        self.0.iter().map(|f| i32::from(*f)).sum()
    }

    /// How often each face appears, indexed by face minus one.
    pub fn face_counts(&self) -> [u8; MAX_FACE as usize] {
        let mut counts = [0u8; MAX_FACE as usize];
        for face in self.0 {
            counts[usize::from(face) - 1] += 1;
        }
        counts
    }
}

impl TryFrom<[u8; DICE_PER_ROLL]> for DiceRoll {
    type Error = StatsError;

    fn try_from(faces: [u8; DICE_PER_ROLL]) -> Result<Self, Self::Error> {
        Self::new(faces)
    }
}

/// A Yahtzee score sheet: fixed seating, one score per player and category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceGame {
    pub id: Uuid,
    pub name: String,
    pub player_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished: bool,
    pub winner_id: Option<Uuid>,
}

impl DiceGame {
    pub fn new(name: impl Into<String>, player_ids: Vec<Uuid>) -> Result<Self, StatsError> {
        if player_ids.len() < MIN_DICE_PLAYERS || player_ids.len() > MAX_DICE_PLAYERS {
            return Err(StatsError::Validation(format!(
                "Yahtzee takes {} to {} players, got {}",
                MIN_DICE_PLAYERS,
                MAX_DICE_PLAYERS,
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

/// One cell of a player's scorecard. Upserted on
/// `(game_id, player_id, category)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceScore {
    pub id: Uuid,
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub category: Category,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl DiceScore {
    pub fn new(
        game: &DiceGame,
        player_id: Uuid,
        category: Category,
        value: i32,
    ) -> Result<Self, StatsError> {
        if !game.has_player(player_id) {
            return Err(StatsError::Validation(format!(
                "Player {} is not seated in game {}",
                player_id, game.id
            )));
        }
        validate_value(category, value)?;

        Ok(Self {
            id: Uuid::new_v4(),
            game_id: game.id,
            player_id,
            category,
            value,
            created_at: Utc::now(),
        })
    }
}

/// Checks that a value is achievable by the category's rule: upper values
/// are multiples of the face up to five dice, fixed categories are
/// all-or-nothing, and the summed categories stay within a five-dice sum.
pub fn validate_value(category: Category, value: i32) -> Result<(), StatsError> {
    let achievable = if let Some(face) = category.face_value() {
        let face = i32::from(face);
        value >= 0 && value <= face * DICE_PER_ROLL as i32 && value % face == 0
    } else if let Some(fixed) = category.fixed_score() {
        value == 0 || value == fixed
    } else {
        // Summed categories: zero for a scratch, otherwise a five-dice sum.
        let min_sum = i32::from(MIN_FACE) * DICE_PER_ROLL as i32;
        let max_sum = i32::from(MAX_FACE) * DICE_PER_ROLL as i32;
        value == 0 || (min_sum..=max_sum).contains(&value)
    };

    if achievable {
        Ok(())
    } else {
        Err(StatsError::Validation(format!(
            "{} cannot score {}",
            category, value
        )))
    }
}
