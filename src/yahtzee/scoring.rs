//! Category scoring for a single Yahtzee roll, plus the section bonus and
//! grand-total rules.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::models::{Category, DiceRoll};

/// One-time bonus for a strong upper section.
pub const UPPER_BONUS: i32 = 35;

/// Upper-section sum needed for the bonus; three of each face reaches it.
pub const UPPER_BONUS_THRESHOLD: i32 = 63;

/// Each yahtzee after the first is worth a flat bonus on top of the
/// category score, supplied to [`total_score`] by the caller.
pub const EXTRA_YAHTZEE_BONUS: i32 = 100;

const SMALL_STRAIGHTS: [[u8; 4]; 3] = [[1, 2, 3, 4], [2, 3, 4, 5], [3, 4, 5, 6]];
const LARGE_STRAIGHTS: [[u8; 5]; 2] = [[1, 2, 3, 4, 5], [2, 3, 4, 5, 6]];

/// Scores one roll against one category. Pure and total: a validated roll
/// always produces a value, zero when the pattern is missed.
pub fn score_category(roll: &DiceRoll, category: Category) -> i32 {
    match category {
        Category::Ones => face_total(roll, 1),
        Category::Twos => face_total(roll, 2),
        Category::Threes => face_total(roll, 3),
        Category::Fours => face_total(roll, 4),
        Category::Fives => face_total(roll, 5),
        Category::Sixes => face_total(roll, 6),
        Category::ThreeOfAKind => of_a_kind(roll, 3),
        Category::FourOfAKind => of_a_kind(roll, 4),
        Category::FullHouse => full_house(roll),
        Category::SmallStraight => straight(roll, &SMALL_STRAIGHTS, 30),
        Category::LargeStraight => straight(roll, &LARGE_STRAIGHTS, 40),
        Category::Yahtzee => {
            if roll.face_counts().contains(&5) {
                50
            } else {
                0
            }
        }
        Category::Chance => roll.sum(),
    }
}

fn face_total(roll: &DiceRoll, face: u8) -> i32 {
    i32::from(roll.face_counts()[usize::from(face) - 1]) * i32::from(face)
}

fn of_a_kind(roll: &DiceRoll, size: u8) -> i32 {
    if roll.face_counts().iter().any(|count| *count >= size) {
        roll.sum()
    } else {
        0
    }
}

fn full_house(roll: &DiceRoll) -> i32 {
    let mut groups: Vec<u8> = roll
        .face_counts()
        .into_iter()
        .filter(|count| *count > 0)
        .collect();
    groups.sort_unstable();
    if groups == [2, 3] {
        25
    } else {
        0
    }
}

fn straight<const N: usize>(roll: &DiceRoll, runs: &[[u8; N]], points: i32) -> i32 {
    let counts = roll.face_counts();
    let hit = runs.iter().any(|run| {
        run.iter()
            .all(|face| counts[usize::from(*face) - 1] > 0)
    });
    if hit {
        points
    } else {
        0
    }
}

/// Sum of the six face-value categories.
pub fn upper_total(scores: &HashMap<Category, i32>) -> i32 {
    Category::iter()
        .filter(Category::is_upper)
        .filter_map(|category| scores.get(&category))
        .sum()
}

/// Sum of the combination categories, without the upper bonus.
pub fn lower_total(scores: &HashMap<Category, i32>) -> i32 {
    Category::iter()
        .filter(|category| !category.is_upper())
        .filter_map(|category| scores.get(&category))
        .sum()
}

/// 35 iff the upper section reaches the 63-point threshold.
pub fn upper_section_bonus(scores: &HashMap<Category, i32>) -> i32 {
    if upper_total(scores) >= UPPER_BONUS_THRESHOLD {
        UPPER_BONUS
    } else {
        0
    }
}

/// Grand total: both sections, the upper bonus, and any extra yahtzee
/// bonus points the caller accumulated.
pub fn total_score(scores: &HashMap<Category, i32>, extra_bonus_points: i32) -> i32 {
    upper_total(scores) + upper_section_bonus(scores) + lower_total(scores) + extra_bonus_points
}
