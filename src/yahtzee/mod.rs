pub mod global;
pub mod models;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod statistics;

pub use global::{GlobalStatistics, HighScoreRecord, LeaderboardEntry};
pub use models::{Category, DiceGame, DiceRoll, DiceScore};
pub use repository::{InMemoryYahtzeeRepository, YahtzeeRepository};
pub use scoring::{score_category, total_score, upper_section_bonus};
pub use service::YahtzeeService;
