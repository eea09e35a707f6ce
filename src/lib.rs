// Scoring and statistics engine for Tarot and Yahtzee score sheets.
// Storage and presentation live outside this crate; everything here is a
// pure transformation over snapshots fetched through the repository traits.

pub mod player;
pub mod shared;
pub mod tarot;
pub mod yahtzee;

// Re-export commonly used types for easier access in tests and embedders
pub use player::{InMemoryPlayerRepository, Player, PlayerRepository};
pub use shared::StatsError;
pub use tarot::{InMemoryTarotRepository, TarotRepository, TarotService};
pub use yahtzee::{InMemoryYahtzeeRepository, YahtzeeRepository, YahtzeeService};
