pub mod models;
pub mod progression;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod statistics;

pub use models::{Bid, Chelem, PoigneeLevel, RoundEntry, TarotGame, TarotRound};
pub use repository::{InMemoryTarotRepository, TarotRepository};
pub use scoring::{score_round, RoundScore};
pub use service::TarotService;
