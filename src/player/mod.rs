pub mod models;
pub mod repository;

pub use models::{name_index, Player};
pub use repository::{InMemoryPlayerRepository, PlayerRepository};
