//! SQLite persistence for games.

mod error;
mod models;
mod repository;
mod schema;

pub use models::{GameRecord, NewGameRecord, outcome_from_db, outcome_to_db};
pub use repository::GameRepository;
