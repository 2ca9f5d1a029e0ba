//! Kalah game service.
//!
//! Hosts [`kalah_core`] games behind a REST API: games are created, moved
//! and fetched through [`KalahService`], which persists them in a
//! [`GameStore`] (SQLite via [`GameRepository`], or [`InMemoryStore`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod db;
mod service;
mod store;

pub use api::{ApiError, AppState, ErrorResponse, GameView, game_url, router};
pub use config::{ConfigError, ServerConfig};
pub use db::{GameRecord, GameRepository, NewGameRecord, outcome_from_db, outcome_to_db};
pub use service::{KalahService, ServiceError};
pub use store::{GameStore, InMemoryStore, StoreError};
