//! Game persistence seam.

use derive_more::{Display, Error};
use kalah_core::{Game, GameId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

/// Storage for games, keyed by id.
pub trait GameStore: Send + Sync {
    /// Loads a game. Returns `None` when no game has the id.
    fn load(&self, id: &str) -> Result<Option<Game>, StoreError>;

    /// Inserts the game or replaces the stored game with the same id.
    fn save(&self, game: &Game) -> Result<(), StoreError>;

    /// Removes a game. Returns whether anything was removed.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    games: Arc<Mutex<HashMap<GameId, Game>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no games.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<GameId, Game>> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameStore for InMemoryStore {
    #[instrument(skip(self))]
    fn load(&self, id: &str) -> Result<Option<Game>, StoreError> {
        let game = self.lock().get(id).cloned();
        debug!(found = game.is_some(), "Loaded game");
        Ok(game)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn save(&self, game: &Game) -> Result<(), StoreError> {
        self.lock().insert(game.id().to_string(), game.clone());
        debug!("Saved game");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.lock().remove(id).is_some();
        debug!(removed, "Deleted game");
        Ok(removed)
    }
}
