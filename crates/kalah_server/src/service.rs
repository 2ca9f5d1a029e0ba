//! Game lifecycle business logic.

use derive_more::{Display, From};
use kalah_core::{GameId, Game, MoveError, Rules, SetupError, create_game};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::store::{GameStore, StoreError};

/// Length of generated game ids.
const ID_LENGTH: usize = 6;

/// Fresh ids tried before giving up on a crowded store.
const ID_ATTEMPTS: usize = 16;

/// Errors from game service operations.
#[derive(Debug, Display, From)]
pub enum ServiceError {
    /// No game has the requested id.
    #[display("Game {} not found", _0)]
    #[from(ignore)]
    NotFound(GameId),

    /// The move was rejected by the rules.
    #[display("{}", _0)]
    Move(MoveError),

    /// A new board could not be built.
    #[display("{}", _0)]
    Setup(SetupError),

    /// The store failed.
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::NotFound(_) => None,
            ServiceError::Move(e) => Some(e),
            ServiceError::Setup(e) => Some(e),
            ServiceError::Store(e) => Some(e),
        }
    }
}

/// Service layer for Kalah games.
///
/// Wraps a [`GameStore`] with id minting, move application and per-game
/// serialization of moves. Clones share the store and the locks.
#[derive(Clone)]
pub struct KalahService {
    store: Arc<dyn GameStore>,
    rules: Rules,
    initial_stones: u32,
    locks: Arc<Mutex<HashMap<GameId, Arc<Mutex<()>>>>>,
}

impl std::fmt::Debug for KalahService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalahService")
            .field("rules", &self.rules)
            .field("initial_stones", &self.initial_stones)
            .finish_non_exhaustive()
    }
}

impl KalahService {
    /// Creates a service over the given store.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn GameStore>, rules: Rules, initial_stones: u32) -> Self {
        info!("Creating KalahService");
        Self {
            store,
            rules,
            initial_stones,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Rules applied to every move.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Starts a new game under a fresh id and stores it.
    #[instrument(skip(self))]
    pub fn create_game(&self) -> Result<Game, ServiceError> {
        let id = self.mint_id()?;
        let game = create_game(id, self.initial_stones)?;
        self.store.save(&game)?;
        info!(game_id = %game.id(), initial_stones = self.initial_stones, "Game created");
        Ok(game)
    }

    /// Plays the stones at 1-based `pit_position` for whoever is to move.
    ///
    /// Moves on the same game are applied one at a time; a rejected move
    /// leaves the stored game untouched.
    #[instrument(skip(self))]
    pub fn make_move(&self, id: &str, pit_position: i32) -> Result<Game, ServiceError> {
        self.with_game_lock(id, || {
            let game = self.fetch_game(id)?;
            let mover = game.current_player();
            let game = self.rules.apply_move(game, pit_position).map_err(|e| {
                warn!(error = %e, player = %mover, "Move rejected");
                e
            })?;
            self.store.save(&game)?;

            match game.outcome() {
                Some(outcome) => info!(%outcome, "Game finished"),
                None => debug!(next_player = ?game.next_player(), "Move applied"),
            }
            Ok(game)
        })
    }

    /// Loads a game.
    #[instrument(skip(self))]
    pub fn fetch_game(&self, id: &str) -> Result<Game, ServiceError> {
        self.store.load(id)?.ok_or_else(|| {
            warn!("Game not found");
            ServiceError::NotFound(id.to_string())
        })
    }

    /// Removes a game. Removing a game that does not exist is not an error.
    #[instrument(skip(self))]
    pub fn delete_game(&self, id: &str) -> Result<(), ServiceError> {
        self.with_game_lock(id, || {
            let removed = self.store.delete(id)?;
            debug!(removed, "Game delete handled");
            Ok(())
        })
    }

    /// Runs `work` while holding the lock for `id`.
    fn with_game_lock<T>(&self, id: &str, work: impl FnOnce() -> T) -> T {
        let lock = self.acquire_lock(id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            work()
        };
        self.release_lock(id, lock);
        result
    }

    fn acquire_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    /// Drops the map entry once no other caller holds or waits on it.
    ///
    /// Clones are only handed out under the map lock, so the count cannot
    /// grow while it is checked here.
    fn release_lock(&self, id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let unshared = Arc::strong_count(&lock) == 2
            && locks.get(id).is_some_and(|held| Arc::ptr_eq(held, &lock));
        if unshared {
            locks.remove(id);
        }
    }

    fn mint_id(&self) -> Result<GameId, ServiceError> {
        for _ in 0..ID_ATTEMPTS {
            let id: GameId = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(ID_LENGTH)
                .map(char::from)
                .collect();
            if self.store.load(&id)?.is_none() {
                return Ok(id);
            }
            debug!(game_id = %id, "Id already taken");
        }
        Err(StoreError::new("Could not find a free game id").into())
    }
}
