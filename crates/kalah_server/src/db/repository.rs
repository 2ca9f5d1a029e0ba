//! Diesel-backed [`GameStore`].

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use kalah_core::Game;
use tracing::{debug, info, instrument};

use crate::db::{GameRecord, NewGameRecord, schema};
use crate::store::{GameStore, StoreError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds SQLite waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for games.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// Every operation opens its own connection, so `":memory:"` does not
    /// persist between calls; use [`crate::InMemoryStore`] instead.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, StoreError> {
        if db_path.trim().is_empty() {
            return Err(StoreError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or a
    /// migration fails.
    #[instrument(skip(self), fields(db_path = %self.db_path))]
    pub fn run_migrations(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        Ok(conn)
    }

    /// Loads the raw row for a game, timestamps included.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn record(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        let mut conn = self.connection()?;
        let record = schema::games::table
            .find(id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(record)
    }

    /// Lists every stored game id, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection()?;
        let ids = schema::games::table
            .order((schema::games::updated_at.desc(), schema::games::id.asc()))
            .select(schema::games::id)
            .load::<String>(&mut conn)?;
        debug!(count = ids.len(), "Game ids loaded");
        Ok(ids)
    }
}

impl GameStore for GameRepository {
    #[instrument(skip(self))]
    fn load(&self, id: &str) -> Result<Option<Game>, StoreError> {
        match self.record(id)? {
            Some(record) => {
                debug!("Game found");
                record.to_game().map(Some)
            }
            None => {
                debug!("Game not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn save(&self, game: &Game) -> Result<(), StoreError> {
        let record = NewGameRecord::from_game(game)?;
        let mut conn = self.connection()?;
        let now = chrono::Utc::now().naive_utc();

        diesel::insert_into(schema::games::table)
            .values(&record)
            .on_conflict(schema::games::id)
            .do_update()
            .set((&record, schema::games::updated_at.eq(now)))
            .execute(&mut conn)?;

        debug!(next_player = ?game.next_player(), outcome = ?game.outcome(), "Game saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(schema::games::table.find(id)).execute(&mut conn)?;
        info!(removed, "Game deleted");
        Ok(removed > 0)
    }
}
