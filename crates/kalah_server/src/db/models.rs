//! Database rows and their mapping to [`Game`].

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use kalah_core::{Board, Game, Outcome, Player, SLOT_COUNT};
use tracing::instrument;

use crate::db::schema;
use crate::store::StoreError;

/// Stored game row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRecord {
    id: String,
    board: String,
    next_player: Option<String>,
    outcome: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRecord {
    /// Rebuilds the game this row was written from.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the board or a stored label is malformed.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn to_game(&self) -> Result<Game, StoreError> {
        let counts: [u32; SLOT_COUNT] = serde_json::from_str(&self.board)?;
        let next_player = self
            .next_player
            .as_deref()
            .map(player_from_db)
            .transpose()?;
        let outcome = self.outcome.as_deref().map(outcome_from_db).transpose()?;
        Ok(Game::from_parts(
            self.id.clone(),
            Board::with_stones(counts),
            next_player,
            outcome,
        ))
    }
}

/// Row written on insert or update.
#[derive(Debug, Clone, Insertable, AsChangeset, new, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(primary_key(id))]
#[diesel(treat_none_as_null = true)]
pub struct NewGameRecord {
    id: String,
    board: String,
    next_player: Option<String>,
    outcome: Option<String>,
}

impl NewGameRecord {
    /// Flattens a game into its stored columns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the board cannot be encoded.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, StoreError> {
        Ok(Self::new(
            game.id().to_string(),
            serde_json::to_string(&game.board().counts())?,
            game.next_player().map(|player| player.to_string()),
            game.outcome().map(|outcome| outcome_to_db(outcome).to_string()),
        ))
    }
}

#[track_caller]
fn player_from_db(s: &str) -> Result<Player, StoreError> {
    s.parse()
        .map_err(|_| StoreError::new(format!("Invalid player: '{}'", s)))
}

/// Converts an outcome to the string stored in the database.
#[instrument]
pub fn outcome_to_db(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Winner(Player::Player1) => "PLAYER1",
        Outcome::Winner(Player::Player2) => "PLAYER2",
        Outcome::Draw => "DRAW",
    }
}

/// Parses an outcome from the string stored in the database.
///
/// # Errors
///
/// Returns [`StoreError`] if the string is not a valid outcome value.
#[instrument(skip(s), fields(s = %s))]
pub fn outcome_from_db(s: &str) -> Result<Outcome, StoreError> {
    match s {
        "DRAW" => Ok(Outcome::Draw),
        other => player_from_db(other)
            .map(Outcome::Winner)
            .map_err(|_| StoreError::new(format!("Invalid outcome: '{}'", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kalah_core::create_game;

    #[test]
    fn test_outcome_strings() {
        for outcome in [
            Outcome::Winner(Player::Player1),
            Outcome::Winner(Player::Player2),
            Outcome::Draw,
        ] {
            assert_eq!(outcome_from_db(outcome_to_db(outcome)).unwrap(), outcome);
        }
        assert!(outcome_from_db("win").is_err());
    }

    #[test]
    fn test_new_record_columns() {
        let game = create_game("abc123".to_string(), 6).unwrap();
        let record = NewGameRecord::from_game(&game).unwrap();
        assert_eq!(record.id(), "abc123");
        assert_eq!(record.board(), "[6,6,6,6,6,6,0,6,6,6,6,6,6,0]");
        assert_eq!(*record.next_player(), None);
        assert_eq!(*record.outcome(), None);
    }

    #[test]
    fn test_malformed_board_rejected() {
        let record = GameRecord {
            id: "bad".to_string(),
            board: "[1,2,3]".to_string(),
            next_player: None,
            outcome: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        assert!(record.to_game().is_err());
    }

    #[test]
    fn test_unknown_player_rejected() {
        let record = GameRecord {
            id: "bad".to_string(),
            board: "[6,6,6,6,6,6,0,6,6,6,6,6,6,0]".to_string(),
            next_player: Some("PLAYER3".to_string()),
            outcome: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        let err = record.to_game().unwrap_err();
        assert!(err.message.contains("PLAYER3"));
    }
}
