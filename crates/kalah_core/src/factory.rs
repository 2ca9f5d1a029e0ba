//! Board factory: fresh boards and fresh games.

use super::board::{Board, PITS_PER_PLAYER, SLOT_COUNT};
use super::error::SetupError;
use super::game::{Game, GameId};
use tracing::{debug, instrument};

/// Builds the starting board: six pits of `initial_stones` and an empty
/// house for each player.
///
/// # Errors
///
/// Returns [`SetupError::NoStones`] when `initial_stones` is zero.
#[instrument]
pub fn build_board(initial_stones: u32) -> Result<Board, SetupError> {
    if initial_stones == 0 {
        return Err(SetupError::NoStones);
    }

    let mut counts = [initial_stones; SLOT_COUNT];
    counts[PITS_PER_PLAYER] = 0;
    counts[SLOT_COUNT - 1] = 0;

    let board = Board::with_stones(counts);
    debug!(total = board.total_stones(), "Board built");
    Ok(board)
}

/// Creates a new game with no player to move yet and no outcome.
///
/// # Errors
///
/// Returns [`SetupError::NoStones`] when `initial_stones` is zero.
#[instrument(skip(id), fields(game_id = %id))]
pub fn create_game(id: GameId, initial_stones: u32) -> Result<Game, SetupError> {
    let board = build_board(initial_stones)?;
    Ok(Game::new(id, board))
}
