//! Move execution: sowing, capture and turn hand-over.

use super::Rules;
use crate::board::Board;
use crate::contracts::{Contract, MoveContract};
use crate::error::MoveError;
use crate::game::Game;
use crate::types::{EntityKind, Player};
use tracing::{debug, info, instrument};

impl Rules {
    /// Plays the pit at 1-based `pit_position` for the player to move.
    ///
    /// Validates the move, sows its stones, resolves capture or extra turn,
    /// then checks for the end of the game. On the final move the remaining
    /// stones are swept, `next_player` is cleared and the outcome recorded.
    ///
    /// # Errors
    ///
    /// Preconditions are checked in order and the first failure is returned:
    /// [`MoveError::GameAlreadyEnded`], [`MoveError::InvalidPitIndex`],
    /// [`MoveError::NotPlayersPit`], [`MoveError::CannotMoveFromHouse`],
    /// [`MoveError::EmptyPit`]. Debug builds also verify postconditions and
    /// report [`MoveError::InvariantViolation`].
    #[instrument(skip(self, game), fields(game_id = %game.id(), player = %game.current_player()))]
    pub fn apply_move(&self, game: Game, pit_position: i32) -> Result<Game, MoveError> {
        let origin = MoveContract::pre(&game, &pit_position)?;
        let mover = game.current_player();
        let before = cfg!(debug_assertions).then(|| game.clone());

        let mut game = game;
        let landing = sow(game.board_mut(), origin, mover);
        let next = resolve_landing(game.board_mut(), landing, mover);
        game.set_next_player(Some(next));

        if let Some(outcome) = self.detect_winner(game.board_mut()) {
            info!(
                game_id = %game.id(),
                %outcome,
                player1 = game.board().house_stones(Player::Player1),
                player2 = game.board().house_stones(Player::Player2),
                "Game over"
            );
            game.set_next_player(None);
            game.set_outcome(Some(outcome));
        }

        if let Some(before) = before {
            MoveContract::post(&before, &game)?;
        }

        debug!(landing, next_player = ?game.next_player(), "Move applied");
        Ok(game)
    }
}

/// Empties `origin` and drops its stones one by one along the sowing path
/// of `mover`. Returns the slot that received the last stone.
fn sow(board: &mut Board, origin: usize, mover: Player) -> usize {
    let mut remaining = board.slot_mut(origin).take_stones();
    let mut cursor = origin;
    while remaining > 0 {
        cursor = Board::advance(cursor, mover);
        board.slot_mut(cursor).add_stones(1);
        remaining -= 1;
    }
    cursor
}

/// Applies the landing rules and returns the player to move next.
fn resolve_landing(board: &mut Board, landing: usize, mover: Player) -> Player {
    let slot = board.slots()[landing];
    match slot.kind() {
        EntityKind::Pit if slot.owner() == mover && slot.stones() == 1 => {
            capture(board, landing, mover);
            mover.opponent()
        }
        EntityKind::House if slot.owner() == mover => {
            debug!(%mover, "Last stone in own house, extra turn");
            mover
        }
        _ => mover.opponent(),
    }
}

/// Moves the landing stone and the opposite pit into the mover's house.
fn capture(board: &mut Board, landing: usize, mover: Player) {
    let Some(across) = Board::opposite(landing) else {
        return;
    };
    let captured = board.slot_mut(landing).take_stones() + board.slot_mut(across).take_stones();
    board
        .slot_mut(Board::house_index(mover))
        .add_stones(captured);
    debug!(%mover, landing, across, captured, "Captured opposite pit");
}
