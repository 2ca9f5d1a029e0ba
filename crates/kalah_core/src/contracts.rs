//! Contract-based validation for Kalah moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P} move {Q}. Preconditions are always checked; postconditions run in
//! debug builds only.

use super::board::{Board, SLOT_COUNT};
use super::error::MoveError;
use super::game::Game;
use super::invariants::{InvariantSet, KalahInvariants};
use super::types::Player;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// What a passed precondition hands to the transition.
    type Checked;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<Self::Checked, MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: at least one pit still holds stones.
pub struct GameNotEnded;

impl GameNotEnded {
    #[instrument(skip(game))]
    pub fn check(game: &Game) -> Result<(), MoveError> {
        if game.board().pits_total() == 0 {
            warn!(game_id = %game.id(), "Move attempted on finished game");
            Err(MoveError::GameAlreadyEnded)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the 1-based position names a slot. Yields the 0-based index.
pub struct PositionOnBoard;

impl PositionOnBoard {
    #[instrument]
    pub fn check(pit_position: i32) -> Result<usize, MoveError> {
        usize::try_from(pit_position)
            .ok()
            .filter(|position| (1..=SLOT_COUNT).contains(position))
            .map(|position| position - 1)
            .ok_or(MoveError::InvalidPitIndex(pit_position))
    }
}

/// Precondition: the slot is a non-empty pit of the player to move.
pub struct PlayablePit;

impl PlayablePit {
    #[instrument(skip(board))]
    pub fn check(board: &Board, index: usize, player: Player) -> Result<(), MoveError> {
        let slot = board
            .get(index)
            .ok_or(MoveError::InvalidPitIndex(index as i32 + 1))?;
        if slot.owner() != player {
            return Err(MoveError::NotPlayersPit(player));
        }
        if slot.is_house() {
            return Err(MoveError::CannotMoveFromHouse(player));
        }
        if slot.stones() == 0 {
            return Err(MoveError::EmptyPit(index + 1));
        }
        Ok(())
    }
}

/// Composite precondition, in rule order.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for playing `pit_position`.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn check(game: &Game, pit_position: i32) -> Result<usize, MoveError> {
        GameNotEnded::check(game)?;
        let index = PositionOnBoard::check(pit_position)?;
        PlayablePit::check(game.board(), index, game.current_player())?;
        Ok(index)
    }
}

// ─────────────────────────────────────────────────────────────
//  Relational Postconditions
// ─────────────────────────────────────────────────────────────

/// Postcondition: no stone is created or destroyed by a move.
pub struct StonesConserved;

impl StonesConserved {
    pub fn holds(before: &Game, after: &Game) -> bool {
        before.board().total_stones() == after.board().total_stones()
    }
}

/// Postcondition: house counts never go down.
pub struct HousesNeverShrink;

impl HousesNeverShrink {
    pub fn holds(before: &Game, after: &Game) -> bool {
        [Player::Player1, Player::Player2]
            .into_iter()
            .all(|player| after.board().house_stones(player) >= before.board().house_stones(player))
    }
}

/// Postcondition: sowing never drops a stone in the opponent's house.
///
/// Only the final sweep may fill the opponent's house, so the check is
/// limited to moves that leave the game running.
pub struct OpponentHouseSkipped;

impl OpponentHouseSkipped {
    pub fn holds(before: &Game, after: &Game) -> bool {
        let opponent = before.current_player().opponent();
        after.is_over()
            || after.board().house_stones(opponent) == before.board().house_stones(opponent)
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move actions.
///
/// Preconditions:
/// - Game has stones left in some pit
/// - Position is 1-14
/// - Slot is a non-empty pit of the player to move
///
/// Postconditions:
/// - Stones are conserved
/// - Houses never shrink
/// - The opponent's house is skipped
/// - [`KalahInvariants`] hold
pub struct MoveContract;

impl Contract<Game, i32> for MoveContract {
    type Checked = usize;

    fn pre(game: &Game, pit_position: &i32) -> Result<usize, MoveError> {
        LegalMove::check(game, *pit_position)
    }

    fn post(before: &Game, after: &Game) -> Result<(), MoveError> {
        let mut failures = Vec::new();
        if !StonesConserved::holds(before, after) {
            failures.push("Stones are conserved".to_string());
        }
        if !HousesNeverShrink::holds(before, after) {
            failures.push("Houses never shrink".to_string());
        }
        if !OpponentHouseSkipped::holds(before, after) {
            failures.push("Sowing skips the opponent's house".to_string());
        }
        if let Err(violations) = KalahInvariants::check_all(after) {
            failures.extend(violations.into_iter().map(|v| v.description));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                failures.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_game;
    use crate::rules::apply_move;

    fn fresh() -> Game {
        create_game("g".to_string(), 6).unwrap()
    }

    #[test]
    fn test_precondition_order_ended_before_range() {
        let board = Board::with_stones([0, 0, 0, 0, 0, 0, 40, 0, 0, 0, 0, 0, 0, 32]);
        let game = Game::from_parts("g".to_string(), board, None, None);
        assert_eq!(
            MoveContract::pre(&game, &99),
            Err(MoveError::GameAlreadyEnded)
        );
    }

    #[test]
    fn test_position_bounds() {
        assert_eq!(PositionOnBoard::check(1), Ok(0));
        assert_eq!(PositionOnBoard::check(14), Ok(13));
        assert_eq!(PositionOnBoard::check(0), Err(MoveError::InvalidPitIndex(0)));
        assert_eq!(PositionOnBoard::check(15), Err(MoveError::InvalidPitIndex(15)));
        assert_eq!(PositionOnBoard::check(-3), Err(MoveError::InvalidPitIndex(-3)));
    }

    #[test]
    fn test_owner_checked_before_kind() {
        // Position 14 is Player2's house; Player1 is to move.
        assert_eq!(
            MoveContract::pre(&fresh(), &14),
            Err(MoveError::NotPlayersPit(Player::Player1))
        );
        assert_eq!(
            MoveContract::pre(&fresh(), &7),
            Err(MoveError::CannotMoveFromHouse(Player::Player1))
        );
    }

    #[test]
    fn test_empty_pit_rejected() {
        let board = Board::with_stones([0, 6, 6, 6, 6, 6, 0, 6, 6, 6, 6, 6, 6, 6]);
        let game = Game::from_parts("g".to_string(), board, Some(Player::Player1), None);
        assert_eq!(MoveContract::pre(&game, &1), Err(MoveError::EmptyPit(1)));
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = fresh();
        let after = apply_move(before.clone(), 3).unwrap();
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_created_stones() {
        let before = fresh();
        let mut counts = before.board().counts();
        counts[0] += 1;
        let after = Game::from_parts(
            "g".to_string(),
            Board::with_stones(counts),
            Some(Player::Player2),
            None,
        );
        let err = MoveContract::post(&before, &after).unwrap_err();
        assert!(err.to_string().contains("Stones are conserved"));
    }

    #[test]
    fn test_postcondition_detects_sowing_into_opponent_house() {
        let before = fresh();
        let mut counts = before.board().counts();
        counts[0] -= 1;
        counts[13] += 1;
        let after = Game::from_parts(
            "g".to_string(),
            Board::with_stones(counts),
            Some(Player::Player2),
            None,
        );
        let err = MoveContract::post(&before, &after).unwrap_err();
        assert!(err.to_string().contains("opponent's house"));
    }
}
