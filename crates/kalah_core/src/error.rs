//! Errors raised by the Kalah rules.

use super::types::Player;

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Every pit is empty; the game is over.
    #[display("Game has ended already")]
    GameAlreadyEnded,

    /// Position is outside 1-14.
    #[display("Invalid pit id {}: must be between 1 and 14", _0)]
    InvalidPitIndex(i32),

    /// The slot belongs to the other player.
    #[display("Current player {} doesn't own the pit", _0)]
    NotPlayersPit(Player),

    /// The slot is a house.
    #[display("Move not allowed from a house for {}", _0)]
    CannotMoveFromHouse(Player),

    /// The pit holds no stones.
    #[display("Move not allowed from pit {}: no stones available", _0)]
    EmptyPit(usize),

    /// A postcondition failed after the move was applied.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// Error building a new board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SetupError {
    /// Pits must start with at least one stone.
    #[display("Initial stones per pit must be greater than zero")]
    NoStones,
}

impl std::error::Error for SetupError {}
