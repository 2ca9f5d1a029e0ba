//! First-class invariants for Kalah games.
//!
//! Invariants are logical properties that hold for every reachable game.
//! They are checked after each move in debug builds and can be tested
//! independently.

use super::game::Game;
use super::types::Player;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: a game without an outcome has stones in both players' pits.
///
/// The win detector runs after every move, so an exhausted side always
/// ends the game.
pub struct InProgressHasStones;

impl Invariant<Game> for InProgressHasStones {
    fn holds(game: &Game) -> bool {
        game.is_over()
            || (game.board().pit_sum(Player::Player1) > 0
                && game.board().pit_sum(Player::Player2) > 0)
    }

    fn description() -> &'static str {
        "Unfinished game has stones on both sides"
    }
}

/// Invariant: a finished game has nobody to move and every pit swept.
pub struct FinishedIsSettled;

impl Invariant<Game> for FinishedIsSettled {
    fn holds(game: &Game) -> bool {
        !game.is_over() || (game.next_player().is_none() && game.board().pits_total() == 0)
    }

    fn description() -> &'static str {
        "Finished game has no next player and empty pits"
    }
}

/// All Kalah invariants as a composable set.
pub type KalahInvariants = (InProgressHasStones, FinishedIsSettled);
