//! Game rules for Kalah.
//!
//! Sowing, capture, extra turns and end-of-game detection. The rules are
//! pure functions of the game value: a move consumes a [`Game`] and returns
//! the next one, so no caller ever sees a half-sown board.

mod sow;
mod win;

use super::error::MoveError;
use super::game::Game;
use super::types::{Outcome, Player};
use serde::{Deserialize, Serialize};

/// How a game whose houses end level is decided.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TieBreak {
    /// Level houses are a draw (traditional Kalah).
    #[default]
    Draw,
    /// Level houses go to Player2.
    SecondPlayer,
}

impl TieBreak {
    /// Outcome awarded when both houses hold the same count.
    pub fn outcome(self) -> Outcome {
        match self {
            TieBreak::Draw => Outcome::Draw,
            TieBreak::SecondPlayer => Outcome::Winner(Player::Player2),
        }
    }
}

/// Kalah rules engine.
///
/// Carries the policies that vary between rule sets; everything else is
/// fixed by the board layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rules {
    tie_break: TieBreak,
}

impl Rules {
    /// Creates rules with the given tie-break policy.
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Returns the tie-break policy.
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }
}

/// Applies a move under the default rules.
///
/// See [`Rules::apply_move`].
pub fn apply_move(game: Game, pit_position: i32) -> Result<Game, MoveError> {
    Rules::default().apply_move(game, pit_position)
}
