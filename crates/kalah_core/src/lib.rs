//! Kalah rules engine.
//!
//! Pure, synchronous game logic for six-pit Kalah: board layout, sowing with
//! the opponent-house skip, captures, extra turns and the end-of-game sweep.
//! Storage and transport live elsewhere; this crate only turns a game value
//! plus a chosen position into the next game value.
//!
//! # Example
//!
//! ```
//! use kalah_core::{apply_move, create_game, Player};
//!
//! let game = create_game("demo".to_string(), 6)?;
//! // Six stones from position 1 finish in Player1's own house.
//! let game = apply_move(game, 1)?;
//! assert_eq!(game.next_player(), Some(Player::Player1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod contracts;
mod error;
mod factory;
mod game;
mod invariants;
mod rules;
mod types;

pub use board::{Board, PITS_PER_PLAYER, SLOT_COUNT};
pub use contracts::{Contract, LegalMove, MoveContract};
pub use error::{MoveError, SetupError};
pub use factory::{build_board, create_game};
pub use game::{Game, GameId};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, KalahInvariants};
pub use rules::{Rules, TieBreak, apply_move};
pub use types::{Entity, EntityKind, Outcome, Player};
