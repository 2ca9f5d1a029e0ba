//! Game state: board, turn and outcome.

use super::board::Board;
use super::types::{Outcome, Player};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a game, assigned by whoever stores it.
pub type GameId = String;

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Game identifier.
    id: GameId,
    /// The board.
    board: Board,
    /// Player to move; `None` before the first move and after the end.
    next_player: Option<Player>,
    /// Set once the game is over.
    outcome: Option<Outcome>,
}

impl Game {
    /// Creates a game that has not seen a move yet.
    pub fn new(id: GameId, board: Board) -> Self {
        Self {
            id,
            board,
            next_player: None,
            outcome: None,
        }
    }

    /// Reassembles a game from stored parts.
    pub fn from_parts(
        id: GameId,
        board: Board,
        next_player: Option<Player>,
        outcome: Option<Outcome>,
    ) -> Self {
        Self {
            id,
            board,
            next_player,
            outcome,
        }
    }

    /// Returns the game identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player recorded to move next, if any.
    pub fn next_player(&self) -> Option<Player> {
        self.next_player
    }

    /// Returns the player whose move it is. The first move belongs to
    /// Player1.
    pub fn current_player(&self) -> Player {
        self.next_player.unwrap_or(Player::Player1)
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns the winner, if the game ended with one.
    pub fn winner(&self) -> Option<Player> {
        self.outcome.and_then(|outcome| outcome.winner())
    }

    /// True once an outcome has been decided.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Stone count per 1-based slot position (1-14).
    pub fn describe(&self) -> BTreeMap<usize, u32> {
        self.board
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| (index + 1, slot.stones()))
            .collect()
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn set_next_player(&mut self, player: Option<Player>) {
        self.next_player = player;
    }

    pub(crate) fn set_outcome(&mut self, outcome: Option<Outcome>) {
        self.outcome = outcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::build_board;

    #[test]
    fn test_describe_is_one_based() {
        let game = Game::new("g".to_string(), build_board(3).unwrap());
        let view = game.describe();
        assert_eq!(view.len(), 14);
        assert_eq!(view.keys().next(), Some(&1));
        assert_eq!(view[&1], 3);
        assert_eq!(view[&7], 0);
        assert_eq!(view[&14], 0);
    }

    #[test]
    fn test_current_player_defaults_to_player1() {
        let game = Game::new("g".to_string(), build_board(3).unwrap());
        assert_eq!(game.next_player(), None);
        assert_eq!(game.current_player(), Player::Player1);
    }

    #[test]
    fn test_winner_from_outcome() {
        let board = build_board(1).unwrap();
        let won = Game::from_parts(
            "g".to_string(),
            board.clone(),
            None,
            Some(Outcome::Winner(Player::Player2)),
        );
        assert_eq!(won.winner(), Some(Player::Player2));
        assert!(won.is_over());

        let drawn = Game::from_parts("g".to_string(), board, None, Some(Outcome::Draw));
        assert_eq!(drawn.winner(), None);
        assert!(drawn.is_over());
    }
}
