//! End-of-game detection for Kalah.

use super::Rules;
use crate::board::Board;
use crate::types::{Outcome, Player};
use std::cmp::Ordering;
use tracing::{debug, instrument};

impl Rules {
    /// Checks whether the game is over and settles the board if it is.
    ///
    /// When Player1's pits are empty, Player2 sweeps; otherwise when
    /// Player2's pits are empty, Player1 sweeps. The sweeping player's pit
    /// stones move into their own house, then the houses are compared.
    /// Level houses are resolved by the tie-break policy.
    ///
    /// Returns `None` and leaves the board untouched while both players
    /// still have stones in their pits. Calling it again on a settled board
    /// returns the same outcome and changes nothing.
    #[instrument(skip(self, board), fields(tie_break = %self.tie_break))]
    pub fn detect_winner(&self, board: &mut Board) -> Option<Outcome> {
        let sweeper = if board.pit_sum(Player::Player1) == 0 {
            Player::Player2
        } else if board.pit_sum(Player::Player2) == 0 {
            Player::Player1
        } else {
            return None;
        };

        sweep(board, sweeper);

        let player1 = board.house_stones(Player::Player1);
        let player2 = board.house_stones(Player::Player2);
        let outcome = match player1.cmp(&player2) {
            Ordering::Greater => Outcome::Winner(Player::Player1),
            Ordering::Less => Outcome::Winner(Player::Player2),
            Ordering::Equal => self.tie_break.outcome(),
        };

        debug!(%sweeper, player1, player2, %outcome, "Pits exhausted");
        Some(outcome)
    }
}

/// Moves every stone left in `player`'s pits into their house.
fn sweep(board: &mut Board, player: Player) {
    let remaining: u32 = Board::pit_indices(player)
        .map(|index| board.slot_mut(index).take_stones())
        .sum();
    board
        .slot_mut(Board::house_index(player))
        .add_stones(remaining);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::TieBreak;

    #[test]
    fn test_no_winner_while_both_sides_have_stones() {
        let mut board = Board::with_stones([1, 0, 0, 0, 0, 0, 10, 0, 0, 0, 0, 0, 1, 10]);
        let before = board.clone();
        assert_eq!(Rules::default().detect_winner(&mut board), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_player2_sweeps_when_player1_is_empty() {
        let mut board = Board::with_stones([0, 0, 0, 0, 0, 0, 20, 1, 2, 3, 0, 0, 0, 10]);
        let outcome = Rules::default().detect_winner(&mut board);
        assert_eq!(outcome, Some(Outcome::Winner(Player::Player1)));
        assert_eq!(board.counts(), [0, 0, 0, 0, 0, 0, 20, 0, 0, 0, 0, 0, 0, 16]);
    }

    #[test]
    fn test_player1_sweeps_when_player2_is_empty() {
        let mut board = Board::with_stones([5, 5, 0, 0, 0, 0, 10, 0, 0, 0, 0, 0, 0, 12]);
        let outcome = Rules::default().detect_winner(&mut board);
        assert_eq!(outcome, Some(Outcome::Winner(Player::Player1)));
        assert_eq!(board.house_stones(Player::Player1), 20);
        assert_eq!(board.pits_total(), 0);
    }

    #[test]
    fn test_tie_is_draw_by_default() {
        let mut board = Board::with_stones([0, 0, 0, 0, 0, 0, 12, 0, 0, 0, 0, 0, 2, 10]);
        assert_eq!(
            Rules::default().detect_winner(&mut board),
            Some(Outcome::Draw)
        );
    }

    #[test]
    fn test_tie_goes_to_player2_under_second_player_policy() {
        let mut board = Board::with_stones([0, 0, 0, 0, 0, 0, 12, 0, 0, 0, 0, 0, 2, 10]);
        let rules = Rules::new(TieBreak::SecondPlayer);
        assert_eq!(
            rules.detect_winner(&mut board),
            Some(Outcome::Winner(Player::Player2))
        );
    }

    #[test]
    fn test_both_sides_empty_is_settled_as_player2_sweep() {
        let mut board = Board::with_stones([0, 0, 0, 0, 0, 0, 30, 0, 0, 0, 0, 0, 0, 42]);
        let outcome = Rules::default().detect_winner(&mut board);
        assert_eq!(outcome, Some(Outcome::Winner(Player::Player2)));
        assert_eq!(board.total_stones(), 72);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut board = Board::with_stones([0, 0, 0, 0, 0, 0, 20, 1, 2, 3, 0, 0, 0, 10]);
        let rules = Rules::default();
        let first = rules.detect_winner(&mut board);
        let settled = board.clone();
        let second = rules.detect_winner(&mut board);
        assert_eq!(first, second);
        assert_eq!(board, settled);
    }
}
