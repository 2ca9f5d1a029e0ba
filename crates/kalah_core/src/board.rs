//! Fixed 14-slot Kalah board and its index arithmetic.
//!
//! Layout (0-based):
//!
//! ```text
//!   0..=5   Player1 pits
//!   6       Player1 house
//!   7..=12  Player2 pits
//!   13      Player2 house
//! ```
//!
//! Sowing runs in increasing index order and wraps from 13 to 0.

use super::types::{Entity, Player};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::instrument;

/// Pits owned by each player.
pub const PITS_PER_PLAYER: usize = 6;

/// Total slots on the board (pits and houses).
pub const SLOT_COUNT: usize = 2 * (PITS_PER_PLAYER + 1);

/// Kalah board: 14 slots in fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    slots: [Entity; SLOT_COUNT],
}

impl Board {
    /// Builds a board in the standard layout with the given stone counts.
    ///
    /// `counts[i]` becomes the stone count of slot `i`. This is how stored
    /// boards are restored and how arbitrary positions are set up in tests.
    #[instrument]
    pub fn with_stones(counts: [u32; SLOT_COUNT]) -> Self {
        let slots = std::array::from_fn(|index| {
            let owner = Self::owner_of(index);
            if index == Self::house_index(owner) {
                let mut house = Entity::house(owner);
                house.set_stones(counts[index]);
                house
            } else {
                Entity::pit(owner, counts[index])
            }
        });
        Self { slots }
    }

    /// Gets the slot at the given index (0-13).
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index)
    }

    /// Returns all slots in layout order.
    pub fn slots(&self) -> &[Entity; SLOT_COUNT] {
        &self.slots
    }

    /// Stone counts of all slots in layout order.
    pub fn counts(&self) -> [u32; SLOT_COUNT] {
        std::array::from_fn(|index| self.slots[index].stones())
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Entity {
        &mut self.slots[index]
    }

    /// Owner of a slot index under the fixed layout.
    pub fn owner_of(index: usize) -> Player {
        if index <= PITS_PER_PLAYER {
            Player::Player1
        } else {
            Player::Player2
        }
    }

    /// Index of the player's house.
    pub fn house_index(player: Player) -> usize {
        match player {
            Player::Player1 => PITS_PER_PLAYER,
            Player::Player2 => SLOT_COUNT - 1,
        }
    }

    /// Indices of the player's pits.
    pub fn pit_indices(player: Player) -> Range<usize> {
        match player {
            Player::Player1 => 0..PITS_PER_PLAYER,
            Player::Player2 => PITS_PER_PLAYER + 1..SLOT_COUNT - 1,
        }
    }

    /// Next slot a stone sown by `mover` lands in after `index`.
    ///
    /// Steps one slot forward (wrapping 13 to 0), stepping once more when
    /// that slot is the opponent's house.
    pub fn advance(index: usize, mover: Player) -> usize {
        let next = (index + 1) % SLOT_COUNT;
        if next == Self::house_index(mover.opponent()) {
            (next + 1) % SLOT_COUNT
        } else {
            next
        }
    }

    /// Pit directly across the board, or `None` for a house.
    ///
    /// Pit 0 faces pit 12, pit 5 faces pit 7.
    pub fn opposite(index: usize) -> Option<usize> {
        let last_pit = SLOT_COUNT - 2;
        if index > last_pit || index == PITS_PER_PLAYER {
            None
        } else {
            Some(last_pit - index)
        }
    }

    /// Stones in the player's pits (houses excluded).
    pub fn pit_sum(&self, player: Player) -> u32 {
        Self::pit_indices(player)
            .map(|index| self.slots[index].stones())
            .sum()
    }

    /// Stones in the player's house.
    pub fn house_stones(&self, player: Player) -> u32 {
        self.slots[Self::house_index(player)].stones()
    }

    /// Stones in every pit on the board.
    pub fn pits_total(&self) -> u32 {
        self.pit_sum(Player::Player1) + self.pit_sum(Player::Player2)
    }

    /// Stones on the whole board.
    pub fn total_stones(&self) -> u32 {
        self.slots.iter().map(Entity::stones).sum()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Player2's pits run right to left along the top, Player1's left to
    /// right along the bottom, with each house at its owner's sowing end.
    pub fn display(&self) -> String {
        let row = |indices: &mut dyn Iterator<Item = usize>| {
            indices
                .map(|index| format!("{:>3}", self.slots[index].stones()))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let top = row(&mut Self::pit_indices(Player::Player2).rev());
        let bottom = row(&mut Self::pit_indices(Player::Player1));
        let gap = " ".repeat(top.len());

        format!(
            "     {top}\n{:>3}  {gap}  {:<3}\n     {bottom}",
            self.house_stones(Player::Player2),
            self.house_stones(Player::Player1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityKind;

    #[test]
    fn test_layout_kinds_and_owners() {
        let board = Board::with_stones([1; SLOT_COUNT]);
        for (index, slot) in board.slots().iter().enumerate() {
            let expected_kind = if index == 6 || index == 13 {
                EntityKind::House
            } else {
                EntityKind::Pit
            };
            assert_eq!(slot.kind(), expected_kind, "slot {index}");
            let expected_owner = if index < 7 {
                Player::Player1
            } else {
                Player::Player2
            };
            assert_eq!(slot.owner(), expected_owner, "slot {index}");
        }
    }

    #[test]
    fn test_advance_plain_step() {
        assert_eq!(Board::advance(0, Player::Player1), 1);
        assert_eq!(Board::advance(5, Player::Player1), 6);
        assert_eq!(Board::advance(6, Player::Player1), 7);
        assert_eq!(Board::advance(12, Player::Player2), 13);
        assert_eq!(Board::advance(13, Player::Player2), 0);
    }

    #[test]
    fn test_advance_skips_opponent_house() {
        // Player1 never lands on 13.
        assert_eq!(Board::advance(12, Player::Player1), 0);
        // Player2 never lands on 6.
        assert_eq!(Board::advance(5, Player::Player2), 7);
    }

    #[test]
    fn test_advance_full_lap_visits_thirteen_slots() {
        for mover in [Player::Player1, Player::Player2] {
            let mut cursor = 0;
            let mut visited = Vec::new();
            for _ in 0..13 {
                cursor = Board::advance(cursor, mover);
                visited.push(cursor);
            }
            assert_eq!(cursor, 0, "a 13-step lap returns home for {mover}");
            assert!(!visited.contains(&Board::house_index(mover.opponent())));
        }
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Board::opposite(0), Some(12));
        assert_eq!(Board::opposite(5), Some(7));
        assert_eq!(Board::opposite(7), Some(5));
        assert_eq!(Board::opposite(12), Some(0));
        assert_eq!(Board::opposite(6), None);
        assert_eq!(Board::opposite(13), None);
    }

    #[test]
    fn test_opposite_is_symmetric_and_crosses_sides() {
        for player in [Player::Player1, Player::Player2] {
            for pit in Board::pit_indices(player) {
                let across = Board::opposite(pit).unwrap();
                assert_eq!(Board::opposite(across), Some(pit));
                assert_eq!(Board::owner_of(across), player.opponent());
            }
        }
    }

    #[test]
    fn test_sums() {
        let board = Board::with_stones([1, 2, 3, 4, 5, 6, 10, 1, 1, 1, 1, 1, 1, 20]);
        assert_eq!(board.pit_sum(Player::Player1), 21);
        assert_eq!(board.pit_sum(Player::Player2), 6);
        assert_eq!(board.house_stones(Player::Player1), 10);
        assert_eq!(board.house_stones(Player::Player2), 20);
        assert_eq!(board.pits_total(), 27);
        assert_eq!(board.total_stones(), 57);
    }

    #[test]
    fn test_display_shows_every_slot() {
        let board = Board::with_stones([1, 2, 3, 4, 5, 6, 70, 8, 9, 10, 11, 12, 13, 99]);
        let text = board.display();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(" 13  12  11  10   9   8"));
        assert!(lines[1].trim_start().starts_with("99"));
        assert!(lines[1].trim_end().ends_with("70"));
        assert!(lines[2].contains("  1   2   3   4   5   6"));
    }
}
