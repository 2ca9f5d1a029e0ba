//! Core domain types for Kalah.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Player {
    /// Player 1 (moves first, owns slots 0-6).
    #[serde(rename = "PLAYER1")]
    #[strum(serialize = "PLAYER1")]
    Player1,
    /// Player 2 (owns slots 7-13).
    #[serde(rename = "PLAYER2")]
    #[strum(serialize = "PLAYER2")]
    Player2,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }
}

/// Kind of a board slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Holds sowable stones.
    Pit,
    /// Scoring store. Never a move source.
    House,
}

/// One slot on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    kind: EntityKind,
    owner: Player,
    stones: u32,
}

impl Entity {
    /// Creates a pit owned by `owner`.
    pub fn pit(owner: Player, stones: u32) -> Self {
        Self {
            kind: EntityKind::Pit,
            owner,
            stones,
        }
    }

    /// Creates an empty house owned by `owner`.
    pub fn house(owner: Player) -> Self {
        Self {
            kind: EntityKind::House,
            owner,
            stones: 0,
        }
    }

    /// Returns the slot kind.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the owning player.
    pub fn owner(&self) -> Player {
        self.owner
    }

    /// Returns the number of stones held.
    pub fn stones(&self) -> u32 {
        self.stones
    }

    /// True for a pit.
    pub fn is_pit(&self) -> bool {
        self.kind == EntityKind::Pit
    }

    /// True for a house.
    pub fn is_house(&self) -> bool {
        self.kind == EntityKind::House
    }

    pub(crate) fn set_stones(&mut self, stones: u32) {
        self.stones = stones;
    }

    pub(crate) fn add_stones(&mut self, stones: u32) {
        self.stones += stones;
    }

    /// Empties the slot, returning what it held.
    pub(crate) fn take_stones(&mut self) -> u32 {
        std::mem::take(&mut self.stones)
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Player won the game.
    Winner(Player),
    /// Both houses ended level.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "{} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
