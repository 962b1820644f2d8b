//! Round Resolution
//!
//! Moves, outcomes and the cyclic dominance rule.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::core::rng::RandomSource;

// =============================================================================
// MOVE
// =============================================================================

/// A hand shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Move {
    /// Crushes scissors
    Rock = 0,
    /// Covers rock
    Paper = 1,
    /// Cuts paper
    Scissors = 2,
}

impl Move {
    /// All moves, in draw order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The move this one defeats.
    #[inline]
    pub fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Paper => Move::Rock,
            Move::Scissors => Move::Paper,
        }
    }

    /// Get move from index (0-2).
    pub fn from_index(index: u8) -> Option<Move> {
        match index {
            0 => Some(Move::Rock),
            1 => Some(Move::Paper),
            2 => Some(Move::Scissors),
            _ => None,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a move name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown move: {0:?}")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "rock" => Ok(Move::Rock),
            "p" | "paper" => Ok(Move::Paper),
            "s" | "scissors" => Ok(Move::Scissors),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of a round from the player's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Player won
    Win,
    /// Player lost
    Lose,
    /// Same move on both sides
    Draw,
}

impl Outcome {
    /// Same round seen from the opponent's side.
    pub fn reversed(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

/// Resolve a round.
///
/// Rock > Scissors > Paper > Rock. Total and pure.
#[inline]
pub fn resolve(player: Move, opponent: Move) -> Outcome {
    if player == opponent {
        Outcome::Draw
    } else if player.beats() == opponent {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// Draw an opponent move uniformly.
pub fn random_move<R: RandomSource>(rng: &mut R) -> Move {
    let index = rng.next_int(Move::ALL.len() as u32) as usize;
    Move::ALL[index]
}

// =============================================================================
// ROUND
// =============================================================================

/// One completed round. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Player's move (None when the move timer ran out)
    pub player_move: Option<Move>,
    /// Opponent's move
    pub opponent_move: Move,
    /// Effective outcome after power-up overrides
    pub outcome: Outcome,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Round {
    /// Was this round forced by the move timer?
    pub fn is_timeout(&self) -> bool {
        self.player_move.is_none()
    }
}

// =============================================================================
// TESTS
// =============================================================================
