//! Player-Facing Notices
//!
//! Everything the core wants to tell the player goes through `Notice`.
//! The outer layer decides how to display it; `Display` gives a default
//! one-line message.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::game::achievement::Badge;
use crate::game::powerup::PowerUpKind;
use crate::game::round::Move;

/// A user-visible notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// A shield turned a loss into a draw
    ShieldBlocked,
    /// Shield consumed, waiting for the next loss
    ShieldArmed,
    /// Double win consumed, waiting for the next win
    DoubleWinArmed,
    /// A win was counted twice
    DoubleWinApplied,
    /// Player reached a new level
    LevelUp { level: u32 },
    /// A power-up was added to the inventory
    PowerUpEarned { kind: PowerUpKind },
    /// Peek sampled a move for display
    PeekRevealed { opponent: Move },
    /// Peek display window closed
    PeekExpired,
    /// Move countdown suspended
    TimerFrozen { seconds: u32 },
    /// Move countdown resumed
    TimerUnfrozen,
    /// Challenge mode started
    ChallengeStarted { target: u32, seconds: u32 },
    /// Challenge target reached in time
    ChallengeComplete { bonus_xp: u32 },
    /// Challenge countdown ran out
    ChallengeFailed,
    /// Tournament mode started
    TournamentStarted { rounds: u32 },
    /// Tournament finished with more wins than losses
    TournamentWon { wins: u32, rounds: u32, bonus_xp: u32 },
    /// Tournament finished without a winning record
    TournamentComplete { wins: u32, rounds: u32, bonus_xp: u32 },
    /// A new daily challenge was drawn
    DailyChallengeNew { target: u32 },
    /// Daily challenge advanced
    DailyProgress { progress: u32, target: u32 },
    /// Daily challenge done for today
    DailyComplete { bonus_xp: u32 },
    /// Streak milestone reached
    Combo { streak: u32 },
    /// Streak badge unlocked
    BadgeUnlocked { badge: Badge },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ShieldBlocked => write!(f, "Shield blocked the loss!"),
            Notice::ShieldArmed => write!(f, "Shield active! Next loss will be blocked."),
            Notice::DoubleWinArmed => write!(f, "Double Win active! Next win counts as 2."),
            Notice::DoubleWinApplied => write!(f, "Double Win! This counts as 2 wins!"),
            Notice::LevelUp { level } => write!(f, "Level up! You are now level {}!", level),
            Notice::PowerUpEarned { kind } => write!(f, "Power-up earned: {}!", kind),
            Notice::PeekRevealed { opponent } => write!(f, "Opponent will choose: {}", opponent),
            Notice::PeekExpired => write!(f, "Peek effect expired!"),
            Notice::TimerFrozen { seconds } => write!(f, "Timer frozen for {} seconds!", seconds),
            Notice::TimerUnfrozen => write!(f, "Timer unfrozen!"),
            Notice::ChallengeStarted { target, seconds } => {
                write!(f, "Challenge: get {} wins in {} seconds!", target, seconds)
            }
            Notice::ChallengeComplete { bonus_xp } => {
                write!(f, "Challenge complete! +{} XP", bonus_xp)
            }
            Notice::ChallengeFailed => write!(f, "Challenge failed! Time's up!"),
            Notice::TournamentStarted { rounds } => {
                write!(f, "Tournament started! Best of {} rounds", rounds)
            }
            Notice::TournamentWon { wins, rounds, bonus_xp } => {
                write!(f, "Tournament won! {}/{} wins, +{} XP", wins, rounds, bonus_xp)
            }
            Notice::TournamentComplete { wins, rounds, bonus_xp } => {
                write!(f, "Tournament complete. {}/{} wins, +{} XP", wins, rounds, bonus_xp)
            }
            Notice::DailyChallengeNew { target } => {
                write!(f, "New daily challenge: get {} wins!", target)
            }
            Notice::DailyProgress { progress, target } => {
                write!(f, "Daily progress: {}/{}", progress, target)
            }
            Notice::DailyComplete { bonus_xp } => {
                write!(f, "Daily challenge complete! +{} XP and bonus rewards", bonus_xp)
            }
            Notice::Combo { streak } => match streak {
                3 => write!(f, "Triple Win!"),
                5 => write!(f, "Unstoppable!"),
                10 => write!(f, "LEGENDARY!"),
                n => write!(f, "{} win streak!", n),
            },
            Notice::BadgeUnlocked { badge } => {
                write!(f, "Achievement unlocked: {} ({} win streak)", badge.name(), badge.threshold())
            }
        }
    }
}
