//! Input Normalization
//!
//! Maps raw terminal lines onto player commands. Single-letter keys
//! follow the browser shortcuts (r/p/s to play, m to mute).

use serde::{Serialize, Deserialize};

use crate::game::mode::Mode;
use crate::game::powerup::PowerUpKind;
use crate::game::round::Move;

/// A normalized player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Throw a move
    Play(Move),
    /// Spend a power-up
    UsePowerUp(PowerUpKind),
    /// Next mode in the cycle
    CycleMode,
    /// Jump to a specific mode
    SetMode(Mode),
    /// Next theme
    CycleTheme,
    /// Toggle sound effects
    ToggleMute,
    /// Toggle background music
    ToggleMusic,
    /// Clear stats
    Reset,
    /// Print the share text
    Share,
    /// Print current stats
    Status,
    /// Print recent rounds
    History,
    /// Print the command list
    Help,
    /// Leave the game
    Quit,
}

impl Command {
    /// Parse one input line. Unknown input yields None.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim().to_ascii_lowercase();
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let arg = words.next();

        let command = match (head, arg) {
            ("use", Some(kind)) => Command::UsePowerUp(parse_power_up(kind)?),
            ("mode", None) => Command::CycleMode,
            ("mode", Some(mode)) => Command::SetMode(parse_mode(mode)?),
            (_, Some(_)) => return None,
            ("theme", None) | ("t", None) => Command::CycleTheme,
            ("mute", None) | ("m", None) => Command::ToggleMute,
            ("music", None) => Command::ToggleMusic,
            ("reset", None) => Command::Reset,
            ("share", None) => Command::Share,
            ("stats", None) | ("status", None) => Command::Status,
            ("history", None) | ("h", None) => Command::History,
            ("help", None) | ("?", None) => Command::Help,
            ("quit", None) | ("q", None) | ("exit", None) => Command::Quit,
            (word, None) => match word.parse::<Move>() {
                Ok(mv) => Command::Play(mv),
                Err(_) => Command::UsePowerUp(parse_power_up(word)?),
            },
        };
        Some(command)
    }
}

fn parse_power_up(word: &str) -> Option<PowerUpKind> {
    match word {
        "shield" => Some(PowerUpKind::Shield),
        "double" | "doublewin" | "double_win" => Some(PowerUpKind::DoubleWin),
        "peek" => Some(PowerUpKind::Peek),
        "freeze" | "timefreeze" | "time_freeze" => Some(PowerUpKind::TimeFreeze),
        _ => None,
    }
}

fn parse_mode(word: &str) -> Option<Mode> {
    match word {
        "normal" => Some(Mode::Normal),
        "timed" => Some(Mode::Timed),
        "challenge" => Some(Mode::Challenge),
        "tournament" => Some(Mode::Tournament),
        _ => None,
    }
}

/// Command reference printed by `help`.
pub const HELP_TEXT: &str = "\
moves:      r | p | s  (or rock / paper / scissors)
power-ups:  shield | double | peek | freeze  (or `use <name>`)
modes:      mode  (cycle)  |  mode normal|timed|challenge|tournament
settings:   theme | mute | music
other:      stats | history | share | reset | help | quit";
