//! Configuration
//!
//! `RulesConfig` holds the gameplay constants; `GameConfig` adds the
//! process-level settings read from the environment by the binary.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::core::rng::derive_seed;

/// Gameplay constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    /// Countdown length per move in Timed mode (ticks of one second)
    pub seconds_per_move: u32,
    /// Wins needed to clear a challenge
    pub challenge_target: u32,
    /// Challenge time limit in seconds
    pub challenge_time_limit: u32,
    /// Bonus XP for clearing a challenge
    pub challenge_bonus_xp: u32,
    /// Rounds in a tournament
    pub tournament_rounds: u32,
    /// Bonus XP for a winning tournament record
    pub tournament_win_xp: u32,
    /// Bonus XP for any other finished tournament
    pub tournament_finish_xp: u32,
    /// Smallest daily target
    pub daily_target_min: u32,
    /// Largest daily target
    pub daily_target_max: u32,
    /// Bonus XP for the daily challenge
    pub daily_bonus_xp: u32,
    /// Rounds kept in history
    pub history_capacity: usize,
    /// Chance of a random power-up on each win (percent)
    pub win_power_up_percent: u32,
    /// How long Time Freeze suspends the countdown (ms)
    pub time_freeze_ms: u64,
    /// How long a peeked move stays on display (ms)
    pub peek_duration_ms: u64,
    /// Delay before the next round may start (ms)
    pub display_delay_ms: u64,
    /// Length of one countdown tick (ms)
    pub tick_ms: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            seconds_per_move: 3,
            challenge_target: 5,
            challenge_time_limit: 60,
            challenge_bonus_xp: 100,
            tournament_rounds: 5,
            tournament_win_xp: 200,
            tournament_finish_xp: 50,
            daily_target_min: 3,
            daily_target_max: 7,
            daily_bonus_xp: 150,
            history_capacity: 10,
            win_power_up_percent: 10,
            time_freeze_ms: 5000,
            peek_duration_ms: 3000,
            display_delay_ms: 2000,
            tick_ms: 1000,
        }
    }
}

/// Process configuration for the terminal game.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Seed for the opponent; random when unset
    pub seed: Option<u64>,
    /// Where the settings snapshot is written
    pub save_path: PathBuf,
    /// How often the driver advances virtual time
    pub frame_interval: Duration,
    /// Gameplay constants
    pub rules: RulesConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            save_path: PathBuf::from("rps-duel-save.json"),
            frame_interval: Duration::from_millis(100),
            rules: RulesConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable could not be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
}

impl GameConfig {
    /// Create config from environment variables.
    ///
    /// - `RPS_SEED`: opponent seed (u64)
    /// - `RPS_SEED_LABEL`: seed phrase, hashed into a seed when `RPS_SEED` is unset
    /// - `RPS_SAVE_PATH`: snapshot file
    /// - `RPS_DISPLAY_DELAY_MS`: pause between rounds
    /// - `RPS_TICK_MS`: countdown tick length
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(seed) = parse_var(&lookup, "RPS_SEED")? {
            config.seed = Some(seed);
        } else if let Some(label) = lookup("RPS_SEED_LABEL") {
            config.seed = Some(derive_seed(label.trim()));
        }
        if let Some(path) = lookup("RPS_SAVE_PATH") {
            config.save_path = PathBuf::from(path);
        }
        if let Some(delay) = parse_var(&lookup, "RPS_DISPLAY_DELAY_MS")? {
            config.rules.display_delay_ms = delay;
        }
        if let Some(tick) = parse_var(&lookup, "RPS_TICK_MS")? {
            if tick == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "RPS_TICK_MS",
                    value: "0".to_string(),
                });
            }
            config.rules.tick_ms = tick;
        }

        Ok(config)
    }
}

fn parse_var<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
