//! Persisted Settings and Stats
//!
//! Only settings and lifetime counters survive a reload. XP, level,
//! power-ups, history and mode counters are per-session.

use std::fmt;

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::game::mode::Mode;
use crate::persist::store::{SnapshotStore, StoreError};

/// Visual theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Default
    #[default]
    Light,
    /// Dark
    Dark,
    /// Neon
    Neon,
}

impl Theme {
    /// Next theme in the toggle cycle.
    pub fn next(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Neon,
            Theme::Neon => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Neon => "Neon",
        })
    }
}

/// Persisted record.
///
/// Every field defaults, so partial or older records still load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SavedState {
    /// Visual theme
    pub theme: Theme,
    /// Sound effects muted
    pub muted: bool,
    /// Background music on
    pub music_playing: bool,
    /// Last selected mode
    pub mode: Mode,
    /// Best streak ever
    pub longest_streak: u32,
    /// Rounds played
    pub total_games: u32,
    /// Wins counted
    pub wins: u32,
}

impl SavedState {
    /// Encode as JSON.
    pub fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn decode(record: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(record)?)
    }

    /// Best-effort load: missing or unreadable data yields defaults.
    pub fn load_or_default<S: SnapshotStore + ?Sized>(store: &S) -> Self {
        let record = match store.load() {
            Ok(Some(record)) => record,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!("Failed to read saved state: {}", e);
                return Self::default();
            }
        };

        Self::decode(&record).unwrap_or_else(|e| {
            warn!("Ignoring corrupt saved state: {}", e);
            Self::default()
        })
    }

    /// Encode and write. Failures are logged, never propagated.
    pub fn store<S: SnapshotStore + ?Sized>(&self, store: &mut S) {
        if let Err(e) = self.encode().and_then(|record| store.save(&record)) {
            warn!("Failed to save state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::store::MemoryStore;

    #[test]
    fn test_theme_cycle() {
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::Neon);
        assert_eq!(Theme::Neon.next(), Theme::Light);
    }

    #[test]
    fn test_field_names() {
        let saved = SavedState {
            theme: Theme::Neon,
            muted: true,
            music_playing: false,
            mode: Mode::Tournament,
            longest_streak: 7,
            total_games: 40,
            wins: 22,
        };
        let json = saved.encode().unwrap();
        assert_eq!(
            json,
            r#"{"theme":"neon","muted":true,"musicPlaying":false,"mode":"tournament","longestStreak":7,"totalGames":40,"wins":22}"#
        );
        assert_eq!(SavedState::decode(&json).unwrap(), saved);
    }

    #[test]
    fn test_partial_record_merges_into_defaults() {
        let store = MemoryStore::with_record(r#"{"wins": 5, "theme": "dark", "extra": 1}"#);
        let saved = SavedState::load_or_default(&store);

        assert_eq!(saved.wins, 5);
        assert_eq!(saved.theme, Theme::Dark);
        assert_eq!(saved.mode, Mode::Normal);
        assert_eq!(saved.total_games, 0);
    }

    #[test]
    fn test_corrupt_record_falls_back() {
        let store = MemoryStore::with_record("{not json");
        assert_eq!(SavedState::load_or_default(&store), SavedState::default());

        let store = MemoryStore::with_record(r#"{"mode": "speedrun"}"#);
        assert_eq!(SavedState::load_or_default(&store), SavedState::default());
    }
}
