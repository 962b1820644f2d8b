//! Session Output Types
//!
//! What the session hands to the outside world: per-round reports,
//! render snapshots and the event stream that carries them.

use serde::{Serialize, Deserialize};

use crate::game::achievement::Badge;
use crate::game::daily::DailyChallenge;
use crate::game::events::Notice;
use crate::game::mode::ModeState;
use crate::game::powerup::{ActiveModifiers, PowerUpInventory};
use crate::game::progression::Progression;
use crate::game::round::{Outcome, Round};
use crate::persist::Theme;

/// Sound settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Sound effects muted
    pub muted: bool,
    /// Background music on
    pub music_playing: bool,
}

/// Result of one round, for rendering and audio.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// The round as recorded (effective outcome)
    pub round: Round,
    /// Resolver verdict before power-up overrides
    pub raw_outcome: Outcome,
    /// Counters after the round
    pub progression: Progression,
    /// Mode counters after the round
    pub mode: ModeState,
    /// Inventory after the round
    pub inventory: PowerUpInventory,
    /// Notices raised by this round, in order
    pub notices: Vec<Notice>,
}

impl RoundReport {
    /// Effective outcome.
    pub fn outcome(&self) -> Outcome {
        self.round.outcome
    }
}

/// Everything needed to redraw the screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Counters
    pub progression: Progression,
    /// Rounded win percentage
    pub win_percentage: u32,
    /// Live mode and counters
    pub mode: ModeState,
    /// Power-up counts
    pub inventory: PowerUpInventory,
    /// Armed modifiers
    pub modifiers: ActiveModifiers,
    /// Today's challenge
    pub daily: DailyChallenge,
    /// Unlocked streak badges
    pub badges: Vec<Badge>,
    /// Visual theme
    pub theme: Theme,
    /// Sound settings
    pub audio: AudioSettings,
    /// Most recent round
    pub last_round: Option<Round>,
    /// Input is locked until the display delay passes
    pub round_in_flight: bool,
}

/// Output of the session, drained with `take_events`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Show a message
    Notice(Notice),
    /// A round finished (drive result audio/animation from this)
    RoundResolved(RoundReport),
    /// Redraw
    Render(SessionSnapshot),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::powerup::PowerUpKind;

    #[test]
    fn test_event_json_nests_notice_tag() {
        let event = SessionEvent::Notice(Notice::PowerUpEarned { kind: PowerUpKind::Shield });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"notice","notice":"power_up_earned","kind":"shield"}"#);

        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
