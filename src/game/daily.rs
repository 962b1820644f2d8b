//! Daily Challenge
//!
//! A win target that resets each calendar day. Evaluated on every win,
//! whatever mode is active.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::config::RulesConfig;
use crate::core::rng::RandomSource;
use crate::game::events::Notice;

/// Today's challenge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    /// Day this challenge belongs to (None before the first check)
    pub date: Option<NaiveDate>,
    /// Wins needed
    pub target: u32,
    /// Wins so far
    pub progress: u32,
    /// Finished for today
    pub completed: bool,
}

/// What happened when a win was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DailyProgress {
    /// Already completed today; nothing changed
    Frozen,
    /// Progress advanced, not done yet
    Advanced { progress: u32, target: u32 },
    /// Target reached with this win
    Completed,
}

impl DailyChallenge {
    /// Reset when `today` differs from the stored day.
    ///
    /// Returns true if a new challenge was drawn.
    pub fn refresh<R: RandomSource>(
        &mut self,
        today: NaiveDate,
        rules: &RulesConfig,
        rng: &mut R,
        notices: &mut Vec<Notice>,
    ) -> bool {
        if self.date == Some(today) {
            return false;
        }

        *self = DailyChallenge {
            date: Some(today),
            target: rng.next_int_range(rules.daily_target_min, rules.daily_target_max),
            progress: 0,
            completed: false,
        };
        notices.push(Notice::DailyChallengeNew { target: self.target });
        true
    }

    /// Count a win toward today's target.
    pub fn record_win(&mut self) -> DailyProgress {
        if self.completed {
            return DailyProgress::Frozen;
        }

        self.progress += 1;
        if self.progress >= self.target {
            self.completed = true;
            DailyProgress::Completed
        } else {
            DailyProgress::Advanced {
                progress: self.progress,
                target: self.target,
            }
        }
    }
}
