//! Streak Achievements
//!
//! Badges track the current streak: unlocked at their threshold, locked
//! again once the streak drops below it. Combo milestones fire on the win
//! that lands exactly on 3, 5 or 10.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

/// Streak badge, ordered by threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// 3 win streak
    TripleWin,
    /// 5 win streak
    Unstoppable,
    /// 10 win streak
    Legendary,
    /// 15 win streak
    Champion,
    /// 20 win streak
    Diamond,
}

impl Badge {
    /// All badges, lowest threshold first.
    pub const ALL: [Badge; 5] = [
        Badge::TripleWin,
        Badge::Unstoppable,
        Badge::Legendary,
        Badge::Champion,
        Badge::Diamond,
    ];

    /// Streak needed.
    pub fn threshold(self) -> u32 {
        match self {
            Badge::TripleWin => 3,
            Badge::Unstoppable => 5,
            Badge::Legendary => 10,
            Badge::Champion => 15,
            Badge::Diamond => 20,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Badge::TripleWin => "Triple Win",
            Badge::Unstoppable => "Unstoppable",
            Badge::Legendary => "Legendary",
            Badge::Champion => "Champion",
            Badge::Diamond => "Diamond",
        }
    }
}

/// Streaks that trigger a combo notice.
pub const COMBO_MILESTONES: [u32; 3] = [3, 5, 10];

/// Is `streak` a combo milestone?
pub fn is_combo_milestone(streak: u32) -> bool {
    COMBO_MILESTONES.contains(&streak)
}

/// Badge change from one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeChange {
    /// Streak reached the threshold
    Unlocked(Badge),
    /// Streak fell below the threshold
    Locked(Badge),
}

/// Currently unlocked badges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementBoard {
    unlocked: BTreeSet<Badge>,
}

impl AchievementBoard {
    /// Re-evaluate against the current streak.
    pub fn update(&mut self, streak: u32) -> Vec<BadgeChange> {
        let mut changes = Vec::new();
        for badge in Badge::ALL {
            let earned = streak >= badge.threshold();
            if earned && self.unlocked.insert(badge) {
                changes.push(BadgeChange::Unlocked(badge));
            } else if !earned && self.unlocked.remove(&badge) {
                changes.push(BadgeChange::Locked(badge));
            }
        }
        changes
    }

    /// Is the badge currently unlocked?
    pub fn is_unlocked(&self, badge: Badge) -> bool {
        self.unlocked.contains(&badge)
    }

    /// Unlocked badges, lowest first.
    pub fn unlocked(&self) -> impl Iterator<Item = Badge> + '_ {
        self.unlocked.iter().copied()
    }

    /// Lock everything.
    pub fn reset(&mut self) {
        self.unlocked.clear();
    }
}
