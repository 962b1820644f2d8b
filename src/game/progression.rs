//! Progression Engine
//!
//! Streaks, experience, levels and the bounded round history.
//! Power-up modifiers are applied here, before anything downstream sees
//! the outcome.

use std::collections::VecDeque;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::core::rng::RandomSource;
use crate::game::events::Notice;
use crate::game::powerup::PowerUpLedger;
use crate::game::round::{Outcome, Round};

/// Experience needed for the first level-up.
pub const BASE_EXPERIENCE_TO_NEXT: u32 = 100;

/// XP for a win before the streak bonus.
pub const WIN_BASE_XP: u32 = 10;

/// XP per point of streak on a win.
pub const WIN_STREAK_XP: u32 = 2;

/// XP for a loss.
pub const LOSS_XP: u32 = 1;

/// XP for a draw.
pub const DRAW_XP: u32 = 3;

// =============================================================================
// PROGRESSION
// =============================================================================

/// Player counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Current win streak
    pub streak: u32,
    /// Best streak ever reached (always >= streak)
    pub longest_streak: u32,
    /// Rounds played
    pub total_games: u32,
    /// Wins counted (double wins count twice)
    pub wins: u32,
    /// Experience toward the next level
    pub experience: u32,
    /// Current level (starts at 1)
    pub level: u32,
    /// Experience needed for the next level
    pub experience_to_next: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            streak: 0,
            longest_streak: 0,
            total_games: 0,
            wins: 0,
            experience: 0,
            level: 1,
            experience_to_next: BASE_EXPERIENCE_TO_NEXT,
        }
    }
}

impl Progression {
    /// Wins as a rounded percentage of games played.
    ///
    /// Double wins can push this above 100.
    pub fn win_percentage(&self) -> u32 {
        if self.total_games == 0 {
            return 0;
        }
        ((self.wins as u64 * 100 + self.total_games as u64 / 2) / self.total_games as u64) as u32
    }

    /// Add experience, levelling up as many times as the amount allows.
    ///
    /// Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);

        let mut gained = 0;
        while self.experience >= self.experience_to_next {
            self.experience -= self.experience_to_next;
            self.level += 1;
            // floor(x * 1.2) without floats
            self.experience_to_next = (self.experience_to_next as u64 * 6 / 5) as u32;
            gained += 1;
        }
        gained
    }

    fn record_win(&mut self, double: bool) {
        // Restored counters are untrusted
        self.wins = self.wins.saturating_add(if double { 2 } else { 1 });
        self.streak = self.streak.saturating_add(1);
        self.longest_streak = self.longest_streak.max(self.streak);
    }

    fn record_loss(&mut self) {
        self.streak = self.streak.saturating_sub(1);
    }
}

// =============================================================================
// ROUND HISTORY
// =============================================================================

/// Most recent rounds, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundHistory {
    rounds: VecDeque<Round>,
    capacity: usize,
}

impl RoundHistory {
    /// Empty history holding at most `capacity` rounds.
    pub fn new(capacity: usize) -> Self {
        Self {
            rounds: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a round at the front, evicting the oldest past capacity.
    pub fn push(&mut self, round: Round) {
        self.rounds.push_front(round);
        self.rounds.truncate(self.capacity);
    }

    /// Newest round.
    pub fn latest(&self) -> Option<&Round> {
        self.rounds.front()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter()
    }

    /// Number of rounds held.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Is the history empty?
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.rounds.clear();
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Owns the counters and history and applies round outcomes to them.
#[derive(Clone, Debug)]
pub struct ProgressionEngine {
    progression: Progression,
    history: RoundHistory,
    win_power_up_percent: u32,
}

impl ProgressionEngine {
    /// Create an engine using the given rules.
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            progression: Progression::default(),
            history: RoundHistory::new(rules.history_capacity),
            win_power_up_percent: rules.win_power_up_percent,
        }
    }

    /// Current counters.
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Recent rounds.
    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    /// Restore the persisted subset of counters.
    pub fn restore(&mut self, longest_streak: u32, total_games: u32, wins: u32) {
        self.progression.longest_streak = longest_streak;
        self.progression.total_games = total_games;
        self.progression.wins = wins;
    }

    /// Clear streak, game counts and history. Level and XP are kept.
    pub fn reset(&mut self) {
        self.progression.streak = 0;
        self.progression.total_games = 0;
        self.progression.wins = 0;
        self.history.clear();
    }

    /// Apply a resolved round.
    ///
    /// `raw.outcome` is the resolver's verdict; the returned round carries
    /// the effective outcome after the shield override and is also the one
    /// appended to history.
    pub fn apply_outcome<R: RandomSource>(
        &mut self,
        raw: Round,
        ledger: &mut PowerUpLedger,
        rng: &mut R,
        notices: &mut Vec<Notice>,
    ) -> Round {
        let mut effective = raw.outcome;

        if effective == Outcome::Lose && ledger.take_shield() {
            effective = Outcome::Draw;
            notices.push(Notice::ShieldBlocked);
        }

        let xp = match effective {
            Outcome::Win => {
                let double = ledger.take_double_win();
                if double {
                    notices.push(Notice::DoubleWinApplied);
                }
                self.progression.record_win(double);
                WIN_BASE_XP.saturating_add(self.progression.streak.saturating_mul(WIN_STREAK_XP))
            }
            Outcome::Lose => {
                self.progression.record_loss();
                LOSS_XP
            }
            Outcome::Draw => DRAW_XP,
        };

        self.progression.total_games = self.progression.total_games.saturating_add(1);
        self.award_experience(xp, ledger, rng, notices);

        if effective == Outcome::Win && rng.chance_percent(self.win_power_up_percent) {
            let kind = ledger.grant_random(rng);
            notices.push(Notice::PowerUpEarned { kind });
        }

        let round = Round { outcome: effective, ..raw };
        self.history.push(round);

        debug!(
            "Round applied: {:?} -> {:?}, streak {}, xp +{}",
            raw.outcome, effective, self.progression.streak, xp
        );

        round
    }

    /// Grant experience and the rewards for every level gained.
    ///
    /// Returns the number of levels gained.
    pub fn award_experience<R: RandomSource>(
        &mut self,
        amount: u32,
        ledger: &mut PowerUpLedger,
        rng: &mut R,
        notices: &mut Vec<Notice>,
    ) -> u32 {
        let start_level = self.progression.level;
        let gained = self.progression.add_experience(amount);

        for level in start_level + 1..=start_level + gained {
            info!("Level up: {}", level);
            notices.push(Notice::LevelUp { level });
            let kind = ledger.grant_random(rng);
            notices.push(Notice::PowerUpEarned { kind });
        }

        gained
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;
    use crate::game::powerup::PowerUpKind;
    use crate::game::round::Move;
    use proptest::prelude::*;

    fn raw(outcome: Outcome) -> Round {
        Round {
            player_move: Some(Move::Rock),
            opponent_move: Move::Scissors,
            outcome,
            timestamp: 0,
        }
    }

    fn engine() -> ProgressionEngine {
        ProgressionEngine::new(&RulesConfig::default())
    }

    /// Engine that never grants the random win power-up.
    fn quiet_engine() -> ProgressionEngine {
        ProgressionEngine::new(&RulesConfig {
            win_power_up_percent: 0,
            ..RulesConfig::default()
        })
    }

    #[test]
    fn test_level_up_loop_crosses_two_thresholds() {
        let mut p = Progression {
            experience: 80,
            ..Progression::default()
        };

        let gained = p.add_experience(250);

        // 330 - 100 = 230, - 120 = 110 (< 144)
        assert_eq!(gained, 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.experience, 110);
        assert_eq!(p.experience_to_next, 144);
    }

    #[test]
    fn test_level_up_loop_from_zero() {
        let mut p = Progression::default();

        let gained = p.add_experience(250);

        assert_eq!(gained, 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.experience, 30);
        assert_eq!(p.experience_to_next, 144);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let mut p = Progression::default();
        assert_eq!(p.add_experience(100), 1);
        assert_eq!(p.experience, 0);
        assert_eq!(p.experience_to_next, 120);
    }

    #[test]
    fn test_award_experience_grants_power_up_per_level() {
        let mut engine = engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(1);
        let mut notices = Vec::new();

        let gained = engine.award_experience(250, &mut ledger, &mut rng, &mut notices);

        assert_eq!(gained, 2);
        assert_eq!(ledger.inventory().total(), 2);
        assert!(notices.contains(&Notice::LevelUp { level: 2 }));
        assert!(notices.contains(&Notice::LevelUp { level: 3 }));
    }

    #[test]
    fn test_win_updates_counters() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(2);
        let mut notices = Vec::new();

        let round = engine.apply_outcome(raw(Outcome::Win), &mut ledger, &mut rng, &mut notices);
        assert_eq!(round.outcome, Outcome::Win);

        let p = engine.progression();
        assert_eq!(p.wins, 1);
        assert_eq!(p.streak, 1);
        assert_eq!(p.longest_streak, 1);
        assert_eq!(p.total_games, 1);
        assert_eq!(p.experience, WIN_BASE_XP + WIN_STREAK_XP);
    }

    #[test]
    fn test_loss_decrements_streak_by_one() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(3);
        let mut notices = Vec::new();

        for _ in 0..3 {
            engine.apply_outcome(raw(Outcome::Win), &mut ledger, &mut rng, &mut notices);
        }
        engine.apply_outcome(raw(Outcome::Lose), &mut ledger, &mut rng, &mut notices);

        assert_eq!(engine.progression().streak, 2);
        assert_eq!(engine.progression().longest_streak, 3);

        engine.apply_outcome(raw(Outcome::Draw), &mut ledger, &mut rng, &mut notices);
        assert_eq!(engine.progression().streak, 2);
        assert_eq!(engine.progression().total_games, 5);
    }

    #[test]
    fn test_shield_blocks_exactly_one_loss() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(4);
        let mut notices = Vec::new();

        ledger.grant(PowerUpKind::Shield);
        assert!(ledger.consume(PowerUpKind::Shield));

        let first = engine.apply_outcome(raw(Outcome::Lose), &mut ledger, &mut rng, &mut notices);
        let second = engine.apply_outcome(raw(Outcome::Lose), &mut ledger, &mut rng, &mut notices);

        assert_eq!(first.outcome, Outcome::Draw);
        assert_eq!(second.outcome, Outcome::Lose);
        assert_eq!(notices.iter().filter(|n| **n == Notice::ShieldBlocked).count(), 1);
        assert_eq!(engine.progression().total_games, 2);
        assert_eq!(engine.progression().experience, DRAW_XP + LOSS_XP);
    }

    #[test]
    fn test_shield_survives_wins() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(5);
        let mut notices = Vec::new();

        ledger.grant(PowerUpKind::Shield);
        ledger.consume(PowerUpKind::Shield);
        engine.apply_outcome(raw(Outcome::Win), &mut ledger, &mut rng, &mut notices);

        assert!(ledger.modifiers().shield_active);
    }

    #[test]
    fn test_double_win_counts_twice_once() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(6);
        let mut notices = Vec::new();

        ledger.grant(PowerUpKind::DoubleWin);
        ledger.consume(PowerUpKind::DoubleWin);

        engine.apply_outcome(raw(Outcome::Draw), &mut ledger, &mut rng, &mut notices);
        assert!(ledger.modifiers().double_win_active);

        engine.apply_outcome(raw(Outcome::Win), &mut ledger, &mut rng, &mut notices);
        engine.apply_outcome(raw(Outcome::Win), &mut ledger, &mut rng, &mut notices);

        assert_eq!(engine.progression().wins, 3);
        assert_eq!(engine.progression().streak, 2);
        assert!(notices.contains(&Notice::DoubleWinApplied));
    }

    #[test]
    fn test_history_bound() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(7);
        let mut notices = Vec::new();

        for i in 0..15 {
            let round = Round { timestamp: i, ..raw(Outcome::Draw) };
            engine.apply_outcome(round, &mut ledger, &mut rng, &mut notices);
        }

        let stamps: Vec<i64> = engine.history().iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, (5..15).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_win_percentage() {
        let p = Progression {
            total_games: 3,
            wins: 2,
            ..Progression::default()
        };
        assert_eq!(p.win_percentage(), 67);
        assert_eq!(Progression::default().win_percentage(), 0);
    }

    #[test]
    fn test_reset_keeps_level() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(9);
        let mut notices = Vec::new();

        engine.award_experience(150, &mut ledger, &mut rng, &mut notices);
        engine.apply_outcome(raw(Outcome::Win), &mut ledger, &mut rng, &mut notices);
        engine.reset();

        let p = engine.progression();
        assert_eq!((p.streak, p.total_games, p.wins), (0, 0, 0));
        assert_eq!(p.level, 2);
        assert_eq!(p.longest_streak, 1);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_restored_counters_saturate() {
        let mut engine = quiet_engine();
        let mut ledger = PowerUpLedger::new();
        let mut rng = DeterministicRng::new(10);
        let mut notices = Vec::new();

        engine.restore(u32::MAX, u32::MAX, u32::MAX - 1);
        ledger.grant(PowerUpKind::DoubleWin);
        ledger.consume(PowerUpKind::DoubleWin);

        engine.apply_outcome(raw(Outcome::Win), &mut ledger, &mut rng, &mut notices);

        let p = engine.progression();
        assert_eq!(p.total_games, u32::MAX);
        assert_eq!(p.wins, u32::MAX);
        assert_eq!(p.longest_streak, u32::MAX);
        assert_eq!(p.win_percentage(), 100);
    }

    fn outcome_strategy() -> impl Strategy<Value = Outcome> {
        prop_oneof![Just(Outcome::Win), Just(Outcome::Lose), Just(Outcome::Draw)]
    }

    proptest! {
        #[test]
        fn prop_longest_streak_tracks_max(outcomes in prop::collection::vec(outcome_strategy(), 0..60)) {
            let mut engine = quiet_engine();
            let mut ledger = PowerUpLedger::new();
            let mut rng = DeterministicRng::new(11);
            let mut notices = Vec::new();

            let mut model_streak = 0u32;
            let mut model_longest = 0u32;
            let mut previous_longest = 0u32;

            for outcome in outcomes {
                engine.apply_outcome(raw(outcome), &mut ledger, &mut rng, &mut notices);
                match outcome {
                    Outcome::Win => model_streak += 1,
                    Outcome::Lose => model_streak = model_streak.saturating_sub(1),
                    Outcome::Draw => {}
                }
                model_longest = model_longest.max(model_streak);

                let p = engine.progression();
                prop_assert_eq!(p.streak, model_streak);
                prop_assert_eq!(p.longest_streak, model_longest);
                prop_assert!(p.longest_streak >= p.streak);
                prop_assert!(p.longest_streak >= previous_longest);
                previous_longest = p.longest_streak;
            }
        }

        #[test]
        fn prop_history_never_exceeds_capacity(n in 0usize..40) {
            let mut engine = quiet_engine();
            let mut ledger = PowerUpLedger::new();
            let mut rng = DeterministicRng::new(12);
            let mut notices = Vec::new();

            for i in 0..n {
                let round = Round { timestamp: i as i64, ..raw(Outcome::Lose) };
                engine.apply_outcome(round, &mut ledger, &mut rng, &mut notices);
            }

            prop_assert_eq!(engine.history().len(), n.min(10));
            if n > 0 {
                prop_assert_eq!(engine.history().latest().map(|r| r.timestamp), Some(n as i64 - 1));
            }
        }
    }
}
