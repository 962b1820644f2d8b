//! Game Session
//!
//! Owns every piece of per-player state and sequences a round through
//! the rules modules:
//!
//! ```text
//! play_round ──► resolve ──► ProgressionEngine ──► ModeCoordinator
//!                                                      │
//!            persist ◄── events ◄── badges ◄── DailyChallenge
//! ```
//!
//! Time only moves through `advance`, which fires due timers in order on
//! the coordinator's scheduler. Nothing here blocks.

use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::game::achievement::{is_combo_milestone, AchievementBoard, BadgeChange};
use crate::game::daily::{DailyChallenge, DailyProgress};
use crate::game::events::Notice;
use crate::game::mode::{Mode, ModeCompletion, ModeCoordinator, ModeSignal, ModeState};
use crate::game::powerup::{PowerUpKind, PowerUpLedger};
use crate::game::progression::{Progression, ProgressionEngine, RoundHistory};
use crate::game::round::{random_move, resolve, Move, Outcome, Round};
use crate::game::scheduler::{TimerHandle, TimerTask};
use crate::persist::{MemoryStore, SavedState, SnapshotStore, Theme};
use crate::session::report::{AudioSettings, RoundReport, SessionEvent, SessionSnapshot};

/// Random power-ups granted for finishing the daily challenge.
pub const DAILY_POWER_UPS: u32 = 2;

/// One player's game.
pub struct GameSession<R = DeterministicRng, C = SystemClock, S = MemoryStore>
where
    R: RandomSource,
    C: Clock,
    S: SnapshotStore,
{
    rules: RulesConfig,
    rng: R,
    clock: C,
    store: S,

    progression: ProgressionEngine,
    ledger: PowerUpLedger,
    modes: ModeCoordinator,
    daily: DailyChallenge,
    achievements: AchievementBoard,

    theme: Theme,
    audio: AudioSettings,

    /// Reentrancy guard: set while a round is on display
    round_in_flight: bool,
    release_timer: Option<TimerHandle>,
    peek_timer: Option<TimerHandle>,

    pending_events: Vec<SessionEvent>,
}

impl<R: RandomSource, C: Clock, S: SnapshotStore> GameSession<R, C, S> {
    /// Start a session, restoring whatever the store holds.
    ///
    /// The restored mode is entered fresh, so a saved Challenge or
    /// Tournament starts over.
    pub fn new(rules: RulesConfig, rng: R, clock: C, store: S) -> Self {
        let saved = SavedState::load_or_default(&store);

        let mut progression = ProgressionEngine::new(&rules);
        progression.restore(saved.longest_streak, saved.total_games, saved.wins);

        let mut session = Self {
            modes: ModeCoordinator::new(rules.clone()),
            rules,
            rng,
            clock,
            store,
            progression,
            ledger: PowerUpLedger::new(),
            daily: DailyChallenge::default(),
            achievements: AchievementBoard::default(),
            theme: saved.theme,
            audio: AudioSettings {
                muted: saved.muted,
                music_playing: saved.music_playing,
            },
            round_in_flight: false,
            release_timer: None,
            peek_timer: None,
            pending_events: Vec::new(),
        };

        info!(
            "Session started: {} games, {} wins, best streak {}, {}",
            saved.total_games, saved.wins, saved.longest_streak, saved.mode
        );

        let mut notices = Vec::new();
        session.refresh_daily(&mut notices);
        session.modes.switch_to(saved.mode, &mut notices);
        session.push_notices(notices);
        session.emit_render();
        session
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Rule constants in use.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Player counters.
    pub fn progression(&self) -> &Progression {
        self.progression.progression()
    }

    /// Recent rounds, newest first.
    pub fn history(&self) -> &RoundHistory {
        self.progression.history()
    }

    /// Power-up inventory and armed modifiers.
    pub fn power_ups(&self) -> &PowerUpLedger {
        &self.ledger
    }

    /// Live mode and counters.
    pub fn mode_state(&self) -> &ModeState {
        self.modes.state()
    }

    /// Live mode kind.
    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    /// Today's challenge.
    pub fn daily(&self) -> &DailyChallenge {
        &self.daily
    }

    /// Streak badges.
    pub fn achievements(&self) -> &AchievementBoard {
        &self.achievements
    }

    /// Visual theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sound settings.
    pub fn audio(&self) -> AudioSettings {
        self.audio
    }

    /// Is input locked while the last round is on display?
    pub fn is_round_in_flight(&self) -> bool {
        self.round_in_flight
    }

    /// Is a Time Freeze in effect?
    pub fn is_frozen(&self) -> bool {
        self.modes.is_frozen()
    }

    /// Virtual time elapsed since the session started (ms).
    pub fn elapsed_ms(&self) -> u64 {
        self.modes.scheduler().now()
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable clock access (replays and tests move the day forward).
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // =========================================================================
    // ROUNDS
    // =========================================================================

    /// Play a move.
    pub fn play(&mut self, player_move: Move) -> Option<RoundReport> {
        self.play_round(Some(player_move))
    }

    /// Play one round. `None` is a timed-out move and always loses.
    ///
    /// Returns None, with no state change, when a round is already on
    /// display. A timeout round skips that check.
    pub fn play_round(&mut self, player_move: Option<Move>) -> Option<RoundReport> {
        if self.round_in_flight && player_move.is_some() {
            debug!("Ignoring move: round in flight");
            return None;
        }

        self.round_in_flight = true;
        self.modes.suspend_move_timer();
        if let Some(handle) = self.release_timer.take() {
            self.modes.scheduler_mut().cancel(handle);
        }

        let opponent_move = random_move(&mut self.rng);
        let raw_outcome = match player_move {
            Some(mv) => resolve(mv, opponent_move),
            None => Outcome::Lose,
        };
        let raw = Round {
            player_move,
            opponent_move,
            outcome: raw_outcome,
            timestamp: self.clock.now_millis(),
        };

        let mut notices = Vec::new();
        let round = self
            .progression
            .apply_outcome(raw, &mut self.ledger, &mut self.rng, &mut notices);

        if let Some(completion) = self.modes.on_round_end(round.outcome) {
            self.reward_completion(completion, &mut notices);
        }
        if round.outcome == Outcome::Win {
            self.record_daily_win(&mut notices);
        }
        self.update_achievements(round.outcome, &mut notices);

        info!(
            "Round: {} vs {} -> {:?} (streak {})",
            player_move.map_or("timeout", Move::name),
            opponent_move,
            round.outcome,
            self.progression().streak
        );

        let report = RoundReport {
            round,
            raw_outcome,
            progression: *self.progression(),
            mode: *self.modes.state(),
            inventory: *self.ledger.inventory(),
            notices: notices.clone(),
        };

        self.push_notices(notices);
        self.pending_events.push(SessionEvent::RoundResolved(report.clone()));
        self.emit_render();
        self.persist();

        let delay = self.rules.display_delay_ms;
        self.release_timer = Some(
            self.modes
                .scheduler_mut()
                .schedule_after(delay, TimerTask::ReleaseRound),
        );

        Some(report)
    }

    fn reward_completion(&mut self, completion: ModeCompletion, notices: &mut Vec<Notice>) {
        notices.push(completion.notice());
        self.progression.award_experience(
            completion.bonus_xp(),
            &mut self.ledger,
            &mut self.rng,
            notices,
        );
        if completion.grants_power_up() {
            let kind = self.ledger.grant_random(&mut self.rng);
            notices.push(Notice::PowerUpEarned { kind });
        }
    }

    fn refresh_daily(&mut self, notices: &mut Vec<Notice>) {
        let today = self.clock.today();
        if self.daily.refresh(today, &self.rules, &mut self.rng, notices) {
            info!("Daily challenge for {}: {} wins", today, self.daily.target);
        }
    }

    fn record_daily_win(&mut self, notices: &mut Vec<Notice>) {
        self.refresh_daily(notices);

        match self.daily.record_win() {
            DailyProgress::Frozen => {}
            DailyProgress::Advanced { progress, target } => {
                notices.push(Notice::DailyProgress { progress, target });
            }
            DailyProgress::Completed => {
                let bonus_xp = self.rules.daily_bonus_xp;
                notices.push(Notice::DailyComplete { bonus_xp });
                self.progression
                    .award_experience(bonus_xp, &mut self.ledger, &mut self.rng, notices);
                for _ in 0..DAILY_POWER_UPS {
                    let kind = self.ledger.grant_random(&mut self.rng);
                    notices.push(Notice::PowerUpEarned { kind });
                }
            }
        }
    }

    fn update_achievements(&mut self, outcome: Outcome, notices: &mut Vec<Notice>) {
        let streak = self.progression().streak;

        for change in self.achievements.update(streak) {
            match change {
                BadgeChange::Unlocked(badge) => notices.push(Notice::BadgeUnlocked { badge }),
                BadgeChange::Locked(badge) => debug!("Badge locked: {}", badge.name()),
            }
        }

        if outcome == Outcome::Win && is_combo_milestone(streak) {
            notices.push(Notice::Combo { streak });
        }
    }

    // =========================================================================
    // TIME
    // =========================================================================

    /// Move virtual time forward, firing every timer that falls due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.modes.scheduler().now().saturating_add(elapsed_ms);

        while let Some((handle, task)) = self.modes.scheduler_mut().pop_due(until) {
            #[cfg(feature = "debug-tracing")]
            debug!("Timer fired: {:?} at {}ms", task, self.modes.scheduler().now());

            self.on_timer(handle, task);
        }
        self.modes.scheduler_mut().advance_to(until);
    }

    fn on_timer(&mut self, handle: TimerHandle, task: TimerTask) {
        match task {
            TimerTask::ReleaseRound => {
                if self.release_timer == Some(handle) {
                    self.release_timer = None;
                    self.release_round();
                }
            }
            TimerTask::PeekExpired => {
                if self.peek_timer == Some(handle) {
                    self.peek_timer = None;
                    self.pending_events.push(SessionEvent::Notice(Notice::PeekExpired));
                }
            }
            TimerTask::MoveTick | TimerTask::ChallengeTick | TimerTask::Unfreeze => {
                match self.modes.on_timer(handle, task) {
                    Some(ModeSignal::MoveExpired) => {
                        info!("Move timer expired");
                        self.play_round(None);
                    }
                    Some(ModeSignal::ChallengeFailed) => {
                        self.pending_events
                            .push(SessionEvent::Notice(Notice::ChallengeFailed));
                        self.emit_render();
                    }
                    Some(ModeSignal::Unfrozen) => {
                        self.pending_events
                            .push(SessionEvent::Notice(Notice::TimerUnfrozen));
                        if !self.round_in_flight {
                            self.modes.arm_move_timer();
                        }
                        self.emit_render();
                    }
                    // Countdown tick
                    None => self.emit_render(),
                }
            }
        }
    }

    fn release_round(&mut self) {
        self.round_in_flight = false;
        self.modes.arm_move_timer();
        debug!("Round released");
    }

    // =========================================================================
    // POWER-UPS
    // =========================================================================

    /// Spend a power-up. Returns false when none of that kind are held.
    pub fn use_power_up(&mut self, kind: PowerUpKind) -> bool {
        if !self.ledger.consume(kind) {
            debug!("No {} to use", kind);
            return false;
        }
        info!("Power-up used: {}", kind);

        let notice = match kind {
            PowerUpKind::Shield => Some(Notice::ShieldArmed),
            PowerUpKind::DoubleWin => Some(Notice::DoubleWinArmed),
            PowerUpKind::Peek => {
                // Display only: the next round draws its own opponent move
                let opponent = random_move(&mut self.rng);
                let delay = self.rules.peek_duration_ms;
                let scheduler = self.modes.scheduler_mut();
                if let Some(old) = self.peek_timer.take() {
                    scheduler.cancel(old);
                }
                self.peek_timer = Some(scheduler.schedule_after(delay, TimerTask::PeekExpired));
                Some(Notice::PeekRevealed { opponent })
            }
            PowerUpKind::TimeFreeze => {
                if self.modes.freeze() {
                    Some(Notice::TimerFrozen {
                        seconds: (self.rules.time_freeze_ms / 1000) as u32,
                    })
                } else {
                    debug!("Time Freeze spent with no countdown running");
                    None
                }
            }
        };

        if let Some(notice) = notice {
            self.pending_events.push(SessionEvent::Notice(notice));
        }
        self.emit_render();
        true
    }

    // =========================================================================
    // SETTINGS
    // =========================================================================

    /// Switch to `mode`, restarting it if it is already live.
    pub fn set_mode(&mut self, mode: Mode) {
        let mut notices = Vec::new();
        self.modes.switch_to(mode, &mut notices);
        // The release timer rearms the countdown once the round leaves the screen
        if self.round_in_flight {
            self.modes.suspend_move_timer();
        }
        self.push_notices(notices);
        self.persist();
        self.emit_render();
    }

    /// Advance to the next mode in the cycle.
    pub fn cycle_mode(&mut self) -> Mode {
        let next = self.mode().next();
        self.set_mode(next);
        next
    }

    /// Advance to the next theme.
    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        info!("Theme: {}", self.theme);
        self.persist();
        self.emit_render();
        self.theme
    }

    /// Toggle sound effects. Returns the new muted flag.
    pub fn toggle_mute(&mut self) -> bool {
        self.audio.muted = !self.audio.muted;
        self.persist();
        self.emit_render();
        self.audio.muted
    }

    /// Toggle background music. Returns the new playing flag.
    pub fn toggle_music(&mut self) -> bool {
        self.audio.music_playing = !self.audio.music_playing;
        self.persist();
        self.emit_render();
        self.audio.music_playing
    }

    /// Clear streak, game counts, history and badges.
    ///
    /// Level, experience, power-ups, best streak and the live mode are
    /// kept. A Timed countdown restarts.
    pub fn reset(&mut self) {
        info!("Resetting stats");
        self.progression.reset();
        self.achievements.reset();
        self.modes.suspend_move_timer();
        if !self.round_in_flight {
            self.modes.arm_move_timer();
        }
        self.persist();
        self.emit_render();
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Everything needed to redraw.
    pub fn snapshot(&self) -> SessionSnapshot {
        let progression = *self.progression();
        SessionSnapshot {
            win_percentage: progression.win_percentage(),
            progression,
            mode: *self.modes.state(),
            inventory: *self.ledger.inventory(),
            modifiers: *self.ledger.modifiers(),
            daily: self.daily,
            badges: self.achievements.unlocked().collect(),
            theme: self.theme,
            audio: self.audio,
            last_round: self.history().latest().copied(),
            round_in_flight: self.round_in_flight,
        }
    }

    /// Shareable stats summary.
    pub fn share_text(&self) -> String {
        let p = self.progression();
        let last = match self.history().latest().map(|round| round.outcome) {
            Some(Outcome::Win) => "Last Game: Won!",
            Some(Outcome::Lose) => "Last Game: Lost!",
            Some(Outcome::Draw) => "Last Game: Draw!",
            None => "Challenge me to a game!",
        };

        format!(
            "Play Rock Paper Scissors with me!\n\n\
             My Current Stats:\n\
             - Games Played: {}\n\
             - Current Streak: {}\n\
             - Best Streak: {}\n\
             - Win Rate: {}%\n\n\
             {}",
            p.total_games,
            p.streak,
            p.longest_streak,
            p.win_percentage(),
            last
        )
    }

    fn saved_state(&self) -> SavedState {
        let p = self.progression();
        SavedState {
            theme: self.theme,
            muted: self.audio.muted,
            music_playing: self.audio.music_playing,
            mode: self.mode(),
            longest_streak: p.longest_streak,
            total_games: p.total_games,
            wins: p.wins,
        }
    }

    fn persist(&mut self) {
        let saved = self.saved_state();
        saved.store(&mut self.store);
    }

    fn push_notices(&mut self, notices: Vec<Notice>) {
        self.pending_events
            .extend(notices.into_iter().map(SessionEvent::Notice));
    }

    fn emit_render(&mut self) {
        let snapshot = self.snapshot();
        self.pending_events.push(SessionEvent::Render(snapshot));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::NaiveDate;

    type TestSession = GameSession<DeterministicRng, FixedClock, MemoryStore>;

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn session_with(rules: RulesConfig, store: MemoryStore) -> TestSession {
        GameSession::new(rules, DeterministicRng::new(7), clock(), store)
    }

    fn session() -> TestSession {
        session_with(RulesConfig::default(), MemoryStore::new())
    }

    fn notices(events: &[SessionEvent]) -> Vec<Notice> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Notice(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_session_draws_daily_challenge() {
        let mut s = session();
        let events = s.take_events();

        let target = s.daily().target;
        assert!((3..=7).contains(&target));
        assert_eq!(notices(&events), vec![Notice::DailyChallengeNew { target }]);
        assert!(matches!(events.last(), Some(SessionEvent::Render(_))));
    }

    #[test]
    fn test_round_resolves_against_drawn_opponent() {
        let mut s = session();
        let report = s.play(Move::Rock).unwrap();

        assert_eq!(report.raw_outcome, resolve(Move::Rock, report.round.opponent_move));
        assert_eq!(report.round.player_move, Some(Move::Rock));
        assert_eq!(s.progression().total_games, 1);
        assert_eq!(s.history().latest(), Some(&report.round));
    }

    #[test]
    fn test_reentrant_move_is_ignored() {
        let mut s = session();
        assert!(s.play(Move::Paper).is_some());
        assert!(s.is_round_in_flight());

        assert!(s.play(Move::Rock).is_none());
        assert_eq!(s.progression().total_games, 1);

        s.advance(1999);
        assert!(s.play(Move::Rock).is_none());

        s.advance(1);
        assert!(!s.is_round_in_flight());
        assert!(s.play(Move::Rock).is_some());
        assert_eq!(s.progression().total_games, 2);
    }

    #[test]
    fn test_shield_turns_loss_into_draw() {
        let mut s = session();
        s.ledger.grant(PowerUpKind::Shield);
        assert!(s.use_power_up(PowerUpKind::Shield));

        // Play until the resolver hands us a loss
        let report = loop {
            let report = s.play(Move::Rock).unwrap();
            s.advance(2000);
            if report.raw_outcome == Outcome::Lose {
                break report;
            }
        };

        assert_eq!(report.outcome(), Outcome::Draw);
        assert!(report.notices.contains(&Notice::ShieldBlocked));
        assert!(!s.power_ups().modifiers().shield_active);
    }

    #[test]
    fn test_use_power_up_without_stock() {
        let mut s = session();
        s.take_events();

        assert!(!s.use_power_up(PowerUpKind::DoubleWin));
        assert!(s.take_events().is_empty());
        assert!(!s.power_ups().modifiers().double_win_active);
    }

    #[test]
    fn test_peek_reveals_then_expires() {
        let mut s = session();
        s.ledger.grant(PowerUpKind::Peek);
        s.take_events();

        assert!(s.use_power_up(PowerUpKind::Peek));
        let shown = notices(&s.take_events());
        assert!(matches!(shown.as_slice(), [Notice::PeekRevealed { .. }]));

        s.advance(2999);
        assert!(notices(&s.take_events()).is_empty());
        s.advance(1);
        assert_eq!(notices(&s.take_events()), vec![Notice::PeekExpired]);
    }

    #[test]
    fn test_timeout_round_loses_without_move() {
        let mut s = session();
        s.set_mode(Mode::Timed);
        s.take_events();

        s.advance(2999);
        assert_eq!(s.progression().total_games, 0);

        s.advance(1);
        let events = s.take_events();
        let report = events
            .iter()
            .find_map(|e| match e {
                SessionEvent::RoundResolved(r) => Some(r.clone()),
                _ => None,
            })
            .unwrap();

        assert_eq!(report.round.player_move, None);
        assert!(report.round.is_timeout());
        assert_eq!(report.outcome(), Outcome::Lose);
        assert!(s.is_round_in_flight());

        // Released after the display delay with a fresh countdown
        s.advance(2000);
        assert!(!s.is_round_in_flight());
        assert!(matches!(s.mode_state(), ModeState::Timed(t) if t.remaining == 3));
    }

    #[test]
    fn test_time_freeze_delays_timeout() {
        let mut s = session();
        s.set_mode(Mode::Timed);
        s.ledger.grant(PowerUpKind::TimeFreeze);

        s.advance(2000);
        assert!(s.use_power_up(PowerUpKind::TimeFreeze));
        assert!(s.is_frozen());

        s.advance(4999);
        assert_eq!(s.progression().total_games, 0);
        s.advance(1);
        assert!(!s.is_frozen());
        assert!(notices(&s.take_events()).contains(&Notice::TimerUnfrozen));

        // Fresh three-tick countdown after the freeze
        s.advance(2999);
        assert_eq!(s.progression().total_games, 0);
        s.advance(1);
        assert_eq!(s.progression().total_games, 1);
    }

    #[test]
    fn test_leaving_timed_mode_ends_freeze() {
        let mut s = session();
        s.set_mode(Mode::Timed);
        s.ledger.grant(PowerUpKind::TimeFreeze);
        s.advance(1000);
        assert!(s.use_power_up(PowerUpKind::TimeFreeze));
        s.take_events();

        s.set_mode(Mode::Normal);
        assert!(!s.is_frozen());
        assert!(notices(&s.take_events()).contains(&Notice::TimerUnfrozen));

        s.advance(60_000);
        assert!(!notices(&s.take_events()).contains(&Notice::TimerUnfrozen));
    }

    #[test]
    fn test_time_freeze_outside_timed_mode_is_spent() {
        let mut s = session();
        s.ledger.grant(PowerUpKind::TimeFreeze);
        s.take_events();

        assert!(s.use_power_up(PowerUpKind::TimeFreeze));
        assert_eq!(s.power_ups().inventory().count(PowerUpKind::TimeFreeze), 0);
        assert!(notices(&s.take_events()).is_empty());
        assert!(!s.is_frozen());
    }

    #[test]
    fn test_mode_switch_during_round_waits_for_release() {
        let mut s = session();
        s.play(Move::Scissors);
        s.set_mode(Mode::Timed);

        // No countdown while the round is on display
        s.advance(1999);
        assert_eq!(s.progression().total_games, 1);

        s.advance(1);
        s.advance(3000);
        assert_eq!(s.progression().total_games, 2);
        assert!(s.history().latest().unwrap().is_timeout());
    }

    #[test]
    fn test_settings_persist() {
        let mut s = session();
        s.cycle_theme();
        s.toggle_mute();
        s.toggle_music();
        s.set_mode(Mode::Tournament);

        let saved = SavedState::decode(s.store().record().unwrap()).unwrap();
        assert_eq!(saved.theme, Theme::Dark);
        assert!(saved.muted);
        assert!(saved.music_playing);
        assert_eq!(saved.mode, Mode::Tournament);
    }

    #[test]
    fn test_restore_from_store() {
        let store = MemoryStore::with_record(
            r#"{"theme":"neon","mode":"challenge","longestStreak":9,"totalGames":12,"wins":7}"#,
        );
        let mut s = session_with(RulesConfig::default(), store);

        assert_eq!(s.theme(), Theme::Neon);
        assert_eq!(s.progression().longest_streak, 9);
        assert_eq!(s.progression().total_games, 12);
        assert_eq!(s.progression().level, 1);
        assert!(matches!(s.mode_state(), ModeState::Challenge(c) if c.active && c.current_wins == 0));
        assert!(notices(&s.take_events()).contains(&Notice::ChallengeStarted { target: 5, seconds: 60 }));
    }

    #[test]
    fn test_restored_max_counters_do_not_overflow() {
        let store = MemoryStore::with_record(r#"{"totalGames":4294967295,"wins":4294967295}"#);
        let mut s = session_with(RulesConfig::default(), store);

        assert!(s.play(Move::Rock).is_some());
        assert_eq!(s.progression().total_games, u32::MAX);
        assert!(s.snapshot().win_percentage <= 100);
    }

    #[test]
    fn test_reset_keeps_level_and_best_streak() {
        let mut s = session();
        for _ in 0..20 {
            s.play(Move::Paper);
            s.advance(2000);
        }
        let before = *s.progression();

        s.reset();
        let after = *s.progression();

        assert_eq!(after.total_games, 0);
        assert_eq!(after.wins, 0);
        assert_eq!(after.streak, 0);
        assert!(s.history().is_empty());
        assert_eq!(after.level, before.level);
        assert_eq!(after.experience, before.experience);
        assert_eq!(after.longest_streak, before.longest_streak);
        assert_eq!(s.achievements().unlocked().count(), 0);
    }

    #[test]
    fn test_daily_completion_pays_out() {
        let rules = RulesConfig {
            daily_target_min: 1,
            daily_target_max: 1,
            win_power_up_percent: 0,
            ..RulesConfig::default()
        };
        let mut s = session_with(rules, MemoryStore::new());

        let report = loop {
            let report = s.play(Move::Rock).unwrap();
            s.advance(2000);
            if report.outcome() == Outcome::Win {
                break report;
            }
        };

        assert!(report.notices.contains(&Notice::DailyComplete { bonus_xp: 150 }));
        assert!(s.daily().completed);
        // Two daily power-ups plus one for the level gained
        assert_eq!(s.power_ups().inventory().total(), 3);
        assert_eq!(s.progression().level, 2);
    }

    #[test]
    fn test_share_text() {
        let s = session();
        let text = s.share_text();
        assert!(text.contains("Games Played: 0"));
        assert!(text.ends_with("Challenge me to a game!"));
    }

    /// Opponent always throws scissors; every roll lands on index 2.
    struct ScissorsOnly;

    impl RandomSource for ScissorsOnly {
        fn next_u64(&mut self) -> u64 {
            2
        }
    }

    fn scissors_session() -> GameSession<ScissorsOnly, FixedClock, MemoryStore> {
        let rules = RulesConfig {
            daily_target_min: 50,
            daily_target_max: 50,
            win_power_up_percent: 0,
            ..RulesConfig::default()
        };
        GameSession::new(rules, ScissorsOnly, clock(), MemoryStore::new())
    }

    #[test]
    fn test_challenge_success_pays_bonus_and_power_up() {
        let mut s = scissors_session();
        s.set_mode(Mode::Challenge);

        let mut last = None;
        for _ in 0..5 {
            last = s.play(Move::Rock);
            s.advance(2000);
        }
        let report = last.unwrap();

        assert!(report.notices.contains(&Notice::ChallengeComplete { bonus_xp: 100 }));
        // 12+14+16+18+20 from wins plus the bonus crosses level 2
        assert_eq!(report.progression.level, 2);
        assert_eq!(report.progression.experience, 80);
        // One for the level gained, one for the challenge
        assert_eq!(report.inventory.total(), 2);
        assert_eq!(report.inventory.count(PowerUpKind::Peek), 2);

        s.take_events();
        s.advance(120_000);
        assert!(!notices(&s.take_events()).contains(&Notice::ChallengeFailed));
    }

    #[test]
    fn test_tournament_win_pays_bonus_and_power_up() {
        let mut s = scissors_session();
        s.set_mode(Mode::Tournament);

        let reports: Vec<RoundReport> = (0..5)
            .map(|_| {
                let report = s.play(Move::Rock).unwrap();
                s.advance(2000);
                report
            })
            .collect();
        let last = &reports[4];

        assert!(last
            .notices
            .contains(&Notice::TournamentWon { wins: 5, rounds: 5, bonus_xp: 200 }));
        // 80 from wins plus 200 crosses two levels
        assert_eq!(last.progression.level, 3);
        assert_eq!(last.progression.experience, 60);
        assert_eq!(reports[3].inventory.total(), 0);
        assert_eq!(last.inventory.total(), 3);
        let earned = last
            .notices
            .iter()
            .filter(|n| matches!(n, Notice::PowerUpEarned { .. }))
            .count();
        assert_eq!(earned, 3);
    }
}
