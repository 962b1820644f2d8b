//! Mode Coordinator
//!
//! Variant state machine over Normal / Timed / Challenge / Tournament.
//! Owns the scheduler and every mode timer handle; switching modes
//! cancels the handles before anything new is armed, so two countdowns
//! can never drive the same mode.

use std::fmt;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::game::events::Notice;
use crate::game::round::Outcome;
use crate::game::scheduler::{Scheduler, TimerHandle, TimerTask};

// =============================================================================
// MODE KIND
// =============================================================================

/// Selectable play mode. This is what gets persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Classic play
    #[default]
    Normal,
    /// Per-move countdown
    Timed,
    /// Reach a win target before time runs out
    Challenge,
    /// Fixed number of rounds
    Tournament,
}

impl Mode {
    /// Next mode in the toggle cycle.
    pub fn next(self) -> Mode {
        match self {
            Mode::Normal => Mode::Timed,
            Mode::Timed => Mode::Challenge,
            Mode::Challenge => Mode::Tournament,
            Mode::Tournament => Mode::Normal,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "Normal Mode",
            Mode::Timed => "Timed Mode",
            Mode::Challenge => "Challenge Mode",
            Mode::Tournament => "Tournament Mode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// MODE STATE
// =============================================================================

/// Timed-mode counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedState {
    /// Countdown length per move
    pub seconds_per_move: u32,
    /// Seconds left on the current countdown
    pub remaining: u32,
}

/// Challenge-mode counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeState {
    /// Wins needed
    pub target_wins: u32,
    /// Wins so far
    pub current_wins: u32,
    /// Total time allowed
    pub time_limit_sec: u32,
    /// Time left
    pub remaining_sec: u32,
    /// Still running?
    pub active: bool,
}

/// Tournament-mode counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentState {
    /// Current round (1-based; max_rounds + 1 once finished)
    pub round: u32,
    /// Rounds in the tournament
    pub max_rounds: u32,
    /// Rounds won
    pub wins: u32,
    /// Rounds lost
    pub losses: u32,
    /// Still running?
    pub active: bool,
}

/// The live mode and its counters. Exactly one variant at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeState {
    /// No extra state
    #[default]
    Normal,
    /// Per-move countdown
    Timed(TimedState),
    /// Win target against the clock
    Challenge(ChallengeState),
    /// Fixed round count
    Tournament(TournamentState),
}

impl ModeState {
    /// Which mode this is.
    pub fn kind(&self) -> Mode {
        match self {
            ModeState::Normal => Mode::Normal,
            ModeState::Timed(_) => Mode::Timed,
            ModeState::Challenge(_) => Mode::Challenge,
            ModeState::Tournament(_) => Mode::Tournament,
        }
    }

    /// Fresh counters for a mode.
    pub fn initial(mode: Mode, rules: &RulesConfig) -> Self {
        match mode {
            Mode::Normal => ModeState::Normal,
            Mode::Timed => ModeState::Timed(TimedState {
                seconds_per_move: rules.seconds_per_move,
                remaining: rules.seconds_per_move,
            }),
            Mode::Challenge => ModeState::Challenge(ChallengeState {
                target_wins: rules.challenge_target,
                current_wins: 0,
                time_limit_sec: rules.challenge_time_limit,
                remaining_sec: rules.challenge_time_limit,
                active: true,
            }),
            Mode::Tournament => ModeState::Tournament(TournamentState {
                round: 1,
                max_rounds: rules.tournament_rounds,
                wins: 0,
                losses: 0,
                active: true,
            }),
        }
    }
}

// =============================================================================
// SIGNALS
// =============================================================================

/// Terminal result of a Challenge or Tournament, for the session to reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeCompletion {
    /// Challenge target reached before the countdown expired
    ChallengeComplete { bonus_xp: u32 },
    /// Tournament finished with more wins than losses
    TournamentWon { wins: u32, rounds: u32, bonus_xp: u32 },
    /// Tournament finished otherwise (ties included)
    TournamentFinished { wins: u32, rounds: u32, bonus_xp: u32 },
}

impl ModeCompletion {
    /// Bonus experience owed.
    pub fn bonus_xp(&self) -> u32 {
        match *self {
            ModeCompletion::ChallengeComplete { bonus_xp }
            | ModeCompletion::TournamentWon { bonus_xp, .. }
            | ModeCompletion::TournamentFinished { bonus_xp, .. } => bonus_xp,
        }
    }

    /// Does this completion also grant a random power-up?
    pub fn grants_power_up(&self) -> bool {
        !matches!(self, ModeCompletion::TournamentFinished { .. })
    }

    /// The notice to show.
    pub fn notice(&self) -> Notice {
        match *self {
            ModeCompletion::ChallengeComplete { bonus_xp } => Notice::ChallengeComplete { bonus_xp },
            ModeCompletion::TournamentWon { wins, rounds, bonus_xp } => {
                Notice::TournamentWon { wins, rounds, bonus_xp }
            }
            ModeCompletion::TournamentFinished { wins, rounds, bonus_xp } => {
                Notice::TournamentComplete { wins, rounds, bonus_xp }
            }
        }
    }
}

/// Result of a mode timer firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeSignal {
    /// Move countdown reached zero; the session must play a timeout round
    MoveExpired,
    /// Challenge countdown reached zero
    ChallengeFailed,
    /// Time Freeze ended; the session may rearm the countdown
    Unfrozen,
}

// =============================================================================
// COORDINATOR
// =============================================================================

/// Owns the live `ModeState`, the scheduler and the mode timer handles.
#[derive(Clone, Debug)]
pub struct ModeCoordinator {
    state: ModeState,
    rules: RulesConfig,
    scheduler: Scheduler,
    move_timer: Option<TimerHandle>,
    challenge_timer: Option<TimerHandle>,
    freeze_timer: Option<TimerHandle>,
}

impl ModeCoordinator {
    /// Start in Normal mode.
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            state: ModeState::Normal,
            rules,
            scheduler: Scheduler::new(),
            move_timer: None,
            challenge_timer: None,
            freeze_timer: None,
        }
    }

    /// Live mode state.
    pub fn state(&self) -> &ModeState {
        &self.state
    }

    /// Live mode kind.
    pub fn mode(&self) -> Mode {
        self.state.kind()
    }

    /// Shared scheduler (also carries session-level timers).
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Mutable scheduler access for session-level timers.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Is the move countdown currently running?
    pub fn move_timer_running(&self) -> bool {
        self.move_timer.is_some()
    }

    /// Is a Time Freeze in effect?
    pub fn is_frozen(&self) -> bool {
        self.freeze_timer.is_some()
    }

    /// Switch to `mode`, cancelling every running mode timer first.
    ///
    /// Switching to the current mode restarts it.
    pub fn switch_to(&mut self, mode: Mode, notices: &mut Vec<Notice>) {
        // A cancelled freeze still ends
        if self.is_frozen() {
            notices.push(Notice::TimerUnfrozen);
        }
        self.stop_all_timers();

        info!("Mode switch: {} -> {}", self.state.kind(), mode);
        self.state = ModeState::initial(mode, &self.rules);

        match self.state {
            ModeState::Normal => {}
            ModeState::Timed(_) => self.arm_move_timer(),
            ModeState::Challenge(c) => {
                notices.push(Notice::ChallengeStarted {
                    target: c.target_wins,
                    seconds: c.time_limit_sec,
                });
                self.challenge_timer = Some(
                    self.scheduler.schedule_every(self.rules.tick_ms, TimerTask::ChallengeTick),
                );
            }
            ModeState::Tournament(t) => {
                notices.push(Notice::TournamentStarted { rounds: t.max_rounds });
            }
        }
    }

    fn stop_all_timers(&mut self) {
        for handle in [
            self.move_timer.take(),
            self.challenge_timer.take(),
            self.freeze_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.scheduler.cancel(handle);
        }
    }

    /// Start a fresh move countdown (Timed mode only).
    ///
    /// No-op outside Timed mode or while frozen. Any running countdown is
    /// replaced.
    pub fn arm_move_timer(&mut self) {
        if self.is_frozen() {
            return;
        }
        let ModeState::Timed(timed) = &mut self.state else {
            return;
        };

        timed.remaining = timed.seconds_per_move;
        if let Some(old) = self.move_timer.take() {
            self.scheduler.cancel(old);
        }
        self.move_timer = Some(self.scheduler.schedule_every(self.rules.tick_ms, TimerTask::MoveTick));
        debug!("Move countdown armed: {}s", timed.seconds_per_move);
    }

    /// Stop the move countdown (a round started).
    pub fn suspend_move_timer(&mut self) {
        if let Some(handle) = self.move_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Suspend the running move countdown for the Time Freeze duration.
    ///
    /// Returns false (and does nothing) when no countdown is running.
    pub fn freeze(&mut self) -> bool {
        let Some(handle) = self.move_timer.take() else {
            return false;
        };
        self.scheduler.cancel(handle);
        if let Some(old) = self.freeze_timer.take() {
            self.scheduler.cancel(old);
        }
        self.freeze_timer = Some(
            self.scheduler.schedule_after(self.rules.time_freeze_ms, TimerTask::Unfreeze),
        );
        true
    }

    /// Handle a fired mode timer.
    ///
    /// Returns None for timers this coordinator does not own.
    pub fn on_timer(&mut self, handle: TimerHandle, task: TimerTask) -> Option<ModeSignal> {
        match task {
            TimerTask::MoveTick if self.move_timer == Some(handle) => {
                let ModeState::Timed(timed) = &mut self.state else {
                    return None;
                };
                timed.remaining = timed.remaining.saturating_sub(1);
                if timed.remaining == 0 {
                    self.suspend_move_timer();
                    return Some(ModeSignal::MoveExpired);
                }
                None
            }
            TimerTask::ChallengeTick if self.challenge_timer == Some(handle) => {
                let ModeState::Challenge(challenge) = &mut self.state else {
                    return None;
                };
                challenge.remaining_sec = challenge.remaining_sec.saturating_sub(1);
                if challenge.remaining_sec == 0 {
                    challenge.active = false;
                    if let Some(h) = self.challenge_timer.take() {
                        self.scheduler.cancel(h);
                    }
                    info!("Challenge failed: {}/{} wins", challenge.current_wins, challenge.target_wins);
                    return Some(ModeSignal::ChallengeFailed);
                }
                None
            }
            TimerTask::Unfreeze if self.freeze_timer == Some(handle) => {
                self.freeze_timer = None;
                Some(ModeSignal::Unfrozen)
            }
            _ => None,
        }
    }

    /// Per-round hook, called with the effective outcome.
    pub fn on_round_end(&mut self, outcome: Outcome) -> Option<ModeCompletion> {
        match &mut self.state {
            ModeState::Normal | ModeState::Timed(_) => None,
            ModeState::Challenge(challenge) => {
                if !challenge.active || outcome != Outcome::Win {
                    return None;
                }
                challenge.current_wins += 1;
                if challenge.current_wins < challenge.target_wins {
                    return None;
                }

                challenge.active = false;
                if let Some(h) = self.challenge_timer.take() {
                    self.scheduler.cancel(h);
                }
                info!("Challenge complete with {}s left", challenge.remaining_sec);
                Some(ModeCompletion::ChallengeComplete {
                    bonus_xp: self.rules.challenge_bonus_xp,
                })
            }
            ModeState::Tournament(t) => {
                if !t.active {
                    return None;
                }
                match outcome {
                    Outcome::Win => t.wins += 1,
                    Outcome::Lose => t.losses += 1,
                    Outcome::Draw => {}
                }
                t.round += 1;
                if t.round <= t.max_rounds {
                    return None;
                }

                t.active = false;
                info!("Tournament over: {}W {}L", t.wins, t.losses);
                Some(if t.wins > t.losses {
                    ModeCompletion::TournamentWon {
                        wins: t.wins,
                        rounds: t.max_rounds,
                        bonus_xp: self.rules.tournament_win_xp,
                    }
                } else {
                    ModeCompletion::TournamentFinished {
                        wins: t.wins,
                        rounds: t.max_rounds,
                        bonus_xp: self.rules.tournament_finish_xp,
                    }
                })
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
