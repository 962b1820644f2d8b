//! # RPS Duel
//!
//! Rock-paper-scissors against a seeded opponent, with streaks,
//! experience, power-ups, timed/challenge/tournament modes and a daily
//! challenge.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         RPS DUEL                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives               │
//! │  ├── rng.rs        - Xorshift128+ PRNG                      │
//! │  └── clock.rs      - Wall clock (system or pinned)          │
//! │                                                             │
//! │  game/             - Rules (deterministic)                  │
//! │  ├── round.rs      - Moves and the resolver                 │
//! │  ├── powerup.rs    - Power-up ledger                        │
//! │  ├── progression.rs- Streaks, XP, levels, history           │
//! │  ├── mode.rs       - Mode state machine                     │
//! │  ├── scheduler.rs  - Virtual-time timers                    │
//! │  ├── daily.rs      - Daily challenge                        │
//! │  ├── achievement.rs- Streak badges                          │
//! │  ├── events.rs     - Player-facing notices                  │
//! │  └── input.rs      - Command parsing                        │
//! │                                                             │
//! │  session/          - Orchestration                          │
//! │  persist/          - Settings snapshot (best effort)        │
//! │  config.rs         - Rules and environment config           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Given the same seed, day and sequence of inputs and `advance` calls,
//! a session produces identical rounds and events:
//! - All randomness from seeded Xorshift128+
//! - Timers run on virtual time, advanced only by the caller
//! - BTreeMap/BTreeSet wherever iteration order is observable

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;
pub mod persist;
pub mod session;

// Re-export commonly used types
pub use crate::core::rng::{DeterministicRng, RandomSource};
pub use crate::core::clock::{Clock, SystemClock, FixedClock};
pub use config::{GameConfig, RulesConfig, ConfigError};
pub use game::{Move, Outcome, Round, Mode, ModeState, PowerUpKind, Notice, Command};
pub use persist::{FileStore, MemoryStore, SavedState, SnapshotStore, Theme};
pub use session::{GameSession, RoundReport, SessionEvent, SessionSnapshot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
