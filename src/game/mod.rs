//! Game Logic Module
//!
//! All rules code. Deterministic given the injected RNG and clock.
//!
//! ## Module Structure
//!
//! - `round`: Moves, outcomes, the resolver
//! - `powerup`: Power-up inventory and one-shot modifiers
//! - `progression`: Streak, experience, levels, history
//! - `mode`: Mode state machine (Normal / Timed / Challenge / Tournament)
//! - `scheduler`: Virtual-time timers
//! - `daily`: Daily challenge
//! - `achievement`: Streak badges and combo milestones
//! - `events`: Player-facing notices
//! - `input`: Terminal command parsing

pub mod round;
pub mod powerup;
pub mod progression;
pub mod mode;
pub mod scheduler;
pub mod daily;
pub mod achievement;
pub mod events;
pub mod input;

// Re-export key types
pub use round::{Move, Outcome, Round, resolve, random_move};
pub use powerup::{PowerUpKind, PowerUpInventory, ActiveModifiers, PowerUpLedger};
pub use progression::{Progression, ProgressionEngine, RoundHistory};
pub use mode::{Mode, ModeState, ModeCoordinator};
pub use scheduler::{Scheduler, TimerHandle, TimerTask};
pub use daily::DailyChallenge;
pub use achievement::{AchievementBoard, Badge};
pub use events::Notice;
pub use input::Command;
