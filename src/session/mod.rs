//! Session Orchestration
//!
//! Ties the rules modules, the clock, the RNG and persistence into one
//! player-facing game.

pub mod game_session;
pub mod report;

pub use game_session::GameSession;
pub use report::{AudioSettings, RoundReport, SessionEvent, SessionSnapshot};
