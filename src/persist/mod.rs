//! Persistence
//!
//! Best-effort settings/stats snapshot. Nothing here can fail a game
//! action: read errors fall back to defaults, write errors are logged.

pub mod store;
pub mod saved;

pub use store::{SnapshotStore, MemoryStore, FileStore, StoreError};
pub use saved::{SavedState, Theme};
