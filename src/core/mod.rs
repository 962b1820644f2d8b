//! Core deterministic primitives.
//!
//! Randomness and wall-clock time are injected through the traits in this
//! module so a whole session can be replayed from a seed and a pinned clock.

pub mod rng;
pub mod clock;

// Re-export core types
pub use rng::{DeterministicRng, RandomSource, derive_seed};
pub use clock::{Clock, SystemClock, FixedClock};
