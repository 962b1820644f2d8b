//! Power-Up Ledger
//!
//! Inventory counts plus the one-shot modifiers that are armed by
//! consuming a power-up. Peek and Time Freeze have immediate effects that
//! need the session (randomness, timers), so the ledger only does the
//! bookkeeping for them.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::rng::RandomSource;

/// Kind of consumable power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PowerUpKind {
    /// Turns the next loss into a draw
    Shield = 0,
    /// Next win counts twice
    DoubleWin = 1,
    /// Preview a sampled opponent move
    Peek = 2,
    /// Suspend the move countdown
    TimeFreeze = 3,
}

impl PowerUpKind {
    /// All kinds, in grant-roll order.
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::DoubleWin,
        PowerUpKind::Peek,
        PowerUpKind::TimeFreeze,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "Shield",
            PowerUpKind::DoubleWin => "Double Win",
            PowerUpKind::Peek => "Peek",
            PowerUpKind::TimeFreeze => "Time Freeze",
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owned power-up counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpInventory {
    counts: [u32; 4],
}

impl PowerUpInventory {
    /// Count for a kind.
    #[inline]
    pub fn count(&self, kind: PowerUpKind) -> u32 {
        self.counts[kind as usize]
    }

    /// Total power-ups held.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Kinds with a positive count, with their counts.
    pub fn held(&self) -> impl Iterator<Item = (PowerUpKind, u32)> + '_ {
        PowerUpKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.count(kind)))
            .filter(|(_, count)| *count > 0)
    }

    fn increment(&mut self, kind: PowerUpKind) {
        let slot = &mut self.counts[kind as usize];
        *slot = slot.saturating_add(1);
    }

    fn decrement(&mut self, kind: PowerUpKind) -> bool {
        let slot = &mut self.counts[kind as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// One-shot modifiers armed by consumed power-ups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveModifiers {
    /// Next resolved loss becomes a draw
    pub shield_active: bool,
    /// Next resolved win counts twice
    pub double_win_active: bool,
}

/// Inventory plus armed modifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpLedger {
    inventory: PowerUpInventory,
    modifiers: ActiveModifiers,
}

impl PowerUpLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current inventory.
    pub fn inventory(&self) -> &PowerUpInventory {
        &self.inventory
    }

    /// Currently armed modifiers.
    pub fn modifiers(&self) -> &ActiveModifiers {
        &self.modifiers
    }

    /// Add one power-up of the given kind.
    pub fn grant(&mut self, kind: PowerUpKind) {
        self.inventory.increment(kind);
    }

    /// Add one power-up of a uniformly random kind.
    pub fn grant_random<R: RandomSource>(&mut self, rng: &mut R) -> PowerUpKind {
        let kind = PowerUpKind::ALL[rng.next_int(PowerUpKind::ALL.len() as u32) as usize];
        self.grant(kind);
        kind
    }

    /// Spend one power-up.
    ///
    /// Returns false with no state change when none are held. Shield and
    /// Double Win arm their modifier here; the immediate effects of Peek
    /// and Time Freeze are applied by the caller.
    pub fn consume(&mut self, kind: PowerUpKind) -> bool {
        if !self.inventory.decrement(kind) {
            return false;
        }
        match kind {
            PowerUpKind::Shield => self.modifiers.shield_active = true,
            PowerUpKind::DoubleWin => self.modifiers.double_win_active = true,
            PowerUpKind::Peek | PowerUpKind::TimeFreeze => {}
        }
        true
    }

    /// Clear and report the shield modifier.
    pub fn take_shield(&mut self) -> bool {
        std::mem::take(&mut self.modifiers.shield_active)
    }

    /// Clear and report the double-win modifier.
    pub fn take_double_win(&mut self) -> bool {
        std::mem::take(&mut self.modifiers.double_win_active)
    }
}
