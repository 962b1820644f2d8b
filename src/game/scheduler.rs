//! Virtual-Time Scheduler
//!
//! Every delayed effect in the game (move countdown, challenge countdown,
//! time freeze, display delay) is a timer in this queue. Time only moves
//! when the owner advances it, so sessions replay identically.
//!
//! Timers fire in (due time, creation order). The queue uses BTreeMap for
//! deterministic iteration.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

/// Handle to a scheduled timer. Cancelling is always explicit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerTask {
    /// One second of the Timed-mode move countdown
    MoveTick,
    /// One second of the Challenge countdown
    ChallengeTick,
    /// Time Freeze ran out
    Unfreeze,
    /// Peek display window closed
    PeekExpired,
    /// Display delay over, accept the next round
    ReleaseRound,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    handle: TimerHandle,
    task: TimerTask,
    /// Repeat period for interval timers
    period: Option<u64>,
}

/// Deterministic timer queue over virtual milliseconds.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    /// (due_ms, id) -> entry
    queue: BTreeMap<(u64, u64), Entry>,
    /// id -> due_ms, for cancellation
    due_by_id: BTreeMap<u64, u64>,
}

impl Scheduler {
    /// Empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Fire once after `delay_ms`.
    pub fn schedule_after(&mut self, delay_ms: u64, task: TimerTask) -> TimerHandle {
        self.insert(delay_ms, task, None)
    }

    /// Fire every `period_ms`, starting one period from now.
    pub fn schedule_every(&mut self, period_ms: u64, task: TimerTask) -> TimerHandle {
        let period = period_ms.max(1);
        self.insert(period, task, Some(period))
    }

    fn insert(&mut self, delay_ms: u64, task: TimerTask, period: Option<u64>) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;

        let handle = TimerHandle(id);
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, id), Entry { handle, task, period });
        self.due_by_id.insert(id, due);
        handle
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_id.remove(&handle.0) {
            Some(due) => self.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    /// Is the timer still waiting to fire?
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_id.contains_key(&handle.0)
    }

    /// Number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// Virtual time jumps to the timer's due time. Interval timers are
    /// re-queued under the same handle before returning, so the caller can
    /// still cancel them.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerHandle, TimerTask)> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }

        let entry = self.queue.remove(&(due, id))?;
        self.now_ms = self.now_ms.max(due);

        match entry.period {
            Some(period) => {
                let next_due = due.saturating_add(period);
                self.queue.insert((next_due, id), entry);
                self.due_by_id.insert(id, next_due);
            }
            None => {
                self.due_by_id.remove(&id);
            }
        }

        Some((entry.handle, entry.task))
    }

    /// Move virtual time forward without firing anything.
    ///
    /// Call after draining `pop_due` for the same target.
    pub fn advance_to(&mut self, until: u64) {
        self.now_ms = self.now_ms.max(until);
    }
}
