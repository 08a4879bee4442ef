//! Virtual-clock timer queue.
//!
//! All deferred work (thinking delay, fade window, watchdog, notification
//! expiry) is a timer on this queue. Time only moves when the embedder
//! calls `RoundEngine::tick`; timers fire in deadline order, ties in
//! scheduling order. Cancelling a handle removes the timer outright, so a
//! cancelled callback can never run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Handle to a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// Deferred work the round engine can schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Computer agent finishes thinking.
    Deliberate,
    /// Fade window over, apply the pending board refresh.
    FadeComplete,
    /// Periodic liveness check on the computer agent.
    Watchdog,
    /// Hide the current notification.
    DismissNotification,
    /// Start a new session after a player victory.
    RestartSession,
}

impl Task {
    /// Whether the task belongs to a running round and goes stale once it ends.
    #[must_use]
    pub fn is_round_scoped(self) -> bool {
        matches!(self, Task::Deliberate | Task::FadeComplete | Task::Watchdog)
    }
}

/// Timer queue keyed by `(deadline, handle)`.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerHandle), Task>,
}

impl Scheduler {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedule `task` to run `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, task: Task) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now_ms + delay_ms, handle), task);
        handle
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self.queue.keys().find(|(_, h)| *h == handle).copied();
        key.is_some_and(|k| self.queue.remove(&k).is_some())
    }

    /// Cancel the timer in `slot`, if any, leaving the slot empty.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerHandle>) {
        if let Some(handle) = slot.take() {
            self.cancel(handle);
        }
    }

    /// Deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, handle: TimerHandle) -> Option<u64> {
        self.queue.keys().find(|(_, h)| *h == handle).map(|(at, _)| *at)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerHandle, Task)> {
        let (&(at, handle), _) = self.queue.iter().next()?;
        if at > until {
            return None;
        }
        let task = self.queue.remove(&(at, handle))?;
        self.now_ms = self.now_ms.max(at);
        Some((handle, task))
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, at: u64) {
        self.now_ms = self.now_ms.max(at);
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
