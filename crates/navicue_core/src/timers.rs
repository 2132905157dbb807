//! One-shot timer set with cancel-on-drop semantics
//!
//! Vignettes chain their stage transitions on short delays. Every pending
//! delay lives in a [`TimerSet`] owned by the component, so tearing the
//! component down drops the set and silently discards everything still
//! pending. A cancelled or dropped timer never runs its callback.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending timer
    pub struct TimerId;
}

struct Timer {
    deadline_ms: f64,
    callback: Option<Box<dyn FnOnce() + Send>>,
}

/// A set of pending one-shot callbacks driven by elapsed time
///
/// The set is tick-driven: the owner advances it with frame deltas and due
/// callbacks fire during [`TimerSet::advance`], in deadline order.
pub struct TimerSet {
    timers: SlotMap<TimerId, Timer>,
    now_ms: f64,
}

impl TimerSet {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now_ms: 0.0,
        }
    }

    /// Schedule a callback `delay_ms` from the set's current time
    pub fn schedule<F>(&mut self, delay_ms: f64, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        self.timers.insert(Timer {
            deadline_ms: self.now_ms + delay_ms.max(0.0),
            callback: Some(Box::new(callback)),
        })
    }

    /// Cancel a pending timer; its callback will never run
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Cancel everything still pending
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Number of timers still pending
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Advance time by `dt_ms`, firing due callbacks in deadline order
    ///
    /// Returns the number of callbacks fired. Callbacks may schedule new
    /// timers onto this set from outside the call (the set is not reentrant;
    /// fired callbacks receive no `&mut TimerSet`).
    pub fn advance(&mut self, dt_ms: f64) -> usize {
        self.now_ms += dt_ms.max(0.0);

        let mut due: Vec<(TimerId, f64)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= self.now_ms)
            .map(|(id, t)| (id, t.deadline_ms))
            .collect();
        due.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut fired = 0;
        for (id, _) in due {
            if let Some(mut timer) = self.timers.remove(id) {
                if let Some(callback) = timer.callback.take() {
                    callback();
                    fired += 1;
                }
            }
        }
        fired
    }

    /// Current internal time in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

impl Default for TimerSet {
    fn default() -> Self {
        Self::new()
    }
}
