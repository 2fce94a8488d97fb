//! Trailing-edge debounce control
//!
//! Converts a rapidly-changing raw query into a delayed, stable value so the
//! coordinator only searches once typing has paused. Poll-driven: the host
//! loop asks "ready yet?" each tick instead of owning a timer.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer for the raw query value.
///
/// State machine: no pending value, or one pending `(value, armed_at)` pair.
/// A newer raw value discards the pending one entirely and re-arms the timer
/// from zero, so intermediate values are never observed downstream.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    settled: String,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    value: String,
    armed_at: Instant,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            settled: String::new(),
            pending: None,
        }
    }

    /// Feed the latest raw value. Re-submitting the already-settled value
    /// cancels any pending one; re-submitting the pending value keeps its
    /// timer running.
    pub fn submit(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value == self.settled {
            self.pending = None;
            return;
        }
        if let Some(pending) = &self.pending {
            if pending.value == value {
                return;
            }
        }
        self.pending = Some(Pending {
            value,
            armed_at: Instant::now(),
        });
    }

    /// Commit the pending value if its delay has elapsed. Returns true when
    /// the settled value changed this call. A zero delay still commits here,
    /// on the tick after `submit`, never synchronously inside it.
    pub fn poll(&mut self) -> bool {
        let ready = match &self.pending {
            Some(pending) => pending.armed_at.elapsed() >= self.delay,
            None => return false,
        };
        if !ready {
            return false;
        }
        if let Some(pending) = self.pending.take() {
            self.settled = pending.value;
        }
        true
    }

    /// Current settled (debounced) value.
    pub fn value(&self) -> &str {
        &self.settled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remaining time until the pending value commits, `Some(ZERO)` if it is
    /// already due, `None` if nothing is pending. Lets a host pick a wake-up
    /// deadline instead of busy-polling.
    pub fn time_until_ready(&self) -> Option<Duration> {
        let pending = self.pending.as_ref()?;
        Some(self.delay.saturating_sub(pending.armed_at.elapsed()))
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Drop any pending value and settle back to empty.
    pub fn reset(&mut self) {
        self.settled.clear();
        self.pending = None;
    }
}
