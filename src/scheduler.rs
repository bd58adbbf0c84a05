//! Fixed-interval tick scheduling against an injectable clock.
//!
//! The practice loop asks the scheduler how many ticks are due, runs that
//! many controller ticks to completion, then blocks on input until the next
//! deadline. Deadlines advance by exactly one interval per tick, so slow frames
//! delay ticks but never lose or duplicate them.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Upper bound on ticks replayed by one `poll` after a stall.
pub const MAX_CATCH_UP_TICKS: u32 = 20;

/// Source of monotonic time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time from [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A ticking task that can be started and stopped.
pub struct TickScheduler<C: Clock = SystemClock> {
    clock: C,
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl<C: Clock> TickScheduler<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            next_deadline: None,
        }
    }

    /// Starts ticking; the first tick is due one interval from now.
    pub fn start(&mut self) {
        self.next_deadline = Some(self.clock.now() + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_deadline.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks due since the last poll.
    ///
    /// Returns 0 when stopped. After a stall longer than
    /// [`MAX_CATCH_UP_TICKS`] intervals the excess ticks are dropped and the
    /// schedule restarts from now.
    pub fn poll(&mut self) -> u32 {
        let Some(mut deadline) = self.next_deadline else {
            return 0;
        };
        let now = self.clock.now();

        let mut due = 0;
        while deadline <= now {
            if due == MAX_CATCH_UP_TICKS {
                let behind = now.duration_since(deadline);
                tracing::warn!(
                    "Tick loop stalled, dropping {:?} of ticks",
                    behind + self.interval
                );
                deadline = now + self.interval;
                break;
            }
            due += 1;
            deadline += self.interval;
        }

        self.next_deadline = Some(deadline);
        due
    }

    /// How long the caller may block before the next tick is due.
    ///
    /// A full interval when stopped.
    pub fn time_until_next(&self) -> Duration {
        match self.next_deadline {
            Some(deadline) => deadline.saturating_duration_since(self.clock.now()),
            None => self.interval,
        }
    }
}
