//! Deadlines: how much of the current idle period is left.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Time left in the current idle period.
pub trait Deadline {
    /// Remaining time. Queried before every unit of work.
    fn time_remaining(&self) -> Duration;
}

/// Wall-clock deadline: `budget` counted from when it was created.
#[derive(Debug, Clone, Copy)]
pub struct IdleDeadline {
    started: Instant,
    budget: Duration,
}

impl IdleDeadline {
    /// A deadline starting now.
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// The full budget of this idle period.
    pub const fn budget(&self) -> Duration {
        self.budget
    }
}

impl Deadline for IdleDeadline {
    fn time_remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }
}

/// A deadline that never runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

/// Deterministic deadline granting a fixed number of units of work.
///
/// Each query consumes one unit; once they are used up the deadline reports
/// no time left. Any yield threshold below `Duration::MAX` therefore admits
/// exactly `units` units of work.
#[derive(Debug, Clone)]
pub struct UnitDeadline {
    remaining: Cell<usize>,
}

impl UnitDeadline {
    /// A deadline admitting `units` units of work.
    pub const fn new(units: usize) -> Self {
        Self {
            remaining: Cell::new(units),
        }
    }

    /// Units not yet handed out.
    pub fn units_left(&self) -> usize {
        self.remaining.get()
    }
}

impl Deadline for UnitDeadline {
    fn time_remaining(&self) -> Duration {
        match self.remaining.get() {
            0 => Duration::ZERO,
            n => {
                self.remaining.set(n - 1);
                Duration::MAX
            }
        }
    }
}
