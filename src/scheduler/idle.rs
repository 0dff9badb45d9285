//! Idle schedulers: sources of idle periods for the work loop.

use super::deadline::{Deadline, IdleDeadline, UnitDeadline};
use std::time::Duration;

/// Something that can run the work loop "when the host is idle".
///
/// The driver arms the scheduler with [`request_idle_callback`], then waits
/// for the next idle period with [`next_idle`].
///
/// [`request_idle_callback`]: IdleScheduler::request_idle_callback
/// [`next_idle`]: IdleScheduler::next_idle
pub trait IdleScheduler {
    /// Deadline handed out for each idle period.
    type Deadline: Deadline;

    /// Ask for one more idle period. Arming twice before it fires is the
    /// same as arming once.
    fn request_idle_callback(&mut self);

    /// Block until the armed idle period starts and return its deadline.
    /// `None` if nothing is armed or the scheduler has shut down.
    fn next_idle(&mut self) -> Option<Self::Deadline>;
}

/// Fires immediately with a fixed wall-clock budget.
#[derive(Debug, Clone)]
pub struct ImmediateIdle {
    budget: Duration,
    armed: bool,
}

impl ImmediateIdle {
    /// Scheduler handing out `budget` per idle period.
    pub const fn new(budget: Duration) -> Self {
        Self {
            budget,
            armed: false,
        }
    }
}

impl IdleScheduler for ImmediateIdle {
    type Deadline = IdleDeadline;

    fn request_idle_callback(&mut self) {
        self.armed = true;
    }

    fn next_idle(&mut self) -> Option<IdleDeadline> {
        std::mem::take(&mut self.armed).then(|| IdleDeadline::new(self.budget))
    }
}

/// Fires immediately, admitting a fixed number of units of work per period.
///
/// Makes interruption points reproducible, independent of machine speed.
#[derive(Debug, Clone)]
pub struct SteppedIdle {
    units: usize,
    armed: bool,
    fired: usize,
}

impl SteppedIdle {
    /// Scheduler admitting `units` units of work per idle period.
    pub const fn new(units: usize) -> Self {
        Self {
            units,
            armed: false,
            fired: 0,
        }
    }

    /// Idle periods handed out so far.
    pub const fn fired(&self) -> usize {
        self.fired
    }
}

impl IdleScheduler for SteppedIdle {
    type Deadline = UnitDeadline;

    fn request_idle_callback(&mut self) {
        self.armed = true;
    }

    fn next_idle(&mut self) -> Option<UnitDeadline> {
        if !std::mem::take(&mut self.armed) {
            return None;
        }
        self.fired += 1;
        Some(UnitDeadline::new(self.units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_armed() {
        let mut idle = SteppedIdle::new(3);
        assert!(idle.next_idle().is_none());

        idle.request_idle_callback();
        idle.request_idle_callback();
        assert_eq!(idle.next_idle().map(|d| d.units_left()), Some(3));
        assert!(idle.next_idle().is_none());
        assert_eq!(idle.fired(), 1);
    }

    #[test]
    fn test_immediate_budget() {
        let mut idle = ImmediateIdle::new(Duration::from_secs(5));
        idle.request_idle_callback();
        let deadline = idle.next_idle().unwrap();
        assert!(deadline.time_remaining() > Duration::from_secs(4));
    }
}
