//! Scheduler: when units of work run.
//!
//! Render work is split into units (one fiber each) and run during idle
//! periods. Before every unit the loop asks its [`Deadline`] how much of the
//! period is left and yields once that drops under the yield threshold:
//!
//! ```text
//! idle period ──▶ unit ──▶ unit ──▶ unit ──▶ (time short) yield
//! idle period ──▶ unit ──▶ unit ──▶ (no units left) commit
//! ```

mod deadline;
mod idle;
mod work_loop;

pub use deadline::{Deadline, IdleDeadline, Unbounded, UnitDeadline};
pub use idle::{IdleScheduler, ImmediateIdle, SteppedIdle};
pub use work_loop::WorkStatus;
