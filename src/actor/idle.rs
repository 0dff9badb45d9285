//! Idle Actor: dedicated thread delivering idle periods.
//!
//! The driving thread arms the actor, which waits `idle_delay` and then
//! hands back an [`IdleDeadline`] of `budget`. One arm yields at most one
//! deadline; arming again before it fires has no extra effect.

use crate::scheduler::{IdleDeadline, IdleScheduler};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::trace;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How often the actor thread checks for shutdown while disarmed.
const SHUTDOWN_POLL: Duration = Duration::from_millis(10);

/// Idle-callback actor backed by its own thread.
pub struct IdleActor {
    /// Handle to the actor thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Arms the actor.
    arm_tx: Sender<()>,
    /// Deadlines of fired idle periods.
    deadline_rx: Receiver<IdleDeadline>,
    /// Whether an idle period is outstanding.
    armed: bool,
}

impl IdleActor {
    /// Spawn the actor thread.
    ///
    /// # Arguments
    ///
    /// * `idle_delay` - Wait between arming and the idle period starting.
    /// * `budget` - Length of each idle period.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn(idle_delay: Duration, budget: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        // Capacity one on both sides: idle periods never queue up.
        let (arm_tx, arm_rx) = bounded(1);
        let (deadline_tx, deadline_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("weft-idle".to_string())
            .spawn(move || {
                Self::run_loop(&arm_rx, &deadline_tx, &shutdown_clone, idle_delay, budget);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            arm_tx,
            deadline_rx,
            armed: false,
        })
    }

    /// Signal the actor to shut down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Shut down and wait for the actor thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main actor loop.
    fn run_loop(
        arm_rx: &Receiver<()>,
        deadline_tx: &Sender<IdleDeadline>,
        shutdown: &AtomicBool,
        idle_delay: Duration,
        budget: Duration,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            match arm_rx.recv_timeout(SHUTDOWN_POLL) {
                Ok(()) => {
                    thread::sleep(idle_delay);
                    trace!("idle period of {budget:?} starting");
                    // The deadline starts counting when it is created.
                    if deadline_tx.send(IdleDeadline::new(budget)).is_err() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

impl IdleScheduler for IdleActor {
    type Deadline = IdleDeadline;

    fn request_idle_callback(&mut self) {
        if self.armed {
            return;
        }
        self.armed = self.arm_tx.send(()).is_ok();
    }

    fn next_idle(&mut self) -> Option<IdleDeadline> {
        if !std::mem::take(&mut self.armed) {
            return None;
        }
        self.deadline_rx.recv().ok()
    }
}

impl Drop for IdleActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
