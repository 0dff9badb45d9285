//! Engine: drives a reconciler from idle periods.
//!
//! The Engine is the entry point for applications using weft. It owns the
//! reconciler and an idle scheduler, receives render requests over a
//! command channel and publishes what happened to them on an event channel.
//!
//! Host nodes dropped by a commit or created by a pass that never commits are
//! handed back through [`HostAdapter::release_node`], so a long-running
//! [`Engine::run`] only holds the nodes of the committed tree.

use super::idle::IdleActor;
use super::messages::{RenderCommand, RenderEvent, RenderHandle};
use crate::element::Element;
use crate::error::RenderError;
use crate::host::HostAdapter;
use crate::reconciler::{CommitStats, Reconciler};
use crate::scheduler::{IdleScheduler, WorkStatus};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, trace};
use std::io;
use std::time::Duration;

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum time left in an idle period to start another unit of work.
    pub yield_threshold: Duration,
    /// Wait between arming the idle actor and the idle period starting.
    pub idle_delay: Duration,
    /// Length of one idle period.
    pub idle_budget: Duration,
    /// Capacity of the command channel.
    pub command_capacity: usize,
    /// Capacity of the event channel. Events are dropped when it is full.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            idle_delay: Duration::from_millis(1),
            idle_budget: Duration::from_millis(8),
            command_capacity: 64,
            event_capacity: 64,
        }
    }
}

/// The main weft engine.
pub struct Engine<H: HostAdapter, S: IdleScheduler = IdleActor> {
    /// Configuration.
    config: EngineConfig,
    /// Render-pass context.
    reconciler: Reconciler<H>,
    /// Source of idle periods.
    scheduler: S,
    /// Kept so handles can be created at any time.
    command_tx: Sender<RenderCommand<H::Node>>,
    command_rx: Receiver<RenderCommand<H::Node>>,
    event_tx: Sender<RenderEvent>,
    event_rx: Receiver<RenderEvent>,
    /// Whether the engine loop should keep going.
    running: bool,
}

impl<H: HostAdapter> Engine<H> {
    /// Create an engine with default configuration and an idle actor thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the idle actor thread cannot be spawned.
    pub fn new(host: H) -> io::Result<Self> {
        Self::with_config(host, EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the idle actor thread cannot be spawned.
    pub fn with_config(host: H, config: EngineConfig) -> io::Result<Self> {
        let scheduler = IdleActor::spawn(config.idle_delay, config.idle_budget)?;
        Ok(Self::with_scheduler(host, scheduler, config))
    }
}

impl<H: HostAdapter, S: IdleScheduler> Engine<H, S> {
    /// Create an engine driven by `scheduler`.
    pub fn with_scheduler(host: H, scheduler: S, config: EngineConfig) -> Self {
        let (command_tx, command_rx) = bounded(config.command_capacity);
        let (event_tx, event_rx) = bounded(config.event_capacity);
        Self {
            config,
            reconciler: Reconciler::new(host),
            scheduler,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
            running: true,
        }
    }

    /// Get the configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the reconciler.
    pub const fn reconciler(&self) -> &Reconciler<H> {
        &self.reconciler
    }

    /// Get the host adapter.
    pub const fn host(&self) -> &H {
        self.reconciler.host()
    }

    /// Get mutable access to the host adapter.
    pub fn host_mut(&mut self) -> &mut H {
        self.reconciler.host_mut()
    }

    /// Get the scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Create a handle for sending render requests, possibly from another
    /// thread.
    pub fn handle(&self) -> RenderHandle<H::Node> {
        RenderHandle::new(self.command_tx.clone())
    }

    /// Get the event receiver.
    pub const fn events(&self) -> &Receiver<RenderEvent> {
        &self.event_rx
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<RenderEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Check if the engine loop should keep running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the engine loop.
    pub const fn stop(&mut self) {
        self.running = false;
    }

    /// Start a render pass and arm the scheduler.
    pub fn request_render(&mut self, element: Element, container: H::Node) {
        if self.reconciler.has_pending_work() {
            self.publish(RenderEvent::Superseded {
                pass: self.reconciler.pass(),
            });
        }
        self.reconciler.request_render(element, container);
        self.scheduler.request_idle_callback();
    }

    /// Idle callback: apply queued commands, run the work loop for this idle
    /// period, publish the outcome and re-arm while work remains.
    ///
    /// # Errors
    ///
    /// The error that aborted the pass, also published as
    /// [`RenderEvent::Aborted`].
    pub fn on_idle(&mut self, deadline: &S::Deadline) -> Result<WorkStatus, RenderError> {
        self.drain_commands();

        let pass = self.reconciler.pass();
        let result = self
            .reconciler
            .work_loop(deadline, self.config.yield_threshold);
        match &result {
            Ok(WorkStatus::Committed(stats)) => self.publish(RenderEvent::Committed(*stats)),
            Ok(WorkStatus::Yielded { units }) => trace!("pass {pass}: {units} units this period"),
            Ok(WorkStatus::Idle) => {}
            Err(error) => self.publish(RenderEvent::Aborted {
                pass,
                error: error.clone(),
            }),
        }

        if self.reconciler.has_pending_work() {
            self.scheduler.request_idle_callback();
        }
        result
    }

    /// Process commands and idle periods until no pass is in flight.
    ///
    /// Returns the stats of the last commit, if any happened.
    ///
    /// # Errors
    ///
    /// The first error that aborted a pass.
    pub fn run_until_idle(&mut self) -> Result<Option<CommitStats>, RenderError> {
        let mut last = None;
        loop {
            self.drain_commands();
            if !self.reconciler.has_pending_work() {
                return Ok(last);
            }
            self.scheduler.request_idle_callback();
            let Some(deadline) = self.scheduler.next_idle() else {
                return Ok(last);
            };
            if let WorkStatus::Committed(stats) = self.on_idle(&deadline)? {
                last = Some(stats);
            }
        }
    }

    /// Run the engine loop until stopped by [`RenderCommand::Shutdown`].
    ///
    /// Blocks on the command channel while there is nothing to do. Aborted
    /// passes are reported as events and do not stop the loop.
    pub fn run(&mut self) {
        self.running = true;
        while self.running {
            if !self.reconciler.has_pending_work() {
                match self.command_rx.recv() {
                    Ok(command) => self.apply(command),
                    Err(_) => break,
                }
                continue;
            }
            self.scheduler.request_idle_callback();
            let Some(deadline) = self.scheduler.next_idle() else {
                break;
            };
            if let Err(err) = self.on_idle(&deadline) {
                debug!("engine continuing after aborted pass: {err}");
            }
        }
        debug!("engine loop stopped");
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: RenderCommand<H::Node>) {
        match command {
            RenderCommand::Render { element, container } => {
                self.request_render(element, container);
            }
            RenderCommand::Shutdown => {
                debug!("engine shutdown requested");
                self.running = false;
            }
        }
    }

    fn publish(&self, event: RenderEvent) {
        // Non-blocking: nobody has to listen.
        if let Err(TrySendError::Full(event)) = self.event_tx.try_send(event) {
            trace!("event channel full, dropping {event:?}");
        }
    }
}
