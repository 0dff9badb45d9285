//! Message types for the engine's channels.

use crate::element::Element;
use crate::error::RenderError;
use crate::reconciler::CommitStats;
use crossbeam_channel::Sender;

/// Commands sent to the [`Engine`](super::Engine).
#[derive(Debug, Clone)]
pub enum RenderCommand<N> {
    /// Render `element` into `container`, superseding any pass in flight.
    Render {
        /// Root element of the new tree.
        element: Element,
        /// Host node to render into.
        container: N,
    },
    /// Stop the engine loop.
    Shutdown,
}

/// Events published by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// A render pass was committed.
    Committed(CommitStats),
    /// A render pass was abandoned after an error.
    Aborted {
        /// Pass number.
        pass: u64,
        /// What went wrong.
        error: RenderError,
    },
    /// An unfinished pass was replaced by a newer request.
    Superseded {
        /// Pass number of the discarded pass.
        pass: u64,
    },
}

/// Cloneable sender side of an engine's command channel.
#[derive(Debug)]
pub struct RenderHandle<N> {
    tx: Sender<RenderCommand<N>>,
}

impl<N> Clone for RenderHandle<N> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<N> RenderHandle<N> {
    pub(crate) const fn new(tx: Sender<RenderCommand<N>>) -> Self {
        Self { tx }
    }

    /// Ask the engine to render `element` into `container`.
    ///
    /// Returns `false` if the engine is gone.
    pub fn render(&self, element: Element, container: N) -> bool {
        self.tx
            .send(RenderCommand::Render { element, container })
            .is_ok()
    }

    /// Ask the engine loop to stop.
    pub fn shutdown(&self) -> bool {
        self.tx.send(RenderCommand::Shutdown).is_ok()
    }
}
