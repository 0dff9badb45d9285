//! Reconciler: the render-pass context and the diff/commit machinery.
//!
//! A [`Reconciler`] owns the host adapter and the state of at most one render
//! pass in flight:
//!
//! ```text
//! request_render ──▶ pending tree ──(units of work)──▶ commit ──▶ current tree
//!                        ▲                                            │
//!                        └────────────── alternates ──────────────────┘
//! ```
//!
//! - `children`: positional diff of a fiber's old children against its
//!   new elements
//! - [`props`]: four-pass property diff
//! - [`commit`]: applies the queued effects to the host
//!
//! Units of work are driven by [`Reconciler::work_loop`], defined next to the
//! deadline types in [`crate::scheduler`].

mod children;
pub mod commit;
pub mod props;
mod work;

pub use commit::CommitStats;
pub use props::{diff_props, PropOp};

use crate::element::Element;
use crate::error::RenderError;
use crate::fiber::{Effect, EffectFlags, Fiber, FiberId, FiberTree};
use crate::host::HostAdapter;
use log::{debug, warn};

/// The render-pass context.
pub struct Reconciler<H: HostAdapter> {
    /// Host adapter all mutations go through.
    host: H,
    /// Last committed tree.
    pub(crate) current: Option<FiberTree<H::Node>>,
    /// Tree under construction.
    pub(crate) pending: Option<FiberTree<H::Node>>,
    /// Fibers of `current` marked for deletion, with the effect they had
    /// before being marked.
    pub(crate) deletions: Vec<(FiberId, Effect)>,
    /// Next fiber of `pending` to process.
    pub(crate) next_unit: Option<FiberId>,
    /// Number of render requests so far.
    pass: u64,
}

impl<H: HostAdapter> Reconciler<H> {
    /// Create a reconciler with nothing rendered yet.
    pub const fn new(host: H) -> Self {
        Self {
            host,
            current: None,
            pending: None,
            deletions: Vec::new(),
            next_unit: None,
            pass: 0,
        }
    }

    /// The host adapter.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host adapter.
    ///
    /// Mutating nodes owned by the reconciler between commits breaks its
    /// exclusivity assumption.
    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the reconciler, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// The last committed fiber tree.
    pub const fn current(&self) -> Option<&FiberTree<H::Node>> {
        self.current.as_ref()
    }

    /// The fiber tree under construction.
    pub const fn pending(&self) -> Option<&FiberTree<H::Node>> {
        self.pending.as_ref()
    }

    /// Fibers of the committed tree queued for deletion, in collection order.
    pub fn deletions(&self) -> impl Iterator<Item = FiberId> + '_ {
        self.deletions.iter().map(|(id, _)| *id)
    }

    /// Next fiber to process, if a pass is in flight.
    pub const fn next_unit(&self) -> Option<FiberId> {
        self.next_unit
    }

    /// Whether a render pass is in flight.
    pub const fn has_pending_work(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of render requests received so far.
    pub const fn pass(&self) -> u64 {
        self.pass
    }

    /// Start a render pass of `element` into `container`.
    ///
    /// Any unfinished pass is discarded: nothing of it has reached the host
    /// yet, since the host is only mutated during commit.
    pub fn request_render(&mut self, element: Element, container: H::Node) {
        if self.pending.is_some() {
            debug!("render pass {} superseded before commit", self.pass);
            self.abandon_pending();
        }
        self.pass += 1;

        // Diff against the committed tree only if it lives in the same container.
        let same_container = self
            .current
            .as_ref()
            .is_some_and(|tree| tree.container() == Some(&container));
        debug!(
            "render pass {} requested into {container:?} (diffing: {same_container})",
            self.pass
        );

        let alternate = same_container.then_some(FiberId::ROOT);
        self.pending = Some(FiberTree::new(Fiber::root(element, container, alternate)));
        self.deletions.clear();
        self.next_unit = Some(FiberId::ROOT);
        if !same_container {
            self.delete_current_children();
        }
    }

    /// Queue the top-level fibers of the committed tree for deletion, so the
    /// commit empties the container it was rendered into.
    fn delete_current_children(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let children: Vec<FiberId> = current.children(FiberId::ROOT).collect();
        for id in children {
            let fiber = &mut current[id];
            self.deletions.push((id, fiber.effect));
            fiber.effect = Effect::Deletion;
            fiber.flags.insert(EffectFlags::DELETION);
        }
    }

    /// Abort the pass in flight after `err`.
    pub(crate) fn abort(&mut self, err: &RenderError) {
        warn!("render pass {} aborted: {err}", self.pass);
        self.abandon_pending();
    }

    /// Drop the pending tree and undo the deletion marks it placed on the
    /// committed tree.
    pub(crate) fn abandon_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            commit::release_placed_nodes(&mut self.host, &pending);
        }
        self.next_unit = None;
        self.restore_deletion_marks();
    }

    pub(crate) fn restore_deletion_marks(&mut self) {
        let deletions = std::mem::take(&mut self.deletions);
        if let Some(current) = self.current.as_mut() {
            for (id, previous) in deletions {
                let fiber = &mut current[id];
                fiber.effect = previous;
                fiber.flags.remove(EffectFlags::DELETION);
            }
        }
    }
}

impl<H: HostAdapter + Default> Default for Reconciler<H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}
