//! Commit phase: apply a finished pending tree to the host in one go.
//!
//! Order is fixed:
//!
//! 1. deletions, in the order they were collected
//! 2. a depth-first walk of the pending tree applying placements and
//!    property updates, skipping subtrees whose flags show no host work
//! 3. the pending tree becomes the current tree and the host nodes of
//!    deleted fibers are released
//!
//! Every host mutation is journaled. A host failure in the middle reverts
//! the journal in reverse order, so the host again matches the committed
//! tree, which stays current.

use super::props::{apply_prop_op, diff_props, PropOp};
use super::Reconciler;
use crate::error::{HostError, RenderError};
use crate::fiber::{Effect, EffectFlags, FiberId, FiberTree};
use crate::host::HostAdapter;
use log::{debug, error, warn};

/// Counters for one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Render pass number that was committed.
    pub pass: u64,
    /// Fibers whose host nodes were attached.
    pub placements: usize,
    /// Fibers whose host nodes received a property delta.
    pub updates: usize,
    /// Fibers of the previous tree removed.
    pub deletions: usize,
    /// Property operations issued by updates.
    pub property_ops: usize,
    /// Fibers visited by the commit walk.
    pub visited: usize,
    /// Fibers in the committed tree.
    pub fibers: usize,
}

/// A host mutation made by the commit.
enum Applied<N> {
    /// `child` was attached under `parent`.
    Attached { parent: N, child: N },
    /// `child` was detached from `parent`, where it sat right before
    /// `before` (last if `None`).
    Detached {
        parent: N,
        child: N,
        before: Option<N>,
    },
    /// A property operation was applied to `node`; `undo` reverts it.
    Prop { node: N, undo: PropOp },
}

type Journal<N> = Vec<Applied<N>>;

impl<H: HostAdapter> Reconciler<H> {
    /// Commit the pending tree.
    ///
    /// Does nothing if no pass is in flight. Callers must only commit once
    /// every unit of work is done.
    ///
    /// # Errors
    ///
    /// The first host failure. The mutations already applied are reverted,
    /// the pass is abandoned and the previously committed tree stays current.
    pub fn commit_root(&mut self) -> Result<CommitStats, RenderError> {
        let Some(pending) = self.pending.take() else {
            return Ok(CommitStats::default());
        };
        self.next_unit = None;

        let mut stats = CommitStats {
            pass: self.pass(),
            fibers: pending.len(),
            ..CommitStats::default()
        };

        let mut journal = Vec::new();
        if let Err(err) = self.apply_effects(&pending, &mut stats, &mut journal) {
            match revert(&mut self.host, journal) {
                Ok(()) => warn!("commit of render pass {} failed and was reverted: {err}", stats.pass),
                Err(revert_err) => error!(
                    "commit of render pass {} failed ({err}) and could not be reverted: {revert_err}",
                    stats.pass
                ),
            }
            self.restore_deletion_marks();
            release_placed_nodes(&mut self.host, &pending);
            return Err(err.into());
        }

        let deletions = std::mem::take(&mut self.deletions);
        if let Some(previous) = self.current.replace(pending) {
            for (id, _) in deletions {
                release_host_nodes(&mut self.host, &previous, id);
            }
        }
        debug!(
            "committed pass {}: {} placed, {} updated ({} prop ops), {} deleted, {}/{} fibers visited",
            stats.pass,
            stats.placements,
            stats.updates,
            stats.property_ops,
            stats.deletions,
            stats.visited,
            stats.fibers
        );
        Ok(stats)
    }

    fn apply_effects(
        &mut self,
        pending: &FiberTree<H::Node>,
        stats: &mut CommitStats,
        journal: &mut Journal<H::Node>,
    ) -> Result<(), HostError> {
        let host = &mut self.host;
        let current = self.current.as_ref();

        if let Some(current) = current {
            for (id, _) in &self.deletions {
                commit_deletion(host, current, *id, journal)?;
                stats.deletions += 1;
            }
        }

        let mut cursor = pending[FiberId::ROOT].child;
        while let Some(id) = cursor {
            stats.visited += 1;
            let fiber = &pending[id];
            match fiber.effect {
                Effect::Placement => {
                    commit_placement(host, pending, id, journal)?;
                    stats.placements += 1;
                }
                Effect::Update if fiber.flags.contains(EffectFlags::PROPS_CHANGED) => {
                    if let (Some(node), Some(alternate), Some(current)) =
                        (fiber.host_node.as_ref(), fiber.alternate, current)
                    {
                        let prev = &current[alternate].props;
                        let ops = diff_props(prev, &fiber.props);
                        for op in &ops {
                            apply_prop_op(host, node, op)?;
                            journal.push(Applied::Prop {
                                node: node.clone(),
                                undo: op.inverse(prev),
                            });
                        }
                        stats.updates += 1;
                        stats.property_ops += ops.len();
                    }
                }
                _ => {}
            }
            // Only descend into subtrees with host work.
            cursor = match fiber.child {
                Some(child) if fiber.subtree_has_host_work() => Some(child),
                _ => pending.next_outside(id),
            };
        }
        Ok(())
    }
}

/// Undo `journal`, newest first.
fn revert<H: HostAdapter>(host: &mut H, journal: Journal<H::Node>) -> Result<(), HostError> {
    for applied in journal.into_iter().rev() {
        match applied {
            Applied::Attached { parent, child } => host.remove_child(&parent, &child)?,
            Applied::Detached {
                parent,
                child,
                before: Some(before),
            } => host.insert_before(&parent, &child, &before)?,
            Applied::Detached {
                parent,
                child,
                before: None,
            } => host.append_child(&parent, &child)?,
            Applied::Prop { node, undo } => apply_prop_op(host, &node, &undo)?,
        }
    }
    Ok(())
}

/// Release the nodes created for placements of a tree that will not become
/// current.
pub(super) fn release_placed_nodes<H: HostAdapter>(host: &mut H, tree: &FiberTree<H::Node>) {
    for id in tree.preorder() {
        let fiber = &tree[id];
        if fiber.effect == Effect::Placement {
            if let Some(node) = fiber.host_node.as_ref() {
                host.release_node(node);
            }
        }
    }
}

/// Release the host nodes of the deleted fiber `id`.
fn release_host_nodes<H: HostAdapter>(host: &mut H, tree: &FiberTree<H::Node>, id: FiberId) {
    match tree[id].host_node.as_ref() {
        Some(node) => host.release_node(node),
        None => {
            for child in tree.children(id) {
                release_host_nodes(host, tree, child);
            }
        }
    }
}

/// Remove the host nodes of the deleted fiber `id` from its host parent.
fn commit_deletion<H: HostAdapter>(
    host: &mut H,
    tree: &FiberTree<H::Node>,
    id: FiberId,
    journal: &mut Journal<H::Node>,
) -> Result<(), HostError> {
    let Some(parent) = tree.host_parent(id) else {
        return Ok(());
    };
    remove_host_nodes(host, tree, id, parent, journal)
}

/// A fiber without a host node stands for its children.
fn remove_host_nodes<H: HostAdapter>(
    host: &mut H,
    tree: &FiberTree<H::Node>,
    id: FiberId,
    parent: &H::Node,
    journal: &mut Journal<H::Node>,
) -> Result<(), HostError> {
    if let Some(node) = tree[id].host_node.as_ref() {
        host.remove_child(parent, node)?;
        journal.push(Applied::Detached {
            parent: parent.clone(),
            child: node.clone(),
            before: host_successor(tree, id).cloned(),
        });
        return Ok(());
    }
    for child in tree.children(id) {
        remove_host_nodes(host, tree, child, parent, journal)?;
    }
    Ok(())
}

/// Host node following `id` under the same host parent in `tree`.
fn host_successor<N>(tree: &FiberTree<N>, id: FiberId) -> Option<&N> {
    let mut at = id;
    loop {
        let mut cursor = tree[at].sibling;
        while let Some(sibling) = cursor {
            if let Some(node) = first_host_node(tree, sibling) {
                return Some(node);
            }
            cursor = tree[sibling].sibling;
        }
        let parent = tree[at].parent?;
        if tree[parent].host_node.is_some() {
            return None;
        }
        at = parent;
    }
}

fn first_host_node<N>(tree: &FiberTree<N>, id: FiberId) -> Option<&N> {
    match tree[id].host_node.as_ref() {
        Some(node) => Some(node),
        None => tree.children(id).find_map(|child| first_host_node(tree, child)),
    }
}

/// Attach the host node of the placed fiber `id` at its position.
fn commit_placement<H: HostAdapter>(
    host: &mut H,
    tree: &FiberTree<H::Node>,
    id: FiberId,
    journal: &mut Journal<H::Node>,
) -> Result<(), HostError> {
    let Some(node) = tree[id].host_node.as_ref() else {
        return Ok(());
    };
    let Some(parent) = tree.host_parent(id) else {
        return Ok(());
    };
    match attached_successor(tree, id) {
        Some(before) => host.insert_before(parent, node, before)?,
        None => host.append_child(parent, node)?,
    }
    journal.push(Applied::Attached {
        parent: parent.clone(),
        child: node.clone(),
    });
    Ok(())
}

/// Host node of the first later sibling of `id` that is already attached.
///
/// Children of a placed parent are attached in order into a fresh node, so
/// appending is always right there.
fn attached_successor<N>(tree: &FiberTree<N>, id: FiberId) -> Option<&N> {
    let parent = tree[id].parent?;
    if tree[parent].effect == Effect::Placement {
        return None;
    }
    let mut cursor = tree[id].sibling;
    while let Some(sibling) = cursor {
        let fiber = &tree[sibling];
        if fiber.effect == Effect::Update {
            if let Some(node) = fiber.host_node.as_ref() {
                return Some(node);
            }
        }
        cursor = fiber.sibling;
    }
    None
}
