//! Unit of work: materialize one fiber's host node, reconcile its children,
//! pick the next fiber.

use super::props::{apply_prop_ops, diff_props};
use super::Reconciler;
use crate::element::{NodeTag, Props};
use crate::error::{HostError, RenderError};
use crate::fiber::{EffectFlags, FiberId, FiberTree};
use crate::host::HostAdapter;
use log::trace;
use std::sync::Arc;

impl<H: HostAdapter> Reconciler<H> {
    /// Process `id` and return the next fiber to visit, or `None` once the
    /// whole pending tree has been visited.
    ///
    /// # Errors
    ///
    /// A malformed child element or a host failure. The caller is expected to
    /// abort the pass.
    pub fn perform_unit_of_work(&mut self, id: FiberId) -> Result<Option<FiberId>, RenderError> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(None);
        };
        trace!("unit of work {id:?} <{}>", pending[id].tag);

        // The root already owns the container.
        if pending[id].host_node.is_none() {
            let node = create_host_node(&mut self.host, &pending[id].tag, &pending[id].props)?;
            pending[id].host_node = Some(node);
        }

        let elements = Arc::clone(&pending[id].elements);
        self.reconcile_children(id, &elements)?;
        Ok(self.next_unit_after(id))
    }

    /// Depth-first successor of `id`: its first child, else the nearest
    /// sibling found walking up. Every fiber left on the way up is complete.
    fn next_unit_after(&mut self, id: FiberId) -> Option<FiberId> {
        let pending = self.pending.as_mut()?;
        if let Some(child) = pending[id].child {
            return Some(child);
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            complete_work(pending, current);
            if let Some(sibling) = pending[current].sibling {
                return Some(sibling);
            }
            cursor = pending[current].parent;
        }
        None
    }
}

/// Bubble the children's effect bits into `id`.
fn complete_work<N>(tree: &mut FiberTree<N>, id: FiberId) {
    let subtree = tree
        .children(id)
        .fold(EffectFlags::empty(), |acc, child| {
            acc | tree[child].flags | tree[child].subtree_flags
        });
    tree[id].subtree_flags = subtree;
}

/// Allocate a host node for `tag` and give it its initial properties.
pub(crate) fn create_host_node<H: HostAdapter>(
    host: &mut H,
    tag: &NodeTag,
    props: &Props,
) -> Result<H::Node, HostError> {
    let node = host.create_node(tag)?;
    if let Err(err) = apply_prop_ops(host, &node, &diff_props(&Props::new(), props)) {
        host.release_node(&node);
        return Err(err);
    }
    Ok(node)
}
