//! The host adapter contract.

use crate::element::{EventHandler, NodeTag, PropValue};
use crate::error::HostError;
use std::fmt;

/// The mutable host tree the reconciler keeps in sync.
///
/// The reconciler assumes exclusive mutation rights over the subtree below
/// the container between commits. Every method is called from the thread
/// driving the reconciler.
pub trait HostAdapter {
    /// Handle to a host node. Cloning a handle must not clone the node.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Allocate a detached node for `tag` (a text node for [`NodeTag::Text`]).
    fn create_node(&mut self, tag: &NodeTag) -> Result<Self::Node, HostError>;

    /// Set a plain property. Text nodes receive their text as `nodeValue`.
    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError>;

    /// Reset a plain property to its default.
    fn clear_property(&mut self, node: &Self::Node, name: &str) -> Result<(), HostError>;

    /// Register `handler` for `event` (already stripped of the `on` prefix).
    fn add_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    /// Unregister a handler previously added with [`add_listener`](Self::add_listener).
    fn remove_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Hand back a detached node the reconciler no longer references,
    /// together with its subtree.
    ///
    /// Called for nodes of deleted fibers after commit and for nodes created
    /// by a pass that never committed. The default keeps them alive.
    fn release_node(&mut self, node: &Self::Node) {
        let _ = node;
    }

    /// Insert `child` into `parent` right before `before`.
    ///
    /// Hosts that cannot position children may keep this default, which
    /// appends instead.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        before: &Self::Node,
    ) -> Result<(), HostError> {
        let _ = before;
        self.append_child(parent, child)
    }
}
