//! Document: an in-memory host tree.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]. Removed nodes stay
//! allocated but detached, the way a browser keeps a node alive after
//! `removeChild`, until the reconciler releases them; released slots go on a
//! free list and are handed out again. Every mutation made through
//! [`HostAdapter`] is counted in [`HostStats`], which is what the reconciler
//! tests assert against.

use super::traits::HostAdapter;
use crate::element::{Event, EventHandler, NodeTag, PropValue, NODE_VALUE};
use crate::error::HostError;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

/// Handle to a node of a [`Document`].
///
/// Slots are reused once a node is released, so a handle kept past release
/// may later name a different node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Mutation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Nodes allocated through the adapter.
    pub nodes_created: usize,
    /// `set_property` calls.
    pub properties_set: usize,
    /// `clear_property` calls.
    pub properties_cleared: usize,
    /// Listeners registered.
    pub listeners_added: usize,
    /// Listeners unregistered.
    pub listeners_removed: usize,
    /// Children attached (appended or inserted).
    pub children_attached: usize,
    /// Children detached.
    pub children_removed: usize,
    /// Nodes released back to the free list.
    pub nodes_released: usize,
}

impl HostStats {
    /// Mutations that touch the attached tree or node state, excluding
    /// allocation.
    pub const fn mutations(&self) -> usize {
        self.properties_set
            + self.properties_cleared
            + self.listeners_added
            + self.listeners_removed
            + self.children_attached
            + self.children_removed
    }
}

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: Arc<str>,
        properties: BTreeMap<String, PropValue>,
    },
    Text {
        value: String,
    },
}

#[derive(Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<(String, EventHandler)>,
}

impl NodeRecord {
    const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }

    const fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

/// An in-memory document tree implementing [`HostAdapter`].
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Option<NodeRecord>>,
    free: Vec<NodeId>,
    stats: HostStats,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element to render into. Not counted in the stats.
    pub fn create_container(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.into(),
            properties: BTreeMap::new(),
        })
    }

    /// Mutation counters since creation or the last [`reset_stats`](Self::reset_stats).
    pub const fn stats(&self) -> HostStats {
        self.stats
    }

    /// Zero the mutation counters.
    pub fn reset_stats(&mut self) {
        self.stats = HostStats::default();
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Whether no node is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record of a live node.
    fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    /// Tag of a node; `#text` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|record| match &record.kind {
            NodeKind::Element { tag, .. } => &**tag,
            NodeKind::Text { .. } => "#text",
        })
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Text { value } => Some(value),
            NodeKind::Element { .. } => None,
        }
    }

    /// A plain property of an element node.
    pub fn property(&self, id: NodeId, name: &str) -> Option<&PropValue> {
        match &self.get(id)?.kind {
            NodeKind::Element { properties, .. } => properties.get(name),
            NodeKind::Text { .. } => None,
        }
    }

    /// Children of a node, in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .map_or(&[][..], |record| record.children.as_slice())
    }

    /// Parent of a node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Number of listeners registered on `id` for `event`.
    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.get(id).map_or(0, |record| {
            record
                .listeners
                .iter()
                .filter(|(name, _)| name == event)
                .count()
        })
    }

    /// Fire `event` at `target`, bubbling through its ancestors.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, target: NodeId, event: &str) -> usize {
        let payload = Event { name: event.into() };
        let mut invoked = 0;
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            let Some(record) = self.get(id) else {
                break;
            };
            for (_, handler) in record.listeners.iter().filter(|(name, _)| name == event) {
                handler.call(&payload);
                invoked += 1;
            }
            cursor = record.parent;
        }
        invoked
    }

    /// Serialize the subtree at `id` as markup. Listeners are not shown.
    ///
    /// ```text
    /// <div id="foo"><h1>Welcome</h1></div>
    /// ```
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Markup of the children of `id`, without `id` itself.
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_markup(*child, &mut out);
        }
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(record) = self.get(id) else {
            return;
        };
        match &record.kind {
            NodeKind::Text { value } => escape_into(value, out),
            NodeKind::Element { tag, properties } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in properties {
                    let _ = write!(out, " {name}=\"");
                    escape_into(&value.to_string(), out);
                    out.push('"');
                }
                out.push('>');
                for child in &record.children {
                    self.write_markup(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0 as usize] = Some(NodeRecord::new(kind));
            return id;
        }
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Some(NodeRecord::new(kind)));
        id
    }

    fn record(&self, id: NodeId) -> Result<&NodeRecord, HostError> {
        self.get(id)
            .ok_or_else(|| HostError::UnknownNode(format!("{id:?}")))
    }

    fn record_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord, HostError> {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| HostError::UnknownNode(format!("{id:?}")))
    }

    fn is_descendant(&self, ancestor: NodeId, maybe_descendant: NodeId) -> bool {
        let mut stack: Vec<NodeId> = self.children(ancestor).to_vec();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            stack.extend_from_slice(self.children(current));
        }
        false
    }

    /// Shared checks for attaching `child` under `parent`.
    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let parent_record = self.record(parent)?;
        let child_record = self.record(child)?;
        if parent == child || self.is_descendant(child, parent) {
            return Err(HostError::CycleDetected {
                parent: format!("{parent:?}"),
                child: format!("{child:?}"),
            });
        }
        if !parent_record.allows_children() {
            return Err(HostError::InvalidParent(format!("{parent:?}")));
        }
        if let Some(existing) = child_record.parent {
            return Err(HostError::Rejected(format!(
                "{child:?} is already attached to {existing:?}"
            )));
        }
        Ok(())
    }
}

impl HostAdapter for Document {
    type Node = NodeId;

    fn create_node(&mut self, tag: &NodeTag) -> Result<NodeId, HostError> {
        let kind = match tag {
            NodeTag::Host(name) => NodeKind::Element {
                tag: Arc::clone(name),
                properties: BTreeMap::new(),
            },
            NodeTag::Text => NodeKind::Text {
                value: String::new(),
            },
            NodeTag::Root => {
                return Err(HostError::Rejected("cannot create a root node".to_string()));
            }
        };
        self.stats.nodes_created += 1;
        Ok(self.alloc(kind))
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        match &mut self.record_mut(*node)?.kind {
            NodeKind::Element { properties, .. } => {
                properties.insert(name.to_string(), value.clone());
            }
            NodeKind::Text { value: text } if name == NODE_VALUE => {
                *text = value.to_string();
            }
            NodeKind::Text { .. } => {
                return Err(HostError::UnsupportedProperty {
                    node: format!("{node:?}"),
                    name: name.to_string(),
                });
            }
        }
        self.stats.properties_set += 1;
        Ok(())
    }

    fn clear_property(&mut self, node: &NodeId, name: &str) -> Result<(), HostError> {
        match &mut self.record_mut(*node)?.kind {
            NodeKind::Element { properties, .. } => {
                properties.remove(name);
            }
            NodeKind::Text { value } if name == NODE_VALUE => value.clear(),
            NodeKind::Text { .. } => {
                return Err(HostError::UnsupportedProperty {
                    node: format!("{node:?}"),
                    name: name.to_string(),
                });
            }
        }
        self.stats.properties_cleared += 1;
        Ok(())
    }

    fn add_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.record_mut(*node)?
            .listeners
            .push((event.to_string(), handler.clone()));
        self.stats.listeners_added += 1;
        Ok(())
    }

    fn remove_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let listeners = &mut self.record_mut(*node)?.listeners;
        if let Some(pos) = listeners
            .iter()
            .position(|(name, existing)| name == event && existing == handler)
        {
            listeners.remove(pos);
            self.stats.listeners_removed += 1;
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        self.check_attach(*parent, *child)?;
        self.record_mut(*parent)?.children.push(*child);
        self.record_mut(*child)?.parent = Some(*parent);
        self.stats.children_attached += 1;
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        let siblings = &mut self.record_mut(*parent)?.children;
        let Some(pos) = siblings.iter().position(|id| id == child) else {
            return Err(HostError::NotAChild {
                parent: format!("{parent:?}"),
                child: format!("{child:?}"),
            });
        };
        siblings.remove(pos);
        self.record_mut(*child)?.parent = None;
        self.stats.children_removed += 1;
        Ok(())
    }

    /// Frees `node` and its whole subtree. Attached nodes are kept.
    fn release_node(&mut self, node: &NodeId) {
        if !self.get(*node).is_some_and(|record| record.parent.is_none()) {
            return;
        }
        let mut stack = vec![*node];
        while let Some(id) = stack.pop() {
            if let Some(record) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) {
                stack.extend(record.children);
                self.free.push(id);
                self.stats.nodes_released += 1;
            }
        }
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        before: &NodeId,
    ) -> Result<(), HostError> {
        self.check_attach(*parent, *child)?;
        let siblings = &mut self.record_mut(*parent)?.children;
        let Some(pos) = siblings.iter().position(|id| id == before) else {
            return Err(HostError::NotAChild {
                parent: format!("{parent:?}"),
                child: format!("{before:?}"),
            });
        };
        siblings.insert(pos, *child);
        self.record_mut(*child)?.parent = Some(*parent);
        self.stats.children_attached += 1;
        Ok(())
    }
}

fn escape_into(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
