//! Fiber: the mutable per-position work record.
//!
//! # Layout
//!
//! Fibers link to each other through [`FiberId`] indices into the arena of
//! the tree they belong to:
//!
//! ```text
//!            parent
//!              ▲
//!              │
//!  fiber ── sibling ──▶ next fiber
//!    │
//!  child
//!    ▼
//!  first child ── sibling ──▶ ...
//! ```
//!
//! `child` and `sibling` own their targets (a fiber is reachable through
//! exactly one of them). `parent` is navigation only. `alternate` points into
//! the *other* tree, the last committed one, and is only read while diffing.

use super::arena::FiberId;
use crate::element::{Element, NodeTag, Props};
use bitflags::bitflags;
use std::sync::Arc;

/// What the commit phase must do for a fiber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Effect {
    /// Nothing (the root fiber).
    #[default]
    None,
    /// Attach a freshly created host node.
    Placement,
    /// Reuse the alternate's host node and apply the property delta.
    Update,
    /// Remove the host node. Only set on fibers of the committed tree.
    Deletion,
}

impl Effect {
    /// The flag bit matching this effect.
    pub const fn flag(self) -> EffectFlags {
        match self {
            Self::None => EffectFlags::empty(),
            Self::Placement => EffectFlags::PLACEMENT,
            Self::Update => EffectFlags::UPDATE,
            Self::Deletion => EffectFlags::DELETION,
        }
    }
}

bitflags! {
    /// Effect bits, kept per fiber and bubbled into ancestors.
    ///
    /// A fiber's `subtree_flags` is the union of `flags | subtree_flags` over
    /// its children, filled in when the fiber completes. The commit walk skips
    /// subtrees without [`EffectFlags::HOST_WORK`].
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EffectFlags: u8 {
        /// Fiber needs its host node attached.
        const PLACEMENT = 0b0000_0001;
        /// Fiber reuses its alternate's host node.
        const UPDATE = 0b0000_0010;
        /// Props differ from the alternate's props.
        const PROPS_CHANGED = 0b0000_0100;
        /// Fiber of the committed tree queued for removal.
        const DELETION = 0b0000_1000;
        /// Anything the commit walk has to touch the host for.
        const HOST_WORK = Self::PLACEMENT.bits() | Self::PROPS_CHANGED.bits();
    }
}

impl std::fmt::Debug for EffectFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// One unit of the fiber tree. `N` is the host adapter's node handle.
#[derive(Debug, Clone)]
pub struct Fiber<N> {
    /// Node type, copied from the element.
    pub tag: NodeTag,
    /// Properties, shared with the element.
    pub props: Arc<Props>,
    /// The element's children, reconciled during this fiber's unit of work.
    pub elements: Arc<[Element]>,
    /// Parent fiber (non-owning).
    pub parent: Option<FiberId>,
    /// First child.
    pub child: Option<FiberId>,
    /// Next sibling.
    pub sibling: Option<FiberId>,
    /// Host node, once created or inherited from the alternate.
    pub host_node: Option<N>,
    /// Same position in the committed tree.
    pub alternate: Option<FiberId>,
    /// Commit classification.
    pub effect: Effect,
    /// Effect bits of this fiber.
    pub flags: EffectFlags,
    /// Union of the effect bits of all descendants.
    pub subtree_flags: EffectFlags,
}

impl<N> Fiber<N> {
    /// The container fiber. It owns the container handle and renders
    /// `element` as its only child.
    pub fn root(element: Element, container: N, alternate: Option<FiberId>) -> Self {
        Self {
            tag: NodeTag::Root,
            props: Arc::default(),
            elements: Arc::from(vec![element]),
            parent: None,
            child: None,
            sibling: None,
            host_node: Some(container),
            alternate,
            effect: Effect::None,
            flags: EffectFlags::empty(),
            subtree_flags: EffectFlags::empty(),
        }
    }

    /// A fiber for a new element with no counterpart in the committed tree.
    pub fn placement(element: &Element, parent: FiberId) -> Self {
        Self {
            tag: element.tag().clone(),
            props: Arc::clone(element.shared_props()),
            elements: Arc::clone(element.shared_children()),
            parent: Some(parent),
            child: None,
            sibling: None,
            host_node: None,
            alternate: None,
            effect: Effect::Placement,
            flags: EffectFlags::PLACEMENT,
            subtree_flags: EffectFlags::empty(),
        }
    }

    /// A fiber reusing the host node of `alternate`, whose props were
    /// `old_props`.
    pub fn update(
        element: &Element,
        parent: FiberId,
        alternate: FiberId,
        host_node: Option<N>,
        old_props: &Arc<Props>,
    ) -> Self {
        let props = Arc::clone(element.shared_props());
        let mut flags = EffectFlags::UPDATE;
        if !Arc::ptr_eq(&props, old_props) && props != *old_props {
            flags |= EffectFlags::PROPS_CHANGED;
        }
        Self {
            tag: element.tag().clone(),
            props,
            elements: Arc::clone(element.shared_children()),
            parent: Some(parent),
            child: None,
            sibling: None,
            host_node,
            alternate: Some(alternate),
            effect: Effect::Update,
            flags,
            subtree_flags: EffectFlags::empty(),
        }
    }

    /// Whether the commit walk has anything to do in this fiber's subtree.
    pub fn subtree_has_host_work(&self) -> bool {
        self.subtree_flags.intersects(EffectFlags::HOST_WORK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::create_element;

    #[test]
    fn test_effect_flag() {
        assert_eq!(Effect::None.flag(), EffectFlags::empty());
        assert_eq!(Effect::Deletion.flag(), EffectFlags::DELETION);
        assert!(EffectFlags::HOST_WORK.contains(EffectFlags::PLACEMENT));
        assert!(!EffectFlags::HOST_WORK.contains(EffectFlags::UPDATE));
    }

    #[test]
    fn test_update_detects_prop_changes() {
        let old = create_element("p", Props::new().with("title", "foo"), []);
        let same = create_element("p", Props::new().with("title", "foo"), []);
        let changed = create_element("p", Props::new().with("title", "bar"), []);
        let parent = FiberId::ROOT;
        let alt = FiberId::ROOT;

        let fiber: Fiber<u32> = Fiber::update(&same, parent, alt, Some(7), old.shared_props());
        assert_eq!(fiber.flags, EffectFlags::UPDATE);
        assert_eq!(fiber.host_node, Some(7));

        let fiber: Fiber<u32> = Fiber::update(&changed, parent, alt, Some(7), old.shared_props());
        assert_eq!(fiber.flags, EffectFlags::UPDATE | EffectFlags::PROPS_CHANGED);
        assert_eq!(fiber.effect, Effect::Update);
    }
}
