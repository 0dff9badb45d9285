//! FiberTree: index arena holding one fiber tree.
//!
//! Fibers are pushed in creation order and never removed individually; the
//! whole tree is dropped at once when it is superseded. The root is always
//! at index 0.

use super::fiber::Fiber;
use std::ops::{Index, IndexMut};

/// Index of a fiber inside its [`FiberTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberId(pub u32);

impl FiberId {
    /// The root fiber of every tree.
    pub const ROOT: Self = Self(0);

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One complete (or in-progress) fiber tree.
#[derive(Debug, Clone)]
pub struct FiberTree<N> {
    fibers: Vec<Fiber<N>>,
}

impl<N> FiberTree<N> {
    /// Create a tree holding only `root`.
    pub fn new(root: Fiber<N>) -> Self {
        Self { fibers: vec![root] }
    }

    /// The root fiber id.
    #[inline]
    pub const fn root(&self) -> FiberId {
        FiberId::ROOT
    }

    /// Number of fibers.
    #[inline]
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    /// Always false; a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Add a fiber and return its id. Linking is up to the caller.
    pub fn push(&mut self, fiber: Fiber<N>) -> FiberId {
        let id = u32::try_from(self.fibers.len()).map_or(FiberId(u32::MAX), FiberId);
        self.fibers.push(fiber);
        id
    }

    /// Get a fiber, if `id` belongs to this tree.
    #[inline]
    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.fibers.get(id.index())
    }

    /// The container handle held by the root.
    pub fn container(&self) -> Option<&N> {
        self[FiberId::ROOT].host_node.as_ref()
    }

    /// Iterate the children of `id` in sibling order.
    pub fn children(&self, id: FiberId) -> Children<'_, N> {
        Children {
            tree: self,
            next: self[id].child,
        }
    }

    /// Host node of the nearest proper ancestor of `id` that has one.
    pub fn host_parent(&self, id: FiberId) -> Option<&N> {
        let mut cursor = self[id].parent;
        while let Some(ancestor) = cursor {
            let fiber = &self[ancestor];
            if let Some(node) = fiber.host_node.as_ref() {
                return Some(node);
            }
            cursor = fiber.parent;
        }
        None
    }

    /// Next fiber in depth-first order that does not descend into `id`:
    /// the nearest sibling of `id` or of one of its ancestors.
    pub fn next_outside(&self, id: FiberId) -> Option<FiberId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = &self[current];
            if fiber.sibling.is_some() {
                return fiber.sibling;
            }
            cursor = fiber.parent;
        }
        None
    }

    /// Iterate every fiber id in depth-first, child-first order.
    pub fn preorder(&self) -> Preorder<'_, N> {
        Preorder {
            tree: self,
            next: Some(FiberId::ROOT),
        }
    }
}

impl<N> Index<FiberId> for FiberTree<N> {
    type Output = Fiber<N>;

    #[inline]
    fn index(&self, id: FiberId) -> &Self::Output {
        &self.fibers[id.index()]
    }
}

impl<N> IndexMut<FiberId> for FiberTree<N> {
    #[inline]
    fn index_mut(&mut self, id: FiberId) -> &mut Self::Output {
        &mut self.fibers[id.index()]
    }
}

/// Iterator over a fiber's children.
pub struct Children<'a, N> {
    tree: &'a FiberTree<N>,
    next: Option<FiberId>,
}

impl<N> Iterator for Children<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree[current].sibling;
        Some(current)
    }
}

/// Depth-first iterator over a whole tree.
pub struct Preorder<'a, N> {
    tree: &'a FiberTree<N>,
    next: Option<FiberId>,
}

impl<N> Iterator for Preorder<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree[current]
            .child
            .or_else(|| self.tree.next_outside(current));
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{create_element, Props};

    /// root > div > (h1, p)
    fn sample() -> FiberTree<u32> {
        let div = create_element("div", Props::new(), []);
        let h1 = create_element("h1", Props::new(), []);
        let p = create_element("p", Props::new(), []);

        let mut tree = FiberTree::new(Fiber::root(div.clone(), 1, None));
        let div_id = tree.push(Fiber::placement(&div, FiberId::ROOT));
        tree[FiberId::ROOT].child = Some(div_id);
        let h1_id = tree.push(Fiber::placement(&h1, div_id));
        let p_id = tree.push(Fiber::placement(&p, div_id));
        tree[div_id].child = Some(h1_id);
        tree[h1_id].sibling = Some(p_id);
        tree
    }

    #[test]
    fn test_children_in_sibling_order() {
        let tree = sample();
        let kids: Vec<FiberId> = tree.children(FiberId(1)).collect();
        assert_eq!(kids, [FiberId(2), FiberId(3)]);
    }

    #[test]
    fn test_preorder() {
        let tree = sample();
        let order: Vec<u32> = tree.preorder().map(|id| id.0).collect();
        assert_eq!(order, [0, 1, 2, 3]);
    }

    #[test]
    fn test_host_parent_skips_hostless() {
        let tree = sample();
        // Only the root carries a host node here.
        assert_eq!(tree.host_parent(FiberId(2)), Some(&1));
        assert_eq!(tree.host_parent(FiberId::ROOT), None);
        assert_eq!(tree.container(), Some(&1));
    }

    #[test]
    fn test_next_outside() {
        let tree = sample();
        assert_eq!(tree.next_outside(FiberId(2)), Some(FiberId(3)));
        assert_eq!(tree.next_outside(FiberId(3)), None);
        assert_eq!(tree.next_outside(FiberId(1)), None);
    }
}
