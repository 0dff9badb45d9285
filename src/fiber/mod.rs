//! Fiber module: the work/record structure mirroring the element tree.
//!
//! - [`Fiber`]: one node with its links, host handle and effect
//! - [`FiberTree`]: the arena one tree lives in
//! - [`Effect`] / [`EffectFlags`]: commit classification

mod arena;
#[allow(clippy::module_inception)]
mod fiber;

pub use arena::{Children, FiberId, FiberTree, Preorder};
pub use fiber::{Effect, EffectFlags, Fiber};
