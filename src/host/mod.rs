//! Host module: the external tree the reconciler mutates.
//!
//! - [`HostAdapter`]: the contract the reconciler calls through
//! - [`Document`]: an in-memory document implementing it

mod document;
mod traits;

pub use document::{Document, HostStats, NodeId};
pub use traits::HostAdapter;
