//! # Weft
//!
//! An incremental, interruptible UI reconciliation engine.
//!
//! Weft keeps a mutable host tree (a DOM-like document) in sync with
//! immutable element descriptions. Render work is split into one unit per
//! fiber and run during idle periods; the host is only touched in a single
//! commit once the whole tree has been diffed.
//!
//! ## Core Concepts
//!
//! - **Elements**: Immutable descriptions of what should be on screen
//! - **Fibers**: Per-position work records, two trees (current and pending)
//! - **Positional diffing**: Children matched by index and tag, no keys
//! - **Atomic commit**: Deletions, then placements and property updates
//! - **Cooperative scheduling**: Yield whenever the idle period runs short
//!
//! ## Example
//!
//! ```rust
//! use weft::{create_element, Document, Props, Reconciler};
//!
//! let mut doc = Document::new();
//! let container = doc.create_container("body");
//! let mut reconciler = Reconciler::new(doc);
//!
//! let app = create_element(
//!     "div",
//!     Props::new().with("id", "foo"),
//!     [
//!         create_element("a", Props::new(), ["bar".into()]).into(),
//!         create_element("b", Props::new(), []).into(),
//!     ],
//! );
//! reconciler.render_sync(app, container).unwrap();
//!
//! assert_eq!(
//!     reconciler.host().inner_markup(container),
//!     r#"<div id="foo"><a>bar</a><b></b></div>"#
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod element;
pub mod error;
pub mod fiber;
pub mod host;
pub mod reconciler;
pub mod scheduler;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, IdleActor, RenderCommand, RenderEvent, RenderHandle};
pub use element::{create_element, text, Child, Element, Event, EventHandler, NodeTag, PropValue, Props};
pub use error::{ElementError, HostError, RenderError};
pub use fiber::{Effect, EffectFlags, Fiber, FiberId, FiberTree};
pub use host::{Document, HostAdapter, HostStats, NodeId};
pub use reconciler::{diff_props, CommitStats, PropOp, Reconciler};
pub use scheduler::{
    Deadline, IdleDeadline, IdleScheduler, ImmediateIdle, SteppedIdle, Unbounded, UnitDeadline,
    WorkStatus,
};
