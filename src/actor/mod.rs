//! Actor Model: message-passing front end for the reconciler.
//!
//! This module wires the reconciler to crossbeam channels:
//! - **Idle Actor**: Hands out idle periods on request
//! - **Engine**: Applies render commands and runs the work loop in idle periods
//! - **Handles**: Send render requests from any thread
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   RenderCommand    ┌──────────────┐    arm     ┌──────────────┐
//! │ RenderHandle │ ─────────────────▶ │              │ ─────────▶ │  Idle Thread │
//! └──────────────┘                    │    Engine    │            │              │
//!                                     │              │ ◀───────── │              │
//!                                     └──────────────┘  deadline  └──────────────┘
//!                                            │
//!                                            │ RenderEvent
//!                                            ▼
//!                                      application
//! ```

mod engine;
mod idle;
mod messages;

pub use engine::{Engine, EngineConfig};
pub use idle::IdleActor;
pub use messages::{RenderCommand, RenderEvent, RenderHandle};
