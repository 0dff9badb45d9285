//! Element module: the immutable input of a render pass.
//!
//! - [`Element`]: tag, props and ordered children
//! - [`Props`] / [`PropValue`]: the property map, including event handlers
//! - [`builder`]: `create_element` and `text`

#[allow(clippy::module_inception)]
mod element;
pub mod builder;

pub use builder::{create_element, text, Child};
pub use element::{
    event_name, Element, Event, EventHandler, NodeTag, PropValue, Props, EVENT_PREFIX, NODE_VALUE,
};
