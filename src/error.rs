//! Error types for render passes.
//!
//! A render pass can fail in exactly two ways: an element handed to
//! [`Reconciler::request_render`](crate::Reconciler::request_render) turns out
//! to be malformed when its fiber is built, or the host adapter refuses a
//! mutation. Both abort the pass; the committed tree stays untouched.

use std::fmt;

/// A malformed element, detected while building its fiber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    /// A host element with an empty tag name.
    EmptyTag,
    /// A host tag containing characters outside `[A-Za-z0-9-]`, or not
    /// starting with a letter.
    InvalidTag(String),
    /// The container tag was used in an element description.
    ReservedTag,
    /// A text element was given child elements.
    TextWithChildren,
    /// An `on*` property whose value is not an event handler.
    HandlerExpected(String),
    /// An event handler stored under a plain (non `on*`) property name.
    UnexpectedHandler(String),
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTag => write!(f, "element has an empty tag"),
            Self::InvalidTag(tag) => write!(f, "invalid element tag `{tag}`"),
            Self::ReservedTag => write!(f, "the root tag cannot be used in an element"),
            Self::TextWithChildren => write!(f, "text elements cannot have children"),
            Self::HandlerExpected(key) => {
                write!(f, "property `{key}` is an event key but holds no handler")
            }
            Self::UnexpectedHandler(key) => {
                write!(f, "property `{key}` holds a handler but is not an event key")
            }
        }
    }
}

impl std::error::Error for ElementError {}

/// A host adapter refused an operation.
///
/// Node handles are rendered with their `Debug` representation so the error
/// type stays independent of the adapter's handle type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The handle does not name a live host node.
    UnknownNode(String),
    /// The node cannot hold children (e.g. a text node).
    InvalidParent(String),
    /// `child` is not currently a child of `parent`.
    NotAChild {
        /// Parent handle.
        parent: String,
        /// Child handle.
        child: String,
    },
    /// Attaching `child` under `parent` would create a cycle.
    CycleDetected {
        /// Parent handle.
        parent: String,
        /// Child handle.
        child: String,
    },
    /// The node kind does not support this property.
    UnsupportedProperty {
        /// Node handle.
        node: String,
        /// Property name.
        name: String,
    },
    /// Any other adapter-specific failure.
    Rejected(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "unknown host node {node}"),
            Self::InvalidParent(node) => write!(f, "host node {node} cannot have children"),
            Self::NotAChild { parent, child } => {
                write!(f, "host node {child} is not a child of {parent}")
            }
            Self::CycleDetected { parent, child } => {
                write!(f, "attaching {child} under {parent} would create a cycle")
            }
            Self::UnsupportedProperty { node, name } => {
                write!(f, "host node {node} does not support property `{name}`")
            }
            Self::Rejected(reason) => write!(f, "host rejected operation: {reason}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Why a render pass was aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An element in the requested tree is malformed.
    InvalidElement(ElementError),
    /// The host adapter failed.
    Host(HostError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidElement(err) => write!(f, "invalid element: {err}"),
            Self::Host(err) => write!(f, "host failure: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidElement(err) => Some(err),
            Self::Host(err) => Some(err),
        }
    }
}

impl From<ElementError> for RenderError {
    fn from(err: ElementError) -> Self {
        Self::InvalidElement(err)
    }
}

impl From<HostError> for RenderError {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}
