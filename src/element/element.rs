//! Element: immutable description of one desired node and its children.
//!
//! Elements are produced fresh for every render request and never mutated.
//! Props and children sit behind `Arc`s so fibers can keep the parts they need
//! without deep copies.

use crate::error::ElementError;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Property keys starting with this prefix are event handlers.
pub const EVENT_PREFIX: &str = "on";

/// Property carrying the text of a text node.
pub const NODE_VALUE: &str = "nodeValue";

/// The node type of an element or fiber.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// A host element such as `div`.
    Host(Arc<str>),
    /// A text node.
    Text,
    /// The container a tree is rendered into. Only the root fiber has it.
    Root,
}

impl NodeTag {
    /// Create a host tag.
    pub fn host(name: impl Into<Arc<str>>) -> Self {
        Self::Host(name.into())
    }

    /// Tag name as shown in logs and markup.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Host(name) => name,
            Self::Text => "#text",
            Self::Root => "#root",
        }
    }

    /// Whether this is the text sentinel.
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl From<&str> for NodeTag {
    fn from(name: &str) -> Self {
        Self::host(name)
    }
}

impl fmt::Debug for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload passed to event handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name without the `on` prefix, lower-cased (`click`).
    pub name: Arc<str>,
}

/// A shared event callback.
///
/// Handlers compare by identity: two handlers are equal only when they are
/// clones of the same `EventHandler`.
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(&Event) + Send + Sync>);

impl EventHandler {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

/// A property value.
///
/// Floats compare by bit pattern, so a `NaN` value equals itself and does not
/// count as a change on every pass.
#[derive(Debug, Clone)]
pub enum PropValue {
    /// String value.
    Str(Arc<str>),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Event handler; only valid under `on*` keys.
    Handler(EventHandler),
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Handler(a), Self::Handler(b)) => a == b,
            _ => false,
        }
    }
}

impl PropValue {
    /// String contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Handler, if this is one.
    pub const fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            Self::Handler(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<Arc<str>> for PropValue {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        Self::Handler(value)
    }
}

/// Map an event key to its host event name: `onClick` -> `click`.
///
/// Returns `None` for plain property keys.
pub fn event_name(key: &str) -> Option<String> {
    key.strip_prefix(EVENT_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Ordered property map of an element.
///
/// Keys iterate in sorted order, which keeps property diffs deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(BTreeMap<Arc<str>, PropValue>);

impl Props {
    /// Empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<Arc<str>>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style handler insert.
    #[must_use]
    pub fn with_handler(
        self,
        key: impl Into<Arc<str>>,
        f: impl Fn(&Event) + Send + Sync + 'static,
    ) -> Self {
        self.with(key, EventHandler::new(f))
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<Arc<str>>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a property.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, Arc<str>, PropValue> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a Arc<str>, &'a PropValue);
    type IntoIter = btree_map::Iter<'a, Arc<str>, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<Arc<str>>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Immutable description of a node and its ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: NodeTag,
    props: Arc<Props>,
    children: Arc<[Element]>,
}

impl Element {
    /// Create an element. No validation happens here; malformed elements are
    /// reported when the reconciler first builds a fiber for them.
    pub fn new(tag: NodeTag, props: Props, children: Vec<Self>) -> Self {
        Self {
            tag,
            props: Arc::new(props),
            children: children.into(),
        }
    }

    /// Node type.
    pub const fn tag(&self) -> &NodeTag {
        &self.tag
    }

    /// Properties.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Children in order.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub(crate) const fn shared_props(&self) -> &Arc<Props> {
        &self.props
    }

    pub(crate) const fn shared_children(&self) -> &Arc<[Self]> {
        &self.children
    }

    /// Text of a text element.
    pub fn text_value(&self) -> Option<&str> {
        if self.tag.is_text() {
            self.props.get(NODE_VALUE).and_then(PropValue::as_str)
        } else {
            None
        }
    }

    /// Shallow check of this element (not its children).
    ///
    /// # Errors
    ///
    /// Returns the first [`ElementError`] found.
    pub fn validate(&self) -> Result<(), ElementError> {
        match &self.tag {
            NodeTag::Root => return Err(ElementError::ReservedTag),
            NodeTag::Text if !self.children.is_empty() => {
                return Err(ElementError::TextWithChildren);
            }
            NodeTag::Text => {}
            NodeTag::Host(name) => validate_tag(name)?,
        }
        for (key, value) in self.props.iter() {
            let is_event = event_name(key).is_some();
            let is_handler = matches!(value, PropValue::Handler(_));
            if is_event && !is_handler {
                return Err(ElementError::HandlerExpected(key.to_string()));
            }
            if is_handler && !is_event {
                return Err(ElementError::UnexpectedHandler(key.to_string()));
            }
        }
        Ok(())
    }
}

fn validate_tag(name: &str) -> Result<(), ElementError> {
    let Some(first) = name.chars().next() else {
        return Err(ElementError::EmptyTag);
    };
    if !first.is_ascii_alphabetic()
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ElementError::InvalidTag(name.to_string()));
    }
    Ok(())
}
