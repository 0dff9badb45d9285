//! Element builder: the pure constructor used to describe a tree.
//!
//! Plain strings passed as children become text elements, so
//! `create_element("h1", Props::new(), ["Welcome".into()])` describes an `h1`
//! holding a single text node.

use super::element::{Element, NodeTag, Props, NODE_VALUE};

/// A child description: either a full element or bare text.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// An element.
    Element(Element),
    /// Text, wrapped into a text element when built.
    Text(String),
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Child> for Element {
    fn from(child: Child) -> Self {
        match child {
            Child::Element(element) => element,
            Child::Text(value) => text(value),
        }
    }
}

/// Build an element from a tag, its properties and its children.
pub fn create_element(
    tag: impl Into<NodeTag>,
    props: Props,
    children: impl IntoIterator<Item = Child>,
) -> Element {
    Element::new(
        tag.into(),
        props,
        children.into_iter().map(Element::from).collect(),
    )
}

/// Build a text element.
pub fn text(value: impl Into<String>) -> Element {
    Element::new(
        NodeTag::Text,
        Props::new().with(NODE_VALUE, value.into()),
        Vec::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_become_text_elements() {
        let el = create_element(
            "div",
            Props::new().with("id", "foo"),
            [create_element("a", Props::new(), ["bar".into()]).into(), "tail".into()],
        );
        assert_eq!(el.tag(), &NodeTag::host("div"));
        assert_eq!(el.children().len(), 2);

        let anchor = &el.children()[0];
        assert_eq!(anchor.children()[0].text_value(), Some("bar"));
        assert_eq!(el.children()[1].tag(), &NodeTag::Text);
        assert_eq!(el.children()[1].text_value(), Some("tail"));
        assert!(el.children()[1].children().is_empty());
    }

    #[test]
    fn test_builder_is_pure() {
        let a = create_element("b", Props::new(), []);
        let b = create_element("b", Props::new(), []);
        assert_eq!(a, b);
    }
}
