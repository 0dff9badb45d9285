//! Property diffing.
//!
//! [`diff_props`] turns two property maps into an ordered list of host
//! operations, grouped in four passes:
//!
//! 1. remove listeners that disappeared or changed
//! 2. clear plain properties that disappeared
//! 3. set plain properties that are new or changed
//! 4. add listeners that are new or changed
//!
//! Diffing against an empty map yields the initial configuration of a freshly
//! created node.

use crate::element::{event_name, EventHandler, PropValue, Props};
use crate::error::HostError;
use crate::host::HostAdapter;
use std::sync::Arc;

/// One host mutation produced by [`diff_props`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropOp {
    /// Unregister `handler` for `event`.
    RemoveListener {
        /// Host event name, e.g. `click`.
        event: String,
        /// The handler registered by the previous props.
        handler: EventHandler,
    },
    /// Reset a plain property.
    Clear {
        /// Property name.
        name: Arc<str>,
    },
    /// Assign a plain property.
    Set {
        /// Property name.
        name: Arc<str>,
        /// New value.
        value: PropValue,
    },
    /// Register `handler` for `event`.
    AddListener {
        /// Host event name.
        event: String,
        /// The new handler.
        handler: EventHandler,
    },
}

/// Compute the operations turning a node configured with `prev` into one
/// configured with `next`. Keys present in both with equal values produce
/// nothing.
pub fn diff_props(prev: &Props, next: &Props) -> Vec<PropOp> {
    let mut ops = Vec::new();

    for (key, value) in prev {
        if let (Some(event), Some(handler)) = (event_name(key), value.as_handler()) {
            if next.get(key) != Some(value) {
                ops.push(PropOp::RemoveListener {
                    event,
                    handler: handler.clone(),
                });
            }
        }
    }

    for (key, _) in prev {
        if event_name(key).is_none() && next.get(key).is_none() {
            ops.push(PropOp::Clear {
                name: Arc::clone(key),
            });
        }
    }

    for (key, value) in next {
        if event_name(key).is_none() && prev.get(key) != Some(value) {
            ops.push(PropOp::Set {
                name: Arc::clone(key),
                value: value.clone(),
            });
        }
    }

    for (key, value) in next {
        if let (Some(event), Some(handler)) = (event_name(key), value.as_handler()) {
            if prev.get(key) != Some(value) {
                ops.push(PropOp::AddListener {
                    event,
                    handler: handler.clone(),
                });
            }
        }
    }

    ops
}

impl PropOp {
    /// The operation restoring what `self` changed on a node configured with
    /// `prev`.
    pub fn inverse(&self, prev: &Props) -> Self {
        match self {
            Self::RemoveListener { event, handler } => Self::AddListener {
                event: event.clone(),
                handler: handler.clone(),
            },
            Self::AddListener { event, handler } => Self::RemoveListener {
                event: event.clone(),
                handler: handler.clone(),
            },
            Self::Clear { name } | Self::Set { name, .. } => match prev.get(name) {
                Some(value) => Self::Set {
                    name: Arc::clone(name),
                    value: value.clone(),
                },
                None => Self::Clear {
                    name: Arc::clone(name),
                },
            },
        }
    }
}

/// Apply a single operation to `node`.
pub fn apply_prop_op<H: HostAdapter>(
    host: &mut H,
    node: &H::Node,
    op: &PropOp,
) -> Result<(), HostError> {
    match op {
        PropOp::RemoveListener { event, handler } => host.remove_listener(node, event, handler),
        PropOp::Clear { name } => host.clear_property(node, name),
        PropOp::Set { name, value } => host.set_property(node, name, value),
        PropOp::AddListener { event, handler } => host.add_listener(node, event, handler),
    }
}

/// Apply `ops` to `node` in order, stopping at the first host failure.
pub fn apply_prop_ops<H: HostAdapter>(
    host: &mut H,
    node: &H::Node,
    ops: &[PropOp],
) -> Result<(), HostError> {
    ops.iter().try_for_each(|op| apply_prop_op(host, node, op))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(ops: &[PropOp]) -> Vec<&'static str> {
        ops.iter()
            .map(|op| match op {
                PropOp::RemoveListener { .. } => "remove",
                PropOp::Clear { .. } => "clear",
                PropOp::Set { .. } => "set",
                PropOp::AddListener { .. } => "add",
            })
            .collect()
    }

    #[test]
    fn test_identical_props_produce_nothing() {
        let handler = EventHandler::new(|_| {});
        let props = Props::new()
            .with("id", "foo")
            .with("hidden", false)
            .with("onClick", handler);
        assert!(diff_props(&props, &props.clone()).is_empty());
    }

    #[test]
    fn test_nan_value_is_stable() {
        let props = Props::new().with("opacity", f64::NAN);
        assert!(diff_props(&props, &Props::new().with("opacity", f64::NAN)).is_empty());
    }

    #[test]
    fn test_minimal_plain_diff() {
        let prev = Props::new().with("a", 1_i64).with("b", 2_i64);
        let next = Props::new().with("a", 1_i64).with("b", 3_i64).with("c", 4_i64);
        let ops = diff_props(&prev, &next);
        assert_eq!(
            ops,
            vec![
                PropOp::Set {
                    name: "b".into(),
                    value: PropValue::Int(3),
                },
                PropOp::Set {
                    name: "c".into(),
                    value: PropValue::Int(4),
                },
            ]
        );

        let ops = diff_props(&next, &prev);
        assert_eq!(kinds(&ops), ["clear", "set"]);
        assert_eq!(ops[0], PropOp::Clear { name: "c".into() });
    }

    #[test]
    fn test_four_pass_order() {
        let old_click = EventHandler::new(|_| {});
        let new_click = EventHandler::new(|_| {});
        let prev = Props::new()
            .with("title", "old")
            .with("stale", "x")
            .with("onClick", old_click.clone());
        let next = Props::new()
            .with("title", "new")
            .with("onClick", new_click.clone())
            .with("onInput", EventHandler::new(|_| {}));

        let ops = diff_props(&prev, &next);
        assert_eq!(kinds(&ops), ["remove", "clear", "set", "add", "add"]);
        assert_eq!(
            ops[0],
            PropOp::RemoveListener {
                event: "click".into(),
                handler: old_click,
            }
        );
        assert_eq!(
            ops[3],
            PropOp::AddListener {
                event: "click".into(),
                handler: new_click,
            }
        );
    }

    #[test]
    fn test_initial_configuration() {
        let next = Props::new()
            .with("id", "foo")
            .with("onClick", EventHandler::new(|_| {}));
        let ops = diff_props(&Props::new(), &next);
        assert_eq!(kinds(&ops), ["set", "add"]);
    }

    #[test]
    fn test_apply_to_document() {
        use crate::element::NodeTag;
        use crate::host::Document;

        let mut doc = Document::new();
        let node = doc.create_node(&NodeTag::host("div")).unwrap();
        let first = Props::new().with("id", "a").with("onClick", EventHandler::new(|_| {}));
        apply_prop_ops(&mut doc, &node, &diff_props(&Props::new(), &first)).unwrap();
        assert_eq!(doc.listener_count(node, "click"), 1);

        let second = Props::new().with("onClick", EventHandler::new(|_| {}));
        apply_prop_ops(&mut doc, &node, &diff_props(&first, &second)).unwrap();
        assert_eq!(doc.listener_count(node, "click"), 1);
        assert_eq!(doc.property(node, "id"), None);
    }

    #[test]
    fn test_inverse_restores_previous_props() {
        use crate::element::NodeTag;
        use crate::host::Document;

        let mut doc = Document::new();
        let node = doc.create_node(&NodeTag::host("div")).unwrap();
        let prev = Props::new()
            .with("id", "a")
            .with("stale", "x")
            .with("onClick", EventHandler::new(|_| {}));
        let next = Props::new()
            .with("id", "b")
            .with("title", "t")
            .with("onClick", EventHandler::new(|_| {}));
        apply_prop_ops(&mut doc, &node, &diff_props(&Props::new(), &prev)).unwrap();
        let before = doc.to_markup(node);

        let ops = diff_props(&prev, &next);
        apply_prop_ops(&mut doc, &node, &ops).unwrap();
        assert_ne!(doc.to_markup(node), before);

        for op in ops.iter().rev() {
            apply_prop_op(&mut doc, &node, &op.inverse(&prev)).unwrap();
        }
        assert_eq!(doc.to_markup(node), before);
        assert_eq!(doc.listener_count(node, "click"), 1);
        let click = prev.get("onClick").and_then(PropValue::as_handler).unwrap();
        assert_eq!(doc.dispatch(node, "click"), 1);
        assert!(matches!(
            ops[0].inverse(&prev),
            PropOp::AddListener { ref handler, .. } if handler == click
        ));
    }
}
