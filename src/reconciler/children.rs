//! Child reconciliation: positional lockstep diff.
//!
//! The new elements and the alternate's old child chain are walked side by
//! side. Matching is by tag only, never by key:
//!
//! | new      | old       | result                          |
//! |----------|-----------|---------------------------------|
//! | tag T    | tag T     | update (reuse host node)        |
//! | tag T    | tag U     | placement + deletion of old     |
//! | tag T    | none      | placement                       |
//! | none     | any       | deletion of old                 |
//!
//! Cost is O(max(new, old)) per parent.

use super::Reconciler;
use crate::element::Element;
use crate::error::ElementError;
use crate::fiber::{Effect, EffectFlags, Fiber, FiberId};
use crate::host::HostAdapter;

impl<H: HostAdapter> Reconciler<H> {
    /// Build the child fibers of `parent` from `elements`, marking old
    /// fibers that no longer fit for deletion.
    pub(crate) fn reconcile_children(
        &mut self,
        parent: FiberId,
        elements: &[Element],
    ) -> Result<(), ElementError> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(());
        };
        let mut current = self.current.as_mut();
        let deletions = &mut self.deletions;

        // An alternate always points into the committed tree.
        let mut old = match (pending[parent].alternate, current.as_deref()) {
            (Some(alternate), Some(tree)) => tree[alternate].child,
            _ => None,
        };
        let mut previous: Option<FiberId> = None;
        let mut index = 0;

        while index < elements.len() || old.is_some() {
            let element = elements.get(index);
            let old_fiber = old
                .zip(current.as_deref())
                .map(|(id, tree)| (id, &tree[id]));
            let same_type = matches!(
                (element, &old_fiber),
                (Some(element), Some((_, fiber))) if fiber.tag == *element.tag()
            );

            let produced = match element {
                Some(element) => {
                    element.validate()?;
                    Some(match old_fiber {
                        Some((old_id, fiber)) if same_type => Fiber::update(
                            element,
                            parent,
                            old_id,
                            fiber.host_node.clone(),
                            &fiber.props,
                        ),
                        _ => Fiber::placement(element, parent),
                    })
                }
                None => None,
            };
            let next_old = old_fiber.and_then(|(_, fiber)| fiber.sibling);

            if let (Some(old_id), false, Some(tree)) = (old, same_type, current.as_deref_mut()) {
                let fiber = &mut tree[old_id];
                deletions.push((old_id, fiber.effect));
                fiber.effect = Effect::Deletion;
                fiber.flags.insert(EffectFlags::DELETION);
            }
            old = next_old;

            if let Some(fiber) = produced {
                let id = pending.push(fiber);
                match previous {
                    None => pending[parent].child = Some(id),
                    Some(prev) => pending[prev].sibling = Some(id),
                }
                previous = Some(id);
            }
            index += 1;
        }
        Ok(())
    }
}
