//! The cooperative work loop.

use super::deadline::{Deadline, Unbounded};
use crate::element::Element;
use crate::error::RenderError;
use crate::host::HostAdapter;
use crate::reconciler::{CommitStats, Reconciler};
use log::trace;
use std::time::Duration;

/// Outcome of one work loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// No render pass in flight.
    Idle,
    /// Ran out of time with the pass unfinished.
    Yielded {
        /// Units of work done in this invocation.
        units: usize,
    },
    /// The pass finished and was committed.
    Committed(CommitStats),
}

impl WorkStatus {
    /// Whether a pass is still in flight.
    pub const fn has_more_work(&self) -> bool {
        matches!(self, Self::Yielded { .. })
    }
}

impl<H: HostAdapter> Reconciler<H> {
    /// Perform units of work while `deadline` leaves at least `threshold`,
    /// committing once the last unit is done.
    ///
    /// The deadline is checked before every unit. A pass with no units left
    /// is committed even if the deadline already ran out.
    ///
    /// # Errors
    ///
    /// A malformed element or a host failure; the pass is abandoned and the
    /// committed tree and the host are unchanged.
    pub fn work_loop<D: Deadline + ?Sized>(
        &mut self,
        deadline: &D,
        threshold: Duration,
    ) -> Result<WorkStatus, RenderError> {
        let mut units = 0;
        while let Some(unit) = self.next_unit {
            if deadline.time_remaining() < threshold {
                break;
            }
            match self.perform_unit_of_work(unit) {
                Ok(next) => self.next_unit = next,
                Err(err) => {
                    self.abort(&err);
                    return Err(err);
                }
            }
            units += 1;
        }

        if self.pending.is_none() {
            return Ok(WorkStatus::Idle);
        }
        if self.next_unit.is_some() {
            trace!("yielding after {units} units of pass {}", self.pass());
            return Ok(WorkStatus::Yielded { units });
        }
        self.commit_root().map(WorkStatus::Committed)
    }

    /// Run the pass in flight to completion without yielding.
    ///
    /// # Errors
    ///
    /// As for [`work_loop`](Self::work_loop).
    pub fn flush(&mut self) -> Result<WorkStatus, RenderError> {
        self.work_loop(&Unbounded, Duration::ZERO)
    }

    /// Request a render and run it to completion.
    ///
    /// # Errors
    ///
    /// As for [`work_loop`](Self::work_loop).
    pub fn render_sync(
        &mut self,
        element: Element,
        container: H::Node,
    ) -> Result<CommitStats, RenderError> {
        self.request_render(element, container);
        match self.flush()? {
            WorkStatus::Committed(stats) => Ok(stats),
            WorkStatus::Idle | WorkStatus::Yielded { .. } => Ok(CommitStats::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{create_element, Props};
    use crate::host::Document;
    use crate::scheduler::UnitDeadline;

    fn list(len: usize) -> Element {
        create_element(
            "ul",
            Props::new(),
            (0..len).map(|i| create_element("li", Props::new(), [format!("item {i}").into()]).into()),
        )
    }

    #[test]
    fn test_idle_without_work() {
        let mut reconciler = Reconciler::new(Document::new());
        assert_eq!(reconciler.flush(), Ok(WorkStatus::Idle));
    }

    #[test]
    fn test_yields_and_resumes() {
        let mut doc = Document::new();
        let container = doc.create_container("body");
        let mut reconciler = Reconciler::new(doc);
        reconciler.request_render(list(3), container);

        // root, ul, li, text, li, text, li, text
        let status = reconciler
            .work_loop(&UnitDeadline::new(3), Duration::from_millis(1))
            .unwrap();
        assert_eq!(status, WorkStatus::Yielded { units: 3 });
        assert!(status.has_more_work());
        assert!(reconciler.host().children(container).is_empty());

        let status = reconciler
            .work_loop(&UnitDeadline::new(5), Duration::from_millis(1))
            .unwrap();
        let WorkStatus::Committed(stats) = status else {
            panic!("expected a commit, got {status:?}");
        };
        assert_eq!(stats.fibers, 8);
        assert_eq!(
            reconciler.host().inner_markup(container),
            "<ul><li>item 0</li><li>item 1</li><li>item 2</li></ul>"
        );
    }

    #[test]
    fn test_exhausted_deadline_does_no_work() {
        let mut doc = Document::new();
        let container = doc.create_container("body");
        let mut reconciler = Reconciler::new(doc);
        reconciler.request_render(list(1), container);

        let status = reconciler
            .work_loop(&UnitDeadline::new(0), Duration::from_millis(1))
            .unwrap();
        assert_eq!(status, WorkStatus::Yielded { units: 0 });
        assert_eq!(reconciler.next_unit(), Some(crate::fiber::FiberId::ROOT));
    }
}
