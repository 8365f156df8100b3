use tnrg_core::Phase;

use super::{SearchInterval, Step};

/// One bisection iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<O> {
    /// Iteration counter, starting at 1.
    pub iter: usize,
    /// Temperature the oracle was evaluated at.
    pub midpoint: f64,
    /// Raw oracle output at the midpoint.
    pub output: O,
    /// Phase the oracle assigned to the output.
    pub phase: Phase,
    /// Resulting interval update.
    pub step: Step,
}

/// Indicates how the search finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Ran the full iteration budget.
    Completed,
    /// Stopped early due to an observer decision.
    StoppedByObserver,
    /// Stopped because the interval could not be split in floating point.
    ResolutionLimit,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::StoppedByObserver => "stopped_by_observer",
            Status::ResolutionLimit => "resolution_limit",
        }
    }
}

/// The result of a bisection search.
#[derive(Debug, Clone)]
pub struct Solution<O> {
    pub status: Status,
    /// Interval the search started from.
    pub initial: SearchInterval,
    /// Final interval.
    pub interval: SearchInterval,
    /// One record per oracle call, in order.
    pub records: Vec<Record<O>>,
}

impl<O> Solution<O> {
    /// Number of iterations performed.
    #[must_use]
    pub fn iters(&self) -> usize {
        self.records.len()
    }

    /// Critical-temperature estimate: the midpoint of the final interval.
    #[must_use]
    pub fn estimate(&self) -> f64 {
        self.interval.midpoint()
    }

    /// Width of the final interval.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.interval.width()
    }

    /// Returns the step if every iteration took the same one.
    ///
    /// A search that only ever raised the lower bound (or only lowered the
    /// upper one) has converged onto an end of the initial interval, which
    /// usually means the interval did not contain the critical point.
    #[must_use]
    pub fn pinned_step(&self) -> Option<Step> {
        let first = self.records.first()?.step;
        self.records
            .iter()
            .all(|record| record.step == first)
            .then_some(first)
    }
}
