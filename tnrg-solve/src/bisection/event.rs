use super::{Record, SearchInterval};

/// Control actions supported by the bisection search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current iteration and return the interval so far.
    StopEarly,
}

/// Event emitted once per bisection iteration, after the interval moved.
#[derive(Debug)]
pub struct Event<'a, O> {
    /// What happened in this iteration.
    pub record: &'a Record<O>,
    /// Interval after the update.
    pub interval: SearchInterval,
    /// Total iterations the search will run unless stopped.
    pub budget: usize,
}
