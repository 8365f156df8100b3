/// Watches a search as it runs and may steer it.
///
/// A search hands each event to its observer and acts on the returned
/// `Option<A>`: `None` lets the search carry on, `Some(action)` asks for a
/// search-specific action such as stopping early. Observers are where
/// progress logging and per-iteration persistence live, keeping both out of
/// the search itself.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is an
/// observer that never acts.
pub trait Observer<E, A> {
    /// Receives one event and optionally requests an action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
