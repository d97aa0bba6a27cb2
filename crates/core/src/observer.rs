/// Receives solver events and decides how the run should proceed.
///
/// Returning `Some(action)` requests a solver-specific action, `None` lets the
/// solver continue unchanged.
///
/// Closures of the form `FnMut(&E) -> Option<A>` are observers, and `()` is a
/// no-op observer. A pair of observers sees every event in order; the first
/// one's action wins if both act.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
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

impl<E, A, O1, O2> Observer<E, A> for (O1, O2)
where
    O1: Observer<E, A>,
    O2: Observer<E, A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let first = self.0.observe(event);
        let second = self.1.observe(event);
        first.or(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<O: Observer<usize, &'static str>>(mut observer: O, events: usize) -> Option<usize> {
        (0..events).find(|event| observer.observe(event).is_some())
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), 10), None);
    }

    #[test]
    fn closure_observer_can_act() {
        let stop_at_three = |event: &usize| (*event == 3).then_some("stop");
        assert_eq!(drive(stop_at_three, 10), Some(3));
    }

    #[test]
    fn closure_observer_keeps_state() {
        let mut seen = Vec::new();
        let record = |event: &usize| {
            seen.push(*event);
            None::<&str>
        };
        assert_eq!(drive(record, 4), None);
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn pair_observes_with_both() {
        let mut count = 0;
        let counter = |_: &usize| {
            count += 1;
            None::<&str>
        };
        let stop_at_two = |event: &usize| (*event == 2).then_some("stop");

        assert_eq!(drive((counter, stop_at_two), 10), Some(2));
        assert_eq!(count, 3);
    }
}
