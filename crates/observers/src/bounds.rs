use trafflow_core::Observer;

use crate::traits::{CanStopEarly, HasDensity, HasStep, HasTime};

/// A density found outside the admissible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    pub step: usize,
    pub time: f64,
    pub node: usize,
    pub value: f64,
}

/// Watches every step for densities outside `[lower, upper]`.
///
/// `NaN` always counts as a violation. The first violation is logged at
/// `warn` level and kept; later ones are only counted. With
/// [`stop_on_violation`](Self::stop_on_violation) the observer ends the run
/// on the first one.
///
/// # Example
///
/// ```
/// use trafflow_core::Observer;
/// use trafflow_observers::DensityBounds;
/// use trafflow_solvers::conservation::lax_friedrichs::{Action, Event};
///
/// let mut bounds = DensityBounds::new(0.2).stop_on_violation();
/// let density = [0.2, 0.25, 0.0];
/// let event = Event { step: 3, time: 0.03, density: &density, sampled: false };
///
/// assert_eq!(bounds.observe(&event), Some(Action::StopEarly));
/// assert_eq!(bounds.first_violation().unwrap().node, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DensityBounds {
    lower: f64,
    upper: f64,
    tolerance: f64,
    stop: bool,
    first: Option<Violation>,
    steps_violated: usize,
}

impl DensityBounds {
    /// Creates an observer for the range `[0, upper]`.
    #[must_use]
    pub fn new(upper: f64) -> Self {
        Self {
            lower: 0.0,
            upper,
            tolerance: 0.0,
            stop: false,
            first: None,
            steps_violated: 0,
        }
    }

    /// Widens the range by `tolerance` on both ends.
    #[must_use]
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    /// Stops the run on the first violation.
    #[must_use]
    pub fn stop_on_violation(self) -> Self {
        Self { stop: true, ..self }
    }

    /// Returns the first violation seen, if any.
    #[must_use]
    pub fn first_violation(&self) -> Option<Violation> {
        self.first
    }

    /// Returns how many observed steps had at least one violation.
    #[must_use]
    pub fn steps_violated(&self) -> usize {
        self.steps_violated
    }

    /// Returns true if nothing out of range has been seen.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.steps_violated == 0
    }

    fn check<E: HasStep + HasTime + HasDensity>(&mut self, event: &E) -> bool {
        let lower = self.lower - self.tolerance;
        let upper = self.upper + self.tolerance;

        // Negated so NaN fails the check.
        let Some((node, &value)) = event
            .density()
            .iter()
            .enumerate()
            .find(|(_, u)| !(**u >= lower && **u <= upper))
        else {
            return false;
        };

        self.steps_violated += 1;
        if self.first.is_none() {
            tracing::warn!(
                step = event.step(),
                time = event.time(),
                node,
                value,
                lower = self.lower,
                upper = self.upper,
                "density left the admissible range"
            );
            self.first = Some(Violation {
                step: event.step(),
                time: event.time(),
                node,
                value,
            });
        }
        true
    }
}

impl<E, A> Observer<E, A> for DensityBounds
where
    E: HasStep + HasTime + HasDensity,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let violated = self.check(event);
        (violated && self.stop).then(A::stop_early)
    }
}

/// Allows `&mut DensityBounds` to be passed to solvers that take an observer
/// by value, so the result can be read after the solve completes.
impl<E, A> Observer<E, A> for &mut DensityBounds
where
    E: HasStep + HasTime + HasDensity,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use trafflow_core::Flux;
    use trafflow_solvers::conservation::lax_friedrichs::{self, Action, Config, Event, Status};

    use super::*;

    /// Greenshields flux with `v_max = 1`, `u_max = 1`.
    struct Greenshields;

    impl Flux for Greenshields {
        fn flux(&self, u: f64) -> f64 {
            u * (1.0 - u)
        }

        fn max_wave_speed(&self) -> f64 {
            1.0
        }
    }

    fn step_profile(nodes: usize) -> Vec<f64> {
        (0..nodes).map(|i| if i < nodes / 2 { 1.0 } else { 0.0 }).collect()
    }

    fn event(step: usize, density: &[f64]) -> Event<'_> {
        Event {
            step,
            time: 0.1 * step as f64,
            density,
            sampled: true,
        }
    }

    #[test]
    fn in_range_steps_are_clean() {
        let mut bounds = DensityBounds::new(1.0);
        for step in 0..5 {
            let action: Option<Action> = bounds.observe(&event(step, &[1.0, 0.5, 0.0]));
            assert!(action.is_none());
        }
        assert!(bounds.is_clean());
        assert_eq!(bounds.first_violation(), None);
    }

    #[test]
    fn keeps_the_first_violation_and_counts_the_rest() {
        let mut bounds = DensityBounds::new(1.0);

        let _: Option<Action> = bounds.observe(&event(0, &[1.0, 0.0, 0.0]));
        let _: Option<Action> = bounds.observe(&event(1, &[1.0, -0.1, 0.0]));
        let _: Option<Action> = bounds.observe(&event(2, &[1.2, 0.0, 0.0]));

        assert_eq!(bounds.steps_violated(), 2);
        let first = bounds.first_violation().unwrap();
        assert_eq!(first.step, 1);
        assert_eq!(first.node, 1);
        assert_relative_eq!(first.value, -0.1);
        assert_relative_eq!(first.time, 0.1);
    }

    #[test]
    fn nan_is_a_violation() {
        let mut bounds = DensityBounds::new(1.0).stop_on_violation();
        let action: Option<Action> = bounds.observe(&event(4, &[1.0, f64::NAN, 0.0]));
        assert_eq!(action, Some(Action::StopEarly));
        assert!(bounds.first_violation().unwrap().value.is_nan());
    }

    #[test]
    fn tolerance_widens_the_range() {
        let mut bounds = DensityBounds::new(1.0).with_tolerance(1e-9);
        let _: Option<Action> = bounds.observe(&event(1, &[1.0 + 1e-12, -1e-12, 0.0]));
        assert!(bounds.is_clean());
    }

    #[test]
    fn stable_run_passes() {
        let config = Config::new(0.5, 1.0, 100, 10).unwrap();
        let mut bounds = DensityBounds::new(1.0).with_tolerance(1e-12);
        let solution = lax_friedrichs::solve(Greenshields, step_profile(40), &config, &mut bounds).unwrap();

        assert_eq!(solution.status, Status::Complete);
        assert!(bounds.is_clean());
    }

    #[test]
    fn unstable_run_stops_at_the_first_undershoot() {
        // A lone bump of 0.5 in an empty road. With dt / dx = 3 the node
        // behind it gets 0.25 - 1.5 * J(0.5) = -0.125 on the first update.
        let mut initial = vec![0.0; 40];
        initial[20] = 0.5;

        let config = Config::new(3.0, 1.0, 100, 10).unwrap();
        let mut bounds = DensityBounds::new(1.0).stop_on_violation();
        let solution = lax_friedrichs::solve(Greenshields, initial, &config, &mut bounds).unwrap();

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 1);
        assert_eq!(solution.frames.len(), 1);

        let first = bounds.first_violation().unwrap();
        assert_eq!(first.step, 1);
        assert_eq!(first.node, 19);
        assert_relative_eq!(first.value, -0.125);
        assert_relative_eq!(first.time, 3.0);
        assert_eq!(bounds.steps_violated(), 1);
    }
}
