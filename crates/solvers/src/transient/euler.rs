//! Forward Euler solver for ODE problems.
//!
//! Steps a model forward with
//!
//! ```text
//! state_{n+1} = state_n + derivative_n * dt
//! ```
//!
//! where the derivative is read from the model output at step `n`. The
//! model is evaluated once per step, after the step, so every snapshot in the
//! history pairs an input with the output computed from it.

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use trafflow_core::{Model, Observer, OdeProblem, Snapshot, StepIntegrable};

/// Integrates an ODE problem for `steps` forward Euler steps.
///
/// The observer sees an [`Event`] for the initial snapshot and after every
/// step, and may return [`Action::StopEarly`].
///
/// # Errors
///
/// Returns an error if the model or problem fails at any step.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
    Obs: Observer<Event<M::Input, M::Output>, Action>,
{
    let output = model.call(&initial).map_err(|err| Error::model(0, err))?;
    let mut current = Snapshot::new(initial, output);

    let mut history = Vec::with_capacity(steps + 1);
    history.push(current.clone());

    let event = Event {
        step: 0,
        snapshot: current.clone(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            history,
            steps: 0,
        });
    }

    for step in 1..=steps {
        let state = problem
            .state(&current.input)
            .map_err(|err| Error::problem(step, err))?;
        let derivative = problem
            .derivative(&current.input, &current.output)
            .map_err(|err| Error::problem(step, err))?;

        let next_state = state.step(derivative, dt.clone());
        let next_input = problem
            .build_input(&current.input, &next_state, &dt)
            .map_err(|err| Error::problem(step, err))?;
        let next_output = model
            .call(&next_input)
            .map_err(|err| Error::model(step, err))?;

        current = Snapshot::new(next_input, next_output);
        history.push(current.clone());

        let event = Event {
            step,
            snapshot: current.clone(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                history,
                steps: step,
            });
        }
    }

    Ok(Solution {
        status: Status::Complete,
        history,
        steps,
    })
}

/// Integrates an ODE problem without observation.
///
/// # Errors
///
/// Returns an error if the model or problem fails at any step.
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone,
{
    solve(model, problem, initial, dt, steps, ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use thiserror::Error;
    use trafflow_core::DerivativeOf;

    #[derive(Debug, Clone, Copy)]
    struct Car {
        time: f64,
        position: f64,
    }

    /// Speed that drops to zero past a wall.
    struct WallAhead {
        wall: f64,
        speed: f64,
    }

    impl Model for WallAhead {
        type Input = Car;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, car: &Car) -> Result<f64, Self::Error> {
            Ok(if car.position < self.wall { self.speed } else { 0.0 })
        }
    }

    #[derive(Debug, Error)]
    #[error("road ended at {0}")]
    struct RoadEnded(f64);

    /// Position integrates speed. Fails once the car passes `end`.
    struct Drive {
        end: f64,
    }

    impl OdeProblem for Drive {
        type Input = Car;
        type Output = f64;
        type Delta = f64;
        type State = f64;
        type Error = RoadEnded;

        fn state(&self, car: &Car) -> Result<f64, Self::Error> {
            if car.position > self.end {
                return Err(RoadEnded(self.end));
            }
            Ok(car.position)
        }

        fn derivative(&self, _car: &Car, speed: &f64) -> Result<DerivativeOf<f64, f64>, Self::Error> {
            Ok(*speed)
        }

        fn build_input(&self, base: &Car, position: &f64, dt: &f64) -> Result<Car, Self::Error> {
            Ok(Car {
                time: base.time + dt,
                position: *position,
            })
        }
    }

    fn start() -> Car {
        Car {
            time: 0.0,
            position: 0.0,
        }
    }

    #[test]
    fn constant_speed_covers_expected_distance() {
        let model = WallAhead {
            wall: f64::INFINITY,
            speed: 2.0,
        };
        let problem = Drive { end: f64::INFINITY };

        let solution = solve_unobserved(&model, &problem, start(), 0.1, 10).unwrap();

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.history.len(), 11);

        let last = solution.history.last().unwrap();
        assert_relative_eq!(last.input.position, 2.0, epsilon = 1e-12);
        assert_relative_eq!(last.input.time, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn car_stops_at_the_wall() {
        let model = WallAhead {
            wall: 1.0,
            speed: 1.0,
        };
        let problem = Drive { end: f64::INFINITY };

        let solution = solve_unobserved(&model, &problem, start(), 0.25, 20).unwrap();

        let last = solution.history.last().unwrap();
        assert_relative_eq!(last.input.position, 1.0);
        assert_relative_eq!(last.output, 0.0);
    }

    #[test]
    fn problem_errors_report_the_step() {
        let model = WallAhead {
            wall: f64::INFINITY,
            speed: 1.0,
        };
        let problem = Drive { end: 0.5 };

        let error = solve_unobserved(&model, &problem, start(), 0.2, 10).unwrap_err();

        // Positions 0.0, 0.2, 0.4, 0.6: the fourth step starts past the end.
        assert!(matches!(error, Error::Problem { step: 4, .. }));
    }

    #[test]
    fn observer_can_stop_early() {
        let model = WallAhead {
            wall: f64::INFINITY,
            speed: 1.0,
        };
        let problem = Drive { end: f64::INFINITY };

        let observer = |event: &Event<Car, f64>| {
            (event.snapshot.input.time > 0.45).then_some(Action::StopEarly)
        };
        let solution = solve(&model, &problem, start(), 0.1, 100, observer).unwrap();

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 5);
        assert_eq!(solution.history.len(), 6);
    }

    #[test]
    fn zero_steps_returns_initial() {
        let model = WallAhead {
            wall: f64::INFINITY,
            speed: 1.0,
        };
        let problem = Drive { end: f64::INFINITY };

        let solution = solve_unobserved(&model, &problem, start(), 0.1, 0).unwrap();

        assert_eq!(solution.steps, 0);
        assert_eq!(solution.history.len(), 1);
    }
}
