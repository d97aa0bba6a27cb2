//! Passive vehicles carried by the velocity field.
//!
//! A tracer starts at `(t0, x0)` and is advanced with forward Euler,
//!
//! ```text
//! v_n     = velocity(t_n, x_n)
//! x_{n+1} = x_n + v_n dt
//! t_{n+1} = t_n + dt
//! ```
//!
//! for as long as `t_n <= horizon`, so the last point lies one step past the
//! horizon. Each point carries the speed that moved the tracer there; the
//! initial point carries the speed at the start. The field is never queried
//! past the horizon. Tracers never feed back into the density: any number of them can
//! be integrated over the same field, in any order or in parallel.

use std::convert::Infallible;

use thiserror::Error;
use trafflow_core::{DerivativeOf, OdeProblem};
use trafflow_solvers::transient::euler::{self, Status};

use crate::{VelocityLaw, field::DensityField};

/// Where a tracer is, and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerState {
    /// Time (s).
    pub time: f64,

    /// Position along the road (m).
    pub position: f64,
}

impl TracerState {
    #[must_use]
    pub fn new(time: f64, position: f64) -> Self {
        Self { time, position }
    }
}

/// One sample of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub position: f64,

    /// Speed over the step that ended here (at the start, the initial
    /// speed).
    pub speed: f64,
}

/// The path of one tracer, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    start_time: f64,
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Returns the time the tracer entered the road.
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Returns every sampled point, starting with the initial one.
    #[must_use]
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// Returns the last sampled point.
    #[must_use]
    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Returns `(time, position)` pairs for plotting.
    #[must_use]
    pub fn path(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time, p.position)).collect()
    }

    /// Returns a legend label such as `t0 = 12.5`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("t0 = {:.1}", self.start_time)
    }
}

/// Errors that can occur when integrating tracers.
#[derive(Debug, Error)]
pub enum TracerError {
    #[error("tracer time step must be finite and positive, got {0}")]
    TimeStep(f64),

    #[error("tracer horizon must be finite, got {0}")]
    Horizon(f64),

    #[error("tracer start {name} must be finite, got {value}")]
    Start { name: &'static str, value: f64 },

    #[error("tracer from t = {start_time} needs more than {limit} steps")]
    TooManySteps { start_time: f64, limit: usize },

    #[error(transparent)]
    Integration(#[from] euler::Error),
}

/// Position integrates the speed returned by the velocity law.
struct Motion;

impl OdeProblem for Motion {
    type Input = TracerState;
    type Output = f64;
    type Delta = f64;
    type State = f64;
    type Error = Infallible;

    fn state(&self, input: &TracerState) -> Result<f64, Self::Error> {
        Ok(input.position)
    }

    fn derivative(&self, _input: &TracerState, speed: &f64) -> Result<DerivativeOf<f64, f64>, Self::Error> {
        Ok(*speed)
    }

    fn build_input(&self, base: &TracerState, position: &f64, dt: &f64) -> Result<TracerState, Self::Error> {
        Ok(TracerState::new(base.time + dt, *position))
    }
}

/// Longest trajectory a single tracer may take, in steps.
pub const MAX_STEPS: usize = 10_000_000;

/// Integrates tracers up to a fixed horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryIntegrator {
    dt: f64,
    horizon: f64,
}

impl TrajectoryIntegrator {
    /// Creates an integrator with time step `dt` that stops once time
    /// passes `horizon`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive or `horizon` is
    /// not finite.
    pub fn new(dt: f64, horizon: f64) -> Result<Self, TracerError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(TracerError::TimeStep(dt));
        }
        if !horizon.is_finite() {
            return Err(TracerError::Horizon(horizon));
        }
        Ok(Self { dt, horizon })
    }

    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[must_use]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Returns how many steps a tracer starting at `start_time` takes.
    ///
    /// Zero if it starts after the horizon. The small tolerance keeps a
    /// start exactly `n dt` before the horizon from losing its last step to
    /// rounding. Saturates at `usize::MAX`.
    #[must_use]
    pub fn steps_from(&self, start_time: f64) -> usize {
        if start_time > self.horizon {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = ((self.horizon - start_time) / self.dt + 1e-9).floor() as usize;
        whole.saturating_add(1)
    }

    /// Integrates one tracer from `(start_time, start_position)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the start is not finite, the tracer would take more
    /// than [`MAX_STEPS`] steps, or the velocity law fails along the way.
    pub fn integrate<F: DensityField>(
        &self,
        law: &VelocityLaw<F>,
        start_time: f64,
        start_position: f64,
    ) -> Result<Trajectory, TracerError> {
        if !start_time.is_finite() {
            return Err(TracerError::Start {
                name: "time",
                value: start_time,
            });
        }
        if !start_position.is_finite() {
            return Err(TracerError::Start {
                name: "position",
                value: start_position,
            });
        }

        let steps = self.steps_from(start_time);
        if steps > MAX_STEPS {
            return Err(TracerError::TooManySteps {
                start_time,
                limit: MAX_STEPS,
            });
        }

        // The last step is taken by hand so the field is not queried at the
        // final point, which lies past the horizon.
        let initial = TracerState::new(start_time, start_position);
        let solution = euler::solve_unobserved(law, &Motion, initial, self.dt, steps.saturating_sub(1))?;
        debug_assert_eq!(solution.status, Status::Complete);

        let history = solution.history;
        let mut points = Vec::with_capacity(steps + 1);
        points.extend(history.first().map(|first| TrajectoryPoint {
            time: first.input.time,
            position: first.input.position,
            speed: first.output,
        }));
        points.extend(history.windows(2).map(|pair| TrajectoryPoint {
            time: pair[1].input.time,
            position: pair[1].input.position,
            speed: pair[0].output,
        }));
        if steps > 0 {
            points.extend(history.last().map(|last| TrajectoryPoint {
                time: last.input.time + self.dt,
                position: last.input.position + last.output * self.dt,
                speed: last.output,
            }));
        }

        tracing::trace!(
            start_time,
            start_position,
            steps,
            end_position = points.last().map(|p| p.position),
            "tracer integrated"
        );

        Ok(Trajectory { start_time, points })
    }

    /// Integrates one tracer per start time, all from `start_position`.
    ///
    /// # Errors
    ///
    /// Returns the first tracer error encountered.
    pub fn sweep<F: DensityField>(
        &self,
        law: &VelocityLaw<F>,
        start_times: &[f64],
        start_position: f64,
    ) -> Result<Vec<Trajectory>, TracerError> {
        start_times
            .iter()
            .map(|&start_time| self.integrate(law, start_time, start_position))
            .collect()
    }
}
