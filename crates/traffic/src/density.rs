use thiserror::Error;
use trafflow_core::Observer;
use trafflow_solvers::conservation::lax_friedrichs::{self, Action, Config, ConfigError, Event, Status};

use crate::{Parameters, ParametersError};

/// The density field captured at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DensitySnapshot {
    /// Simulated time (s).
    pub time: f64,

    /// Density at each grid node (cars/m), in spatial order.
    pub density: Vec<f64>,
}

/// Density snapshots of one run, strictly increasing in time.
///
/// Renderers only need [`frame`](Self::frame) and [`len`](Self::len).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSeries {
    snapshots: Vec<DensitySnapshot>,
}

/// The first density found outside `[0, u_max]`.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("density {value} at node {node} of frame {frame} (t = {time}) is outside [0, {u_max}]")]
pub struct BoundsViolation {
    pub frame: usize,
    pub node: usize,
    pub time: f64,
    pub value: f64,
    pub u_max: f64,
}

impl SnapshotSeries {
    /// Wraps snapshots that are already ordered in time.
    #[must_use]
    pub fn new(snapshots: Vec<DensitySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Returns the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if there are no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns frame `index`, if present.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&DensitySnapshot> {
        self.snapshots.get(index)
    }

    /// Returns the time of frame `index`, if present.
    #[must_use]
    pub fn time_of_frame(&self, index: usize) -> Option<f64> {
        self.frame(index).map(|snapshot| snapshot.time)
    }

    /// Returns the snapshot times in order.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.snapshots.iter().map(|snapshot| snapshot.time).collect()
    }

    /// Iterates over the snapshots in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DensitySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the series and returns its snapshots.
    #[must_use]
    pub fn into_snapshots(self) -> Vec<DensitySnapshot> {
        self.snapshots
    }

    /// Checks that every density lies in `[0, u_max]`.
    ///
    /// `NaN` counts as out of bounds.
    ///
    /// # Errors
    ///
    /// Returns the first offending value in time, then space, order.
    pub fn check_bounds(&self, u_max: f64) -> Result<(), BoundsViolation> {
        for (frame, snapshot) in self.snapshots.iter().enumerate() {
            if let Some((node, &value)) = snapshot
                .density
                .iter()
                .enumerate()
                .find(|(_, u)| !(0.0..=u_max).contains(*u))
            {
                return Err(BoundsViolation {
                    frame,
                    node,
                    time: snapshot.time,
                    value,
                    u_max,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SnapshotSeries {
    type Item = &'a DensitySnapshot;
    type IntoIter = std::slice::Iter<'a, DensitySnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<lax_friedrichs::Solution> for SnapshotSeries {
    fn from(solution: lax_friedrichs::Solution) -> Self {
        Self::new(
            solution
                .frames
                .into_iter()
                .map(|frame| DensitySnapshot {
                    time: frame.time,
                    density: frame.density,
                })
                .collect(),
        )
    }
}

/// The outcome of one density run.
#[derive(Debug, Clone)]
pub struct DensityRun {
    /// The parameters the run was solved with.
    pub parameters: Parameters,

    /// How the solver terminated.
    pub status: Status,

    /// Solver steps completed.
    pub steps: usize,

    /// Sampled density frames.
    pub series: SnapshotSeries,
}

/// Errors that can occur when setting up a density run.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Parameters(#[from] ParametersError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solver(#[from] lax_friedrichs::Error),
}

/// Solves the road for `parameters`, sampling every `sample_every` steps.
///
/// The road starts jammed (`u_max`) left of `jam_front` and empty to the
/// right. The run owns its own buffers, so runs for different exponents are
/// independent and can execute on separate threads.
///
/// The Courant number is not checked; an unstable run returns normally with
/// oscillating or non-finite densities. Use an observer or
/// [`SnapshotSeries::check_bounds`] to detect that.
///
/// # Errors
///
/// Returns an error if the parameters are invalid or `sample_every` is zero.
pub fn simulate<Obs>(
    parameters: &Parameters,
    sample_every: usize,
    observer: Obs,
) -> Result<DensityRun, SimulationError>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    parameters.validate()?;

    let grid = parameters.grid().map_err(ParametersError::from)?;
    let config = Config::new(parameters.dt, parameters.dx, parameters.steps(), sample_every)?;
    let initial = grid.step_profile(parameters.jam_front, parameters.u_max);

    let courant = config.courant_number(&parameters.flux());
    if courant > 1.0 {
        tracing::warn!(
            exponent = parameters.exponent,
            courant,
            "Courant number above one, densities may leave [0, u_max]"
        );
    }

    let solution = lax_friedrichs::solve(parameters.flux(), initial, &config, observer)?;
    tracing::debug!(
        exponent = parameters.exponent,
        frames = solution.frames.len(),
        status = ?solution.status,
        "density run finished"
    );

    Ok(DensityRun {
        parameters: *parameters,
        status: solution.status,
        steps: solution.steps,
        series: solution.into(),
    })
}

/// Solves the road without observation.
///
/// # Errors
///
/// Returns an error if the parameters are invalid or `sample_every` is zero.
pub fn simulate_unobserved(
    parameters: &Parameters,
    sample_every: usize,
) -> Result<DensityRun, SimulationError> {
    simulate(parameters, sample_every, ())
}
