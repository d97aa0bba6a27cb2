//! Scenario files describing a full pipeline run.
//!
//! A scenario is a TOML document. Every key is optional and falls back to
//! the reference run:
//!
//! ```toml
//! exponents = [1.0, 2.0, 5.0]
//! sample_every = 10
//! time_precision = 5
//! strategy = "spline"
//!
//! [parameters]
//! v_max = 22.2
//! u_max = 0.2
//! x_min = -2000.0
//! x_max = 1000.0
//! dx = 5.0
//! dt = 0.01
//! horizon = 150.0
//! jam_front = 0.0
//!
//! [tracers]
//! start_position = -1000.0
//! start_times = [0.0]
//! ```
//!
//! `exponents` takes precedence over `parameters.exponent`: one density run
//! is solved per listed exponent.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Parameters, ParametersError, SnapshotSeries,
    field::Strategy,
    table::TIME_PRECISION,
    tracer::{TracerError, TrajectoryIntegrator},
};

/// A complete pipeline run: density runs, interpolation and tracers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Road and numerical parameters shared by every run.
    pub parameters: Parameters,

    /// Flux exponents, one density run each.
    pub exponents: Vec<f64>,

    /// Steps between captured snapshots.
    pub sample_every: usize,

    /// Decimal places of the time column in snapshot tables.
    pub time_precision: usize,

    /// How the density field is rebuilt from snapshots.
    pub strategy: Strategy,

    pub tracers: TracerConfig,
}

/// Where and when tracers enter the road.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TracerConfig {
    /// Entry position of every tracer (m).
    pub start_position: f64,

    /// Explicit entry times (s).
    pub start_times: Vec<f64>,

    /// Also launch a tracer at every `frame_stride`-th snapshot time.
    pub frame_stride: Option<usize>,

    /// Tracer time step (s); defaults to the solver time step.
    pub dt: Option<f64>,

    /// Tracer horizon (s); defaults to the solver horizon.
    pub horizon: Option<f64>,
}

/// Errors that can occur when loading or validating a [`Scenario`].
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("at least one exponent is required")]
    NoExponents,

    #[error("invalid parameters for exponent {exponent}: {source}")]
    Parameters {
        exponent: f64,
        #[source]
        source: ParametersError,
    },

    #[error("sample_every must be at least 1")]
    SampleEvery,

    #[error("frame_stride must be at least 1")]
    FrameStride,

    #[error("tracer start position must be finite, got {0}")]
    StartPosition(f64),

    #[error(transparent)]
    Tracer(#[from] TracerError),
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            parameters: Parameters::default(),
            exponents: vec![1.0, 2.0, 5.0],
            sample_every: 10,
            time_precision: TIME_PRECISION,
            strategy: Strategy::default(),
            tracers: TracerConfig::default(),
        }
    }
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            start_position: -1000.0,
            start_times: vec![0.0],
            frame_stride: None,
            dt: None,
            horizon: None,
        }
    }
}

impl Scenario {
    /// Parses and validates a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid scenario.
    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reads and validates a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// scenario.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks every run and the tracer settings.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.exponents.is_empty() {
            return Err(ScenarioError::NoExponents);
        }
        if self.sample_every == 0 {
            return Err(ScenarioError::SampleEvery);
        }
        for parameters in self.runs() {
            parameters
                .validate()
                .map_err(|source| ScenarioError::Parameters {
                    exponent: parameters.exponent,
                    source,
                })?;
        }
        self.tracers.validate(&self.parameters)
    }

    /// Returns the parameters of each density run, in exponent order.
    pub fn runs(&self) -> impl Iterator<Item = Parameters> + '_ {
        self.exponents
            .iter()
            .map(|&exponent| self.parameters.with_exponent(exponent))
    }
}

impl TracerConfig {
    /// Checks the tracer settings against the solver parameters.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self, parameters: &Parameters) -> Result<(), ScenarioError> {
        if !self.start_position.is_finite() {
            return Err(ScenarioError::StartPosition(self.start_position));
        }
        if self.frame_stride == Some(0) {
            return Err(ScenarioError::FrameStride);
        }
        self.integrator(parameters)?;
        Ok(())
    }

    /// Builds the integrator, filling unset values from `parameters`.
    ///
    /// # Errors
    ///
    /// Returns an error if the time step or horizon is invalid.
    pub fn integrator(&self, parameters: &Parameters) -> Result<TrajectoryIntegrator, TracerError> {
        TrajectoryIntegrator::new(
            self.dt.unwrap_or(parameters.dt),
            self.horizon.unwrap_or(parameters.horizon),
        )
    }

    /// Returns the sorted, deduplicated start times for a run that produced
    /// `series`.
    #[must_use]
    pub fn start_times(&self, series: &SnapshotSeries) -> Vec<f64> {
        let mut times = self.start_times.clone();
        if let Some(stride) = self.frame_stride.filter(|&stride| stride > 0) {
            times.extend(series.iter().step_by(stride).map(|snapshot| snapshot.time));
        }
        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }
}
