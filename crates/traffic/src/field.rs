//! Continuous density surfaces rebuilt from snapshot series.
//!
//! A [`DensityField`] answers "what is the density at `(t, x)`?". The
//! velocity law and the tracers only see this trait, so the interpolation
//! scheme can change without touching them:
//!
//! - [`SplineField`]: bicubic natural spline, smooth in both directions
//! - [`GriddedField`]: bilinear or nearest-neighbour lookup via `ninterp`
//! - [`Interpolant`]: either of the above, chosen at runtime by [`Strategy`]
//!
//! All of them are built once and validate the series up front: an empty
//! series, a single snapshot, rows that do not match the grid, times that do
//! not increase or non-finite densities are construction errors.
//!
//! Queries outside the sampled time span or road are extrapolated and should
//! not be trusted. Splines can also overshoot the sampled range near sharp
//! fronts, which is why [`VelocityLaw`](crate::VelocityLaw) clamps.

mod cubic;
mod error;
mod extrapolate;
mod gridded;
mod spline;

use std::io::Read;

use serde::{Deserialize, Serialize};

pub use error::FieldError;
pub use extrapolate::Extrapolate;
pub use gridded::{GriddedField, Strategy2D};
pub use spline::SplineField;

use crate::{Grid, SnapshotSeries, table};

/// A density surface over `(time, position)`.
pub trait DensityField {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the density at `time` and `position`.
    ///
    /// # Errors
    ///
    /// Each field decides what makes a query fail.
    fn density(&self, time: f64, position: f64) -> Result<f64, Self::Error>;
}

impl<F: DensityField + ?Sized> DensityField for &F {
    type Error = F::Error;

    fn density(&self, time: f64, position: f64) -> Result<f64, Self::Error> {
        (**self).density(time, position)
    }
}

/// Interpolation strategy for [`Interpolant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Bicubic natural spline.
    #[default]
    Spline,

    /// Bilinear, extrapolating linearly past the edges.
    Linear,

    /// Nearest sample, clamped to the edges.
    Nearest,
}

/// A density field whose strategy is picked at runtime.
pub enum Interpolant {
    Spline(SplineField),
    Gridded(GriddedField),
}

impl Interpolant {
    /// Builds a field over `series` using `strategy`.
    ///
    /// # Errors
    ///
    /// Returns an error if the series is unusable on `grid`.
    pub fn new(series: &SnapshotSeries, grid: &Grid, strategy: Strategy) -> Result<Self, FieldError> {
        let field = match strategy {
            Strategy::Spline => Self::Spline(SplineField::new(series, grid)?),
            Strategy::Linear => Self::Gridded(GriddedField::new(
                series,
                grid,
                Strategy2D::Linear,
                Extrapolate::Enable,
            )?),
            Strategy::Nearest => Self::Gridded(GriddedField::new(
                series,
                grid,
                Strategy2D::Nearest,
                Extrapolate::Clamp,
            )?),
        };
        tracing::debug!(?strategy, snapshots = series.len(), "built density field");
        Ok(field)
    }

    /// Reads a snapshot table and builds a field over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is malformed or does not fit `grid`.
    pub fn from_table<R: Read>(reader: R, grid: &Grid, strategy: Strategy) -> Result<Self, FieldError> {
        let series = table::read_snapshots(reader)?;
        Self::new(&series, grid, strategy)
    }
}

impl DensityField for Interpolant {
    type Error = FieldError;

    fn density(&self, time: f64, position: f64) -> Result<f64, Self::Error> {
        match self {
            Self::Spline(field) => Ok(field.evaluate(time, position)),
            Self::Gridded(field) => field.density(time, position),
        }
    }
}

/// Checks that `series` can be interpolated on `grid`.
fn validate(series: &SnapshotSeries, grid: &Grid) -> Result<(), FieldError> {
    if series.is_empty() {
        return Err(FieldError::Empty);
    }
    if series.len() < 2 {
        return Err(FieldError::TooFewSnapshots(series.len()));
    }

    let mut previous: Option<f64> = None;
    for (index, snapshot) in series.iter().enumerate() {
        if snapshot.density.len() != grid.len() {
            return Err(FieldError::GridMismatch {
                index,
                expected: grid.len(),
                found: snapshot.density.len(),
            });
        }
        if !snapshot.time.is_finite() || previous.is_some_and(|t| snapshot.time <= t) {
            return Err(FieldError::NonIncreasingTime {
                index,
                time: snapshot.time,
            });
        }
        if let Some((node, &value)) = snapshot
            .density
            .iter()
            .enumerate()
            .find(|(_, u)| !u.is_finite())
        {
            return Err(FieldError::NonFinite { index, node, value });
        }
        previous = Some(snapshot.time);
    }
    Ok(())
}

/// Stacks the snapshots into a `(times, nodes)` array.
fn stack(series: &SnapshotSeries, nodes: usize) -> ndarray::Array2<f64> {
    let mut values = ndarray::Array2::zeros((series.len(), nodes));
    for (mut row, snapshot) in values.rows_mut().into_iter().zip(series) {
        row.assign(&ndarray::ArrayView1::from(snapshot.density.as_slice()));
    }
    values
}
