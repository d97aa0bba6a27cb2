use ndarray::Array1;
use ninterp::{
    prelude::{Interp2DOwned, Interpolator},
    strategy::enums::Strategy2DEnum,
};

use super::{DensityField, Extrapolate, FieldError, stack, validate};
use crate::{Grid, SnapshotSeries};

/// Gridded interpolation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy2D {
    /// Bilinear weighting of the four surrounding samples.
    Linear,

    /// The closest sample.
    Nearest,
}

/// Density field backed by a `ninterp` grid interpolator over
/// `(time, position)`.
///
/// Cheaper and more robust than [`SplineField`](super::SplineField) near
/// shocks: bilinear values never leave the range of the four surrounding
/// samples.
pub struct GriddedField(Interp2DOwned<f64, Strategy2DEnum>);

impl GriddedField {
    /// Builds a gridded field over `series` sampled on `grid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the series does not fit the grid, or if `ninterp`
    /// rejects the combination of strategy and extrapolation (for example
    /// [`Extrapolate::Enable`] with [`Strategy2D::Nearest`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use trafflow_traffic::{DensitySnapshot, Grid, SnapshotSeries};
    /// use trafflow_traffic::field::{DensityField, Extrapolate, GriddedField, Strategy2D};
    ///
    /// let grid = Grid::new(0.0, 10.0, 5.0).unwrap();
    /// let series = SnapshotSeries::new(vec![
    ///     DensitySnapshot { time: 0.0, density: vec![0.2, 0.0, 0.0] },
    ///     DensitySnapshot { time: 1.0, density: vec![0.2, 0.1, 0.0] },
    /// ]);
    ///
    /// let field = GriddedField::new(&series, &grid, Strategy2D::Linear, Extrapolate::Clamp).unwrap();
    /// let u = field.density(0.5, 5.0).unwrap();
    /// assert!((u - 0.05).abs() < 1e-12);
    /// ```
    pub fn new(
        series: &SnapshotSeries,
        grid: &Grid,
        strategy: Strategy2D,
        extrapolate: Extrapolate,
    ) -> Result<Self, FieldError> {
        validate(series, grid)?;

        let times = Array1::from(series.times());
        let positions = Array1::from(grid.positions());
        let values = stack(series, grid.len());

        let interp = match strategy {
            Strategy2D::Linear => Interp2DOwned::new(
                times,
                positions,
                values,
                ninterp::strategy::Linear.into(),
                extrapolate.into(),
            )?,
            Strategy2D::Nearest => Interp2DOwned::new(
                times,
                positions,
                values,
                ninterp::strategy::Nearest.into(),
                extrapolate.into(),
            )?,
        };
        Ok(Self(interp))
    }
}

impl DensityField for GriddedField {
    type Error = FieldError;

    fn density(&self, time: f64, position: f64) -> Result<f64, Self::Error> {
        self.0.interpolate(&[time, position]).map_err(Into::into)
    }
}
