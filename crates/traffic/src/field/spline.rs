use std::convert::Infallible;

use ndarray::Array2;

use super::{DensityField, FieldError, cubic, stack, validate};
use crate::{Grid, SnapshotSeries};

/// Bicubic natural spline through every sampled density.
///
/// The surface is the tensor product of natural cubic splines in position
/// and in time. Besides the samples it stores three tables of second
/// derivatives, so a query only touches the four samples around it and costs
/// two binary searches.
///
/// The surface passes through every sample exactly but, like any cubic
/// spline, can ring next to a shock front and leave `[0, u_max]` there.
#[derive(Debug, Clone)]
pub struct SplineField {
    times: Vec<f64>,
    positions: Vec<f64>,
    values: Array2<f64>,
    /// `d²u/dx²` along each snapshot.
    values_xx: Array2<f64>,
    /// `d²u/dt²` along each node.
    values_tt: Array2<f64>,
    /// `d²/dx² (d²u/dt²)` along each snapshot.
    values_ttxx: Array2<f64>,
}

impl SplineField {
    /// Fits the spline to `series` sampled on `grid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the series is empty, has a single snapshot, does
    /// not match the grid, is not increasing in time or holds non-finite
    /// densities.
    pub fn new(series: &SnapshotSeries, grid: &Grid) -> Result<Self, FieldError> {
        validate(series, grid)?;

        let times = series.times();
        let positions = grid.positions();
        let values = stack(series, grid.len());

        let along_positions = |samples: &Array2<f64>| {
            let mut second = Array2::zeros(samples.raw_dim());
            for (i, row) in samples.rows().into_iter().enumerate() {
                second
                    .row_mut(i)
                    .assign(&cubic::second_derivatives(&positions, row));
            }
            second
        };

        let values_xx = along_positions(&values);

        let mut values_tt = Array2::zeros(values.raw_dim());
        for (k, column) in values.columns().into_iter().enumerate() {
            values_tt
                .column_mut(k)
                .assign(&cubic::second_derivatives(&times, column));
        }
        let values_ttxx = along_positions(&values_tt);

        Ok(Self {
            times,
            positions,
            values,
            values_xx,
            values_tt,
            values_ttxx,
        })
    }

    /// Returns the interpolated density at `time` and `position`.
    ///
    /// Outside the sampled envelope the end cubics are extended, which is
    /// unreliable.
    #[must_use]
    pub fn evaluate(&self, time: f64, position: f64) -> f64 {
        let i = cubic::interval(&self.times, time);
        let k = cubic::interval(&self.positions, position);

        let along = |samples: &Array2<f64>, second: &Array2<f64>, row: usize| {
            cubic::evaluate(&self.positions, samples.row(row), second.row(row), k, position)
        };

        let u = [
            along(&self.values, &self.values_xx, i),
            along(&self.values, &self.values_xx, i + 1),
        ];
        let u_tt = [
            along(&self.values_tt, &self.values_ttxx, i),
            along(&self.values_tt, &self.values_ttxx, i + 1),
        ];

        cubic::segment(self.times[i], self.times[i + 1], u, u_tt, time)
    }

    /// Returns the sampled time span.
    #[must_use]
    pub fn time_span(&self) -> (f64, f64) {
        (self.times[0], self.times[self.times.len() - 1])
    }
}

impl DensityField for SplineField {
    type Error = Infallible;

    fn density(&self, time: f64, position: f64) -> Result<f64, Self::Error> {
        Ok(self.evaluate(time, position))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::DensitySnapshot;

    fn sample<F: Fn(f64, f64) -> f64>(times: &[f64], grid: &Grid, f: F) -> SnapshotSeries {
        SnapshotSeries::new(
            times
                .iter()
                .map(|&t| DensitySnapshot {
                    time: t,
                    density: grid.positions().into_iter().map(|x| f(t, x)).collect(),
                })
                .collect(),
        )
    }

    #[test]
    fn reproduces_bilinear_surfaces_on_uneven_times() {
        let grid = Grid::new(-10.0, 10.0, 5.0).unwrap();
        let surface = |t: f64, x: f64| 0.1 + 0.01 * t - 0.0005 * x + 0.0001 * t * x;
        let series = sample(&[0.0, 0.5, 1.5, 2.0], &grid, surface);

        let field = SplineField::new(&series, &grid).unwrap();

        for (t, x) in [(0.7, 3.3), (1.9, -9.1), (0.0, 0.0), (2.0, 10.0)] {
            assert_relative_eq!(field.evaluate(t, x), surface(t, x), epsilon = 1e-12);
        }
    }

    #[test]
    fn passes_through_every_sample() {
        let grid = Grid::new(0.0, 40.0, 5.0).unwrap();
        let times = [0.0, 0.1, 0.2, 0.4, 0.5];
        let bumpy = |t: f64, x: f64| 0.1 + 0.05 * (x / 7.0 + 3.0 * t).sin();
        let series = sample(&times, &grid, bumpy);

        let field = SplineField::new(&series, &grid).unwrap();

        for snapshot in &series {
            for (x, u) in grid.positions().into_iter().zip(&snapshot.density) {
                assert_relative_eq!(field.evaluate(snapshot.time, x), *u, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn approximates_smooth_surfaces_between_samples() {
        let grid = Grid::new(-20.0, 20.0, 1.0).unwrap();
        let times: Vec<f64> = (0..=30).map(|i| f64::from(i) * 0.1).collect();
        let smooth = |t: f64, x: f64| t.sin() * (x / 10.0).cos();
        let series = sample(&times, &grid, smooth);

        let field = SplineField::new(&series, &grid).unwrap();

        for (t, x) in [(1.55, 3.5), (0.85, -7.25), (2.05, 0.5)] {
            assert_relative_eq!(field.evaluate(t, x), smooth(t, x), epsilon = 1e-4);
        }
    }

    #[test]
    fn rings_next_to_a_sharp_front() {
        let grid = Grid::new(-50.0, 50.0, 5.0).unwrap();
        let front = |_: f64, x: f64| if x < 0.0 { 0.2 } else { 0.0 };
        let series = sample(&[0.0, 1.0], &grid, front);

        let field = SplineField::new(&series, &grid).unwrap();

        let lowest = (0..=200)
            .map(|i| field.evaluate(0.5, -50.0 + 0.5 * f64::from(i)))
            .fold(f64::INFINITY, f64::min);
        assert!(lowest < 0.0);
    }

    #[test]
    fn reports_time_span() {
        let grid = Grid::new(0.0, 10.0, 5.0).unwrap();
        let series = sample(&[1.0, 2.0, 4.0], &grid, |_, _| 0.1);
        let field = SplineField::new(&series, &grid).unwrap();
        assert_eq!(field.time_span(), (1.0, 4.0));
    }
}
