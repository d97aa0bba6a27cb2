//! One-dimensional natural cubic spline pieces.

use ndarray::{Array1, ArrayView1};

/// Solves for the spline second derivatives at each knot.
///
/// Natural end conditions (zero curvature at both ends) close the
/// tridiagonal system, which is solved with the Thomas algorithm.
pub(super) fn second_derivatives(knots: &[f64], values: ArrayView1<'_, f64>) -> Array1<f64> {
    let n = knots.len();
    let mut second = Array1::zeros(n);
    if n < 3 {
        return second;
    }

    let mut diag = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    for i in 1..n - 1 {
        let h_left = knots[i] - knots[i - 1];
        let h_right = knots[i + 1] - knots[i];
        diag[i] = 2.0 * (h_left + h_right);
        rhs[i] = 6.0
            * ((values[i + 1] - values[i]) / h_right - (values[i] - values[i - 1]) / h_left);
        if i > 1 {
            let w = h_left / diag[i - 1];
            diag[i] -= w * h_left;
            rhs[i] -= w * rhs[i - 1];
        }
    }

    for i in (1..n - 1).rev() {
        let h_right = knots[i + 1] - knots[i];
        second[i] = (rhs[i] - h_right * second[i + 1]) / diag[i];
    }
    second
}

/// Index of the knot interval used for `x`.
///
/// Points past either end use the first or last interval, which extends the
/// end cubic.
pub(super) fn interval(knots: &[f64], x: f64) -> usize {
    knots
        .partition_point(|&knot| knot <= x)
        .saturating_sub(1)
        .min(knots.len() - 2)
}

/// Evaluates the cubic on `[x0, x1]` with end values `y` and end second
/// derivatives `m`.
pub(super) fn segment(x0: f64, x1: f64, y: [f64; 2], m: [f64; 2], x: f64) -> f64 {
    let h = x1 - x0;
    let a = (x1 - x) / h;
    let b = (x - x0) / h;
    a * y[0] + b * y[1] + ((a.powi(3) - a) * m[0] + (b.powi(3) - b) * m[1]) * h * h / 6.0
}

/// Evaluates the spline through `values` on interval `k` at `x`.
pub(super) fn evaluate(
    knots: &[f64],
    values: ArrayView1<'_, f64>,
    second: ArrayView1<'_, f64>,
    k: usize,
    x: f64,
) -> f64 {
    segment(
        knots[k],
        knots[k + 1],
        [values[k], values[k + 1]],
        [second[k], second[k + 1]],
        x,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn straight_lines_have_no_curvature() {
        let knots = [0.0, 0.5, 2.0, 3.0];
        let values = array![1.0, 2.0, 5.0, 7.0];
        let second = second_derivatives(&knots, values.view());
        for &m in second.iter() {
            assert_relative_eq!(m, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn matches_a_hand_solved_spline() {
        // Knots 0, 1, 2 with values 0, 1, 0: the single interior equation is
        // 4 M1 = 6 (-1 - 1), so M1 = -3.
        let knots = [0.0, 1.0, 2.0];
        let values = array![0.0, 1.0, 0.0];
        let second = second_derivatives(&knots, values.view());
        assert_relative_eq!(second[1], -3.0);

        // S(0.5) = 0.5 + (0.125 - 0.5) * (-3) / 6 = 0.6875
        let k = interval(&knots, 0.5);
        assert_eq!(k, 0);
        assert_relative_eq!(evaluate(&knots, values.view(), second.view(), k, 0.5), 0.6875);
    }

    #[test]
    fn interpolates_the_knots() {
        let knots = [0.0, 0.3, 1.0, 1.2, 2.5];
        let values = array![0.2, 0.15, 0.0, 0.05, 0.1];
        let second = second_derivatives(&knots, values.view());

        for (k, (&x, &y)) in knots.iter().zip(&values).enumerate().take(knots.len() - 1) {
            assert_relative_eq!(
                evaluate(&knots, values.view(), second.view(), k, x),
                y,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn interval_clamps_outside_points() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(interval(&knots, -5.0), 0);
        assert_eq!(interval(&knots, 0.0), 0);
        assert_eq!(interval(&knots, 1.0), 1);
        assert_eq!(interval(&knots, 2.9), 2);
        assert_eq!(interval(&knots, 3.0), 2);
        assert_eq!(interval(&knots, 9.0), 2);
    }
}
