use trafflow_core::Flux;

use crate::Parameters;

/// Power-law traffic flux `J(u) = u v_max (1 - (u / u_max)^p)`.
///
/// The exponent `p > 0` shapes how speed falls with density: `p = 1` is the
/// linear Greenshields law, larger `p` keeps traffic fast until close to jam
/// density and sharpens shock fronts.
///
/// Densities are expected in `[0, u_max]`. A negative density with a
/// fractional exponent yields `NaN`, which is left to propagate: it means the
/// solver run was unstable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawFlux {
    v_max: f64,
    u_max: f64,
    exponent: f64,
}

impl PowerLawFlux {
    /// Creates a flux from free-flow speed, jam density and exponent.
    #[must_use]
    pub fn new(v_max: f64, u_max: f64, exponent: f64) -> Self {
        Self {
            v_max,
            u_max,
            exponent,
        }
    }

    /// Returns the equilibrium speed `v_max (1 - (u / u_max)^p)`.
    ///
    /// Not clamped; see [`VelocityLaw`](crate::VelocityLaw) for the clamped
    /// version used by tracers.
    #[must_use]
    pub fn speed(&self, u: f64) -> f64 {
        self.v_max * (1.0 - (u / self.u_max).powf(self.exponent))
    }

    /// Returns the free-flow speed.
    #[must_use]
    pub fn v_max(&self) -> f64 {
        self.v_max
    }

    /// Returns the jam density.
    #[must_use]
    pub fn u_max(&self) -> f64 {
        self.u_max
    }

    /// Returns the shape exponent.
    #[must_use]
    pub fn exponent(&self) -> f64 {
        self.exponent
    }
}

impl From<&Parameters> for PowerLawFlux {
    fn from(params: &Parameters) -> Self {
        Self::new(params.v_max, params.u_max, params.exponent)
    }
}

impl Flux for PowerLawFlux {
    fn flux(&self, u: f64) -> f64 {
        u * self.speed(u)
    }

    /// `J'(u) = v_max (1 - (p + 1)(u / u_max)^p)` runs from `v_max` at
    /// `u = 0` down to `-p v_max` at jam density.
    fn max_wave_speed(&self) -> f64 {
        self.v_max * self.exponent.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn flux_vanishes_on_empty_and_jammed_road() {
        for p in [0.5, 1.0, 2.0, 5.0] {
            let flux = PowerLawFlux::new(22.2, 0.2, p);
            assert_eq!(flux.flux(0.0), 0.0);
            assert_relative_eq!(flux.flux(0.2), 0.0);
        }
    }

    #[test]
    fn greenshields_peak_is_at_half_jam_density() {
        let flux = PowerLawFlux::new(22.2, 0.2, 1.0);
        assert_relative_eq!(flux.flux(0.1), 0.1 * 22.2 * 0.5, epsilon = 1e-12);
        assert!(flux.flux(0.1) > flux.flux(0.09));
        assert!(flux.flux(0.1) > flux.flux(0.11));
    }

    #[test]
    fn larger_exponent_keeps_speed_up_longer() {
        let linear = PowerLawFlux::new(22.2, 0.2, 1.0);
        let sharp = PowerLawFlux::new(22.2, 0.2, 5.0);
        assert!(sharp.speed(0.15) > linear.speed(0.15));
        assert_relative_eq!(sharp.speed(0.2), 0.0);
    }

    #[test]
    fn wave_speed_bound_covers_the_derivative() {
        for p in [0.5, 1.0, 2.0, 5.0] {
            let flux = PowerLawFlux::new(22.2, 0.2, p);
            let h = 1e-7;
            for i in 1..200 {
                let u = 0.2 * f64::from(i) / 200.0;
                let slope = (flux.flux(u + h) - flux.flux(u - h)) / (2.0 * h);
                assert!(slope.abs() <= flux.max_wave_speed() * (1.0 + 1e-6));
            }
        }
    }

    #[test]
    fn negative_density_with_fractional_exponent_is_not_masked() {
        let flux = PowerLawFlux::new(22.2, 0.2, 0.5);
        assert!(flux.flux(-1e-3).is_nan());
    }
}
