use std::error::Error as StdError;

use thiserror::Error;
use trafflow_core::Model;

use crate::{Parameters, PowerLawFlux, field::DensityField, tracer::TracerState};

/// Local vehicle speed implied by a density field.
///
/// Speed follows the same power law as the flux,
/// `v = v_max (1 - (u / u_max)^p)`, but is clamped to `[0, v_max]`.
/// Interpolated densities may overshoot `[0, u_max]` near sharp fronts, and
/// without the clamp tracers would reverse or exceed the free-flow speed.
///
/// A negative density with a fractional exponent has no real power; it is
/// read as an empty road and yields `v_max`.
pub struct VelocityLaw<F> {
    field: F,
    flux: PowerLawFlux,
}

/// Errors that can occur when evaluating a [`VelocityLaw`].
#[derive(Debug, Error)]
pub enum VelocityError {
    #[error("density field failed at t = {time}, x = {position}: {source}")]
    Field {
        time: f64,
        position: f64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("density at t = {time}, x = {position} is NaN")]
    NotANumber { time: f64, position: f64 },
}

impl<F: DensityField> VelocityLaw<F> {
    /// Creates a velocity law over `field` using the speed parameters of
    /// `parameters`.
    pub fn new(field: F, parameters: &Parameters) -> Self {
        Self {
            field,
            flux: parameters.flux(),
        }
    }

    /// Returns the clamped speed for `density`, or `None` if it is `NaN`.
    #[must_use]
    pub fn speed(&self, density: f64) -> Option<f64> {
        if density.is_nan() {
            return None;
        }

        let v_max = self.flux.v_max();
        let raw = self.flux.speed(density);
        if raw.is_nan() {
            return Some(v_max);
        }
        Some(raw.min(v_max).clamp(0.0, v_max))
    }

    /// Returns the clamped speed at `time` and `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the field query fails or yields `NaN`.
    pub fn velocity(&self, time: f64, position: f64) -> Result<f64, VelocityError> {
        let density = self
            .field
            .density(time, position)
            .map_err(|err| VelocityError::Field {
                time,
                position,
                source: Box::new(err),
            })?;
        self.speed(density)
            .ok_or(VelocityError::NotANumber { time, position })
    }
}

impl<F: DensityField> Model for VelocityLaw<F> {
    type Input = TracerState;
    type Output = f64;
    type Error = VelocityError;

    fn call(&self, input: &TracerState) -> Result<f64, Self::Error> {
        self.velocity(input.time, input.position)
    }
}
