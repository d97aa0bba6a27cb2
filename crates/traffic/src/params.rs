use serde::{Deserialize, Serialize};
use thiserror::Error;
use trafflow_core::Flux;

use crate::{Grid, GridError, PowerLawFlux};

/// Physical and numerical parameters of one road run.
///
/// This bundle is the single source of `v_max`, `u_max` and the exponent for
/// both the density solver and the velocity law, so the two always agree.
///
/// The defaults reproduce the reference run: a 3 km road from `-2000` to
/// `1000` m, jam to the left of the origin, 150 s simulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Free-flow speed (m/s).
    pub v_max: f64,

    /// Jam density (cars/m).
    pub u_max: f64,

    /// Flux shape exponent `p`.
    pub exponent: f64,

    /// Left end of the road (m).
    pub x_min: f64,

    /// Right end of the road (m).
    pub x_max: f64,

    /// Grid spacing (m).
    pub dx: f64,

    /// Time step (s).
    pub dt: f64,

    /// Total simulated time (s).
    pub horizon: f64,

    /// Position of the initial jam front (m).
    pub jam_front: f64,
}

/// Errors that can occur when validating [`Parameters`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParametersError {
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("jam front must be finite, got {0}")]
    JamFront(f64),

    #[error("horizon {horizon} is shorter than one time step {dt}")]
    Horizon { horizon: f64, dt: f64 },

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            v_max: 22.2,
            u_max: 0.2,
            exponent: 1.0,
            x_min: -2000.0,
            x_max: 1000.0,
            dx: 5.0,
            dt: 0.01,
            horizon: 150.0,
            jam_front: 0.0,
        }
    }
}

impl Parameters {
    /// Checks that every parameter is physically meaningful.
    ///
    /// Stability is deliberately not part of this check; compare
    /// [`courant_number`](Self::courant_number) against one instead.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ParametersError> {
        let positive = [
            ("v_max", self.v_max),
            ("u_max", self.u_max),
            ("exponent", self.exponent),
            ("dt", self.dt),
            ("horizon", self.horizon),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParametersError::NotPositive { name, value });
            }
        }
        if !self.jam_front.is_finite() {
            return Err(ParametersError::JamFront(self.jam_front));
        }
        if self.horizon < self.dt {
            return Err(ParametersError::Horizon {
                horizon: self.horizon,
                dt: self.dt,
            });
        }
        self.grid()?;
        Ok(())
    }

    /// Returns a copy with a different flux exponent.
    #[must_use]
    pub fn with_exponent(self, exponent: f64) -> Self {
        Self { exponent, ..self }
    }

    /// Builds the spatial grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain and spacing do not form a valid grid.
    pub fn grid(&self) -> Result<Grid, GridError> {
        Grid::new(self.x_min, self.x_max, self.dx)
    }

    /// Returns the flux defined by these parameters.
    #[must_use]
    pub fn flux(&self) -> PowerLawFlux {
        PowerLawFlux::from(self)
    }

    /// Returns the number of solver steps, `horizon / dt` rounded.
    #[must_use]
    pub fn steps(&self) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (self.horizon / self.dt).round() as usize;
        steps
    }

    /// Returns the Courant number `max|J'| dt / dx`.
    ///
    /// Lax–Friedrichs stays bounded only while this is at most one.
    #[must_use]
    pub fn courant_number(&self) -> f64 {
        self.flux().max_wave_speed() * self.dt / self.dx
    }
}
