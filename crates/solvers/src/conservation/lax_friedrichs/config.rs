use thiserror::Error;
use trafflow_core::Flux;

/// Configuration for the Lax–Friedrichs solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    dt: f64,
    dx: f64,
    steps: usize,
    sample_every: usize,
}

/// Errors that can occur when validating a Lax–Friedrichs config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("dt must be finite and positive")]
    Dt,

    #[error("dx must be finite and positive")]
    Dx,

    #[error("sample_every must be at least 1")]
    SampleEvery,
}

impl Config {
    /// Creates a new config.
    ///
    /// The solver takes `steps` updates of size `dt` on a grid of spacing
    /// `dx` and samples the field after every `sample_every`-th update.
    ///
    /// Stability is not checked here. Keeping
    /// [`courant_number`](Self::courant_number) at or below one is the
    /// caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` or `dx` is not finite and positive, or if
    /// `sample_every` is zero.
    pub fn new(dt: f64, dx: f64, steps: usize, sample_every: usize) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::Dt);
        }
        if !dx.is_finite() || dx <= 0.0 {
            return Err(ConfigError::Dx);
        }
        if sample_every == 0 {
            return Err(ConfigError::SampleEvery);
        }

        Ok(Self {
            dt,
            dx,
            steps,
            sample_every,
        })
    }

    /// Returns the time step.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the grid spacing.
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Returns the number of updates to take.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the sampling cadence in updates.
    #[must_use]
    pub fn sample_every(&self) -> usize {
        self.sample_every
    }

    /// Returns `max|J'(u)| * dt / dx` for the given flux.
    #[must_use]
    pub fn courant_number<F: Flux>(&self, flux: &F) -> f64 {
        flux.max_wave_speed() * self.dt / self.dx
    }
}
