use trafflow_core::Flux;

use super::{Config, Error};

/// Imposes the boundary policy on a density field.
///
/// The left node copies its interior neighbour (open inflow) and the right
/// node is pinned to zero (free outflow).
pub fn apply_boundaries(density: &mut [f64]) {
    let n = density.len();
    if n < 2 {
        return;
    }
    density[0] = density[1];
    density[n - 1] = 0.0;
}

/// Double-buffered Lax–Friedrichs stepper.
///
/// Owns the current field and a scratch buffer. Each update reads only the
/// current field and writes only the scratch buffer, then the two swap.
#[derive(Debug, Clone)]
pub struct LaxFriedrichs<F> {
    flux: F,
    ratio: f64,
    current: Vec<f64>,
    next: Vec<f64>,
}

impl<F: Flux> LaxFriedrichs<F> {
    /// Creates a stepper starting from `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooFewCells`] if `initial` has fewer than 3 nodes.
    pub fn new(flux: F, config: &Config, initial: Vec<f64>) -> Result<Self, Error> {
        if initial.len() < 3 {
            return Err(Error::TooFewCells {
                cells: initial.len(),
            });
        }

        let next = initial.clone();
        Ok(Self {
            flux,
            ratio: config.dt() / (2.0 * config.dx()),
            current: initial,
            next,
        })
    }

    /// Returns the current density field.
    #[must_use]
    pub fn density(&self) -> &[f64] {
        &self.current
    }

    /// Advances the field by one time step.
    ///
    /// The boundary policy is applied to the current field first, the
    /// interior is updated from it, and the policy is imposed again on the
    /// new field so every exposed state satisfies it.
    pub fn advance(&mut self) {
        apply_boundaries(&mut self.current);

        let u = &self.current;
        let n = u.len();
        for j in 1..n - 1 {
            let average = 0.5 * (u[j + 1] + u[j - 1]);
            let transport = self.ratio * (self.flux.flux(u[j + 1]) - self.flux.flux(u[j - 1]));
            self.next[j] = average - transport;
        }

        std::mem::swap(&mut self.current, &mut self.next);
        apply_boundaries(&mut self.current);
    }
}
