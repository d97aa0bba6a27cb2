/// The flux function `J(u)` of a scalar conservation law `u_t + J(u)_x = 0`.
///
/// Implementations must be pure. Evaluating outside the physical domain of
/// `u` is a precondition violation: the result is whatever the formula yields
/// (often `NaN`) and is never clamped here, so upstream instability stays
/// visible.
pub trait Flux {
    /// Returns the flux at density `u`.
    fn flux(&self, u: f64) -> f64;

    /// Returns an upper bound of `|dJ/du|` over the physical domain.
    ///
    /// Explicit schemes use this for the Courant number
    /// `max_wave_speed * dt / dx`.
    fn max_wave_speed(&self) -> f64;
}

impl<F: Flux + ?Sized> Flux for &F {
    fn flux(&self, u: f64) -> f64 {
        (**self).flux(u)
    }

    fn max_wave_speed(&self) -> f64 {
        (**self).max_wave_speed()
    }
}
