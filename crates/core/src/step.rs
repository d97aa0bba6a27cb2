/// A type that can be advanced by one explicit step along its derivative.
///
/// Solvers in this workspace integrate in time, but `Delta` can be any
/// independent variable.
pub trait StepIntegrable<Delta> {
    /// The derivative of the type with respect to `Delta`.
    type Derivative;

    /// Returns the value after stepping with a derivative and step size.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// Shorthand for [`StepIntegrable::Derivative`].
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;

impl StepIntegrable<f64> for f64 {
    type Derivative = f64;

    fn step(&self, derivative: f64, delta: f64) -> Self {
        self + derivative * delta
    }
}
