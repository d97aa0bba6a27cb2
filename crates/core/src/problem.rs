use crate::{DerivativeOf, StepIntegrable};

/// An ODE problem posed over a [`Model`](crate::Model).
///
/// The problem pulls the integrated state out of a model input, reads its
/// derivative from the model input and output, and rebuilds the next model
/// input once the state has been stepped.
pub trait OdeProblem {
    type Input;
    type Output;
    type Delta;
    type State: StepIntegrable<Self::Delta>;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the state from model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be extracted.
    fn state(&self, input: &Self::Input) -> Result<Self::State, Self::Error>;

    /// Computes the derivative of the state from model input and output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn derivative(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<DerivativeOf<Self::State, Self::Delta>, Self::Error>;

    /// Builds the next model input from the stepped state.
    ///
    /// `base` is the input the step started from and `delta` the step size,
    /// so time-like fields can be advanced alongside the state.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed.
    fn build_input(
        &self,
        base: &Self::Input,
        state: &Self::State,
        delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error>;
}
