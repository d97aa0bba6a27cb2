//! Core traits and types shared across the trafflow workspace.
//!
//! - [`Model`]: a deterministic callable from a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns an action
//! - [`OdeProblem`]: adapts a model to a generic ODE stepper
//! - [`StepIntegrable`]: state that advances by `derivative * delta`
//! - [`Flux`]: the flux function of a scalar conservation law

mod flux;
mod model;
mod observer;
mod problem;
mod step;

pub use flux::Flux;
pub use model::{Model, Snapshot};
pub use observer::Observer;
pub use problem::OdeProblem;
pub use step::{DerivativeOf, StepIntegrable};
