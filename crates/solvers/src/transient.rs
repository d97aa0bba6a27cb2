//! Time integrators for ODE problems.

pub mod euler;
