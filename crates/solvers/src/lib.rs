//! Explicit solvers for the trafflow workspace.
//!
//! - [`conservation::lax_friedrichs`]: marches a scalar conservation law on
//!   a uniform grid and samples the density field at a fixed cadence
//! - [`transient::euler`]: forward Euler over any [`OdeProblem`]
//!
//! Both solvers report progress to an [`Observer`] that may stop them early.
//!
//! [`OdeProblem`]: trafflow_core::OdeProblem
//! [`Observer`]: trafflow_core::Observer

pub mod conservation;
pub mod transient;
