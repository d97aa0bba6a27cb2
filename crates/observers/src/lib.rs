//! Reusable observers for the trafflow solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the Lax–Friedrichs and Euler solvers.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for cross-solver observers
//!   ([`HasStep`], [`HasTime`], [`HasDensity`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`DensityBounds`] reports densities outside `[0, u_max]`, `NaN`
//!   included, and can stop the run on the first one.
//! - [`Progress`] logs progress through `tracing` at regular intervals.
//!
//! Both can be passed by `&mut` so they can be inspected after the solve,
//! and combined as a pair: `(&mut bounds, &mut progress)`.
//!
//! [`Observer`]: trafflow_core::Observer
//! [`HasStep`]: traits::HasStep
//! [`HasTime`]: traits::HasTime
//! [`HasDensity`]: traits::HasDensity
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod bounds;
mod progress;

pub use bounds::{DensityBounds, Violation};
pub use progress::Progress;
