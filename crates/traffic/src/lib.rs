//! Traffic density on a single road.
//!
//! The density `u(t, x)` obeys the Lighthill–Whitham–Richards conservation
//! law `u_t + J(u)_x = 0` with the power-law flux
//! `J(u) = u v_max (1 - (u / u_max)^p)`. This crate wires the workspace
//! solvers into a traffic pipeline:
//!
//! 1. [`simulate`] marches a jam-to-free-flow step with Lax–Friedrichs and
//!    samples a [`SnapshotSeries`].
//! 2. [`table`] persists the series as a row-oriented text table and reads
//!    it back.
//! 3. [`field`] rebuilds a continuous density surface over `(t, x)`.
//! 4. [`VelocityLaw`] turns density into a clamped local speed.
//! 5. [`tracer`] integrates passive vehicles through that speed field.

pub mod config;
pub mod field;
pub mod table;
pub mod tracer;

mod density;
mod flux;
mod grid;
mod params;
mod velocity;

pub use config::{Scenario, ScenarioError, TracerConfig};
pub use density::{
    BoundsViolation, DensityRun, DensitySnapshot, SimulationError, SnapshotSeries, simulate,
    simulate_unobserved,
};
pub use flux::PowerLawFlux;
pub use grid::{Grid, GridError};
pub use params::{Parameters, ParametersError};
pub use velocity::{VelocityError, VelocityLaw};
