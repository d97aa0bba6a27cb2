//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasStep`]: events that know which step they follow
//! - [`HasTime`]: events that carry the simulated time
//! - [`HasDensity`]: events that expose the full density field
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use trafflow_core::Observer;
//! use trafflow_observers::traits::{CanStopEarly, HasDensity};
//!
//! /// Stops once any traffic reaches the last node.
//! struct ReachedTheEnd;
//!
//! impl<E: HasDensity, A: CanStopEarly> Observer<E, A> for ReachedTheEnd {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let density = event.density();
//!         let last = density.len().checked_sub(2)?;
//!         (density[last] > 0.0).then(A::stop_early)
//!     }
//! }
//! ```

use trafflow_solvers::{conservation::lax_friedrichs, transient::euler};

/// An event that knows which step it follows.
pub trait HasStep {
    /// Returns the step count, 0 for the initial state.
    fn step(&self) -> usize;
}

/// An event that carries the simulated time.
pub trait HasTime {
    fn time(&self) -> f64;
}

/// An event that exposes a density field.
pub trait HasDensity {
    /// Returns the density at every node, in spatial order.
    fn density(&self) -> &[f64];
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- lax_friedrichs::Event ---

impl HasStep for lax_friedrichs::Event<'_> {
    fn step(&self) -> usize {
        self.step
    }
}

impl HasTime for lax_friedrichs::Event<'_> {
    fn time(&self) -> f64 {
        self.time
    }
}

impl HasDensity for lax_friedrichs::Event<'_> {
    fn density(&self) -> &[f64] {
        self.density
    }
}

// --- euler::Event ---

impl<I, O> HasStep for euler::Event<I, O> {
    fn step(&self) -> usize {
        self.step
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for lax_friedrichs::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for euler::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
