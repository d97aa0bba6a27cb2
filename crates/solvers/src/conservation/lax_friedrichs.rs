//! Lax–Friedrichs solver for scalar conservation laws.
//!
//! # Algorithm
//!
//! Each update first applies the boundary policy (left node copies its
//! neighbour, right node is zero), then replaces every interior node with
//!
//! ```text
//! u_new[j] = (u[j+1] + u[j-1]) / 2 - dt / (2 dx) * (J(u[j+1]) - J(u[j-1]))
//! ```
//!
//! reading only the previous field. The neighbour average adds the numerical
//! diffusion that keeps the centred flux difference stable.
//!
//! # Stability
//!
//! The scheme is monotone, and so keeps the density inside the range of the
//! initial data, only while the Courant number `max|J'| dt / dx` is at most
//! one. The solver does not check this; an unstable configuration shows up
//! as growing oscillations, not as an error. Pair the solver with a bounds
//! observer when that matters.
//!
//! # Sampling and events
//!
//! The initial state is always the first frame. After that a frame is taken
//! after every `sample_every`-th update. An [`Event`] is emitted for step 0
//! and after every update; returning [`Action::StopEarly`] ends the run with
//! [`Status::StoppedByObserver`].

mod action;
mod config;
mod error;
mod event;
mod scheme;
mod solution;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use scheme::{LaxFriedrichs, apply_boundaries};
pub use solution::{Frame, Solution, Status};

use trafflow_core::{Flux, Observer};

/// Marches `initial` forward for `config.steps()` updates.
///
/// # Errors
///
/// Returns [`Error::TooFewCells`] if `initial` has fewer than 3 nodes.
pub fn solve<F, Obs>(
    flux: F,
    initial: Vec<f64>,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: Flux,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let mut scheme = LaxFriedrichs::new(flux, config, initial)?;

    tracing::debug!(
        cells = scheme.density().len(),
        steps = config.steps(),
        dt = config.dt(),
        dx = config.dx(),
        "starting Lax-Friedrichs run"
    );

    let mut frames = Vec::with_capacity(config.steps() / config.sample_every() + 1);
    frames.push(Frame {
        step: 0,
        time: 0.0,
        density: scheme.density().to_vec(),
    });

    let event = Event {
        step: 0,
        time: 0.0,
        density: scheme.density(),
        sampled: true,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            frames,
            steps: 0,
        });
    }

    for step in 1..=config.steps() {
        scheme.advance();

        #[allow(clippy::cast_precision_loss)]
        let time = step as f64 * config.dt();
        let sampled = step % config.sample_every() == 0;
        if sampled {
            tracing::trace!(step, time, "sampling density frame");
            frames.push(Frame {
                step,
                time,
                density: scheme.density().to_vec(),
            });
        }

        let event = Event {
            step,
            time,
            density: scheme.density(),
            sampled,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            tracing::debug!(step, time, "Lax-Friedrichs run stopped by observer");
            return Ok(Solution {
                status: Status::StoppedByObserver,
                frames,
                steps: step,
            });
        }
    }

    tracing::debug!(frames = frames.len(), "Lax-Friedrichs run complete");

    Ok(Solution {
        status: Status::Complete,
        frames,
        steps: config.steps(),
    })
}

/// Marches `initial` forward without observation.
///
/// # Errors
///
/// Returns [`Error::TooFewCells`] if `initial` has fewer than 3 nodes.
pub fn solve_unobserved<F: Flux>(
    flux: F,
    initial: Vec<f64>,
    config: &Config,
) -> Result<Solution, Error> {
    solve(flux, initial, config, ())
}
