use approx::assert_relative_eq;
use trafflow_core::Flux;

use super::{
    Action, Config, Error, Event, LaxFriedrichs, Status, apply_boundaries, solve,
    solve_unobserved,
};

const V_MAX: f64 = 22.2;
const U_MAX: f64 = 0.2;

/// `J(u) = u v_max (1 - (u / u_max)^p)`.
struct PowerLaw {
    p: f64,
}

impl Flux for PowerLaw {
    fn flux(&self, u: f64) -> f64 {
        u * V_MAX * (1.0 - (u / U_MAX).powf(self.p))
    }

    fn max_wave_speed(&self) -> f64 {
        V_MAX * self.p.max(1.0)
    }
}

/// Linear advection `J(u) = a u`.
struct Advection(f64);

impl Flux for Advection {
    fn flux(&self, u: f64) -> f64 {
        self.0 * u
    }

    fn max_wave_speed(&self) -> f64 {
        self.0.abs()
    }
}

/// Jam of `U_MAX` on the first `jam` nodes, empty road after.
fn step_profile(cells: usize, jam: usize) -> Vec<f64> {
    (0..cells)
        .map(|j| if j < jam { U_MAX } else { 0.0 })
        .collect()
}

/// Deterministic, irregular profile inside `[0, U_MAX]`.
fn scrambled_profile(cells: usize) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    (0..cells)
        .map(|j| U_MAX * ((j * 37 % 17) as f64 / 16.0))
        .collect()
}

#[test]
fn first_update_smooths_the_front() {
    let config = Config::new(0.01, 5.0, 1, 1).unwrap();
    let initial = step_profile(41, 20);

    let solution = solve_unobserved(PowerLaw { p: 1.0 }, initial, &config).unwrap();
    let after = &solution.frames[1].density;

    // Node 19 is the last jammed node, node 20 the first empty one.
    assert!(after[19] < U_MAX);
    assert!(after[20] > 0.0);
    assert_relative_eq!(after[19], 0.5 * U_MAX);
    assert_relative_eq!(after[20], 0.5 * U_MAX);

    // Away from the front nothing moves.
    assert_relative_eq!(after[10], U_MAX);
    assert_relative_eq!(after[30], 0.0);
}

#[test]
fn samples_initial_state_then_every_k_steps() {
    let config = Config::new(0.01, 5.0, 25, 10).unwrap();
    let initial = step_profile(21, 10);

    let solution = solve_unobserved(PowerLaw { p: 2.0 }, initial.clone(), &config).unwrap();

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.steps, 25);

    let steps: Vec<_> = solution.frames.iter().map(|frame| frame.step).collect();
    assert_eq!(steps, vec![0, 10, 20]);
    assert_eq!(solution.frames[0].density, initial);
    assert_relative_eq!(solution.frames[2].time, 0.2, epsilon = 1e-12);

    for pair in solution.frames.windows(2) {
        assert!(pair[1].time > pair[0].time);
    }
}

#[test]
fn boundary_policy_holds_after_every_update() {
    let config = Config::new(0.02, 5.0, 200, 10).unwrap();
    let mut checked = 0;

    let observer = |event: &Event<'_>| {
        // The scrambled initial state does not satisfy the policy yet.
        if event.step == 0 {
            return None;
        }
        let u = event.density;
        assert_eq!(u[0], u[1], "left boundary at step {}", event.step);
        assert_eq!(u[u.len() - 1], 0.0, "right boundary at step {}", event.step);
        checked += 1;
        None::<Action>
    };

    solve(PowerLaw { p: 2.0 }, scrambled_profile(50), &config, observer).unwrap();
    assert_eq!(checked, 200);
}

#[test]
fn interior_mass_changes_only_through_the_edges() {
    let config = Config::new(0.02, 5.0, 1, 1).unwrap();
    let flux = PowerLaw { p: 2.0 };
    let ratio = config.dt() / (2.0 * config.dx());

    let mut scheme = LaxFriedrichs::new(&flux, &config, scrambled_profile(64)).unwrap();

    for _ in 0..20 {
        let mut before = scheme.density().to_vec();
        apply_boundaries(&mut before);
        let n = before.len();
        let interior = |u: &[f64]| u[1..n - 1].iter().sum::<f64>();

        let edge_average = 0.5 * (before[0] - before[1] + before[n - 1] - before[n - 2]);
        let edge_flux = ratio
            * (flux.flux(before[n - 1]) + flux.flux(before[n - 2])
                - flux.flux(before[0])
                - flux.flux(before[1]));
        let expected = interior(&before) + edge_average - edge_flux;

        scheme.advance();

        assert_relative_eq!(interior(scheme.density()), expected, epsilon = 1e-12);
    }
}

#[test]
fn update_reads_only_the_previous_field() {
    let config = Config::new(0.1, 1.0, 1, 1).unwrap();
    let flux = Advection(2.0);
    let ratio = config.dt() / (2.0 * config.dx());

    let mut before = scrambled_profile(12);
    let mut scheme = LaxFriedrichs::new(&flux, &config, before.clone()).unwrap();
    scheme.advance();

    apply_boundaries(&mut before);
    let after = scheme.density();
    for j in 1..before.len() - 1 {
        let expected = 0.5 * (before[j + 1] + before[j - 1])
            - ratio * 2.0 * (before[j + 1] - before[j - 1]);
        assert_relative_eq!(after[j], expected, epsilon = 1e-15);
    }
}

#[test]
fn stable_runs_stay_within_physical_bounds() {
    let spacings = [1.0, 5.0, 10.0];
    let exponents = [1.0, 2.0, 3.0, 5.0];
    let courant_numbers = [0.25, 0.5, 0.9, 1.0];

    for dx in spacings {
        for p in exponents {
            for courant in courant_numbers {
                let flux = PowerLaw { p };
                let dt = courant * dx / flux.max_wave_speed();
                let config = Config::new(dt, dx, 300, 5).unwrap();
                assert_relative_eq!(config.courant_number(&flux), courant, epsilon = 1e-12);

                let solution = solve_unobserved(&flux, step_profile(61, 30), &config).unwrap();

                for frame in &solution.frames {
                    for (j, u) in frame.density.iter().enumerate() {
                        assert!(
                            (-1e-12..=U_MAX + 1e-12).contains(u),
                            "u[{j}] = {u} out of bounds at step {} (dx={dx}, p={p}, C={courant})",
                            frame.step,
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn observer_can_stop_early() {
    let config = Config::new(0.01, 5.0, 100, 10).unwrap();

    let observer = |event: &Event<'_>| (event.step >= 35).then_some(Action::StopEarly);
    let solution = solve(PowerLaw { p: 1.0 }, step_profile(21, 10), &config, observer).unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.steps, 35);
    assert_eq!(solution.frames.len(), 4); // steps 0, 10, 20, 30
}

#[test]
fn zero_steps_returns_initial_state() {
    let config = Config::new(0.01, 5.0, 0, 10).unwrap();
    let initial = step_profile(11, 5);

    let solution = solve_unobserved(PowerLaw { p: 1.0 }, initial.clone(), &config).unwrap();

    assert_eq!(solution.steps, 0);
    assert_eq!(solution.frames.len(), 1);
    assert_eq!(solution.frames[0].density, initial);
}

#[test]
fn rejects_grids_without_interior() {
    let config = Config::new(0.01, 5.0, 10, 1).unwrap();
    let result = solve_unobserved(PowerLaw { p: 1.0 }, vec![U_MAX, 0.0], &config);
    assert_eq!(result.unwrap_err(), Error::TooFewCells { cells: 2 });
}
