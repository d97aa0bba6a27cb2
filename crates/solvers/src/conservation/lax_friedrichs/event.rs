/// Event emitted by the Lax–Friedrichs solver.
///
/// Step 0 is the initial state. Steps `1..=N` follow each update, after the
/// boundary policy has been imposed on the new field.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// The update count (0 for the initial state).
    pub step: usize,

    /// Simulated time, `step * dt`.
    pub time: f64,

    /// The density field after this step.
    pub density: &'a [f64],

    /// Whether this step was sampled into the solution.
    pub sampled: bool,
}
