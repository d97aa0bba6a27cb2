/// Control actions supported by the Lax–Friedrichs solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop marching and return the frames sampled so far.
    StopEarly,
}
