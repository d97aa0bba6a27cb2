/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// A sampled copy of the density field.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The update count at which the frame was captured.
    pub step: usize,

    /// Simulated time of the frame.
    pub time: f64,

    /// Density at each grid node, in spatial order.
    pub density: Vec<f64>,
}

/// The result of a Lax–Friedrichs run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the solver terminated.
    pub status: Status,

    /// Sampled frames, strictly increasing in time. The initial state is
    /// always first.
    pub frames: Vec<Frame>,

    /// Number of updates completed.
    pub steps: usize,
}
