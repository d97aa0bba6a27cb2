/// Errors that can occur when starting a Lax–Friedrichs run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("grid needs at least 3 cells to have an interior, got {cells}")]
    TooFewCells { cells: usize },
}
