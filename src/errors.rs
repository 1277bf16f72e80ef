use std::io;

/// Error type covering every way a solve can fail.
///
/// All of these surface as returned values; none are used for control flow
/// inside the solver. `NoSolution` and `Cancelled` are ordinary outcomes of a
/// well-formed solve, while `InvalidGrid` / `InvalidDictionary` reject the
/// inputs themselves.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("invalid grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("invalid dictionary entry: \"{word}\" (only A-Z allowed, non-empty)")]
    InvalidDictionary { word: String },

    #[error("grid contains no slots of length >= 2")]
    NoSlots,

    #[error("search space exhausted without a complete fill")]
    NoSolution,

    #[error("solve cancelled")]
    Cancelled,

    #[error("a solve is already running on this solver instance")]
    Busy,
}

impl SolveError {
    /// Shorthand for grid-shape complaints; keeps call sites one-liners.
    pub(crate) fn bad_grid(reason: impl Into<String>) -> Self {
        SolveError::InvalidGrid { reason: reason.into() }
    }
}

impl From<SolveError> for io::Error {
    fn from(e: SolveError) -> Self {
        // String version is the least fragile (no Send/Sync bounds issues)
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    }
}
