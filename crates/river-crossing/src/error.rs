//! Errors reported before a search is started.
//!
//! Failing to find a path is not an error; see [`crate::search::Solution`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    /// The request describes a puzzle that cannot be set up.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The solver selector names no known strategy.
    #[error("unknown strategy {0:?}, expected one of \"bfs\", \"dfs\", \"a_star\"")]
    UnknownStrategy(String),
}

impl SolveError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        SolveError::InvalidParameters(reason.into())
    }

    /// Short machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            SolveError::InvalidParameters(_) => "invalid_parameters",
            SolveError::UnknownStrategy(_) => "unknown_strategy",
        }
    }
}

impl From<serde_json::Error> for SolveError {
    fn from(err: serde_json::Error) -> Self {
        SolveError::InvalidParameters(err.to_string())
    }
}
