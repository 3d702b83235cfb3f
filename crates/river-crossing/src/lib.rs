//! River-crossing puzzle solver.
//!
//! This crate solves the Missionaries-and-Cannibals and Jealous Husbands
//! puzzles with one generic search engine run breadth-first, depth-first
//! or as A*. Each run returns the solution path (if any) and the number of
//! states it generated.

pub mod error;
pub mod husbands;
pub mod missionary;
pub mod puzzle;
pub mod report;
pub mod search;
pub mod solver;

// Re-export main types
pub use error::SolveError;
pub use husbands::{JealousHusbands, JealousState};
pub use missionary::{MissionaryCannibal, MissionaryState};
pub use puzzle::{Side, Strategy, DEFAULT_BOAT_CAPACITY};
pub use report::Report;
pub use search::{search, SearchNode, SearchOutcome, Solution, StateSpace};
pub use solver::{
    solve, solve_jealous_husbands, solve_missionary_cannibal, JealousRequest, MissionaryRequest,
};
