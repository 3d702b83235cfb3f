//! Request handling: validate a puzzle request, run the chosen strategy and
//! format the result.
//!
//! Requests use the field names of the original JSON API. Counts are read
//! as signed integers so negative values are reported as invalid parameters
//! rather than as parse failures.

use log::{info, warn};
use serde::Deserialize;

use crate::error::SolveError;
use crate::husbands::{JealousHusbands, JealousState};
use crate::missionary::{MissionaryCannibal, MissionaryState};
use crate::puzzle::{Side, Strategy, DEFAULT_BOAT_CAPACITY};
use crate::report::Report;
use crate::search::{search, StateSpace};

fn default_boat_capacity() -> i64 {
    DEFAULT_BOAT_CAPACITY as i64
}

/// Missionaries-and-Cannibals request
#[derive(Debug, Clone, Deserialize)]
pub struct MissionaryRequest {
    #[serde(rename = "M_total")]
    pub m_total: i64,
    #[serde(rename = "C_total")]
    pub c_total: i64,
    #[serde(rename = "M_left", default)]
    pub m_left: Option<i64>,
    #[serde(rename = "C_left", default)]
    pub c_left: Option<i64>,
    #[serde(rename = "M_right", default)]
    pub m_right: Option<i64>,
    #[serde(rename = "C_right", default)]
    pub c_right: Option<i64>,
    #[serde(default)]
    pub boat_position: Side,
    #[serde(default = "default_boat_capacity")]
    pub boat_capacity: i64,
    pub solver: String,
}

impl MissionaryRequest {
    pub fn from_json(json: &str) -> Result<Self, SolveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the puzzle instance, filling in a missing distribution.
    ///
    /// With neither side given everyone starts on the left; with one side
    /// given the other side holds the rest.
    pub fn to_puzzle(&self) -> Result<MissionaryCannibal, SolveError> {
        let m_total = to_count("M_total", self.m_total)?;
        let c_total = to_count("C_total", self.c_total)?;
        let boat_capacity = to_count("boat_capacity", self.boat_capacity)?;

        let (m_left, m_right) = split("M", self.m_total, self.m_left, self.m_right)?;
        let (c_left, c_right) = split("C", self.c_total, self.c_left, self.c_right)?;

        let start = MissionaryState::new(m_left, c_left, m_right, c_right, self.boat_position);
        MissionaryCannibal::with_start(m_total, c_total, boat_capacity, start)
    }
}

/// Jealous Husbands request
#[derive(Debug, Clone, Deserialize)]
pub struct JealousRequest {
    pub num_of_couples: i64,
    #[serde(default = "default_boat_capacity")]
    pub boat_capacity: i64,
    pub solver: String,
}

impl JealousRequest {
    pub fn from_json(json: &str) -> Result<Self, SolveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_puzzle(&self) -> Result<JealousHusbands, SolveError> {
        let couples = to_count("num_of_couples", self.num_of_couples)?;
        let boat_capacity = to_count("boat_capacity", self.boat_capacity)?;
        JealousHusbands::new(couples, boat_capacity)
    }
}

fn to_count(name: &str, value: i64) -> Result<u32, SolveError> {
    if value < 0 {
        return Err(SolveError::invalid(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    u32::try_from(value)
        .map_err(|_| SolveError::invalid(format!("{} is too large: {}", name, value)))
}

/// Resolve the (left, right) counts of one group
fn split(
    group: &str,
    total: i64,
    left: Option<i64>,
    right: Option<i64>,
) -> Result<(u32, u32), SolveError> {
    let remainder = |given: i64| {
        total.checked_sub(given).ok_or_else(|| {
            SolveError::invalid(format!("{}_total - {} is out of range", group, given))
        })
    };
    let (left, right) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        (Some(l), None) => (l, remainder(l)?),
        (None, Some(r)) => (remainder(r)?, r),
        (None, None) => (total, 0),
    };
    Ok((
        to_count(&format!("{}_left", group), left)?,
        to_count(&format!("{}_right", group), right)?,
    ))
}

/// Run `strategy` on an already validated puzzle
pub fn solve<P: StateSpace>(puzzle: &P, strategy: Strategy) -> Report<P::State> {
    Report::new(search(puzzle, strategy))
}

pub fn solve_missionary_cannibal(
    request: &MissionaryRequest,
) -> Result<Report<MissionaryState>, SolveError> {
    let strategy: Strategy = request.solver.parse()?;
    let puzzle = request.to_puzzle()?;

    info!(
        "missionary-cannibal: M={} C={} capacity={} solver={}",
        request.m_total, request.c_total, request.boat_capacity, strategy
    );
    if strategy == Strategy::AStar && puzzle.boat_capacity() != 2 {
        warn!(
            "A* heuristic is only admissible for a two-seat boat, capacity is {}; \
             the path may not be the shortest",
            puzzle.boat_capacity()
        );
    }

    Ok(solve(&puzzle, strategy))
}

pub fn solve_jealous_husbands(
    request: &JealousRequest,
) -> Result<Report<JealousState>, SolveError> {
    let strategy: Strategy = request.solver.parse()?;
    let puzzle = request.to_puzzle()?;

    info!(
        "jealous-husbands: couples={} capacity={} solver={}",
        puzzle.couples(),
        puzzle.boat_capacity(),
        strategy
    );

    Ok(solve(&puzzle, strategy))
}
