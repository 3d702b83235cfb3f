//! Missionaries and Cannibals.
//!
//! A state is the head count of each group on each bank plus the boat side.
//! Missionaries are lost on any bank where they are present and outnumbered.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::SolveError;
use crate::puzzle::Side;
use crate::search::StateSpace;

/// Boat loads as (missionaries, cannibals)
pub type Moves = SmallVec<[(u32, u32); 8]>;

/// Bank occupancy and boat position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissionaryState {
    #[serde(rename = "M_left")]
    pub m_left: u32,
    #[serde(rename = "C_left")]
    pub c_left: u32,
    #[serde(rename = "M_right")]
    pub m_right: u32,
    #[serde(rename = "C_right")]
    pub c_right: u32,
    #[serde(rename = "boat_position")]
    pub boat: Side,
}

impl MissionaryState {
    pub fn new(m_left: u32, c_left: u32, m_right: u32, c_right: u32, boat: Side) -> Self {
        Self {
            m_left,
            c_left,
            m_right,
            c_right,
            boat,
        }
    }

    /// People still on the left bank
    pub fn people_left(&self) -> u32 {
        self.m_left + self.c_left
    }

    /// Ferry `missionaries` and `cannibals` from the boat's bank to the other.
    ///
    /// Returns `None` if the boat's bank does not hold that many people.
    pub fn ferry(&self, missionaries: u32, cannibals: u32) -> Option<Self> {
        let next = match self.boat {
            Side::Left => Self {
                m_left: self.m_left.checked_sub(missionaries)?,
                c_left: self.c_left.checked_sub(cannibals)?,
                m_right: self.m_right + missionaries,
                c_right: self.c_right + cannibals,
                boat: Side::Right,
            },
            Side::Right => Self {
                m_left: self.m_left + missionaries,
                c_left: self.c_left + cannibals,
                m_right: self.m_right.checked_sub(missionaries)?,
                c_right: self.c_right.checked_sub(cannibals)?,
                boat: Side::Left,
            },
        };
        Some(next)
    }
}

impl fmt::Display for MissionaryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.m_left, self.c_left, self.m_right, self.c_right, self.boat
        )
    }
}

/// A bank is safe when it has no missionaries or they are not outnumbered
fn bank_is_safe(missionaries: u32, cannibals: u32) -> bool {
    missionaries == 0 || cannibals <= missionaries
}

/// Every load with `1 <= missionaries + cannibals <= boat_capacity`
pub fn possible_moves(boat_capacity: u32) -> Moves {
    let mut moves = Moves::new();
    for i in 0..=boat_capacity {
        for j in 0..=boat_capacity - i {
            if i + j > 0 {
                moves.push((i, j));
            }
        }
    }
    moves
}

/// A Missionaries-and-Cannibals instance
#[derive(Debug, Clone)]
pub struct MissionaryCannibal {
    m_total: u32,
    c_total: u32,
    boat_capacity: u32,
    start: MissionaryState,
    moves: Moves,
}

impl MissionaryCannibal {
    /// Everyone starts on the left bank with the boat
    pub fn new(m_total: u32, c_total: u32, boat_capacity: u32) -> Result<Self, SolveError> {
        let start = MissionaryState::new(m_total, c_total, 0, 0, Side::Left);
        Self::with_start(m_total, c_total, boat_capacity, start)
    }

    /// Start from an explicit distribution.
    ///
    /// The distribution must account for every person and be legal.
    pub fn with_start(
        m_total: u32,
        c_total: u32,
        boat_capacity: u32,
        start: MissionaryState,
    ) -> Result<Self, SolveError> {
        if boat_capacity == 0 {
            return Err(SolveError::invalid("boat_capacity must be at least 1"));
        }
        if start.m_left.checked_add(start.m_right) != Some(m_total) {
            return Err(SolveError::invalid(format!(
                "M_left = {} and M_right = {} do not add up to M_total = {}",
                start.m_left, start.m_right, m_total
            )));
        }
        if start.c_left.checked_add(start.c_right) != Some(c_total) {
            return Err(SolveError::invalid(format!(
                "C_left = {} and C_right = {} do not add up to C_total = {}",
                start.c_left, start.c_right, c_total
            )));
        }
        let people = m_total.checked_add(c_total).ok_or_else(|| {
            SolveError::invalid(format!(
                "M_total + C_total is out of range: {} + {}",
                m_total, c_total
            ))
        })?;

        let puzzle = Self {
            m_total,
            c_total,
            boat_capacity,
            start,
            // seats beyond the head count never change the move set
            moves: possible_moves(boat_capacity.min(people)),
        };
        if !puzzle.is_valid(&start) {
            return Err(SolveError::invalid(format!(
                "start state {} leaves missionaries outnumbered",
                start
            )));
        }
        Ok(puzzle)
    }

    pub fn boat_capacity(&self) -> u32 {
        self.boat_capacity
    }

    /// Legality check: counts within totals and no endangered bank
    pub fn is_valid(&self, state: &MissionaryState) -> bool {
        if state.m_left > self.m_total
            || state.c_left > self.c_total
            || state.m_right > self.m_total
            || state.c_right > self.c_total
        {
            return false;
        }
        if state.m_left.checked_add(state.m_right) != Some(self.m_total)
            || state.c_left.checked_add(state.c_right) != Some(self.c_total)
        {
            return false;
        }

        bank_is_safe(state.m_left, state.c_left) && bank_is_safe(state.m_right, state.c_right)
    }
}

impl StateSpace for MissionaryCannibal {
    type State = MissionaryState;

    fn start(&self) -> MissionaryState {
        self.start
    }

    fn goal(&self) -> MissionaryState {
        MissionaryState::new(0, 0, self.m_total, self.c_total, Side::Right)
    }

    fn next_states(&self, state: &MissionaryState) -> Vec<MissionaryState> {
        self.moves
            .iter()
            .filter_map(|&(m, c)| state.ferry(m, c))
            .filter(|next| self.is_valid(next))
            .collect()
    }

    /// `ceil(people on the left bank / 2)`.
    ///
    /// A lower bound on the crossings left only for a two-seat boat; larger
    /// boats can overestimate.
    fn heuristic(&self, state: &MissionaryState) -> u32 {
        state.people_left().div_ceil(2)
    }
}
