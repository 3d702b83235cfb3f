//! Jealous Husbands.
//!
//! `couples` married pairs cross the river. No wife may be in the company of
//! another man unless her own husband is present, on either bank or in the
//! boat.

use std::fmt;

use serde::ser::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::error::SolveError;
use crate::puzzle::Side;
use crate::search::StateSpace;

/// Largest supported number of couples
pub const MAX_COUPLES: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Person {
    Husband(u8),
    Wife(u8),
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Person::Husband(i) => write!(f, "H{}", i + 1),
            Person::Wife(i) => write!(f, "W{}", i + 1),
        }
    }
}

/// A group of people given as husband and wife bitmasks (bit i = couple i)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Group {
    pub husbands: u32,
    pub wives: u32,
}

impl Group {
    pub fn new(husbands: u32, wives: u32) -> Self {
        Self { husbands, wives }
    }

    pub fn len(&self) -> u32 {
        self.husbands.count_ones() + self.wives.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.husbands == 0 && self.wives == 0
    }

    /// True if every wife is with her husband whenever any man is present
    pub fn is_safe(&self) -> bool {
        self.husbands == 0 || self.wives & !self.husbands == 0
    }

    fn add(&mut self, person: Person) {
        match person {
            Person::Husband(i) => self.husbands |= 1 << i,
            Person::Wife(i) => self.wives |= 1 << i,
        }
    }

    /// Members in couple order, husband before wife
    pub fn people(&self, couples: u8) -> SmallVec<[Person; 32]> {
        let mut people = SmallVec::new();
        for i in 0..couples {
            if self.husbands & (1 << i) != 0 {
                people.push(Person::Husband(i));
            }
            if self.wives & (1 << i) != 0 {
                people.push(Person::Wife(i));
            }
        }
        people
    }
}

/// Who is on the right bank, plus the boat side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JealousState {
    pub couples: u8,
    /// Bit i set: husband i is on the right bank
    pub husbands: u32,
    /// Bit i set: wife i is on the right bank
    pub wives: u32,
    pub boat: Side,
}

impl JealousState {
    /// Everyone on the left bank with the boat
    pub fn all_left(couples: u8) -> Self {
        Self {
            couples,
            husbands: 0,
            wives: 0,
            boat: Side::Left,
        }
    }

    /// Everyone on the right bank with the boat
    pub fn all_right(couples: u8) -> Self {
        let full = full_mask(couples);
        Self {
            couples,
            husbands: full,
            wives: full,
            boat: Side::Right,
        }
    }

    pub fn bank(&self, side: Side) -> Group {
        match side {
            Side::Right => Group::new(self.husbands, self.wives),
            Side::Left => {
                let full = full_mask(self.couples);
                Group::new(!self.husbands & full, !self.wives & full)
            }
        }
    }

    /// Row `load` from the boat's bank to the other one
    pub fn cross(&self, load: Group) -> Self {
        let (husbands, wives) = match self.boat {
            Side::Left => (self.husbands | load.husbands, self.wives | load.wives),
            Side::Right => (self.husbands & !load.husbands, self.wives & !load.wives),
        };
        Self {
            couples: self.couples,
            husbands,
            wives,
            boat: self.boat.other(),
        }
    }
}

impl fmt::Display for JealousState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |side: Side| -> String {
            self.bank(side)
                .people(self.couples)
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(
            f,
            "[{}] | [{}] boat {}",
            names(Side::Left),
            names(Side::Right),
            self.boat
        )
    }
}

/// Wire shape: people listed per bank by name
#[derive(serde::Serialize)]
struct BankView {
    left: Vec<String>,
    right: Vec<String>,
    boat_position: Side,
}

impl Serialize for JealousState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = |side: Side| -> Vec<String> {
            self.bank(side)
                .people(self.couples)
                .iter()
                .map(|p| p.to_string())
                .collect()
        };
        BankView {
            left: names(Side::Left),
            right: names(Side::Right),
            boat_position: self.boat,
        }
        .serialize(serializer)
    }
}

fn full_mask(couples: u8) -> u32 {
    if couples as u32 >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << couples) - 1
    }
}

/// Every combination of 1..=capacity people drawn from `present`
fn boat_loads(present: &[Person], capacity: usize) -> Vec<Group> {
    fn extend(
        present: &[Person],
        capacity: usize,
        first: usize,
        load: &mut SmallVec<[Person; 4]>,
        out: &mut Vec<Group>,
    ) {
        for i in first..present.len() {
            load.push(present[i]);
            let mut group = Group::default();
            for &person in load.iter() {
                group.add(person);
            }
            out.push(group);
            if load.len() < capacity {
                extend(present, capacity, i + 1, load, out);
            }
            load.pop();
        }
    }

    let mut out = Vec::new();
    extend(present, capacity, 0, &mut SmallVec::new(), &mut out);
    out
}

/// A Jealous Husbands instance
#[derive(Debug, Clone)]
pub struct JealousHusbands {
    couples: u8,
    boat_capacity: u32,
}

impl JealousHusbands {
    pub fn new(couples: u32, boat_capacity: u32) -> Result<Self, SolveError> {
        if couples == 0 || couples > MAX_COUPLES {
            return Err(SolveError::invalid(format!(
                "num_of_couples must be between 1 and {}, got {}",
                MAX_COUPLES, couples
            )));
        }
        if boat_capacity == 0 {
            return Err(SolveError::invalid("boat_capacity must be at least 1"));
        }
        Ok(Self {
            couples: couples as u8,
            boat_capacity,
        })
    }

    pub fn couples(&self) -> u8 {
        self.couples
    }

    pub fn boat_capacity(&self) -> u32 {
        self.boat_capacity
    }

    /// Legality check: no wife left with another man on either bank
    pub fn is_valid(&self, state: &JealousState) -> bool {
        let full = full_mask(self.couples);
        state.couples == self.couples
            && state.husbands & !full == 0
            && state.wives & !full == 0
            && state.bank(Side::Left).is_safe()
            && state.bank(Side::Right).is_safe()
    }
}

impl StateSpace for JealousHusbands {
    type State = JealousState;

    fn start(&self) -> JealousState {
        JealousState::all_left(self.couples)
    }

    fn goal(&self) -> JealousState {
        JealousState::all_right(self.couples)
    }

    fn next_states(&self, state: &JealousState) -> Vec<JealousState> {
        let present = state.bank(state.boat).people(self.couples);
        boat_loads(&present, self.boat_capacity as usize)
            .into_iter()
            .filter(Group::is_safe)
            .map(|load| state.cross(load))
            .filter(|next| self.is_valid(next))
            .collect()
    }

    /// `ceil(people on the left bank / boat capacity)`, a count of the
    /// forward crossings still needed
    fn heuristic(&self, state: &JealousState) -> u32 {
        let remaining = state.bank(Side::Left).len();
        remaining.div_ceil(self.boat_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Strategy;
    use crate::search::{search, Solution};

    #[test]
    fn test_group_is_safe() {
        // lone wife, lone husband, two wives, two husbands
        assert!(Group::new(0, 0b001).is_safe());
        assert!(Group::new(0b001, 0).is_safe());
        assert!(Group::new(0, 0b011).is_safe());
        assert!(Group::new(0b011, 0).is_safe());
        // married couple
        assert!(Group::new(0b010, 0b010).is_safe());
        // wife 1 with husband 2
        assert!(!Group::new(0b010, 0b001).is_safe());
        // wife 1 with her husband and husband 2
        assert!(Group::new(0b011, 0b001).is_safe());
        assert!(Group::default().is_empty());
    }

    #[test]
    fn test_is_valid() {
        let puzzle = JealousHusbands::new(3, 2).unwrap();
        assert!(puzzle.is_valid(&puzzle.start()));
        assert!(puzzle.is_valid(&puzzle.goal()));

        // H1 and W2 on the right, W2's husband still left
        let bad = JealousState {
            couples: 3,
            husbands: 0b001,
            wives: 0b010,
            boat: Side::Right,
        };
        assert!(!puzzle.is_valid(&bad));

        // two wives across, their husbands left with the third couple
        let ok = JealousState {
            couples: 3,
            husbands: 0,
            wives: 0b011,
            boat: Side::Right,
        };
        assert!(puzzle.is_valid(&ok));
    }

    #[test]
    fn test_boat_loads() {
        let present = [Person::Husband(0), Person::Wife(0), Person::Husband(1)];
        let loads = boat_loads(&present, 2);

        assert_eq!(loads.len(), 6);
        assert!(loads.iter().all(|l| l.len() >= 1 && l.len() <= 2));

        let loads = boat_loads(&present, 1);
        assert_eq!(loads.len(), 3);
    }

    #[test]
    fn test_next_states_from_start() {
        let puzzle = JealousHusbands::new(2, 2).unwrap();
        let next = puzzle.next_states(&puzzle.start());

        // W1, W2, H1+W1, H1+H2, W1+W2, H2+W2; a husband rowing alone
        // leaves his wife with the other man
        assert_eq!(next.len(), 6);
        assert!(next.iter().all(|s| s.boat == Side::Right));
        assert!(next.iter().all(|s| puzzle.is_valid(s)));
    }

    #[test]
    fn test_no_mixed_pair_of_strangers_in_boat() {
        let puzzle = JealousHusbands::new(3, 2).unwrap();
        let start = puzzle.start();

        for next in puzzle.next_states(&start) {
            let load = next.bank(Side::Right);
            assert!(load.is_safe(), "{}", next);
        }
    }

    #[test]
    fn test_heuristic() {
        let puzzle = JealousHusbands::new(3, 2).unwrap();
        assert_eq!(puzzle.heuristic(&puzzle.start()), 3);
        assert_eq!(puzzle.heuristic(&puzzle.goal()), 0);

        let puzzle = JealousHusbands::new(3, 4).unwrap();
        assert_eq!(puzzle.heuristic(&puzzle.start()), 2);
    }

    #[test]
    fn test_three_couples_solvable() {
        let puzzle = JealousHusbands::new(3, 2).unwrap();

        let bfs = search(&puzzle, Strategy::Bfs);
        let dfs = search(&puzzle, Strategy::Dfs);
        let astar = search(&puzzle, Strategy::AStar);

        let bfs_path = bfs.solution.path().expect("three couples can cross");
        assert_eq!(bfs_path.first(), Some(&puzzle.start()));
        assert_eq!(bfs_path.last(), Some(&puzzle.goal()));
        assert_eq!(bfs.solution.moves(), Some(11));

        assert!(bfs.solution.moves() <= dfs.solution.moves());
        assert_eq!(astar.solution.moves(), bfs.solution.moves());
        for outcome in [&bfs, &dfs, &astar] {
            let path = outcome.solution.path().unwrap();
            assert!(outcome.states_generated >= path.len());
        }
    }

    #[test]
    fn test_paths_only_take_legal_steps() {
        let puzzle = JealousHusbands::new(3, 2).unwrap();

        for strategy in Strategy::ALL {
            let path = search(&puzzle, strategy).solution.into_path().unwrap();
            for pair in path.windows(2) {
                assert!(puzzle.next_states(&pair[0]).contains(&pair[1]), "{}", strategy);
            }
        }
    }

    #[test]
    fn test_single_couple() {
        let puzzle = JealousHusbands::new(1, 2).unwrap();
        let outcome = search(&puzzle, Strategy::Bfs);
        assert_eq!(outcome.solution.moves(), Some(1));
    }

    #[test]
    fn test_four_couples_need_bigger_boat() {
        let puzzle = JealousHusbands::new(4, 2).unwrap();
        for strategy in Strategy::ALL {
            let outcome = search(&puzzle, strategy);
            assert_eq!(outcome.solution, Solution::NotFound, "{}", strategy);
            assert!(outcome.states_generated > 0);
        }

        let puzzle = JealousHusbands::new(4, 3).unwrap();
        assert!(search(&puzzle, Strategy::Bfs).solution.is_found());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            JealousHusbands::new(0, 2),
            Err(SolveError::InvalidParameters(_))
        ));
        assert!(matches!(
            JealousHusbands::new(MAX_COUPLES + 1, 2),
            Err(SolveError::InvalidParameters(_))
        ));
        assert!(matches!(
            JealousHusbands::new(3, 0),
            Err(SolveError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_serializes_banks_by_name() {
        let state = JealousState {
            couples: 2,
            husbands: 0b01,
            wives: 0b01,
            boat: Side::Right,
        };
        let value = serde_json::to_value(state).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "left": ["H2", "W2"],
                "right": ["H1", "W1"],
                "boat_position": "right"
            })
        );
        assert_eq!(state.to_string(), "[H2 W2] | [H1 W1] boat right");
    }
}
