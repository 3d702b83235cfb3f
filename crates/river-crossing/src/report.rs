//! Result formatting.
//!
//! A report maps each path index to its state, so the JSON form is
//! `{"path": {"0": {...}, "1": {...}}, "states_generated": n}`, or
//! `{"path": null, ...}` when the search found nothing.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use crate::search::SearchOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report<S> {
    pub path: Option<BTreeMap<usize, S>>,
    pub states_generated: usize,
}

impl<S> Report<S> {
    pub fn new(outcome: SearchOutcome<S>) -> Self {
        let path = outcome
            .solution
            .into_path()
            .map(|states| states.into_iter().enumerate().collect());
        Self {
            path,
            states_generated: outcome.states_generated,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.path.is_some()
    }

    /// Number of moves in the solution
    pub fn moves(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len().saturating_sub(1))
    }
}

impl<S: Clone> Report<S> {
    /// Read the path back by index, `0..len` in order.
    ///
    /// Returns `None` if there is no solution or an index is missing.
    pub fn states(&self) -> Option<Vec<S>> {
        let path = self.path.as_ref()?;
        (0..path.len()).map(|i| path.get(&i).cloned()).collect()
    }
}

impl<S: Display> Report<S> {
    /// Plain-text rendering, one step per line
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match &self.path {
            Some(path) => {
                let width = path.len().saturating_sub(1).to_string().len();
                for (index, state) in path {
                    out.push_str(&format!("step {:>width$}: {}\n", index, state, width = width));
                }
                out.push_str(&format!("moves: {}\n", path.len().saturating_sub(1)));
            }
            None => out.push_str("no solution\n"),
        }
        out.push_str(&format!("states generated: {}\n", self.states_generated));
        out
    }
}
