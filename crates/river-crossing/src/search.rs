//! Generic state-space search engine.
//!
//! Both puzzles plug into the same three strategies through [`StateSpace`].
//! Every run owns its own frontier, visited and parent structures, so
//! concurrent runs never share search state.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, trace};

use crate::puzzle::Strategy;

/// Capabilities a puzzle exposes to the search strategies
pub trait StateSpace {
    type State: Clone + Eq + Hash + Debug;

    fn start(&self) -> Self::State;

    fn goal(&self) -> Self::State;

    /// All legal states one move away. Duplicates are not filtered here.
    fn next_states(&self, state: &Self::State) -> Vec<Self::State>;

    /// Lower-bound estimate of the moves left, used by A*
    fn heuristic(&self, state: &Self::State) -> u32;
}

/// Search result: either a path from start to goal, or nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution<S> {
    Found(Vec<S>),
    NotFound,
}

impl<S> Solution<S> {
    pub fn path(&self) -> Option<&[S]> {
        match self {
            Solution::Found(path) => Some(path),
            Solution::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<Vec<S>> {
        match self {
            Solution::Found(path) => Some(path),
            Solution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Solution::Found(_))
    }

    /// Number of moves in the path (one less than the number of states)
    pub fn moves(&self) -> Option<usize> {
        self.path().map(|p| p.len().saturating_sub(1))
    }
}

/// Solution plus the number of states the search generated
#[derive(Debug, Clone)]
pub struct SearchOutcome<S> {
    pub solution: Solution<S>,
    pub states_generated: usize,
}

/// A state together with its cost so far and the state it was reached from.
///
/// The parent is held by value and resolved through a parent map.
#[derive(Debug, Clone)]
pub struct SearchNode<S> {
    pub state: S,
    pub g: u32,
    pub parent: Option<S>,
}

impl<S: Clone> SearchNode<S> {
    pub fn root(state: S) -> Self {
        Self {
            state,
            g: 0,
            parent: None,
        }
    }

    pub fn child(&self, state: S) -> Self {
        Self {
            state,
            g: self.g + 1,
            parent: Some(self.state.clone()),
        }
    }
}

/// Run the selected strategy over `space`
pub fn search<P: StateSpace>(space: &P, strategy: Strategy) -> SearchOutcome<P::State> {
    debug!(
        "starting {} search from {:?} to {:?}",
        strategy,
        space.start(),
        space.goal()
    );

    let outcome = match strategy {
        Strategy::Bfs => breadth_first(space),
        Strategy::Dfs => depth_first(space),
        Strategy::AStar => a_star(space),
    };

    debug!(
        "{} search finished: moves={:?}, states_generated={}",
        strategy,
        outcome.solution.moves(),
        outcome.states_generated
    );
    outcome
}

/// Breadth-first search.
///
/// States are marked visited when enqueued, so no state enters the queue
/// twice and the first path to the goal uses the fewest moves.
pub fn breadth_first<P: StateSpace>(space: &P) -> SearchOutcome<P::State> {
    let start = space.start();
    let goal = space.goal();

    // Keys double as the visited set
    let mut parents: HashMap<P::State, Option<P::State>> = HashMap::new();
    parents.insert(start.clone(), None);

    let mut frontier = VecDeque::new();
    frontier.push_back(start);
    let mut states_generated: usize = 1;

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            return found(&parents, current, states_generated);
        }

        trace!("bfs expanding {:?}", current);
        for next in space.next_states(&current) {
            states_generated += 1;
            if let Entry::Vacant(slot) = parents.entry(next.clone()) {
                slot.insert(Some(current.clone()));
                frontier.push_back(next);
            }
        }
    }

    not_found(states_generated)
}

/// Depth-first search with an explicit stack.
///
/// States are marked visited when expanded, so a state may sit on the
/// stack several times. The first path found is returned; it is not
/// necessarily the shortest.
pub fn depth_first<P: StateSpace>(space: &P) -> SearchOutcome<P::State> {
    let goal = space.goal();

    // Parent recorded at expansion; keys are the expanded set
    let mut parents: HashMap<P::State, Option<P::State>> = HashMap::new();
    let mut stack = vec![SearchNode::root(space.start())];
    let mut states_generated: usize = 1;

    while let Some(node) = stack.pop() {
        if parents.contains_key(&node.state) {
            continue;
        }
        parents.insert(node.state.clone(), node.parent.clone());

        if node.state == goal {
            return found(&parents, node.state, states_generated);
        }

        trace!("dfs expanding {:?} at depth {}", node.state, node.g);
        for next in space.next_states(&node.state) {
            states_generated += 1;
            if !parents.contains_key(&next) {
                stack.push(node.child(next));
            }
        }
    }

    not_found(states_generated)
}

/// Heap entry for A*: lowest `f` first, then earliest insertion
#[derive(Debug)]
struct FrontierEntry<S> {
    f: u32,
    seq: u64,
    node: SearchNode<S>,
}

impl<S> PartialEq for FrontierEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl<S> Eq for FrontierEntry<S> {}

impl<S> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for FrontierEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* search ordered by `f = g + h`.
///
/// States are closed when popped; stale heap entries for closed states are
/// skipped. Parents are recorded at first discovery or when a cheaper path
/// to an open state turns up.
pub fn a_star<P: StateSpace>(space: &P) -> SearchOutcome<P::State> {
    let start = space.start();
    let goal = space.goal();

    let mut g_cost: HashMap<P::State, u32> = HashMap::new();
    let mut parents: HashMap<P::State, Option<P::State>> = HashMap::new();
    let mut closed: HashSet<P::State> = HashSet::new();
    let mut frontier = BinaryHeap::new();
    let mut seq: u64 = 0;

    g_cost.insert(start.clone(), 0);
    parents.insert(start.clone(), None);
    frontier.push(FrontierEntry {
        f: space.heuristic(&start),
        seq,
        node: SearchNode::root(start),
    });
    let mut states_generated: usize = 1;

    while let Some(FrontierEntry { node, f, .. }) = frontier.pop() {
        if !closed.insert(node.state.clone()) {
            continue;
        }

        if node.state == goal {
            return found(&parents, node.state, states_generated);
        }

        trace!("a* expanding {:?} with f={} g={}", node.state, f, node.g);
        for next in space.next_states(&node.state) {
            if closed.contains(&next) {
                continue;
            }

            let tentative_g = node.g + 1;
            let improved = g_cost.get(&next).map_or(true, |&g| tentative_g < g);
            if !improved {
                continue;
            }

            g_cost.insert(next.clone(), tentative_g);
            parents.insert(next.clone(), Some(node.state.clone()));
            seq += 1;
            frontier.push(FrontierEntry {
                f: tentative_g + space.heuristic(&next),
                seq,
                node: node.child(next),
            });
            states_generated += 1;
        }
    }

    not_found(states_generated)
}

fn found<S: Clone + Eq + Hash>(
    parents: &HashMap<S, Option<S>>,
    goal: S,
    states_generated: usize,
) -> SearchOutcome<S> {
    SearchOutcome {
        solution: Solution::Found(reconstruct_path(parents, goal)),
        states_generated,
    }
}

fn not_found<S>(states_generated: usize) -> SearchOutcome<S> {
    SearchOutcome {
        solution: Solution::NotFound,
        states_generated,
    }
}

/// Walk parent links back from `goal` and return the path start-first
fn reconstruct_path<S: Clone + Eq + Hash>(parents: &HashMap<S, Option<S>>, goal: S) -> Vec<S> {
    let mut path = vec![goal];
    while let Some(Some(parent)) = path.last().and_then(|s| parents.get(s)) {
        path.push(parent.clone());
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Directed graph over node indices, heuristic always zero
    struct Graph {
        edges: Vec<Vec<usize>>,
        start: usize,
        goal: usize,
    }

    impl StateSpace for Graph {
        type State = usize;

        fn start(&self) -> usize {
            self.start
        }

        fn goal(&self) -> usize {
            self.goal
        }

        fn next_states(&self, state: &usize) -> Vec<usize> {
            self.edges[*state].clone()
        }

        fn heuristic(&self, _state: &usize) -> u32 {
            0
        }
    }

    /// 0 -> 1 -> 2 -> 3 -> 5 (long way) and 0 -> 4 -> 5 (short way),
    /// with a cycle 2 -> 0 and an isolated node 6.
    fn create_test_graph(goal: usize) -> Graph {
        Graph {
            edges: vec![
                vec![4, 1],
                vec![2],
                vec![0, 3],
                vec![5],
                vec![5],
                vec![],
                vec![],
            ],
            start: 0,
            goal,
        }
    }

    #[test]
    fn test_bfs_finds_shortest_path() {
        let graph = create_test_graph(5);
        let outcome = breadth_first(&graph);

        assert_eq!(outcome.solution, Solution::Found(vec![0, 4, 5]));
        assert_eq!(outcome.solution.moves(), Some(2));
    }

    #[test]
    fn test_bfs_counts_every_generated_state() {
        let graph = create_test_graph(5);
        let outcome = breadth_first(&graph);

        // start, 4 and 1 from 0, 5 from 4, 2 from 1
        assert_eq!(outcome.states_generated, 5);
    }

    #[test]
    fn test_dfs_takes_last_pushed_branch_first() {
        let graph = create_test_graph(5);
        let outcome = depth_first(&graph);

        // 1 is pushed after 4, so the long way is explored first
        assert_eq!(outcome.solution, Solution::Found(vec![0, 1, 2, 3, 5]));
    }

    #[test]
    fn test_a_star_with_zero_heuristic_matches_bfs_length() {
        let graph = create_test_graph(5);
        let bfs = breadth_first(&graph);
        let astar = a_star(&graph);

        assert_eq!(astar.solution.moves(), bfs.solution.moves());
        assert_eq!(astar.solution.path().unwrap().last(), Some(&5));
    }

    #[test]
    fn test_unreachable_goal_is_not_found() {
        let graph = create_test_graph(6);

        for strategy in Strategy::ALL {
            let outcome = search(&graph, strategy);
            assert_eq!(outcome.solution, Solution::NotFound, "{}", strategy);
            assert!(outcome.states_generated >= 1);
        }
    }

    #[test]
    fn test_start_is_goal() {
        let graph = create_test_graph(0);

        for strategy in Strategy::ALL {
            let outcome = search(&graph, strategy);
            assert_eq!(outcome.solution, Solution::Found(vec![0]));
            assert_eq!(outcome.states_generated, 1);
        }
    }

    #[test]
    fn test_frontier_entry_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { f: 3, seq: 0, node: SearchNode::root('a') });
        heap.push(FrontierEntry { f: 1, seq: 1, node: SearchNode::root('b') });
        heap.push(FrontierEntry { f: 1, seq: 2, node: SearchNode::root('c') });

        let order: Vec<char> = std::iter::from_fn(|| heap.pop().map(|e| e.node.state)).collect();
        assert_eq!(order, vec!['b', 'c', 'a']);
    }

    #[test]
    fn test_search_node_child() {
        let root = SearchNode::root(7usize);
        let child = root.child(8);

        assert_eq!(child.g, 1);
        assert_eq!(child.parent, Some(7));
    }
}
