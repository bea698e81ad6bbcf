mod breadth_first;
pub mod util;

use std::fmt;
use std::time::Duration;

use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use sliding_board::moves::{self, ExportedMove, Move};
use sliding_board::{Game, RobotsState, MAX_WAYPOINT};
use thiserror::Error;

pub use breadth_first::BreadthFirst;
pub use util::{VisitedBitSet, VisitedStates};

pub trait Solver {
    /// Find a shortest sequence of moves from the initial state of `game` which reaches all of its
    /// waypoints in order.
    fn solve(&mut self, game: &Game) -> Result<Solution, SolveError>;
}

/// Reasons a solver returns without a solution.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// Every reachable state has been visited without reaching all waypoints.
    #[error("No solution")]
    NoSolution,
    /// The waypoint counter of a state cannot track this many waypoints.
    #[error("{0} waypoints given but at most {max} can be tracked", max = MAX_WAYPOINT)]
    TooManyWaypoints(usize),
    /// More states were visited than the configured limit allows.
    #[error("Gave up after visiting {0} states")]
    BudgetExhausted(usize),
}

/// Options of a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// `None` stops at the first solution. `Some(n)` keeps collecting every solution up to `n`
    /// moves longer than the shortest one.
    pub extra_depth: Option<usize>,
    /// Upper limit of visited states after which the search gives up.
    pub max_visited: Option<usize>,
}

impl SearchConfig {
    /// Returns a config collecting solutions up to `extra_depth` moves longer than the shortest.
    pub fn with_extra_depth(extra_depth: usize) -> Self {
        Self {
            extra_depth: Some(extra_depth),
            ..Self::default()
        }
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, CopyGetters)]
pub struct Statistics {
    /// Time spent searching.
    #[getset(get_copy = "pub")]
    time: Duration,
    /// Number of moves of the shortest solution.
    #[getset(get_copy = "pub")]
    solution_length: usize,
    /// Number of states taken from the queue.
    #[getset(get_copy = "pub")]
    states_visited: usize,
    /// Number of states added to the queue.
    #[getset(get_copy = "pub")]
    states_created: usize,
    /// Number of neighbor states generated, including already known ones.
    #[getset(get_copy = "pub")]
    states_seen: usize,
    /// Number of solutions found per solution length, ordered by length.
    #[getset(get = "pub")]
    solution_length_counts: IndexMap<usize, usize>,
}

impl Statistics {
    /// Returns the number of solutions `extra` moves longer than the shortest solution.
    pub fn solution_length_count(&self, extra: usize) -> usize {
        self.solution_length_counts
            .get(&(self.solution_length + extra))
            .copied()
            .unwrap_or(0)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Time:            {:?}", self.time)?;
        writeln!(f, "Solution length: {}", self.solution_length)?;
        writeln!(f, "States visited:  {}", self.states_visited)?;
        writeln!(f, "States created:  {}", self.states_created)?;
        writeln!(f, "States seen:     {}", self.states_seen)?;
        write!(f, "Solutions:      ")?;
        for (length, count) in &self.solution_length_counts {
            write!(f, " {}x{}", count, length)?;
        }
        Ok(())
    }
}

/// The solutions found by a search.
///
/// Contains at least one path. The first path is a shortest one, the others are ordered by
/// length. Each path starts with the initial state and ends with a state which reached all
/// waypoints, so its length is the number of moves plus one.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Solution {
    paths: Vec<Vec<RobotsState>>,
    statistics: Statistics,
}

impl Solution {
    /// Creates a new solution.
    ///
    /// # Panics
    /// Panics if `paths` is empty or contains an empty path.
    pub fn new(paths: Vec<Vec<RobotsState>>, statistics: Statistics) -> Self {
        assert!(
            paths.first().map_or(false, |path| !path.is_empty()),
            "A solution needs at least one non-empty path"
        );
        Self { paths, statistics }
    }

    /// Returns the shortest path.
    pub fn path(&self) -> &[RobotsState] {
        &self.paths[0]
    }

    /// Returns the final state of the shortest path.
    pub fn final_state(&self) -> RobotsState {
        *self.path().last().expect("Failed to find the end of a non-empty path")
    }

    /// Returns the number of moves of the shortest path.
    pub fn len(&self) -> usize {
        self.path().len() - 1
    }

    /// Checks if the initial state already reached all waypoints.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the moves of the shortest path.
    pub fn moves(&self) -> Vec<Move> {
        moves::moves_of(self.path())
    }

    /// Returns the moves of the shortest path in their exported form.
    pub fn exported_moves(&self) -> Vec<ExportedMove> {
        self.moves().iter().map(Move::export).collect()
    }

    /// Serializes the moves of the shortest path as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.exported_moves())
    }

    /// Describes the moves of the shortest path, one line per move.
    pub fn describe(&self) -> Vec<String> {
        moves::describe(self.path())
    }
}
