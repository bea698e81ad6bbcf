use std::collections::VecDeque;
use std::marker::PhantomData;
use std::time::Instant;

use indexmap::IndexMap;
use log::{debug, trace};
use sliding_board::{Board, Game, RobotsState, Waypoint, MAX_WAYPOINT};

use crate::util::{Node, NodeArena, NodeIndex, VisitedBitSet, VisitedStates};
use crate::{SearchConfig, Solution, SolveError, Solver, Statistics};

/// Finds an optimal solution by visiting all possible game states in order of moves needed to
/// reach them.
///
/// The number of waypoints reached is part of every state, so a state before and after reaching
/// a waypoint are different nodes of the search. Reaching a waypoint does not cost a move.
#[derive(Debug, Clone)]
pub struct BreadthFirst<V = VisitedBitSet> {
    config: SearchConfig,
    visited: PhantomData<fn() -> V>,
}

impl Solver for BreadthFirst {
    fn solve(&mut self, game: &Game) -> Result<Solution, SolveError> {
        self.search(game.board(), game.initial_state(), &game.waypoints())
    }
}

impl BreadthFirst {
    /// Create a new solver which uses a breadth first search to find an optimal solution.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }
}

impl<V: VisitedStates + Default> BreadthFirst<V> {
    /// Create a new solver using `config` and `V` to remember visited states.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            visited: PhantomData,
        }
    }

    /// Returns the config of the solver.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches for paths from `start` which reach all `waypoints` in order.
    ///
    /// Without an `extra_depth` the first, shortest path is returned. Otherwise all paths found up
    /// to `extra_depth` moves longer than the shortest are returned, ordered by length. Paths
    /// reaching the same final state through the same search tree are counted once.
    pub fn search<W: Waypoint>(
        &self,
        board: &Board,
        start: RobotsState,
        waypoints: &[W],
    ) -> Result<Solution, SolveError> {
        if waypoints.len() > MAX_WAYPOINT as usize {
            return Err(SolveError::TooManyWaypoints(waypoints.len()));
        }

        let started = Instant::now();
        let mut statistics = Statistics::default();
        let mut visited = V::default();
        let mut nodes = NodeArena::with_capacity(1 << 16);
        let mut queue = VecDeque::with_capacity(1 << 12);
        let mut solutions: Vec<NodeIndex> = Vec::new();
        let mut best_depth = None;

        visited.insert(start);
        queue.push_back(nodes.push(Node::root(start)));

        while let Some(index) = queue.pop_front() {
            let node = nodes[index];
            statistics.states_visited += 1;
            if let Some(max_visited) = self.config.max_visited {
                if statistics.states_visited > max_visited {
                    debug!("Giving up after visiting {} states", max_visited);
                    return Err(SolveError::BudgetExhausted(max_visited));
                }
            }

            let reached = node.state.waypoints() as usize;
            let complete = match waypoints.get(reached) {
                // Only possible for the start without any waypoints.
                None => index,
                Some(waypoint) if waypoint.is_reached(board, node.state) => {
                    let advanced = Node {
                        state: node
                            .state
                            .advance_waypoint()
                            .expect("Failed to advance a waypoint counter below its limit"),
                        ..node
                    };
                    if reached + 1 < waypoints.len() {
                        // Continue from the same cell before any other node of this depth. The
                        // advanced state may already be queued one move deeper, so it is pushed
                        // even if it was visited.
                        visited.insert(advanced.state);
                        statistics.states_created += 1;
                        queue.push_front(nodes.push(advanced));
                        continue;
                    }
                    nodes.push(advanced)
                }
                Some(_) => {
                    for next in board.neighbors(node.state) {
                        statistics.states_seen += 1;
                        if visited.insert(next) {
                            statistics.states_created += 1;
                            queue.push_back(nodes.push(Node {
                                state: next,
                                previous: Some(index),
                                depth: node.depth + 1,
                            }));
                        }
                    }
                    continue;
                }
            };

            let best = *best_depth.get_or_insert(node.depth);
            match self.config.extra_depth {
                None => {
                    solutions.push(complete);
                    break;
                }
                Some(extra) if node.depth > best + extra => break,
                Some(_) => {
                    trace!("Found a solution with {} moves", node.depth);
                    solutions.push(complete);
                }
            }
        }

        let best = match best_depth {
            Some(best) => best,
            None => {
                debug!(
                    "No solution after visiting {} states",
                    statistics.states_visited
                );
                return Err(SolveError::NoSolution);
            }
        };

        let mut counts = IndexMap::new();
        for &index in &solutions {
            *counts.entry(nodes[index].depth).or_insert(0) += 1;
        }
        statistics.solution_length = best;
        statistics.time = started.elapsed();
        debug!(
            "Found {} solutions with {} to {} moves in {:?}, visited {} states",
            solutions.len(),
            best,
            counts.keys().last().copied().unwrap_or(best),
            statistics.time,
            statistics.states_visited
        );
        statistics.solution_length_counts = counts;

        let paths = solutions
            .iter()
            .map(|&index| nodes.path_to(index))
            .collect();
        Ok(Solution::new(paths, statistics))
    }
}

impl Default for BreadthFirst {
    fn default() -> Self {
        Self::new()
    }
}
