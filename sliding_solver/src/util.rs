use std::collections::HashSet;
use std::hash::BuildHasher;
use std::ops;

use fixedbitset::FixedBitSet;
use sliding_board::{RobotsState, STATE_SPACE};

/// A set of states already known to a search.
///
/// Implemented by [`VisitedBitSet`] and by hash sets of states.
pub trait VisitedStates {
    /// Marks `state` as visited. Returns `true` if it was not visited before.
    fn insert(&mut self, state: RobotsState) -> bool;

    /// Checks if `state` has been visited.
    fn contains(&self, state: RobotsState) -> bool;
}

/// A dense visited set with one bit for every possible state encoding.
///
/// Takes 8 MiB independent of the number of visited states.
#[derive(Debug, Clone)]
pub struct VisitedBitSet {
    bits: FixedBitSet,
}

impl VisitedBitSet {
    /// Creates an empty set able to hold every state.
    pub fn new() -> Self {
        Self {
            bits: FixedBitSet::with_capacity(STATE_SPACE),
        }
    }

    /// Returns the number of visited states.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Checks if no state has been visited.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VisitedBitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitedStates for VisitedBitSet {
    #[inline(always)]
    fn insert(&mut self, state: RobotsState) -> bool {
        !self.bits.put(state.encoded() as usize)
    }

    #[inline(always)]
    fn contains(&self, state: RobotsState) -> bool {
        self.bits.contains(state.encoded() as usize)
    }
}

impl<S: BuildHasher> VisitedStates for HashSet<RobotsState, S> {
    #[inline(always)]
    fn insert(&mut self, state: RobotsState) -> bool {
        HashSet::insert(self, state)
    }

    #[inline(always)]
    fn contains(&self, state: RobotsState) -> bool {
        HashSet::contains(self, &state)
    }
}

/// Index of a [`Node`] inside a [`NodeArena`].
pub(crate) type NodeIndex = usize;

/// A state reached by the search together with the node it was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    pub state: RobotsState,
    pub previous: Option<NodeIndex>,
    pub depth: usize,
}

impl Node {
    /// Creates the node a search starts from.
    pub fn root(state: RobotsState) -> Self {
        Self {
            state,
            previous: None,
            depth: 0,
        }
    }
}

/// Stores all nodes created during a search so paths can be rebuilt by following the `previous`
/// links.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Creates a new arena with space for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Adds `node` and returns its index.
    pub fn push(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Returns the states from the root to the node at `index`, both included.
    ///
    /// # Panics
    /// Panics if `index` is not a node of this arena.
    pub fn path_to(&self, index: NodeIndex) -> Vec<RobotsState> {
        let mut path = Vec::with_capacity(self[index].depth + 1);
        let mut current = Some(index);

        // Create the path by following the previous nodes.
        while let Some(index) = current {
            let node = &self[index];
            path.push(node.state);
            current = node.previous;
        }

        path.reverse();
        path
    }
}

impl ops::Index<NodeIndex> for NodeArena {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}
