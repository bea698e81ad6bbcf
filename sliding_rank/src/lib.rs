#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! Ranking of solved puzzles by how hard they are to find a solution for.
//!
//! [`MultiDimRanking`] orders arbitrary elements along a list of axes, treating values within an
//! epsilon of each other as equal. [`GameRanker`] uses it with axes derived from a [`Solution`]
//! like its length, the number of bumps (see [`count_bumps`]) and the number of almost optimal
//! solutions.
//!
//! [`Solution`]: sliding_solver::Solution

pub mod bumps;
mod game_ranker;
pub mod multidim;

pub use bumps::count_bumps;
pub use game_ranker::{GameRanker, GameWithSolution, RankedGame};
pub use multidim::{MultiDimRanking, Rank, RankValue, Ranked, Ranking};
