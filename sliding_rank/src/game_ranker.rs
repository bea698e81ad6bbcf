use getset::Getters;
use itertools::Itertools;
use log::debug;
use sliding_board::Game;
use sliding_solver::Solution;

use crate::bumps::count_bumps;
use crate::multidim::{MultiDimRanking, Rank, RankValue};

/// A game together with a solution of it.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct GameWithSolution {
    /// The solved game.
    game: Game,
    /// A solution of `game`.
    solution: Solution,
}

impl GameWithSolution {
    /// Pairs `game` with its `solution`.
    pub fn new(game: Game, solution: Solution) -> Self {
        Self { game, solution }
    }

    /// Returns the number of moves of the shortest solution.
    pub fn moves(&self) -> usize {
        self.solution.statistics().solution_length()
    }

    /// Returns the number of bumps along the shortest solution.
    pub fn bumps(&self) -> usize {
        count_bumps(self.solution.path())
    }

    /// Returns the number of solutions `extra` moves longer than the shortest one.
    pub fn solutions(&self, extra: usize) -> usize {
        self.solution.statistics().solution_length_count(extra)
    }
}

/// A game at its place in a ranking, with its values on all axes of the ranking.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct RankedGame {
    /// The game and its solution.
    game: GameWithSolution,
    /// Values of the game on the axes of the [`GameRanker`], in order.
    values: Vec<RankValue>,
}

impl RankedGame {
    /// Describes the values on all axes in one line.
    pub fn describe(&self) -> String {
        self.values.iter().join(" ")
    }
}

/// Orders solved games from easy to hard.
///
/// The axes are, in order:
/// - `Moves`: the length of the solution, games up to 4 moves apart are only equal when they have
///   the same length, up to 6 moves when they differ by at most one and longer ones by two.
/// - `Bumps`: the number of bumps, equal within one bump.
/// - `Solutions_0`: the number of shortest solutions, more is easier.
/// - `Solutions_1`, `Solutions_2`: the number of solutions one or two moves longer than the
///   shortest, equal within 5% and 10%.
/// - `MovesFinal`: the length of the solution without any tolerance.
///
/// The solution counts are only meaningful if the games were solved with an `extra_depth` of at
/// least two.
#[derive(Debug)]
pub struct GameRanker {
    ranking: MultiDimRanking<GameWithSolution>,
}

impl GameRanker {
    /// Creates a new ranker.
    pub fn new() -> Self {
        let ranking = MultiDimRanking::new(vec![
            Rank::new(
                "Moves",
                |game: &GameWithSolution| game.moves() as f64,
                |moves| {
                    if moves <= 4.0 {
                        0.0
                    } else if moves <= 6.0 {
                        1.0
                    } else {
                        2.0
                    }
                },
            ),
            Rank::new(
                "Bumps",
                |game: &GameWithSolution| game.bumps() as f64,
                |_| 1.0,
            ),
            Rank::new(
                "Solutions_0",
                |game: &GameWithSolution| -(game.solutions(0) as f64),
                |_| 0.0,
            ),
            Rank::new(
                "Solutions_1",
                |game: &GameWithSolution| -(game.solutions(1) as f64),
                |count| count * 0.05,
            ),
            Rank::new(
                "Solutions_2",
                |game: &GameWithSolution| -(game.solutions(2) as f64),
                |count| count * 0.10,
            ),
            Rank::new(
                "MovesFinal",
                |game: &GameWithSolution| game.moves() as f64,
                |_| 0.0,
            ),
        ]);
        Self { ranking }
    }

    /// Ranks `games`, easiest first.
    pub fn rank(&self, games: Vec<GameWithSolution>) -> Vec<RankedGame> {
        let ranking = self.ranking.rank(games);
        debug!(
            "Ranked {} games into {} groups",
            ranking.len(),
            ranking.group_ranges().len()
        );
        ranking
            .into_elements()
            .into_iter()
            .map(|game| RankedGame {
                values: self.ranking.values_of(&game),
                game,
            })
            .collect()
    }
}

impl Default for GameRanker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use sliding_board::Game;
    use sliding_solver::{BreadthFirst, SearchConfig, Solver};

    use super::{GameRanker, GameWithSolution};

    const MANY_BUMPS: &str = "
        . . . . . . b .
        . r . . b b . .
        b . . b . . . .
        h . . . . . b .
        . . . . h . . .
        . . . . . . . .
        . . . . . . g .
        b . . b . . . .
        ";
    const SMALL_ONE_WAY: &str = "m:4:4:oneway,b:1:0,b:1:1,b:2:1,b:0:3,r:0:0,g:2:0";
    const NON_GREEDY: &str =
        "m:8:8,b:1:0,b:4:0,b:5:1,b:3:3,b:3:4,b:3:5,b:6:7,b:7:7,h:3:0,h:5:7,r:6:1,g:0:1";
    const FIFTEEN_MOVES: &str =
        "m:8:8,b:4:0,b:5:0,b:5:1,b:3:3,b:5:4,b:0:5,b:1:5,b:2:5,h:6:4,h:2:6,r:6:2,g:2:3";

    fn solved(game: Game) -> GameWithSolution {
        let solution = BreadthFirst::new().solve(&game).unwrap();
        GameWithSolution::new(game, solution)
    }

    fn solved_near_optimal(game: Game) -> GameWithSolution {
        let solution = BreadthFirst::<sliding_solver::VisitedBitSet>::with_config(
            SearchConfig::with_extra_depth(2),
        )
        .search(game.board(), game.initial_state(), &game.waypoints())
        .unwrap();
        GameWithSolution::new(game, solution)
    }

    #[test_log::test]
    fn short_games_first() {
        let bumpy = Game::from_2d_map(MANY_BUMPS).unwrap();
        let small = Game::parse(SMALL_ONE_WAY).unwrap();

        let ranked = GameRanker::new().rank(vec![solved(bumpy.clone()), solved(small.clone())]);
        assert_eq!(ranked[0].game().game(), &small);
        assert_eq!(ranked[1].game().game(), &bumpy);
        assert!(ranked[1]
            .describe()
            .starts_with("Moves=17 Bumps=6 Solutions_0=-1 "));
        assert!(ranked[1].describe().ends_with(" MovesFinal=17"));
    }

    #[test_log::test]
    fn more_solutions_are_easier() {
        let non_greedy = Game::parse(NON_GREEDY).unwrap();
        let fifteen = Game::parse(FIFTEEN_MOVES).unwrap();

        // Only one solution each is known, the shorter game wins.
        let ranked = GameRanker::new().rank(vec![
            solved(fifteen.clone()),
            solved(non_greedy.clone()),
        ]);
        assert_eq!(ranked[0].game().game(), &non_greedy);

        // Similar length and bumps, but the longer game has three shortest solutions.
        let ranked = GameRanker::new().rank(vec![
            solved_near_optimal(non_greedy.clone()),
            solved_near_optimal(fifteen.clone()),
        ]);
        assert_eq!(ranked[0].game().game(), &fifteen);
        assert_eq!(ranked[0].game().solutions(0), 3);
        assert_eq!(ranked[1].game().game(), &non_greedy);
    }
}
