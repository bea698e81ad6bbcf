//! Counting how often a moved robot ends up right next to another robot.
//!
//! A robot stopped by another robot instead of a blocker or the edge of the board is harder to
//! spot when looking for a solution. After every move the moved robot is compared with all other
//! robots: a vertical move bumps into a robot directly above or below, a horizontal move into a
//! robot directly to the left or right.

use sliding_board::moves::{moves_of, Move};
use sliding_board::RobotsState;

/// Counts the bumps along all moves of `path`.
///
/// # Panics
/// Panics if two consecutive states of `path` are not connected by a single move.
pub fn count_bumps(path: &[RobotsState]) -> usize {
    moves_of(path)
        .iter()
        .zip(path.iter().skip(1))
        .map(|(movement, &state)| bumps_after(movement, state))
        .sum()
}

/// Counts the robots the robot moved by `movement` bumps into in `state`.
pub fn bumps_after(movement: &Move, state: RobotsState) -> usize {
    let adjacent = if movement.direction().is_vertical() {
        (0, 1)
    } else {
        (1, 0)
    };
    state
        .positions()
        .enumerate()
        .filter(|&(robot, position)| {
            robot != movement.robot() && movement.to().distance(position) == adjacent
        })
        .count()
}

#[cfg(test)]
mod tests {
    use sliding_board::moves::Move;
    use sliding_board::{Game, RobotsState};
    use sliding_solver::{BreadthFirst, Solver};

    use super::{bumps_after, count_bumps};

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

    fn solved_bumps(game: &Game) -> usize {
        let solution = BreadthFirst::new().solve(game).unwrap();
        count_bumps(solution.path())
    }

    fn state(positions: &[(u8, u8)]) -> RobotsState {
        RobotsState::encode(positions, 0).unwrap()
    }

    #[test_log::test]
    fn many_bumps() {
        let game = Game::from_2d_map(MANY_BUMPS).unwrap();
        assert_eq!(solved_bumps(&game), 6);
    }

    #[test_log::test]
    fn solved_games() {
        for (game, bumps) in [
            ("m:4:4,b:1:0,b:1:1,b:2:1,b:0:3,r:0:0,g:2:0", 0),
            (
                "m:8:8,b:1:0,b:4:0,b:5:1,b:3:3,b:3:4,b:3:5,b:6:7,b:7:7,h:3:0,h:5:7,r:6:1,g:0:1",
                3,
            ),
            ("seed:8:8:EO8T-0MXD", 3),
            (
                "m:8:8,b:4:0,b:5:0,b:5:1,b:3:3,b:5:4,b:0:5,b:1:5,b:2:5,h:6:4,h:2:6,r:6:2,g:2:3",
                4,
            ),
        ] {
            assert_eq!(solved_bumps(&Game::parse(game).unwrap()), bumps, "{}", game);
        }
    }

    #[test_log::test]
    fn helper_order_does_not_matter() {
        let game = Game::from_2d_map(MANY_BUMPS).unwrap();
        let solution = BreadthFirst::new().solve(&game).unwrap();
        let swapped = solution
            .path()
            .iter()
            .map(|state| {
                let (positions, waypoints) = state.decode();
                RobotsState::encode(&[positions[0], positions[2], positions[1]], waypoints)
                    .unwrap()
            })
            .collect::<Vec<_>>();
        assert_eq!(count_bumps(&swapped), count_bumps(solution.path()));
    }

    #[test]
    fn bumps_on_the_axis_of_motion() {
        // The main robot slides down onto the helper.
        let before = state(&[(1, 0), (1, 3), (0, 2)]);
        let after = state(&[(1, 2), (1, 3), (0, 2)]);
        let movement = Move::between(before, after).unwrap();
        assert_eq!(bumps_after(&movement, after), 1);
        assert_eq!(count_bumps(&[before, after]), 1);

        // A robot beside the path of a vertical move is not bumped into.
        let before = state(&[(1, 0), (2, 3), (0, 2)]);
        let after = state(&[(1, 2), (2, 3), (0, 2)]);
        assert_eq!(count_bumps(&[before, after]), 0);

        // Sliding left stops next to both other robots, only one lies on the axis.
        let before = state(&[(3, 2), (1, 3), (0, 2)]);
        let after = state(&[(1, 2), (1, 3), (0, 2)]);
        assert_eq!(count_bumps(&[before, after]), 1);
    }

    #[test]
    fn short_paths() {
        assert_eq!(count_bumps(&[]), 0);
        assert_eq!(count_bumps(&[state(&[(0, 0)])]), 0);
    }
}
