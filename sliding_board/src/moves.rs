//! Moves between consecutive states of a path and their export format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Direction, Position, RobotsState};

/// A single slide of one robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    robot: usize,
    direction: Direction,
    from: Position,
    to: Position,
}

/// Unit vector of a move as exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedDirection {
    /// Change of the column, `-1`, `0` or `1`.
    pub dx: i8,
    /// Change of the row, `-1`, `0` or `1`. Positive is downwards.
    pub dy: i8,
}

/// A cell as exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPosition {
    #[allow(missing_docs)]
    pub x: u8,
    #[allow(missing_docs)]
    pub y: u8,
}

/// A move as exported: the moving robot's cell before the move and the direction it slides in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedMove {
    /// Direction of the slide.
    pub dir: ExportedDirection,
    /// Position of the robot before the slide.
    pub pos: ExportedPosition,
}

impl Move {
    /// Determines the move leading from `previous` to `next`.
    ///
    /// The moved robot is the first robot whose position differs. Returns `None` if no robot
    /// moved or the robot did not move along a single axis.
    pub fn between(previous: RobotsState, next: RobotsState) -> Option<Self> {
        let robot = (0..previous.robot_count()).find(|&robot| !previous.same_position(&next, robot))?;
        let from = previous.position(robot);
        let to = next.position(robot);
        Direction::between(from, to).map(|direction| Move {
            robot,
            direction,
            from,
            to,
        })
    }

    /// Returns the index of the moved robot.
    pub fn robot(&self) -> usize {
        self.robot
    }

    /// Returns the direction the robot slid in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the cell the robot started on.
    pub fn from(&self) -> Position {
        self.from
    }

    /// Returns the cell the robot stopped on.
    pub fn to(&self) -> Position {
        self.to
    }

    /// Converts the move into its exported form.
    pub fn export(&self) -> ExportedMove {
        let (dx, dy) = self.direction.delta();
        ExportedMove {
            dir: ExportedDirection { dx, dy },
            pos: ExportedPosition {
                x: self.from.x(),
                y: self.from.y(),
            },
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "move {} {}", self.robot, self.direction)
    }
}

/// Extracts the moves along `path`.
///
/// # Panics
/// Panics if two consecutive states are not connected by a single slide.
pub fn moves_of(path: &[RobotsState]) -> Vec<Move> {
    path.windows(2)
        .map(|pair| {
            Move::between(pair[0], pair[1])
                .expect("Failed to find the move between consecutive states of a path")
        })
        .collect()
}

/// Describes the moves along `path` as numbered lines like ` 0: move 1 right`.
pub fn describe(path: &[RobotsState]) -> Vec<String> {
    moves_of(path)
        .iter()
        .enumerate()
        .map(|(step, movement)| format!("{:2}: {}", step, movement))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{describe, moves_of, ExportedDirection, ExportedMove, ExportedPosition, Move};
    use crate::{Direction, Position, RobotsState};

    fn path() -> Vec<RobotsState> {
        [
            [(0, 0), (3, 1)],
            [(0, 0), (3, 3)],
            [(3, 0), (3, 3)],
            [(3, 2), (3, 3)],
        ]
        .iter()
        .map(|positions| RobotsState::encode(positions, 0).unwrap())
        .collect()
    }

    #[test]
    fn moves_along_path() {
        let moves = moves_of(&path());
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].robot(), 1);
        assert_eq!(moves[0].direction(), Direction::Down);
        assert_eq!(moves[1].robot(), 0);
        assert_eq!(moves[1].direction(), Direction::Right);
        assert_eq!(moves[2].from(), Position::new(3, 0));
        assert_eq!(moves[2].to(), Position::new(3, 2));
    }

    #[test]
    fn waypoint_advance_is_not_a_move() {
        let state = RobotsState::encode(&[(1, 1)], 0).unwrap();
        assert_eq!(Move::between(state, state.advance_waypoint().unwrap()), None);
    }

    #[test]
    fn export_json() {
        let exported = moves_of(&path())
            .iter()
            .map(Move::export)
            .collect::<Vec<_>>();
        assert_eq!(
            exported[1],
            ExportedMove {
                dir: ExportedDirection { dx: 1, dy: 0 },
                pos: ExportedPosition { x: 0, y: 0 },
            }
        );

        let json = serde_json::to_string(&exported[..1]).unwrap();
        assert_eq!(json, r#"[{"dir":{"dx":0,"dy":1},"pos":{"x":3,"y":1}}]"#);
        let parsed: Vec<ExportedMove> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, exported[..1]);
    }

    #[test]
    fn human_readable() {
        assert_eq!(
            describe(&path()),
            vec![" 0: move 1 down", " 1: move 0 right", " 2: move 0 down"]
        );
    }
}
