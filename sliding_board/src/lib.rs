#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! Basic components to play the sliding robots puzzle.
//!
//! A rectangular board holds immovable blockers, a start cell, a goal cell and up to three robots.
//! A move picks a robot and a direction; the robot then slides until the next cell is a blocker,
//! another robot or outside of the board. One robot is the main robot. A puzzle is solved once the
//! main robot stands on the goal (one-way) or has reached the goal and then returned to the start
//! (two-way).
//!
//! The main components are the [`Board`], holding the immovable pieces, the [`RobotsState`], a
//! packed encoding of all robot positions, and the [`Game`], which combines both with the list of
//! waypoints to reach. Games are created from map strings, see the [`map`] module, or from seeds,
//! see the [`seed`] module.

mod draw;
pub mod generator;
pub mod map;
pub mod moves;
pub mod seed;
mod state;

use std::cmp::Ordering;
use std::str::FromStr;
use std::{fmt, ops};

use itertools::Itertools;
use thiserror::Error;

pub use crate::draw::draw_board;
pub use crate::seed::Seed;
pub use crate::state::{
    Coordinate, Position, RobotsState, StateEncoding, StateError, MAX_COORDINATE,
    MAX_ROBOT_COUNT, MAX_WAYPOINT, STATE_BITS, STATE_SPACE,
};

/// Smallest allowed width or height of a board.
pub const MIN_SIDE_LENGTH: usize = 1;

/// Largest allowed width or height of a board.
pub const MAX_SIDE_LENGTH: usize = MAX_COORDINATE as usize;

/// All `Direction`s a robot can move in, in the order neighbors are generated.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// The type used to store the immovable pieces of a board, indexed by `[x][y]`.
pub type Fields = Vec<Vec<Field>>;

/// The immovable content of a cell.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Field {
    /// Nothing on the cell.
    #[default]
    Empty,
    /// Stops robots sliding into it.
    Blocker,
    /// The cell the main robot starts on.
    Start,
    /// The cell the main robot has to reach.
    Goal,
}

/// The directions a robot can be moved in.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Errors raised for malformed puzzle descriptions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input does not start with a known header.
    #[error("Expected a map or seed string, got {0:?}")]
    UnknownHeader(String),
    /// A token which should be a number is not one.
    #[error("Expected a number, got {0:?}")]
    InvalidNumber(String),
    /// Board dimensions outside of the supported range.
    #[error("Board size {0}x{1} is outside of {min}..={max}", min = MIN_SIDE_LENGTH, max = MAX_SIDE_LENGTH)]
    DimensionOutOfRange(usize, usize),
    /// An unknown piece name or letter.
    #[error("Unknown piece {0:?}")]
    UnknownPiece(String),
    /// A piece without both coordinates.
    #[error("Piece {0:?} is missing its coordinates")]
    TruncatedPiece(String),
    /// A piece placed outside of the board.
    #[error("Position ({0}, {1}) is outside of the board")]
    OutOfBounds(usize, usize),
    /// Two pieces on the same cell.
    #[error("Position ({0}, {1}) is occupied twice")]
    Occupied(usize, usize),
    /// More robots than a state can hold.
    #[error("{0} robots given but at most {max} are supported", max = MAX_ROBOT_COUNT)]
    TooManyRobots(usize),
    /// A piece which has to appear exactly once is missing.
    #[error("The map has no {0}")]
    MissingPiece(&'static str),
    /// A piece which has to appear exactly once appears more often.
    #[error("The map has more than one {0}")]
    DuplicatePiece(&'static str),
    /// Rows of a 2D map differ in length.
    #[error("Row {0} of the map has {1} cells, expected {2}")]
    RaggedRow(usize, usize, usize),
    /// A seed code not of the form `AAAA-BBBB`.
    #[error("Malformed seed code {0:?}")]
    InvalidSeedCode(String),
    /// A seed board too small for all pieces a seed places.
    #[error("A {0}x{1} board cannot hold the {2} pieces placed by a seed")]
    BoardTooSmall(usize, usize, usize),
    /// Seed expansion stopped finding free cells.
    #[error("Seed {0} does not place all of its pieces")]
    SeedExhausted(String),
    /// The robot positions could not be encoded.
    #[error(transparent)]
    State(#[from] StateError),
}

/// A board containing the immovable pieces, but no robots.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    fields: Fields,
    start: Position,
    goal: Position,
    robot_count: usize,
}

/// A condition on the state which has to become true on the way to a solution.
///
/// Waypoints are reached in order; the number reached so far is tracked inside the
/// [`RobotsState`].
pub trait Waypoint {
    /// Checks if the waypoint is reached in `state`.
    fn is_reached(&self, board: &Board, state: RobotsState) -> bool;
}

/// The standard waypoints, both concerning the main robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The main robot stands on the goal.
    Goal,
    /// The main robot stands on the start.
    Start,
}

/// A parsed puzzle: the board, the initial robot positions and the kind of trip.
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    initial_state: RobotsState,
    one_way: bool,
    seed: Option<Seed>,
}

impl Direction {
    /// Returns `true` for `Up` and `Down`.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns the unit vector `(dx, dy)` of the direction. `y` grows downwards.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Returns the direction of a movement from `from` to `to` along one axis.
    ///
    /// Returns `None` if the positions are equal or differ in both coordinates.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        match (from.x().cmp(&to.x()), from.y().cmp(&to.y())) {
            (Ordering::Equal, Ordering::Greater) => Some(Direction::Up),
            (Ordering::Equal, Ordering::Less) => Some(Direction::Down),
            (Ordering::Greater, Ordering::Equal) => Some(Direction::Left),
            (Ordering::Less, Ordering::Equal) => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let string = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.pad(string)
    }
}

/// Board impl containing code to create a board.
impl Board {
    /// Creates a new board of `width` x `height` cells.
    ///
    /// `robot_count` is the number of robots that will move on the board, the main robot
    /// included. Fails if a dimension is out of range, a piece lies outside of the board or two
    /// pieces share a cell.
    pub fn new(
        width: usize,
        height: usize,
        blockers: &[Position],
        start: Position,
        goal: Position,
        robot_count: usize,
    ) -> Result<Self, ParseError> {
        check_dimensions(width, height)?;
        if robot_count == 0 {
            return Err(ParseError::MissingPiece("main robot"));
        }
        if robot_count > MAX_ROBOT_COUNT {
            return Err(ParseError::TooManyRobots(robot_count));
        }

        let mut fields = vec![vec![Field::Empty; height]; width];
        let pieces = blockers
            .iter()
            .map(|&pos| (pos, Field::Blocker))
            .chain([(start, Field::Start), (goal, Field::Goal)]);
        for (pos, field) in pieces {
            let (x, y) = (pos.x() as usize, pos.y() as usize);
            if x >= width || y >= height {
                return Err(ParseError::OutOfBounds(x, y));
            }
            if fields[x][y] != Field::Empty {
                return Err(ParseError::Occupied(x, y));
            }
            fields[x][y] = field;
        }

        Ok(Self {
            fields,
            start,
            goal,
            robot_count,
        })
    }
}

/// Checks that a board of `width` x `height` can be represented.
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), ParseError> {
    let range = MIN_SIDE_LENGTH..=MAX_SIDE_LENGTH;
    if range.contains(&width) && range.contains(&height) {
        Ok(())
    } else {
        Err(ParseError::DimensionOutOfRange(width, height))
    }
}

/// Board impl containing code to interact with a board.
impl Board {
    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.fields[0].len()
    }

    /// Returns the number of robots moving on the board.
    pub fn robot_count(&self) -> usize {
        self.robot_count
    }

    /// Returns the start cell.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Returns the goal cell.
    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Returns a reference to the fields of the board.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Checks if a robot other than `robot` may enter `(x, y)`.
    #[inline(always)]
    fn is_free(&self, x: Coordinate, y: Coordinate, robot: usize, state: RobotsState) -> bool {
        self.fields[x as usize][y as usize] != Field::Blocker
            && !state.is_other_robot_blocking(x, y, robot)
    }

    /// Returns the coordinate along the axis of `direction` at which `robot` stops.
    ///
    /// Only blockers and other robots stop a robot. Without an obstacle the robot stops at the
    /// edge of the board.
    pub fn find_stop_coordinate(
        &self,
        robot: usize,
        direction: Direction,
        state: RobotsState,
    ) -> Coordinate {
        let (mut x, mut y) = (state.x(robot), state.y(robot));
        match direction {
            Direction::Up => {
                while y > 0 && self.is_free(x, y - 1, robot, state) {
                    y -= 1;
                }
                y
            }
            Direction::Down => {
                let last = self.height() as Coordinate - 1;
                while y < last && self.is_free(x, y + 1, robot, state) {
                    y += 1;
                }
                y
            }
            Direction::Left => {
                while x > 0 && self.is_free(x - 1, y, robot, state) {
                    x -= 1;
                }
                x
            }
            Direction::Right => {
                let last = self.width() as Coordinate - 1;
                while x < last && self.is_free(x + 1, y, robot, state) {
                    x += 1;
                }
                x
            }
        }
    }

    /// Moves `robot` as far in the given `direction` as possible.
    ///
    /// Returns `state` unchanged if the robot cannot move.
    #[inline]
    pub fn make_move(&self, state: RobotsState, robot: usize, direction: Direction) -> RobotsState {
        let stop = self.find_stop_coordinate(robot, direction, state);
        if direction.is_vertical() {
            state.with_y(robot, stop)
        } else {
            state.with_x(robot, stop)
        }
    }

    /// Creates an Iterator over all states reachable in one move that differ from `state`,
    /// together with the move leading there.
    ///
    /// Robots are tried in index order, directions in the order of [`DIRECTIONS`].
    pub fn reachable_states(
        &self,
        state: RobotsState,
    ) -> impl Iterator<Item = (RobotsState, (usize, Direction))> + '_ {
        (0..self.robot_count)
            .cartesian_product(DIRECTIONS.iter())
            .filter_map(move |(robot, &direction)| {
                Some(self.make_move(state, robot, direction))
                    .filter(|next| next != &state)
                    .map(|next| (next, (robot, direction)))
            })
    }

    /// Creates an Iterator over all states reachable in one move that differ from `state`.
    pub fn neighbors(&self, state: RobotsState) -> impl Iterator<Item = RobotsState> + '_ {
        self.reachable_states(state).map(|(next, _)| next)
    }

    /// Checks if the main robot stands on the goal.
    #[inline(always)]
    pub fn is_goal_reached(&self, state: RobotsState) -> bool {
        state.position(0) == self.goal
    }

    /// Checks if the main robot stands on the start.
    #[inline(always)]
    pub fn is_start_reached(&self, state: RobotsState) -> bool {
        state.position(0) == self.start
    }
}

impl ops::Index<Position> for Board {
    type Output = Field;

    fn index(&self, index: Position) -> &Self::Output {
        &self.fields[index.x() as usize][index.y() as usize]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", draw_board(self, None))
    }
}

impl Waypoint for Target {
    fn is_reached(&self, board: &Board, state: RobotsState) -> bool {
        match self {
            Target::Goal => board.is_goal_reached(state),
            Target::Start => board.is_start_reached(state),
        }
    }
}

impl<F> Waypoint for F
where
    F: Fn(&Board, RobotsState) -> bool,
{
    fn is_reached(&self, board: &Board, state: RobotsState) -> bool {
        self(board, state)
    }
}

impl Game {
    /// Creates a new game.
    pub fn new(board: Board, initial_state: RobotsState, one_way: bool) -> Self {
        Self {
            board,
            initial_state,
            one_way,
            seed: None,
        }
    }

    /// Parses a seed string or a map string in either dialect.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.starts_with("seed:") {
            Self::from_seed(input)
        } else if input.starts_with("map:") || input.starts_with("m:") {
            map::parse(input)
        } else {
            Err(ParseError::UnknownHeader(input.to_string()))
        }
    }

    /// Expands a seed string into a game.
    pub fn from_seed(seed: &str) -> Result<Self, ParseError> {
        seed.parse::<Seed>()?.to_game()
    }

    /// Parses a 2D map, see [`map::parse_2d`].
    pub fn from_2d_map(input: &str) -> Result<Self, ParseError> {
        map::parse_2d(input)
    }

    /// Returns the board the game is played on.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the positions of the robots before the first move.
    pub fn initial_state(&self) -> RobotsState {
        self.initial_state
    }

    /// Returns `true` if reaching the goal is enough, `false` if the main robot has to return.
    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    /// Returns the seed the game was expanded from.
    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    /// Remembers the seed the game was expanded from.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the waypoints to reach in order.
    pub fn waypoints(&self) -> Vec<Target> {
        if self.one_way {
            vec![Target::Goal]
        } else {
            vec![Target::Goal, Target::Start]
        }
    }

    /// Returns the canonical map string of the game.
    pub fn to_map_string(&self) -> String {
        map::format_canonical(self)
    }

    /// Returns the compact map string of the game.
    pub fn to_compact_string(&self) -> String {
        map::format_compact(self)
    }
}

impl FromStr for Game {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", draw_board(&self.board, Some(self.initial_state)))
    }
}
