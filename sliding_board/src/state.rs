use std::{fmt, mem};

use thiserror::Error;

/// The type a robots state is encoded as.
///
/// 26 bits are used: three bytes for the robot positions and two bits counting reached waypoints.
pub type StateEncoding = u32;

/// The type of a single coordinate on the board.
pub type Coordinate = u8;

/// Maximum number of robots a state can hold.
pub const MAX_ROBOT_COUNT: usize = 3;

/// Largest coordinate a robot may occupy. `15` is reserved to mark absent robots.
pub const MAX_COORDINATE: Coordinate = 14;

/// Largest value of the waypoint counter.
pub const MAX_WAYPOINT: u8 = 3;

/// Number of bits of a [`StateEncoding`] in use.
pub const STATE_BITS: u32 = 26;

/// Number of distinct encoded states, the size of a dense visited set.
pub const STATE_SPACE: usize = 1 << STATE_BITS;

/// Errors raised while building or changing a [`RobotsState`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// More robots than a state can hold.
    #[error("{0} robots given but a state holds at most {max}", max = MAX_ROBOT_COUNT)]
    TooManyRobots(usize),
    /// A coordinate that does not fit into four bits or collides with the absent marker.
    #[error("Coordinate ({0}, {1}) is outside of 0..={max}", max = MAX_COORDINATE)]
    CoordinateOutOfRange(Coordinate, Coordinate),
    /// The waypoint counter cannot grow any further.
    #[error("Waypoint counter {0} cannot be advanced past {max}", max = MAX_WAYPOINT)]
    WaypointOverflow(u8),
}

/// A cell on the board.
///
/// ```txt
/// x    y
/// 0000|0000
/// ```
#[derive(Copy, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    encoded_position: u8,
}

/// Positions of all robots together with the number of waypoints reached so far.
///
/// ```txt
/// unused  wp   robot 2   robot 1   robot 0
/// 000000|00|xxxx_yyyy|xxxx_yyyy|xxxx_yyyy
/// ```
///
/// Robot `0` is the main robot. Robots that are not on the board have both coordinates set to
/// `15`. Present robots always occupy the lowest indices.
#[derive(Copy, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RobotsState {
    encoded_state: StateEncoding,
}

impl Position {
    /// Number of bits used for the encoding.
    const BIT_COUNT: u32 = mem::size_of::<u8>() as u32 * 8;

    /// Bitflag used to extract the row information of a position.
    const ROW_FLAG: u8 = 0b0000_1111;

    /// Creates a new position.
    ///
    /// The caller has to make sure, that the given coordinates fit into four bits.
    pub fn new(x: Coordinate, y: Coordinate) -> Self {
        debug_assert!(x <= Self::ROW_FLAG && y <= Self::ROW_FLAG);
        Position {
            encoded_position: (x << (Self::BIT_COUNT / 2)) | y,
        }
    }

    /// Returns the column of the position.
    #[inline(always)]
    pub fn x(&self) -> Coordinate {
        self.encoded_position >> (Self::BIT_COUNT / 2)
    }

    /// Returns the row of the position.
    #[inline(always)]
    pub fn y(&self) -> Coordinate {
        self.encoded_position & Self::ROW_FLAG
    }

    /// Returns the Manhattan distances `(|dx|, |dy|)` between two positions.
    pub fn distance(&self, other: Position) -> (Coordinate, Coordinate) {
        (self.x().abs_diff(other.x()), self.y().abs_diff(other.y()))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x(), self.y())
    }
}

impl From<Position> for (Coordinate, Coordinate) {
    fn from(pos: Position) -> Self {
        (pos.x(), pos.y())
    }
}

impl From<(Coordinate, Coordinate)> for Position {
    fn from((x, y): (Coordinate, Coordinate)) -> Self {
        Self::new(x, y)
    }
}

impl RobotsState {
    const POSITION_BITS: u32 = 8;
    const POSITION_MASK: StateEncoding = 0xFF;
    const X_MASK: StateEncoding = 0xF0;
    const Y_MASK: StateEncoding = 0x0F;
    const ABSENT: StateEncoding = 0xFF;
    const WAYPOINT_SHIFT: u32 = Self::POSITION_BITS * MAX_ROBOT_COUNT as u32;
    const WAYPOINT_MASK: StateEncoding = 0b11;

    /// Encodes the robot `positions` in order together with the `waypoints` counter.
    ///
    /// Robots missing from `positions` are marked as absent. Fails if more than
    /// [`MAX_ROBOT_COUNT`] positions are given, a coordinate exceeds [`MAX_COORDINATE`] or
    /// `waypoints` exceeds [`MAX_WAYPOINT`].
    pub fn encode(
        positions: &[(Coordinate, Coordinate)],
        waypoints: u8,
    ) -> Result<Self, StateError> {
        if positions.len() > MAX_ROBOT_COUNT {
            return Err(StateError::TooManyRobots(positions.len()));
        }
        if waypoints > MAX_WAYPOINT {
            return Err(StateError::WaypointOverflow(waypoints));
        }

        let mut encoded_state = (waypoints as StateEncoding) << Self::WAYPOINT_SHIFT;
        for robot in 0..MAX_ROBOT_COUNT {
            let byte = match positions.get(robot) {
                Some(&(x, y)) if x <= MAX_COORDINATE && y <= MAX_COORDINATE => {
                    Position::new(x, y).encoded_position as StateEncoding
                }
                Some(&(x, y)) => return Err(StateError::CoordinateOutOfRange(x, y)),
                None => Self::ABSENT,
            };
            encoded_state |= byte << Self::shift(robot);
        }

        Ok(RobotsState { encoded_state })
    }

    /// Returns the positions of all present robots and the waypoint counter.
    pub fn decode(&self) -> (Vec<(Coordinate, Coordinate)>, u8) {
        (
            self.positions().map(Into::into).collect(),
            self.waypoints(),
        )
    }

    /// Wraps an already encoded state.
    pub fn from_encoded(encoded_state: StateEncoding) -> Self {
        debug_assert!(encoded_state < STATE_SPACE as StateEncoding);
        RobotsState { encoded_state }
    }

    /// Returns the raw encoding, always below [`STATE_SPACE`].
    #[inline(always)]
    pub fn encoded(&self) -> StateEncoding {
        self.encoded_state
    }

    #[inline(always)]
    fn shift(robot: usize) -> u32 {
        debug_assert!(robot < MAX_ROBOT_COUNT);
        robot as u32 * Self::POSITION_BITS
    }

    #[inline(always)]
    fn byte(&self, robot: usize) -> StateEncoding {
        (self.encoded_state >> Self::shift(robot)) & Self::POSITION_MASK
    }

    /// Returns the column of `robot`.
    #[inline(always)]
    pub fn x(&self, robot: usize) -> Coordinate {
        ((self.byte(robot) & Self::X_MASK) >> 4) as Coordinate
    }

    /// Returns the row of `robot`.
    #[inline(always)]
    pub fn y(&self, robot: usize) -> Coordinate {
        (self.byte(robot) & Self::Y_MASK) as Coordinate
    }

    /// Returns the position of `robot`.
    #[inline(always)]
    pub fn position(&self, robot: usize) -> Position {
        Position {
            encoded_position: self.byte(robot) as u8,
        }
    }

    /// Returns a copy of the state with the column of `robot` replaced by `x`.
    #[inline(always)]
    pub fn with_x(self, robot: usize, x: Coordinate) -> Self {
        let mask = Self::X_MASK << Self::shift(robot);
        RobotsState {
            encoded_state: (self.encoded_state & !mask)
                | ((x as StateEncoding) << (Self::shift(robot) + 4)),
        }
    }

    /// Returns a copy of the state with the row of `robot` replaced by `y`.
    #[inline(always)]
    pub fn with_y(self, robot: usize, y: Coordinate) -> Self {
        let mask = Self::Y_MASK << Self::shift(robot);
        RobotsState {
            encoded_state: (self.encoded_state & !mask)
                | ((y as StateEncoding) << Self::shift(robot)),
        }
    }

    /// Returns the number of robots on the board.
    pub fn robot_count(&self) -> usize {
        (0..MAX_ROBOT_COUNT)
            .rev()
            .find(|&robot| self.byte(robot) != Self::ABSENT)
            .map_or(0, |robot| robot + 1)
    }

    /// Returns the number of waypoints reached so far.
    #[inline(always)]
    pub fn waypoints(&self) -> u8 {
        ((self.encoded_state >> Self::WAYPOINT_SHIFT) & Self::WAYPOINT_MASK) as u8
    }

    /// Returns a copy of the state with the waypoint counter incremented by one.
    pub fn advance_waypoint(self) -> Result<Self, StateError> {
        match self.waypoints() {
            MAX_WAYPOINT => Err(StateError::WaypointOverflow(MAX_WAYPOINT)),
            _ => Ok(RobotsState {
                encoded_state: self.encoded_state + (1 << Self::WAYPOINT_SHIFT),
            }),
        }
    }

    /// Checks if `robot` is on the same cell in both states.
    #[inline(always)]
    pub fn same_position(&self, other: &RobotsState, robot: usize) -> bool {
        self.byte(robot) == other.byte(robot)
    }

    /// Checks if any robot other than `except` occupies `(x, y)`.
    #[inline(always)]
    pub fn is_other_robot_blocking(&self, x: Coordinate, y: Coordinate, except: usize) -> bool {
        let target = Position::new(x, y).encoded_position as StateEncoding;
        (0..MAX_ROBOT_COUNT).any(|robot| robot != except && self.byte(robot) == target)
    }

    /// Returns the index of the robot on `(x, y)` if there is one.
    pub fn robot_at(&self, x: Coordinate, y: Coordinate) -> Option<usize> {
        let target = Position::new(x, y).encoded_position as StateEncoding;
        (0..self.robot_count()).find(|&robot| self.byte(robot) == target)
    }

    /// Creates an iterator over the positions of all present robots, main robot first.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.robot_count()).map(move |robot| self.position(robot))
    }
}

impl fmt::Debug for RobotsState {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let robots = (0..MAX_ROBOT_COUNT)
            .map(|robot| match self.byte(robot) {
                Self::ABSENT => "-".to_string(),
                _ => format!("{:?}", self.position(robot)),
            })
            .collect::<Vec<_>>();
        write!(fmt, "[{}] wp={}", robots.join(" | "), self.waypoints())
    }
}
