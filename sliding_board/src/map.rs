//! Parsing and formatting of map strings.
//!
//! Three dialects describe the same puzzle:
//!
//! ```txt
//! canonical  map:4:4:oneway:main_robot:0:0:blocker:1:0:goal:2:0
//! compact    m:4:4:oneway,r:0:0,b:1:0,g:2:0
//! 2D         r b g .
//!            . . . .
//! ```
//!
//! The main robot also marks the start cell. Robot `0` is the main robot, helper robots follow in
//! the order they appear in the input. Formatting lists the robots by index first and all other
//! pieces row by row, so a formatted game parses back to the same robot order.

use log::trace;

use crate::{check_dimensions, Board, Coordinate, Game, ParseError, Position, RobotsState};

/// All pieces that can be placed by a map.
pub const PIECES: [Piece; 4] = [
    Piece::MainRobot,
    Piece::HelperRobot,
    Piece::Blocker,
    Piece::Goal,
];

/// A piece as it appears in a map string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    /// The robot which has to reach the goal. Also marks the start.
    MainRobot,
    /// A robot only used as an obstacle for other robots.
    HelperRobot,
    /// An immovable obstacle.
    Blocker,
    /// The cell the main robot has to reach.
    Goal,
}

impl Piece {
    /// Returns the name used in canonical map strings.
    pub fn name(self) -> &'static str {
        match self {
            Piece::MainRobot => "main_robot",
            Piece::HelperRobot => "helper_robot",
            Piece::Blocker => "blocker",
            Piece::Goal => "goal",
        }
    }

    /// Returns the letter used in compact and 2D map strings.
    pub fn letter(self) -> char {
        match self {
            Piece::MainRobot => 'r',
            Piece::HelperRobot => 'h',
            Piece::Blocker => 'b',
            Piece::Goal => 'g',
        }
    }

    /// Looks up a piece by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        PIECES.iter().copied().find(|piece| piece.name() == name)
    }

    /// Looks up a piece by its letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        PIECES.iter().copied().find(|piece| piece.letter() == letter)
    }
}

/// A piece together with its column and row.
pub type PlacedPiece = (Piece, usize, usize);

/// Parses a map string in the canonical or the compact dialect.
pub fn parse(input: &str) -> Result<Game, ParseError> {
    let input = input.trim();
    if input.starts_with("map:") {
        parse_canonical(input)
    } else if input.starts_with("m:") {
        parse_compact(input)
    } else {
        Err(ParseError::UnknownHeader(input.to_string()))
    }
}

fn number(token: Option<&str>) -> Result<usize, ParseError> {
    let token = token.unwrap_or_default();
    token
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

/// Parses the `W:H` dimensions from the front of `tokens`.
fn header<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<(usize, usize), ParseError> {
    let width = number(tokens.next())?;
    let height = number(tokens.next())?;
    Ok((width, height))
}

fn parse_canonical(input: &str) -> Result<Game, ParseError> {
    let mut tokens = input.split(':').skip(1).peekable();
    let (width, height) = header(&mut tokens)?;
    let one_way = tokens.next_if_eq(&"oneway").is_some();

    let mut pieces = Vec::new();
    while let Some(name) = tokens.next() {
        if name.is_empty() && tokens.peek().is_none() {
            break;
        }
        let piece =
            Piece::from_name(name).ok_or_else(|| ParseError::UnknownPiece(name.to_string()))?;
        let (x, y) = match (tokens.next(), tokens.next()) {
            (Some(x), Some(y)) => (number(Some(x))?, number(Some(y))?),
            _ => return Err(ParseError::TruncatedPiece(name.to_string())),
        };
        pieces.push((piece, x, y));
    }

    build_game(width, height, one_way, &pieces)
}

fn parse_compact(input: &str) -> Result<Game, ParseError> {
    let mut entries = input.split(',');
    let mut tokens = entries.next().unwrap_or_default().split(':').skip(1);
    let (width, height) = header(&mut tokens)?;
    let one_way = match tokens.next() {
        None | Some("") => false,
        Some("oneway") => true,
        Some(_) => return Err(ParseError::UnknownHeader(input.to_string())),
    };

    let pieces = entries
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.split(':');
            let code = parts.next().unwrap_or_default();
            let mut letters = code.chars();
            let piece = match (letters.next(), letters.next()) {
                (Some(letter), None) => Piece::from_letter(letter),
                _ => None,
            }
            .ok_or_else(|| ParseError::UnknownPiece(code.to_string()))?;
            match (parts.next(), parts.next(), parts.next()) {
                (Some(x), Some(y), None) => Ok((piece, number(Some(x))?, number(Some(y))?)),
                _ => Err(ParseError::TruncatedPiece(entry.to_string())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    build_game(width, height, one_way, &pieces)
}

/// Parses a 2D map, one row per line.
///
/// Cells are written as `.` (empty), `r`, `h`, `b` or `g` and may be separated by spaces. Blank
/// lines are ignored. The resulting game is two-way.
pub fn parse_2d(input: &str) -> Result<Game, ParseError> {
    let rows = input
        .lines()
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect::<Vec<_>>();
    let width = rows.first().map_or(0, Vec::len);
    let height = rows.len();

    let mut pieces = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(ParseError::RaggedRow(y, row.len(), width));
        }
        for (x, &cell) in row.iter().enumerate() {
            if cell == '.' {
                continue;
            }
            let piece =
                Piece::from_letter(cell).ok_or_else(|| ParseError::UnknownPiece(cell.to_string()))?;
            pieces.push((piece, x, y));
        }
    }

    build_game(width, height, false, &pieces)
}

/// Creates a game from a list of placed pieces.
///
/// Fails on bad dimensions, pieces outside the board or on the same cell, a main robot or goal
/// that is missing or given twice, and more robots than a state can hold.
pub fn build_game(
    width: usize,
    height: usize,
    one_way: bool,
    pieces: &[PlacedPiece],
) -> Result<Game, ParseError> {
    check_dimensions(width, height)?;

    let mut occupied = vec![false; width * height];
    for &(_, x, y) in pieces {
        if x >= width || y >= height {
            return Err(ParseError::OutOfBounds(x, y));
        }
        if std::mem::replace(&mut occupied[y * width + x], true) {
            return Err(ParseError::Occupied(x, y));
        }
    }

    let position = |&(_, x, y): &PlacedPiece| Position::new(x as Coordinate, y as Coordinate);
    let start = single(pieces, Piece::MainRobot, "main robot")?;
    let goal = single(pieces, Piece::Goal, "goal")?;
    let robots = std::iter::once(start)
        .chain(pieces.iter().filter(|(piece, ..)| *piece == Piece::HelperRobot))
        .map(|placed| position(placed).into())
        .collect::<Vec<(Coordinate, Coordinate)>>();
    if robots.len() > crate::MAX_ROBOT_COUNT {
        return Err(ParseError::TooManyRobots(robots.len()));
    }
    let blockers = pieces
        .iter()
        .filter(|(piece, ..)| *piece == Piece::Blocker)
        .map(position)
        .collect::<Vec<_>>();

    let initial_state = RobotsState::encode(&robots, 0)?;
    let board = Board::new(
        width,
        height,
        &blockers,
        position(start),
        position(goal),
        robots.len(),
    )?;
    trace!(
        "Parsed {}x{} map with {} robots and {} blockers",
        width,
        height,
        robots.len(),
        blockers.len()
    );

    Ok(Game::new(board, initial_state, one_way))
}

fn single<'a>(
    pieces: &'a [PlacedPiece],
    kind: Piece,
    name: &'static str,
) -> Result<&'a PlacedPiece, ParseError> {
    let mut matching = pieces.iter().filter(|(piece, ..)| *piece == kind);
    match (matching.next(), matching.next()) {
        (Some(placed), None) => Ok(placed),
        (None, _) => Err(ParseError::MissingPiece(name)),
        (Some(_), Some(_)) => Err(ParseError::DuplicatePiece(name)),
    }
}

/// Lists all pieces of the game in its initial state.
///
/// The robots come first in index order, followed by the blockers and the goal row by row.
pub fn pieces(game: &Game) -> Vec<PlacedPiece> {
    let board = game.board();
    let robots = game
        .initial_state()
        .positions()
        .enumerate()
        .map(|(robot, pos)| {
            let piece = if robot == 0 {
                Piece::MainRobot
            } else {
                Piece::HelperRobot
            };
            (piece, pos.x() as usize, pos.y() as usize)
        })
        .collect::<Vec<_>>();

    let mut pieces = robots;
    for y in 0..board.height() {
        for x in 0..board.width() {
            let piece = match board.fields()[x][y] {
                crate::Field::Blocker => Piece::Blocker,
                crate::Field::Goal => Piece::Goal,
                crate::Field::Start | crate::Field::Empty => continue,
            };
            pieces.push((piece, x, y));
        }
    }
    pieces
}

fn size_header(prefix: &str, width: usize, height: usize, one_way: bool) -> String {
    let mut header = format!("{}:{}:{}", prefix, width, height);
    if one_way {
        header.push_str(":oneway");
    }
    header
}

/// Formats `pieces` as a canonical map string, keeping their order.
pub(crate) fn canonical_string(
    width: usize,
    height: usize,
    one_way: bool,
    pieces: &[PlacedPiece],
) -> String {
    pieces.iter().fold(
        size_header("map", width, height, one_way),
        |mut map, (piece, x, y)| {
            map.push_str(&format!(":{}:{}:{}", piece.name(), x, y));
            map
        },
    )
}

pub(crate) fn format_canonical(game: &Game) -> String {
    let board = game.board();
    canonical_string(board.width(), board.height(), game.is_one_way(), &pieces(game))
}

pub(crate) fn format_compact(game: &Game) -> String {
    let board = game.board();
    pieces(game).into_iter().fold(
        size_header("m", board.width(), board.height(), game.is_one_way()),
        |mut map, (piece, x, y)| {
            map.push_str(&format!(",{}:{}:{}", piece.letter(), x, y));
            map
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_2d, Piece};
    use crate::{Field, Game, ParseError, Position, RobotsState};

    const SEVEN_MOVES: &str = "map:8:8:helper_robot:3:0:helper_robot:2:1:blocker:6:1:blocker:7:1:\
        blocker:6:2:main_robot:2:3:blocker:7:4:blocker:6:5:blocker:1:6:goal:6:6:blocker:2:7:\
        blocker:3:7";

    #[test]
    fn parse_canonical() {
        let game = parse(SEVEN_MOVES).unwrap();
        let board = game.board();
        assert_eq!((board.width(), board.height()), (8, 8));
        assert!(!game.is_one_way());
        assert_eq!(board.robot_count(), 3);
        assert_eq!(board.start(), Position::new(2, 3));
        assert_eq!(board.goal(), Position::new(6, 6));
        assert_eq!(board[Position::new(3, 7)], Field::Blocker);
        assert_eq!(
            game.initial_state(),
            RobotsState::encode(&[(2, 3), (3, 0), (2, 1)], 0).unwrap()
        );
    }

    #[test]
    fn canonical_round_trip() {
        let game = parse(SEVEN_MOVES).unwrap();
        assert_eq!(
            game.to_map_string(),
            "map:8:8:main_robot:2:3:helper_robot:3:0:helper_robot:2:1:blocker:6:1:blocker:7:1:\
             blocker:6:2:blocker:7:4:blocker:6:5:blocker:1:6:goal:6:6:blocker:2:7:blocker:3:7"
        );
        assert_eq!(parse(&game.to_map_string()).unwrap(), game);
        assert_eq!(parse(&game.to_compact_string()).unwrap(), game);
    }

    #[test]
    fn parse_compact() {
        let compact = parse("m:4:4:oneway,b:1:0,b:1:1,b:2:1,b:0:3,r:0:0,g:2:0").unwrap();
        let canonical = parse(
            "map:4:4:oneway:blocker:1:0:blocker:1:1:blocker:2:1:blocker:0:3:main_robot:0:0:goal:2:0",
        )
        .unwrap();
        assert_eq!(compact, canonical);
        assert!(compact.is_one_way());
        assert_eq!(
            compact.to_compact_string(),
            "m:4:4:oneway,r:0:0,b:1:0,g:2:0,b:1:1,b:2:1,b:0:3"
        );
    }

    #[test]
    fn parse_two_dimensional() {
        let spaced = parse_2d(
            "
            r . b .
            . . b .
            b b h .
            . . . g
            ",
        )
        .unwrap();
        let dense = parse_2d("r.b.\n..b.\nbbh.\n...g").unwrap();
        assert_eq!(spaced, dense);
        assert_eq!(spaced.to_compact_string(), "m:4:4,r:0:0,h:2:2,b:2:0,b:2:1,b:0:2,b:1:2,g:3:3");
    }

    #[test]
    fn helpers_keep_their_order() {
        let game = parse("m:4:4,h:3:3,r:0:0,h:1:1,g:2:0").unwrap();
        assert_eq!(
            game.initial_state(),
            RobotsState::encode(&[(0, 0), (3, 3), (1, 1)], 0).unwrap()
        );

        let compact = game.to_compact_string();
        assert_eq!(compact, "m:4:4,r:0:0,h:3:3,h:1:1,g:2:0");
        assert_eq!(parse(&compact).unwrap(), game);
        let canonical = game.to_map_string();
        assert_eq!(
            canonical,
            "map:4:4:main_robot:0:0:helper_robot:3:3:helper_robot:1:1:goal:2:0"
        );
        assert_eq!(parse(&canonical).unwrap(), game);
    }

    #[test]
    fn rejects_bad_maps() {
        let err = |map: &str| parse(map).unwrap_err();
        assert_eq!(err("board:4:4"), ParseError::UnknownHeader("board:4:4".into()));
        assert_eq!(err("m:x:4,r:0:0,g:1:1"), ParseError::InvalidNumber("x".into()));
        assert_eq!(err("m:15:4,r:0:0,g:1:1"), ParseError::DimensionOutOfRange(15, 4));
        assert_eq!(err("m:0:4,r:0:0,g:1:1"), ParseError::DimensionOutOfRange(0, 4));
        assert_eq!(err("m:4:4,r:0:0,g:1:1,x:2:2"), ParseError::UnknownPiece("x".into()));
        assert_eq!(err("m:4:4,r:0:0,g:1"), ParseError::TruncatedPiece("g:1".into()));
        assert_eq!(
            err("map:4:4:main_robot:0:0:goal:1"),
            ParseError::TruncatedPiece("goal".into())
        );
        assert_eq!(err("m:4:4,r:0:0,g:4:1"), ParseError::OutOfBounds(4, 1));
        assert_eq!(err("m:4:4,r:0:0,g:0:0"), ParseError::Occupied(0, 0));
        assert_eq!(err("m:4:4,g:1:1"), ParseError::MissingPiece("main robot"));
        assert_eq!(err("m:4:4,r:0:0"), ParseError::MissingPiece("goal"));
        assert_eq!(
            err("m:4:4,r:0:0,r:1:0,g:3:3"),
            ParseError::DuplicatePiece("main robot")
        );
        assert_eq!(
            err("m:4:4,r:0:0,g:3:3,g:2:3"),
            ParseError::DuplicatePiece("goal")
        );
        assert_eq!(
            err("m:4:4,r:0:0,h:1:0,h:2:0,h:3:0,g:3:3"),
            ParseError::TooManyRobots(4)
        );
        assert_eq!(
            parse_2d("r..\n.g").unwrap_err(),
            ParseError::RaggedRow(1, 2, 3)
        );
    }

    #[test]
    fn piece_names() {
        for piece in super::PIECES {
            assert_eq!(Piece::from_name(piece.name()), Some(piece));
            assert_eq!(Piece::from_letter(piece.letter()), Some(piece));
        }
        assert_eq!(
            Game::parse("m:2:1,r:0:0,g:1:0").unwrap().to_map_string(),
            "map:2:1:main_robot:0:0:goal:1:0"
        );
    }
}
