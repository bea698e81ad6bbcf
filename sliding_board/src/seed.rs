//! Deterministic expansion of seed strings into games.
//!
//! A seed string `seed:W:H[:oneway]:AAAA-BBBB` names a board size and a nine character code. The
//! code is hashed and the hash drives a fixed xorshift generator placing the pieces, so every
//! implementation expands a seed to the same map.

use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;

use fxhash::FxHashMap;
use log::debug;

use crate::map::{self, Piece, PlacedPiece};
use crate::{check_dimensions, Game, ParseError};

/// Symbols a seed code is made of.
pub const SEED_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Number of characters of a seed code, the dash included.
pub const SEED_CODE_LENGTH: usize = 9;

/// Index of the dash inside a seed code.
pub const SEED_DASH_INDEX: usize = 4;

/// Number of robots and goals placed before the blockers.
const FIXED_PIECES: [Piece; 4] = [
    Piece::MainRobot,
    Piece::HelperRobot,
    Piece::HelperRobot,
    Piece::Goal,
];

/// Draws per piece before giving up on a seed whose generator got stuck.
const MAX_DRAWS_PER_PIECE: usize = 1 << 12;

/// A parsed seed string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Seed {
    width: usize,
    height: usize,
    one_way: bool,
    code: String,
}

/// Result of one [`xorshift32`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorShift {
    /// The drawn number, within `0..bound` for positive `bound`. Never negative, since no state
    /// is `i32::MIN`.
    pub value: i32,
    /// The seed for the next draw.
    pub seed: i32,
}

/// Hashes a seed code with `h = 31 * h + byte` in wrapping 32 bit arithmetic.
pub fn seed_hash(code: &str) -> i32 {
    code.bytes().fold(0i32, |hash, byte| {
        (hash << 5).wrapping_sub(hash).wrapping_add(byte as i32)
    })
}

/// Draws a number in `0..bound` and returns it with the next seed.
pub fn xorshift32(seed: i32, bound: i32) -> XorShift {
    let seed = seed ^ (seed << 13);
    let seed = seed ^ (seed >> 17);
    let seed = seed ^ (seed << 5);
    // The arithmetic shift clears the sign bit, so `seed` is never `i32::MIN` here.
    let magnitude = if seed < 0 { seed.wrapping_neg() } else { seed };
    XorShift {
        value: magnitude % bound,
        seed,
    }
}

impl Seed {
    /// Creates a seed, checking the board size and the code.
    ///
    /// The board has to be large enough to place all pieces, `4 + max(width, height)`.
    pub fn new(width: usize, height: usize, one_way: bool, code: &str) -> Result<Self, ParseError> {
        check_dimensions(width, height)?;
        let piece_count = FIXED_PIECES.len() + width.max(height);
        if piece_count > width * height {
            return Err(ParseError::BoardTooSmall(width, height, piece_count));
        }
        if !is_valid_code(code) {
            return Err(ParseError::InvalidSeedCode(code.to_string()));
        }
        Ok(Self {
            width,
            height,
            one_way,
            code: code.to_string(),
        })
    }

    /// Parses `seed:W:H[:oneway]:AAAA-BBBB`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        let tokens = input.split(':').collect::<Vec<_>>();
        let (width, height, one_way, code) = match tokens.as_slice() {
            ["seed", width, height, code] => (width, height, false, code),
            ["seed", width, height, "oneway", code] => (width, height, true, code),
            ["seed", ..] => return Err(ParseError::InvalidSeedCode(input.to_string())),
            _ => return Err(ParseError::UnknownHeader(input.to_string())),
        };
        let number = |token: &str| {
            token
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidNumber(token.to_string()))
        };
        Self::new(number(width)?, number(height)?, one_way, code)
    }

    /// Returns the number of columns of the board.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows of the board.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if the seed describes a one-way game.
    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    /// Returns the code, e.g. `EO8T-0MXD`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the hash of the code which starts the piece placement.
    pub fn hash(&self) -> i32 {
        seed_hash(&self.code)
    }

    /// Places all pieces, returned row by row.
    fn place_pieces(&self) -> Result<Vec<PlacedPiece>, ParseError> {
        let (width, height) = (self.width as i32, self.height as i32);
        let pieces = FIXED_PIECES
            .iter()
            .copied()
            .chain(std::iter::repeat(Piece::Blocker).take(self.width.max(self.height)));

        let mut seed = self.hash();
        let mut taken = FxHashMap::default();
        for piece in pieces {
            let placed = (0..MAX_DRAWS_PER_PIECE).any(|_| {
                let x = xorshift32(seed, width);
                let y = xorshift32(x.seed, height);
                seed = y.seed;
                match taken.entry((x.value as usize, y.value as usize)) {
                    Entry::Vacant(entry) => {
                        entry.insert(piece);
                        true
                    }
                    Entry::Occupied(_) => false,
                }
            });
            if !placed {
                return Err(ParseError::SeedExhausted(self.to_string()));
            }
        }

        let mut placed = taken
            .into_iter()
            .map(|((x, y), piece)| (piece, x, y))
            .collect::<Vec<_>>();
        placed.sort_by_key(|&(_, x, y)| (y, x));
        Ok(placed)
    }

    /// Expands the seed into the canonical map string, listing all pieces row by row.
    pub fn to_map_string(&self) -> Result<String, ParseError> {
        let pieces = self.place_pieces()?;
        Ok(map::canonical_string(self.width, self.height, self.one_way, &pieces))
    }

    /// Expands the seed into a game.
    pub fn to_game(&self) -> Result<Game, ParseError> {
        let pieces = self.place_pieces()?;
        let game = map::build_game(self.width, self.height, self.one_way, &pieces)?;
        debug!("Expanded {} to {}", self, game.to_compact_string());
        Ok(game.with_seed(self.clone()))
    }
}

fn is_valid_code(code: &str) -> bool {
    code.len() == SEED_CODE_LENGTH
        && code.bytes().enumerate().all(|(i, byte)| match i {
            SEED_DASH_INDEX => byte == b'-',
            _ => SEED_ALPHABET.contains(&byte),
        })
}

impl FromStr for Seed {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let one_way = if self.one_way { "oneway:" } else { "" };
        write!(f, "seed:{}:{}:{}{}", self.width, self.height, one_way, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::{seed_hash, xorshift32, Seed, XorShift};
    use crate::{Game, ParseError};

    #[test]
    fn xorshift_matches_reference_values() {
        let cases = [
            ((10, 100), (90, 2703690)),
            ((32533, 100), (72, -205929372)),
            ((32533, 10), (2, -205929372)),
            ((1, 10), (9, 270369)),
            ((131072, 1), (0, 1078337569)),
            ((131071, 1), (0, -1069678592)),
            ((122880, 1), (0, -1136771584)),
        ];
        for ((seed, bound), (value, next)) in cases {
            assert_eq!(xorshift32(seed, bound), XorShift { value, seed: next });
        }
    }

    #[test]
    fn draws_are_never_negative() {
        for start in [i32::MIN, -1, 0, 1, i32::MAX, seed_hash("EO8T-0MXD")] {
            let mut seed = start;
            for _ in 0..100_000 {
                let draw = xorshift32(seed, 5);
                assert_ne!(draw.seed, i32::MIN);
                assert!((0..5).contains(&draw.value));
                seed = draw.seed;
            }
        }
    }

    #[test]
    fn hash_wraps() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("A"), 65);
        assert_eq!(seed_hash("AB"), 65 * 31 + 66);
        let long = seed_hash("EO8T-0MXD");
        let expected = "EO8T-0MXD"
            .bytes()
            .fold(0i64, |h, b| (h * 31 + b as i64) as i32 as i64);
        assert_eq!(long as i64, expected);
    }

    #[test]
    fn expand_seven_move_seed() {
        let seed: Seed = "seed:8:8:EO8T-0MXD".parse().unwrap();
        assert_eq!(
            seed.to_map_string().unwrap(),
            "map:8:8:helper_robot:3:0:helper_robot:2:1:blocker:6:1:blocker:7:1:blocker:6:2:\
             main_robot:2:3:blocker:7:4:blocker:6:5:blocker:1:6:goal:6:6:blocker:2:7:blocker:3:7"
        );

        let game = Game::parse("seed:8:8:EO8T-0MXD").unwrap();
        assert_eq!(game.seed(), Some(&seed));
        assert!(!game.is_one_way());

        // Helpers are numbered in the order the expanded map lists them.
        let expanded = Game::parse(&seed.to_map_string().unwrap()).unwrap();
        assert_eq!(expanded.board(), game.board());
        assert_eq!(expanded.initial_state(), game.initial_state());
        assert_eq!(expanded.with_seed(seed), game);
    }

    #[test]
    fn one_way_seed() {
        let seed: Seed = "seed:8:8:oneway:EO8T-0MXD".parse().unwrap();
        assert!(seed.is_one_way());
        assert_eq!(seed.to_string(), "seed:8:8:oneway:EO8T-0MXD");

        let game = seed.to_game().unwrap();
        assert!(game.is_one_way());
        let two_way = Game::from_seed("seed:8:8:EO8T-0MXD").unwrap();
        assert_eq!(game.board(), two_way.board());
        assert_eq!(game.initial_state(), two_way.initial_state());
    }

    #[test]
    fn every_seed_expands() {
        for code in ["AAAA-AAAA", "ZZZZ-9999", "0000-0000", "B7QK-M2XW"] {
            for (width, height) in [(3, 3), (5, 8), (8, 8), (14, 14)] {
                let seed = Seed::new(width, height, false, code).unwrap();
                let game = seed.to_game().unwrap();
                assert_eq!(game.board().robot_count(), 3);
                assert_eq!(game.board().width(), width);
                assert_eq!(game.board().height(), height);
            }
        }
    }

    #[test]
    fn rejects_bad_seeds() {
        let err = |seed: &str| seed.parse::<Seed>().unwrap_err();
        assert_eq!(err("sed:8:8:EO8T-0MXD"), ParseError::UnknownHeader("sed:8:8:EO8T-0MXD".into()));
        assert_eq!(err("seed:8:8:EO8T0MXD"), ParseError::InvalidSeedCode("EO8T0MXD".into()));
        assert_eq!(err("seed:8:8:eo8t-0mxd"), ParseError::InvalidSeedCode("eo8t-0mxd".into()));
        assert_eq!(err("seed:8:8:EO8T_0MXD"), ParseError::InvalidSeedCode("EO8T_0MXD".into()));
        assert_eq!(err("seed:a:8:EO8T-0MXD"), ParseError::InvalidNumber("a".into()));
        assert_eq!(err("seed:15:8:EO8T-0MXD"), ParseError::DimensionOutOfRange(15, 8));
        assert_eq!(err("seed:2:2:EO8T-0MXD"), ParseError::BoardTooSmall(2, 2, 6));
        assert_eq!(
            err("seed:8:8:twoway:EO8T-0MXD"),
            ParseError::InvalidSeedCode("seed:8:8:twoway:EO8T-0MXD".into())
        );
    }
}
