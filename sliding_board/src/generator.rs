//! Tools to generate random seeds and the games they expand to.

use rand::prelude::SliceRandom;
use rand::SeedableRng;

use crate::seed::{SEED_ALPHABET, SEED_CODE_LENGTH, SEED_DASH_INDEX};
use crate::{Game, ParseError, Seed};

/// A seed generator for boards of one size and kind.
#[derive(Debug)]
pub struct Generator {
    rng: rand_pcg::Pcg64Mcg,
    width: usize,
    height: usize,
    one_way: bool,
}

impl Generator {
    /// Creates a new generator with a random state.
    pub fn new(width: usize, height: usize, one_way: bool) -> Self {
        Self {
            rng: rand_pcg::Pcg64Mcg::from_entropy(),
            width,
            height,
            one_way,
        }
    }

    /// Creates a new generator initialized with `seed`.
    ///
    /// Two generators created from the same `seed` yield the same sequence of seeds.
    pub fn from_seed(seed: u128, width: usize, height: usize, one_way: bool) -> Self {
        Self {
            rng: rand_pcg::Pcg64Mcg::new(seed.wrapping_mul(2)),
            width,
            height,
            one_way,
        }
    }

    /// Draws a random code of the form `AAAA-BBBB`.
    pub fn generate_code(&mut self) -> String {
        (0..SEED_CODE_LENGTH)
            .map(|i| match i {
                SEED_DASH_INDEX => '-',
                _ => *SEED_ALPHABET
                    .choose(&mut self.rng)
                    .expect("Failed to choose from the non-empty seed alphabet")
                    as char,
            })
            .collect()
    }

    /// Draws a new seed.
    ///
    /// Fails if the board size of the generator cannot be expanded from a seed.
    pub fn generate_seed(&mut self) -> Result<Seed, ParseError> {
        let code = self.generate_code();
        Seed::new(self.width, self.height, self.one_way, &code)
    }

    /// Draws a new seed and expands it.
    pub fn generate_game(&mut self) -> Result<Game, ParseError> {
        self.generate_seed()?.to_game()
    }
}

impl Iterator for Generator {
    type Item = Result<Seed, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate_seed())
    }
}

#[cfg(test)]
mod tests {
    use super::Generator;
    use crate::seed::SEED_ALPHABET;
    use crate::ParseError;

    #[test]
    fn codes_have_the_seed_shape() {
        let mut generator = Generator::new(8, 8, false);
        for _ in 0..100 {
            let code = generator.generate_code();
            assert_eq!(code.len(), 9);
            assert_eq!(&code[4..5], "-");
            assert!(code
                .bytes()
                .enumerate()
                .all(|(i, b)| i == 4 || SEED_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn seeded_generators_repeat() {
        let first = Generator::from_seed(7, 6, 5, true)
            .take(20)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let second = Generator::from_seed(7, 6, 5, true)
            .take(20)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|seed| seed.is_one_way() && seed.width() == 6));

        let other = Generator::from_seed(8, 6, 5, true).generate_seed().unwrap();
        assert_ne!(first[0], other);
    }

    #[test]
    fn generate_games() {
        let mut generator = Generator::from_seed(42, 8, 8, false);
        for _ in 0..20 {
            let game = generator.generate_game().unwrap();
            assert_eq!(game.board().robot_count(), 3);
            assert!(game.seed().is_some());
        }
    }

    #[test]
    fn rejects_small_boards() {
        let mut generator = Generator::from_seed(1, 2, 2, false);
        assert_eq!(
            generator.generate_seed(),
            Err(ParseError::BoardTooSmall(2, 2, 6))
        );
    }
}
