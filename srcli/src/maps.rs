//! Reading and writing maps files.
//!
//! Every line of a maps file holds one puzzle as `<seed> <map> <moves>`. The seed is `-` for
//! puzzles which were not created from a seed. Lines holding only a map or seed string are
//! accepted as well.

use std::fs;
use std::io;
use std::path::Path;

use sliding_board::{Game, ParseError, Seed};
use sliding_rank::GameWithSolution;

use crate::CliError;

/// Placeholder for the seed of a puzzle without one.
const NO_SEED: &str = "-";

/// Parses a single line of a maps file.
pub fn parse_line(line: &str) -> Result<Game, ParseError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    match tokens.as_slice() {
        [seed, map, ..] if seed.starts_with("seed:") => {
            let seed = seed.parse::<Seed>()?;
            Ok(Game::parse(map)?.with_seed(seed))
        }
        [seed, map, ..] if *seed == NO_SEED => Game::parse(map),
        [puzzle, ..] => Game::parse(puzzle),
        [] => Game::parse(line),
    }
}

/// Formats a solved game as a line of a maps file.
pub fn format_line(solved: &GameWithSolution) -> String {
    let seed = solved
        .game()
        .seed()
        .map_or_else(|| NO_SEED.to_string(), ToString::to_string);
    format!(
        "{} {} {}",
        seed,
        solved.game().to_map_string(),
        solved.moves()
    )
}

/// Reads all games of the maps file at `path`, skipping empty lines.
pub fn read_maps_file(path: &Path) -> Result<Vec<Game>, CliError> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(line).map_err(|err| CliError::MapsLine(index + 1, err)))
        .collect()
}

/// Writes `lines` to the file at `output`, or to stdout if there is none.
pub fn write_lines(output: Option<&Path>, lines: &[String]) -> io::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let content = lines
                .iter()
                .map(|line| format!("{}\n", line))
                .collect::<String>();
            fs::write(path, content)
        }
        None => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
    }
}
