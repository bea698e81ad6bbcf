mod maps;
mod profile;

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::PathBuf;
use std::process;

use chrono::Local;
use clap::{Args, CommandFactory, Parser, Subcommand};
use log::{debug, info, warn};
use rayon::prelude::*;
use text_io::read;
use thiserror::Error;

use sliding_board::generator::Generator;
use sliding_board::{Game, ParseError};
use sliding_rank::{GameRanker, GameWithSolution};
use sliding_solver::{BreadthFirst, SearchConfig, Solution, SolveError, VisitedBitSet};

use crate::profile::TimeStatistics;

/// Number of puzzles generated and solved in parallel at once.
const GENERATE_BATCH: usize = 64;

#[derive(Parser)]
#[command(name = "srcli")]
#[command(about = "Solve, generate and rank sliding robots puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single puzzle and print its moves as JSON
    Solve(SolveArgs),
    /// Generate random puzzles with solution lengths in a range, ranked from easy to hard
    Generate(GenerateArgs),
    /// Measure solving times on random seeds or on the puzzles of a maps file
    Profile(ProfileArgs),
    /// Rank the puzzles of a maps file from easy to hard
    Rank(RankArgs),
}

#[derive(Args)]
struct SolveArgs {
    /// Map or seed string, read from stdin if missing
    #[arg(value_name = "PUZZLE")]
    puzzle: Option<String>,

    /// Also collect solutions up to this many moves longer than the shortest one
    #[arg(long)]
    extra_depth: Option<usize>,

    /// Give up after visiting this many states
    #[arg(long)]
    max_visited: Option<usize>,

    /// Print the board, the statistics and the moves in readable form
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct BoardArgs {
    /// Number of columns
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Number of rows
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Generate one-way puzzles
    #[arg(long)]
    oneway: bool,

    /// Seed of the random generator, for reproducible runs
    #[arg(long)]
    rng_seed: Option<u128>,
}

impl BoardArgs {
    fn generator(&self) -> Generator {
        match self.rng_seed {
            Some(seed) => Generator::from_seed(seed, self.width, self.height, self.oneway),
            None => Generator::new(self.width, self.height, self.oneway),
        }
    }
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    board: BoardArgs,

    /// Smallest number of moves of a kept puzzle
    #[arg(long, default_value_t = 5)]
    min_moves: usize,

    /// Largest number of moves of a kept puzzle
    #[arg(long, default_value_t = 12)]
    max_moves: usize,

    /// Number of puzzles to keep per number of moves
    #[arg(long, default_value_t = 10)]
    per_move: usize,

    /// Give up after generating this many puzzles
    #[arg(long, default_value_t = 100_000)]
    max_attempts: usize,

    /// Maps file to write, stdout if missing
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ProfileArgs {
    #[command(flatten)]
    board: BoardArgs,

    /// Number of puzzles to solve, 0 solves all puzzles of the maps file
    #[arg(long, default_value_t = 100)]
    runs: usize,

    /// Maps file to take the puzzles from instead of random seeds
    #[arg(long)]
    maps: Option<PathBuf>,

    /// Maps file to write the solved puzzles to
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct RankArgs {
    /// Maps file with the puzzles to rank
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Moves beyond the shortest solution to count solutions for
    #[arg(long, default_value_t = 2)]
    extra_depth: usize,

    /// Maps file to write, stdout if missing
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log the values of every puzzle on all axes
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Line {0} of the maps file: {1}")]
    MapsLine(usize, #[source] ParseError),
    #[error("The minimum of {0} moves is larger than the maximum of {1} moves")]
    InvalidRange(usize, usize),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Solve(args) => solve_command(args),
        Commands::Generate(args) => generate_command(args),
        Commands::Profile(args) => profile_command(args),
        Commands::Rank(args) => rank_command(args),
    };

    match result {
        Ok(()) => {}
        Err(CliError::Solve(SolveError::NoSolution)) => {
            println!("No solution");
            process::exit(1);
        }
        Err(err @ (CliError::Parse(_) | CliError::MapsLine(..) | CliError::InvalidRange(..))) => {
            eprintln!("{}\n", err);
            Cli::command().print_help().ok();
            process::exit(2);
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

fn solve(game: &Game, config: SearchConfig) -> Result<Solution, SolveError> {
    BreadthFirst::<VisitedBitSet>::with_config(config).search(
        game.board(),
        game.initial_state(),
        &game.waypoints(),
    )
}

/// Creates `count` games from `generator`.
fn generate_games(generator: &mut Generator, count: usize) -> Result<Vec<Game>, ParseError> {
    generator
        .by_ref()
        .take(count)
        .map(|seed| seed.and_then(|seed| seed.to_game()))
        .collect()
}

fn solve_command(args: SolveArgs) -> Result<(), CliError> {
    let puzzle = match args.puzzle {
        Some(puzzle) => puzzle,
        None => read!("{}\n"),
    };
    let game = Game::parse(puzzle.trim())?;
    if args.verbose {
        println!("{:?}", game);
    }

    let config = SearchConfig {
        extra_depth: args.extra_depth,
        max_visited: args.max_visited,
    };
    let solution = solve(&game, config)?;
    println!("{}", solution.to_json()?);

    if args.verbose {
        println!("{}", solution.statistics());
        for line in solution.describe() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn generate_command(args: GenerateArgs) -> Result<(), CliError> {
    if args.min_moves > args.max_moves {
        return Err(CliError::InvalidRange(args.min_moves, args.max_moves));
    }

    info!(
        "{}> Generating maps from {} to {} moves, {} maps each",
        Local::now(),
        args.min_moves,
        args.max_moves,
        args.per_move
    );

    let mut generator = args.board.generator();
    let mut remaining = (args.min_moves..=args.max_moves).collect::<BTreeSet<_>>();
    let mut kept: BTreeMap<usize, Vec<Game>> = BTreeMap::new();
    let mut generated = 0;
    let mut no_solution = 0;

    while !remaining.is_empty() && generated < args.max_attempts {
        let games = generate_games(&mut generator, GENERATE_BATCH)?;
        generated += games.len();

        let lengths = games
            .par_iter()
            .map(|game| solve(game, SearchConfig::default()).map(|solution| solution.len()))
            .collect::<Vec<_>>();

        for (game, length) in games.into_iter().zip(lengths) {
            match length {
                Ok(length) if remaining.contains(&length) => {
                    let games = kept.entry(length).or_default();
                    games.push(game);
                    if games.len() == args.per_move {
                        remaining.remove(&length);
                        info!(
                            "Maps with {} moves finished, remaining: {:?}",
                            length, remaining
                        );
                    }
                }
                Ok(_) => {}
                Err(_) => no_solution += 1,
            }
        }
        debug!(
            "Generated {} maps, {} without a solution",
            generated, no_solution
        );
    }

    if !remaining.is_empty() {
        warn!(
            "Gave up after {} maps, missing maps with {:?} moves",
            generated, remaining
        );
    }

    info!("{}> Ranking the kept maps", Local::now());
    let solved = kept
        .into_values()
        .flatten()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|game| {
            let solution = solve(&game, SearchConfig::with_extra_depth(2))?;
            Ok(GameWithSolution::new(game, solution))
        })
        .collect::<Result<Vec<_>, SolveError>>()?;
    let lines = GameRanker::new()
        .rank(solved)
        .iter()
        .map(|ranked| maps::format_line(ranked.game()))
        .collect::<Vec<_>>();
    maps::write_lines(args.output.as_deref(), &lines)?;

    info!("Total maps saved =            {}", lines.len());
    info!("Total maps generated =        {}", generated);
    info!("Total maps with no solution = {}", no_solution);
    Ok(())
}

fn profile_command(args: ProfileArgs) -> Result<(), CliError> {
    let games = match &args.maps {
        Some(path) => {
            let mut games = maps::read_maps_file(path)?;
            if args.runs > 0 {
                games.truncate(args.runs);
            }
            games
        }
        None => generate_games(&mut args.board.generator(), args.runs)?,
    };

    info!(
        "{}> Profiling {} maps ({}x{})",
        Local::now(),
        games.len(),
        args.board.width,
        args.board.height
    );

    let mut times = Vec::with_capacity(games.len());
    let mut solved = Vec::with_capacity(games.len());
    let mut no_solution = 0;
    for (run, game) in games.into_iter().enumerate() {
        match solve(&game, SearchConfig::default()) {
            Ok(solution) => {
                let time = solution.statistics().time();
                if run % 20 == 0 {
                    info!("Run {} took {:?}", run, time);
                }
                times.push(time);
                solved.push(GameWithSolution::new(game, solution));
            }
            Err(SolveError::NoSolution) => no_solution += 1,
            Err(err) => return Err(err.into()),
        }
    }

    info!("{}> Finished profiling", Local::now());
    println!("Total run count =   {}", solved.len() + no_solution);
    println!("  no solution # =   {}", no_solution);
    println!("{}", TimeStatistics::new(&times));

    if let Some(output) = &args.output {
        let lines = solved.iter().map(maps::format_line).collect::<Vec<_>>();
        maps::write_lines(Some(output), &lines)?;
        info!("Maps dumped to file {}", output.display());
    }
    Ok(())
}

fn rank_command(args: RankArgs) -> Result<(), CliError> {
    let games = maps::read_maps_file(&args.file)?;
    info!("{}> Solving {} maps", Local::now(), games.len());

    let config = SearchConfig::with_extra_depth(args.extra_depth);
    let solved = games
        .into_par_iter()
        .filter_map(|game| match solve(&game, config) {
            Ok(solution) => Some(Ok(GameWithSolution::new(game, solution))),
            Err(SolveError::NoSolution) => {
                warn!("Skipping {}, it has no solution", game.to_compact_string());
                None
            }
            Err(err) => Some(Err(err)),
        })
        .collect::<Result<Vec<_>, SolveError>>()?;

    let ranked = GameRanker::new().rank(solved);
    if args.verbose {
        for (place, ranked) in ranked.iter().enumerate() {
            info!("{:>4}: {}", place + 1, ranked.describe());
        }
    }
    let lines = ranked
        .iter()
        .map(|ranked| maps::format_line(ranked.game()))
        .collect::<Vec<_>>();
    maps::write_lines(args.output.as_deref(), &lines)?;
    Ok(())
}
