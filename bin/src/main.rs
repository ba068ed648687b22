use clap::{ArgEnum, Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rs_balda_solver::*;
use std::error::Error;
use std::path::Path;
use std::time::Instant;

/// Bots playing Balda against each other, and tools for the dictionary index they search.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a file that contains the dictionary, with one word on each line.
    #[clap(short = 'f', long)]
    words_file: String,

    /// Where the dictionary index is saved. Defaults to the words file with an `exact.ron` or
    /// `approximate.ron` extension.
    #[clap(short = 'i', long)]
    index_file: Option<String>,

    /// Use the Bloom-filter index instead of the exact one. It is smaller, but may accept a few
    /// strings that are not words, and cannot bound the length of a word.
    #[clap(short = 'a', long)]
    approximate: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the dictionary index and save it.
    Build,
    /// Check a string against the dictionary index.
    Check { word: String },
    /// Let bots play a game against each other.
    Play {
        #[clap(long, default_value_t = 5)]
        rows: usize,
        #[clap(long, default_value_t = 5)]
        cols: usize,
        /// The starting word. Chosen at random from the dictionary if not given.
        #[clap(long)]
        word: Option<String>,
        #[clap(long, default_value_t = 2)]
        bots: usize,
        #[clap(long, arg_enum, default_value = "incremental")]
        strategy: Strategy,
        /// Seeds the choice of starting word.
        #[clap(long)]
        seed: Option<u64>,
    },
}

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Exhaustive,
    Incremental,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let start_time = Instant::now();
    let args = Args::parse();

    let index_file = args
        .index_file
        .clone()
        .unwrap_or_else(|| default_index_file(&args.words_file, args.approximate));
    if args.approximate {
        let dictionary = load_or_build(&index_file, &args.words_file, |bank| {
            ApproximateDictionary::new(bank, FilterConfig::default())
        })?;
        run_command(&dictionary, args.command)?;
    } else {
        let dictionary = load_or_build(&index_file, &args.words_file, ExactDictionary::new)?;
        info!(
            "Exact dictionary has {} words and {} parts",
            dictionary.num_words(),
            dictionary.num_parts()
        );
        run_command(&dictionary, args.command)?;
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn default_index_file(words_file: &str, approximate: bool) -> String {
    let extension = if approximate {
        "approximate.ron"
    } else {
        "exact.ron"
    };
    Path::new(words_file)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}

fn run_command<D: Dictionary>(dictionary: &D, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        // Loading already built and saved the index if it was missing.
        Command::Build => println!("The dictionary index is ready."),
        Command::Check { word } => {
            let word = word.trim().to_uppercase();
            let result = dictionary.check(&word);
            match result.potential {
                Some(potential) => println!(
                    "{}: {} (longest word containing it: {})",
                    word, result.membership, potential
                ),
                None => println!("{}: {}", word, result.membership),
            }
        }
        Command::Play {
            rows,
            cols,
            word,
            bots,
            strategy,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let word = match word {
                Some(word) => word,
                None => dictionary
                    .get_word(cols, &mut rng)
                    .ok_or_else(|| format!("The dictionary has no words with {} letters.", cols))?
                    .to_string(),
            };
            let board = Board::with_initial_word(rows, cols, &word)?;
            match strategy {
                Strategy::Exhaustive => play(board, bots, |alphabet| {
                    ExhaustiveSearch::new(dictionary, alphabet)
                })?,
                Strategy::Incremental => play(board, bots, |alphabet| {
                    IncrementalSearch::new(dictionary, alphabet)
                })?,
            }
        }
    }
    Ok(())
}

fn play<G, F>(mut board: Board, bots: usize, new_bot: F) -> Result<(), BaldaError>
where
    G: Guesser,
    F: Fn(Alphabet) -> G,
{
    println!("Starting board:\n{}", board);
    let mut players: Vec<G> = (0..bots).map(|_| new_bot(Alphabet::russian())).collect();
    let result = play_game(&mut board, &mut players)?;

    for played in &result.moves {
        println!(
            "Bot {} placed {} at {}: {} (+{})",
            played.player,
            played.played.letter,
            played.played.cell,
            played.played.word,
            played.played.score()
        );
    }
    println!("\nFinal board:\n{}", board);
    match result.end {
        GameEnd::AllPassed => println!("Every bot passed."),
        GameEnd::BoardFull => println!("The board is full."),
    }
    for (player, score) in result.scores.iter().enumerate() {
        println!("Bot {}: {}", player, score);
    }
    Ok(())
}
