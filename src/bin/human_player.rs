use clap::Parser;
use match3_engine::config::GameConfig;
use match3_engine::engine::Position;
use match3_engine::game::{Game, Rejection, Selection};
use match3_engine::random::SeededRandom;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play the match-three puzzle in the terminal", long_about = None)]
struct Args {
    /// Number of rows
    #[clap(long, default_value_t = 8)]
    rows: usize,

    /// Number of columns
    #[clap(long, default_value_t = 10)]
    cols: usize,

    /// Number of token types
    #[clap(short, long, default_value_t = 6)]
    types: u8,

    /// Seed for a reproducible game; random when omitted
    #[clap(short, long)]
    seed: Option<u64>,

    /// Maximum cascade passes per swap
    #[clap(long, default_value_t = 1000)]
    max_cascade: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = GameConfig {
        rows: args.rows,
        cols: args.cols,
        token_types: args.types,
        max_cascade_steps: args.max_cascade,
        match_free_start: true,
    };
    let rng = match args.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    let mut game = Game::new(config, rng)?;
    let mut selection = Selection::default();
    println!("Welcome to Match Three!");

    loop {
        println!("---------------------");
        println!("Moves: {}, Score: {}", game.moves(), game.score());
        println!("{}", game.grid().to_string_with_highlight(selection.pending()));

        if game.is_game_over() {
            println!();
            println!("---------------------");
            println!("GAME OVER! No swap can make a match.");
            println!("Final Score: {}", game.score());
            println!("Total Moves: {}", game.moves());
            println!("---------------------");
            break;
        }

        print!("Select a cell (row col), 'h' for a hint, 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "h" {
            match game.hint() {
                Some((a, b)) => println!("Try swapping {} and {}.", a, b),
                None => println!("No swap available."),
            }
            continue;
        }

        let parts: Vec<&str> = trimmed_input.split_whitespace().collect();
        let pos = match parts.as_slice() {
            [r, c] => match (r.parse::<usize>(), c.parse::<usize>()) {
                (Ok(r), Ok(c)) => Position::new(r, c),
                _ => {
                    println!("Invalid input: Please enter numbers for row and column (e.g., '3 4').");
                    continue;
                }
            },
            _ => {
                println!("Invalid input format. Use 'row col', 'h', or 'q'.");
                continue;
            }
        };

        if !game.grid().contains(pos) {
            println!(
                "Invalid coordinates: Row must be below {} and column below {}.",
                game.grid().rows(),
                game.grid().cols()
            );
            continue;
        }

        let Some((a, b)) = selection.select(pos) else {
            continue;
        };
        let outcome = game.attempt_swap(a, b)?;
        match outcome.rejection {
            None => {
                for step in &outcome.steps {
                    println!(
                        "Cascade {}: {} run(s), {} cells, +{}",
                        step.index,
                        step.runs.len(),
                        step.cleared,
                        step.points
                    );
                }
                println!("Swap accepted: +{} points.", outcome.score_delta);
                if outcome.capped {
                    println!("Cascade stopped after {} passes.", outcome.cascade_steps);
                }
            }
            Some(Rejection::NotAdjacent) => println!("Those cells are not neighbours."),
            Some(Rejection::NoMatch) => println!("That swap makes no match."),
        }
    }
    Ok(())
}
