use clap::Parser;
use match3_engine::config::GameConfig;
use match3_engine::game::Game;
use match3_engine::heuristics::{
    choose_swap_cascade, choose_swap_first, choose_swap_lowest, choose_swap_mis, Swap,
};
use match3_engine::random::SeededRandom;
use std::collections::HashMap;
use tracing::warn;
use tracing_subscriber::EnvFilter;

type StrategyFn = fn(&Game<SeededRandom>) -> Option<(f64, Swap)>;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare swap strategies over seeded games", long_about = None)]
struct Args {
    /// Number of seeded games per strategy
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Swaps played per game
    #[clap(short, long, default_value_t = 30)]
    moves: u32,

    /// First seed; games use consecutive seeds from here
    #[clap(short, long, default_value_t = 0)]
    seed: u64,
}

fn first(game: &Game<SeededRandom>) -> Option<(f64, Swap)> {
    choose_swap_first(game.grid())
}

fn mis(game: &Game<SeededRandom>) -> Option<(f64, Swap)> {
    choose_swap_mis(game.grid())
}

fn lowest(game: &Game<SeededRandom>) -> Option<(f64, Swap)> {
    choose_swap_lowest(game.grid())
}

#[derive(Default)]
struct Totals {
    scores: Vec<u32>,
    cascades: u32,
    longest_cascade: u32,
    swaps: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let strategies: Vec<(&str, StrategyFn)> = vec![
        ("FIRST", first as StrategyFn),
        ("MIS", mis as StrategyFn),
        ("LOW", lowest as StrategyFn),
        ("CASCADE", choose_swap_cascade::<SeededRandom> as StrategyFn),
    ];

    let mut all_totals: HashMap<&str, Totals> = HashMap::new();

    println!("Starting heuristic evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx;
        println!("\nEvaluating Board {} (Seed: {})", board_idx, current_seed);

        for (strategy_name, strategy_fn) in &strategies {
            // Every strategy sees the same board and the same refill sequence.
            let mut game = Game::new(GameConfig::default(), SeededRandom::new(current_seed))?;
            let totals = all_totals.entry(*strategy_name).or_default();

            for _ in 0..args.moves {
                let Some((_, (a, b))) = strategy_fn(&game) else {
                    break;
                };
                let outcome = game.attempt_swap(a, b)?;
                if !outcome.accepted {
                    warn!(
                        strategy = *strategy_name,
                        seed = current_seed,
                        "strategy chose a rejected swap {} {}",
                        a,
                        b
                    );
                    break;
                }
                totals.swaps += 1;
                totals.cascades += outcome.cascade_steps;
                totals.longest_cascade = totals.longest_cascade.max(outcome.cascade_steps);
            }
            totals.scores.push(game.score());
            println!(
                "  Strategy: {:<10}, Score: {:<6}, Moves: {}",
                strategy_name,
                game.score(),
                game.moves()
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!(
        "Strategies evaluated: {}",
        strategies.iter().map(|(name, _)| *name).collect::<Vec<&str>>().join(", ")
    );
    println!("\n--- Average Scores ---");

    let mut sorted: Vec<(&str, f64, f64, u32)> = Vec::new();
    for (strategy_name, totals) in &all_totals {
        if totals.scores.is_empty() {
            println!("Strategy {}: No scores recorded.", strategy_name);
            continue;
        }
        let total_score: u32 = totals.scores.iter().sum();
        let avg_score = total_score as f64 / totals.scores.len() as f64;
        let avg_cascade = if totals.swaps == 0 {
            0.0
        } else {
            totals.cascades as f64 / totals.swaps as f64
        };
        sorted.push((*strategy_name, avg_score, avg_cascade, totals.longest_cascade));
    }

    // Sort by average score descending
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (strategy_name, avg_score, avg_cascade, longest) in sorted {
        println!(
            "Strategy {:<10}: Average Score = {:.2}, Passes/Swap = {:.2}, Longest Cascade = {}",
            strategy_name, avg_score, avg_cascade, longest
        );
    }
    Ok(())
}
