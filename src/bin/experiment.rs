//! Win-rate experiment across search depths
//!
//! For every depth in the configured range, plays a batch of seeded matches with
//! random start positions in parallel and tallies wins per player.
//!
//! Usage: experiment [config.toml]

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::process;
use std::time::Instant;

use tron_search::arena::{Arena, MatchResult};
use tron_search::config::Config;
use tron_search::simple_profiler;

#[derive(Debug, Default, Serialize)]
struct DepthSummary {
    depth: u32,
    matches: usize,
    wins: BTreeMap<String, usize>,
    draws: usize,
    unfinished: usize,
    errors: usize,
    timestamp: String,
}

/// Seed of one match; wraps instead of overflowing for large base seeds
fn match_seed(base_seed: u64, depth: u32, index: usize) -> u64 {
    base_seed
        .wrapping_add(u64::from(depth).wrapping_mul(1_000_000))
        .wrapping_add(index as u64)
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    }

    let randomised = config.with_random_starts();
    let names: Vec<String> = config.players.iter().map(|p| p.name.clone()).collect();
    let matches = config.experiment.matches_per_depth;

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                 WIN-RATE EXPERIMENT");
    println!("═══════════════════════════════════════════════════════════");
    println!("Grid:      {}x{}", config.game.grid_size, config.game.grid_size);
    println!("Mode:      {:?}", config.game.mode);
    println!(
        "Depths:    {}..={}",
        config.experiment.min_depth, config.experiment.max_depth
    );
    println!("Matches:   {} per depth", matches);
    for player in &config.players {
        println!("  {:<12} {:?}", player.name, player.strategy);
    }
    println!("═══════════════════════════════════════════════════════════\n");

    let start_time = Instant::now();
    let mut summaries = Vec::new();

    for depth in config.experiment.min_depth..=config.experiment.max_depth {
        let arena = Arena::new(
            config.game.mode,
            depth,
            config.players.iter().map(|p| p.strategy).collect(),
            config.evaluation.to_evaluation(),
        );

        let tally = Mutex::new(DepthSummary {
            depth,
            matches,
            ..Default::default()
        });

        (0..matches).into_par_iter().for_each(|index| {
            let seed = match_seed(config.experiment.base_seed, depth, index);
            let mut rng = StdRng::seed_from_u64(seed);

            let outcome = randomised
                .initial_state(&mut rng)
                .and_then(|state| arena.run_match(state, &mut rng, |_, _| {}));
            simple_profiler::merge_thread_local();

            let mut summary = tally.lock();
            match outcome {
                Ok(outcome) => match outcome.result {
                    MatchResult::Winner(id) => {
                        *summary.wins.entry(names[id].clone()).or_insert(0) += 1;
                    }
                    MatchResult::WinningTeam(team) => {
                        for id in team {
                            *summary.wins.entry(names[id].clone()).or_insert(0) += 1;
                        }
                    }
                    MatchResult::Survivors(_) => summary.unfinished += 1,
                    MatchResult::Draw => summary.draws += 1,
                },
                Err(e) => {
                    eprintln!("Match {} at depth {} failed: {}", index, depth, e);
                    summary.errors += 1;
                }
            }
        });

        let mut summary = tally.into_inner();
        summary.timestamp = chrono::Utc::now().to_rfc3339();
        println!("Depth {}", depth);
        for name in &names {
            println!("  Player : {:<12} : {}", name, summary.wins.get(name).copied().unwrap_or(0));
        }
        println!("  Draws  : {}", summary.draws);
        if summary.unfinished > 0 {
            println!("  Several teams standing : {}", summary.unfinished);
        }
        println!();
        summaries.push(summary);
    }

    simple_profiler::print_report(start_time.elapsed().as_millis() as u64);

    // One machine-readable line per depth for plotting
    for summary in &summaries {
        match serde_json::to_string(summary) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialise summary: {}", e),
        }
    }
}
