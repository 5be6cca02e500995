use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::process;
use std::time::Instant;

use tron_search::arena::MatchResult;
use tron_search::config::Config;
use tron_search::simple_profiler;
use tron_search::state::GameState;

fn print_grid(turn: u32, state: &GameState) {
    println!("Turn {}", turn);
    for row in state.render() {
        let spaced: Vec<String> = row.chars().map(|c| c.to_string()).collect();
        println!(" {}", spaced.join("  "));
    }
    println!();
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    // Optional first argument overrides the config path
    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    }

    let mut rng = match config.game.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let initial = match config.initial_state(&mut rng) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Could not build the initial state: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Starting {:?} match on a {}x{} grid, depth {}",
        config.game.mode, config.game.grid_size, config.game.grid_size, config.game.depth
    );
    for (player, settings) in initial.players().iter().zip(&config.players) {
        info!("  {} ({}) plays {:?}", player.name, player.symbol, settings.strategy);
    }

    let arena = config.build_arena();
    let show = config.display.print_grid;
    if show {
        print_grid(0, &initial);
    }

    let start_time = Instant::now();
    let outcome = arena.run_match(initial, &mut rng, |turn, state| {
        if show {
            print_grid(turn, state);
        }
    });

    simple_profiler::merge_thread_local();
    simple_profiler::print_report(start_time.elapsed().as_millis() as u64);

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Match aborted: {}", e);
            process::exit(1);
        }
    };

    let name = |id: usize| {
        outcome
            .final_state
            .player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("player {}", id))
    };

    println!("Game over after {} turns", outcome.turns);
    match &outcome.result {
        MatchResult::Winner(id) => println!("Winner: {}", name(*id)),
        MatchResult::WinningTeam(team) => {
            let names: Vec<String> = team.iter().map(|&id| name(id)).collect();
            println!("Winning team: {}", names.join(", "));
        }
        MatchResult::Survivors(teams) => {
            warn!("Match stopped with {} teams standing", teams.len());
            for team in teams {
                let names: Vec<String> = team.iter().map(|&id| name(id)).collect();
                println!("Still standing: {}", names.join(", "));
            }
        }
        MatchResult::Draw => println!("Draw: nobody survived"),
    }
}
