//! Run a whole tournament with random results and print the final state as JSON.
//! Run with: cargo run --bin simulate -- [players]
//! Settings come from TOURNAMENT_MAX_LOSSES, TOURNAMENT_RNG_SEED, TOURNAMENT_GRAND_FINALS
//! and TOURNAMENT_MODE (`2v2` or `1v1`).

use dart_tournament_engine::{
    MatchId, PhaseController, Side, Tournament, TournamentConfig, TournamentError,
    TournamentPhase, TournamentStore,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::Arc;

fn default_players() -> usize {
    14
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let players = match std::env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(_) => {
                log::error!("Player count must be a number, got {:?}", arg);
                return ExitCode::FAILURE;
            }
        },
        None => default_players(),
    };

    let tournament = match run(players) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&tournament) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Could not serialize tournament: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(players: usize) -> Result<Tournament, TournamentError> {
    let config = TournamentConfig::from_env()?;
    let mut results_rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    let controller = PhaseController::new(Arc::new(TournamentStore::new()));
    let id = controller.create_tournament(config)?;
    for i in 1..=players {
        controller.add_player(id, &format!("Player {i}"))?;
    }
    controller.start(id)?;

    loop {
        let snapshot = controller.snapshot(id)?;
        match snapshot.phase() {
            TournamentPhase::Completed => break,
            TournamentPhase::GroupPlay => controller.generate_matches(id)?,
            TournamentPhase::FinalSelection => {
                let needed = snapshot.players_needed_for_knockout();
                let pick: Vec<_> = snapshot
                    .last_eliminated_ids()
                    .iter()
                    .take(needed)
                    .copied()
                    .collect();
                if pick.len() < needed {
                    log::warn!(
                        "Only {} players available to rejoin, {} needed; stopping",
                        pick.len(),
                        needed
                    );
                    break;
                }
                controller.repopulate(id, &pick)?;
                continue;
            }
            _ => {}
        }

        let snapshot = controller.snapshot(id)?;
        if snapshot.matches().is_empty() {
            continue;
        }
        let results: HashMap<MatchId, Side> = snapshot
            .matches()
            .iter()
            .map(|m| (m.id, if results_rng.gen_bool(0.5) { Side::A } else { Side::B }))
            .collect();
        controller.submit_results(id, &results)?;
    }

    controller.snapshot(id)
}
