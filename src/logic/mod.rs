//! Tournament business logic: setup, group play, final selection, knockout rounds.

mod final_selection;
mod finals;
mod group_play;
pub mod match_generator;
pub mod result_processor;
mod setup;

pub use final_selection::add_players_back_from_last_eliminated;
pub use finals::process_knockout_results;
pub use group_play::{generate_group_play_matches, process_group_play_results};
pub use match_generator::{draw_group_play, draw_knockout, RoundDraw};
pub use result_processor::process_round;
pub use setup::start_tournament;

use crate::error::TournamentError;
use crate::models::{LossAdjustment, MatchId, PlayerId, Side, Tournament, TournamentPhase};
use rand::Rng;
use std::collections::HashMap;

/// Generate the current round's matches. Only group play rounds are generated
/// on request; knockout rounds are drawn when the tournament enters them.
pub fn generate_matches<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    match tournament.phase {
        TournamentPhase::GroupPlay => generate_group_play_matches(tournament, rng),
        TournamentPhase::Completed => Err(TournamentError::AlreadyCompleted),
        phase => Err(TournamentError::InvalidPhaseAction {
            action: "generate matches",
            phase,
        }),
    }
}

/// Submit the whole round at once and advance the phase.
pub fn submit_results<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    results: &HashMap<MatchId, Side>,
    rng: &mut R,
) -> Result<(), TournamentError> {
    match tournament.phase {
        TournamentPhase::GroupPlay => process_group_play_results(tournament, results, rng),
        TournamentPhase::SemiFinals | TournamentPhase::Finals | TournamentPhase::GrandFinals => {
            process_knockout_results(tournament, results, rng)
        }
        TournamentPhase::Completed => Err(TournamentError::AlreadyCompleted),
        phase => Err(TournamentError::InvalidPhaseAction {
            action: "submit results",
            phase,
        }),
    }
}

/// Submit the winners recorded so far with [`Tournament::record_winner`].
pub fn submit_recorded_results<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    let results = tournament.pending_results.clone();
    submit_results(tournament, &results, rng)
}

/// Manually eliminate an active player, then re-check whether group play is over.
pub fn eliminate_player<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    player_id: PlayerId,
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.force_eliminate(player_id)?;
    group_play::recheck_group_play(tournament, rng)
}

/// Adjust a player's losses by one. If that eliminates them, re-check whether
/// group play is over. Returns the new loss count.
pub fn adjust_player_losses<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    player_id: PlayerId,
    adjustment: LossAdjustment,
    rng: &mut R,
) -> Result<u32, TournamentError> {
    let before = tournament.active.len();
    let losses = tournament.adjust_losses(player_id, adjustment)?;
    if tournament.active.len() < before {
        group_play::recheck_group_play(tournament, rng)?;
    }
    Ok(losses)
}
