//! Group stage: match generation and result processing.

use crate::error::TournamentError;
use crate::logic::final_selection::enter_final_selection;
use crate::logic::match_generator::draw_group_play;
use crate::logic::result_processor::process_round;
use crate::models::{MatchId, Side, Tournament, TournamentPhase};
use rand::Rng;
use std::collections::HashMap;

/// Generate matches for the current group play round.
///
/// With too few active players for one match nobody can play. No round is
/// counted, no sit-out is recorded and the tournament moves straight to final
/// selection instead of waiting for results that can never arrive.
pub fn generate_group_play_matches<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.ensure_phase("generate group play matches", &[TournamentPhase::GroupPlay])?;
    if tournament.round_in_progress() {
        return Err(TournamentError::InvalidPhaseAction {
            action: "generate matches while a round is in progress",
            phase: tournament.phase,
        });
    }

    let pool = tournament.active.clone();
    let draw = draw_group_play(&mut tournament.registry, &pool, tournament.mode, rng)?;

    if draw.matches.is_empty() {
        log::warn!(
            "Tournament {}: only {} active players, no group play match possible",
            tournament.id,
            tournament.active.len()
        );
        return enter_final_selection(tournament, rng);
    }

    tournament.round_number += 1;
    tournament.matches = draw.matches;
    tournament.sit_outs = draw.sit_outs;
    tournament.pending_results.clear();

    log::info!(
        "Tournament {} round {}: {} matches, {} sitting out",
        tournament.id,
        tournament.round_number,
        tournament.matches.len(),
        tournament.sit_outs.len()
    );
    Ok(())
}

/// Process the current round's results: apply wins/losses, eliminate at max
/// losses, and move to final selection once the knockout field is reached.
pub fn process_group_play_results<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    results: &HashMap<MatchId, Side>,
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.ensure_phase("submit group play results", &[TournamentPhase::GroupPlay])?;
    if !tournament.round_in_progress() {
        return Err(TournamentError::InvalidPhaseAction {
            action: "submit results before generating matches",
            phase: tournament.phase,
        });
    }

    let active = process_round(tournament, results)?;
    log::info!(
        "Tournament {} round {} processed: {} active, {} eliminated this round",
        tournament.id,
        tournament.round_number,
        active,
        tournament.last_eliminated.len()
    );

    if active <= tournament.knockout_field() {
        enter_final_selection(tournament, rng)?;
    }
    Ok(())
}

/// Between group play rounds, a manual elimination that brings the field
/// down to knockout size starts final selection without another round.
pub(crate) fn recheck_group_play<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.phase == TournamentPhase::GroupPlay
        && !tournament.round_in_progress()
        && tournament.active.len() <= tournament.knockout_field()
    {
        log::info!(
            "Tournament {}: {} players left after manual elimination",
            tournament.id,
            tournament.active.len()
        );
        enter_final_selection(tournament, rng)?;
    }
    Ok(())
}
