//! Knockout rounds: semi-finals, finals and, in 2v2, the 1v1 grand final.
//!
//! Single loss is out. Each round is drawn as soon as the tournament enters
//! it; the winners of one round carry over, in match order, into the next.

use crate::error::TournamentError;
use crate::logic::match_generator::draw_knockout;
use crate::logic::result_processor::process_round;
use crate::models::{MatchId, RoundType, Side, Tournament, TournamentPhase};
use rand::Rng;
use std::collections::HashMap;

pub(crate) fn phase_for_round(round: RoundType) -> TournamentPhase {
    match round {
        RoundType::GroupPlay => TournamentPhase::GroupPlay,
        RoundType::SemiFinals => TournamentPhase::SemiFinals,
        RoundType::Finals => TournamentPhase::Finals,
        RoundType::GrandFinals => TournamentPhase::GrandFinals,
    }
}

pub(crate) fn round_for_phase(phase: TournamentPhase) -> Option<RoundType> {
    match phase {
        TournamentPhase::SemiFinals => Some(RoundType::SemiFinals),
        TournamentPhase::Finals => Some(RoundType::Finals),
        TournamentPhase::GrandFinals => Some(RoundType::GrandFinals),
        _ => None,
    }
}

/// Draw `round` from the active pool and switch the tournament into it.
/// The active list is reordered to match the draw.
pub(crate) fn enter_knockout_round<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    round: RoundType,
    rng: &mut R,
) -> Result<(), TournamentError> {
    let draw = draw_knockout(&tournament.active, round, tournament.mode, rng)?;
    tournament.active = draw.playing_order();
    tournament.matches = draw.matches;
    tournament.sit_outs.clear();
    tournament.pending_results.clear();
    tournament.round_number += 1;
    tournament.phase = phase_for_round(round);
    log::info!(
        "Tournament {} entering {:?} with {} matches",
        tournament.id,
        round,
        tournament.matches.len()
    );
    Ok(())
}

/// Process the current knockout round and advance:
/// semi-finals → finals → grand final → completed. A 1v1 final has a single
/// winner and ends the tournament. In 2v2 with the grand final switched off
/// the finals winners complete it as co-winners.
pub fn process_knockout_results<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    results: &HashMap<MatchId, Side>,
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.ensure_mutable()?;
    let round = round_for_phase(tournament.phase).ok_or(TournamentError::InvalidPhaseAction {
        action: "submit knockout results",
        phase: tournament.phase,
    })?;
    if !tournament.round_in_progress() {
        return Err(TournamentError::InvalidPhaseAction {
            action: "submit results before generating matches",
            phase: tournament.phase,
        });
    }

    let active = process_round(tournament, results)?;
    log::info!(
        "Tournament {} {:?} processed: {} players advance",
        tournament.id,
        round,
        active
    );

    match round {
        RoundType::SemiFinals => enter_knockout_round(tournament, RoundType::Finals, rng),
        RoundType::Finals if tournament.grand_finals && tournament.mode.has_grand_final() => {
            enter_knockout_round(tournament, RoundType::GrandFinals, rng)
        }
        RoundType::Finals | RoundType::GrandFinals => {
            complete(tournament);
            Ok(())
        }
        RoundType::GroupPlay => Ok(()),
    }
}

fn complete(tournament: &mut Tournament) {
    tournament.winners = tournament.active.clone();
    tournament.phase = TournamentPhase::Completed;
    let names: Vec<&str> = tournament
        .active_players()
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    log::info!(
        "Tournament {} completed, winner(s): {}",
        tournament.id,
        names.join(", ")
    );
}
