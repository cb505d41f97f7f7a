//! Result processing: apply a full round of winners to player records.

use crate::error::TournamentError;
use crate::models::{MatchId, PlayerId, Side, Tournament};
use std::collections::HashMap;

/// Apply `results` to the current round and move everyone who dropped out
/// into the eliminated partition. Returns the remaining active count.
///
/// All-or-nothing: every current match needs a result and every player must
/// be on the roster, otherwise nothing is touched.
///
/// Group play drops players whose losses reach max losses. In knockout rounds
/// every loser leaves the active pool; their elimination flag still only
/// reflects the loss count.
pub fn process_round(
    tournament: &mut Tournament,
    results: &HashMap<MatchId, Side>,
) -> Result<usize, TournamentError> {
    validate(tournament, results)?;

    let max_losses = tournament.max_losses;
    let matches = std::mem::take(&mut tournament.matches);
    let mut removed: Vec<PlayerId> = Vec::new();

    for mut m in matches {
        let winner = results[&m.id];
        m.decide(winner)?;
        for &pid in m.team(winner.opponent()) {
            let p = tournament.registry.get_mut(pid)?;
            p.add_loss();
            p.check_elimination(max_losses);
            if m.round.is_knockout() {
                p.knocked_out_in = Some(m.round);
            }
            if p.eliminated || m.round.is_knockout() {
                removed.push(pid);
            }
        }
        for &pid in m.team(winner) {
            tournament.registry.record_win(pid)?;
        }
        log::debug!(
            "Tournament {}: {:?} match {} won by side {:?}",
            tournament.id,
            m.round,
            m.id,
            winner
        );
        tournament.history.push(m);
    }

    for &pid in &removed {
        tournament.move_to_eliminated(pid);
    }
    tournament.last_eliminated = removed;
    tournament.sit_outs.clear();
    tournament.pending_results.clear();

    Ok(tournament.active.len())
}

fn validate(
    tournament: &Tournament,
    results: &HashMap<MatchId, Side>,
) -> Result<(), TournamentError> {
    let missing = tournament
        .matches
        .iter()
        .filter(|m| !results.contains_key(&m.id))
        .count();
    if missing > 0 {
        return Err(TournamentError::IncompleteResults { missing });
    }
    if let Some(foreign) = results
        .keys()
        .find(|id| !tournament.matches.iter().any(|m| m.id == **id))
    {
        return Err(TournamentError::MatchNotFound(*foreign));
    }
    for m in &tournament.matches {
        if m.is_decided() {
            return Err(TournamentError::MatchAlreadyDecided(m.id));
        }
        for pid in m.players() {
            if !tournament.active.contains(&pid) {
                return Err(TournamentError::PlayerNotFound(pid));
            }
        }
    }
    Ok(())
}
