//! Final selection: bring players back from the last eliminated list to fill the semi-finals.

use crate::error::TournamentError;
use crate::logic::finals::enter_knockout_round;
use crate::models::{PlayerId, RoundType, Tournament, TournamentPhase};
use rand::Rng;
use std::collections::HashSet;

/// Move into FinalSelection; with exactly the knockout field go straight on to the semi-finals.
pub(crate) fn enter_final_selection<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.phase = TournamentPhase::FinalSelection;
    log::info!(
        "Tournament {} entering final selection with {} players ({} needed)",
        tournament.id,
        tournament.active.len(),
        tournament.players_needed_for_knockout()
    );
    if tournament.active.len() == tournament.knockout_field() {
        enter_knockout_round(tournament, RoundType::SemiFinals, rng)?;
    }
    Ok(())
}

/// Add selected players from the last eliminated list back into the active pool.
///
/// Exactly `field - active` players must be selected, all from the last
/// eliminated list. Returning players lose their elimination flag and sit one
/// loss below the threshold. Filling the field starts the semi-finals.
pub fn add_players_back_from_last_eliminated<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    player_ids: &[PlayerId],
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.ensure_phase("repopulate", &[TournamentPhase::FinalSelection])?;

    let needed = tournament.players_needed_for_knockout();
    if player_ids.len() != needed {
        return Err(TournamentError::InvalidSelection(format!(
            "must select exactly {} players to rejoin (selected {})",
            needed,
            player_ids.len()
        )));
    }

    let unique: HashSet<_> = player_ids.iter().copied().collect();
    if unique.len() != player_ids.len() {
        return Err(TournamentError::InvalidSelection(
            "the same player was selected twice".to_string(),
        ));
    }
    if let Some(foreign) = player_ids
        .iter()
        .find(|id| !tournament.last_eliminated.contains(*id))
    {
        return Err(TournamentError::InvalidSelection(format!(
            "player {foreign} was not eliminated in the last round"
        )));
    }

    let max_losses = tournament.max_losses;
    for &id in player_ids {
        let p = tournament.registry.get_mut(id)?;
        p.eliminated = false;
        p.knocked_out_in = None;
        p.losses = p.losses.min(max_losses.saturating_sub(1));
        tournament.eliminated.retain(|e| *e != id);
        tournament.active.push(id);
    }
    tournament.last_eliminated.retain(|id| !unique.contains(id));

    log::info!(
        "Tournament {}: {} players rejoined from last eliminated",
        tournament.id,
        player_ids.len()
    );

    if tournament.active.len() == tournament.knockout_field() {
        enter_knockout_round(tournament, RoundType::SemiFinals, rng)?;
    }
    Ok(())
}
