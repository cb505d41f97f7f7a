//! Setup phase: start tournament (transition from Setup to GroupPlay).

use crate::error::TournamentError;
use crate::models::{Tournament, TournamentPhase};

/// Start the tournament: needs at least one player and max losses of at least 1.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    tournament.ensure_phase("start tournament", &[TournamentPhase::Setup])?;
    if tournament.registry.is_empty() {
        return Err(TournamentError::NotEnoughPlayers {
            required: 1,
            found: 0,
        });
    }
    if tournament.max_losses == 0 {
        return Err(TournamentError::InvalidMaxLosses);
    }
    tournament.phase = TournamentPhase::GroupPlay;
    log::info!(
        "Tournament {} started: {} players, max losses {}",
        tournament.id,
        tournament.active.len(),
        tournament.max_losses
    );
    Ok(())
}
