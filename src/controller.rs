//! PhaseController: the operations an outer API layer drives a tournament with.
//!
//! Every mutating call takes the tournament's write lock for its whole
//! duration, so generation, result processing and phase transitions never
//! interleave for the same tournament. Snapshots take the read lock and
//! always see a fully applied round.

use crate::config::TournamentConfig;
use crate::error::TournamentError;
use crate::logic;
use crate::models::{
    LossAdjustment, MatchId, Player, PlayerId, Side, Tournament, TournamentId, TournamentMode,
};
use crate::store::{TournamentEntry, TournamentStore};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

#[derive(Clone, Debug)]
pub struct PhaseController {
    store: Arc<TournamentStore>,
}

impl PhaseController {
    pub fn new(store: Arc<TournamentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<TournamentStore> {
        &self.store
    }

    pub fn create_tournament(&self, config: TournamentConfig) -> Result<TournamentId, TournamentError> {
        config.validate()?;
        let id = self.store.insert(TournamentEntry::new(&config));
        log::info!(
            "Created tournament {} ({:?}, max losses {})",
            id,
            config.mode,
            config.max_losses
        );
        Ok(id)
    }

    pub fn remove_tournament(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.store.remove(id)?;
        log::info!("Removed tournament {}", id);
        Ok(())
    }

    /// Consistent copy of the tournament's current state.
    pub fn snapshot(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let entry = self.store.get(id)?;
        let guard = entry.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.tournament.clone())
    }

    fn with_entry<T, F>(&self, id: TournamentId, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&mut TournamentEntry) -> Result<T, TournamentError>,
    {
        let entry = self.store.get(id)?;
        let mut guard = entry.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn add_player(&self, id: TournamentId, name: &str) -> Result<PlayerId, TournamentError> {
        self.with_entry(id, |e| e.tournament.add_player(name))
    }

    pub fn remove_player(&self, id: TournamentId, player_id: PlayerId) -> Result<Player, TournamentError> {
        self.with_entry(id, |e| e.tournament.remove_player(player_id))
    }

    pub fn set_max_losses(&self, id: TournamentId, max_losses: u32) -> Result<(), TournamentError> {
        self.with_entry(id, |e| e.tournament.set_max_losses(max_losses))
    }

    pub fn set_mode(&self, id: TournamentId, mode: TournamentMode) -> Result<(), TournamentError> {
        self.with_entry(id, |e| e.tournament.set_mode(mode))
    }

    pub fn start(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.with_entry(id, |e| logic::start_tournament(&mut e.tournament))
    }

    pub fn generate_matches(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.with_entry(id, |e| logic::generate_matches(&mut e.tournament, &mut e.rng))
    }

    pub fn record_winner(&self, id: TournamentId, match_id: MatchId, side: Side) -> Result<(), TournamentError> {
        self.with_entry(id, |e| e.tournament.record_winner(match_id, side))
    }

    /// Submit every result of the current round at once.
    pub fn submit_results(
        &self,
        id: TournamentId,
        results: &HashMap<MatchId, Side>,
    ) -> Result<(), TournamentError> {
        self.with_entry(id, |e| logic::submit_results(&mut e.tournament, results, &mut e.rng))
    }

    /// Submit the winners recorded with [`record_winner`](Self::record_winner).
    pub fn submit_recorded_results(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.with_entry(id, |e| logic::submit_recorded_results(&mut e.tournament, &mut e.rng))
    }

    pub fn force_eliminate(&self, id: TournamentId, player_id: PlayerId) -> Result<(), TournamentError> {
        self.with_entry(id, |e| logic::eliminate_player(&mut e.tournament, player_id, &mut e.rng))
    }

    /// Returns the player's new loss count.
    pub fn adjust_losses(
        &self,
        id: TournamentId,
        player_id: PlayerId,
        adjustment: LossAdjustment,
    ) -> Result<u32, TournamentError> {
        self.with_entry(id, |e| {
            logic::adjust_player_losses(&mut e.tournament, player_id, adjustment, &mut e.rng)
        })
    }

    pub fn repopulate(&self, id: TournamentId, player_ids: &[PlayerId]) -> Result<(), TournamentError> {
        self.with_entry(id, |e| {
            logic::add_players_back_from_last_eliminated(&mut e.tournament, player_ids, &mut e.rng)
        })
    }

    pub fn restart(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.with_entry(id, |e| {
            e.tournament.restart();
            Ok(())
        })
    }

    pub fn reset(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.with_entry(id, |e| {
            e.tournament.reset();
            Ok(())
        })
    }
}
