//! In-memory tournament store: many tournaments by id, one lock per tournament.

use crate::config::TournamentConfig;
use crate::error::TournamentError;
use crate::models::{Tournament, TournamentId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Per-tournament entry: tournament data plus its own random source.
#[derive(Debug)]
pub struct TournamentEntry {
    pub tournament: Tournament,
    pub rng: StdRng,
}

impl TournamentEntry {
    pub fn new(config: &TournamentConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            tournament: Tournament::from_config(config),
            rng,
        }
    }
}

pub type SharedEntry = Arc<RwLock<TournamentEntry>>;

/// The outer map lock is held only to look entries up, insert or remove them.
/// Work on a tournament happens under that tournament's own lock.
#[derive(Debug, Default)]
pub struct TournamentStore {
    entries: RwLock<HashMap<TournamentId, SharedEntry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: TournamentEntry) -> TournamentId {
        let id = entry.tournament.id;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(RwLock::new(entry)));
        id
    }

    pub fn get(&self, id: TournamentId) -> Result<SharedEntry, TournamentError> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn remove(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| ())
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn ids(&self) -> Vec<TournamentId> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let store = TournamentStore::new();
        let id = store.insert(TournamentEntry::new(&TournamentConfig::default()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().read().unwrap().tournament.id, id);
        store.remove(id).unwrap();
        assert!(store.is_empty());
        assert_eq!(
            store.get(id).map(|_| ()),
            Err(TournamentError::TournamentNotFound(id))
        );
        assert_eq!(store.remove(id), Err(TournamentError::TournamentNotFound(id)));
    }
}
