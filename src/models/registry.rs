//! PlayerRegistry: the single owner of every player record in a tournament.
//!
//! Active/eliminated partitions elsewhere only hold ids into this arena, so a
//! player's stats exist exactly once.

use crate::error::TournamentError;
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    /// Registration order.
    order: Vec<PlayerId>,
    next_seed: u32,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    /// Register a player. The seed is the registry size at the time of the
    /// call and never repeats, even after removals.
    pub fn add(&mut self, name: impl Into<String>) -> PlayerId {
        let seed = self.next_seed.max(self.order.len() as u32);
        self.next_seed = seed + 1;
        let player = Player::new(name, seed);
        let id = player.id;
        self.players.insert(id, player);
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: PlayerId) -> Result<Player, TournamentError> {
        let player = self
            .players
            .remove(&id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        self.order.retain(|p| *p != id);
        Ok(player)
    }

    pub fn get(&self, id: PlayerId) -> Result<&Player, TournamentError> {
        self.players.get(&id).ok_or(TournamentError::PlayerNotFound(id))
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Result<&mut Player, TournamentError> {
        self.players
            .get_mut(&id)
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    pub fn record_win(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        self.get_mut(id)?.add_win();
        Ok(())
    }

    pub fn record_loss(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        self.get_mut(id)?.add_loss();
        Ok(())
    }

    pub fn record_sat_out(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        self.get_mut(id)?.record_sat_out();
        Ok(())
    }

    /// Case-insensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        self.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Players in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> + '_ {
        self.order.iter().filter_map(|id| self.players.get(id))
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn reset_stats(&mut self) {
        for p in self.players.values_mut() {
            p.reset_stats();
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_increase_with_registration() {
        let mut r = PlayerRegistry::new();
        let a = r.add("A");
        let b = r.add("B");
        assert_eq!(r.get(a).unwrap().seed, 0);
        assert_eq!(r.get(b).unwrap().seed, 1);
        r.remove(a).unwrap();
        let c = r.add("C");
        assert_eq!(r.get(c).unwrap().seed, 2);
        assert_eq!(r.ids(), &[b, c]);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut r = PlayerRegistry::new();
        let ghost = uuid::Uuid::new_v4();
        assert_eq!(r.remove(ghost), Err(TournamentError::PlayerNotFound(ghost)));
        assert_eq!(r.record_win(ghost), Err(TournamentError::PlayerNotFound(ghost)));
        assert_eq!(r.record_loss(ghost), Err(TournamentError::PlayerNotFound(ghost)));
        assert_eq!(r.record_sat_out(ghost), Err(TournamentError::PlayerNotFound(ghost)));
    }

    #[test]
    fn counters_mutate_in_place() {
        let mut r = PlayerRegistry::new();
        let a = r.add("A");
        r.record_win(a).unwrap();
        r.record_loss(a).unwrap();
        r.record_sat_out(a).unwrap();
        let p = r.get(a).unwrap();
        assert_eq!((p.wins, p.losses, p.times_sat_out), (1, 1, 1));
        // No cascading: the registry never decides elimination.
        assert!(!p.eliminated);
        assert_eq!(r.find_by_name("a").map(|p| p.id), Some(a));
    }
}
