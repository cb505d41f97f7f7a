//! Player and PlayerStats data structures.

use crate::models::game::RoundType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Statistics view of a player (for API / display).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub losses: u32,
    pub wins: u32,
    pub times_sat_out: u32,
    pub eliminated_status: bool,
}

impl PlayerStats {
    pub fn from_player(p: &Player) -> Self {
        Self {
            losses: p.losses,
            wins: p.wins,
            times_sat_out: p.times_sat_out,
            eliminated_status: p.eliminated,
        }
    }
}

/// A player in the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub losses: u32,
    pub wins: u32,
    pub times_sat_out: u32,
    /// Internal counter for sit-out fairness (can go negative when we "owe" a sit-out).
    pub internal_times_sat_out: i32,
    /// Registration order.
    pub seed: u32,
    /// Set once losses reach the tournament's max losses.
    pub eliminated: bool,
    /// Knockout round this player lost in, if any.
    pub knocked_out_in: Option<RoundType>,
}

impl Player {
    /// Create a new player with the given name and seed. Counters start at zero.
    pub fn new(name: impl Into<String>, seed: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            losses: 0,
            wins: 0,
            times_sat_out: 0,
            internal_times_sat_out: 0,
            seed,
            eliminated: false,
            knocked_out_in: None,
        }
    }

    /// Current stats as a separate struct (for API responses).
    pub fn stats(&self) -> PlayerStats {
        PlayerStats::from_player(self)
    }

    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    /// Flag the player as eliminated if they have reached `max_losses`.
    /// Returns true when this call flipped the flag.
    pub fn check_elimination(&mut self, max_losses: u32) -> bool {
        if !self.eliminated && self.losses >= max_losses {
            self.eliminated = true;
            return true;
        }
        false
    }

    /// Record that this player sat out one round.
    pub fn record_sat_out(&mut self) {
        self.times_sat_out += 1;
        self.internal_times_sat_out += 1;
    }

    /// Zero every counter, keeping identity, name and seed.
    pub fn reset_stats(&mut self) {
        self.losses = 0;
        self.wins = 0;
        self.times_sat_out = 0;
        self.internal_times_sat_out = 0;
        self.eliminated = false;
        self.knocked_out_in = None;
    }
}
