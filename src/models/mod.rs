//! Data structures for the dart tournament: players, matches, tournament state.

mod game;
mod player;
mod registry;
mod tournament;

pub use game::{GameMatch, MatchId, RoundType, Side, TournamentMode};
pub use player::{Player, PlayerId, PlayerStats};
pub use registry::PlayerRegistry;
pub use tournament::{LossAdjustment, Tournament, TournamentId, TournamentPhase};
