//! Dart tournament engine: 2v2 (or 1v1) group play with cumulative-loss
//! elimination, final selection, and knockout rounds down to a single winner.

pub mod config;
pub mod controller;
pub mod error;
pub mod logic;
pub mod models;
pub mod store;

pub use config::TournamentConfig;
pub use controller::PhaseController;
pub use error::TournamentError;
pub use logic::{
    add_players_back_from_last_eliminated, adjust_player_losses, eliminate_player,
    generate_group_play_matches, generate_matches, process_group_play_results,
    process_knockout_results, start_tournament, submit_recorded_results, submit_results,
};
pub use models::{
    GameMatch, LossAdjustment, MatchId, Player, PlayerId, PlayerRegistry, PlayerStats, RoundType,
    Side, Tournament, TournamentId, TournamentMode, TournamentPhase,
};
pub use store::{TournamentEntry, TournamentStore};
