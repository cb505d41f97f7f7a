//! TournamentError: every way a tournament operation can be refused.

use crate::models::{MatchId, PlayerId, RoundType, TournamentId, TournamentPhase};
use thiserror::Error;

/// Errors that can occur during tournament operations.
///
/// All of them describe a caller mistake; nothing here is transient, so
/// callers should surface them rather than retry.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Match {0} not found in the current round")]
    MatchNotFound(MatchId),

    /// Not every match of the current round has a winner.
    #[error("Not all matches have a result ({missing} missing)")]
    IncompleteResults { missing: usize },

    /// Repopulation with the wrong number of players or with a player who was
    /// not eliminated in the most recent round.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A knockout round needs an exact pool size.
    #[error("{round:?} needs exactly {expected} players, found {found}")]
    InvalidPlayerCount {
        round: RoundType,
        expected: usize,
        found: usize,
    },

    #[error("Need at least {required} players to start (have {found})")]
    NotEnoughPlayers { required: usize, found: usize },

    #[error("Tournament is already completed")]
    AlreadyCompleted,

    #[error("Action '{action}' is not allowed in phase {phase:?}")]
    InvalidPhaseAction {
        action: &'static str,
        phase: TournamentPhase,
    },

    /// Names are unique, case-insensitive.
    #[error("A player named '{0}' already exists")]
    DuplicatePlayerName(String),

    #[error("Player name must not be empty")]
    InvalidPlayerName,

    #[error("Max losses must be at least 1")]
    InvalidMaxLosses,

    /// A match keeps the first winner it was decided with.
    #[error("Match {0} already has a winner")]
    MatchAlreadyDecided(MatchId),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
