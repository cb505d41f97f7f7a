//! Match (game), Side, RoundType and TournamentMode for 2v2 / 1v1 games.

use crate::error::TournamentError;
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side won the match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Players per side: 2v2 (default) or 1v1.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentMode {
    OneVOne,
    #[default]
    TwoVTwo,
}

impl TournamentMode {
    pub fn team_size(self) -> usize {
        match self {
            TournamentMode::OneVOne => 1,
            TournamentMode::TwoVTwo => 2,
        }
    }

    /// Players per group play match.
    pub fn group_size(self) -> usize {
        self.team_size() * 2
    }

    /// Players the knockout bracket starts with: two semi-final matches.
    pub fn knockout_field(self) -> usize {
        self.group_size() * 2
    }

    /// 2v2 finals leave a winning pair, who settle it 1v1. A 1v1 final
    /// already has a single winner.
    pub fn has_grand_final(self) -> bool {
        self.team_size() > 1
    }
}

impl FromStr for TournamentMode {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1v1" | "one_v_one" => Ok(TournamentMode::OneVOne),
            "2v2" | "two_v_two" => Ok(TournamentMode::TwoVTwo),
            other => Err(TournamentError::Config(format!("unknown tournament mode {other:?}"))),
        }
    }
}

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    GroupPlay,
    SemiFinals,
    Finals,
    GrandFinals,
}

impl RoundType {
    /// Players per side: the mode's team size everywhere except the 1v1 grand final.
    pub fn team_size(self, mode: TournamentMode) -> usize {
        match self {
            RoundType::GrandFinals => 1,
            _ => mode.team_size(),
        }
    }

    /// Exact pool size a knockout round is played with. `None` for group play.
    pub fn knockout_pool_size(self, mode: TournamentMode) -> Option<usize> {
        match self {
            RoundType::GroupPlay => None,
            RoundType::SemiFinals => Some(mode.knockout_field()),
            RoundType::Finals => Some(mode.group_size()),
            RoundType::GrandFinals => Some(2),
        }
    }

    pub fn is_knockout(self) -> bool {
        self != RoundType::GroupPlay
    }
}

/// A single match: two equal sides (2v2, or 1v1 in 1v1 mode and grand finals).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// Side A player ids, in the order they were drawn.
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    /// None if not yet played.
    winner: Option<Side>,
    pub round: RoundType,
}

impl GameMatch {
    pub fn new(team_a: Vec<PlayerId>, team_b: Vec<PlayerId>, round: RoundType) -> Self {
        debug_assert_eq!(team_a.len(), team_b.len());
        debug_assert!(!team_a.is_empty());
        Self {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            winner: None,
            round,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Set the winner. Fails if the match was already decided.
    pub fn decide(&mut self, side: Side) -> Result<(), TournamentError> {
        if self.winner.is_some() {
            return Err(TournamentError::MatchAlreadyDecided(self.id));
        }
        self.winner = Some(side);
        Ok(())
    }

    pub fn team(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.team_a.contains(&player_id) || self.team_b.contains(&player_id)
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_a.iter().chain(self.team_b.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_cannot_be_overwritten() {
        let mut m = GameMatch::new(
            vec![Uuid::new_v4(), Uuid::new_v4()],
            vec![Uuid::new_v4(), Uuid::new_v4()],
            RoundType::GroupPlay,
        );
        m.decide(Side::B).unwrap();
        assert_eq!(m.decide(Side::A), Err(TournamentError::MatchAlreadyDecided(m.id)));
        assert_eq!(m.winner(), Some(Side::B));
    }

    #[test]
    fn team_lookup_follows_side() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let m = GameMatch::new(vec![a], vec![b], RoundType::GrandFinals);
        assert_eq!(m.team(Side::A), &[a]);
        assert_eq!(m.team(Side::A.opponent()), &[b]);
        assert!(m.involves(b));
        assert!(!m.involves(Uuid::new_v4()));
    }

    #[test]
    fn mode_sizes() {
        let two = TournamentMode::TwoVTwo;
        let one = TournamentMode::OneVOne;
        assert_eq!(TournamentMode::default(), two);
        assert_eq!((two.group_size(), two.knockout_field()), (4, 8));
        assert_eq!((one.group_size(), one.knockout_field()), (2, 4));
        assert_eq!(RoundType::Finals.knockout_pool_size(two), Some(4));
        assert_eq!(RoundType::Finals.knockout_pool_size(one), Some(2));
        assert_eq!(RoundType::SemiFinals.team_size(one), 1);
        assert_eq!(RoundType::GrandFinals.team_size(two), 1);
        assert!(two.has_grand_final());
        assert!(!one.has_grand_final());
    }

    #[test]
    fn mode_parses_both_spellings() {
        assert_eq!("1v1".parse::<TournamentMode>(), Ok(TournamentMode::OneVOne));
        assert_eq!(" Two_V_Two ".parse::<TournamentMode>(), Ok(TournamentMode::TwoVTwo));
        assert!(matches!(
            "3v3".parse::<TournamentMode>(),
            Err(TournamentError::Config(_))
        ));
    }
}
