//! Match generation: turn a player pool into a round's matches plus its sit-outs.

use crate::error::TournamentError;
use crate::models::{
    GameMatch, PlayerId, PlayerRegistry, RoundType, TournamentMode, TournamentPhase,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Output of one draw.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoundDraw {
    pub matches: Vec<GameMatch>,
    pub sit_outs: Vec<PlayerId>,
}

impl RoundDraw {
    /// Player ids in the order they were placed into matches.
    pub fn playing_order(&self) -> Vec<PlayerId> {
        self.matches.iter().flat_map(|m| m.players()).collect()
    }
}

/// Draw a group play round from `pool`.
///
/// 1. Drop eliminated players.
/// 2. Shuffle, then stable-sort by `internal_times_sat_out` ascending so equal
///    counters are ordered uniformly at random. Fewer net sit-outs means a
///    better chance to play; a negative counter moves a player up the queue.
/// 3. The last `len % group_size` players, those with the highest counters,
///    sit out and have both sit-out counters bumped.
/// 4. Shuffle the rest and cut into matches of `group_size`.
///
/// With fewer players than one match needs nobody plays: everyone is
/// returned as a sit-out, no match is produced and no counter changes.
pub fn draw_group_play<R: Rng + ?Sized>(
    registry: &mut PlayerRegistry,
    pool: &[PlayerId],
    mode: TournamentMode,
    rng: &mut R,
) -> Result<RoundDraw, TournamentError> {
    let mut available = Vec::with_capacity(pool.len());
    for &id in pool {
        let p = registry.get(id)?;
        if !p.eliminated {
            available.push((id, p.internal_times_sat_out));
        }
    }

    let group_size = mode.group_size();
    if available.len() < group_size {
        return Ok(RoundDraw {
            matches: Vec::new(),
            sit_outs: available.into_iter().map(|(id, _)| id).collect(),
        });
    }

    available.shuffle(rng);
    available.sort_by_key(|(_, sat_out)| *sat_out);

    let excess = available.len() % group_size;
    let sit_outs: Vec<PlayerId> = available
        .split_off(available.len() - excess)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    for &id in &sit_outs {
        registry.record_sat_out(id)?;
    }

    let mut playing: Vec<PlayerId> = available.into_iter().map(|(id, _)| id).collect();
    playing.shuffle(rng);

    let team = mode.team_size();
    let matches = playing
        .chunks_exact(group_size)
        .map(|chunk| {
            GameMatch::new(
                chunk[..team].to_vec(),
                chunk[team..].to_vec(),
                RoundType::GroupPlay,
            )
        })
        .collect();

    Ok(RoundDraw { matches, sit_outs })
}

/// Draw a knockout round. The pool must be exactly the round's size.
///
/// Semi-finals are seeded randomly. Finals and grand finals keep the pool's
/// order, which the previous round left as its winning sides in match order.
pub fn draw_knockout<R: Rng + ?Sized>(
    pool: &[PlayerId],
    round: RoundType,
    mode: TournamentMode,
    rng: &mut R,
) -> Result<RoundDraw, TournamentError> {
    let expected = round
        .knockout_pool_size(mode)
        .ok_or(TournamentError::InvalidPhaseAction {
            action: "draw a knockout round for group play",
            phase: TournamentPhase::GroupPlay,
        })?;
    if pool.len() != expected {
        return Err(TournamentError::InvalidPlayerCount {
            round,
            expected,
            found: pool.len(),
        });
    }

    let mut players = pool.to_vec();
    if round == RoundType::SemiFinals {
        players.shuffle(rng);
    }

    let team = round.team_size(mode);
    let matches = players
        .chunks_exact(team * 2)
        .map(|chunk| GameMatch::new(chunk[..team].to_vec(), chunk[team..].to_vec(), round))
        .collect();

    Ok(RoundDraw {
        matches,
        sit_outs: Vec::new(),
    })
}
