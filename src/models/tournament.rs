//! Tournament and TournamentPhase.

use crate::config::TournamentConfig;
use crate::error::TournamentError;
use crate::models::game::{GameMatch, MatchId, Side, TournamentMode};
use crate::models::player::{Player, PlayerId};
use crate::models::registry::PlayerRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    /// Adding players, setting max losses; not started.
    #[default]
    Setup,
    /// More players than the knockout field; group play rounds.
    GroupPlay,
    /// At most the knockout field; may need to bring back last eliminated players.
    FinalSelection,
    /// Knockout field (8 in 2v2, 4 in 1v1); two matches.
    SemiFinals,
    /// The two semi-final winning sides; one match.
    Finals,
    /// The two finals winners play 1v1.
    GrandFinals,
    /// Finished; read-only until restart or reset.
    Completed,
}

/// Manual ±1 loss correction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossAdjustment {
    Increment,
    Decrement,
}

/// Full tournament state: players, matches, results, and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub(crate) registry: PlayerRegistry,
    /// Players still in contention, including this round's sit-outs.
    pub(crate) active: Vec<PlayerId>,
    pub(crate) eliminated: Vec<PlayerId>,
    /// Players removed in the most recent processed round.
    pub(crate) last_eliminated: Vec<PlayerId>,
    /// Current round's matches.
    pub(crate) matches: Vec<GameMatch>,
    /// Players sitting out the current round (group play).
    pub(crate) sit_outs: Vec<PlayerId>,
    /// Winners recorded one match at a time, applied on submit.
    pub(crate) pending_results: HashMap<MatchId, Side>,
    /// Every decided match, oldest first.
    pub(crate) history: Vec<GameMatch>,
    pub(crate) max_losses: u32,
    pub(crate) grand_finals: bool,
    pub(crate) mode: TournamentMode,
    pub(crate) phase: TournamentPhase,
    pub(crate) round_number: u32,
    pub(crate) winners: Vec<PlayerId>,
}

impl Tournament {
    /// Create a new tournament in Setup with no players.
    pub fn new(max_losses: u32) -> Self {
        Self::from_config(&TournamentConfig {
            max_losses,
            ..TournamentConfig::default()
        })
    }

    pub fn from_config(config: &TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            registry: PlayerRegistry::new(),
            active: Vec::new(),
            eliminated: Vec::new(),
            last_eliminated: Vec::new(),
            matches: Vec::new(),
            sit_outs: Vec::new(),
            pending_results: HashMap::new(),
            history: Vec::new(),
            max_losses: config.max_losses,
            grand_finals: config.grand_finals,
            mode: config.mode,
            phase: TournamentPhase::Setup,
            round_number: 0,
            winners: Vec::new(),
        }
    }

    pub fn phase(&self) -> TournamentPhase {
        self.phase
    }

    pub fn max_losses(&self) -> u32 {
        self.max_losses
    }

    pub fn grand_finals(&self) -> bool {
        self.grand_finals
    }

    pub fn mode(&self) -> TournamentMode {
        self.mode
    }

    /// Players the knockout bracket starts with in this tournament's mode.
    pub fn knockout_field(&self) -> usize {
        self.mode.knockout_field()
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, TournamentError> {
        self.registry.get(id)
    }

    pub fn active_ids(&self) -> &[PlayerId] {
        &self.active
    }

    pub fn eliminated_ids(&self) -> &[PlayerId] {
        &self.eliminated
    }

    pub fn last_eliminated_ids(&self) -> &[PlayerId] {
        &self.last_eliminated
    }

    pub fn sit_out_ids(&self) -> &[PlayerId] {
        &self.sit_outs
    }

    pub fn matches(&self) -> &[GameMatch] {
        &self.matches
    }

    pub fn history(&self) -> &[GameMatch] {
        &self.history
    }

    pub fn pending_results(&self) -> &HashMap<MatchId, Side> {
        &self.pending_results
    }

    /// Tournament winners; empty until Completed.
    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }

    pub fn active_players(&self) -> Vec<&Player> {
        self.resolve(&self.active)
    }

    pub fn eliminated_players(&self) -> Vec<&Player> {
        self.resolve(&self.eliminated)
    }

    pub fn last_eliminated_players(&self) -> Vec<&Player> {
        self.resolve(&self.last_eliminated)
    }

    pub fn sit_out_players(&self) -> Vec<&Player> {
        self.resolve(&self.sit_outs)
    }

    fn resolve(&self, ids: &[PlayerId]) -> Vec<&Player> {
        ids.iter().filter_map(|id| self.registry.get(*id).ok()).collect()
    }

    /// True while the current round still has matches waiting for a result.
    pub fn round_in_progress(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Players needed from the last eliminated list to reach the knockout field.
    pub fn players_needed_for_knockout(&self) -> usize {
        self.knockout_field().saturating_sub(self.active.len())
    }

    /// Active and eliminated partition the roster; the elimination flag agrees with the loss count.
    pub fn invariants_hold(&self) -> bool {
        let active: HashSet<_> = self.active.iter().collect();
        let eliminated: HashSet<_> = self.eliminated.iter().collect();
        let roster: HashSet<_> = self.registry.ids().iter().collect();
        let partitioned = active.len() == self.active.len()
            && eliminated.len() == self.eliminated.len()
            && active.is_disjoint(&eliminated)
            && active.union(&eliminated).copied().collect::<HashSet<_>>() == roster;
        let flags_agree = self
            .registry
            .iter()
            .all(|p| p.eliminated == (p.losses >= self.max_losses));
        let flagged_inactive = self
            .active
            .iter()
            .filter_map(|id| self.registry.get(*id).ok())
            .all(|p| !p.eliminated);
        partitioned && flags_agree && flagged_inactive
    }

    pub(crate) fn ensure_mutable(&self) -> Result<(), TournamentError> {
        if self.phase == TournamentPhase::Completed {
            return Err(TournamentError::AlreadyCompleted);
        }
        Ok(())
    }

    pub(crate) fn ensure_phase(
        &self,
        action: &'static str,
        allowed: &[TournamentPhase],
    ) -> Result<(), TournamentError> {
        self.ensure_mutable()?;
        if !allowed.contains(&self.phase) {
            return Err(TournamentError::InvalidPhaseAction {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Add a player (Setup only). Names must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        self.ensure_phase("add player", &[TournamentPhase::Setup])?;
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::InvalidPlayerName);
        }
        if self.registry.find_by_name(name_trimmed).is_some() {
            return Err(TournamentError::DuplicatePlayerName(name_trimmed.to_string()));
        }
        let id = self.registry.add(name_trimmed);
        self.active.push(id);
        Ok(id)
    }

    /// Remove a player by id (Setup only).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<Player, TournamentError> {
        self.ensure_phase("remove player", &[TournamentPhase::Setup])?;
        let player = self.registry.remove(player_id)?;
        self.active.retain(|id| *id != player_id);
        Ok(player)
    }

    /// Set max losses before elimination (Setup only).
    pub fn set_max_losses(&mut self, max_losses: u32) -> Result<(), TournamentError> {
        self.ensure_phase("set max losses", &[TournamentPhase::Setup])?;
        if max_losses == 0 {
            return Err(TournamentError::InvalidMaxLosses);
        }
        self.max_losses = max_losses;
        Ok(())
    }

    /// Switch between 2v2 and 1v1 (Setup only).
    pub fn set_mode(&mut self, mode: TournamentMode) -> Result<(), TournamentError> {
        self.ensure_phase("set mode", &[TournamentPhase::Setup])?;
        self.mode = mode;
        Ok(())
    }

    /// Record the winner of one current-round match. Applied on submit; may be
    /// changed until then.
    pub fn record_winner(&mut self, match_id: MatchId, side: Side) -> Result<(), TournamentError> {
        self.ensure_mutable()?;
        let m = self
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        if m.is_decided() {
            return Err(TournamentError::MatchAlreadyDecided(match_id));
        }
        self.pending_results.insert(match_id, side);
        Ok(())
    }

    /// Manually eliminate an active player (GroupPlay or FinalSelection).
    /// Losses are raised to max losses so the flag stays consistent with the count.
    pub fn force_eliminate(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        self.ensure_phase(
            "eliminate player",
            &[TournamentPhase::GroupPlay, TournamentPhase::FinalSelection],
        )?;
        self.ensure_adjustable(player_id)?;
        let max_losses = self.max_losses;
        let p = self.registry.get_mut(player_id)?;
        p.losses = p.losses.max(max_losses);
        p.check_elimination(max_losses);
        self.eliminate_manually(player_id);
        log::info!("Tournament {}: player {} eliminated manually", self.id, player_id);
        Ok(())
    }

    /// Correct a player's loss count by one (GroupPlay or FinalSelection).
    ///
    /// Reaching max losses eliminates the player, which is refused while they
    /// are in an unfinished match. Eliminated players cannot be decremented
    /// back into play; repopulation is the only way back.
    pub fn adjust_losses(
        &mut self,
        player_id: PlayerId,
        adjustment: LossAdjustment,
    ) -> Result<u32, TournamentError> {
        self.ensure_phase(
            "adjust losses",
            &[TournamentPhase::GroupPlay, TournamentPhase::FinalSelection],
        )?;
        if !self.registry.contains(player_id) {
            return Err(TournamentError::PlayerNotFound(player_id));
        }
        if self.eliminated.contains(&player_id) {
            return Err(TournamentError::InvalidPhaseAction {
                action: "adjust losses of an eliminated player",
                phase: self.phase,
            });
        }
        let max_losses = self.max_losses;
        let current = self.registry.get(player_id)?.losses;
        let losses = match adjustment {
            LossAdjustment::Increment => current + 1,
            LossAdjustment::Decrement => current.saturating_sub(1),
        };
        if losses >= max_losses {
            self.ensure_adjustable(player_id)?;
        }
        let p = self.registry.get_mut(player_id)?;
        p.losses = losses;
        if p.check_elimination(max_losses) {
            self.eliminate_manually(player_id);
            log::info!(
                "Tournament {}: player {} reached {} losses after manual adjustment",
                self.id,
                player_id,
                losses
            );
        }
        Ok(losses)
    }

    /// Manual controls may not touch a player whose match is still being played.
    fn ensure_adjustable(&self, player_id: PlayerId) -> Result<(), TournamentError> {
        if !self.active.contains(&player_id) {
            return if self.registry.contains(player_id) {
                Err(TournamentError::InvalidPhaseAction {
                    action: "modify an eliminated player",
                    phase: self.phase,
                })
            } else {
                Err(TournamentError::PlayerNotFound(player_id))
            };
        }
        if self
            .matches
            .iter()
            .any(|m| !m.is_decided() && m.involves(player_id))
        {
            return Err(TournamentError::InvalidPhaseAction {
                action: "modify a player with an unfinished match",
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// During final selection a manually eliminated player joins the last
    /// eliminated list, so the pool to repopulate from grows with the gap.
    fn eliminate_manually(&mut self, player_id: PlayerId) {
        self.move_to_eliminated(player_id);
        if self.phase == TournamentPhase::FinalSelection
            && !self.last_eliminated.contains(&player_id)
        {
            self.last_eliminated.push(player_id);
        }
    }

    pub(crate) fn move_to_eliminated(&mut self, player_id: PlayerId) {
        self.active.retain(|id| *id != player_id);
        self.sit_outs.retain(|id| *id != player_id);
        if !self.eliminated.contains(&player_id) {
            self.eliminated.push(player_id);
        }
    }

    /// Same roster, all stats and round state cleared, back to Setup.
    /// Allowed from any phase, including Completed.
    pub fn restart(&mut self) {
        self.registry.reset_stats();
        self.active = self.registry.ids().to_vec();
        self.clear_progress();
        log::info!("Tournament {} restarted with {} players", self.id, self.active.len());
    }

    /// Empty roster, back to Setup. Keeps the tournament id and settings.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.active.clear();
        self.clear_progress();
        log::info!("Tournament {} reset", self.id);
    }

    fn clear_progress(&mut self) {
        self.eliminated.clear();
        self.last_eliminated.clear();
        self.matches.clear();
        self.sit_outs.clear();
        self.pending_results.clear();
        self.history.clear();
        self.winners.clear();
        self.round_number = 0;
        self.phase = TournamentPhase::Setup;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_group_play(n: usize) -> (Tournament, Vec<PlayerId>) {
        let mut t = Tournament::new(2);
        let ids = (0..n).map(|i| t.add_player(format!("P{i}")).unwrap()).collect();
        t.phase = TournamentPhase::GroupPlay;
        (t, ids)
    }

    #[test]
    fn add_player_trims_and_rejects_duplicates() {
        let mut t = Tournament::new(3);
        let id = t.add_player("  Alice ").unwrap();
        assert_eq!(t.player(id).unwrap().name, "Alice");
        assert_eq!(
            t.add_player("alice"),
            Err(TournamentError::DuplicatePlayerName("alice".into()))
        );
        assert_eq!(t.add_player("   "), Err(TournamentError::InvalidPlayerName));
        assert_eq!(t.active_ids(), &[id]);
    }

    #[test]
    fn roster_is_frozen_after_setup() {
        let (mut t, ids) = in_group_play(5);
        assert!(matches!(
            t.add_player("Late"),
            Err(TournamentError::InvalidPhaseAction { .. })
        ));
        assert!(matches!(
            t.remove_player(ids[0]),
            Err(TournamentError::InvalidPhaseAction { .. })
        ));
        assert!(matches!(
            t.set_max_losses(4),
            Err(TournamentError::InvalidPhaseAction { .. })
        ));
    }

    #[test]
    fn max_losses_must_be_positive() {
        let mut t = Tournament::new(3);
        assert_eq!(t.set_max_losses(0), Err(TournamentError::InvalidMaxLosses));
        t.set_max_losses(5).unwrap();
        assert_eq!(t.max_losses(), 5);
    }

    #[test]
    fn force_eliminate_keeps_flag_consistent() {
        let (mut t, ids) = in_group_play(5);
        t.force_eliminate(ids[1]).unwrap();
        let p = t.player(ids[1]).unwrap();
        assert!(p.eliminated);
        assert_eq!(p.losses, 2);
        assert_eq!(t.eliminated_ids(), &[ids[1]]);
        assert!(t.last_eliminated_ids().is_empty());
        assert!(t.invariants_hold());
    }

    #[test]
    fn manual_elimination_in_final_selection_can_be_brought_back() {
        let (mut t, ids) = in_group_play(5);
        t.phase = TournamentPhase::FinalSelection;
        t.force_eliminate(ids[0]).unwrap();
        t.adjust_losses(ids[1], LossAdjustment::Increment).unwrap();
        t.adjust_losses(ids[1], LossAdjustment::Increment).unwrap();
        assert_eq!(t.last_eliminated_ids(), &[ids[0], ids[1]]);
        assert_eq!(t.players_needed_for_knockout(), 5);
        assert!(t.invariants_hold());
    }

    #[test]
    fn mode_is_set_in_setup_only() {
        let mut t = Tournament::new(3);
        assert_eq!(t.mode(), TournamentMode::TwoVTwo);
        assert_eq!(t.knockout_field(), 8);
        t.set_mode(TournamentMode::OneVOne).unwrap();
        assert_eq!(t.knockout_field(), 4);
        t.phase = TournamentPhase::GroupPlay;
        assert!(matches!(
            t.set_mode(TournamentMode::TwoVTwo),
            Err(TournamentError::InvalidPhaseAction { .. })
        ));
        assert_eq!(t.mode(), TournamentMode::OneVOne);
    }

    #[test]
    fn adjust_losses_eliminates_at_threshold_and_never_revives() {
        let (mut t, ids) = in_group_play(5);
        assert_eq!(t.adjust_losses(ids[0], LossAdjustment::Decrement), Ok(0));
        assert_eq!(t.adjust_losses(ids[0], LossAdjustment::Increment), Ok(1));
        assert_eq!(t.adjust_losses(ids[0], LossAdjustment::Increment), Ok(2));
        assert!(t.eliminated_ids().contains(&ids[0]));
        assert!(matches!(
            t.adjust_losses(ids[0], LossAdjustment::Decrement),
            Err(TournamentError::InvalidPhaseAction { .. })
        ));
        assert!(t.invariants_hold());
    }

    #[test]
    fn completed_is_read_only_until_restart() {
        let (mut t, ids) = in_group_play(5);
        t.phase = TournamentPhase::Completed;
        assert_eq!(t.force_eliminate(ids[0]), Err(TournamentError::AlreadyCompleted));
        assert_eq!(t.add_player("X"), Err(TournamentError::AlreadyCompleted));
        t.restart();
        assert_eq!(t.phase(), TournamentPhase::Setup);
        assert_eq!(t.active_ids(), ids.as_slice());
    }

    #[test]
    fn reset_discards_roster() {
        let (mut t, _) = in_group_play(5);
        let id = t.id;
        t.reset();
        assert_eq!(t.id, id);
        assert!(t.registry().is_empty());
        assert!(t.active_ids().is_empty());
        assert_eq!(t.phase(), TournamentPhase::Setup);
    }
}
