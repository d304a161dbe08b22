//! In-memory store: every table behind its own RwLock, batch writes under a single guard.

use super::{
    MatchStore, MatchupStore, PlayerStatsCollaborator, StoreError, StoreResult, TeamStore,
};
use crate::models::{
    GameMatch, MatchId, MatchStatus, Matchup, MatchupId, MatchupStatus, Phase, PlayerId,
    PlayerStats, SetScore, Side, StageId, StatsDelta, Team, TeamId,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    teams: RwLock<Vec<Team>>,
    matchups: RwLock<Vec<Matchup>>,
    matches: RwLock<HashMap<MatchId, GameMatch>>,
    players: RwLock<HashMap<PlayerId, PlayerStats>>,
}

fn read<'a, T>(lock: &'a RwLock<T>, table: &'static str) -> StoreResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| StoreError::Poisoned(table))
}

fn write<'a, T>(lock: &'a RwLock<T>, table: &'static str) -> StoreResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| StoreError::Poisoned(table))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters reported for a player so far.
    pub fn player_stats(&self, player: PlayerId) -> StoreResult<PlayerStats> {
        Ok(read(&self.players, "players")?
            .get(&player)
            .copied()
            .unwrap_or_default())
    }

    /// Every match of a stage, grouped in matchup creation order.
    pub fn matches_by_stage(&self, stage: StageId) -> StoreResult<Vec<GameMatch>> {
        let matchups = self.matchups_by_stage(stage)?;
        let mut all = Vec::new();
        for m in &matchups {
            all.extend(self.matches_by_matchup(m.id)?);
        }
        Ok(all)
    }
}

impl TeamStore for InMemoryStore {
    fn teams_by_stage(&self, stage: StageId) -> StoreResult<Vec<Team>> {
        Ok(read(&self.teams, "teams")?
            .iter()
            .filter(|t| t.stage_id == stage)
            .cloned()
            .collect())
    }

    fn team(&self, id: TeamId) -> StoreResult<Option<Team>> {
        Ok(read(&self.teams, "teams")?.iter().find(|t| t.id == id).cloned())
    }

    fn create_teams(&self, teams: Vec<Team>) -> StoreResult<()> {
        write(&self.teams, "teams")?.extend(teams);
        Ok(())
    }

    fn update_team(&self, team: &Team) -> StoreResult<()> {
        let mut g = write(&self.teams, "teams")?;
        let slot = g
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or(StoreError::Missing(team.id))?;
        *slot = team.clone();
        Ok(())
    }

    fn update_positions(&self, positions: &[(TeamId, u32)]) -> StoreResult<()> {
        let mut g = write(&self.teams, "teams")?;
        // Validate the whole batch first so a missing id writes nothing.
        if let Some((missing, _)) = positions
            .iter()
            .find(|(id, _)| !g.iter().any(|t| t.id == *id))
        {
            return Err(StoreError::Missing(*missing));
        }
        for (id, position) in positions {
            if let Some(t) = g.iter_mut().find(|t| t.id == *id) {
                t.position = Some(*position);
            }
        }
        Ok(())
    }

    fn increment_stats(&self, deltas: &[(TeamId, StatsDelta)]) -> StoreResult<()> {
        let mut g = write(&self.teams, "teams")?;
        if let Some((missing, _)) = deltas.iter().find(|(id, _)| !g.iter().any(|t| t.id == *id)) {
            return Err(StoreError::Missing(*missing));
        }
        for (id, delta) in deltas {
            if let Some(t) = g.iter_mut().find(|t| t.id == *id) {
                t.stats.apply(delta);
            }
        }
        Ok(())
    }

    fn reset_stats(&self, stage: StageId) -> StoreResult<()> {
        for t in write(&self.teams, "teams")?
            .iter_mut()
            .filter(|t| t.stage_id == stage)
        {
            t.stats.reset();
            t.position = None;
        }
        Ok(())
    }
}

impl MatchupStore for InMemoryStore {
    fn create_matchups(&self, matchups: Vec<Matchup>) -> StoreResult<()> {
        write(&self.matchups, "matchups")?.extend(matchups);
        Ok(())
    }

    fn matchup(&self, id: MatchupId) -> StoreResult<Option<Matchup>> {
        Ok(read(&self.matchups, "matchups")?
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    fn matchups_by_stage(&self, stage: StageId) -> StoreResult<Vec<Matchup>> {
        Ok(read(&self.matchups, "matchups")?
            .iter()
            .filter(|m| m.stage_id == stage)
            .cloned()
            .collect())
    }

    fn update_matchup(&self, matchup: &Matchup) -> StoreResult<()> {
        let mut g = write(&self.matchups, "matchups")?;
        let slot = g
            .iter_mut()
            .find(|m| m.id == matchup.id)
            .ok_or(StoreError::Missing(matchup.id))?;
        *slot = matchup.clone();
        Ok(())
    }

    fn record_matchup_result(&self, id: MatchupId, winner: Option<Side>) -> StoreResult<()> {
        let mut g = write(&self.matchups, "matchups")?;
        let m = g.iter_mut().find(|m| m.id == id).ok_or(StoreError::Missing(id))?;
        m.winner = winner;
        match winner {
            Some(_) => {
                m.status = MatchupStatus::Finished;
                m.finished_at = Some(Utc::now());
            }
            None => {
                m.status = MatchupStatus::Scheduled;
                m.finished_at = None;
            }
        }
        Ok(())
    }

    fn mark_has_decider(&self, id: MatchupId) -> StoreResult<()> {
        let mut g = write(&self.matchups, "matchups")?;
        let m = g.iter_mut().find(|m| m.id == id).ok_or(StoreError::Missing(id))?;
        m.has_decider = true;
        m.total_matches = 3;
        Ok(())
    }

    fn assign_first_empty_side(&self, id: MatchupId, team: TeamId) -> StoreResult<Option<Matchup>> {
        let mut g = write(&self.matchups, "matchups")?;
        let m = g.iter_mut().find(|m| m.id == id).ok_or(StoreError::Missing(id))?;
        if m.contains_team(team) {
            return Ok(None);
        }
        let side = if m.side_1.team.is_none() {
            &mut m.side_1
        } else if m.side_2.team.is_none() {
            &mut m.side_2
        } else {
            return Ok(None);
        };
        side.team = Some(team);
        Ok(Some(m.clone()))
    }

    fn release_team(&self, id: MatchupId, team: TeamId) -> StoreResult<()> {
        let mut g = write(&self.matchups, "matchups")?;
        let m = g.iter_mut().find(|m| m.id == id).ok_or(StoreError::Missing(id))?;
        for side in [&mut m.side_1, &mut m.side_2] {
            if side.team == Some(team) {
                side.team = None;
            }
        }
        Ok(())
    }

    fn all_finished_for_phase(&self, stage: StageId, phase: Phase) -> StoreResult<bool> {
        Ok(read(&self.matchups, "matchups")?
            .iter()
            .filter(|m| m.stage_id == stage && m.phase == phase)
            .all(|m| m.is_finished()))
    }
}

impl MatchStore for InMemoryStore {
    fn create_matches(&self, matches: Vec<GameMatch>) -> StoreResult<()> {
        let mut g = write(&self.matches, "matches")?;
        for m in matches {
            g.insert(m.id, m);
        }
        Ok(())
    }

    fn game_match(&self, id: MatchId) -> StoreResult<Option<GameMatch>> {
        Ok(read(&self.matches, "matches")?.get(&id).cloned())
    }

    fn matches_by_matchup(&self, matchup: MatchupId) -> StoreResult<Vec<GameMatch>> {
        let mut found: Vec<GameMatch> = read(&self.matches, "matches")?
            .values()
            .filter(|m| m.matchup_id == matchup)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.ordinal);
        Ok(found)
    }

    fn record_match_result(&self, id: MatchId, sets: &[SetScore], winner: Side) -> StoreResult<()> {
        let mut g = write(&self.matches, "matches")?;
        let m = g.get_mut(&id).ok_or(StoreError::Missing(id))?;
        m.sets = sets.to_vec();
        m.winner = Some(winner);
        m.status = MatchStatus::Finished;
        m.finished_at = Some(Utc::now());
        Ok(())
    }
}

impl PlayerStatsCollaborator for InMemoryStore {
    fn increment_player(&self, player: PlayerId, delta: PlayerStats) -> StoreResult<()> {
        write(&self.players, "players")?
            .entry(player)
            .or_default()
            .apply(delta);
        Ok(())
    }
}
