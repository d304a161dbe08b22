//! Collaborator interfaces for persistence. The engine only talks to storage through these traits.

mod memory;

pub use memory::InMemoryStore;

use crate::models::{
    GameMatch, MatchId, Matchup, MatchupId, Phase, PlayerId, PlayerStats, SetScore, Side,
    StageId, StatsDelta, Team, TeamId,
};
use thiserror::Error;

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Lock poisoned: {0}")]
    Poisoned(&'static str),

    #[error("Record not found: {0}")]
    Missing(uuid::Uuid),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait TeamStore: Send + Sync {
    /// Teams of a stage in registration (seeding) order.
    fn teams_by_stage(&self, stage: StageId) -> StoreResult<Vec<Team>>;
    fn team(&self, id: TeamId) -> StoreResult<Option<Team>>;
    fn create_teams(&self, teams: Vec<Team>) -> StoreResult<()>;
    fn update_team(&self, team: &Team) -> StoreResult<()>;
    /// Writes every position in one atomic batch.
    fn update_positions(&self, positions: &[(TeamId, u32)]) -> StoreResult<()>;
    /// Applies every delta in one atomic batch.
    fn increment_stats(&self, deltas: &[(TeamId, StatsDelta)]) -> StoreResult<()>;
    /// Zeroes the counters and clears the position of every team of the stage, in one batch.
    fn reset_stats(&self, stage: StageId) -> StoreResult<()>;
}

pub trait MatchupStore: Send + Sync {
    fn create_matchups(&self, matchups: Vec<Matchup>) -> StoreResult<()>;
    fn matchup(&self, id: MatchupId) -> StoreResult<Option<Matchup>>;
    /// Matchups of a stage in creation order.
    fn matchups_by_stage(&self, stage: StageId) -> StoreResult<Vec<Matchup>>;
    fn update_matchup(&self, matchup: &Matchup) -> StoreResult<()>;
    /// Marks the matchup finished with `winner`, or reopens it when `winner` is None.
    fn record_matchup_result(&self, id: MatchupId, winner: Option<Side>) -> StoreResult<()>;
    fn mark_has_decider(&self, id: MatchupId) -> StoreResult<()>;
    /// Puts `team` into side 1 if empty, else side 2 if empty, as one atomic step.
    /// Returns the matchup as written, or None when the team was already there
    /// or both sides were taken.
    fn assign_first_empty_side(&self, id: MatchupId, team: TeamId) -> StoreResult<Option<Matchup>>;
    /// Clears every side holding `team`, as one atomic step.
    fn release_team(&self, id: MatchupId, team: TeamId) -> StoreResult<()>;
    fn all_finished_for_phase(&self, stage: StageId, phase: Phase) -> StoreResult<bool>;
}

pub trait MatchStore: Send + Sync {
    fn create_matches(&self, matches: Vec<GameMatch>) -> StoreResult<()>;
    fn game_match(&self, id: MatchId) -> StoreResult<Option<GameMatch>>;
    /// Matches of a matchup ordered by ordinal.
    fn matches_by_matchup(&self, matchup: MatchupId) -> StoreResult<Vec<GameMatch>>;
    fn record_match_result(&self, id: MatchId, sets: &[SetScore], winner: Side) -> StoreResult<()>;
}

/// Per-player statistics live outside the bracket core; it only reports changes.
pub trait PlayerStatsCollaborator: Send + Sync {
    fn increment_player(&self, player: PlayerId, delta: PlayerStats) -> StoreResult<()>;
}

/// Everything the engine needs from its surroundings.
pub trait TournamentStore: TeamStore + MatchupStore + MatchStore + PlayerStatsCollaborator {}

impl<T> TournamentStore for T where
    T: TeamStore + MatchupStore + MatchStore + PlayerStatsCollaborator + ?Sized
{
}
