//! Identifiers and the error taxonomy shared by every tournament operation.

use crate::models::team::TeamSize;
use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a stage (one group phase plus its knockout phase).
pub type StageId = Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a matchup (confronto).
pub type MatchupId = Uuid;

/// Unique identifier for an individual match.
pub type MatchId = Uuid;

/// Unique identifier for a player.
pub type PlayerId = Uuid;

/// Input rejected before anything is written.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("Need at least 2 teams, got {0}")]
    NotEnoughTeams(usize),

    #[error("Team {team} has {actual} players, expected {expected}")]
    RosterSize {
        team: TeamId,
        expected: usize,
        actual: usize,
    },

    #[error("Team {team} must field {expected} men and {expected} women")]
    GenderRatio { team: TeamId, expected: usize },

    #[error("Unsupported group count {groups} for {teams} teams")]
    UnsupportedGroupCount { groups: usize, teams: usize },

    #[error("Set scores do not produce a winner")]
    NoWinner,

    #[error("Unsupported team size {0} (expected 4 or 6)")]
    TeamSize(usize),

    #[error("Stage {0} already has matchups")]
    AlreadyGenerated(StageId),

    #[error("Matchup {0} does not have both teams yet")]
    UnresolvedMatchup(MatchupId),
}

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Matchup not found: {0}")]
    MatchupNotFound(MatchupId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl TournamentError {
    /// True for the not-found family (missing team, matchup or match).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TeamNotFound(_)
                | TournamentError::MatchupNotFound(_)
                | TournamentError::MatchNotFound(_)
        )
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;

impl TryFrom<usize> for TeamSize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(TeamSize::Four),
            6 => Ok(TeamSize::Six),
            other => Err(ValidationError::TeamSize(other)),
        }
    }
}
