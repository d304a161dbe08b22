//! Matchup (confronto): a team-vs-team tie of two or three matches.

use crate::models::game::Side;
use crate::models::tournament::{MatchupId, StageId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Round a matchup belongs to. Ordered from the group phase to the final.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Group,
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
}

impl Phase {
    pub fn is_knockout(self) -> bool {
        self != Phase::Group
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchupStatus {
    #[default]
    Scheduled,
    Finished,
}

/// Where the team of a not-yet-known side comes from.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// The team finishing `rank` in group `group`.
    GroupRank { rank: u8, group: String },
    /// The winner of an earlier knockout matchup.
    MatchupWinner { matchup: MatchupId },
    /// Empty slot: the other side advances without playing.
    Bye,
}

const GROUP_LABEL: &str = "º Grupo ";
const WINNER_LABEL: &str = "Vencedor ";
const BYE_LABEL: &str = "BYE";

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::GroupRank { rank, group } => write!(f, "{rank}{GROUP_LABEL}{group}"),
            Origin::MatchupWinner { matchup } => write!(f, "{WINNER_LABEL}{matchup}"),
            Origin::Bye => f.write_str(BYE_LABEL),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Unrecognised origin label: {0:?}")]
pub struct OriginParseError(pub String);

/// Parses the display labels back ("1º Grupo A", "Vencedor <id>", "BYE").
impl FromStr for Origin {
    type Err = OriginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || OriginParseError(s.to_string());
        if s == BYE_LABEL {
            return Ok(Origin::Bye);
        }
        if let Some(id) = s.strip_prefix(WINNER_LABEL) {
            let matchup = id.trim().parse::<Uuid>().map_err(|_| err())?;
            return Ok(Origin::MatchupWinner { matchup });
        }
        let (rank, group) = s.split_once(GROUP_LABEL).ok_or_else(err)?;
        let rank = rank.parse::<u8>().map_err(|_| err())?;
        if rank == 0 || group.is_empty() || !group.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(err());
        }
        Ok(Origin::GroupRank {
            rank,
            group: group.to_string(),
        })
    }
}

/// One side of a matchup: the concrete team once known, and the origin it was drawn from.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub team: Option<TeamId>,
    pub origin: Option<Origin>,
}

impl MatchupSide {
    pub fn team(team: TeamId) -> Self {
        Self {
            team: Some(team),
            origin: None,
        }
    }

    pub fn origin(origin: Origin) -> Self {
        Self {
            team: None,
            origin: Some(origin),
        }
    }
}

/// A team-vs-team tie.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: MatchupId,
    pub stage_id: StageId,
    pub phase: Phase,
    /// Group label for group-phase matchups.
    pub group: Option<String>,
    /// Round-robin round (1-based) for group matchups.
    pub round: Option<u32>,
    /// Order within its group (round robin) or bracket round (knockout), 1-based.
    pub sequence: u32,
    pub side_1: MatchupSide,
    pub side_2: MatchupSide,
    pub status: MatchupStatus,
    pub side_1_wins: u32,
    pub side_2_wins: u32,
    /// 2 or 3.
    pub total_matches: u32,
    pub finished_matches: u32,
    pub has_decider: bool,
    /// Matchup the winner advances to; None for the final and group matchups.
    pub next_matchup_id: Option<MatchupId>,
    pub is_bye: bool,
    pub winner: Option<Side>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Matchup {
    pub fn new(stage_id: StageId, phase: Phase, side_1: MatchupSide, side_2: MatchupSide) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage_id,
            phase,
            group: None,
            round: None,
            sequence: 1,
            side_1,
            side_2,
            status: MatchupStatus::Scheduled,
            side_1_wins: 0,
            side_2_wins: 0,
            total_matches: 2,
            finished_matches: 0,
            has_decider: false,
            next_matchup_id: None,
            is_bye: false,
            winner: None,
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchupStatus::Finished
    }

    pub fn side(&self, side: Side) -> &MatchupSide {
        match side {
            Side::One => &self.side_1,
            Side::Two => &self.side_2,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut MatchupSide {
        match side {
            Side::One => &mut self.side_1,
            Side::Two => &mut self.side_2,
        }
    }

    pub fn team(&self, side: Side) -> Option<TeamId> {
        self.side(side).team
    }

    /// Both teams, once both sides are resolved.
    pub fn teams(&self) -> Option<(TeamId, TeamId)> {
        Some((self.side_1.team?, self.side_2.team?))
    }

    pub fn winning_team(&self) -> Option<TeamId> {
        self.winner.and_then(|side| self.team(side))
    }

    pub fn contains_team(&self, team: TeamId) -> bool {
        self.side_1.team == Some(team) || self.side_2.team == Some(team)
    }
}
