//! Team, its roster and the aggregate counters used for standings.

use crate::models::player::{Gender, Player};
use crate::models::tournament::{StageId, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of players a team fields.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum TeamSize {
    /// Two matches per matchup, plus a decider on a 1-1 split.
    #[default]
    Four,
    /// Three fixed matches per matchup, never a decider.
    Six,
}

impl TeamSize {
    pub fn players(self) -> usize {
        match self {
            TeamSize::Four => 4,
            TeamSize::Six => 6,
        }
    }

    /// Matches a matchup starts with (before any decider).
    pub fn base_matches(self) -> u32 {
        match self {
            TeamSize::Four => 2,
            TeamSize::Six => 3,
        }
    }
}

impl From<TeamSize> for usize {
    fn from(size: TeamSize) -> Self {
        size.players()
    }
}

/// A signed change to a team's counters. Negative values revert an earlier contribution.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatsDelta {
    pub matchups_played: i32,
    pub matchups_won: i32,
    pub matchups_lost: i32,
    pub points: i32,
    pub matches_won: i32,
    pub matches_lost: i32,
    pub games_won: i32,
    pub games_lost: i32,
}

impl StatsDelta {
    /// Award for winning a group matchup.
    pub fn matchup_win(points: u32) -> Self {
        Self {
            matchups_played: 1,
            matchups_won: 1,
            points: points as i32,
            ..Self::default()
        }
    }

    pub fn matchup_loss() -> Self {
        Self {
            matchups_played: 1,
            matchups_lost: 1,
            ..Self::default()
        }
    }

    /// Contribution of one finished match to one side.
    pub fn match_result(won: bool, games_won: u32, games_lost: u32) -> Self {
        Self {
            matches_won: won as i32,
            matches_lost: (!won) as i32,
            games_won: games_won as i32,
            games_lost: games_lost as i32,
            ..Self::default()
        }
    }

    pub fn negated(self) -> Self {
        Self {
            matchups_played: -self.matchups_played,
            matchups_won: -self.matchups_won,
            matchups_lost: -self.matchups_lost,
            points: -self.points,
            matches_won: -self.matches_won,
            matches_lost: -self.matches_lost,
            games_won: -self.games_won,
            games_lost: -self.games_lost,
        }
    }
}

/// Aggregate counters of a team. Only [`TeamStats::apply`] and [`TeamStats::reset`] mutate them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    matchups_played: i32,
    matchups_won: i32,
    matchups_lost: i32,
    points: i32,
    matches_won: i32,
    matches_lost: i32,
    games_won: i32,
    games_lost: i32,
}

impl TeamStats {
    pub fn apply(&mut self, delta: &StatsDelta) {
        self.matchups_played += delta.matchups_played;
        self.matchups_won += delta.matchups_won;
        self.matchups_lost += delta.matchups_lost;
        self.points += delta.points;
        self.matches_won += delta.matches_won;
        self.matches_lost += delta.matches_lost;
        self.games_won += delta.games_won;
        self.games_lost += delta.games_lost;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matchups_played(&self) -> i32 {
        self.matchups_played
    }

    pub fn matchups_won(&self) -> i32 {
        self.matchups_won
    }

    pub fn matchups_lost(&self) -> i32 {
        self.matchups_lost
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn matches_won(&self) -> i32 {
        self.matches_won
    }

    pub fn matches_lost(&self) -> i32 {
        self.matches_lost
    }

    pub fn match_diff(&self) -> i32 {
        self.matches_won - self.matches_lost
    }

    pub fn games_won(&self) -> i32 {
        self.games_won
    }

    pub fn games_lost(&self) -> i32 {
        self.games_lost
    }

    pub fn game_diff(&self) -> i32 {
        self.games_won - self.games_lost
    }
}

/// A team registered in a stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub stage_id: StageId,
    pub name: String,
    /// Group label ("A", "B", ...) once groups are drawn.
    pub group: Option<String>,
    pub roster: Vec<Player>,
    pub stats: TeamStats,
    /// Overall position in the stage; None until the first classification.
    pub position: Option<u32>,
}

impl Team {
    pub fn new(stage_id: StageId, name: impl Into<String>, roster: Vec<Player>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage_id,
            name: name.into(),
            group: None,
            roster,
            stats: TeamStats::default(),
            position: None,
        }
    }

    /// Roster members of one gender, in roster order.
    pub fn players_of(&self, gender: Gender) -> Vec<&Player> {
        self.roster.iter().filter(|p| p.gender == gender).collect()
    }
}
