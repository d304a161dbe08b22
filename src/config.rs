//! Tournament configuration: team format, scoring and group overrides.

use crate::models::TeamSize;
use serde::Deserialize;

/// Settings shared by every operation of a stage.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct TournamentConfig {
    #[serde(default)]
    pub team_size: TeamSize,
    /// Points awarded for winning a group matchup.
    #[serde(default = "default_points_per_win")]
    pub points_per_win: u32,
    /// Overrides the group count derived from the number of teams.
    #[serde(default)]
    pub group_count: Option<usize>,
}

fn default_points_per_win() -> u32 {
    3
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            team_size: TeamSize::default(),
            points_per_win: default_points_per_win(),
            group_count: None,
        }
    }
}

impl TournamentConfig {
    pub fn with_team_size(team_size: TeamSize) -> Self {
        Self {
            team_size,
            ..Self::default()
        }
    }

    /// Reads BRACKET_TEAM_SIZE, BRACKET_POINTS_PER_WIN and BRACKET_GROUP_COUNT.
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let team_size = std::env::var("BRACKET_TEAM_SIZE")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .and_then(|v| TeamSize::try_from(v).ok())
            .unwrap_or_default();
        let points_per_win = std::env::var("BRACKET_POINTS_PER_WIN")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_else(default_points_per_win);
        let group_count = std::env::var("BRACKET_GROUP_COUNT")
            .ok()
            .and_then(|v| v.trim().parse().ok());
        Self {
            team_size,
            points_per_win,
            group_count,
        }
    }
}
