//! Individual matches (partidas) played inside a matchup.

use crate::models::tournament::{MatchId, MatchupId, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One side of a matchup or match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// Which pair of players a match is played between.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Men,
    Women,
    Mixed,
    /// Tie-breaking third match of a 4-a-side matchup.
    Decider,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Finished,
}

/// Games won by each side in one set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub side_1: u32,
    pub side_2: u32,
}

impl SetScore {
    pub fn new(side_1: u32, side_2: u32) -> Self {
        Self { side_1, side_2 }
    }

    /// None for a level set.
    pub fn winner(&self) -> Option<Side> {
        match self.side_1.cmp(&self.side_2) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Side with strictly more sets won, or None when level (or no sets).
pub fn sets_winner(sets: &[SetScore]) -> Option<Side> {
    let one = sets.iter().filter(|s| s.winner() == Some(Side::One)).count();
    let two = sets.iter().filter(|s| s.winner() == Some(Side::Two)).count();
    match one.cmp(&two) {
        std::cmp::Ordering::Greater => Some(Side::One),
        std::cmp::Ordering::Less => Some(Side::Two),
        std::cmp::Ordering::Equal => None,
    }
}

/// Total games won by (side 1, side 2) across all sets.
pub fn games_total(sets: &[SetScore]) -> (u32, u32) {
    sets.iter()
        .fold((0, 0), |(a, b), s| (a + s.side_1, b + s.side_2))
}

/// A single match between one pair of players per side.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub matchup_id: MatchupId,
    /// 1..=3; the decider is always 3.
    pub ordinal: u32,
    pub category: MatchCategory,
    pub side_1: Vec<PlayerId>,
    pub side_2: Vec<PlayerId>,
    pub sets: Vec<SetScore>,
    pub status: MatchStatus,
    /// None if not yet played.
    pub winner: Option<Side>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    pub fn new(
        matchup_id: MatchupId,
        ordinal: u32,
        category: MatchCategory,
        side_1: Vec<PlayerId>,
        side_2: Vec<PlayerId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            matchup_id,
            ordinal,
            category,
            side_1,
            side_2,
            sets: Vec::new(),
            status: MatchStatus::Scheduled,
            winner: None,
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn is_decider(&self) -> bool {
        self.category == MatchCategory::Decider
    }

    pub fn players(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::One => &self.side_1,
            Side::Two => &self.side_2,
        }
    }
}
