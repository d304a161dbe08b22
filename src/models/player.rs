//! Roster members and their individual counters.

use crate::models::tournament::PlayerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Used to split rosters into men's, women's and mixed pairs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// A roster member.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub gender: Gender,
}

impl Player {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gender,
        }
    }
}

/// Per-player counters kept by the player statistics collaborator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub matches_played: i32,
    pub matches_won: i32,
}

impl PlayerStats {
    /// Add a (possibly negative) change.
    pub fn apply(&mut self, delta: PlayerStats) {
        self.matches_played += delta.matches_played;
        self.matches_won += delta.matches_won;
    }

    pub fn negated(self) -> Self {
        Self {
            matches_played: -self.matches_played,
            matches_won: -self.matches_won,
        }
    }
}
