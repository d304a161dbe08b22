//! Standings: tie-break cascade and position assignment.

use crate::models::{Team, TeamId};
use std::cmp::Ordering;

/// Points, match differential, game differential and games won (all descending),
/// then name ascending. Team id settles identically named teams so the order is total.
pub fn compare_teams(a: &Team, b: &Team) -> Ordering {
    b.stats
        .points()
        .cmp(&a.stats.points())
        .then_with(|| b.stats.match_diff().cmp(&a.stats.match_diff()))
        .then_with(|| b.stats.game_diff().cmp(&a.stats.game_diff()))
        .then_with(|| b.stats.games_won().cmp(&a.stats.games_won()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort teams best first.
pub fn rank_teams(teams: &mut [Team]) {
    teams.sort_by(compare_teams);
}

/// Unique positions 1..=N, best first, as one batch of (team, position).
pub fn classify(teams: &[Team]) -> Vec<(TeamId, u32)> {
    let mut ordered: Vec<&Team> = teams.iter().collect();
    ordered.sort_by(|a, b| compare_teams(a, b));
    ordered
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i as u32 + 1))
        .collect()
}

/// Teams of one group, best first.
pub fn group_standings<'a>(teams: &'a [Team], group: &str) -> Vec<&'a Team> {
    let mut members: Vec<&Team> = teams
        .iter()
        .filter(|t| t.group.as_deref() == Some(group))
        .collect();
    members.sort_by(|a, b| compare_teams(a, b));
    members
}
