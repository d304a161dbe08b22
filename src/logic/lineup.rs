//! Which players meet in each match of a matchup.

use crate::models::{
    Gender, GameMatch, MatchCategory, MatchupId, PlayerId, Team, TeamSize, ValidationError,
};

/// Roster must have exactly the format's size, half men and half women.
pub fn validate_roster(team: &Team, size: TeamSize) -> Result<(), ValidationError> {
    let expected = size.players();
    if team.roster.len() != expected {
        return Err(ValidationError::RosterSize {
            team: team.id,
            expected,
            actual: team.roster.len(),
        });
    }
    if team.players_of(Gender::Male).len() != expected / 2 {
        return Err(ValidationError::GenderRatio {
            team: team.id,
            expected: expected / 2,
        });
    }
    Ok(())
}

fn pick(team: &Team, gender: Gender, indices: &[usize]) -> Vec<PlayerId> {
    let players = team.players_of(gender);
    indices
        .iter()
        .filter_map(|&i| players.get(i).map(|p| p.id))
        .collect()
}

fn mixed(team: &Team, index: usize) -> Vec<PlayerId> {
    let mut pair = pick(team, Gender::Male, &[index]);
    pair.extend(pick(team, Gender::Female, &[index]));
    pair
}

/// The regular matches of a matchup: men's and women's doubles, plus mixed for 6-a-side.
pub fn lineup(size: TeamSize, matchup: MatchupId, home: &Team, away: &Team) -> Vec<GameMatch> {
    let mut matches = vec![
        GameMatch::new(
            matchup,
            1,
            MatchCategory::Men,
            pick(home, Gender::Male, &[0, 1]),
            pick(away, Gender::Male, &[0, 1]),
        ),
        GameMatch::new(
            matchup,
            2,
            MatchCategory::Women,
            pick(home, Gender::Female, &[0, 1]),
            pick(away, Gender::Female, &[0, 1]),
        ),
    ];
    if size == TeamSize::Six {
        matches.push(GameMatch::new(
            matchup,
            3,
            MatchCategory::Mixed,
            mixed(home, 2),
            mixed(away, 2),
        ));
    }
    matches
}

/// Third match of a 4-a-side matchup split 1-1: first man and first woman of each side.
pub fn decider(matchup: MatchupId, home: &Team, away: &Team) -> GameMatch {
    GameMatch::new(
        matchup,
        3,
        MatchCategory::Decider,
        mixed(home, 0),
        mixed(away, 0),
    )
}
