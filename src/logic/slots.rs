//! Knockout slot filling once the group phase is complete.

use crate::config::TournamentConfig;
use crate::logic::classification::group_standings;
use crate::logic::results::{propagate_winner, schedule_matches_if_ready};
use crate::models::{Matchup, Origin, Phase, Side, StageId, Team, TeamId, TournamentResult};
use crate::store::TournamentStore;
use serde::Serialize;
use std::collections::HashMap;

/// What one slot-filling pass resolved.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FillSummary {
    pub sides_resolved: usize,
    pub byes_advanced: usize,
    /// Bye matchups whose origin has no team (e.g. no runner-up in a one-team group).
    pub byes_unresolved: usize,
}

/// (rank, group label) -> team, from each group's own standings.
fn group_ranks(teams: &[Team]) -> HashMap<(u8, String), TeamId> {
    let mut labels: Vec<&str> = teams.iter().filter_map(|t| t.group.as_deref()).collect();
    labels.sort_unstable();
    labels.dedup();
    let mut lookup = HashMap::new();
    for label in labels {
        // Origins address ranks as u8; teams past 255th are never referenced.
        for (rank, team) in (1..=u8::MAX).zip(group_standings(teams, label)) {
            lookup.insert((rank, label.to_string()), team.id);
        }
    }
    lookup
}

fn resolve(origin: Option<&Origin>, lookup: &HashMap<(u8, String), TeamId>) -> Option<TeamId> {
    match origin? {
        Origin::GroupRank { rank, group } => lookup.get(&(*rank, group.clone())).copied(),
        // Winners arrive through propagation.
        Origin::MatchupWinner { .. } | Origin::Bye => None,
    }
}

/// Resolve group origins into teams and advance bye matchups. Does nothing
/// until every group matchup of the stage is finished; already-resolved sides
/// are left alone, so repeated passes are harmless.
pub fn fill_elimination_slots<S: TournamentStore + ?Sized>(
    store: &S,
    config: &TournamentConfig,
    stage: StageId,
) -> TournamentResult<FillSummary> {
    let mut summary = FillSummary::default();
    if !store.all_finished_for_phase(stage, Phase::Group)? {
        return Ok(summary);
    }
    let teams = store.teams_by_stage(stage)?;
    let lookup = group_ranks(&teams);

    let mut knockout: Vec<Matchup> = store
        .matchups_by_stage(stage)?
        .into_iter()
        .filter(|m| m.phase.is_knockout())
        .collect();
    knockout.sort_by_key(|m| (m.phase, m.sequence));

    for id in knockout.iter().map(|m| m.id) {
        // Re-read: earlier iterations may have propagated into this matchup.
        let Some(mut m) = store.matchup(id)? else {
            continue;
        };
        if m.is_finished() {
            continue;
        }
        if m.is_bye {
            if m.side_1.team.is_none() {
                m.side_1.team = resolve(m.side_1.origin.as_ref(), &lookup);
            }
            let Some(team) = m.side_1.team else {
                log::warn!(
                    "Bye matchup {} has no team for {}",
                    m.id,
                    m.side_1
                        .origin
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default()
                );
                summary.byes_unresolved += 1;
                continue;
            };
            store.update_matchup(&m)?;
            store.record_matchup_result(m.id, Some(Side::One))?;
            log::info!("Team {} advances through bye {}", team, m.id);
            summary.byes_advanced += 1;
            propagate_winner(store, config, &m, team)?;
            continue;
        }

        let mut changed = false;
        for side in [Side::One, Side::Two] {
            if m.team(side).is_some() {
                continue;
            }
            if let Some(team) = resolve(m.side(side).origin.as_ref(), &lookup) {
                m.side_mut(side).team = Some(team);
                summary.sides_resolved += 1;
                changed = true;
            }
        }
        if changed {
            store.update_matchup(&m)?;
            schedule_matches_if_ready(store, config, &m)?;
        }
    }
    if summary.sides_resolved + summary.byes_advanced > 0 {
        log::info!(
            "Stage {}: resolved {} knockout sides, {} byes advanced",
            stage,
            summary.sides_resolved,
            summary.byes_advanced
        );
    }
    Ok(summary)
}
