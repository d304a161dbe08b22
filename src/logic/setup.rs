//! Stage setup: draw groups, schedule round robins and lay out the knockout bracket.

use crate::config::TournamentConfig;
use crate::logic::groups::{group_count_for, group_label, snake_draft};
use crate::logic::lineup::{lineup, validate_roster};
use crate::logic::round_robin::round_robin;
use crate::logic::templates::{elimination_templates, MatchupTemplate, TemplateSlot};
use crate::models::{
    GameMatch, Matchup, MatchupSide, Origin, Phase, StageId, Team, TeamId, TournamentResult,
    ValidationError,
};
use crate::store::TournamentStore;
use serde::Serialize;
use uuid::Uuid;

/// What a successful generation wrote.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub groups: Vec<String>,
    pub group_matchups: usize,
    pub knockout_matchups: usize,
    pub byes: usize,
}

/// Round-robin matchups (and their matches) for one group of teams in seeding order.
fn group_matchups(
    config: &TournamentConfig,
    stage: StageId,
    members: &[&Team],
    group: Option<&str>,
) -> (Vec<Matchup>, Vec<GameMatch>) {
    let ids: Vec<TeamId> = members.iter().map(|t| t.id).collect();
    let mut matchups = Vec::new();
    let mut matches = Vec::new();
    for pairing in round_robin(&ids, group) {
        let mut m = Matchup::new(
            stage,
            Phase::Group,
            MatchupSide::team(pairing.home),
            MatchupSide::team(pairing.away),
        );
        m.group = pairing.group;
        m.round = Some(pairing.round);
        m.sequence = pairing.sequence;
        m.total_matches = config.team_size.base_matches();
        let home = members.iter().find(|t| t.id == pairing.home);
        let away = members.iter().find(|t| t.id == pairing.away);
        if let (Some(home), Some(away)) = (home, away) {
            matches.extend(lineup(config.team_size, m.id, home, away));
        }
        matchups.push(m);
    }
    (matchups, matches)
}

/// Turn index-linked templates into matchups with real ids.
fn knockout_matchups(
    config: &TournamentConfig,
    stage: StageId,
    templates: &[MatchupTemplate],
) -> Vec<Matchup> {
    let ids: Vec<Uuid> = templates.iter().map(|_| Uuid::new_v4()).collect();
    let side = |slot: &TemplateSlot| {
        MatchupSide::origin(match slot {
            TemplateSlot::Group { rank, group } => Origin::GroupRank {
                rank: *rank,
                group: group.clone(),
            },
            TemplateSlot::WinnerOf(i) => Origin::MatchupWinner { matchup: ids[*i] },
            TemplateSlot::Bye => Origin::Bye,
        })
    };
    templates
        .iter()
        .zip(&ids)
        .map(|(t, id)| {
            let mut m = Matchup::new(stage, t.phase, side(&t.side_1), side(&t.side_2));
            m.id = *id;
            m.sequence = t.sequence;
            m.next_matchup_id = t.next.map(|i| ids[i]);
            m.is_bye = t.is_bye;
            m.total_matches = config.team_size.base_matches();
            m
        })
        .collect()
}

/// Draw groups, create every group matchup with its matches and the knockout
/// bracket skeleton. Everything is validated and built in memory first; a
/// failure writes nothing.
pub fn generate_groups_and_bracket<S: TournamentStore + ?Sized>(
    store: &S,
    config: &TournamentConfig,
    stage: StageId,
) -> TournamentResult<GenerationSummary> {
    let mut teams = store.teams_by_stage(stage)?;
    let n = teams.len();
    if n < 2 {
        return Err(ValidationError::NotEnoughTeams(n).into());
    }
    if !store.matchups_by_stage(stage)?.is_empty() {
        return Err(ValidationError::AlreadyGenerated(stage).into());
    }
    for team in &teams {
        validate_roster(team, config.team_size)?;
    }
    let group_count = config.group_count.unwrap_or_else(|| group_count_for(n));
    if group_count == 0 || group_count > n {
        return Err(ValidationError::UnsupportedGroupCount {
            groups: group_count,
            teams: n,
        }
        .into());
    }

    let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    let draft = if group_count >= 2 {
        snake_draft(&ids, group_count)
    } else {
        Vec::new()
    };
    for team in &mut teams {
        team.stats.reset();
        team.position = None;
        team.group = draft
            .iter()
            .find(|(id, _)| *id == team.id)
            .map(|(_, g)| g.clone());
    }

    let mut summary = GenerationSummary::default();
    let mut matchups = Vec::new();
    let mut matches = Vec::new();
    if group_count >= 2 {
        summary.groups = (0..group_count).map(group_label).collect();
        for label in &summary.groups {
            let members: Vec<&Team> = teams
                .iter()
                .filter(|t| t.group.as_deref() == Some(label.as_str()))
                .collect();
            let (mu, ms) = group_matchups(config, stage, &members, Some(label));
            matchups.extend(mu);
            matches.extend(ms);
        }
    } else {
        let members: Vec<&Team> = teams.iter().collect();
        let (mu, ms) = group_matchups(config, stage, &members, None);
        matchups.extend(mu);
        matches.extend(ms);
    }
    summary.group_matchups = matchups.len();

    if group_count >= 2 {
        if let Some(templates) = elimination_templates(&summary.groups) {
            let knockout = knockout_matchups(config, stage, &templates);
            summary.knockout_matchups = knockout.len();
            summary.byes = knockout.iter().filter(|m| m.is_bye).count();
            matchups.extend(knockout);
        }
    }

    for team in &teams {
        store.update_team(team)?;
    }
    store.create_matchups(matchups)?;
    store.create_matches(matches)?;

    log::info!(
        "Generated stage {}: {} teams, {} group(s), {} group matchups, {} knockout ({} byes)",
        stage,
        n,
        group_count,
        summary.group_matchups,
        summary.knockout_matchups,
        summary.byes
    );
    Ok(summary)
}
