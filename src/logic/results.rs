//! Match results: record one match, keep the matchup aggregate in sync, create
//! deciders, and settle the matchup once it is decided.

use crate::config::TournamentConfig;
use crate::logic::lineup::{decider, lineup};
use crate::models::{
    games_total, sets_winner, GameMatch, MatchId, Matchup, MatchupId, Phase, PlayerStats,
    SetScore, Side, StageId, StatsDelta, TeamId, TournamentError, TournamentResult,
    ValidationError,
};
use crate::store::TournamentStore;
use serde::Serialize;

/// What registering one match result changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResultOutcome {
    pub match_id: MatchId,
    pub matchup_id: MatchupId,
    pub stage_id: StageId,
    pub phase: Phase,
    pub match_winner: Side,
    pub decider_created: Option<MatchId>,
    pub matchup_finished: bool,
    pub matchup_winner: Option<TeamId>,
    /// The matchup's outcome changed (finished, reopened or flipped).
    pub matchup_changed: bool,
}

impl ResultOutcome {
    /// Group standings must be recomputed.
    pub fn affects_standings(&self) -> bool {
        self.phase == Phase::Group && self.matchup_changed
    }
}

fn resolved_teams(matchup: &Matchup) -> TournamentResult<(TeamId, TeamId)> {
    matchup
        .teams()
        .ok_or_else(|| ValidationError::UnresolvedMatchup(matchup.id).into())
}

/// Team and player counters contributed by one finished match. Group matchups
/// only feed team counters; player counters are reported for every phase.
fn apply_match_contribution<S: TournamentStore + ?Sized>(
    store: &S,
    matchup: &Matchup,
    game: &GameMatch,
    winner: Side,
    sets: &[SetScore],
    revert: bool,
) -> TournamentResult<()> {
    if matchup.phase == Phase::Group {
        let (team_1, team_2) = resolved_teams(matchup)?;
        let (games_1, games_2) = games_total(sets);
        let mut deltas = [
            (team_1, StatsDelta::match_result(winner == Side::One, games_1, games_2)),
            (team_2, StatsDelta::match_result(winner == Side::Two, games_2, games_1)),
        ];
        if revert {
            for (_, d) in &mut deltas {
                *d = d.negated();
            }
        }
        store.increment_stats(&deltas)?;
    }
    for side in [Side::One, Side::Two] {
        let delta = PlayerStats {
            matches_played: 1,
            matches_won: (side == winner) as i32,
        };
        let delta = if revert { delta.negated() } else { delta };
        for &player in game.players(side) {
            store.increment_player(player, delta)?;
        }
    }
    Ok(())
}

/// Rebuild win counts and finished count from the matchup's full match set.
fn refresh_aggregate(matchup: &mut Matchup, matches: &[GameMatch]) {
    let finished = || matches.iter().filter(|m| m.is_finished());
    matchup.side_1_wins = finished().filter(|m| m.winner == Some(Side::One)).count() as u32;
    matchup.side_2_wins = finished().filter(|m| m.winner == Some(Side::Two)).count() as u32;
    matchup.finished_matches = finished().count() as u32;
    if matches.iter().any(GameMatch::is_decider) {
        matchup.has_decider = true;
        matchup.total_matches = 3;
    }
}

/// A 4-a-side matchup whose two regular matches are both finished and split 1-1.
pub fn needs_decider(matchup: &Matchup, matches: &[GameMatch]) -> bool {
    let has_decider = matchup.has_decider || matches.iter().any(GameMatch::is_decider);
    if matchup.total_matches != 2 || has_decider {
        return false;
    }
    let regular: Vec<&GameMatch> = matches.iter().filter(|m| !m.is_decider()).collect();
    regular.len() == 2
        && regular.iter().all(|m| m.is_finished())
        && regular.iter().filter(|m| m.winner == Some(Side::One)).count() == 1
        && regular.iter().filter(|m| m.winner == Some(Side::Two)).count() == 1
}

/// Winning side once the matchup is decided.
pub fn decided_winner(matchup: &Matchup, matches: &[GameMatch]) -> Option<Side> {
    if matchup.side_1_wins >= 2 {
        return Some(Side::One);
    }
    if matchup.side_2_wins >= 2 {
        return Some(Side::Two);
    }
    let all_played = matchup.total_matches == 3 && matchup.finished_matches >= 3;
    let decider_played = matches.iter().any(|m| m.is_decider() && m.is_finished());
    if all_played || decider_played {
        match matchup.side_1_wins.cmp(&matchup.side_2_wins) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    } else {
        None
    }
}

/// Create the decider of a 4-a-side matchup split 1-1, unless it already exists.
pub fn generate_decider_if_needed<S: TournamentStore + ?Sized>(
    store: &S,
    matchup_id: MatchupId,
) -> TournamentResult<Option<MatchId>> {
    let matchup = store
        .matchup(matchup_id)?
        .ok_or(TournamentError::MatchupNotFound(matchup_id))?;
    let matches = store.matches_by_matchup(matchup_id)?;
    if !needs_decider(&matchup, &matches) {
        return Ok(None);
    }
    let (id_1, id_2) = resolved_teams(&matchup)?;
    let home = store.team(id_1)?.ok_or(TournamentError::TeamNotFound(id_1))?;
    let away = store.team(id_2)?.ok_or(TournamentError::TeamNotFound(id_2))?;
    let game = decider(matchup_id, &home, &away);
    let id = game.id;
    store.create_matches(vec![game])?;
    store.mark_has_decider(matchup_id)?;
    log::info!("Matchup {} split 1-1: created decider {}", matchup_id, id);
    Ok(Some(id))
}

/// Create the regular matches of a matchup once both teams are known.
pub fn schedule_matches_if_ready<S: TournamentStore + ?Sized>(
    store: &S,
    config: &TournamentConfig,
    matchup: &Matchup,
) -> TournamentResult<()> {
    let Some((id_1, id_2)) = matchup.teams() else {
        return Ok(());
    };
    if matchup.is_bye || !store.matches_by_matchup(matchup.id)?.is_empty() {
        return Ok(());
    }
    let home = store.team(id_1)?.ok_or(TournamentError::TeamNotFound(id_1))?;
    let away = store.team(id_2)?.ok_or(TournamentError::TeamNotFound(id_2))?;
    store.create_matches(lineup(config.team_size, matchup.id, &home, &away))?;
    log::info!(
        "Scheduled {:?} matchup {}: {} vs {}",
        matchup.phase,
        matchup.id,
        home.name,
        away.name
    );
    Ok(())
}

/// Move a winner into the first empty side of the next matchup.
/// No-op for the final, when the team is already there, or when both sides are taken.
pub fn propagate_winner<S: TournamentStore + ?Sized>(
    store: &S,
    config: &TournamentConfig,
    matchup: &Matchup,
    team: TeamId,
) -> TournamentResult<()> {
    let Some(next_id) = matchup.next_matchup_id else {
        return Ok(());
    };
    let Some(next) = store.assign_first_empty_side(next_id, team)? else {
        log::debug!("Team {} not propagated: matchup {} holds it or is full", team, next_id);
        return Ok(());
    };
    log::info!("Team {} advances from matchup {} to {}", team, matchup.id, next_id);
    schedule_matches_if_ready(store, config, &next)
}

/// Take back a propagated winner, if the next matchup has not been scheduled yet.
fn withdraw_winner<S: TournamentStore + ?Sized>(
    store: &S,
    matchup: &Matchup,
    team: TeamId,
) -> TournamentResult<()> {
    let Some(next_id) = matchup.next_matchup_id else {
        return Ok(());
    };
    if !store.matches_by_matchup(next_id)?.is_empty() {
        log::warn!(
            "Winner of matchup {} changed but {} is already scheduled; bracket left unchanged",
            matchup.id,
            next_id
        );
        return Ok(());
    }
    store.release_team(next_id, team)?;
    Ok(())
}

/// Settle a matchup whose decided winner moved from `before` to `after`.
///
/// A decided matchup is reopened before its award is taken back, and a group
/// award is written before the matchup is marked finished: whenever every group
/// matchup reads as finished, every award is already in the standings.
fn settle_matchup<S: TournamentStore + ?Sized>(
    store: &S,
    config: &TournamentConfig,
    matchup: &Matchup,
    before: Option<Side>,
    after: Option<Side>,
) -> TournamentResult<()> {
    let award = |side: Side| -> Option<[(TeamId, StatsDelta); 2]> {
        Some([
            (matchup.team(side)?, StatsDelta::matchup_win(config.points_per_win)),
            (matchup.team(side.other())?, StatsDelta::matchup_loss()),
        ])
    };

    if let Some(side) = before {
        store.record_matchup_result(matchup.id, None)?;
        match matchup.phase {
            Phase::Group => {
                if let Some(deltas) = award(side) {
                    store.increment_stats(&deltas.map(|(t, d)| (t, d.negated())))?;
                }
            }
            Phase::Final => {}
            _ => {
                if let Some(w) = matchup.team(side) {
                    withdraw_winner(store, matchup, w)?;
                }
            }
        }
    }

    let Some(side) = after else {
        log::info!("Matchup {} reopened", matchup.id);
        return Ok(());
    };
    if matchup.phase == Phase::Group {
        if let Some(deltas) = award(side) {
            store.increment_stats(&deltas)?;
        }
    }
    store.record_matchup_result(matchup.id, Some(side))?;
    log::info!(
        "Matchup {} ({:?}) finished {}-{}",
        matchup.id,
        matchup.phase,
        matchup.side_1_wins,
        matchup.side_2_wins
    );
    match (matchup.phase, matchup.team(side)) {
        (Phase::Group, _) | (_, None) => {}
        (Phase::Final, Some(w)) => log::info!("Final {} won by team {}", matchup.id, w),
        (_, Some(w)) => propagate_winner(store, config, matchup, w)?,
    }
    Ok(())
}

/// Record one match result and bring its matchup up to date. Classification and
/// slot filling are left to the caller (see [`ResultOutcome::affects_standings`]).
///
/// Re-registering a finished match first reverts its earlier contribution, so any
/// sequence of edits leaves the counters as a single clean registration would.
pub fn record_match_result<S: TournamentStore + ?Sized>(
    store: &S,
    config: &TournamentConfig,
    match_id: MatchId,
    sets: &[SetScore],
) -> TournamentResult<ResultOutcome> {
    let game = store
        .game_match(match_id)?
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let matchup = store
        .matchup(game.matchup_id)?
        .ok_or(TournamentError::MatchupNotFound(game.matchup_id))?;
    let winner = sets_winner(sets).ok_or(ValidationError::NoWinner)?;
    resolved_teams(&matchup)?;

    if game.is_finished() {
        if let Some(previous) = game.winner {
            apply_match_contribution(store, &matchup, &game, previous, &game.sets, true)?;
        }
    }
    store.record_match_result(match_id, sets, winner)?;
    apply_match_contribution(store, &matchup, &game, winner, sets, false)?;

    let mut matchup = matchup;
    let mut matches = store.matches_by_matchup(matchup.id)?;
    refresh_aggregate(&mut matchup, &matches);
    store.update_matchup(&matchup)?;

    let mut decider_created = None;
    if needs_decider(&matchup, &matches) {
        match generate_decider_if_needed(store, matchup.id) {
            Ok(created) => decider_created = created,
            Err(e) => log::warn!("Could not create decider for matchup {}: {}", matchup.id, e),
        }
        if decider_created.is_some() {
            matches = store.matches_by_matchup(matchup.id)?;
            refresh_aggregate(&mut matchup, &matches);
        }
    }

    let before = if matchup.is_finished() { matchup.winner } else { None };
    let after = decided_winner(&matchup, &matches);
    let changed = before != after;
    if changed {
        settle_matchup(store, config, &matchup, before, after)?;
    }

    Ok(ResultOutcome {
        match_id,
        matchup_id: matchup.id,
        stage_id: matchup.stage_id,
        phase: matchup.phase,
        match_winner: winner,
        decider_created,
        matchup_finished: after.is_some(),
        matchup_winner: after.and_then(|side| matchup.team(side)),
        matchup_changed: changed,
    })
}
