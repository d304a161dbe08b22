//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use team_bracket::store::{
    MatchStore, MatchupStore, PlayerStatsCollaborator, StoreError, StoreResult, TeamStore,
};
use team_bracket::{
    BracketEngine, GameMatch, Gender, InMemoryStore, MatchId, Matchup, MatchupId, Phase, Player,
    PlayerId, PlayerStats, SetScore, Side, StageId, StatsDelta, Team, TeamId, TeamSize,
    TournamentConfig, TournamentStore,
};
use uuid::Uuid;

pub fn roster(team: &str, size: TeamSize) -> Vec<Player> {
    let half = size.players() / 2;
    (0..half)
        .map(|i| Player::new(format!("{team}-M{i}"), Gender::Male))
        .chain((0..half).map(|i| Player::new(format!("{team}-W{i}"), Gender::Female)))
        .collect()
}

/// Engine over a fresh store holding the named teams in seeding order.
pub fn stage_with_teams(
    names: &[&str],
    config: TournamentConfig,
) -> (BracketEngine<InMemoryStore>, StageId) {
    stage_on(InMemoryStore::new(), names, config)
}

/// Engine over `store`, after registering the named teams in seeding order.
pub fn stage_on<S: TournamentStore>(
    store: S,
    names: &[&str],
    config: TournamentConfig,
) -> (BracketEngine<S>, StageId) {
    let stage = Uuid::new_v4();
    let teams = names
        .iter()
        .map(|n| Team::new(stage, *n, roster(n, config.team_size)))
        .collect();
    store.create_teams(teams).unwrap();
    (BracketEngine::new(Arc::new(store), config), stage)
}

pub fn team_id<S: TournamentStore>(
    engine: &BracketEngine<S>,
    stage: StageId,
    name: &str,
) -> TeamId {
    engine
        .store()
        .teams_by_stage(stage)
        .unwrap()
        .into_iter()
        .find(|t| t.name == name)
        .unwrap()
        .id
}

pub fn team<S: TournamentStore>(engine: &BracketEngine<S>, id: TeamId) -> Team {
    engine.store().team(id).unwrap().unwrap()
}

pub fn matchup<S: TournamentStore>(engine: &BracketEngine<S>, id: MatchupId) -> Matchup {
    engine.store().matchup(id).unwrap().unwrap()
}

pub fn matchups_in<S: TournamentStore>(
    engine: &BracketEngine<S>,
    stage: StageId,
    phase: Phase,
) -> Vec<Matchup> {
    let mut found: Vec<Matchup> = engine
        .store()
        .matchups_by_stage(stage)
        .unwrap()
        .into_iter()
        .filter(|m| m.phase == phase)
        .collect();
    found.sort_by_key(|m| m.sequence);
    found
}

/// Group matchup between two teams, in either order.
pub fn group_matchup_between<S: TournamentStore>(
    engine: &BracketEngine<S>,
    stage: StageId,
    a: TeamId,
    b: TeamId,
) -> Matchup {
    matchups_in(engine, stage, Phase::Group)
        .into_iter()
        .find(|m| m.contains_team(a) && m.contains_team(b))
        .unwrap()
}

/// Straight-sets score won by `side`.
pub fn sets_for(side: Side) -> Vec<SetScore> {
    match side {
        Side::One => vec![SetScore::new(6, 3), SetScore::new(6, 4)],
        Side::Two => vec![SetScore::new(3, 6), SetScore::new(4, 6)],
    }
}

pub fn side_of(m: &Matchup, team: TeamId) -> Side {
    if m.team(Side::One) == Some(team) {
        Side::One
    } else {
        assert_eq!(m.team(Side::Two), Some(team));
        Side::Two
    }
}

pub fn match_ids<S: TournamentStore>(
    engine: &BracketEngine<S>,
    matchup: MatchupId,
) -> Vec<MatchId> {
    engine
        .store()
        .matches_by_matchup(matchup)
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect()
}

/// Win the first two regular matches of a matchup for `winner`.
pub fn play_matchup<S: TournamentStore>(
    engine: &BracketEngine<S>,
    matchup: MatchupId,
    winner: TeamId,
) {
    let m = self::matchup(engine, matchup);
    let side = side_of(&m, winner);
    for id in match_ids(engine, matchup).into_iter().take(2) {
        engine.register_match_result(id, &sets_for(side)).unwrap();
    }
    assert!(self::matchup(engine, matchup).is_finished());
}

/// Play every group matchup so that the team listed earlier in `order` wins.
pub fn play_groups_in_order<S: TournamentStore>(
    engine: &BracketEngine<S>,
    stage: StageId,
    order: &[&str],
) {
    let rank: Vec<TeamId> = order.iter().map(|n| team_id(engine, stage, n)).collect();
    for m in matchups_in(engine, stage, Phase::Group) {
        let (a, b) = m.teams().unwrap();
        let pos = |t| rank.iter().position(|x| *x == t).unwrap();
        let winner = if pos(a) < pos(b) { a } else { b };
        play_matchup(engine, m.id, winner);
    }
}

pub fn four_a_side() -> TournamentConfig {
    TournamentConfig::with_team_size(TeamSize::Four)
}

/// In-memory store with switches for backend failures and slow calls.
#[derive(Default)]
pub struct HookedStore {
    pub inner: InMemoryStore,
    /// Reject any batch containing a decider match.
    pub refuse_deciders: AtomicBool,
    /// Reads of this matchup take a while.
    pub slow_matchup: Mutex<Option<MatchupId>>,
    /// Number of upcoming matchup awards to delay.
    pub slow_awards: AtomicUsize,
}

const DELAY: Duration = Duration::from_millis(300);

impl HookedStore {
    pub fn slow_down_reads_of(&self, id: MatchupId) {
        *self.slow_matchup.lock().unwrap() = Some(id);
    }
}

impl TeamStore for HookedStore {
    fn teams_by_stage(&self, stage: StageId) -> StoreResult<Vec<Team>> {
        self.inner.teams_by_stage(stage)
    }
    fn team(&self, id: TeamId) -> StoreResult<Option<Team>> {
        self.inner.team(id)
    }
    fn create_teams(&self, teams: Vec<Team>) -> StoreResult<()> {
        self.inner.create_teams(teams)
    }
    fn update_team(&self, team: &Team) -> StoreResult<()> {
        self.inner.update_team(team)
    }
    fn update_positions(&self, positions: &[(TeamId, u32)]) -> StoreResult<()> {
        self.inner.update_positions(positions)
    }
    fn increment_stats(&self, deltas: &[(TeamId, StatsDelta)]) -> StoreResult<()> {
        let is_award = deltas.iter().any(|(_, d)| d.matchups_played > 0);
        let delayed = is_award
            && self
                .slow_awards
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
        if delayed {
            thread::sleep(DELAY);
        }
        self.inner.increment_stats(deltas)
    }
    fn reset_stats(&self, stage: StageId) -> StoreResult<()> {
        self.inner.reset_stats(stage)
    }
}

impl MatchupStore for HookedStore {
    fn create_matchups(&self, matchups: Vec<Matchup>) -> StoreResult<()> {
        self.inner.create_matchups(matchups)
    }
    fn matchup(&self, id: MatchupId) -> StoreResult<Option<Matchup>> {
        let found = self.inner.matchup(id);
        if *self.slow_matchup.lock().unwrap() == Some(id) {
            thread::sleep(DELAY);
        }
        found
    }
    fn matchups_by_stage(&self, stage: StageId) -> StoreResult<Vec<Matchup>> {
        self.inner.matchups_by_stage(stage)
    }
    fn update_matchup(&self, matchup: &Matchup) -> StoreResult<()> {
        self.inner.update_matchup(matchup)
    }
    fn record_matchup_result(&self, id: MatchupId, winner: Option<Side>) -> StoreResult<()> {
        self.inner.record_matchup_result(id, winner)
    }
    fn mark_has_decider(&self, id: MatchupId) -> StoreResult<()> {
        self.inner.mark_has_decider(id)
    }
    fn assign_first_empty_side(
        &self,
        id: MatchupId,
        team: TeamId,
    ) -> StoreResult<Option<Matchup>> {
        self.inner.assign_first_empty_side(id, team)
    }
    fn release_team(&self, id: MatchupId, team: TeamId) -> StoreResult<()> {
        self.inner.release_team(id, team)
    }
    fn all_finished_for_phase(&self, stage: StageId, phase: Phase) -> StoreResult<bool> {
        self.inner.all_finished_for_phase(stage, phase)
    }
}

impl MatchStore for HookedStore {
    fn create_matches(&self, matches: Vec<GameMatch>) -> StoreResult<()> {
        if self.refuse_deciders.load(Ordering::SeqCst) && matches.iter().any(GameMatch::is_decider)
        {
            return Err(StoreError::Backend("decider table offline".to_string()));
        }
        self.inner.create_matches(matches)
    }
    fn game_match(&self, id: MatchId) -> StoreResult<Option<GameMatch>> {
        self.inner.game_match(id)
    }
    fn matches_by_matchup(&self, matchup: MatchupId) -> StoreResult<Vec<GameMatch>> {
        self.inner.matches_by_matchup(matchup)
    }
    fn record_match_result(&self, id: MatchId, sets: &[SetScore], winner: Side) -> StoreResult<()> {
        self.inner.record_match_result(id, sets, winner)
    }
}

impl PlayerStatsCollaborator for HookedStore {
    fn increment_player(&self, player: PlayerId, delta: PlayerStats) -> StoreResult<()> {
        self.inner.increment_player(player, delta)
    }
}
