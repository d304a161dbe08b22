//! The operations exposed to callers, with the locking that makes them safe to
//! call from several threads.
//!
//! Results for different matchups run in parallel. Results for the same matchup
//! serialize on a per-matchup mutex. Generation, classification and slot filling
//! each serialize on an engine-wide mutex. Slot filling also waits for every
//! result in flight to be fully written, so knockout seeds never come from a
//! half-settled group phase.

use crate::config::TournamentConfig;
use crate::logic::{self, classify, FillSummary, GenerationSummary, ResultOutcome};
use crate::models::{
    MatchId, MatchupId, Phase, SetScore, StageId, Team, TeamId, TournamentError,
    TournamentResult,
};
use crate::store::{StoreError, TournamentStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Outcome of a batch registration: successes and per-item failures.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub registered: Vec<ResultOutcome>,
    pub failed: Vec<(MatchId, TournamentError)>,
}

pub struct BracketEngine<S: TournamentStore> {
    store: Arc<S>,
    config: TournamentConfig,
    matchup_locks: Mutex<HashMap<MatchupId, Arc<Mutex<()>>>>,
    generate_lock: Mutex<()>,
    fill_lock: Mutex<()>,
    classify_lock: Mutex<()>,
    /// Held shared while a result is written, exclusively while slots are filled.
    results_gate: RwLock<()>,
}

fn lock<'a, T>(m: &'a Mutex<T>, what: &'static str) -> TournamentResult<MutexGuard<'a, T>> {
    m.lock().map_err(|_| StoreError::Poisoned(what).into())
}

impl<S: TournamentStore> BracketEngine<S> {
    pub fn new(store: Arc<S>, config: TournamentConfig) -> Self {
        Self {
            store,
            config,
            matchup_locks: Mutex::new(HashMap::new()),
            generate_lock: Mutex::new(()),
            fill_lock: Mutex::new(()),
            classify_lock: Mutex::new(()),
            results_gate: RwLock::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    fn matchup_lock(&self, id: MatchupId) -> TournamentResult<Arc<Mutex<()>>> {
        let mut locks = lock(&self.matchup_locks, "matchup locks")?;
        Ok(locks.entry(id).or_default().clone())
    }

    /// Draw groups, schedule every group matchup and lay out the knockout bracket.
    pub fn generate_groups_and_bracket(
        &self,
        stage: StageId,
    ) -> TournamentResult<GenerationSummary> {
        let _guard = lock(&self.generate_lock, "generation")?;
        logic::generate_groups_and_bracket(self.store.as_ref(), &self.config, stage)
    }

    /// Record one match under its matchup's lock, without the stage-wide follow-ups.
    fn record(&self, match_id: MatchId, sets: &[SetScore]) -> TournamentResult<ResultOutcome> {
        let game = self
            .store
            .game_match(match_id)?
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let _gate = self
            .results_gate
            .read()
            .map_err(|_| StoreError::Poisoned("results gate"))?;
        let matchup_lock = self.matchup_lock(game.matchup_id)?;
        let _guard = lock(&matchup_lock, "matchup")?;
        logic::record_match_result(self.store.as_ref(), &self.config, match_id, sets)
    }

    /// Record a match result. A finished group matchup triggers reclassification
    /// and slot filling; a finished knockout matchup triggers slot filling.
    pub fn register_match_result(
        &self,
        match_id: MatchId,
        sets: &[SetScore],
    ) -> TournamentResult<ResultOutcome> {
        let outcome = self.record(match_id, sets)?;
        if outcome.affects_standings() {
            self.recalculate_classification(outcome.stage_id)?;
        }
        if outcome.matchup_changed {
            self.fill_elimination_slots(outcome.stage_id)?;
        }
        Ok(outcome)
    }

    /// Register many results. A failing item does not stop the others; the
    /// stage-wide classification and slot filling run once at the end.
    pub fn register_match_results(
        &self,
        items: &[(MatchId, Vec<SetScore>)],
    ) -> TournamentResult<BatchOutcome> {
        let mut batch = BatchOutcome::default();
        let mut reclassify = BTreeSet::new();
        let mut refill = BTreeSet::new();
        for (match_id, sets) in items {
            match self.record(*match_id, sets) {
                Ok(outcome) => {
                    if outcome.affects_standings() {
                        reclassify.insert(outcome.stage_id);
                    }
                    if outcome.matchup_changed {
                        refill.insert(outcome.stage_id);
                    }
                    batch.registered.push(outcome);
                }
                Err(e) => {
                    log::warn!("Result for match {} rejected: {}", match_id, e);
                    batch.failed.push((*match_id, e));
                }
            }
        }
        for stage in reclassify {
            self.recalculate_classification(stage)?;
        }
        for stage in refill {
            self.fill_elimination_slots(stage)?;
        }
        Ok(batch)
    }

    /// Recompute every team position of the stage and write them as one batch.
    pub fn recalculate_classification(
        &self,
        stage: StageId,
    ) -> TournamentResult<Vec<(TeamId, u32)>> {
        let _guard = lock(&self.classify_lock, "classification")?;
        let teams = self.store.teams_by_stage(stage)?;
        let positions = classify(&teams);
        self.store.update_positions(&positions)?;
        log::debug!("Stage {}: classified {} teams", stage, positions.len());
        Ok(positions)
    }

    /// Create the decider of a matchup split 1-1, if it does not exist yet.
    pub fn generate_decider_if_needed(
        &self,
        matchup: MatchupId,
    ) -> TournamentResult<Option<MatchId>> {
        let matchup_lock = self.matchup_lock(matchup)?;
        let _guard = lock(&matchup_lock, "matchup")?;
        logic::generate_decider_if_needed(self.store.as_ref(), matchup)
    }

    /// Resolve knockout origins once the group phase is over. Callers that just
    /// finished a group matchup classify first; filling reads the group counters
    /// directly, so it never depends on stale positions.
    pub fn fill_elimination_slots(&self, stage: StageId) -> TournamentResult<FillSummary> {
        let _guard = lock(&self.fill_lock, "slot filling")?;
        let _gate = self
            .results_gate
            .write()
            .map_err(|_| StoreError::Poisoned("results gate"))?;
        logic::fill_elimination_slots(self.store.as_ref(), &self.config, stage)
    }

    /// Zero the counters and positions of every team of the stage.
    pub fn reset_stage_stats(&self, stage: StageId) -> TournamentResult<()> {
        self.store.reset_stats(stage)?;
        log::info!("Stage {}: team counters reset", stage);
        Ok(())
    }

    /// Teams of the stage, best first.
    pub fn standings(&self, stage: StageId) -> TournamentResult<Vec<Team>> {
        let mut teams = self.store.teams_by_stage(stage)?;
        logic::rank_teams(&mut teams);
        Ok(teams)
    }

    /// Winner of the finished final, if there is one.
    pub fn champion(&self, stage: StageId) -> TournamentResult<Option<TeamId>> {
        Ok(self
            .store
            .matchups_by_stage(stage)?
            .iter()
            .find(|m| m.phase == Phase::Final && m.is_finished())
            .and_then(|m| m.winning_team()))
    }
}
