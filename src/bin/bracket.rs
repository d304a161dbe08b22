//! Command-line driver: load teams from CSV, generate groups and bracket, and
//! optionally play the whole stage out with random scores.
//!
//! Run with: cargo run --bin bracket -- teams.csv [--simulate]
//! CSV columns: team,player,gender (gender is "male" or "female").
//! Format and scoring come from env: BRACKET_TEAM_SIZE, BRACKET_POINTS_PER_WIN,
//! BRACKET_GROUP_COUNT.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use team_bracket::store::{MatchStore, MatchupStore, TeamStore};
use team_bracket::{
    BracketEngine, Gender, InMemoryStore, Player, SetScore, StageId, Team, TournamentConfig,
};
use uuid::Uuid;

#[derive(Deserialize)]
struct RosterRow {
    team: String,
    player: String,
    gender: Gender,
}

#[derive(Serialize)]
struct StandingRow {
    position: Option<u32>,
    team: String,
    group: Option<String>,
    points: i32,
    match_diff: i32,
    game_diff: i32,
}

#[derive(Serialize)]
struct Report {
    standings: Vec<StandingRow>,
    champion: Option<String>,
}

fn load_teams(path: &str, stage: StageId) -> Result<Vec<Team>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    // Keep file order: it is the seeding order.
    let mut order: Vec<String> = Vec::new();
    let mut rosters: BTreeMap<String, Vec<Player>> = BTreeMap::new();
    for row in reader.deserialize() {
        let row: RosterRow = row?;
        if !rosters.contains_key(&row.team) {
            order.push(row.team.clone());
        }
        rosters
            .entry(row.team)
            .or_default()
            .push(Player::new(row.player, row.gender));
    }
    Ok(order
        .into_iter()
        .map(|name| {
            let roster = rosters.remove(&name).unwrap_or_default();
            Team::new(stage, name, roster)
        })
        .collect())
}

fn winning_set(rng: &mut impl Rng, side_1_wins: bool) -> SetScore {
    let loser_games = rng.gen_range(0..=4);
    if side_1_wins {
        SetScore::new(6, loser_games)
    } else {
        SetScore::new(loser_games, 6)
    }
}

/// Random best-of-three score with the given winner.
fn random_sets(rng: &mut impl Rng, side_1_wins: bool) -> Vec<SetScore> {
    let mut sets = vec![winning_set(rng, side_1_wins)];
    if rng.gen_bool(0.3) {
        sets.push(winning_set(rng, !side_1_wins));
    }
    sets.push(winning_set(rng, side_1_wins));
    sets
}

/// Play every open match until nothing is left to play.
fn simulate(
    engine: &BracketEngine<InMemoryStore>,
    stage: StageId,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();
    let mut played = 0;
    loop {
        let open: Vec<_> = engine
            .store()
            .matches_by_stage(stage)?
            .into_iter()
            .filter(|m| !m.is_finished())
            .map(|m| m.id)
            .collect();
        if open.is_empty() {
            return Ok(played);
        }
        for match_id in open {
            // Earlier results in this sweep may already have decided the matchup.
            let Some(game) = engine.store().game_match(match_id)? else {
                continue;
            };
            let decided = engine
                .store()
                .matchup(game.matchup_id)?
                .is_some_and(|m| m.is_finished());
            if decided {
                continue;
            }
            let side_1_wins = rng.gen_bool(0.5);
            let sets = random_sets(&mut rng, side_1_wins);
            engine.register_match_result(match_id, &sets)?;
            played += 1;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: bracket <teams.csv> [--simulate]")?;
    let run_simulation = args.any(|a| a == "--simulate");

    let config = TournamentConfig::from_env();
    log::info!("Loading teams from {} ({:?})", path, config);

    let stage = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::new());
    store.create_teams(load_teams(&path, stage)?)?;

    let engine = BracketEngine::new(store, config);
    let summary = engine.generate_groups_and_bracket(stage)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if run_simulation {
        let played = simulate(&engine, stage)?;
        log::info!("Simulated {} matches", played);
    }

    let standings = engine.standings(stage)?;
    let champion = engine
        .champion(stage)?
        .and_then(|id| standings.iter().find(|t| t.id == id))
        .map(|t| t.name.clone());
    let report = Report {
        standings: standings
            .iter()
            .map(|t| StandingRow {
                position: t.position,
                team: t.name.clone(),
                group: t.group.clone(),
                points: t.stats.points(),
                match_diff: t.stats.match_diff(),
                game_diff: t.stats.game_diff(),
            })
            .collect(),
        champion,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
