//! Integration tests for the knockout phase: templates, slot filling, byes, propagation.

mod common;

use common::*;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use team_bracket::logic::groups::group_label;
use team_bracket::store::{MatchStore, MatchupStore};
use team_bracket::{
    elimination_templates, BracketLayout, Origin, Phase, SetScore, Side, TournamentConfig,
};

fn labels(n: usize) -> Vec<String> {
    (0..n).map(group_label).collect()
}

fn with_groups(groups: usize) -> TournamentConfig {
    TournamentConfig {
        group_count: Some(groups),
        ..four_a_side()
    }
}

#[test]
fn bye_counts_and_sizes_per_group_count() {
    let expected = [
        (2, 0, 3),
        (3, 2, 7),
        (4, 0, 7),
        (5, 6, 15),
        (6, 4, 15),
        (7, 2, 15),
        (8, 0, 15),
    ];
    for (groups, byes, total) in expected {
        let templates = elimination_templates(&labels(groups)).unwrap();
        assert_eq!(templates.iter().filter(|t| t.is_bye).count(), byes, "{groups} groups");
        assert_eq!(templates.len(), total, "{groups} groups");
        let layout = BracketLayout::for_group_count(groups).unwrap();
        assert_eq!(layout.bye_count(), byes);
    }
}

#[test]
fn four_groups_build_quarters_semis_and_final() {
    let templates = elimination_templates(&labels(4)).unwrap();
    let count = |phase| templates.iter().filter(|t| t.phase == phase).count();
    assert_eq!(count(Phase::Quarterfinal), 4);
    assert_eq!(count(Phase::Semifinal), 2);
    assert_eq!(count(Phase::Final), 1);
    assert_eq!(count(Phase::RoundOf16), 0);
}

#[test]
fn generated_bracket_carries_origins() {
    let names = ["A1", "B1", "C1", "C2", "B2", "A2"];
    let (engine, stage) = stage_with_teams(&names, with_groups(3));
    let summary = engine.generate_groups_and_bracket(stage).unwrap();
    assert_eq!(summary.knockout_matchups, 7);
    assert_eq!(summary.byes, 2);

    let quarters = matchups_in(&engine, stage, Phase::Quarterfinal);
    let label = |side: &team_bracket::MatchupSide| side.origin.as_ref().unwrap().to_string();
    assert_eq!(label(&quarters[0].side_1), "1º Grupo A");
    assert_eq!(quarters[0].side_2.origin, Some(Origin::Bye));
    assert!(quarters[0].is_bye);
    assert_eq!(label(&quarters[1].side_1), "1º Grupo C");
    assert_eq!(label(&quarters[1].side_2), "2º Grupo B");
    assert_eq!(label(&quarters[3].side_1), "2º Grupo A");
    assert_eq!(label(&quarters[3].side_2), "2º Grupo C");

    let semis = matchups_in(&engine, stage, Phase::Semifinal);
    let final_id = matchups_in(&engine, stage, Phase::Final)[0].id;
    assert_eq!(quarters[0].next_matchup_id, Some(semis[0].id));
    assert_eq!(quarters[3].next_matchup_id, Some(semis[1].id));
    assert_eq!(
        semis[0].side_1.origin,
        Some(Origin::MatchupWinner {
            matchup: quarters[0].id
        })
    );
    assert!(semis.iter().all(|s| s.next_matchup_id == Some(final_id)));
}

#[test]
fn two_groups_end_to_end() {
    let (engine, stage) = stage_with_teams(&["A1", "B1", "B2", "A2"], with_groups(2));
    engine.generate_groups_and_bracket(stage).unwrap();
    let id = |n| team_id(&engine, stage, n);

    let semis = matchups_in(&engine, stage, Phase::Semifinal);
    assert!(semis.iter().all(|s| s.teams().is_none()));

    play_groups_in_order(&engine, stage, &["A1", "B1", "A2", "B2"]);

    let semis = matchups_in(&engine, stage, Phase::Semifinal);
    assert_eq!(semis[0].teams(), Some((id("A1"), id("B2"))));
    assert_eq!(semis[1].teams(), Some((id("B1"), id("A2"))));
    assert_eq!(match_ids(&engine, semis[0].id).len(), 2);

    play_matchup(&engine, semis[0].id, id("A1"));
    let final_matchup = &matchups_in(&engine, stage, Phase::Final)[0];
    assert_eq!(final_matchup.team(Side::One), Some(id("A1")));
    assert_eq!(final_matchup.team(Side::Two), None);
    assert!(match_ids(&engine, final_matchup.id).is_empty());

    play_matchup(&engine, semis[1].id, id("B1"));
    let final_matchup = matchups_in(&engine, stage, Phase::Final).remove(0);
    assert_eq!(final_matchup.teams(), Some((id("A1"), id("B1"))));
    assert_eq!(engine.champion(stage).unwrap(), None);

    play_matchup(&engine, final_matchup.id, id("B1"));
    assert_eq!(engine.champion(stage).unwrap(), Some(id("B1")));
}

#[test]
fn knockout_results_do_not_touch_group_standings() {
    let (engine, stage) = stage_with_teams(&["A1", "B1", "B2", "A2"], with_groups(2));
    engine.generate_groups_and_bracket(stage).unwrap();
    play_groups_in_order(&engine, stage, &["A1", "B1", "A2", "B2"]);
    let before = team(&engine, team_id(&engine, stage, "A1")).stats;

    let semi = &matchups_in(&engine, stage, Phase::Semifinal)[0];
    play_matchup(&engine, semi.id, team_id(&engine, stage, "A1"));
    assert_eq!(team(&engine, team_id(&engine, stage, "A1")).stats, before);
}

#[test]
fn byes_advance_once_groups_are_finished() {
    let names = ["A1", "B1", "C1", "C2", "B2", "A2"];
    let (engine, stage) = stage_with_teams(&names, with_groups(3));
    engine.generate_groups_and_bracket(stage).unwrap();
    let id = |n| team_id(&engine, stage, n);

    // Two of three groups done: nothing resolves yet.
    for (w, l) in [("A1", "A2"), ("B1", "B2")] {
        let m = group_matchup_between(&engine, stage, id(w), id(l));
        play_matchup(&engine, m.id, id(w));
    }
    let quarters = matchups_in(&engine, stage, Phase::Quarterfinal);
    assert!(!quarters[0].is_finished());
    assert_eq!(quarters[0].side_1.team, None);

    let m = group_matchup_between(&engine, stage, id("C1"), id("C2"));
    play_matchup(&engine, m.id, id("C1"));

    let quarters = matchups_in(&engine, stage, Phase::Quarterfinal);
    let bye = &quarters[0];
    assert!(bye.is_finished());
    assert_eq!(bye.winning_team(), Some(id("A1")));
    assert!(match_ids(&engine, bye.id).is_empty());
    assert!(quarters[2].is_finished());
    assert_eq!(quarters[2].winning_team(), Some(id("B1")));
    assert_eq!(quarters[1].teams(), Some((id("C1"), id("B2"))));
    assert_eq!(quarters[3].teams(), Some((id("A2"), id("C2"))));

    let semis = matchups_in(&engine, stage, Phase::Semifinal);
    assert_eq!(semis[0].team(Side::One), Some(id("A1")));
    assert_eq!(semis[1].team(Side::One), Some(id("B1")));
    assert_eq!(semis[0].team(Side::Two), None);

    // Filling again changes nothing.
    let again = engine.fill_elimination_slots(stage).unwrap();
    assert_eq!(again.byes_advanced + again.sides_resolved, 0);
    assert_eq!(matchups_in(&engine, stage, Phase::Semifinal), semis);

    play_matchup(&engine, quarters[1].id, id("B2"));
    let semis = matchups_in(&engine, stage, Phase::Semifinal);
    assert_eq!(semis[0].teams(), Some((id("A1"), id("B2"))));
    assert_eq!(match_ids(&engine, semis[0].id).len(), 2);
}

#[test]
fn missing_runner_up_leaves_slot_unresolved() {
    // Nine teams in five groups: group A ends up with a single team.
    let names = ["T1", "T2", "T3", "T4", "T5", "T6", "T7", "T8", "T9"];
    let (engine, stage) = stage_with_teams(&names, with_groups(5));
    let summary = engine.generate_groups_and_bracket(stage).unwrap();
    assert_eq!(summary.byes, 6);
    play_groups_in_order(&engine, stage, &names);

    let round = matchups_in(&engine, stage, Phase::RoundOf16);
    // 2A x 2E: only the group E side resolves.
    let open = &round[5];
    assert_eq!(open.side_1.team, None);
    assert!(open.side_2.team.is_some());
    assert!(!open.is_finished());
    assert!(engine.store().matches_by_matchup(open.id).unwrap().is_empty());
    // Every bye has a team to advance.
    assert!(round.iter().filter(|m| m.is_bye).all(|m| m.is_finished()));
}

#[test]
fn eight_groups_pair_winners_with_runners_up() {
    let names: Vec<String> = (0..24).map(|i| format!("T{i:02}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let (engine, stage) = stage_with_teams(&names, four_a_side());
    let summary = engine.generate_groups_and_bracket(stage).unwrap();
    assert_eq!(summary.groups.len(), 8);
    assert_eq!(summary.byes, 0);
    assert_eq!(summary.knockout_matchups, 15);

    play_groups_in_order(&engine, stage, &names);
    let round = matchups_in(&engine, stage, Phase::RoundOf16);
    assert!(round.iter().all(|m| m.teams().is_some()));
    for m in &round {
        assert_eq!(engine.store().matches_by_matchup(m.id).unwrap().len(), 2);
        let (a, b) = m.teams().unwrap();
        assert_ne!(team(&engine, a).group, team(&engine, b).group);
    }
    let stored = engine.store().matchup(round[0].id).unwrap().unwrap();
    assert_eq!(stored, round[0]);
}

#[test]
fn correcting_a_semifinal_swaps_the_finalist() {
    let (engine, stage) = stage_with_teams(&["A1", "B1", "B2", "A2"], with_groups(2));
    engine.generate_groups_and_bracket(stage).unwrap();
    let id = |n| team_id(&engine, stage, n);
    play_groups_in_order(&engine, stage, &["A1", "B1", "A2", "B2"]);

    let semi = matchups_in(&engine, stage, Phase::Semifinal).remove(0);
    let final_id = matchups_in(&engine, stage, Phase::Final)[0].id;
    play_matchup(&engine, semi.id, id("A1"));
    assert_eq!(matchup(&engine, final_id).team(Side::One), Some(id("A1")));

    // B2 takes the first match back: the semi reopens and A1 leaves the final.
    let ids = match_ids(&engine, semi.id);
    let reopened = engine.register_match_result(ids[0], &sets_for(Side::Two)).unwrap();
    assert!(reopened.matchup_changed);
    assert!(!reopened.matchup_finished);
    assert_eq!(matchup(&engine, final_id).team(Side::One), None);

    let flipped = engine.register_match_result(ids[1], &sets_for(Side::Two)).unwrap();
    assert_eq!(flipped.matchup_winner, Some(id("B2")));
    let final_matchup = matchup(&engine, final_id);
    assert_eq!(final_matchup.team(Side::One), Some(id("B2")));
    assert!(!final_matchup.contains_team(id("A1")));
}

#[test]
fn correcting_a_semifinal_after_the_final_is_scheduled_keeps_the_bracket() {
    let (engine, stage) = stage_with_teams(&["A1", "B1", "B2", "A2"], with_groups(2));
    engine.generate_groups_and_bracket(stage).unwrap();
    let id = |n| team_id(&engine, stage, n);
    play_groups_in_order(&engine, stage, &["A1", "B1", "A2", "B2"]);

    let semis = matchups_in(&engine, stage, Phase::Semifinal);
    play_matchup(&engine, semis[0].id, id("A1"));
    play_matchup(&engine, semis[1].id, id("B1"));
    let final_id = matchups_in(&engine, stage, Phase::Final)[0].id;
    let scheduled = match_ids(&engine, final_id);
    assert_eq!(scheduled.len(), 2);

    for match_id in match_ids(&engine, semis[0].id).into_iter().take(2) {
        engine.register_match_result(match_id, &sets_for(Side::Two)).unwrap();
    }

    assert_eq!(matchup(&engine, semis[0].id).winning_team(), Some(id("B2")));
    let final_matchup = matchup(&engine, final_id);
    assert_eq!(final_matchup.teams(), Some((id("A1"), id("B1"))));
    assert_eq!(match_ids(&engine, final_id), scheduled);
}

#[test]
fn semifinals_finishing_together_both_reach_the_final() {
    let names = ["A1", "B1", "B2", "A2"];
    let (engine, stage) = stage_on(HookedStore::default(), &names, with_groups(2));
    engine.generate_groups_and_bracket(stage).unwrap();
    let id = |n| team_id(&engine, stage, n);
    play_groups_in_order(&engine, stage, &["A1", "B1", "A2", "B2"]);

    let semis: Vec<Vec<_>> = matchups_in(&engine, stage, Phase::Semifinal)
        .iter()
        .map(|m| match_ids(&engine, m.id))
        .collect();
    for ids in &semis {
        engine.register_match_result(ids[0], &sets_for(Side::One)).unwrap();
    }
    let final_id = matchups_in(&engine, stage, Phase::Final)[0].id;
    engine.store().slow_down_reads_of(final_id);

    thread::scope(|s| {
        for ids in &semis {
            let engine = &engine;
            s.spawn(move || engine.register_match_result(ids[1], &sets_for(Side::One)).unwrap());
        }
    });

    let final_matchup = matchup(&engine, final_id);
    assert!(final_matchup.contains_team(id("A1")));
    assert!(final_matchup.contains_team(id("B1")));
    assert_eq!(match_ids(&engine, final_id).len(), 2);
}

#[test]
fn knockout_seeds_wait_for_the_last_group_award() {
    // Group A: P, Q, R beat each other in a cycle and R tops it on game
    // difference. Group B: X, Y, Z.
    let names = ["P", "X", "Y", "Q", "R", "Z"];
    let (engine, stage) = stage_on(HookedStore::default(), &names, four_a_side());
    engine.generate_groups_and_bracket(stage).unwrap();
    let id = |n| team_id(&engine, stage, n);
    for (w, l) in [("P", "Q"), ("Q", "R"), ("X", "Y"), ("X", "Z")] {
        let m = group_matchup_between(&engine, stage, id(w), id(l));
        play_matchup(&engine, m.id, id(w));
    }

    let r_p = group_matchup_between(&engine, stage, id("R"), id("P"));
    let r_sets = match side_of(&r_p, id("R")) {
        Side::One => vec![SetScore::new(6, 0); 2],
        Side::Two => vec![SetScore::new(0, 6); 2],
    };
    let r_ids = match_ids(&engine, r_p.id);
    let y_z = group_matchup_between(&engine, stage, id("Y"), id("Z"));
    let y_sets = sets_for(side_of(&y_z, id("Y")));
    let y_ids = match_ids(&engine, y_z.id);
    engine.register_match_result(r_ids[0], &r_sets).unwrap();
    engine.register_match_result(y_ids[0], &y_sets).unwrap();

    // R's award lands slowly while group B finishes on another thread.
    engine.store().slow_awards.store(1, Ordering::SeqCst);
    thread::scope(|s| {
        s.spawn(|| engine.register_match_result(r_ids[1], &r_sets).unwrap());
        s.spawn(|| {
            thread::sleep(Duration::from_millis(100));
            engine.register_match_result(y_ids[1], &y_sets).unwrap()
        });
    });

    let r = team(&engine, id("R"));
    assert_eq!(r.stats.points(), 3);
    assert_eq!(r.stats.game_diff(), 14);
    let semi = &matchups_in(&engine, stage, Phase::Semifinal)[0];
    assert_eq!(semi.teams(), Some((id("R"), id("Y"))));
}
