//! Match Driver Tests
//!
//! Full seeded matches between search and random players, turn resolution
//! and winner determination in both game modes.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tron_search::arena::{Arena, GameMode, MatchResult, Strategy};
use tron_search::evaluation::StateEvaluation;
use tron_search::state::{GameState, TeamRelation};
use tron_search::types::{Coord, Player};

fn state_with(size: usize, starts: &[(i32, i32)]) -> GameState {
    let players = (0..starts.len())
        .map(|i| Player::new(format!("robot{}", i), i, char::from(b'0' + i as u8)))
        .collect();
    let positions = starts.iter().map(|&(x, y)| Coord::new(x, y)).collect();
    GameState::new(size, players, positions).expect("valid test state")
}

fn team_state() -> GameState {
    let state = state_with(6, &[(0, 0), (5, 5), (5, 0), (0, 5)]);
    let teams = TeamRelation::from_teams(4, &[vec![0, 1], vec![2, 3]]).unwrap();
    state.with_teams(teams).unwrap()
}

fn solo_arena() -> Arena {
    Arena::new(
        GameMode::Solo,
        2,
        vec![Strategy::MaxN, Strategy::Paranoid, Strategy::Random],
        StateEvaluation::Territory,
    )
}

#[test]
fn test_seeded_match_runs_to_completion() {
    let arena = solo_arena();
    let initial = state_with(6, &[(1, 1), (4, 4), (1, 4)]);
    let mut rng = StdRng::seed_from_u64(17);

    let mut seen = 0;
    let outcome = arena
        .run_match(initial, &mut rng, |turn, _| {
            seen += 1;
            assert_eq!(turn, seen);
        })
        .expect("match should finish");

    assert!(outcome.turns > 0);
    assert_eq!(seen, outcome.turns);
    assert!(arena.is_over(&outcome.final_state));
    assert!(matches!(
        outcome.result,
        MatchResult::Winner(_) | MatchResult::Draw
    ));
}

#[test]
fn test_same_seed_replays_the_same_match() {
    let arena = solo_arena();
    let initial = state_with(6, &[(1, 1), (4, 4), (1, 4)]);

    let first = arena
        .run_match(initial.clone(), &mut StdRng::seed_from_u64(99), |_, _| {})
        .unwrap();
    let second = arena
        .run_match(initial, &mut StdRng::seed_from_u64(99), |_, _| {})
        .unwrap();

    assert_eq!(first.turns, second.turns);
    assert_eq!(first.result, second.result);
    assert_eq!(first.final_state.render(), second.final_state.render());
}

#[test]
fn test_finished_match_is_not_replayed() {
    let arena = solo_arena();
    let mut initial = state_with(5, &[(0, 0), (4, 4), (2, 2)]);
    initial.mark_dead(1);
    initial.mark_dead(2);

    let outcome = arena
        .run_match(initial, &mut StdRng::seed_from_u64(1), |_, _| {
            panic!("no turn should be played");
        })
        .unwrap();

    assert_eq!(outcome.turns, 0);
    assert_eq!(outcome.result, MatchResult::Winner(0));
}

#[test]
fn test_play_turn_moves_every_living_player() {
    let arena = solo_arena();
    let state = state_with(6, &[(1, 1), (4, 4), (1, 4)]);
    let mut rng = StdRng::seed_from_u64(3);

    let next = arena.play_turn(&state, &mut rng).unwrap();

    for id in 0..3 {
        assert!(next.is_alive(id));
        let before = state.position(id).unwrap();
        let after = next.position(id).unwrap();
        assert!(before.is_orthogonally_adjacent(&after), "player {}", id);
    }
    assert_eq!(next.grid().empty_count(), state.grid().empty_count() - 3);
}

#[test]
fn test_play_turn_eliminates_enclosed_player() {
    let arena = Arena::new(
        GameMode::Solo,
        2,
        vec![Strategy::MaxN, Strategy::Random, Strategy::Random],
        StateEvaluation::Territory,
    );
    let state = state_with(3, &[(0, 0), (1, 0), (0, 1)]);
    let mut rng = StdRng::seed_from_u64(8);

    let next = arena.play_turn(&state, &mut rng).unwrap();

    assert!(!next.is_alive(0));
    assert!(next.is_alive(1));
    assert_eq!(next.position(0), Some(Coord::new(0, 0)));
}

#[test]
fn test_missing_strategy_falls_back_to_random() {
    let arena = Arena::new(GameMode::Solo, 1, vec![], StateEvaluation::Territory);
    let mut state = state_with(4, &[(0, 0), (3, 3)]);
    let mut rng = StdRng::seed_from_u64(21);

    let choice = arena.choose_move(&mut state, 1, &mut rng).unwrap();
    assert!(choice.is_some());
}

#[test]
fn test_solo_result_cases() {
    let arena = solo_arena();
    let mut state = state_with(5, &[(0, 0), (4, 4), (2, 2)]);

    assert_eq!(
        arena.result(&state),
        MatchResult::Survivors(vec![vec![0], vec![1], vec![2]])
    );

    state.mark_dead(0);
    state.mark_dead(2);
    assert_eq!(arena.result(&state), MatchResult::Winner(1));

    state.mark_dead(1);
    assert_eq!(arena.result(&state), MatchResult::Draw);
}

#[test]
fn test_team_result_cases() {
    let arena = Arena::new(
        GameMode::Team,
        1,
        vec![Strategy::Sos; 4],
        StateEvaluation::Territory,
    );
    let mut state = team_state();
    assert!(!arena.is_over(&state));

    state.mark_dead(2);
    state.mark_dead(3);
    assert!(arena.is_over(&state));
    assert_eq!(arena.result(&state), MatchResult::WinningTeam(vec![0, 1]));

    state.mark_dead(0);
    state.mark_dead(1);
    assert_eq!(arena.result(&state), MatchResult::Draw);
}

#[test]
fn test_team_match_ends_with_one_team_or_none() {
    let arena = Arena::new(
        GameMode::Team,
        2,
        vec![Strategy::Sos, Strategy::Sos, Strategy::Random, Strategy::Random],
        StateEvaluation::Territory,
    );
    let mut rng = StdRng::seed_from_u64(5);

    let outcome = arena.run_match(team_state(), &mut rng, |_, _| {}).unwrap();

    assert!(arena.is_over(&outcome.final_state));
    assert!(matches!(
        outcome.result,
        MatchResult::WinningTeam(_) | MatchResult::Draw
    ));
}
