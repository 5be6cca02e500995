//! Composite Heuristic Tests
//!
//! Each positional signal is checked on small boards where the truncated
//! Euclidean distances can be worked out by hand.

use tron_search::evaluation::{
    border_distance_score, center_distance_score, empty_surrounding_score,
    opponent_distance_score, wall_distance_score, HeuristicWeights, StateEvaluation,
};
use tron_search::state::GameState;
use tron_search::types::{Coord, Player};

fn state_with(size: usize, starts: &[(i32, i32)]) -> GameState {
    let players = (0..starts.len())
        .map(|i| Player::new(format!("robot{}", i), i, char::from(b'0' + i as u8)))
        .collect();
    let positions = starts.iter().map(|&(x, y)| Coord::new(x, y)).collect();
    GameState::new(size, players, positions).expect("valid test state")
}

fn unit_weights() -> HeuristicWeights {
    HeuristicWeights {
        center: 1,
        border: 1,
        wall: 1,
        opponent: 1,
        empty_cells: 1,
    }
}

#[test]
fn test_signals_for_centre_player() {
    // 5x5: centre player vs corner player, max grid distance is 5
    let state = state_with(5, &[(2, 2), (0, 0)]);

    assert_eq!(opponent_distance_score(&state, 0), 2);
    assert_eq!(empty_surrounding_score(&state, 0), 5);
    assert_eq!(wall_distance_score(&state, 0), 2);
    assert_eq!(border_distance_score(&state, 0), 2);
    assert_eq!(center_distance_score(&state, 0), 0);
}

#[test]
fn test_signals_for_corner_player() {
    let state = state_with(5, &[(2, 2), (0, 0)]);

    assert_eq!(opponent_distance_score(&state, 1), 2);
    // Three empty neighbours: 3 * 5 / 8
    assert_eq!(empty_surrounding_score(&state, 1), 1);
    assert_eq!(wall_distance_score(&state, 1), 2);
    assert_eq!(border_distance_score(&state, 1), 0);
    // Distance 2 to the centre, scaled by 5 / 2
    assert_eq!(center_distance_score(&state, 1), 5);
}

#[test]
fn test_composite_weighted_sum() {
    let state = state_with(5, &[(2, 2), (0, 0)]);

    let evaluation = StateEvaluation::Composite(unit_weights());
    assert_eq!(evaluation.evaluate(&state), vec![11, 10]);

    let centre_only = StateEvaluation::Composite(HeuristicWeights {
        center: 2,
        border: 0,
        wall: 0,
        opponent: 0,
        empty_cells: 0,
    });
    assert_eq!(centre_only.evaluate(&state), vec![0, 10]);
}

#[test]
fn test_composite_dead_player_is_minus_one() {
    let mut state = state_with(5, &[(2, 2), (0, 0)]);
    state.mark_dead(1);

    let evaluation = StateEvaluation::Composite(unit_weights());
    assert_eq!(evaluation.evaluate(&state), vec![11, -1]);
}

#[test]
fn test_adjacent_opponent_and_wall_score_zero() {
    let state = state_with(5, &[(2, 2), (2, 3)]);

    assert_eq!(opponent_distance_score(&state, 0), 0);
    assert_eq!(wall_distance_score(&state, 0), 0);
}

#[test]
fn test_diagonal_opponent_counts_as_adjacent() {
    // sqrt(2) truncates to 1
    let state = state_with(5, &[(2, 2), (3, 3)]);
    assert_eq!(opponent_distance_score(&state, 0), 0);
    // A diagonal wall is not orthogonally adjacent: distance 1 scaled by 5 / 5
    assert_eq!(wall_distance_score(&state, 0), 1);
}

#[test]
fn test_even_grid_centre_averages_four_cells() {
    // 4x4: centre cells (2,2), (1,2), (2,1), (1,1); distances 2, 2, 2, 1
    let state = state_with(4, &[(0, 0), (3, 3)]);
    assert_eq!(center_distance_score(&state, 0), 2);
}

#[test]
fn test_lone_player_uses_grid_side_for_missing_targets() {
    let state = state_with(6, &[(2, 2)]);
    assert_eq!(opponent_distance_score(&state, 0), 6);
    assert_eq!(wall_distance_score(&state, 0), 6);
}

#[test]
fn test_own_trail_is_not_a_wall() {
    let catalog = tron_search::actions::ActionCatalog::new();
    let state = state_with(7, &[(3, 3), (0, 0)]);
    let state = catalog.apply(&state, tron_search::types::Direction::Up, 0);

    // Own trail right behind does not count; nearest foreign wall is (0,0):
    // distance from (3,2) is sqrt(13) = 3, max distance on 7x7 is 8, 3 * 7 / 8 = 2
    assert_eq!(wall_distance_score(&state, 0), 2);
}
