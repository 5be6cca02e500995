// Leaf scoring
//
// Two interchangeable scorers behind one entry point. Both return one score per
// player, indexed by id, and force dead players to DEAD_PLAYER_SCORE.

use log::debug;
use serde::Deserialize;

use crate::profile;
use crate::state::GameState;
use crate::territory::TerritoryEvaluator;
use crate::types::{Coord, PlayerId, ScoreVector};

/// Score reported for an eliminated player
pub const DEAD_PLAYER_SCORE: i32 = -1;

/// Weights of the composite positional heuristic
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicWeights {
    pub center: i32,
    pub border: i32,
    pub wall: i32,
    pub opponent: i32,
    pub empty_cells: i32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        HeuristicWeights {
            center: 1,
            border: 1,
            wall: 1,
            opponent: 1,
            empty_cells: 1,
        }
    }
}

/// Leaf scorer selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvaluation {
    /// Weighted sum of positional signals
    Composite(HeuristicWeights),
    /// Size of each player's Voronoi region
    Territory,
}

impl StateEvaluation {
    /// Scores every player of `state`
    pub fn evaluate(&self, state: &GameState) -> ScoreVector {
        profile!("eval", {
            match self {
                StateEvaluation::Composite(weights) => composite_scores(state, weights),
                StateEvaluation::Territory => territory_scores(state),
            }
        })
    }
}

fn composite_scores(state: &GameState, weights: &HeuristicWeights) -> ScoreVector {
    state
        .players()
        .iter()
        .map(|player| {
            if !player.alive {
                return DEAD_PLAYER_SCORE;
            }
            weights.center * center_distance_score(state, player.id)
                + weights.border * border_distance_score(state, player.id)
                + weights.wall * wall_distance_score(state, player.id)
                + weights.opponent * opponent_distance_score(state, player.id)
                + weights.empty_cells * empty_surrounding_score(state, player.id)
        })
        .collect()
}

fn territory_scores(state: &GameState) -> ScoreVector {
    let sizes = match state.territory() {
        Some(owners) => TerritoryEvaluator::region_sizes(owners, state.num_players()),
        None => {
            debug!("No territory cache on this state, computing partition locally");
            let owners = TerritoryEvaluator::new().compute_owners(state);
            TerritoryEvaluator::region_sizes(&owners, state.num_players())
        }
    };

    state
        .players()
        .iter()
        .map(|player| if player.alive { sizes[player.id] } else { DEAD_PLAYER_SCORE })
        .collect()
}

/// Largest truncated Euclidean distance on the grid, never zero
fn max_grid_distance(size: i32) -> i32 {
    Coord::new(0, 0)
        .euclidean_distance(&Coord::new(size - 1, size - 1))
        .max(1)
}

fn position_of(state: &GameState, player: PlayerId) -> Coord {
    state.positions()[player]
}

/// Distance to the nearest other player scaled to the grid side; 0 when one is adjacent
pub fn opponent_distance_score(state: &GameState, player: PlayerId) -> i32 {
    let size = state.size() as i32;
    let pos = position_of(state, player);
    let max_distance = max_grid_distance(size) as f64;

    let mut best: Option<f64> = None;
    for (other, other_pos) in state.positions().iter().enumerate() {
        if other == player {
            continue;
        }
        let distance = pos.euclidean_distance(other_pos);
        if distance < 2 {
            return 0;
        }
        let scaled = distance as f64 * size as f64 / max_distance;
        best = Some(best.map_or(scaled, |b: f64| b.min(scaled)));
    }

    match best {
        Some(score) => score as i32,
        None => size,
    }
}

/// Empty cells among the 8 Moore neighbours, scaled to the grid side
pub fn empty_surrounding_score(state: &GameState, player: PlayerId) -> i32 {
    let size = state.size() as i32;
    let pos = position_of(state, player);

    let mut empty = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if state.grid().is_free(&Coord::new(pos.x + dx, pos.y + dy)) {
                empty += 1;
            }
        }
    }

    empty * size / 8
}

/// Distance to the nearest wall owned by someone else, scaled to the grid side;
/// 0 when such a wall is orthogonally adjacent
pub fn wall_distance_score(state: &GameState, player: PlayerId) -> i32 {
    let size = state.size() as i32;
    let pos = position_of(state, player);

    let mut nearest: Option<i32> = None;
    for (cell, owner) in state.grid().cells() {
        match owner {
            Some(owner) if owner != player => {
                if cell.is_orthogonally_adjacent(&pos) {
                    return 0;
                }
                let distance = pos.euclidean_distance(&cell);
                nearest = Some(nearest.map_or(distance, |n| n.min(distance)));
            }
            _ => {}
        }
    }

    match nearest {
        Some(distance) => distance * size / max_grid_distance(size),
        None => size,
    }
}

/// Cells between the player and the closest grid edge
pub fn border_distance_score(state: &GameState, player: PlayerId) -> i32 {
    let size = state.size() as i32;
    let pos = position_of(state, player);
    pos.x.min(size - pos.x - 1).min(pos.y.min(size - pos.y - 1))
}

/// Distance to the grid centre scaled to the grid side. Even grids average the
/// distance to the four centre cells.
pub fn center_distance_score(state: &GameState, player: PlayerId) -> i32 {
    let size = state.size() as i32;
    let pos = position_of(state, player);
    let centre = Coord::new(size / 2, size / 2);
    let max_distance = Coord::new(0, 0).euclidean_distance(&centre);
    if max_distance == 0 {
        return 0;
    }

    let distance = if size % 2 == 0 {
        let cells = [
            centre,
            Coord::new(centre.x - 1, centre.y),
            Coord::new(centre.x, centre.y - 1),
            Coord::new(centre.x - 1, centre.y - 1),
        ];
        cells.iter().map(|c| pos.euclidean_distance(c)).sum::<i32>() / 4
    } else {
        pos.euclidean_distance(&centre)
    };

    distance * size / max_distance
}
