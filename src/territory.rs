// Voronoi territory partition
//
// One breadth-first sweep per player over empty cells, then every empty cell
// goes to the uniquely nearest player. Ties leave the cell without an owner.

use std::collections::VecDeque;

use crate::profile;
use crate::state::{GameState, OwnerMap};
use crate::types::{Direction, PlayerId};

/// Distance value for cells a player cannot reach
pub const UNREACHABLE: u32 = u32::MAX;

/// Row-major distance field from one player's current cell
pub type DistanceField = Vec<u32>;

/// Computes shortest-path distances and the territory partition of a state
#[derive(Debug, Default, Clone, Copy)]
pub struct TerritoryEvaluator;

impl TerritoryEvaluator {
    pub fn new() -> Self {
        TerritoryEvaluator
    }

    /// Breadth-first distances from `player`'s cell, expanding through empty cells only.
    /// The player's own cell is 0; unreachable cells are `UNREACHABLE`.
    pub fn shortest_distances(&self, state: &GameState, player: PlayerId) -> DistanceField {
        profile!("bfs", {
            let grid = state.grid();
            let mut distances = vec![UNREACHABLE; grid.size() * grid.size()];

            let start = match state.position(player).and_then(|p| grid.index(&p)) {
                Some(index) => index,
                None => return distances,
            };
            distances[start] = 0;

            let mut queue = VecDeque::new();
            queue.push_back(start);

            while let Some(index) = queue.pop_front() {
                let here = grid.coord_of(index);
                let next_distance = distances[index] + 1;

                for dir in Direction::all() {
                    let next = dir.apply(&here);
                    if !grid.is_free(&next) {
                        continue;
                    }
                    if let Some(next_index) = grid.index(&next) {
                        if distances[next_index] == UNREACHABLE {
                            distances[next_index] = next_distance;
                            queue.push_back(next_index);
                        }
                    }
                }
            }

            distances
        })
    }

    /// Owner of every cell without touching the state's cache.
    ///
    /// Dead players still sit on a cell and act as sources. Each player's own
    /// cell always belongs to that player.
    pub fn compute_owners(&self, state: &GameState) -> OwnerMap {
        let grid = state.grid();
        let fields: Vec<DistanceField> = (0..state.num_players())
            .map(|player| self.shortest_distances(state, player))
            .collect();

        let mut owners: OwnerMap = vec![None; grid.size() * grid.size()];

        for (index, owner) in owners.iter_mut().enumerate() {
            if !grid.is_free(&grid.coord_of(index)) {
                continue;
            }

            let mut best = UNREACHABLE;
            let mut nearest: Vec<PlayerId> = Vec::new();
            for (player, field) in fields.iter().enumerate() {
                let distance = field[index];
                if nearest.is_empty() || distance < best {
                    best = distance;
                    nearest.clear();
                    nearest.push(player);
                } else if distance == best {
                    nearest.push(player);
                }
            }

            if nearest.len() == 1 {
                *owner = Some(nearest[0]);
            }
        }

        for (player, pos) in state.positions().iter().enumerate() {
            if let Some(index) = grid.index(pos) {
                owners[index] = Some(player);
            }
        }

        owners
    }

    /// Populates the state's territory cache. Must be re-run for every new state.
    pub fn assign_territory(&self, state: &mut GameState) {
        let owners = self.compute_owners(state);
        state.set_territory(owners);
    }

    /// Number of cells owned by each player, indexed by id
    pub fn region_sizes(owners: &OwnerMap, num_players: usize) -> Vec<i32> {
        let mut sizes = vec![0; num_players];
        for owner in owners.iter().flatten() {
            if let Some(size) = sizes.get_mut(*owner) {
                *size += 1;
            }
        }
        sizes
    }
}
