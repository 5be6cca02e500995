// Multiplayer game-tree search
//
// The three strategies share one depth-first recursion and differ only in how
// a parent folds its children's score vectors:
// - MaxN: the acting player keeps the child best for itself
// - Paranoid: the root player maximises its slot, everyone else minimises
//   their own slot
// - Team: leaves are aggregated per team before MaxN-style backpropagation

use log::{debug, error};

use crate::actions::ActionCatalog;
use crate::evaluation::StateEvaluation;
use crate::profile;
use crate::state::GameState;
use crate::territory::TerritoryEvaluator;
use crate::types::{Direction, PlayerId, ScoreVector};

/// Backpropagation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    MaxN,
    Paranoid,
    /// Sum-of-scores over the team relation
    Team,
}

/// State is terminal when at most one player is alive
pub fn is_terminal(state: &GameState) -> bool {
    state.alive_count() <= 1
}

/// State is terminal as soon as any team has no living member,
/// even if several other teams are still fully populated
pub fn is_terminal_team(state: &GameState) -> bool {
    state
        .teams()
        .teams()
        .iter()
        .any(|team| team.iter().all(|&id| !state.is_alive(id)))
}

/// Next living player after `current`, cycling by ascending id.
/// Returns `current` itself when it is the only one alive, `None` when nobody is.
pub fn next_player(state: &GameState, current: PlayerId) -> Option<PlayerId> {
    let n = state.num_players();
    if n == 0 || state.alive_count() == 0 {
        return None;
    }

    (1..=n)
        .map(|offset| (current + offset) % n)
        .find(|&id| state.is_alive(id))
}

/// Matrix-vector product used to turn raw scores into team sums
pub fn social_range_product(matrix: &[Vec<i32>], vector: &[i32]) -> Result<ScoreVector, String> {
    if matrix.is_empty() {
        return Err("Social range matrix is empty".to_string());
    }

    matrix
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            if row.len() != vector.len() {
                return Err(format!(
                    "Dimension mismatch: matrix row {} has {} columns, score vector has {} entries",
                    row_index,
                    row.len(),
                    vector.len()
                ));
            }
            Ok(row.iter().zip(vector).map(|(m, v)| m * v).sum())
        })
        .collect()
}

/// A search strategy paired with its leaf scorer
#[derive(Debug, Clone)]
pub struct SearchAlgorithm {
    kind: SearchKind,
    evaluation: StateEvaluation,
}

impl SearchAlgorithm {
    pub fn new(kind: SearchKind, evaluation: StateEvaluation) -> Self {
        SearchAlgorithm {
            kind,
            evaluation,
        }
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn evaluation(&self) -> &StateEvaluation {
        &self.evaluation
    }

    /// Terminal test matching this strategy's game mode
    pub fn is_terminal(&self, state: &GameState) -> bool {
        match self.kind {
            SearchKind::Team => is_terminal_team(state),
            SearchKind::MaxN | SearchKind::Paranoid => is_terminal(state),
        }
    }

    /// Backpropagated score vector for `state` with `player` to act.
    ///
    /// `maximizer` is the root player the Paranoid rule optimises for; the
    /// other strategies ignore it.
    pub fn search(
        &self,
        state: &GameState,
        catalog: &ActionCatalog,
        territory: &TerritoryEvaluator,
        depth: u32,
        player: PlayerId,
        maximizer: PlayerId,
    ) -> Result<ScoreVector, String> {
        self.search_node(state.clone(), catalog, territory, depth, player, maximizer)
    }

    /// Picks the move giving `player` the strictly highest score at its own slot.
    /// Ties keep the earliest move in catalog order.
    ///
    /// With no legal move the player is marked dead in `state` and `None` is returned.
    /// Counted once per call under the `search` profiling category.
    pub fn best_move(
        &self,
        state: &mut GameState,
        territory: &TerritoryEvaluator,
        player: PlayerId,
        depth: u32,
    ) -> Result<Option<Direction>, String> {
        profile!("search", {
            let catalog = ActionCatalog::new();
            let moves = catalog.legal_moves(state, player);
            if moves.is_empty() {
                debug!("Player {} has no legal move and is eliminated", player);
                state.mark_dead(player);
                return Ok(None);
            }

            let mut best: Option<(Direction, i32)> = None;
            for direction in moves {
                let child = catalog.apply(state, direction, player);
                let values = self.descend(
                    child,
                    &catalog,
                    territory,
                    depth.saturating_sub(1),
                    player,
                    player,
                )?;
                let value = values[player];

                if best.map_or(true, |(_, best_value)| best_value < value) {
                    best = Some((direction, value));
                }
            }

            if let Some((direction, value)) = best {
                debug!(
                    "{:?} search: player {} picks {} (score {}, depth {})",
                    self.kind,
                    player,
                    direction.as_str(),
                    value,
                    depth
                );
            }
            Ok(best.map(|(direction, _)| direction))
        })
    }

    /// Recurses into `child` with the next living player, or scores it directly
    /// when rotation finds nobody alive
    fn descend(
        &self,
        child: GameState,
        catalog: &ActionCatalog,
        territory: &TerritoryEvaluator,
        depth: u32,
        mover: PlayerId,
        maximizer: PlayerId,
    ) -> Result<ScoreVector, String> {
        match next_player(&child, mover) {
            Some(next) => self.search_node(child, catalog, territory, depth, next, maximizer),
            None => self.evaluate_leaf(child, territory),
        }
    }

    fn search_node(
        &self,
        state: GameState,
        catalog: &ActionCatalog,
        territory: &TerritoryEvaluator,
        depth: u32,
        player: PlayerId,
        maximizer: PlayerId,
    ) -> Result<ScoreVector, String> {
        if depth == 0 || self.is_terminal(&state) {
            return self.evaluate_leaf(state, territory);
        }

        let maximizing = match self.kind {
            SearchKind::Paranoid => player == maximizer,
            SearchKind::MaxN | SearchKind::Team => true,
        };

        let mut best: Option<ScoreVector> = None;
        for direction in catalog.legal_moves(&state, player) {
            let child = catalog.apply(&state, direction, player);
            let values = match next_player(&child, player) {
                Some(next) => self.search_node(child, catalog, territory, depth - 1, next, maximizer)?,
                None => self.evaluate_leaf(child, territory)?,
            };

            best = Some(Self::backpropagate(best, values, player, maximizing));
        }

        Ok(best.unwrap_or_else(|| self.empty_accumulator(state.num_players(), maximizing)))
    }

    /// Folds one child's vector into the accumulator, comparing at the acting player's slot.
    /// Later children win ties when maximising, earlier ones when minimising.
    fn backpropagate(
        best: Option<ScoreVector>,
        values: ScoreVector,
        player: PlayerId,
        maximizing: bool,
    ) -> ScoreVector {
        match best {
            None => values,
            Some(current) if maximizing && current[player] <= values[player] => values,
            Some(current) if !maximizing && current[player] > values[player] => values,
            Some(current) => current,
        }
    }

    /// Vector returned by a node whose acting player has no legal move
    fn empty_accumulator(&self, num_players: usize, maximizing: bool) -> ScoreVector {
        match self.kind {
            SearchKind::MaxN | SearchKind::Team => vec![0; num_players],
            SearchKind::Paranoid if maximizing => vec![i32::MIN; num_players],
            SearchKind::Paranoid => vec![i32::MAX; num_players],
        }
    }

    /// The only place scores originate: territory pass, then the configured scorer
    fn evaluate_leaf(
        &self,
        mut state: GameState,
        territory: &TerritoryEvaluator,
    ) -> Result<ScoreVector, String> {
        territory.assign_territory(&mut state);
        let raw = self.evaluation.evaluate(&state);

        match self.kind {
            SearchKind::Team => {
                let matrix = state.teams().social_range_matrix();
                social_range_product(&matrix, &raw).map_err(|e| {
                    error!("Team score aggregation failed: {}", e);
                    e
                })
            }
            SearchKind::MaxN | SearchKind::Paranoid => Ok(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Player};

    fn line_state(alive: &[bool]) -> GameState {
        let players: Vec<Player> = (0..alive.len())
            .map(|i| Player::new(format!("p{}", i), i, char::from(b'0' + i as u8)))
            .collect();
        let positions = (0..alive.len()).map(|i| Coord::new(i as i32 * 2, 0)).collect();
        let mut state = GameState::new(8, players, positions).unwrap();
        for (id, &is_alive) in alive.iter().enumerate() {
            if !is_alive {
                state.mark_dead(id);
            }
        }
        state
    }

    #[test]
    fn test_next_player_skips_dead_and_wraps() {
        let state = line_state(&[true, false, true, true]);
        assert_eq!(next_player(&state, 0), Some(2));
        assert_eq!(next_player(&state, 3), Some(0));
    }

    #[test]
    fn test_next_player_returns_self_when_alone() {
        let state = line_state(&[false, true, false]);
        assert_eq!(next_player(&state, 1), Some(1));
    }

    #[test]
    fn test_next_player_none_when_everyone_dead() {
        let state = line_state(&[false, false]);
        assert_eq!(next_player(&state, 0), None);
    }

    #[test]
    fn test_social_range_product_rejects_mismatch() {
        let matrix = vec![vec![1, 0], vec![0, 1]];
        assert!(social_range_product(&matrix, &[1, 2, 3]).is_err());
        assert!(social_range_product(&[], &[1]).is_err());
    }

    fn fold(children: &[ScoreVector], player: PlayerId, maximizing: bool) -> Option<ScoreVector> {
        children.iter().cloned().fold(None, |best, values| {
            Some(SearchAlgorithm::backpropagate(best, values, player, maximizing))
        })
    }

    #[test]
    fn test_backpropagate_tie_breaking() {
        let children = vec![vec![4, 1], vec![4, 2], vec![3, 0]];
        assert_eq!(fold(&children, 0, true), Some(vec![4, 2]));

        let children = vec![vec![0, 2], vec![1, 2], vec![5, 3]];
        assert_eq!(fold(&children, 1, false), Some(vec![0, 2]));
    }

    #[test]
    fn test_raising_a_child_never_lowers_the_parent() {
        let children = vec![vec![2, 7], vec![5, 1], vec![3, 3]];
        let before = fold(&children, 0, true).unwrap()[0];

        for raised in 0..children.len() {
            for bump in 1..4 {
                let mut changed = children.clone();
                changed[raised][0] += bump;
                let after = fold(&changed, 0, true).unwrap()[0];
                assert!(after >= before, "raising child {} by {} lowered the parent", raised, bump);
            }
        }
    }

    #[test]
    fn test_best_move_counts_one_search_per_selection() {
        std::env::set_var("TRON_PROFILE", "1");
        let state = line_state(&[true, true, true]);
        let maxn = SearchAlgorithm::new(SearchKind::MaxN, StateEvaluation::Territory);

        let before = crate::simple_profiler::thread_local_count("search");
        let choice = maxn.best_move(&mut state.clone(), &TerritoryEvaluator::new(), 0, 3);
        assert!(choice.unwrap().is_some());
        let after = crate::simple_profiler::thread_local_count("search");

        // Inner nodes of the tree are not counted as selections
        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_empty_accumulator_per_kind() {
        let eval = StateEvaluation::Territory;
        let maxn = SearchAlgorithm::new(SearchKind::MaxN, eval);
        let paranoid = SearchAlgorithm::new(SearchKind::Paranoid, eval);
        assert_eq!(maxn.empty_accumulator(2, true), vec![0, 0]);
        assert_eq!(paranoid.empty_accumulator(2, true), vec![i32::MIN, i32::MIN]);
        assert_eq!(paranoid.empty_accumulator(2, false), vec![i32::MAX, i32::MAX]);
    }
}
