// Match driver
//
// Collects one move per living player each turn, applies them together and
// stops on the mode's terminal test. Players are driven by a per-player
// strategy; the search strategies share one evaluator and territory pass.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::actions::ActionCatalog;
use crate::evaluation::StateEvaluation;
use crate::search::{is_terminal, is_terminal_team, SearchAlgorithm, SearchKind};
use crate::state::GameState;
use crate::territory::TerritoryEvaluator;
use crate::types::{Direction, PlayerId};

/// How a player picks its moves
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    MaxN,
    Paranoid,
    /// Team-aware sum-of-scores search
    Sos,
    Random,
}

/// Which terminal test ends the match
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solo,
    Team,
}

/// How a finished match ended
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Winner(PlayerId),
    WinningTeam(Vec<PlayerId>),
    /// Team mode can stop with more than one team standing
    Survivors(Vec<Vec<PlayerId>>),
    /// Nobody left alive
    Draw,
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub turns: u32,
    pub result: MatchResult,
    pub final_state: GameState,
}

/// Runs matches between strategy-driven players
pub struct Arena {
    mode: GameMode,
    depth: u32,
    strategies: Vec<Strategy>,
    catalog: ActionCatalog,
    territory: TerritoryEvaluator,
    maxn: SearchAlgorithm,
    paranoid: SearchAlgorithm,
    sos: SearchAlgorithm,
}

impl Arena {
    /// # Arguments
    /// * `mode` - Solo or team terminal rules
    /// * `depth` - Search depth for every search-driven player
    /// * `strategies` - One strategy per player, indexed by id
    /// * `evaluation` - Leaf scorer shared by all search strategies
    pub fn new(
        mode: GameMode,
        depth: u32,
        strategies: Vec<Strategy>,
        evaluation: StateEvaluation,
    ) -> Self {
        Arena {
            mode,
            depth,
            strategies,
            catalog: ActionCatalog::new(),
            territory: TerritoryEvaluator::new(),
            maxn: SearchAlgorithm::new(SearchKind::MaxN, evaluation),
            paranoid: SearchAlgorithm::new(SearchKind::Paranoid, evaluation),
            sos: SearchAlgorithm::new(SearchKind::Team, evaluation),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn is_over(&self, state: &GameState) -> bool {
        match self.mode {
            GameMode::Solo => is_terminal(state),
            GameMode::Team => is_terminal_team(state),
        }
    }

    /// One player's pick. Players without a configured strategy move randomly.
    /// A player with no legal move is marked dead and gets `None`.
    pub fn choose_move<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<Option<Direction>, String> {
        let strategy = self.strategies.get(player).copied().unwrap_or(Strategy::Random);
        let algorithm = match strategy {
            Strategy::MaxN => &self.maxn,
            Strategy::Paranoid => &self.paranoid,
            Strategy::Sos => &self.sos,
            Strategy::Random => return Ok(self.catalog.random_legal_move(state, player, rng)),
        };
        algorithm.best_move(state, &self.territory, player, self.depth)
    }

    /// Plays one simultaneous turn and returns the next state
    pub fn play_turn<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> Result<GameState, String> {
        let mut working = state.clone();
        let mut moves: BTreeMap<PlayerId, Direction> = BTreeMap::new();

        for player in 0..working.num_players() {
            if !working.is_alive(player) {
                continue;
            }

            match self.choose_move(&mut working, player, rng)? {
                Some(direction) if self.catalog.is_legal(&working, direction, player) => {
                    moves.insert(player, direction);
                }
                _ => {
                    debug!("Player {} is out", player);
                    working.mark_dead(player);
                }
            }
        }

        Ok(self.catalog.apply_all(&working, &moves))
    }

    /// Plays until the mode's terminal test fires, handing every resulting state to `on_turn`
    pub fn run_match<R, F>(&self, initial: GameState, rng: &mut R, mut on_turn: F) -> Result<MatchOutcome, String>
    where
        R: Rng + ?Sized,
        F: FnMut(u32, &GameState),
    {
        let mut state = initial;
        let mut turns = 0;

        while !self.is_over(&state) {
            state = self.play_turn(&state, rng)?;
            turns += 1;
            on_turn(turns, &state);
        }

        let result = self.result(&state);
        info!("Match over after {} turns: {:?}", turns, result);

        Ok(MatchOutcome {
            turns,
            result,
            final_state: state,
        })
    }

    /// Winner determination. No living player or team is a draw.
    pub fn result(&self, state: &GameState) -> MatchResult {
        match self.mode {
            GameMode::Solo => {
                let alive = state.alive_players();
                match alive.len() {
                    0 => MatchResult::Draw,
                    1 => MatchResult::Winner(alive[0]),
                    _ => MatchResult::Survivors(alive.into_iter().map(|id| vec![id]).collect()),
                }
            }
            GameMode::Team => {
                let mut standing: Vec<Vec<PlayerId>> = state
                    .teams()
                    .teams()
                    .into_iter()
                    .filter(|team| team.iter().any(|&id| state.is_alive(id)))
                    .collect();
                match standing.len() {
                    0 => MatchResult::Draw,
                    1 => MatchResult::WinningTeam(standing.remove(0)),
                    _ => MatchResult::Survivors(standing),
                }
            }
        }
    }
}
