// Move catalog: legal move generation and successor construction
//
// Every function here is a pure function of the input state except the two that
// are defined to eliminate a player (`random_legal_move` with no legal move).

use log::warn;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeMap;

use crate::profile;
use crate::state::GameState;
use crate::types::{Direction, PlayerId};

/// Enumerates and applies single-step moves
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionCatalog;

impl ActionCatalog {
    pub fn new() -> Self {
        ActionCatalog
    }

    /// Legal moves for `player` in catalog order (up, down, left, right).
    /// A move is legal iff the destination is in-bounds and empty.
    pub fn legal_moves(&self, state: &GameState, player: PlayerId) -> Vec<Direction> {
        let pos = match state.position(player) {
            Some(pos) => pos,
            None => return vec![],
        };

        Direction::all()
            .iter()
            .filter(|dir| state.grid().is_free(&dir.apply(&pos)))
            .copied()
            .collect()
    }

    pub fn is_legal(&self, state: &GameState, direction: Direction, player: PlayerId) -> bool {
        state
            .position(player)
            .map_or(false, |pos| state.grid().is_free(&direction.apply(&pos)))
    }

    /// Token form of `is_legal`; unknown tokens are never applicable
    pub fn is_applicable(&self, state: &GameState, token: &str, player: PlayerId) -> bool {
        match Direction::parse(token) {
            Some(direction) => self.is_legal(state, direction, player),
            None => false,
        }
    }

    /// Successor state after `player` moves one cell in `direction`.
    ///
    /// The origin stays walled, the destination becomes walled and the new
    /// position. An illegal move is reported and leaves the state unchanged.
    pub fn apply(&self, state: &GameState, direction: Direction, player: PlayerId) -> GameState {
        profile!("apply_move", {
            if !self.is_legal(state, direction, player) {
                warn!(
                    "Move {} is not applicable for player {}, state left unchanged",
                    direction.as_str(),
                    player
                );
                return state.clone();
            }

            // is_legal guarantees a position exists
            let origin = state.positions()[player];
            state.successor(player, direction.apply(&origin))
        })
    }

    /// Token form of `apply`. Unrecognised tokens return the input state unchanged.
    pub fn apply_token(&self, state: &GameState, token: &str, player: PlayerId) -> GameState {
        match Direction::parse(token) {
            Some(direction) => self.apply(state, direction, player),
            None => {
                warn!("Unrecognised move '{}' for player {}", token, player);
                state.clone()
            }
        }
    }

    /// Applies every player's chosen move in id order, skipping any that is no
    /// longer legal against the in-progress state. Liveness carries over.
    pub fn apply_all(&self, state: &GameState, moves: &BTreeMap<PlayerId, Direction>) -> GameState {
        let mut next = state.clone();
        for (&player, &direction) in moves {
            if self.is_legal(&next, direction, player) {
                next = self.apply(&next, direction, player);
            }
        }
        next
    }

    /// Uniformly samples a legal move. With none available the player is
    /// marked dead and `None` is returned.
    pub fn random_legal_move<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        player: PlayerId,
        rng: &mut R,
    ) -> Option<Direction> {
        let moves = self.legal_moves(state, player);
        match moves.choose(rng) {
            Some(&direction) => Some(direction),
            None => {
                state.mark_dead(player);
                None
            }
        }
    }
}
