// Configuration module for reading Tron.toml
// Grid size, search depth, scoring weights and the player roster live here

use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::arena::{Arena, GameMode, Strategy};
use crate::evaluation::{HeuristicWeights, StateEvaluation};
use crate::state::{GameState, TeamRelation};
use crate::types::{Coord, Player};

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub evaluation: EvaluationConfig,
    pub players: Vec<PlayerConfig>,
    pub experiment: ExperimentConfig,
    pub display: DisplayConfig,
}

/// Match-wide settings
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    pub grid_size: usize,
    pub depth: u32,
    pub mode: GameMode,
    /// Seed for random placement and random players; entropy when absent
    pub seed: Option<u64>,
}

/// Which leaf scorer the search strategies use
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationKind {
    Composite,
    Territory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EvaluationConfig {
    pub kind: EvaluationKind,
    pub weights: HeuristicWeights,
}

impl EvaluationConfig {
    pub fn to_evaluation(&self) -> StateEvaluation {
        match self.kind {
            EvaluationKind::Composite => StateEvaluation::Composite(self.weights),
            EvaluationKind::Territory => StateEvaluation::Territory,
        }
    }
}

/// One roster entry; ids are assigned by position in the list
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerConfig {
    pub name: String,
    pub symbol: char,
    pub strategy: Strategy,
    /// Start column; placed randomly when either coordinate is missing
    pub x: Option<i32>,
    pub y: Option<i32>,
    /// Team number, required in team mode
    pub team: Option<usize>,
}

impl PlayerConfig {
    fn start(&self) -> Option<Coord> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Coord::new(x, y)),
            _ => None,
        }
    }
}

/// Batch win-rate experiment parameters
#[derive(Debug, Deserialize, Clone)]
pub struct ExperimentConfig {
    pub matches_per_depth: usize,
    pub min_depth: u32,
    pub max_depth: u32,
    pub base_seed: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub print_grid: bool,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Tron.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Tron.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Tron.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Tron.toml
    pub fn default_hardcoded() -> Self {
        let roster = [
            ("robot0", '0', Strategy::MaxN, 2, 2),
            ("robot1", '1', Strategy::Paranoid, 7, 7),
            ("robot2", '2', Strategy::Random, 2, 7),
            ("robot3", '3', Strategy::Random, 7, 2),
        ];

        Config {
            game: GameConfig {
                grid_size: 10,
                depth: 3,
                mode: GameMode::Solo,
                seed: Some(42),
            },
            evaluation: EvaluationConfig {
                kind: EvaluationKind::Territory,
                weights: HeuristicWeights {
                    center: 1,
                    border: 2,
                    wall: 2,
                    opponent: 1,
                    empty_cells: 3,
                },
            },
            players: roster
                .iter()
                .map(|&(name, symbol, strategy, x, y)| PlayerConfig {
                    name: name.to_string(),
                    symbol,
                    strategy,
                    x: Some(x),
                    y: Some(y),
                    team: None,
                })
                .collect(),
            experiment: ExperimentConfig {
                matches_per_depth: 20,
                min_depth: 1,
                max_depth: 4,
                base_seed: 7,
            },
            display: DisplayConfig { print_grid: true },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                log::warn!("Could not load Tron.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }

    /// Rejects configurations no match can be built from
    pub fn validate(&self) -> Result<(), String> {
        let size = self.game.grid_size;
        if size == 0 {
            return Err("game.grid_size must be greater than zero".to_string());
        }
        if self.game.depth == 0 {
            return Err("game.depth must be greater than zero".to_string());
        }
        if self.players.is_empty() {
            return Err("at least one [[players]] entry is required".to_string());
        }
        if self.players.len() > size * size {
            return Err(format!(
                "{} players do not fit on a {}x{} grid",
                self.players.len(),
                size,
                size
            ));
        }
        if self.experiment.min_depth == 0 || self.experiment.min_depth > self.experiment.max_depth {
            return Err("experiment depth range must satisfy 0 < min_depth <= max_depth".to_string());
        }

        for (index, player) in self.players.iter().enumerate() {
            if player.symbol == '.' || player.symbol.is_whitespace() {
                return Err(format!("'{}' cannot use {:?} as its symbol", player.name, player.symbol));
            }
            if self.players[..index].iter().any(|other| other.symbol == player.symbol) {
                return Err(format!("symbol '{}' is used by more than one player", player.symbol));
            }
            if let (Some(x), Some(y)) = (player.x, player.y) {
                if x < 0 || y < 0 || x as usize >= size || y as usize >= size {
                    return Err(format!(
                        "start ({}, {}) of '{}' is outside the {}x{} grid",
                        x, y, player.name, size, size
                    ));
                }
            }
            if player.strategy == Strategy::Sos && self.game.mode != GameMode::Team {
                return Err(format!(
                    "'{}' uses the sos strategy, which needs team mode",
                    player.name
                ));
            }
            if self.game.mode == GameMode::Team && player.team.is_none() {
                return Err(format!("'{}' needs a team in team mode", player.name));
            }
        }

        Ok(())
    }

    /// Teams keyed by team number, members in roster order
    pub fn team_groups(&self) -> Vec<Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (id, player) in self.players.iter().enumerate() {
            if let Some(team) = player.team {
                groups.entry(team).or_default().push(id);
            }
        }
        groups.into_values().collect()
    }

    pub fn build_arena(&self) -> Arena {
        Arena::new(
            self.game.mode,
            self.game.depth,
            self.players.iter().map(|p| p.strategy).collect(),
            self.evaluation.to_evaluation(),
        )
    }

    /// Builds the starting state, placing players without coordinates on random free cells
    pub fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GameState, String> {
        self.validate()?;
        let size = self.game.grid_size;

        let mut taken: Vec<Coord> = self.players.iter().filter_map(|p| p.start()).collect();
        let mut positions = Vec::with_capacity(self.players.len());
        for player in &self.players {
            let pos = match player.start() {
                Some(pos) => pos,
                None => {
                    let mut candidate;
                    loop {
                        candidate = Coord::new(
                            rng.random_range(0..size) as i32,
                            rng.random_range(0..size) as i32,
                        );
                        if !taken.contains(&candidate) {
                            break;
                        }
                    }
                    taken.push(candidate);
                    candidate
                }
            };
            positions.push(pos);
        }

        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(id, p)| Player::new(p.name.clone(), id, p.symbol))
            .collect();

        let state = GameState::new(size, players, positions)?;
        match self.game.mode {
            GameMode::Solo => Ok(state),
            GameMode::Team => {
                let teams = TeamRelation::from_teams(self.players.len(), &self.team_groups())?;
                state.with_teams(teams)
            }
        }
    }

    /// Same roster with every start position cleared, for randomised experiments
    pub fn with_random_starts(&self) -> Self {
        let mut config = self.clone();
        for player in &mut config.players {
            player.x = None;
            player.y = None;
        }
        config
    }
}
