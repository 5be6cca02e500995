// Core game types shared by the state, search and evaluation modules

use serde::{Deserialize, Serialize};

/// Dense 0-based player identifier; doubles as the index into every score vector
pub type PlayerId = usize;

/// One slot per player, indexed by `PlayerId`
pub type ScoreVector = Vec<i32>;

/// 2D coordinate on the grid (`x` is the column, `y` the row, rows grow downward)
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// True when `other` shares an edge with this cell
    pub fn is_orthogonally_adjacent(&self, other: &Coord) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }

    /// Euclidean distance truncated toward zero
    pub fn euclidean_distance(&self, other: &Coord) -> i32 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt() as i32
    }
}

/// Represents the four possible movement directions for a player
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions in catalog order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to its string token
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses a direction token, `None` for anything unrecognised
    pub fn parse(token: &str) -> Option<Direction> {
        match token {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }
}

/// Participant identity plus liveness
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub id: PlayerId,
    pub symbol: char,
    pub alive: bool,
}

impl Player {
    /// Creates a living player
    pub fn new(name: impl Into<String>, id: PlayerId, symbol: char) -> Self {
        Player {
            name: name.into(),
            id,
            symbol,
            alive: true,
        }
    }
}
