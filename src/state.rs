// Game state: occupancy grid, player positions, teams and the territory cache
//
// A GameState is treated as an immutable per-turn value. Successors are built by
// ActionCatalog as full copies, so recursive search branches never alias.

use std::collections::BTreeSet;

use crate::types::{Coord, Player, PlayerId};

/// Per-cell territory owner, row-major, `None` for no owner
pub type OwnerMap = Vec<Option<PlayerId>>;

/// Square occupancy matrix; an occupied cell is a permanent wall owned by one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<PlayerId>>,
}

impl Grid {
    /// Creates an empty `size` x `size` grid
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as usize) < self.size && (coord.y as usize) < self.size
    }

    /// Row-major index of an in-bounds coordinate
    pub fn index(&self, coord: &Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.size + coord.x as usize)
        } else {
            None
        }
    }

    /// Coordinate of a row-major index
    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new((index % self.size) as i32, (index / self.size) as i32)
    }

    /// Owner of a cell; `None` for empty or out-of-bounds cells
    pub fn get(&self, coord: &Coord) -> Option<PlayerId> {
        self.index(coord).and_then(|i| self.cells[i])
    }

    /// In-bounds and empty
    pub fn is_free(&self, coord: &Coord) -> bool {
        match self.index(coord) {
            Some(i) => self.cells[i].is_none(),
            None => false,
        }
    }

    /// Walls a cell for `player`. Out-of-bounds writes are ignored.
    pub fn occupy(&mut self, coord: &Coord, player: PlayerId) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = Some(player);
        }
    }

    /// Iterates `(coord, owner)` over every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Option<PlayerId>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, owner)| (self.coord_of(i), *owner))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }
}

/// Allegiance sets: for each player, the teammates it shares scores with (self included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRelation {
    members: Vec<BTreeSet<PlayerId>>,
}

impl TeamRelation {
    /// Every player is its own team
    pub fn solo(num_players: usize) -> Self {
        TeamRelation {
            members: (0..num_players).map(|id| BTreeSet::from([id])).collect(),
        }
    }

    /// Builds a relation from disjoint groups; unlisted players form singleton teams
    pub fn from_teams(num_players: usize, teams: &[Vec<PlayerId>]) -> Result<Self, String> {
        let mut members: Vec<Option<BTreeSet<PlayerId>>> = vec![None; num_players];

        for team in teams {
            let group: BTreeSet<PlayerId> = team.iter().copied().collect();
            for &id in &group {
                if id >= num_players {
                    return Err(format!(
                        "Team member {} is out of range for {} players",
                        id, num_players
                    ));
                }
                if members[id].is_some() {
                    return Err(format!("Player {} is listed in more than one team", id));
                }
                members[id] = Some(group.clone());
            }
        }

        Ok(TeamRelation {
            members: members
                .into_iter()
                .enumerate()
                .map(|(id, group)| group.unwrap_or_else(|| BTreeSet::from([id])))
                .collect(),
        })
    }

    /// Number of players covered by the relation
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Teammates of `player`, self included
    pub fn teammates(&self, player: PlayerId) -> Option<&BTreeSet<PlayerId>> {
        self.members.get(player)
    }

    pub fn are_teammates(&self, a: PlayerId, b: PlayerId) -> bool {
        self.teammates(a).map_or(false, |set| set.contains(&b))
    }

    /// Distinct teams, ordered by their lowest member id
    pub fn teams(&self) -> Vec<Vec<PlayerId>> {
        let mut seen: BTreeSet<&BTreeSet<PlayerId>> = BTreeSet::new();
        let mut teams = Vec::new();
        for group in &self.members {
            if seen.insert(group) {
                teams.push(group.iter().copied().collect());
            }
        }
        teams
    }

    /// 0/1 matrix with `m[i][j] == 1` iff `j` is a teammate of `i`
    pub fn social_range_matrix(&self) -> Vec<Vec<i32>> {
        let n = self.members.len();
        (0..n)
            .map(|i| (0..n).map(|j| i32::from(self.members[i].contains(&j))).collect())
            .collect()
    }
}

/// Snapshot of one turn
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    players: Vec<Player>,
    positions: Vec<Coord>,
    current_player: Option<PlayerId>,
    teams: TeamRelation,
    territory: Option<OwnerMap>,
}

impl GameState {
    /// Builds an initial state. `players[i].id` must equal `i`, and every start cell
    /// must be in-bounds and distinct; start cells are walled immediately.
    pub fn new(size: usize, players: Vec<Player>, positions: Vec<Coord>) -> Result<Self, String> {
        if size == 0 {
            return Err("Grid size must be greater than zero".to_string());
        }
        if players.len() != positions.len() {
            return Err(format!(
                "Got {} players but {} positions",
                players.len(),
                positions.len()
            ));
        }

        let mut grid = Grid::new(size);
        for (index, (player, pos)) in players.iter().zip(&positions).enumerate() {
            if player.id != index {
                return Err(format!(
                    "Player '{}' has id {} but sits at index {}",
                    player.name, player.id, index
                ));
            }
            if !grid.in_bounds(pos) {
                return Err(format!(
                    "Start position ({}, {}) of '{}' is outside the {}x{} grid",
                    pos.x, pos.y, player.name, size, size
                ));
            }
            if !grid.is_free(pos) {
                return Err(format!(
                    "Start position ({}, {}) of '{}' is already taken",
                    pos.x, pos.y, player.name
                ));
            }
            grid.occupy(pos, player.id);
        }

        let teams = TeamRelation::solo(players.len());
        Ok(GameState {
            grid,
            players,
            positions,
            current_player: None,
            teams,
            territory: None,
        })
    }

    /// Replaces the team relation; it must cover exactly this state's players
    pub fn with_teams(mut self, teams: TeamRelation) -> Result<Self, String> {
        if teams.len() != self.players.len() {
            return Err(format!(
                "Team relation covers {} players, state has {}",
                teams.len(),
                self.players.len()
            ));
        }
        self.teams = teams;
        Ok(self)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Current cell of every player, indexed by id
    pub fn positions(&self) -> &[Coord] {
        &self.positions
    }

    pub fn position(&self, id: PlayerId) -> Option<Coord> {
        self.positions.get(id).copied()
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.players.get(id).map_or(false, |p| p.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Ids of the players still alive, ascending
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.players.iter().filter(|p| p.alive).map(|p| p.id).collect()
    }

    /// Eliminates a player. Its walls and position stay on the grid.
    pub fn mark_dead(&mut self, id: PlayerId) {
        if let Some(player) = self.players.get_mut(id) {
            player.alive = false;
        }
    }

    pub fn teams(&self) -> &TeamRelation {
        &self.teams
    }

    /// The last player to move into this state
    pub fn current_player(&self) -> Option<PlayerId> {
        self.current_player
    }

    /// Territory owner of a cell, if the cache has been populated for this state
    pub fn territory_owner(&self, coord: &Coord) -> Option<PlayerId> {
        let index = self.grid.index(coord)?;
        self.territory.as_ref().and_then(|map| map[index])
    }

    pub fn territory(&self) -> Option<&OwnerMap> {
        self.territory.as_ref()
    }

    pub(crate) fn set_territory(&mut self, owners: OwnerMap) {
        self.territory = Some(owners);
    }

    /// Copy with `player` moved onto `destination`; both cells end up walled.
    /// The territory cache is not carried over.
    pub(crate) fn successor(&self, player: PlayerId, destination: Coord) -> GameState {
        let mut grid = self.grid.clone();
        let mut positions = self.positions.clone();
        grid.occupy(&positions[player], player);
        grid.occupy(&destination, player);
        positions[player] = destination;

        GameState {
            grid,
            players: self.players.clone(),
            positions,
            current_player: Some(player),
            teams: self.teams.clone(),
            territory: None,
        }
    }

    /// Text rows of the grid: the owner's symbol for walls, `.` for empty cells
    pub fn render(&self) -> Vec<String> {
        let size = self.grid.size();
        (0..size)
            .map(|y| {
                (0..size)
                    .map(|x| match self.grid.get(&Coord::new(x as i32, y as i32)) {
                        Some(id) => self.players[id].symbol,
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }
}
