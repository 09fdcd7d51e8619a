use alloc::collections::VecDeque;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Whether a discovery may spread to neighbouring zero tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Cascade {
    Enabled,
    Disabled,
}

/// Tile grid of one room: border ring of walls and doors around a playable minefield.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    doors: Doors,
    tiles: Array2<Tile>,
    mine_count: CellCount,
    flagged_count: Saturating<CellCount>,
    revealed_all: bool,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Allocates the grid with walls, the requested doors, and an empty playable area.
    pub(crate) fn new(config: BoardConfig, doors: Doors) -> Result<Self> {
        config.validate()?;

        let playable = config.playable();
        let tiles = Array2::from_shape_fn(config.size.to_nd_index(), |(x, y)| {
            let position = (x as Coord, y as Coord);
            let kind = if playable.contains(position) {
                TileKind::Empty
            } else {
                TileKind::Wall
            };
            Tile::new(position, kind)
        });

        let mut board = Self {
            config,
            doors,
            tiles,
            mine_count: 0,
            flagged_count: Saturating(0),
            revealed_all: false,
            triggered_mine: None,
        };
        for direction in doors.directions() {
            let coords = board.door_position(direction);
            board.tiles[coords.to_nd_index()].kind = TileKind::Door(direction);
        }
        Ok(board)
    }

    /// Builds a board and marks `mines` as mine tiles, then counts adjacency.
    ///
    /// Every mine must lie in the playable rectangle and the number of distinct mines must
    /// equal `config.mines`.
    pub fn populate(
        config: BoardConfig,
        doors: Doors,
        mines: impl IntoIterator<Item = Coord2>,
    ) -> Result<Self> {
        let mut board = Self::new(config, doors)?;
        let playable = config.playable();

        for coords in mines {
            if !playable.contains(coords) {
                return Err(ConfigError::MineOutOfBounds.into());
            }
            let tile = &mut board.tiles[coords.to_nd_index()];
            if !tile.is_mine() {
                tile.kind = TileKind::Mine;
                board.mine_count += 1;
            }
        }

        if board.mine_count > config.mines {
            return Err(ConfigError::TooManyMines.into());
        }
        if board.mine_count < config.mines {
            log::warn!(
                "Board mine count mismatch, actual: {}, requested: {}",
                board.mine_count,
                config.mines
            );
            return Err(ConfigError::MineBudgetMismatch.into());
        }

        board.count_adjacency();
        log::debug!(
            "Populated {}x{} board with {} mines, doors {:?}",
            config.size.0,
            config.size.1,
            board.mine_count,
            doors
        );
        Ok(board)
    }

    /// Recomputes the Moore-neighbourhood mine count of every non-border tile.
    ///
    /// Mines are fixed after population, so calling this again yields the same counts.
    pub fn count_adjacency(&mut self) {
        let playable = self.playable();
        for coords in playable.iter() {
            let count = NeighborIter::moore(coords, playable)
                .filter(|&pos| self.tiles[pos.to_nd_index()].is_mine())
                .count();
            self.tiles[coords.to_nd_index()].adjacent_mines = count as u8;
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn border(&self) -> Coord {
        self.config.border
    }

    pub fn doors(&self) -> Doors {
        self.doors
    }

    pub fn playable(&self) -> Rect {
        self.config.playable()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.flagged_count.0 as isize)
    }

    pub fn revealed_all(&self) -> bool {
        self.revealed_all
    }

    /// First mine that went off, if any.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if Rect::from_size(self.size()).contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn tile(&self, coords: Coord2) -> Result<&Tile> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.tiles[coords.to_nd_index()])
    }

    pub fn tiles(&self) -> &Array2<Tile> {
        &self.tiles
    }

    /// Border tile where the door for `direction` sits: the midpoint of that edge.
    pub fn door_position(&self, direction: Direction) -> Coord2 {
        let (size_x, size_y) = self.size();
        let (mid_x, mid_y) = (size_x / 2, size_y / 2);
        match direction {
            Direction::North => (mid_x, 0),
            Direction::South => (mid_x, size_y - 1),
            Direction::West => (0, mid_y),
            Direction::East => (size_x - 1, mid_y),
        }
    }

    /// Door direction at `coords`, if that tile is a door.
    pub fn door_at(&self, coords: Coord2) -> Option<Direction> {
        match self.tile(coords).ok()?.kind {
            TileKind::Door(direction) => Some(direction),
            _ => None,
        }
    }

    /// Discovers the tile at `coords`, cascading through zero tiles.
    ///
    /// A flagged tile never changes and reports [`RevealOutcome::NoChange`]. An unflagged mine
    /// always reports [`RevealOutcome::HitMine`], even when it was discovered before.
    pub fn discover(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.discover_tile(coords, Cascade::Enabled))
    }

    /// Toggles the flag on an undiscovered playable tile.
    pub fn flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let tile = &mut self.tiles[coords.to_nd_index()];

        if tile.discovered {
            return Err(InvalidOperation::AlreadyDiscovered.into());
        }
        if !tile.can_flag() {
            return Err(InvalidOperation::NotFlaggable.into());
        }

        tile.flagged = !tile.flagged;
        Ok(if tile.flagged {
            self.flagged_count += 1;
            MarkOutcome::Flagged
        } else {
            self.flagged_count -= 1;
            MarkOutcome::Unflagged
        })
    }

    /// Discovers every tile without cascading and reports whether no mine went off,
    /// which holds exactly when every mine was flagged beforehand.
    pub fn reveal_all(&mut self) -> bool {
        let mut outcome = RevealOutcome::NoChange;
        for coords in Rect::from_size(self.size()).iter() {
            outcome = outcome | self.discover_tile(coords, Cascade::Disabled);
        }
        self.revealed_all = true;
        outcome.is_ok()
    }

    /// Whether every mine tile is discovered, flagged or not.
    pub fn is_clear(&self) -> bool {
        self.tiles
            .iter()
            .filter(|tile| tile.is_mine())
            .all(|tile| tile.discovered)
    }

    /// Flag count reached the mine budget, time for the win-confirmation reveal.
    pub fn is_flag_complete(&self) -> bool {
        self.flagged_count.0 == self.mine_count
    }

    fn discover_tile(&mut self, coords: Coord2, cascade: Cascade) -> RevealOutcome {
        let tile = &mut self.tiles[coords.to_nd_index()];
        if tile.flagged {
            return RevealOutcome::NoChange;
        }

        let was_discovered = tile.discovered;
        tile.discovered = true;
        let tile = *tile;

        if tile.is_mine() {
            self.triggered_mine.get_or_insert(coords);
            return RevealOutcome::HitMine;
        }
        if was_discovered {
            return RevealOutcome::NoChange;
        }

        if cascade == Cascade::Enabled && tile.is_cascade_source() {
            self.cascade_from(coords);
        }
        RevealOutcome::Revealed
    }

    fn cascade_from(&mut self, origin: Coord2) {
        let playable = self.playable();
        let mut frontier = VecDeque::from([origin]);
        let mut opened = 0usize;

        while let Some(coords) = frontier.pop_front() {
            for pos in NeighborIter::orthogonal(coords, playable) {
                let tile = &mut self.tiles[pos.to_nd_index()];
                if tile.discovered || tile.flagged || tile.is_mine() {
                    continue;
                }

                tile.discovered = true;
                opened += 1;
                if tile.is_cascade_source() {
                    frontier.push_back(pos);
                }
            }
        }

        log::trace!("Cascade from {origin:?} opened {opened} tiles");
    }
}
