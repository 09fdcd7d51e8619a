use serde::{Deserialize, Serialize};

use crate::{Coord2, Direction};

/// What a tile is, fixed at generation time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Door(Direction),
    Mine,
    Empty,
}

impl TileKind {
    /// Border ring material: walls and doors.
    pub const fn is_border(self) -> bool {
        matches!(self, Self::Wall | Self::Door(_))
    }
}

/// Canonical tile state stored by the board engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Coord2,
    pub kind: TileKind,
    pub discovered: bool,
    pub flagged: bool,
    /// Only meaningful for mine and empty tiles.
    pub adjacent_mines: u8,
}

impl Tile {
    pub const fn new(position: Coord2, kind: TileKind) -> Self {
        Self {
            position,
            kind,
            discovered: false,
            flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn is_mine(&self) -> bool {
        matches!(self.kind, TileKind::Mine)
    }

    pub const fn is_border(&self) -> bool {
        self.kind.is_border()
    }

    pub const fn can_flag(&self) -> bool {
        !self.discovered && !self.is_border()
    }

    /// Empty tile whose discovery keeps a cascade going.
    pub const fn is_cascade_source(&self) -> bool {
        matches!(self.kind, TileKind::Empty) && self.adjacent_mines == 0
    }
}
