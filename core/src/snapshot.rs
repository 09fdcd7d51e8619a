use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Render-facing copy of one tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub kind: TileKind,
    pub discovered: bool,
    pub flagged: bool,
    pub adjacent_mines: u8,
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        Self {
            kind: tile.kind,
            discovered: tile.discovered,
            flagged: tile.flagged,
            adjacent_mines: tile.adjacent_mines,
        }
    }
}

/// Read-only view of a board, enough to draw it without touching the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub border: Coord,
    pub mines_left: isize,
    pub revealed_all: bool,
    pub triggered_mine: Option<Coord2>,
    pub tiles: Array2<TileView>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        Self {
            size: board.size(),
            border: board.border(),
            mines_left: board.mines_left(),
            revealed_all: board.revealed_all(),
            triggered_mine: board.triggered_mine(),
            tiles: board.tiles().map(|tile| TileView::from(tile)),
        }
    }

    pub fn tile(&self, coords: Coord2) -> Option<&TileView> {
        self.tiles.get(coords.to_nd_index())
    }

    /// Whether the tile is drawn face up, taking the full-board reveal into account.
    pub fn is_shown(&self, coords: Coord2) -> bool {
        self.tile(coords)
            .is_some_and(|tile| self.revealed_all || tile.discovered)
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (self.size.0 as usize, self.size.1 as usize);
        if self.tiles.dim() != expected {
            return Err(ConfigError::InvalidBoardShape.into());
        }
        Ok(())
    }
}

/// Minimap entry: where a room is and which of its sides lead somewhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub position: Coord2,
    pub is_start: bool,
    pub is_end: bool,
    pub is_active: bool,
    pub is_visited: bool,
    pub doors: Doors,
    pub state: RoomState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonSnapshot {
    pub grid_size: Coord2,
    pub rooms: Vec<RoomView>,
}

impl DungeonSnapshot {
    pub fn from_dungeon(dungeon: &Dungeon, active: Option<RoomId>) -> Self {
        let rooms = dungeon
            .ids()
            .zip(dungeon.rooms())
            .map(|(id, room)| RoomView {
                position: room.position(),
                is_start: room.is_start(),
                is_end: room.is_end(),
                is_active: active == Some(id),
                is_visited: room.state().is_visited(),
                doors: room.doors(),
                state: room.state(),
            })
            .collect();

        Self {
            grid_size: dungeon.grid_size(),
            rooms,
        }
    }

    pub fn room_at(&self, position: Coord2) -> Option<&RoomView> {
        self.rooms.iter().find(|room| room.position == position)
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = Rect::from_size(self.grid_size);
        if self.rooms.iter().any(|room| !bounds.contains(room.position)) {
            return Err(GameError::OutOfBounds);
        }
        Ok(())
    }
}
