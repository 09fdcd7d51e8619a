#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use dungeon::*;
pub use error::*;
pub use expedition::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod board;
mod dungeon;
mod error;
mod expedition;
mod generator;
mod snapshot;
mod tile;
mod types;

/// Shape of one room's board. `size` includes the border ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord2,
    pub border: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const SMALL: Self = Self::new_unchecked((11, 11), 1, 10);
    pub const MEDIUM: Self = Self::new_unchecked((18, 18), 1, 40);

    pub const fn new_unchecked(size: Coord2, border: Coord, mines: CellCount) -> Self {
        Self {
            size,
            border,
            mines,
        }
    }

    /// Clamps every field into a valid configuration.
    pub fn new((size_x, size_y): Coord2, border: Coord, mines: CellCount) -> Self {
        let border = border.clamp(1, (Coord::MAX - 1) / 2);
        let min_side = border * 2 + 1;
        let size_x = size_x.max(min_side);
        let size_y = size_y.max(min_side);
        let config = Self::new_unchecked((size_x, size_y), border, 0);
        Self {
            mines: mines.min(config.playable_cells()),
            ..config
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Area strictly inside the border ring.
    pub const fn playable(&self) -> Rect {
        let (size_x, size_y) = self.size;
        Rect::new(
            (self.border, self.border),
            (
                size_x.saturating_sub(self.border),
                size_y.saturating_sub(self.border),
            ),
        )
    }

    pub const fn playable_cells(&self) -> CellCount {
        self.playable().area()
    }

    pub fn validate(&self) -> Result<()> {
        let (size_x, size_y) = self.size;
        let twice = u16::from(self.border) * 2;
        if self.border == 0 || twice >= u16::from(size_x) || twice >= u16::from(size_y) {
            return Err(ConfigError::InvalidBorder.into());
        }

        if self.mines > self.playable_cells() {
            return Err(ConfigError::TooManyMines.into());
        }

        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::SMALL
    }
}

/// Shape of the room graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonConfig {
    pub grid_size: Coord2,
    pub max_rooms: CellCount,
}

impl DungeonConfig {
    pub const fn new_unchecked(grid_size: Coord2, max_rooms: CellCount) -> Self {
        Self {
            grid_size,
            max_rooms,
        }
    }

    pub fn new((size_x, size_y): Coord2, max_rooms: CellCount) -> Self {
        let size_x = size_x.max(1);
        let size_y = size_y.max(1);
        let max_rooms = max_rooms.clamp(1, mult(size_x, size_y));
        Self::new_unchecked((size_x, size_y), max_rooms)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size.0, self.grid_size.1)
    }

    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.grid_size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_cells() == 0 {
            return Err(ConfigError::EmptyGrid.into());
        }

        if self.max_rooms == 0 {
            return Err(ConfigError::NoRooms.into());
        }

        if self.max_rooms > self.total_cells() {
            return Err(ConfigError::TooManyRooms.into());
        }

        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self::new_unchecked((5, 5), 8)
    }
}

/// Everything needed to start a session: room graph, board shape and RNG seed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpeditionConfig {
    pub dungeon: DungeonConfig,
    pub board: BoardConfig,
    pub seed: u64,
}

impl ExpeditionConfig {
    pub fn validate(&self) -> Result<()> {
        self.dungeon.validate()?;
        self.board.validate()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    /// `false` only when a mine went off.
    pub const fn is_ok(self) -> bool {
        !matches!(self, Self::HitMine)
    }
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
