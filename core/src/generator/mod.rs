use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: BoardConfig, doors: Doors) -> Result<Board>;
}

/// Places mines at exactly the given coordinates, used for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinefieldGenerator<'a> {
    mines: &'a [Coord2],
}

impl<'a> FixedMinefieldGenerator<'a> {
    pub fn new(mines: &'a [Coord2]) -> Self {
        Self { mines }
    }
}

impl MinefieldGenerator for FixedMinefieldGenerator<'_> {
    fn generate(self, config: BoardConfig, doors: Doors) -> Result<Board> {
        Board::populate(config, doors, self.mines.iter().copied())
    }
}
