use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts, room counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(column, row)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Half-open rectangle `[min, max)` on both axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Coord2,
    pub max: Coord2,
}

impl Rect {
    pub const fn new(min: Coord2, max: Coord2) -> Self {
        Self { min, max }
    }

    /// Rectangle covering `[0, size)`.
    pub const fn from_size(size: Coord2) -> Self {
        Self::new((0, 0), size)
    }

    pub const fn contains(&self, (x, y): Coord2) -> bool {
        x >= self.min.0 && x < self.max.0 && y >= self.min.1 && y < self.max.1
    }

    pub const fn width(&self) -> Coord {
        self.max.0.saturating_sub(self.min.0)
    }

    pub const fn height(&self) -> Coord {
        self.max.1.saturating_sub(self.min.1)
    }

    pub const fn area(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    /// Iterates every coordinate column by column.
    pub fn iter(&self) -> impl Iterator<Item = Coord2> + use<> {
        let Rect { min, max } = *self;
        (min.0..max.0).flat_map(move |x| (min.1..max.1).map(move |y| (x, y)))
    }
}

const MOORE: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (-1, 0), (0, 1), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it stays inside `bounds`.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Rect) -> Option<Coord2> {
    let next = (
        coords.0.checked_add_signed(delta.0)?,
        coords.1.checked_add_signed(delta.1)?,
    );
    bounds.contains(next).then_some(next)
}

/// Iterator over the in-bounds cells of a fixed displacement table around a center.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Rect,
    displacements: &'static [(i8, i8)],
    index: u8,
}

impl NeighborIter {
    /// Moore neighbourhood (8 cells) clipped to `bounds`.
    pub fn moore(center: Coord2, bounds: Rect) -> Self {
        Self::with_table(center, bounds, &MOORE)
    }

    /// Orthogonal neighbourhood (4 cells) clipped to `bounds`.
    pub fn orthogonal(center: Coord2, bounds: Rect) -> Self {
        Self::with_table(center, bounds, &ORTHOGONAL)
    }

    fn with_table(center: Coord2, bounds: Rect, displacements: &'static [(i8, i8)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.displacements.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}

/// Compass direction, shared by board doors and the room graph.
///
/// North is row 0 / smaller `y`, West is column 0 / smaller `x`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    West,
    South,
    East,
}

impl Direction {
    /// All directions in connection-slot order.
    pub const ALL: [Direction; 4] = [Self::North, Self::West, Self::South, Self::East];

    /// Connection slot index.
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::West => 1,
            Self::South => 2,
            Self::East => 3,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::West => Self::East,
            Self::South => Self::North,
            Self::East => Self::West,
        }
    }

    pub const fn delta(self) -> (i8, i8) {
        ORTHOGONAL[self.index()]
    }

    /// Neighbouring coordinate in this direction, if it stays inside `bounds`.
    pub fn step(self, coords: Coord2, bounds: Rect) -> Option<Coord2> {
        apply_delta(coords, self.delta(), bounds)
    }

    /// Arrow pointing outward from the room center.
    pub const fn arrow(self) -> char {
        match self {
            Self::North => '↑',
            Self::West => '←',
            Self::South => '↓',
            Self::East => '→',
        }
    }

    pub const fn door(self) -> Doors {
        match self {
            Self::North => Doors::NORTH,
            Self::West => Doors::WEST,
            Self::South => Doors::SOUTH,
            Self::East => Doors::EAST,
        }
    }
}

bitflags! {
    /// Set of compass directions that carry a door.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Doors: u8 {
        const NORTH = 0b0001;
        const WEST = 0b0010;
        const SOUTH = 0b0100;
        const EAST = 0b1000;
    }
}

impl Doors {
    pub const fn has(self, direction: Direction) -> bool {
        self.contains(direction.door())
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&dir| self.has(dir))
    }
}

impl FromIterator<Direction> for Doors {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Doors::empty(), |doors, dir| doors | dir.door())
    }
}
