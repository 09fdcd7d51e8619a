use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::*;
pub use layout::*;
pub use room::*;

mod layout;
mod room;

/// Arena of rooms forming a spanning tree over a `grid_size` coordinate grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Dungeon {
    grid_size: Coord2,
    rooms: Vec<Room>,
    index: HashMap<Coord2, RoomId>,
}

impl Dungeon {
    /// Dungeon holding only the start room.
    pub(crate) fn with_root(grid_size: Coord2, position: Coord2) -> Self {
        let mut root = Room::new(position);
        root.is_start = true;
        Self {
            grid_size,
            rooms: vec![root],
            index: HashMap::from([(position, RoomId(0))]),
        }
    }

    /// Coordinate of a new room next to `anchor`, if one may be attached there.
    pub(crate) fn free_neighbor(&self, anchor: RoomId, direction: Direction) -> Option<Coord2> {
        let room = &self.rooms[anchor.0];
        if room.connection(direction).is_some() {
            return None;
        }
        direction
            .step(room.position, self.bounds())
            .filter(|pos| !self.index.contains_key(pos))
    }

    /// Creates a room next to `anchor` and links both ways.
    pub(crate) fn attach(&mut self, anchor: RoomId, direction: Direction) -> Option<RoomId> {
        let position = self.free_neighbor(anchor, direction)?;
        let id = RoomId(self.rooms.len());

        let mut room = Room::new(position);
        room.connections[direction.opposite().index()] = Some(anchor);
        self.rooms[anchor.0].connections[direction.index()] = Some(id);
        self.rooms.push(room);
        self.index.insert(position, id);
        Some(id)
    }

    pub(crate) fn is_saturated(&self, id: RoomId) -> bool {
        Direction::ALL
            .into_iter()
            .all(|dir| self.free_neighbor(id, dir).is_none())
    }

    pub(crate) fn mark_end(&mut self, id: RoomId) {
        self.rooms[id.0].is_end = true;
    }

    pub fn grid_size(&self) -> Coord2 {
        self.grid_size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.grid_size)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms in insertion order; a room's index is its [`RoomId`].
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn ids(&self) -> impl Iterator<Item = RoomId> + use<> {
        (0..self.rooms.len()).map(RoomId)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id.0)
    }

    pub fn room_at(&self, position: Coord2) -> Option<RoomId> {
        self.index.get(&position).copied()
    }

    pub fn start(&self) -> RoomId {
        RoomId(0)
    }

    pub fn end(&self) -> RoomId {
        self.ids()
            .find(|&id| self.rooms[id.0].is_end)
            .unwrap_or(RoomId(self.rooms.len() - 1))
    }

    pub fn neighbor(&self, id: RoomId, direction: Direction) -> Option<RoomId> {
        self.room(id)?.connection(direction)
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        let slots: usize = self
            .rooms
            .iter()
            .map(|room| room.connections.iter().flatten().count())
            .sum();
        slots / 2
    }

    /// Every room reachable from the start room.
    pub fn is_connected(&self) -> bool {
        let mut seen = vec![false; self.rooms.len()];
        let mut to_visit = VecDeque::from([self.start()]);
        seen[0] = true;

        while let Some(id) = to_visit.pop_front() {
            for next in self.rooms[id.0].connections.iter().flatten() {
                if !seen[next.0] {
                    seen[next.0] = true;
                    to_visit.push_back(*next);
                }
            }
        }

        seen.into_iter().all(|visited| visited)
    }

    /// `a.connections[d] == b` exactly when `b.connections[opposite(d)] == a`.
    pub fn is_symmetric(&self) -> bool {
        self.ids().all(|id| {
            Direction::ALL.into_iter().all(|dir| match self.neighbor(id, dir) {
                Some(other) => self.neighbor(other, dir.opposite()) == Some(id),
                None => true,
            })
        })
    }

    /// Returns the room's board, populating it from the room's current connections on first use.
    pub fn ensure_board(
        &mut self,
        id: RoomId,
        config: BoardConfig,
        generator: impl MinefieldGenerator,
    ) -> Result<&mut Board> {
        let room = self
            .rooms
            .get_mut(id.0)
            .ok_or(GameError::OutOfBounds)?;

        let board = match room.board.take() {
            Some(board) => board,
            None => {
                let board = generator.generate(config, room.doors())?;
                log::debug!(
                    "Created board for room {:?} at {:?} with doors {:?}",
                    id,
                    room.position,
                    board.doors()
                );
                board
            }
        };
        if room.state == RoomState::Unvisited {
            room.state = RoomState::Unsolved;
        }

        Ok(room.board.insert(board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Dungeon {
        let mut dungeon = Dungeon::with_root((3, 1), (0, 0));
        let middle = dungeon.attach(RoomId(0), Direction::East).unwrap();
        let last = dungeon.attach(middle, Direction::East).unwrap();
        dungeon.mark_end(last);
        dungeon
    }

    #[test]
    fn attach_links_both_ways() {
        let dungeon = line();

        assert_eq!(dungeon.neighbor(RoomId(0), Direction::East), Some(RoomId(1)));
        assert_eq!(dungeon.neighbor(RoomId(1), Direction::West), Some(RoomId(0)));
        assert_eq!(dungeon.room_at((2, 0)), Some(RoomId(2)));
        assert_eq!(dungeon.edge_count(), 2);
        assert!(dungeon.is_symmetric());
        assert!(dungeon.is_connected());
        assert_eq!(dungeon.end(), RoomId(2));
    }

    #[test]
    fn attach_refuses_occupied_or_outside_cells() {
        let mut dungeon = line();

        assert_eq!(dungeon.attach(RoomId(2), Direction::East), None);
        assert_eq!(dungeon.attach(RoomId(1), Direction::North), None);
        assert_eq!(dungeon.attach(RoomId(0), Direction::East), None);
        assert!(dungeon.is_saturated(RoomId(1)));
    }

    #[test]
    fn doors_follow_connections() {
        let dungeon = line();

        assert_eq!(dungeon.rooms()[0].doors(), Doors::EAST);
        assert_eq!(dungeon.rooms()[1].doors(), Doors::EAST | Doors::WEST);
        assert_eq!(dungeon.rooms()[2].doors(), Doors::WEST);
    }

    #[test]
    fn ensure_board_carves_doors_once() {
        let mut dungeon = line();
        let config = BoardConfig::new_unchecked((7, 7), 1, 0);

        let board = dungeon
            .ensure_board(RoomId(1), config, FixedMinefieldGenerator::new(&[]))
            .unwrap();
        assert_eq!(board.doors(), Doors::EAST | Doors::WEST);
        assert_eq!(board.door_at((0, 3)), Some(Direction::West));
        assert_eq!(board.door_at((6, 3)), Some(Direction::East));
        board.flag((2, 2)).unwrap();

        // a second call keeps the existing board
        let board = dungeon
            .ensure_board(RoomId(1), config, FixedMinefieldGenerator::new(&[(3, 3)]))
            .unwrap();
        assert_eq!(board.mine_count(), 0);
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(dungeon.rooms()[1].state(), RoomState::Unsolved);
    }
}
