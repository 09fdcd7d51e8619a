use serde::{Deserialize, Serialize};

use crate::*;

/// Stable index of a room inside its [`Dungeon`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    #[default]
    Unvisited,
    Unsolved,
    Cleared,
    Lost,
}

impl RoomState {
    pub const fn is_visited(self) -> bool {
        !matches!(self, Self::Unvisited)
    }
}

/// Node of the room graph. Neighbours are referenced by id, never owned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub(crate) position: Coord2,
    pub(crate) connections: [Option<RoomId>; 4],
    pub(crate) is_start: bool,
    pub(crate) is_end: bool,
    pub(crate) board: Option<Board>,
    pub(crate) state: RoomState,
}

impl Room {
    pub(crate) fn new(position: Coord2) -> Self {
        Self {
            position,
            connections: [None; 4],
            is_start: false,
            is_end: false,
            board: None,
            state: RoomState::Unvisited,
        }
    }

    pub fn position(&self) -> Coord2 {
        self.position
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_end(&self) -> bool {
        self.is_end
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn connection(&self, direction: Direction) -> Option<RoomId> {
        self.connections[direction.index()]
    }

    pub fn connections(&self) -> &[Option<RoomId>; 4] {
        &self.connections
    }

    /// Directions with a live connection, i.e. where the board carries a door.
    pub fn doors(&self) -> Doors {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.connection(dir).is_some())
            .collect()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Cleared by flags, or every mine discovered without losing.
    pub fn is_solved(&self) -> bool {
        match self.state {
            RoomState::Cleared => true,
            RoomState::Lost | RoomState::Unvisited => false,
            RoomState::Unsolved => self.board.as_ref().is_some_and(Board::is_clear),
        }
    }
}
