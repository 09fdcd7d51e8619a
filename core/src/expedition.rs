use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpeditionState {
    #[default]
    Exploring,
    /// The end room was solved.
    Escaped,
    /// A mine went off somewhere.
    Lost,
}

impl ExpeditionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Escaped | Self::Lost)
    }
}

/// Result of a command, with the state the UI needs to refresh itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Report<O> {
    pub outcome: O,
    pub room: RoomState,
    pub expedition: ExpeditionState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Traversal {
    pub from: RoomId,
    pub to: RoomId,
    pub first_visit: bool,
    /// Door tile of the new room leading back to `from`.
    pub entry_door: Coord2,
}

/// One play session: a generated dungeon, the active room, and the command surface.
#[derive(Clone, Debug)]
pub struct Expedition {
    config: ExpeditionConfig,
    dungeon: Dungeon,
    rng: SmallRng,
    active: RoomId,
    state: ExpeditionState,
}

impl Expedition {
    /// Generates the room graph and populates the start room's board.
    pub fn new(config: ExpeditionConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let dungeon = SpanningTreeGenerator::new(rng.random()).generate(config.dungeon)?;
        Self::with_rng(config, dungeon, rng)
    }

    /// Starts a session on an existing room graph. Rooms that already hold a board keep it.
    pub fn from_dungeon(config: ExpeditionConfig, dungeon: Dungeon) -> Result<Self> {
        config.board.validate()?;
        Self::with_rng(config, dungeon, SmallRng::seed_from_u64(config.seed))
    }

    fn with_rng(config: ExpeditionConfig, dungeon: Dungeon, rng: SmallRng) -> Result<Self> {
        let mut expedition = Self {
            config,
            active: dungeon.start(),
            dungeon,
            rng,
            state: ExpeditionState::Exploring,
        };
        expedition.populate(expedition.active)?;
        expedition.refresh();
        Ok(expedition)
    }

    pub fn config(&self) -> &ExpeditionConfig {
        &self.config
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn state(&self) -> ExpeditionState {
        self.state
    }

    pub fn active(&self) -> RoomId {
        self.active
    }

    pub fn active_room(&self) -> &Room {
        &self.dungeon.rooms()[self.active.0]
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.active_room().board()
    }

    pub fn board_snapshot(&self) -> Option<BoardSnapshot> {
        self.active_board().map(BoardSnapshot::from_board)
    }

    pub fn snapshot(&self) -> DungeonSnapshot {
        DungeonSnapshot::from_dungeon(&self.dungeon, Some(self.active))
    }

    /// Discovers a tile of the active room. A mine ends the expedition with a loss reveal.
    pub fn discover(&mut self, room: RoomId, coords: Coord2) -> Result<Report<RevealOutcome>> {
        let room = self.playable_room(room)?;
        let Some(board) = room.board.as_mut() else {
            return Err(InvalidOperation::InactiveRoom.into());
        };

        let outcome = board.discover(coords)?;
        if outcome == RevealOutcome::HitMine {
            board.reveal_all();
            room.state = RoomState::Lost;
            log::debug!("Mine triggered at {coords:?} in room {:?}", room.position);
        }

        Ok(self.report(outcome))
    }

    /// Toggles a flag in the active room. Placing the last flag triggers the win-confirmation
    /// reveal, which clears the room when every flag sits on a mine and loses it otherwise.
    pub fn flag(&mut self, room: RoomId, coords: Coord2) -> Result<Report<MarkOutcome>> {
        let room = self.playable_room(room)?;
        let Some(board) = room.board.as_mut() else {
            return Err(InvalidOperation::InactiveRoom.into());
        };

        let outcome = board.flag(coords)?;
        if outcome.is_flagged() && board.is_flag_complete() {
            room.state = if board.reveal_all() {
                RoomState::Cleared
            } else {
                RoomState::Lost
            };
            log::debug!(
                "Win-confirmation reveal in room {:?}: {:?}",
                room.position,
                room.state
            );
        }

        Ok(self.report(outcome))
    }

    /// Moves through the active room's door in `direction`, creating the next board on first visit.
    pub fn traverse(&mut self, direction: Direction) -> Result<Report<Traversal>> {
        self.check_not_finished()?;

        let from = self.active;
        let room = self.active_room();
        let to = room
            .connection(direction)
            .ok_or(InvalidOperation::NoDoor)?;
        if !room.is_solved() {
            return Err(InvalidOperation::RoomUnsolved.into());
        }

        let first_visit = self.populate(to)?;
        let board = self
            .dungeon
            .room(to)
            .and_then(Room::board)
            .ok_or(GameError::OutOfBounds)?;
        debug_assert!(board.doors().has(direction.opposite()));
        let entry_door = board.door_position(direction.opposite());

        self.active = to;
        log::debug!("Traversed {direction:?} from {from:?} to {to:?}");
        Ok(self.report(Traversal {
            from,
            to,
            first_visit,
            entry_door,
        }))
    }

    /// Creates the room's board from its current connections; `true` when it did not exist yet.
    fn populate(&mut self, id: RoomId) -> Result<bool> {
        let first_visit = self
            .dungeon
            .room(id)
            .ok_or(GameError::OutOfBounds)?
            .board()
            .is_none();
        let generator = RandomMinefieldGenerator::new(self.rng.random());
        self.dungeon.ensure_board(id, self.config.board, generator)?;
        Ok(first_visit)
    }

    fn playable_room(&mut self, id: RoomId) -> Result<&mut Room> {
        self.check_not_finished()?;
        if id != self.active {
            return Err(InvalidOperation::InactiveRoom.into());
        }

        let room = self
            .dungeon
            .room_mut(id)
            .ok_or(InvalidOperation::InactiveRoom)?;
        if room.board().is_some_and(Board::revealed_all) {
            return Err(InvalidOperation::BoardRevealed.into());
        }
        Ok(room)
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(InvalidOperation::AlreadyEnded.into())
        } else {
            Ok(())
        }
    }

    fn refresh(&mut self) {
        let Some(room) = self.dungeon.room_mut(self.active) else {
            return;
        };
        if room.state == RoomState::Unsolved && room.is_solved() {
            room.state = RoomState::Cleared;
        }

        let next = match room.state {
            RoomState::Lost => ExpeditionState::Lost,
            RoomState::Cleared if room.is_end => ExpeditionState::Escaped,
            _ => ExpeditionState::Exploring,
        };
        if next != self.state {
            log::info!("Expedition {:?}", next);
            self.state = next;
        }
    }

    fn report<O>(&mut self, outcome: O) -> Report<O> {
        self.refresh();
        Report {
            outcome,
            room: self.active_room().state(),
            expedition: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use alloc::vec::Vec;

    const BOARD: BoardConfig = BoardConfig::new_unchecked((5, 5), 1, 1);

    /// Two rooms side by side, each with one mine at a known spot.
    fn corridor() -> Expedition {
        let config = ExpeditionConfig {
            dungeon: DungeonConfig::new_unchecked((2, 1), 2),
            board: BOARD,
            seed: 1,
        };
        let mut dungeon = SpanningTreeGenerator::with_start(0, (0, 0))
            .generate(config.dungeon)
            .unwrap();
        for id in dungeon.ids() {
            dungeon
                .ensure_board(id, BOARD, FixedMinefieldGenerator::new(&[(1, 1)]))
                .unwrap();
        }
        Expedition::from_dungeon(config, dungeon).unwrap()
    }

    #[test]
    fn new_populates_start_room_with_matching_doors() {
        let config = ExpeditionConfig {
            dungeon: DungeonConfig::new_unchecked((4, 4), 7),
            board: BoardConfig::new_unchecked((9, 9), 1, 10),
            seed: 2024,
        };

        let expedition = Expedition::new(config).unwrap();

        let room = expedition.active_room();
        assert!(room.is_start());
        assert_eq!(room.state(), RoomState::Unsolved);
        let board = expedition.active_board().unwrap();
        assert_eq!(board.doors(), room.doors());
        assert_eq!(board.mine_count(), 10);
        assert_eq!(expedition.state(), ExpeditionState::Exploring);
        assert_eq!(expedition.dungeon().len(), 7);
    }

    #[test]
    fn flagging_every_mine_clears_the_room() {
        let mut expedition = corridor();
        let start = expedition.active();

        let report = expedition.flag(start, (1, 1)).unwrap();

        assert_eq!(report.outcome, MarkOutcome::Flagged);
        assert_eq!(report.room, RoomState::Cleared);
        assert_eq!(report.expedition, ExpeditionState::Exploring);
        assert!(expedition.active_board().unwrap().revealed_all());
    }

    #[test]
    fn wrong_flag_loses_on_confirmation() {
        let mut expedition = corridor();
        let start = expedition.active();

        let report = expedition.flag(start, (3, 3)).unwrap();

        assert_eq!(report.room, RoomState::Lost);
        assert_eq!(report.expedition, ExpeditionState::Lost);
        assert_eq!(
            expedition.discover(start, (2, 2)),
            Err(InvalidOperation::AlreadyEnded.into())
        );
    }

    #[test]
    fn mine_hit_loses_and_reveals_board() {
        let mut expedition = corridor();
        let start = expedition.active();

        let report = expedition.discover(start, (1, 1)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::HitMine);
        assert_eq!(report.expedition, ExpeditionState::Lost);
        let snapshot = expedition.board_snapshot().unwrap();
        assert!(snapshot.revealed_all);
        assert_eq!(snapshot.triggered_mine, Some((1, 1)));
    }

    #[test]
    fn traverse_requires_a_solved_room_and_a_door() {
        let mut expedition = corridor();

        assert_eq!(
            expedition.traverse(Direction::West),
            Err(InvalidOperation::NoDoor.into())
        );
        assert_eq!(
            expedition.traverse(Direction::East),
            Err(InvalidOperation::RoomUnsolved.into())
        );
    }

    #[test]
    fn traverse_to_end_room_and_escape() {
        let mut expedition = corridor();
        let start = expedition.active();
        expedition.flag(start, (1, 1)).unwrap();

        let report = expedition.traverse(Direction::East).unwrap();

        assert_eq!(report.outcome.from, start);
        assert_eq!(report.outcome.entry_door, (0, 2));
        assert_eq!(report.room, RoomState::Unsolved);
        let end = expedition.active();
        assert!(expedition.active_room().is_end());
        assert_eq!(
            expedition.active_board().unwrap().door_at((0, 2)),
            Some(Direction::West)
        );

        assert_eq!(
            expedition.flag(start, (1, 1)),
            Err(InvalidOperation::InactiveRoom.into())
        );
        let report = expedition.flag(end, (1, 1)).unwrap();
        assert_eq!(report.expedition, ExpeditionState::Escaped);
        assert_eq!(
            expedition.traverse(Direction::West),
            Err(InvalidOperation::AlreadyEnded.into())
        );
    }

    #[test]
    fn cleared_room_rejects_further_moves_but_allows_backtracking() {
        let mut expedition = corridor();
        let start = expedition.active();
        expedition.flag(start, (1, 1)).unwrap();

        assert_eq!(
            expedition.flag(start, (1, 1)),
            Err(InvalidOperation::BoardRevealed.into())
        );

        let forward = expedition.traverse(Direction::East).unwrap();
        assert!(!forward.outcome.first_visit);
        assert_eq!(
            expedition.traverse(Direction::West),
            Err(InvalidOperation::RoomUnsolved.into())
        );
    }

    #[test]
    fn mine_free_single_room_is_escaped_at_once() {
        let config = ExpeditionConfig {
            dungeon: DungeonConfig::new_unchecked((1, 1), 1),
            board: BoardConfig::new_unchecked((5, 5), 1, 0),
            seed: 3,
        };

        let expedition = Expedition::new(config).unwrap();

        assert_eq!(expedition.active_room().state(), RoomState::Cleared);
        assert_eq!(expedition.state(), ExpeditionState::Escaped);
    }

    /// Directions leading from the start room to the end room.
    fn route_to_end(dungeon: &Dungeon) -> Vec<Direction> {
        let mut came_by: Vec<Option<(RoomId, Direction)>> = vec![None; dungeon.len()];
        let mut to_visit = VecDeque::from([dungeon.start()]);
        while let Some(id) = to_visit.pop_front() {
            for dir in Direction::ALL {
                if let Some(next) = dungeon.neighbor(id, dir) {
                    if next != dungeon.start() && came_by[next.0].is_none() {
                        came_by[next.0] = Some((id, dir));
                        to_visit.push_back(next);
                    }
                }
            }
        }

        let mut route = Vec::new();
        let mut id = dungeon.end();
        while let Some((prev, dir)) = came_by[id.0] {
            route.push(dir);
            id = prev;
        }
        route.reverse();
        route
    }

    #[test]
    fn lazy_boards_follow_current_connections() {
        let config = ExpeditionConfig {
            dungeon: DungeonConfig::new_unchecked((4, 4), 10),
            board: BoardConfig::new_unchecked((7, 7), 1, 0),
            seed: 77,
        };
        let mut expedition = Expedition::new(config).unwrap();
        let route = route_to_end(expedition.dungeon());
        assert_eq!(route.is_empty(), expedition.dungeon().start() == expedition.dungeon().end());

        for dir in route {
            assert_eq!(expedition.state(), ExpeditionState::Exploring);
            let report = expedition.traverse(dir).unwrap();

            assert!(report.outcome.first_visit);
            let board = expedition.active_board().unwrap();
            assert_eq!(board.doors(), expedition.active_room().doors());
            assert_eq!(board.door_at(report.outcome.entry_door), Some(dir.opposite()));
        }

        assert!(expedition.active_room().is_end());
        assert_eq!(expedition.state(), ExpeditionState::Escaped);
        let minimap = expedition.snapshot();
        assert_eq!(minimap.rooms.iter().filter(|room| room.is_active).count(), 1);
        assert!(minimap.room_at(expedition.active_room().position()).unwrap().is_visited);
    }
}
