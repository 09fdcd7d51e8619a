use alloc::vec::Vec;

use super::*;

/// Consecutive fruitless anchors, per room, before anchors are drawn only from open rooms.
const SATURATION_FACTOR: usize = 4;

pub trait LayoutGenerator {
    fn generate(self, config: DungeonConfig) -> Result<Dungeon>;
}

/// Grows a random spanning tree: every new room hangs off exactly one existing room.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTreeGenerator {
    seed: u64,
    start: Option<Coord2>,
}

impl SpanningTreeGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed, start: None }
    }

    pub fn with_start(seed: u64, start: Coord2) -> Self {
        Self {
            seed,
            start: Some(start),
        }
    }
}

impl LayoutGenerator for SpanningTreeGenerator {
    fn generate(self, config: DungeonConfig) -> Result<Dungeon> {
        use rand::prelude::*;

        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let (size_x, size_y) = config.grid_size;
        let start = match self.start {
            Some(start) if config.bounds().contains(start) => start,
            Some(_) => return Err(ConfigError::StartOutOfBounds.into()),
            None => (rng.random_range(0..size_x), rng.random_range(0..size_y)),
        };

        let mut dungeon = Dungeon::with_root(config.grid_size, start);
        let target = usize::from(config.max_rooms);
        let mut newest = dungeon.start();
        let mut failed_anchors = 0;

        while dungeon.len() < target {
            let anchor = if failed_anchors < SATURATION_FACTOR * dungeon.len() {
                RoomId(rng.random_range(0..dungeon.len()))
            } else {
                if failed_anchors == SATURATION_FACTOR * dungeon.len() {
                    log::warn!(
                        "Room graph nearly saturated at {} rooms, sampling open rooms only",
                        dungeon.len()
                    );
                }
                let open: Vec<RoomId> = dungeon
                    .ids()
                    .filter(|&id| !dungeon.is_saturated(id))
                    .collect();
                // the grid is connected, so while it has free cells some room borders one
                let Some(&anchor) = open.choose(&mut rng) else {
                    return Err(ConfigError::TooManyRooms.into());
                };
                anchor
            };

            let mut directions = Direction::ALL;
            directions.shuffle(&mut rng);
            match directions
                .into_iter()
                .find_map(|direction| dungeon.attach(anchor, direction))
            {
                Some(id) => {
                    newest = id;
                    failed_anchors = 0;
                }
                None => failed_anchors += 1,
            }
        }

        dungeon.mark_end(newest);
        log::debug!(
            "Generated dungeon with {} rooms on a {}x{} grid, start {:?}, end {:?}",
            dungeon.len(),
            size_x,
            size_y,
            dungeon.room(dungeon.start()).map(Room::position),
            dungeon.room(newest).map(Room::position),
        );
        Ok(dungeon)
    }
}
