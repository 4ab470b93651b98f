//! Procedural level layout.
//!
//! [`DungeonGenerator::generate`] clears the grid, places a large first room
//! at the centre and two passes of random rooms around it, seeds each room
//! with inhabitants from its category table, routes corridors to each room's
//! nearest neighbours and finally recomputes the adjacency masks. All
//! randomness comes from the [`GameRng`] passed in, so the same stream always
//! yields the same level.

pub mod corridor;
pub mod room;

use tracing::{debug, trace, warn};

pub use corridor::{Neighbour, carve, nearest_rooms, random_edge};
pub use room::{Rect, Room, RoomCategory, Spawn};

use crate::config::{GameConfig, GenerationConfig};
use crate::grid::{Grid, TileKind};
use crate::rng::GameRng;
use crate::state::Position;

/// Size range of the first, centred room.
pub const FIRST_ROOM_SIZE: (i32, i32) = (10, 15);
/// `(count, min size, max size)` of each placement pass after the first room.
pub const ROOM_PASSES: [(usize, i32, i32); 2] = [(5, 8, 15), (15, 5, 7)];
/// Padding kept between any two rooms.
pub const ROOM_PADDING: i32 = 1;
/// Inclusive range of corridors leaving each room.
pub const CORRIDORS_PER_ROOM: (i32, i32) = (1, 4);

#[derive(Clone, Debug, Default)]
pub struct DungeonGenerator {
    config: GenerationConfig,
    reserved: Vec<Position>,
}

impl DungeonGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            reserved: Vec::new(),
        }
    }

    /// Tiles no inhabitant may be placed on (the player's start).
    pub fn with_reserved(mut self, reserved: impl IntoIterator<Item = Position>) -> Self {
        self.reserved.extend(reserved);
        self
    }

    pub fn generate(&self, grid: &mut Grid, rng: &mut GameRng) -> Vec<Room> {
        grid.clear();
        let mut rooms: Vec<Room> = Vec::new();

        let (min, max) = FIRST_ROOM_SIZE;
        let width = rng.range(min, max);
        let height = rng.range(min, max);
        let first = Rect::new(
            Position::new(
                (grid.width() as i32 - width) / 2,
                (grid.height() as i32 - height) / 2,
            ),
            width,
            height,
        );
        self.add_room(grid, &mut rooms, first, rng);

        for (count, min, max) in ROOM_PASSES {
            self.place_rooms(grid, &mut rooms, count, min, max, rng);
        }

        let bounds: Vec<Rect> = rooms.iter().map(|room| room.bounds).collect();
        let mut corridors = 0;
        for source in 0..bounds.len() {
            let (min, max) = CORRIDORS_PER_ROOM;
            let count = rng.range(min, max) as usize;
            for neighbour in nearest_rooms(&bounds, source, count) {
                let start = random_edge(&bounds[source], neighbour.side, rng);
                if carve(grid, start, neighbour.side, &bounds[neighbour.index], rng) {
                    corridors += 1;
                }
            }
        }

        grid.remap();
        debug!(
            rooms = rooms.len(),
            corridors,
            inhabitants = rooms.iter().map(|room| room.spawns.len()).sum::<usize>(),
            "dungeon generated"
        );
        rooms
    }

    fn place_rooms(
        &self,
        grid: &mut Grid,
        rooms: &mut Vec<Room>,
        count: usize,
        mut min: i32,
        mut max: i32,
        rng: &mut GameRng,
    ) {
        for _ in 0..count {
            let mut attempts = 0;
            let placed = loop {
                attempts += 1;
                if attempts > GameConfig::ROOM_SHRINK_AFTER && attempts % 3 == 0 {
                    min = (min - 1).max(GameConfig::MIN_ROOM_SIZE);
                    max = (max - 1).max(GameConfig::MIN_ROOM_SIZE);
                }
                if attempts > GameConfig::ROOM_ATTEMPT_LIMIT {
                    break None;
                }
                let candidate = random_rect(grid, min, max, rng);
                if !rooms
                    .iter()
                    .any(|room| candidate.intersects(&room.bounds, ROOM_PADDING))
                {
                    break Some(candidate);
                }
            };
            match placed {
                Some(bounds) => self.add_room(grid, rooms, bounds, rng),
                None => trace!(min, max, "room abandoned"),
            }
        }
    }

    fn add_room(&self, grid: &mut Grid, rooms: &mut Vec<Room>, bounds: Rect, rng: &mut GameRng) {
        let category = rng
            .pick(&RoomCategory::ALL)
            .copied()
            .unwrap_or(RoomCategory::Nature);
        let mut room = Room::new(bounds, category);

        'table: for &(kind, min, max) in category.spawn_table() {
            let count = rng.range(min, max);
            for _ in 0..count {
                match self.free_tile(&room, rng) {
                    Some(position) => room.spawns.push(Spawn { kind, position }),
                    None => {
                        warn!(%kind, room = ?room.bounds, "spawn attempts exhausted");
                        continue 'table;
                    }
                }
            }
        }

        for tile in bounds.tiles() {
            grid.set_tile(tile, TileKind::Grass);
        }
        rooms.push(room);
    }

    /// Uniform tile of `room` not taken by another inhabitant or reserved.
    fn free_tile(&self, room: &Room, rng: &mut GameRng) -> Option<Position> {
        let bounds = room.bounds;
        let mut attempts = 0u32;
        loop {
            if self
                .config
                .spawn_attempt_limit
                .is_some_and(|limit| attempts >= limit)
            {
                return None;
            }
            attempts += 1;
            let position = Position::new(
                bounds.left() + rng.below(bounds.width as u32) as i32,
                bounds.top() + rng.below(bounds.height as u32) as i32,
            );
            if room.spawn_at(position).is_none() && !self.reserved.contains(&position) {
                return Some(position);
            }
        }
    }
}

fn random_rect(grid: &Grid, min: i32, max: i32, rng: &mut GameRng) -> Rect {
    let width = rng.range(min, max);
    let height = rng.range(min, max);
    let x = rng.range(0, grid.width() as i32 - width);
    let y = rng.range(0, grid.height() as i32 - height);
    Rect::new(Position::new(x, y), width, height)
}
