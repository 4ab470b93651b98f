//! Corridor routing between rooms.
//!
//! A corridor starts on the wall of the source room that faces its target
//! and walks straight until it lines up with a random row or column of the
//! target. If that leaves it outside the target it turns once and walks to
//! the target's near edge. Only `Empty` tiles are carved, so corridors never
//! overwrite room floor.

use tracing::trace;

use crate::config::GameConfig;
use crate::grid::{Grid, TileKind};
use crate::rng::GameRng;
use crate::state::{Direction, Position};

use super::room::Rect;

/// A candidate corridor target ranked by [`nearest_rooms`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    pub index: usize,
    pub distance: f64,
    /// Side of the source room the corridor leaves from.
    pub side: Direction,
}

/// The `count` rooms closest to `rooms[source]`.
///
/// Each axis distance is the larger span between opposite edges; their
/// average ranks the candidates and the larger axis picks the side, with
/// ties going vertical. Equal distances keep room order.
pub fn nearest_rooms(rooms: &[Rect], source: usize, count: usize) -> Vec<Neighbour> {
    let Some(from) = rooms.get(source) else {
        return Vec::new();
    };
    let mut neighbours: Vec<Neighbour> = rooms
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != source)
        .map(|(index, to)| {
            let dx = (to.right() - from.left()).abs().max((from.right() - to.left()).abs());
            let dy = (to.bottom() - from.top()).abs().max((from.bottom() - to.top()).abs());
            let side = if dx > dy {
                if to.left() > from.left() { Direction::Right } else { Direction::Left }
            } else if to.top() > from.top() {
                Direction::Down
            } else {
                Direction::Up
            };
            Neighbour {
                index,
                distance: f64::from(dx + dy) / 2.0,
                side,
            }
        })
        .collect();
    neighbours.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    neighbours.truncate(count);
    neighbours
}

/// Random starting tile on `side` of `room`.
pub fn random_edge(room: &Rect, side: Direction, rng: &mut GameRng) -> Position {
    let along_x = room.left() + rng.below(room.width as u32) as i32;
    let along_y = room.top() + rng.below(room.height as u32) as i32;
    match side {
        Direction::Down => Position::new(along_x, room.bottom()),
        Direction::Up => Position::new(along_x, room.top()),
        Direction::Right => Position::new(room.right(), along_y),
        Direction::Left => Position::new(room.left(), along_y),
    }
}

fn reached(position: Position, direction: Direction, target: i32) -> bool {
    if direction.is_horizontal() {
        position.x == target
    } else {
        position.y == target
    }
}

/// Direction of the second leg: vertical if already within the target's columns.
fn turn_towards(position: Position, room: &Rect) -> Direction {
    if room.contains_column(position.x) {
        if position.y > room.top() { Direction::Up } else { Direction::Down }
    } else if position.x > room.left() {
        Direction::Left
    } else {
        Direction::Right
    }
}

/// Near edge of `room` when approached moving `direction`.
fn near_edge(direction: Direction, room: &Rect) -> i32 {
    match direction {
        Direction::Up => room.bottom() - 1,
        Direction::Down => room.top(),
        Direction::Left => room.right() - 1,
        Direction::Right => room.left(),
    }
}

/// Carves one corridor. Returns false when the shared step budget ran out.
pub fn carve(grid: &mut Grid, start: Position, direction: Direction, to: &Rect, rng: &mut GameRng) -> bool {
    let first_target = if direction.is_horizontal() {
        to.left() + rng.below(to.width as u32) as i32
    } else {
        to.top() + rng.below(to.height as u32) as i32
    };

    let mut position = start;
    let mut steps = 0;
    if !walk(grid, &mut position, direction, first_target, &mut steps) {
        return false;
    }
    if to.contains(position) {
        return true;
    }

    let turn = turn_towards(position, to);
    walk(grid, &mut position, turn, near_edge(turn, to), &mut steps)
}

fn walk(grid: &mut Grid, position: &mut Position, direction: Direction, target: i32, steps: &mut u32) -> bool {
    while !reached(*position, direction, target) {
        *steps += 1;
        if *steps > GameConfig::CORRIDOR_STEP_LIMIT {
            trace!(at = %position, "corridor leg abandoned");
            return false;
        }
        if grid.tile(*position) == TileKind::Empty {
            grid.set_tile(*position, TileKind::Path);
        }
        *position = position.offset(direction);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rooms_are_ranked_by_average_span() {
        let rooms = [
            Rect::new(Position::new(10, 10), 5, 5),
            Rect::new(Position::new(30, 10), 5, 5),
            Rect::new(Position::new(10, 18), 5, 5),
            Rect::new(Position::new(10, 0), 5, 5),
        ];
        let neighbours = nearest_rooms(&rooms, 0, 2);
        assert_eq!(neighbours.len(), 2);
        // (10, 0) spans dx=5, dy=15 -> 10; (10, 18) spans dx=5, dy=13 -> 9
        assert_eq!(neighbours[0].index, 2);
        assert_eq!(neighbours[0].side, Direction::Down);
        assert_eq!(neighbours[1].index, 3);
        assert_eq!(neighbours[1].side, Direction::Up);

        let far = nearest_rooms(&rooms, 0, 10);
        assert_eq!(far.len(), 3);
        assert_eq!(far[2].index, 1);
        assert_eq!(far[2].side, Direction::Right);
    }

    #[test]
    fn edges_sit_on_the_requested_side() {
        let room = Rect::new(Position::new(4, 6), 5, 3);
        let mut rng = GameRng::seed_from_u64(12);
        for _ in 0..20 {
            let down = random_edge(&room, Direction::Down, &mut rng);
            assert_eq!(down.y, 9);
            assert!(room.contains_column(down.x));
            let right = random_edge(&room, Direction::Right, &mut rng);
            assert_eq!(right.x, 9);
            assert!((6..9).contains(&right.y));
            assert_eq!(random_edge(&room, Direction::Left, &mut rng).x, 4);
            assert_eq!(random_edge(&room, Direction::Up, &mut rng).y, 6);
        }
    }

    #[test]
    fn carve_connects_facing_rooms() {
        let mut grid = Grid::new(40, 40);
        let from = Rect::new(Position::new(2, 10), 5, 5);
        let to = Rect::new(Position::new(20, 10), 5, 5);
        for tile in from.tiles().chain(to.tiles()) {
            grid.set_tile(tile, TileKind::Grass);
        }
        let mut rng = GameRng::seed_from_u64(5);
        let start = random_edge(&from, Direction::Right, &mut rng);
        assert!(carve(&mut grid, start, Direction::Right, &to, &mut rng));

        // a straight run along the start row from the wall to the target
        for x in 7..20 {
            assert_eq!(grid.tile(Position::new(x, start.y)), TileKind::Path);
        }
        assert_eq!(grid.tile(Position::new(22, 12)), TileKind::Grass);
    }

    #[test]
    fn carve_turns_when_not_facing() {
        let mut grid = Grid::new(40, 40);
        let to = Rect::new(Position::new(20, 20), 5, 5);
        for tile in to.tiles() {
            grid.set_tile(tile, TileKind::Grass);
        }
        let mut rng = GameRng::seed_from_u64(9);
        let start = Position::new(5, 5);
        assert!(carve(&mut grid, start, Direction::Right, &to, &mut rng));
        assert_eq!(grid.tile(start), TileKind::Path);
        // the second leg runs down one of the target's columns into its top edge
        let column = (20..25)
            .find(|x| grid.tile(Position::new(*x, 6)) == TileKind::Path)
            .unwrap();
        assert_eq!(grid.tile(Position::new(column, 19)), TileKind::Path);
    }

    #[test]
    fn runaway_corridors_stop() {
        let mut grid = Grid::new(300, 300);
        let to = Rect::new(Position::new(250, 250), 5, 5);
        let mut rng = GameRng::seed_from_u64(1);
        assert!(!carve(&mut grid, Position::new(0, 0), Direction::Right, &to, &mut rng));
        let carved = grid.tiles().filter(|(_, kind)| *kind == TileKind::Path).count();
        assert_eq!(carved, GameConfig::CORRIDOR_STEP_LIMIT as usize);
    }
}
