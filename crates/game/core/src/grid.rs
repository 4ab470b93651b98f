//! Fixed-size tile store.
//!
//! Tiles are kept row-major (`index = y * width + x`). Every query outside
//! the grid answers with [`TileKind::Empty`], so callers never bounds-check.

use bitflags::bitflags;
use strum::{AsRefStr, Display, EnumString};

use crate::state::Position;

/// Terrain of a single tile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    /// Solid rock. Never walkable.
    #[default]
    Empty,
    /// Room floor.
    Grass,
    /// Corridor floor.
    Path,
}

impl TileKind {
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Empty)
    }

    /// Kinds that get an adjacency mask for edge blending.
    pub const fn is_mappable(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Path)
    }
}

bitflags! {
    /// Same-kind neighbours of a mappable tile.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Adjacency: u8 {
        const UP_LEFT = 1 << 0;
        const UP = 1 << 1;
        const UP_RIGHT = 1 << 2;
        const LEFT = 1 << 3;
        const RIGHT = 1 << 4;
        const DOWN_LEFT = 1 << 5;
        const DOWN = 1 << 6;
        const DOWN_RIGHT = 1 << 7;
    }
}

impl Adjacency {
    const NEIGHBOURS: [(Adjacency, i32, i32); 8] = [
        (Adjacency::UP_LEFT, -1, -1),
        (Adjacency::UP, 0, -1),
        (Adjacency::UP_RIGHT, 1, -1),
        (Adjacency::LEFT, -1, 0),
        (Adjacency::RIGHT, 1, 0),
        (Adjacency::DOWN_LEFT, -1, 1),
        (Adjacency::DOWN, 0, 1),
        (Adjacency::DOWN_RIGHT, 1, 1),
    ];

    /// Corner sprite indices for the four quadrants of a tile.
    pub fn sub_tiles(self) -> SubTiles {
        SubTiles {
            up_left: self.corner(Self::UP, Self::LEFT, Self::UP_LEFT, [2, 4, 14, 12, 0]),
            up_right: self.corner(Self::UP, Self::RIGHT, Self::UP_RIGHT, [3, 5, 15, 13, 1]),
            down_left: self.corner(Self::DOWN, Self::LEFT, Self::DOWN_LEFT, [8, 10, 20, 18, 6]),
            down_right: self.corner(Self::DOWN, Self::RIGHT, Self::DOWN_RIGHT, [9, 11, 21, 19, 7]),
        }
    }

    // table: [both+diagonal, both, vertical only, horizontal only, neither]
    fn corner(self, vertical: Self, horizontal: Self, diagonal: Self, table: [u8; 5]) -> u8 {
        match (self.contains(vertical), self.contains(horizontal)) {
            (true, true) if self.contains(diagonal) => table[0],
            (true, true) => table[1],
            (true, false) => table[2],
            (false, true) => table[3],
            (false, false) => table[4],
        }
    }
}

/// Sprite indices of the four corners of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubTiles {
    pub up_left: u8,
    pub up_right: u8,
    pub down_left: u8,
    pub down_right: u8,
}

/// Row-major tile store with derived adjacency masks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    adjacency: Vec<Adjacency>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![TileKind::Empty; len],
            adjacency: vec![Adjacency::empty(); len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn tile(&self, position: Position) -> TileKind {
        self.index(position)
            .map_or(TileKind::Empty, |index| self.tiles[index])
    }

    /// Writes a tile. Returns false (and changes nothing) outside the grid.
    pub fn set_tile(&mut self, position: Position, kind: TileKind) -> bool {
        match self.index(position) {
            Some(index) => {
                self.tiles[index] = kind;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_walkable()
    }

    pub fn adjacency(&self, position: Position) -> Adjacency {
        self.index(position)
            .map_or(Adjacency::empty(), |index| self.adjacency[index])
    }

    /// Resets every tile to `Empty`.
    pub fn clear(&mut self) {
        self.tiles.fill(TileKind::Empty);
        self.adjacency.fill(Adjacency::empty());
    }

    /// Recomputes the adjacency mask of every mappable tile.
    pub fn remap(&mut self) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let position = Position::new(x, y);
                let kind = self.tile(position);
                let mask = if kind.is_mappable() {
                    Adjacency::NEIGHBOURS
                        .iter()
                        .filter(|(_, dx, dy)| self.tile(Position::new(x + dx, y + dy)) == kind)
                        .fold(Adjacency::empty(), |mask, (flag, _, _)| mask | *flag)
                } else {
                    Adjacency::empty()
                };
                if let Some(index) = self.index(position) {
                    self.adjacency[index] = mask;
                }
            }
        }
    }

    /// Iterates `(position, kind)` in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            (
                Position::new((index % width) as i32, (index / width) as i32),
                *kind,
            )
        })
    }
}
