//! Rooms, their categories and inhabitant tables.

use strum::{AsRefStr, Display, EnumString};

use crate::entity::EntityKind;
use crate::state::{EntityId, Position};

/// Axis-aligned tile rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub position: Position,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(position: Position, width: i32, height: i32) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    pub const fn left(&self) -> i32 {
        self.position.x
    }

    pub const fn top(&self) -> i32 {
        self.position.y
    }

    /// One past the last column.
    pub const fn right(&self) -> i32 {
        self.position.x + self.width
    }

    /// One past the last row.
    pub const fn bottom(&self) -> i32 {
        self.position.y + self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.left()
            && position.x < self.right()
            && position.y >= self.top()
            && position.y < self.bottom()
    }

    pub fn contains_column(&self, x: i32) -> bool {
        x >= self.left() && x < self.right()
    }

    /// Overlap test with both rectangles grown by `padding` on every side.
    pub fn intersects(&self, other: &Rect, padding: i32) -> bool {
        self.right() + padding > other.left()
            && self.left() - padding < other.right()
            && self.bottom() + padding > other.top()
            && self.top() - padding < other.bottom()
    }

    /// Every tile of the rectangle in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        (self.top()..self.bottom())
            .flat_map(move |y| (self.left()..self.right()).map(move |x| Position::new(x, y)))
    }
}

/// Theme of a room; picks its inhabitant table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RoomCategory {
    Mushrooms,
    Flowers,
    Nature,
    Frogs,
    Swampy,
}

impl RoomCategory {
    pub const ALL: [RoomCategory; 5] = [
        RoomCategory::Mushrooms,
        RoomCategory::Flowers,
        RoomCategory::Nature,
        RoomCategory::Frogs,
        RoomCategory::Swampy,
    ];

    /// `(kind, min, max)` inhabitant counts, inclusive, in spawn order.
    pub const fn spawn_table(self) -> &'static [(EntityKind, i32, i32)] {
        match self {
            RoomCategory::Mushrooms => &[(EntityKind::Mushroom, 1, 6)],
            RoomCategory::Flowers => &[(EntityKind::Flower, 10, 15)],
            RoomCategory::Frogs => &[(EntityKind::Frog, 1, 5)],
            RoomCategory::Swampy => &[(EntityKind::Frog, 1, 4), (EntityKind::Mushroom, 1, 4)],
            RoomCategory::Nature => &[
                (EntityKind::Mushroom, 1, 4),
                (EntityKind::Frog, 1, 3),
                (EntityKind::Flower, 3, 7),
            ],
        }
    }
}

/// An inhabitant chosen during generation, not yet in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spawn {
    pub kind: EntityKind,
    pub position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub bounds: Rect,
    pub category: RoomCategory,
    pub spawns: Vec<Spawn>,
    /// Ids given to `spawns` once the engine placed them.
    pub inhabitants: Vec<EntityId>,
}

impl Room {
    pub fn new(bounds: Rect, category: RoomCategory) -> Self {
        Self {
            bounds,
            category,
            spawns: Vec::new(),
            inhabitants: Vec::new(),
        }
    }

    pub fn spawn_at(&self, position: Position) -> Option<&Spawn> {
        self.spawns.iter().find(|spawn| spawn.position == position)
    }
}
