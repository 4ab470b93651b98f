//! Tile and entity blocking queries.
//!
//! Queries run against a [`CollisionView`]: a copy of every entity's
//! position and claimed tiles taken at one instant. The tick pass captures
//! one view after all intents are declared and resolves every entity
//! against it, so the order entities are processed in is not observable.

use crate::entity::{Allegiance, Entity, EntityKind};
use crate::grid::{Grid, TileKind};
use crate::state::{EntityId, Position};

/// What stands in the way of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blocker {
    Tile(TileKind),
    Entity {
        id: EntityId,
        kind: EntityKind,
        allegiance: Allegiance,
    },
}

/// Entities a mover does not collide with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockerFilter {
    ignore_entities: bool,
    ignored_kinds: &'static [EntityKind],
}

impl BlockerFilter {
    /// Blocked by tiles and every living entity.
    pub const ALL: Self = Self {
        ignore_entities: false,
        ignored_kinds: &[],
    };

    /// Blocked by tiles only.
    pub const TILES_ONLY: Self = Self {
        ignore_entities: true,
        ignored_kinds: &[],
    };

    pub const fn ignoring(kinds: &'static [EntityKind]) -> Self {
        Self {
            ignore_entities: false,
            ignored_kinds: kinds,
        }
    }

    pub fn ignores(&self, kind: EntityKind) -> bool {
        self.ignore_entities || self.ignored_kinds.contains(&kind)
    }
}

impl Default for BlockerFilter {
    fn default() -> Self {
        Self::ALL
    }
}

/// One entity as seen by a [`CollisionView`].
#[derive(Clone, Debug, PartialEq)]
pub struct Occupant {
    pub id: EntityId,
    pub kind: EntityKind,
    pub allegiance: Allegiance,
    pub alive: bool,
    pub magic: f64,
    pub position: Position,
    /// Destination of a committed move.
    pub in_flight: Option<Position>,
    /// Declared intent or queue head, when nothing is committed.
    pub pending: Option<Position>,
    /// Explicit claimed tiles, replacing position and destination.
    pub footprint: Option<Vec<Position>>,
}

impl Occupant {
    pub fn capture(id: EntityId, entity: &Entity) -> Self {
        Self {
            id,
            kind: entity.kind,
            allegiance: entity.allegiance,
            alive: entity.is_alive(),
            magic: entity.magic,
            position: entity.position,
            in_flight: entity.in_flight_destination(),
            pending: entity.pending_destination(),
            footprint: entity.footprint(),
        }
    }

    /// Whether `position` is one of the tiles this entity claims.
    pub fn reserves(&self, position: Position) -> bool {
        match &self.footprint {
            Some(tiles) => tiles.contains(&position),
            None => {
                self.position == position || self.in_flight.or(self.pending) == Some(position)
            }
        }
    }

    /// Tile the entity is on, or heading to when `use_in_flight` is set.
    pub fn location(&self, use_in_flight: bool) -> Position {
        if use_in_flight {
            self.in_flight.unwrap_or(self.position)
        } else {
            self.position
        }
    }
}

/// Immutable picture of all entities, ordered by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionView {
    occupants: Vec<Occupant>,
}

impl CollisionView {
    pub fn capture<'a>(entities: impl IntoIterator<Item = (EntityId, &'a Entity)>) -> Self {
        let mut occupants: Vec<_> = entities
            .into_iter()
            .map(|(id, entity)| Occupant::capture(id, entity))
            .collect();
        occupants.sort_by_key(|occupant| occupant.id);
        Self { occupants }
    }

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn get(&self, id: EntityId) -> Option<&Occupant> {
        self.occupants
            .binary_search_by_key(&id, |occupant| occupant.id)
            .ok()
            .map(|index| &self.occupants[index])
    }

    /// Unwalkable tile at `position`, else the first living, non-excluded,
    /// non-ignored entity reserving it.
    pub fn blocker_at(
        &self,
        grid: &Grid,
        position: Position,
        exclude: Option<EntityId>,
        filter: BlockerFilter,
    ) -> Option<Blocker> {
        let tile = grid.tile(position);
        if !tile.is_walkable() {
            return Some(Blocker::Tile(tile));
        }
        self.occupants
            .iter()
            .filter(|occupant| Some(occupant.id) != exclude)
            .filter(|occupant| occupant.alive && !filter.ignores(occupant.kind))
            .find(|occupant| occupant.reserves(position))
            .map(|occupant| Blocker::Entity {
                id: occupant.id,
                kind: occupant.kind,
                allegiance: occupant.allegiance,
            })
    }

    /// Every entity, alive or dead, standing on `position`.
    pub fn entities_at(&self, position: Position) -> impl Iterator<Item = &Occupant> + '_ {
        self.occupants
            .iter()
            .filter(move |occupant| occupant.position == position)
    }

    /// First entity at `position` other than `exclude`.
    pub fn entity_at(
        &self,
        position: Position,
        exclude: Option<EntityId>,
        use_in_flight: bool,
    ) -> Option<&Occupant> {
        self.occupants.iter().find(|occupant| {
            Some(occupant.id) != exclude && occupant.location(use_in_flight) == position
        })
    }

    /// First dead entity lying on `position`.
    pub fn corpse_at(&self, position: Position) -> Option<&Occupant> {
        self.occupants
            .iter()
            .find(|occupant| !occupant.alive && occupant.position == position)
    }

    /// Position of the closest living entity of `kind` within `radius`
    /// (average-axis distance). Ties keep the lower id.
    pub fn nearest(
        &self,
        kind: EntityKind,
        from: Position,
        radius: f64,
        exclude: EntityId,
    ) -> Option<Position> {
        let mut best: Option<(f64, Position)> = None;
        for occupant in &self.occupants {
            if occupant.id == exclude || occupant.kind != kind || !occupant.alive {
                continue;
            }
            let distance = from.average_distance(occupant.position);
            if distance > radius {
                continue;
            }
            if best.is_none_or(|(closest, _)| distance < closest) {
                best = Some((distance, occupant.position));
            }
        }
        best.map(|(_, position)| position)
    }
}
