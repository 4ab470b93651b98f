use std::collections::BTreeMap;

use tracing::trace;

use crate::collision::{Blocker, BlockerFilter, CollisionView, Occupant};
use crate::dungeon::Room;
use crate::entity::Entity;
use crate::grid::Grid;
use crate::state::{EntityId, Position};

/// Grid, rooms and entities of the current level.
///
/// Entities are keyed by id so every pass walks them in the same order.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    grid: Grid,
    rooms: Vec<Room>,
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
    damage_reports_silenced: bool,
}

impl World {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            rooms: Vec::new(),
            entities: BTreeMap::new(),
            next_id: 0,
            damage_reports_silenced: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub(crate) fn set_rooms(&mut self, rooms: Vec<Room>) {
        self.rooms = rooms;
    }

    pub(crate) fn rooms_mut(&mut self) -> &mut [Room] {
        &mut self.rooms
    }

    /// Places `entity` at `position` and returns its new id.
    ///
    /// Ids are never reused; the first entity added to a fresh world is
    /// [`EntityId::PLAYER`].
    pub fn add_entity(&mut self, mut entity: Entity, position: Position) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.position = position;
        trace!(%id, kind = %entity.kind, %position, "entity added");
        self.entities.insert(id, entity);
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// The grid alongside one mutable entity, for hooks that read terrain.
    pub(crate) fn grid_and_entity_mut(&mut self, id: EntityId) -> Option<(&Grid, &mut Entity)> {
        let entity = self.entities.get_mut(&id)?;
        Some((&self.grid, entity))
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entity(EntityId::PLAYER)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entity_mut(EntityId::PLAYER)
    }

    /// All entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, entity)| (*id, entity))
    }

    pub(crate) fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Removes every entity except the player and returns them.
    pub fn erase_non_players(&mut self) -> Vec<(EntityId, Entity)> {
        let others: Vec<EntityId> = self
            .entities
            .keys()
            .copied()
            .filter(|id| !id.is_player())
            .collect();
        others
            .into_iter()
            .filter_map(|id| self.entities.remove(&id).map(|entity| (id, entity)))
            .collect()
    }

    pub fn silence_damage_reports(&mut self) {
        self.damage_reports_silenced = true;
    }

    pub fn damage_reports_silenced(&self) -> bool {
        self.damage_reports_silenced
    }

    /// Snapshot of every entity for collision queries.
    pub fn collision_view(&self) -> CollisionView {
        CollisionView::capture(self.entities())
    }

    // ===== live queries =====

    pub fn blocker_at(
        &self,
        position: Position,
        exclude: Option<EntityId>,
        filter: BlockerFilter,
    ) -> Option<Blocker> {
        self.collision_view()
            .blocker_at(&self.grid, position, exclude, filter)
    }

    pub fn entity_at(
        &self,
        position: Position,
        exclude: Option<EntityId>,
        use_in_flight: bool,
    ) -> Option<Occupant> {
        self.collision_view()
            .entity_at(position, exclude, use_in_flight)
            .cloned()
    }

    pub fn corpse_at(&self, position: Position) -> Option<EntityId> {
        self.collision_view()
            .corpse_at(position)
            .map(|corpse| corpse.id)
    }
}
