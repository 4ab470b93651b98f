//! Level lifecycle, tick gating and the per-frame update pass.
//!
//! The [`GameEngine`] is the only owner of simulation state. Hosts drive it
//! with three calls per rendered frame: [`GameEngine::advance_frame`], an
//! optional [`GameEngine::submit`] when the player acted, and
//! [`GameEngine::update_all`]. Everything the host should show comes back
//! through [`GameEngine::drain_events`] and [`GameEngine::snapshot`].

mod errors;
mod tick;
mod world;

pub use errors::InputError;
pub use world::World;

use tracing::{debug, info};

use crate::ability::{AbilityContext, Progression};
use crate::clock::Clock;
use crate::config::{ConfigError, GameConfig};
use crate::dungeon::DungeonGenerator;
use crate::entity::{Entity, EntityKind};
use crate::event::GameEvent;
use crate::grid::Grid;
use crate::rng::GameRng;
use crate::state::{Direction, EntitySnapshot, GameSnapshot, Position, Tick};

use tick::TickPass;

/// A committed player action. Each accepted input starts exactly one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerInput {
    Move(Direction),
    Wait,
    /// Cast the ability in this slot (unlock order).
    UseAbility(usize),
}

pub struct GameEngine {
    config: GameConfig,
    rng: GameRng,
    world: World,
    clock: Clock,
    progression: Progression,
    events: Vec<GameEvent>,
    /// Last tick whose new-tick pass already ran.
    resolved: Tick,
    decoration_seed: u64,
}

impl GameEngine {
    /// Creates an engine with an empty world. Call [`Self::generate`] before
    /// submitting input.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: GameRng::seed_from_u64(config.seed),
            world: World::new(Grid::new(config.grid_width, config.grid_height)),
            clock: Clock::new(config.tick_length),
            progression: Progression::new(config.thresholds),
            events: Vec::new(),
            resolved: Tick::ZERO,
            decoration_seed: config.seed,
            config,
        })
    }

    /// Wraps a hand-built world, keeping whatever entities it holds.
    pub fn from_world(config: GameConfig, world: World) -> Result<Self, ConfigError> {
        let mut engine = Self::new(config)?;
        engine.world = world;
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Generates a level at the configured size.
    pub fn generate(&mut self) -> &World {
        self.generate_with_size(self.config.grid_width, self.config.grid_height)
    }

    /// Replaces grid, rooms and entities with a freshly generated level.
    ///
    /// The warlock is always [`crate::state::EntityId::PLAYER`], standing on
    /// the grid centre inside the first room. Progression is kept.
    pub fn generate_with_size(&mut self, width: u32, height: u32) -> &World {
        let mut grid = Grid::new(width, height);
        let centre = grid.center();
        let generator =
            DungeonGenerator::new(self.config.generation.clone()).with_reserved([centre]);
        let rooms = generator.generate(&mut grid, &mut self.rng);

        let mut world = World::new(grid);
        world.add_entity(Entity::new(EntityKind::Warlock, centre), centre);
        let mut rooms = rooms;
        let mut inhabitants = 0;
        for room in &mut rooms {
            for spawn in &room.spawns {
                let id = world.add_entity(Entity::new(spawn.kind, spawn.position), spawn.position);
                room.inhabitants.push(id);
                inhabitants += 1;
            }
        }
        world.set_rooms(rooms);

        self.world = world;
        self.clock.reset();
        self.resolved = self.clock.tick();
        self.decoration_seed = u64::from(self.rng.below(u32::MAX));

        info!(
            width,
            height,
            rooms = self.world.rooms().len(),
            inhabitants,
            "level generated"
        );
        self.events.push(GameEvent::LevelGenerated {
            rooms: self.world.rooms().len(),
            inhabitants,
        });
        &self.world
    }

    /// Starts over after the warlock died: level one, no abilities, new map.
    pub fn reset(&mut self) -> &World {
        self.progression.reset();
        self.generate()
    }

    pub fn can_tick(&self) -> bool {
        self.clock.can_tick()
    }

    /// Opens the next tick without any player action attached.
    pub fn request_tick(&mut self) -> bool {
        self.clock.request_tick()
    }

    pub fn player_alive(&self) -> bool {
        self.world.player().is_some_and(Entity::is_alive)
    }

    /// Applies a player action and starts a tick.
    ///
    /// Refused inputs leave the simulation untouched.
    pub fn submit(&mut self, input: PlayerInput) -> Result<(), InputError> {
        if !self.clock.can_tick() {
            return Err(InputError::GateClosed);
        }
        if !self.player_alive() {
            return Err(InputError::PlayerDead);
        }

        match input {
            PlayerInput::Move(direction) => {
                if let Some(player) = self.world.player_mut() {
                    player.queue_move(direction);
                }
            }
            PlayerInput::Wait => {}
            PlayerInput::UseAbility(slot) => {
                let ability = *self
                    .progression
                    .ability(slot)
                    .ok_or(InputError::EmptySlot { slot })?;
                let cast = ability.cast(&mut AbilityContext {
                    world: &mut self.world,
                    rng: &mut self.rng,
                    events: &mut self.events,
                });
                if !cast {
                    return Err(InputError::AbilityDeclined {
                        ability: ability.kind,
                    });
                }
            }
        }

        self.clock.request_tick();
        Ok(())
    }

    /// One rendered frame of clock time.
    pub fn advance_frame(&mut self) {
        self.clock.update();
    }

    /// Advances every entity for the current clock phase.
    ///
    /// Transitions complete on every boundary frame; the full pass runs once
    /// per requested tick, however often this is called during it.
    pub fn update_all(&mut self) {
        let level = self.progression.level();
        let pending = self.clock.is_new_tick() && self.clock.tick() != self.resolved;
        if self.clock.can_tick() || pending {
            TickPass::new(&mut self.world, &mut self.rng, &mut self.events, level)
                .complete_transitions();
        }
        if !pending {
            return;
        }
        self.resolved = self.clock.tick();

        TickPass::new(&mut self.world, &mut self.rng, &mut self.events, level).run();

        let Some(player) = self.world.player_mut() else {
            return;
        };
        if !player.is_alive() {
            return;
        }
        if let Some(level_up) = self.progression.check(player) {
            self.clock.freeze(self.config.level_up_freeze);
            self.events.push(GameEvent::LevelUp {
                level: level_up.level,
                ability: level_up.ability,
                max_health: level_up.max_health,
            });
        }
    }

    /// Convenience for hosts: one clock frame followed by the update pass.
    pub fn frame(&mut self) {
        self.advance_frame();
        self.update_all();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Stable cosmetic variant (0..4) for the tile at `position`, fixed for
    /// the lifetime of a level.
    pub fn tile_variant(&self, position: Position) -> u8 {
        let mut child = GameRng::seed_from_u64(self.decoration_seed).child_at(position);
        // below(4) always fits in a u8
        child.below(4) as u8
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let grid = self.world.grid();
        GameSnapshot {
            tick: self.clock.tick(),
            grid_width: grid.width(),
            grid_height: grid.height(),
            room_count: self.world.rooms().len(),
            can_tick: self.clock.can_tick(),
            sub_tick_percent: self.clock.sub_tick_percent(),
            level: self.progression.level(),
            magic: self.world.player().map_or(0.0, |player| player.magic),
            abilities: self
                .progression
                .abilities()
                .iter()
                .map(|ability| ability.kind)
                .collect(),
            entities: self
                .world
                .entities()
                .map(|(id, entity)| EntitySnapshot {
                    id,
                    kind: entity.kind,
                    position: entity.position,
                    direction: entity.direction,
                    state: entity.state(),
                    health: entity.health,
                    max_health: entity.max_health,
                })
                .collect(),
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("tick", &self.clock.tick())
            .field("level", &self.progression.level())
            .field("entities", &self.world.entities().count())
            .finish()
    }
}
