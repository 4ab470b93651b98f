//! Asynchronous abstraction for sourcing player input.
//!
//! Runtime users plug in [`InputProvider`] implementations so the simulation
//! can run with human input, scripted fixtures, or an autopilot.
use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use game_core::{AbilityKind, GameRng, GameSnapshot, PlayerInput};

use super::errors::Result;

/// Trait for providing player input based on the current snapshot.
///
/// Asked once per frame while the tick gate is open. Returning `None` lets
/// the world stand still; the simulation only ticks on input.
#[async_trait]
pub trait InputProvider: Send + Sync {
    async fn next_input(&self, snapshot: &GameSnapshot) -> Result<Option<PlayerInput>>;
}

/// Never acts. Useful for tests or as a fallback.
pub struct IdleInputProvider;

#[async_trait]
impl InputProvider for IdleInputProvider {
    async fn next_input(&self, _snapshot: &GameSnapshot) -> Result<Option<PlayerInput>> {
        Ok(None)
    }
}

/// Replays a fixed list of inputs, then idles.
pub struct ScriptedInputProvider {
    inputs: Mutex<VecDeque<PlayerInput>>,
}

impl ScriptedInputProvider {
    pub fn new(inputs: impl IntoIterator<Item = PlayerInput>) -> Self {
        Self {
            inputs: Mutex::new(inputs.into_iter().collect()),
        }
    }
}

#[async_trait]
impl InputProvider for ScriptedInputProvider {
    async fn next_input(&self, _snapshot: &GameSnapshot) -> Result<Option<PlayerInput>> {
        Ok(self.inputs.lock().await.pop_front())
    }
}

/// Autopilot: acts on a fraction of open frames, wandering at random and
/// casting whatever it can afford.
pub struct WanderInputProvider {
    chance: f64,
    rng: Mutex<GameRng>,
}

impl WanderInputProvider {
    pub fn new(seed: u64, chance: f64) -> Self {
        Self {
            chance: chance.clamp(0.0, 1.0),
            rng: Mutex::new(GameRng::seed_from_u64(seed)),
        }
    }

    fn choose(snapshot: &GameSnapshot, rng: &mut GameRng) -> PlayerInput {
        let hurt = snapshot
            .player()
            .is_some_and(|player| player.health < player.max_health / 2.0);
        let affordable: Vec<usize> = snapshot
            .abilities
            .iter()
            .enumerate()
            .filter(|(_, kind)| kind.cost() <= snapshot.magic)
            .filter(|(_, kind)| **kind != AbilityKind::Heal || hurt)
            .map(|(slot, _)| slot)
            .collect();

        if hurt && affordable.first() == Some(&0) {
            return PlayerInput::UseAbility(0);
        }
        if !affordable.is_empty()
            && rng.chance(0.1)
            && let Some(&slot) = rng.pick(&affordable)
        {
            return PlayerInput::UseAbility(slot);
        }
        if rng.chance(0.1) {
            return PlayerInput::Wait;
        }
        PlayerInput::Move(rng.direction())
    }
}

#[async_trait]
impl InputProvider for WanderInputProvider {
    async fn next_input(&self, snapshot: &GameSnapshot) -> Result<Option<PlayerInput>> {
        let mut rng = self.rng.lock().await;
        if !rng.chance(self.chance) {
            return Ok(None);
        }
        Ok(Some(Self::choose(snapshot, &mut rng)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Direction, Entity, EntityKind, GameConfig, GameEngine, Grid, Position, World};

    fn snapshot() -> GameSnapshot {
        let mut world = World::new(Grid::new(16, 16));
        world.add_entity(Entity::new(EntityKind::Warlock, Position::new(8, 8)), Position::new(8, 8));
        GameEngine::from_world(GameConfig::default(), world)
            .unwrap()
            .snapshot()
    }

    #[tokio::test]
    async fn idle_never_acts() {
        assert_eq!(IdleInputProvider.next_input(&snapshot()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn scripted_replays_in_order() {
        let provider =
            ScriptedInputProvider::new([PlayerInput::Wait, PlayerInput::Move(Direction::Up)]);
        let snapshot = snapshot();
        assert_eq!(provider.next_input(&snapshot).await.unwrap(), Some(PlayerInput::Wait));
        assert_eq!(
            provider.next_input(&snapshot).await.unwrap(),
            Some(PlayerInput::Move(Direction::Up))
        );
        assert_eq!(provider.next_input(&snapshot).await.unwrap(), None);
    }

    #[tokio::test]
    async fn wander_without_abilities_only_moves_or_waits() {
        let provider = WanderInputProvider::new(9, 1.0);
        let snapshot = snapshot();
        for _ in 0..50 {
            let input = provider.next_input(&snapshot).await.unwrap();
            assert!(matches!(
                input,
                Some(PlayerInput::Move(_)) | Some(PlayerInput::Wait)
            ));
        }
    }

    #[tokio::test]
    async fn wander_heals_when_hurt() {
        let mut snapshot = snapshot();
        snapshot.abilities = vec![AbilityKind::Heal];
        snapshot.magic = 10.0;
        if let Some(player) = snapshot.entities.first_mut() {
            player.health = 2.0;
        }
        let provider = WanderInputProvider::new(1, 1.0);
        assert_eq!(
            provider.next_input(&snapshot).await.unwrap(),
            Some(PlayerInput::UseAbility(0))
        );
    }
}
