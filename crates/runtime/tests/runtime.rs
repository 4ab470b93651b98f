use std::time::Duration;

use game_core::{
    Direction, Entity, EntityKind, GameConfig, GameEngine, GameEvent, Grid, PlayerInput, Position,
    TileKind, World,
};
use runtime::{
    ClockEvent, Event, LifecycleEvent, Runtime, RuntimeConfig, RuntimeError, ScriptedInputProvider,
    Topic,
};
use tokio::sync::broadcast;
use tokio::time::timeout;

fn config() -> RuntimeConfig {
    RuntimeConfig {
        game_config: GameConfig {
            tick_length: 3,
            ..GameConfig::with_seed(77)
        },
        frame_interval: Duration::from_millis(2),
        reset_delay_frames: 3,
        ..RuntimeConfig::default()
    }
}

fn arena() -> World {
    let mut grid = Grid::new(16, 16);
    for y in 2..14 {
        for x in 2..14 {
            grid.set_tile(Position::new(x, y), TileKind::Grass);
        }
    }
    let mut world = World::new(grid);
    let spawn = Position::new(5, 5);
    world.add_entity(Entity::new(EntityKind::Warlock, spawn), spawn);
    world
}

async fn next_matching(
    rx: &mut broadcast::Receiver<Event>,
    mut predicate: impl FnMut(&Event) -> bool,
) -> Event {
    timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("event bus closed");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn generated_level_is_announced_and_queryable() {
    let runtime = Runtime::builder().config(config()).build().unwrap();
    let handle = runtime.handle();

    let snapshot = handle.query_snapshot().await.unwrap();
    assert!(snapshot.room_count > 0);
    assert!(snapshot.can_tick);
    assert!(snapshot.player().is_some());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn submitted_move_runs_a_tick_and_reopens_the_gate() {
    let config = config();
    let engine = GameEngine::from_world(config.game_config.clone(), arena()).unwrap();
    let runtime = Runtime::builder()
        .config(config)
        .engine(engine)
        .build()
        .unwrap();
    let handle = runtime.handle();
    let mut clock = handle.subscribe(Topic::Clock);

    handle
        .submit_input(PlayerInput::Move(Direction::Right))
        .await
        .unwrap();
    next_matching(&mut clock, |event| {
        matches!(event, Event::Clock(ClockEvent::TickStarted { .. }))
    })
    .await;
    next_matching(&mut clock, |event| {
        matches!(event, Event::Clock(ClockEvent::TickReady { .. }))
    })
    .await;

    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.tick.0, 1);
    assert_eq!(snapshot.player().unwrap().position, Position::new(6, 5));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn input_is_refused_while_a_tick_runs() {
    let mut config = config();
    // long enough that the second submit lands inside the first tick
    config.game_config.tick_length = 10_000;
    let engine = GameEngine::from_world(config.game_config.clone(), arena()).unwrap();
    let runtime = Runtime::builder()
        .config(config)
        .engine(engine)
        .build()
        .unwrap();
    let handle = runtime.handle();

    handle.submit_input(PlayerInput::Wait).await.unwrap();
    let err = handle.submit_input(PlayerInput::Wait).await.unwrap_err();
    assert!(matches!(err, RuntimeError::InputRefused(_)));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn warlock_death_schedules_a_reset() {
    let config = config();
    let mut world = arena();
    world.player_mut().unwrap().health = 0.001;
    let flower = world.add_entity(
        Entity::new(EntityKind::Flower, Position::new(6, 5)),
        Position::new(6, 5),
    );
    world.entity_mut(flower).unwrap().queue_move(Direction::Left);
    let engine = GameEngine::from_world(config.game_config.clone(), world).unwrap();

    let runtime = Runtime::builder()
        .config(config)
        .engine(engine)
        .build()
        .unwrap();
    let handle = runtime.handle();
    let mut game = handle.subscribe(Topic::Game);
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    handle
        .submit_input(PlayerInput::Move(Direction::Right))
        .await
        .unwrap();

    next_matching(&mut game, |event| {
        matches!(
            event,
            Event::Game {
                event: GameEvent::PlayerDestroyed { .. },
                ..
            }
        )
    })
    .await;
    let scheduled = next_matching(&mut lifecycle, |event| {
        matches!(event, Event::Lifecycle(LifecycleEvent::ResetScheduled { .. }))
    })
    .await;
    assert!(matches!(
        scheduled,
        Event::Lifecycle(LifecycleEvent::ResetScheduled { delay_frames: 3, .. })
    ));

    let err = handle.submit_input(PlayerInput::Wait).await.unwrap_err();
    assert!(matches!(err, RuntimeError::InputRefused(_)));

    next_matching(&mut lifecycle, |event| {
        matches!(event, Event::Lifecycle(LifecycleEvent::Reset))
    })
    .await;
    next_matching(&mut lifecycle, |event| {
        matches!(event, Event::Lifecycle(LifecycleEvent::LevelStarted { .. }))
    })
    .await;

    let snapshot = handle.query_snapshot().await.unwrap();
    assert!(snapshot.player().is_some_and(|player| player.health > 0.0));
    assert!(snapshot.room_count > 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn manual_reset_regenerates_the_level() {
    let runtime = Runtime::builder().config(config()).build().unwrap();
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    handle.reset().await.unwrap();
    next_matching(&mut lifecycle, |event| {
        matches!(event, Event::Lifecycle(LifecycleEvent::Reset))
    })
    .await;

    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.tick.0, 0);
    assert!(snapshot.can_tick);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn step_feeds_the_input_provider() {
    let config = config();
    let engine = GameEngine::from_world(config.game_config.clone(), arena()).unwrap();
    let runtime = Runtime::builder()
        .config(config)
        .engine(engine)
        .input_provider(ScriptedInputProvider::new([PlayerInput::Move(Direction::Down)]))
        .build()
        .unwrap();
    let handle = runtime.handle();
    let mut clock = handle.subscribe(Topic::Clock);

    assert!(runtime.step().await.unwrap());
    next_matching(&mut clock, |event| {
        matches!(event, Event::Clock(ClockEvent::TickReady { .. }))
    })
    .await;
    // script exhausted
    assert!(!runtime.step().await.unwrap());

    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.player().unwrap().position, Position::new(5, 6));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_the_worker() {
    let runtime = Runtime::builder().config(config()).build().unwrap();
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    runtime.shutdown().await.unwrap();
    next_matching(&mut lifecycle, |event| {
        matches!(event, Event::Lifecycle(LifecycleEvent::Stopped))
    })
    .await;
    assert!(matches!(
        handle.query_snapshot().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}
