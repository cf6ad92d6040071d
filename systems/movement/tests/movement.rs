use std::time::Duration;

use glam::Vec2;
use tower_defence_core::{Command, EnemyState, Event, SimulationConfig};
use tower_defence_system_movement::{Config, Movement};
use tower_defence_world::{self as world, query, Level, World};

// Three path tiles between the entrance and the corner, then down to the exit.
const CORNER: [[u8; 5]; 5] = [
    [2, 1, 1, 1, 2],
    [0, 0, 0, 0, 1],
    [0, 0, 0, 0, 1],
    [0, 0, 0, 0, 1],
    [0, 0, 0, 0, 2],
];

fn world_with_enemy() -> World {
    let level = Level::from_codes(&CORNER, tower_defence_core::CellCoord::new(0, 0), 16.0)
        .expect("valid level");
    let mut world = World::new(level, SimulationConfig::default()).expect("valid world");
    let mut events = Vec::new();
    world::apply(&mut world, Command::SpawnEnemy, &mut events);
    world
}

fn advance(world: &mut World, movement: &Movement, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    movement.handle(
        &events,
        &query::enemy_view(world),
        query::waypoint_centers(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn single_tick_capture_snaps_to_the_next_centre() {
    let mut world = world_with_enemy();
    let movement = Movement::new(Config::new(256.0, 4.0));

    let events = advance(&mut world, &movement, Duration::from_millis(250));

    let enemy = query::enemy_view(&world).into_vec()[0];
    assert_eq!(
        enemy.state,
        EnemyState::Traveling {
            current: 1,
            next: 2
        }
    );
    assert_eq!(enemy.position, Vec2::new(72.0, 8.0));
    assert!(events.contains(&Event::EnemyReachedWaypoint {
        enemy: enemy.id,
        waypoint: 1,
    }));
}

#[test]
fn enemies_walk_the_route_in_order_and_reach_the_end() {
    let mut world = world_with_enemy();
    let movement = Movement::new(Config::new(64.0, 4.0));
    let mut visited = Vec::new();
    let mut reached_end = false;

    for _ in 0..16 {
        for event in advance(&mut world, &movement, Duration::from_millis(125)) {
            match event {
                Event::EnemyReachedWaypoint { waypoint, .. } => visited.push(waypoint),
                Event::EnemyReachedEnd { .. } => reached_end = true,
                _ => {}
            }
        }
    }

    assert_eq!(visited, vec![1]);
    assert!(reached_end);
    let enemy = query::enemy_view(&world).into_vec()[0];
    assert_eq!(enemy.state, EnemyState::Reached);
}
