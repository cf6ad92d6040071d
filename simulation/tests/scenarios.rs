use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use tower_defence_core::{
    CellCoord, EnemyId, EnemyRemoval, EnemyState, Event, ProjectileRemoval, SimulationConfig,
    TurretId,
};
use tower_defence_simulation::Simulation;
use tower_defence_world::Level;

// Three path tiles between the entrance and the corner, then down to the exit.
const CORNER: [[u8; 5]; 5] = [
    [2, 1, 1, 1, 2],
    [0, 0, 0, 0, 1],
    [0, 0, 0, 0, 1],
    [0, 0, 0, 0, 1],
    [0, 0, 0, 0, 2],
];

fn corner(config: SimulationConfig) -> Simulation {
    let level = Level::from_codes(&CORNER, CellCoord::new(0, 0), config.tile_length)
        .expect("valid level");
    Simulation::new(level, config).expect("valid simulation")
}

#[test]
fn capture_after_one_advance_snaps_to_the_next_centre() {
    let mut config = SimulationConfig::default();
    config.tile_length = 16.0;
    config.spawn.interval_secs = 0.25;
    config.enemy.speed = 256.0;
    let mut simulation = corner(config);

    let _ = simulation.advance(Duration::from_millis(250));

    let enemy = simulation.enemies().into_vec()[0];
    assert_eq!(
        enemy.state,
        EnemyState::Traveling {
            current: 1,
            next: 2
        }
    );
    assert_eq!(enemy.position, simulation.route().centers()[1]);
    assert_eq!(enemy.position, Vec2::new(72.0, 8.0));
}

#[test]
fn ready_turret_fires_one_projectile_from_its_own_position() {
    let entrance = Vec2::new(40.0, 40.0);
    let turret = Vec2::new(120.0, 120.0);

    let mut config = SimulationConfig::default();
    config.spawn.interval_secs = 0.5;
    config.enemy.speed = 0.0;
    config.turret.range = turret.distance(entrance) + 1.0;
    config.turret.fire_interval_secs = 0.5;
    let mut simulation = Simulation::classic(config).expect("valid simulation");

    let events = simulation.advance(Duration::from_millis(500)).to_vec();

    let projectiles = simulation.projectiles().into_vec();
    assert_eq!(projectiles.len(), 1);
    assert_eq!(projectiles[0].position, turret);
    assert!((projectiles[0].direction - (entrance - turret).normalize()).length() < 1e-6);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ProjectileFired {
            turret: id,
            target,
            ..
        } if *id == TurretId::new(0) && *target == EnemyId::new(0)
    )));
}

#[test]
fn spawn_cap_counts_all_time_spawns() {
    let mut config = SimulationConfig::default();
    config.spawn.cap = 3;
    config.spawn.interval_secs = 1.0;
    let mut simulation = Simulation::classic(config).expect("valid simulation");

    for _ in 0..5 {
        let _ = simulation.advance(Duration::from_secs(1));
    }
    assert_eq!(simulation.counters().total_spawned, 3);

    for _ in 0..20 {
        let _ = simulation.advance(Duration::from_secs(1));
    }
    assert_eq!(simulation.counters().total_spawned, 3);
}

#[test]
fn projectiles_that_outlive_their_lifetime_deal_no_damage() {
    let mut config = SimulationConfig::default();
    config.spawn.interval_secs = 0.25;
    config.spawn.cap = 1;
    config.enemy.speed = 0.0;
    config.enemy.radius = 0.0;
    config.projectile.speed = 0.0;
    config.projectile.radius = 0.0;
    let mut simulation = Simulation::classic(config).expect("valid simulation");

    let mut expired = 0;
    for _ in 0..16 {
        for event in simulation.advance(Duration::from_millis(250)) {
            assert!(!matches!(event, Event::EnemyDamaged { .. }));
            if let Event::ProjectileRemoved {
                cause: ProjectileRemoval::Expired,
                ..
            } = event
            {
                expired += 1;
            }
        }
    }

    assert!(expired > 0);
    assert_eq!(simulation.enemies().into_vec()[0].health.get(), 3);
}

#[test]
fn each_hit_deals_exactly_one_damage() {
    let mut simulation = Simulation::classic(SimulationConfig::default()).expect("valid");
    let mut damage_per_projectile = BTreeMap::new();
    let mut hits = Vec::new();

    for _ in 0..600 {
        for event in simulation.advance(Duration::from_millis(20)) {
            match *event {
                Event::EnemyDamaged { projectile, .. } => {
                    *damage_per_projectile.entry(projectile).or_insert(0) += 1;
                }
                Event::ProjectileRemoved {
                    projectile,
                    cause: ProjectileRemoval::Hit,
                } => hits.push(projectile),
                _ => {}
            }
        }
    }

    assert!(!hits.is_empty(), "turrets should land hits on the classic level");
    assert!(damage_per_projectile.values().all(|&count| count == 1));
    assert_eq!(hits.len(), damage_per_projectile.len());
    for projectile in hits {
        assert!(damage_per_projectile.contains_key(&projectile));
    }
}

#[test]
fn health_never_increases_and_dead_enemies_leave_the_same_tick() {
    let mut config = SimulationConfig::default();
    config.enemy.health = 2;
    let mut simulation = Simulation::classic(config).expect("valid simulation");
    let mut last_health = BTreeMap::new();
    let mut kills = 0;

    for _ in 0..1_500 {
        for event in simulation.advance(Duration::from_millis(20)) {
            if let Event::EnemyRemoved {
                cause: EnemyRemoval::Killed,
                ..
            } = event
            {
                kills += 1;
            }
        }

        for enemy in simulation.enemies().iter() {
            assert!(!enemy.health.is_depleted(), "{:?} survived compaction", enemy.id);
            assert!(enemy.state.is_traveling());
            let previous = last_health.insert(enemy.id, enemy.health);
            if let Some(previous) = previous {
                assert!(enemy.health <= previous);
            }
        }
    }

    assert!(kills > 0, "turrets should kill enemies on the classic level");
}

#[test]
fn turrets_respect_their_fire_interval() {
    let mut simulation = Simulation::classic(SimulationConfig::default()).expect("valid");
    let interval = simulation.config().turret.fire_interval();
    let dt = Duration::from_micros(16_667);
    let mut elapsed = Duration::ZERO;
    let mut last_fired: BTreeMap<TurretId, Duration> = BTreeMap::new();

    for _ in 0..1_200 {
        elapsed += dt;
        for event in simulation.advance(dt) {
            if let Event::ProjectileFired { turret, .. } = *event {
                if let Some(previous) = last_fired.insert(turret, elapsed) {
                    assert!(elapsed - previous >= interval);
                }
            }
        }
    }

    assert!(!last_fired.is_empty());
}

#[test]
fn unopposed_enemies_walk_the_whole_route_and_leak() {
    let mut config = SimulationConfig::default();
    config.turret.range = 0.0;
    config.spawn.cap = 1;
    let mut simulation = Simulation::classic(config).expect("valid simulation");
    let waypoints = simulation.route().len();

    let mut visited = Vec::new();
    let mut reached_end = None;
    let mut leaked = None;
    for tick in 0..1_000 {
        for event in simulation.advance(Duration::from_millis(20)) {
            match *event {
                Event::EnemyReachedWaypoint { waypoint, .. } => visited.push(waypoint),
                Event::EnemyReachedEnd { .. } => reached_end = Some(tick),
                Event::EnemyRemoved {
                    cause: EnemyRemoval::Leaked,
                    ..
                } => leaked = Some(tick),
                _ => {}
            }
        }
    }

    assert_eq!(visited, (1..waypoints - 1).collect::<Vec<_>>());
    assert!(reached_end.is_some());
    assert_eq!(reached_end, leaked);
    assert_eq!(simulation.counters().live_enemies, 0);
}
