#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Tower Defence simulation.
//!
//! The world owns the live enemy and projectile collections, the turrets and
//! the static level data. Every mutation goes through [`apply`]; everything
//! else reads the state through the [`query`] module.

mod grid;
mod level;
mod navigation;
mod turrets;

use std::time::Duration;

use glam::Vec2;
use log::{debug, info};
use tower_defence_core::{
    Command, EnemyId, EnemyRemoval, EnemyState, Event, Health, ProjectileId, ProjectileRemoval,
    SimulationConfig, TurretId,
};

pub use grid::{CellBounds, Grid};
pub use level::{Level, LevelError};
pub use navigation::{extract_route, Route};

use turrets::TurretRegistry;

/// Represents the authoritative Tower Defence world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    route: Route,
    config: SimulationConfig,
    turrets: TurretRegistry,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    next_enemy_id: u32,
    next_projectile_id: u32,
    total_spawned: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world for the level, discovering the route and placing a
    /// turret on every turret slot.
    ///
    /// Fails when fewer than two waypoints are reachable from the level's
    /// start cell.
    pub fn new(level: Level, config: SimulationConfig) -> Result<Self, LevelError> {
        let (grid, start) = level.into_parts();
        let route = extract_route(&grid, start)?;
        let turrets = TurretRegistry::from_grid(&grid, &config.turret);

        info!(
            "world ready: {}x{} grid, {} waypoints, {} turrets",
            grid.dimension(),
            grid.dimension(),
            route.len(),
            turrets.len()
        );

        Ok(Self {
            grid,
            route,
            config,
            turrets,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_enemy_id: 0,
            next_projectile_id: 0,
            total_spawned: 0,
            tick_index: 0,
        })
    }

    fn enemy_index(&self, id: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.id == id)
    }

    fn projectile_index(&self, id: ProjectileId) -> Option<usize> {
        self.projectiles
            .iter()
            .position(|projectile| projectile.id == id)
    }

    fn spawn_enemy(&mut self, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.total_spawned = self.total_spawned.saturating_add(1);

        let position = self.route.entrance();
        self.enemies.push(Enemy {
            id,
            position,
            health: Health::new(self.config.enemy.health),
            state: EnemyState::DEPARTING,
        });

        debug!("enemy {} spawned at {position}", id.get());
        out_events.push(Event::EnemySpawned {
            enemy: id,
            position,
        });
    }

    fn move_enemy(
        &mut self,
        id: EnemyId,
        position: Vec2,
        state: EnemyState,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self.enemy_index(id) else {
            return;
        };
        let enemy = &mut self.enemies[index];
        let EnemyState::Traveling { current: before, .. } = enemy.state else {
            return;
        };

        enemy.position = position;
        enemy.state = state;

        match state {
            EnemyState::Traveling { current, .. } if current > before => {
                out_events.push(Event::EnemyReachedWaypoint {
                    enemy: id,
                    waypoint: current,
                });
            }
            EnemyState::Reached => {
                debug!("enemy {} reached the end of the route", id.get());
                out_events.push(Event::EnemyReachedEnd { enemy: id });
            }
            _ => {}
        }
    }

    fn fire_projectile(
        &mut self,
        turret_id: TurretId,
        target: EnemyId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(target_position) = self
            .enemy_index(target)
            .map(|index| self.enemies[index].position)
        else {
            return;
        };
        let Some(turret) = self.turrets.get_mut(turret_id) else {
            return;
        };
        if !turret.is_ready() {
            return;
        }

        turret.cooldown = Duration::ZERO;
        let origin = turret.position;
        let direction = (target_position - origin).normalize_or_zero();

        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            position: origin,
            direction,
            speed: self.config.projectile.speed,
            lifetime: Duration::ZERO,
            enabled: true,
            expired: false,
        });

        debug!(
            "turret {} fired projectile {} at enemy {}",
            turret_id.get(),
            id.get(),
            target.get()
        );
        out_events.push(Event::ProjectileFired {
            projectile: id,
            turret: turret_id,
            target,
            direction,
        });
    }

    fn hit_enemy(
        &mut self,
        projectile_id: ProjectileId,
        enemy_id: EnemyId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(projectile_index) = self.projectile_index(projectile_id) else {
            return;
        };
        let Some(enemy_index) = self.enemy_index(enemy_id) else {
            return;
        };

        let projectile = &mut self.projectiles[projectile_index];
        if !projectile.enabled {
            return;
        }
        projectile.enabled = false;

        let enemy = &mut self.enemies[enemy_index];
        enemy.health = enemy.health.damaged(1);
        if enemy.health.is_depleted() && enemy.state.is_traveling() {
            enemy.state = EnemyState::Dead;
        }

        out_events.push(Event::EnemyDamaged {
            enemy: enemy_id,
            projectile: projectile_id,
            remaining: enemy.health,
        });
    }

    fn compact(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.retain(|enemy| {
            let cause = match enemy.state {
                EnemyState::Traveling { .. } => return true,
                EnemyState::Dead => EnemyRemoval::Killed,
                EnemyState::Reached => EnemyRemoval::Leaked,
            };
            debug!("enemy {} removed: {cause:?}", enemy.id.get());
            out_events.push(Event::EnemyRemoved {
                enemy: enemy.id,
                cause,
            });
            false
        });

        self.projectiles.retain(|projectile| {
            let cause = if !projectile.enabled {
                ProjectileRemoval::Hit
            } else if projectile.expired {
                ProjectileRemoval::Expired
            } else {
                return true;
            };
            out_events.push(Event::ProjectileRemoved {
                projectile: projectile.id,
                cause,
            });
            false
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that reference unknown enemies, turrets or projectiles are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.turrets.charge(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SpawnEnemy => world.spawn_enemy(out_events),
        Command::MoveEnemy {
            enemy,
            position,
            state,
        } => world.move_enemy(enemy, position, state, out_events),
        Command::FireProjectile { turret, target } => {
            world.fire_projectile(turret, target, out_events);
        }
        Command::MoveProjectile {
            projectile,
            position,
            lifetime,
        } => {
            if let Some(index) = world.projectile_index(projectile) {
                let projectile = &mut world.projectiles[index];
                projectile.position = position;
                projectile.lifetime = lifetime;
            }
        }
        Command::ExpireProjectile { projectile } => {
            if let Some(index) = world.projectile_index(projectile) {
                world.projectiles[index].expired = true;
            }
        }
        Command::HitEnemy { projectile, enemy } => world.hit_enemy(projectile, enemy, out_events),
        Command::Compact => world.compact(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use tower_defence_core::{
        EnemySnapshot, EnemyView, ProjectileSnapshot, ProjectileView, SimulationConfig,
        SimulationCounters, TurretView,
    };

    use super::{Grid, Route, World};

    /// Provides read-only access to the level grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the route enemies follow.
    #[must_use]
    pub fn route(world: &World) -> &Route {
        &world.route
    }

    /// World-space centres of the route's waypoints in travel order.
    #[must_use]
    pub fn waypoint_centers(world: &World) -> &[Vec2] {
        world.route.centers()
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of enemies created since the world was built.
    #[must_use]
    pub fn total_spawned(world: &World) -> u32 {
        world.total_spawned
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    health: enemy.health,
                    state: enemy.state,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every turret.
    #[must_use]
    pub fn turret_view(world: &World) -> TurretView {
        TurretView::from_snapshots(world.turrets.snapshots())
    }

    /// Captures a read-only view of the live projectiles.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    direction: projectile.direction,
                    speed: projectile.speed,
                    lifetime: projectile.lifetime,
                    enabled: projectile.enabled,
                    expired: projectile.expired,
                })
                .collect(),
        )
    }

    /// Scalar counters describing the live collections.
    #[must_use]
    pub fn counters(world: &World) -> SimulationCounters {
        SimulationCounters {
            live_enemies: world.enemies.len(),
            live_projectiles: world.projectiles.len(),
            total_spawned: world.total_spawned,
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: Vec2,
    health: Health,
    state: EnemyState,
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Vec2,
    direction: Vec2,
    speed: f32,
    lifetime: Duration,
    enabled: bool,
    expired: bool,
}
