#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that advances projectiles and resolves their collisions.

use std::time::Duration;

use glam::Vec2;
use tower_defence_core::{
    Command, EnemySnapshot, EnemyView, Event, ProjectileView, SimulationConfig,
};

/// Configuration parameters required to construct the projectile system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    projectile_radius: f32,
    enemy_radius: f32,
    max_lifetime: Duration,
}

impl Config {
    /// Creates a configuration from both collision radii and the time after
    /// which an unspent projectile expires.
    #[must_use]
    pub const fn new(projectile_radius: f32, enemy_radius: f32, max_lifetime: Duration) -> Self {
        Self {
            projectile_radius,
            enemy_radius,
            max_lifetime,
        }
    }
}

impl From<&SimulationConfig> for Config {
    fn from(config: &SimulationConfig) -> Self {
        Self::new(
            config.projectile.radius,
            config.enemy.radius,
            config.projectile.max_lifetime(),
        )
    }
}

/// Projectile system emitting movement, expiry and hit commands.
#[derive(Debug)]
pub struct Projectiles {
    config: Config,
}

impl Projectiles {
    /// Creates a new projectile system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes the tick's events and immutable views to emit projectile
    /// commands.
    ///
    /// Every active projectile moves along its launch direction and ages by
    /// the elapsed time. The first enemy in collection order whose circle
    /// overlaps the projectile's receives the hit, and no further enemies are
    /// tested for that projectile. A projectile that reaches its maximum
    /// lifetime is marked expired after the scan, so it can still land a hit
    /// on that tick.
    ///
    /// Enemies are tested as they appear in `enemies`, including ones already
    /// lethally damaged earlier in the tick; removal is left to compaction.
    pub fn handle(
        &self,
        events: &[Event],
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        if dt.is_zero() {
            return;
        }

        for projectile in projectiles.iter().filter(|projectile| projectile.is_active()) {
            let position =
                projectile.position + projectile.direction * projectile.speed * dt.as_secs_f32();
            let lifetime = projectile.lifetime.saturating_add(dt);
            out.push(Command::MoveProjectile {
                projectile: projectile.id,
                position,
                lifetime,
            });

            if let Some(enemy) = self.first_overlap(position, enemies) {
                out.push(Command::HitEnemy {
                    projectile: projectile.id,
                    enemy: enemy.id,
                });
            }

            if lifetime >= self.config.max_lifetime {
                out.push(Command::ExpireProjectile {
                    projectile: projectile.id,
                });
            }
        }
    }

    fn first_overlap<'a>(
        &self,
        position: Vec2,
        enemies: &'a EnemyView,
    ) -> Option<&'a EnemySnapshot> {
        let reach = self.config.projectile_radius + self.config.enemy_radius;
        enemies
            .iter()
            .find(|enemy| enemy.position.distance_squared(position) <= reach * reach)
    }
}
