#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along the waypoint route.

use std::time::Duration;

use glam::Vec2;
use tower_defence_core::{Command, EnemySnapshot, EnemyState, EnemyTuning, EnemyView, Event};

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    speed: f32,
    capture_radius: f32,
}

impl Config {
    /// Creates a configuration from a travel speed in world units per second
    /// and the distance at which a waypoint counts as reached.
    #[must_use]
    pub const fn new(speed: f32, capture_radius: f32) -> Self {
        Self {
            speed,
            capture_radius,
        }
    }
}

impl From<&EnemyTuning> for Config {
    fn from(tuning: &EnemyTuning) -> Self {
        Self::new(tuning.speed, tuning.capture_radius)
    }
}

/// Pure system that reacts to elapsed time and emits enemy movement commands.
#[derive(Debug)]
pub struct Movement {
    config: Config,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Consumes world events and the enemy view to emit one `MoveEnemy`
    /// command per travelling enemy.
    ///
    /// `waypoints` holds the world-space centres of the route in travel order.
    /// Terminal enemies are skipped and emit nothing.
    pub fn handle(
        &self,
        events: &[Event],
        enemies: &EnemyView,
        waypoints: &[Vec2],
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

        for enemy in enemies.iter() {
            if let Some((position, state)) = self.step(enemy, waypoints, dt) {
                out.push(Command::MoveEnemy {
                    enemy: enemy.id,
                    position,
                    state,
                });
            }
        }
    }

    fn step(
        &self,
        enemy: &EnemySnapshot,
        waypoints: &[Vec2],
        dt: Duration,
    ) -> Option<(Vec2, EnemyState)> {
        let EnemyState::Traveling { current, next } = enemy.state else {
            return None;
        };

        let (Some(&from), Some(&to)) = (waypoints.get(current), waypoints.get(next)) else {
            return Some((enemy.position, EnemyState::Reached));
        };

        let direction = (to - from).normalize_or_zero();
        let position = enemy.position + direction * self.config.speed * dt.as_secs_f32();

        let within_radius = position.distance(to) <= self.config.capture_radius;
        let overshot = (to - position).dot(direction) < 0.0;
        if !within_radius && !overshot {
            return Some((position, enemy.state));
        }

        let next = next + 1;
        if next >= waypoints.len() {
            return Some((position, EnemyState::Reached));
        }

        Some((
            to,
            EnemyState::Traveling {
                current: current + 1,
                next,
            },
        ))
    }
}
