//! Tunable simulation parameters and their validation.
//!
//! Times are stored as fractional seconds so configuration files stay
//! readable, and exposed as [`Duration`] values to the simulation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TILE_LENGTH: f32 = 80.0;

/// Complete set of tuning parameters consumed by the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Side length of a single square tile expressed in world units.
    pub tile_length: f32,
    /// Enemy spawn cadence.
    pub spawn: SpawnTuning,
    /// Enemy movement and durability.
    pub enemy: EnemyTuning,
    /// Turret detection and rate of fire.
    pub turret: TurretTuning,
    /// Projectile motion and collision.
    pub projectile: ProjectileTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_length: DEFAULT_TILE_LENGTH,
            spawn: SpawnTuning::default(),
            enemy: EnemyTuning::default(),
            turret: TurretTuning::default(),
            projectile: ProjectileTuning::default(),
        }
    }
}

impl SimulationConfig {
    /// Checks that every parameter is finite and within its usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tile_length", self.tile_length)?;
        positive("spawn.interval_secs", self.spawn.interval_secs)?;
        non_negative("enemy.speed", self.enemy.speed)?;
        non_negative("enemy.radius", self.enemy.radius)?;
        non_negative("enemy.capture_radius", self.enemy.capture_radius)?;
        if self.enemy.health == 0 {
            return Err(ConfigError::ZeroHealth);
        }
        non_negative("turret.range", self.turret.range)?;
        positive("turret.fire_interval_secs", self.turret.fire_interval_secs)?;
        non_negative("projectile.speed", self.projectile.speed)?;
        non_negative("projectile.radius", self.projectile.radius)?;
        positive(
            "projectile.max_lifetime_secs",
            self.projectile.max_lifetime_secs,
        )?;
        Ok(())
    }
}

/// Enemy spawn cadence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnTuning {
    /// Seconds the spawn timer must accumulate before the next enemy appears.
    pub interval_secs: f32,
    /// Number of enemies the simulation creates over its whole run.
    pub cap: u32,
}

impl SpawnTuning {
    /// Spawn interval as a duration.
    #[must_use]
    pub fn interval(&self) -> Duration {
        seconds(self.interval_secs)
    }
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval_secs: 1.0,
            cap: 10,
        }
    }
}

/// Enemy movement and durability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyTuning {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Hit points every enemy spawns with.
    pub health: u32,
    /// Distance from a waypoint centre at which the waypoint counts as reached.
    pub capture_radius: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            speed: 120.0,
            radius: 20.0,
            health: 3,
            capture_radius: 4.0,
        }
    }
}

/// Turret detection and rate of fire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurretTuning {
    /// Detection radius in world units.
    pub range: f32,
    /// Minimum seconds between two shots of the same turret.
    pub fire_interval_secs: f32,
}

impl TurretTuning {
    /// Fire interval as a duration.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        seconds(self.fire_interval_secs)
    }
}

impl Default for TurretTuning {
    fn default() -> Self {
        Self {
            range: 250.0,
            fire_interval_secs: 0.5,
        }
    }
}

/// Projectile motion and collision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileTuning {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Seconds a projectile may fly before it expires.
    pub max_lifetime_secs: f32,
}

impl ProjectileTuning {
    /// Maximum lifetime as a duration.
    #[must_use]
    pub fn max_lifetime(&self) -> Duration {
        seconds(self.max_lifetime_secs)
    }
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 480.0,
            radius: 8.0,
            max_lifetime_secs: 1.0,
        }
    }
}

/// Reasons a [`SimulationConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter is NaN or infinite.
    #[error("`{field}` must be finite (received {value})")]
    NonFinite {
        /// Dotted path of the offending parameter.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A parameter that must be strictly positive is zero or negative.
    #[error("`{field}` must be greater than zero (received {value})")]
    NonPositive {
        /// Dotted path of the offending parameter.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A parameter that must not be negative is negative.
    #[error("`{field}` must not be negative (received {value})")]
    Negative {
        /// Dotted path of the offending parameter.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// Enemies would spawn without hit points.
    #[error("`enemy.health` must be at least 1")]
    ZeroHealth,
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}
