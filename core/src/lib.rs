#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower Defence simulation.
//!
//! This crate defines the message surface that connects the simulation
//! driver, the authoritative world, and pure systems. The driver submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what changed. Systems never mutate state directly: they query
//! immutable views ([`EnemyView`], [`TurretView`], [`ProjectileView`]) and
//! respond exclusively with new command batches.

mod tuning;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use tuning::{
    ConfigError, EnemyTuning, ProjectileTuning, SimulationConfig, SpawnTuning, TurretTuning,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    ///
    /// Every turret's cooldown accumulator grows by `dt`.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new enemy enter the route at the first waypoint.
    SpawnEnemy,
    /// Stores the outcome of path-following for a single enemy.
    MoveEnemy {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// World-space position reached during the tick.
        position: Vec2,
        /// Route progress after the move.
        state: EnemyState,
    },
    /// Requests that a turret launch a projectile at an enemy.
    FireProjectile {
        /// Turret that fires.
        turret: TurretId,
        /// Enemy whose current position determines the launch direction.
        target: EnemyId,
    },
    /// Stores the outcome of projectile motion for a single projectile.
    MoveProjectile {
        /// Identifier of the projectile that moved.
        projectile: ProjectileId,
        /// World-space position reached during the tick.
        position: Vec2,
        /// Total time the projectile has been alive.
        lifetime: Duration,
    },
    /// Flags a projectile whose lifetime ran out.
    ExpireProjectile {
        /// Identifier of the expired projectile.
        projectile: ProjectileId,
    },
    /// Applies one unit of damage from a projectile to an enemy.
    HitEnemy {
        /// Projectile that connected. It is disabled by the hit.
        projectile: ProjectileId,
        /// Enemy that receives the damage.
        enemy: EnemyId,
    },
    /// Removes dead or leaked enemies and spent projectiles.
    Compact,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the route.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// World-space position the enemy starts from.
        position: Vec2,
    },
    /// Reports that an enemy captured a waypoint and turned towards the next one.
    EnemyReachedWaypoint {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Index of the captured waypoint within the route.
        waypoint: usize,
    },
    /// Reports that an enemy captured the final waypoint of the route.
    ///
    /// The simulation attaches no further consequence to this event; it is the
    /// hook collaborators observe to implement leak handling.
    EnemyReachedEnd {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Confirms that a projectile damaged an enemy.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Projectile responsible for the damage.
        projectile: ProjectileId,
        /// Health left after the hit.
        remaining: Health,
    },
    /// Confirms that an enemy left the live collection.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Reason the enemy was removed.
        cause: EnemyRemoval,
    },
    /// Confirms that a turret launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the new projectile.
        projectile: ProjectileId,
        /// Turret that fired.
        turret: TurretId,
        /// Enemy the turret aimed at.
        target: EnemyId,
        /// Unit direction of travel fixed at launch.
        direction: Vec2,
    },
    /// Confirms that a projectile left the live collection.
    ProjectileRemoved {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
        /// Reason the projectile was removed.
        cause: ProjectileRemoval,
    },
}

/// Reasons an enemy leaves the live collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyRemoval {
    /// Health dropped to zero.
    Killed,
    /// The enemy reached the end of the route.
    Leaked,
}

/// Reasons a projectile leaves the live collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileRemoval {
    /// The projectile connected with an enemy.
    Hit,
    /// The projectile outlived its maximum lifetime.
    Expired,
}

/// Classification of a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Unoccupied ground that nothing traverses.
    Empty,
    /// Straight corridor segment of the enemy route.
    Path,
    /// Turn point of the enemy route.
    Waypoint,
    /// Cell that hosts a turret.
    TurretSlot,
}

impl TileKind {
    /// Decodes the compact level code used by authored layouts.
    ///
    /// `0` is empty, `1` path, `2` waypoint and `3` turret slot. Any other
    /// value yields `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Path),
            2 => Some(Self::Waypoint),
            3 => Some(Self::TurretSlot),
            _ => None,
        }
    }

    /// Compact level code of the tile kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Path => 1,
            Self::Waypoint => 2,
            Self::TurretSlot => 3,
        }
    }

    /// Reports whether flood traversal may expand through the tile.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Remaining hit points of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a health value with the provided number of hit points.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Returns the health left after absorbing `amount` damage, never below zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Route progress of a single enemy.
///
/// `Traveling` advances one waypoint at a time until the final waypoint is
/// captured (`Reached`) or damage depletes the enemy's health (`Dead`). Both
/// terminal states are removed from the live collection during compaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Moving from waypoint `current` towards waypoint `next`.
    Traveling {
        /// Index of the waypoint the enemy last captured.
        current: usize,
        /// Index of the waypoint the enemy is heading to.
        next: usize,
    },
    /// Captured the final waypoint.
    Reached,
    /// Health was depleted.
    Dead,
}

impl EnemyState {
    /// State assigned to freshly spawned enemies.
    pub const DEPARTING: Self = Self::Traveling {
        current: 0,
        next: 1,
    };

    /// Reports whether the enemy is still following the route.
    #[must_use]
    pub const fn is_traveling(&self) -> bool {
        matches!(self, Self::Traveling { .. })
    }

    /// Reports whether the enemy awaits removal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_traveling()
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// World-space position of the enemy's centre.
    pub position: Vec2,
    /// Remaining hit points.
    pub health: Health,
    /// Route progress.
    pub state: EnemyState,
}

/// Read-only snapshot describing all enemies in the live collection.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Identifiers are allocated in spawn order, so sorting by identifier
    /// reproduces the live collection's iteration order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single turret's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Identifier allocated to the turret by the world.
    pub id: TurretId,
    /// Turret slot the turret occupies.
    pub cell: CellCoord,
    /// World-space centre of the turret slot.
    pub position: Vec2,
    /// Detection radius in world units.
    pub range: f32,
    /// Minimum simulated time between two shots.
    pub fire_interval: Duration,
    /// Simulated time accumulated since the last shot.
    pub cooldown: Duration,
}

impl TurretSnapshot {
    /// Reports whether enough time accumulated for the turret to fire.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown >= self.fire_interval
    }
}

/// Read-only snapshot describing every turret.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single turret.
    #[must_use]
    pub fn get(&self, id: TurretId) -> Option<&TurretSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// World-space position of the projectile's centre.
    pub position: Vec2,
    /// Unit direction of travel fixed at launch.
    pub direction: Vec2,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Total time the projectile has been alive.
    pub lifetime: Duration,
    /// Cleared once the projectile has hit an enemy.
    pub enabled: bool,
    /// Set once the projectile outlived its maximum lifetime.
    pub expired: bool,
}

impl ProjectileSnapshot {
    /// Reports whether the projectile still participates in the simulation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.enabled && !self.expired
    }
}

/// Read-only snapshot describing all projectiles in the live collection.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed for a turret during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretTarget {
    /// Turret that acquired the target.
    pub turret: TurretId,
    /// Enemy selected by the targeting policy.
    pub enemy: EnemyId,
    /// World-space position of the turret.
    pub turret_position: Vec2,
    /// World-space position of the enemy when it was selected.
    pub enemy_position: Vec2,
}

/// Scalar counters exposed to presentation layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimulationCounters {
    /// Enemies currently in the live collection.
    pub live_enemies: usize,
    /// Projectiles currently in the live collection.
    pub live_projectiles: usize,
    /// Enemies created since the simulation started.
    pub total_spawned: u32,
}
