#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order tick driver for the Tower Defence simulation.
//!
//! [`Simulation`] owns the authoritative [`World`] together with every pure
//! system and is the only type presentation layers need to talk to. Each call
//! to [`Simulation::advance`] runs one complete tick: spawning, enemy
//! movement, turret fire, projectile resolution and finally compaction.

use std::time::Duration;

use log::trace;
use thiserror::Error;
use tower_defence_core::{
    Command, ConfigError, EnemyView, Event, ProjectileView, SimulationConfig, SimulationCounters,
    TurretTarget, TurretView,
};
use tower_defence_system_movement::Movement;
use tower_defence_system_projectiles::Projectiles;
use tower_defence_system_spawning::Spawning;
use tower_defence_system_turret_combat::TurretCombat;
use tower_defence_system_turret_targeting::TurretTargeting;
use tower_defence_world::{self as world, query, Grid, Level, LevelError, Route, World};

/// Reasons a simulation cannot be started.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A tuning parameter is outside its usable range.
    #[error("invalid simulation configuration")]
    Config(#[from] ConfigError),
    /// The level cannot produce a playable route.
    #[error("malformed level")]
    Level(#[from] LevelError),
}

/// Owns the world and drives every system once per tick.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    movement: Movement,
    targeting: TurretTargeting,
    combat: TurretCombat,
    projectiles: Projectiles,
    targets: Vec<TurretTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Validates the configuration and builds the world for `level`.
    pub fn new(level: Level, config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let spawning = Spawning::new((&config.spawn).into());
        let movement = Movement::new((&config.enemy).into());
        let projectiles = Projectiles::new((&config).into());
        let world = World::new(level, config)?;

        Ok(Self {
            world,
            spawning,
            movement,
            targeting: TurretTargeting::default(),
            combat: TurretCombat::new(),
            projectiles,
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Builds a simulation on the built-in classic level.
    pub fn classic(config: SimulationConfig) -> Result<Self, SimulationError> {
        let level = Level::classic(config.tile_length)?;
        Self::new(level, config)
    }

    /// Advances the simulation by `dt` and returns the events the tick
    /// produced, in the order they happened.
    pub fn advance(&mut self, dt: Duration) -> &[Event] {
        self.events.clear();

        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut tick_events);
        self.events.extend_from_slice(&tick_events);

        self.spawning.handle(
            &tick_events,
            query::total_spawned(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.movement.handle(
            &tick_events,
            &query::enemy_view(&self.world),
            query::waypoint_centers(&self.world),
            &mut self.commands,
        );
        self.flush();

        // Projectiles fired this tick first move on the next one.
        let in_flight = query::projectile_view(&self.world);

        let turrets = query::turret_view(&self.world);
        self.targeting.handle(
            &turrets,
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(&turrets, &self.targets, &mut self.commands);
        self.flush();

        self.projectiles.handle(
            &tick_events,
            &in_flight,
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush();

        world::apply(&mut self.world, Command::Compact, &mut self.events);

        trace!(
            "tick {} ({dt:?}): {} events, {:?}",
            query::tick_index(&self.world),
            self.events.len(),
            query::counters(&self.world)
        );

        &self.events
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Events produced by the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Snapshot of the live enemies.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Snapshot of every turret.
    #[must_use]
    pub fn turrets(&self) -> TurretView {
        query::turret_view(&self.world)
    }

    /// Snapshot of the live projectiles.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Live enemy count, live projectile count and total spawn count.
    #[must_use]
    pub fn counters(&self) -> SimulationCounters {
        query::counters(&self.world)
    }

    /// Level grid the simulation runs on.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        query::grid(&self.world)
    }

    /// Route enemies follow.
    #[must_use]
    pub fn route(&self) -> &Route {
        query::route(&self.world)
    }

    /// Tuning the simulation was created with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        query::config(&self.world)
    }

    /// Number of ticks advanced so far.
    #[must_use]
    pub fn tick_index(&self) -> u64 {
        query::tick_index(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = SimulationConfig::default();
        config.enemy.health = 0;
        assert!(matches!(
            Simulation::classic(config),
            Err(SimulationError::Config(ConfigError::ZeroHealth))
        ));
    }

    #[test]
    fn malformed_level_is_fatal() {
        let rows: [[u8; 2]; 2] = [[2, 0], [0, 0]];
        let level = Level::from_codes(&rows, tower_defence_core::CellCoord::new(0, 0), 10.0)
            .expect("valid grid");
        assert!(matches!(
            Simulation::new(level, SimulationConfig::default()),
            Err(SimulationError::Level(LevelError::RouteTooShort { found: 1 }))
        ));
    }

    #[test]
    fn every_tick_starts_with_time_advanced_and_ends_compacted() {
        let mut simulation =
            Simulation::classic(SimulationConfig::default()).expect("valid simulation");
        let dt = Duration::from_millis(16);

        let events = simulation.advance(dt).to_vec();
        assert_eq!(events.first(), Some(&Event::TimeAdvanced { dt }));
        assert_eq!(simulation.events(), events.as_slice());
        assert_eq!(simulation.tick_index(), 1);
        assert_eq!(simulation.counters(), SimulationCounters::default());
    }

    #[test]
    fn classic_level_places_a_turret_on_every_slot() {
        let simulation =
            Simulation::classic(SimulationConfig::default()).expect("valid simulation");
        assert_eq!(simulation.turrets().len(), 5);
        assert_eq!(simulation.route().len(), 7);
        assert_eq!(simulation.grid().dimension(), 10);
    }
}
