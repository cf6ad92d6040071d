#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use tower_defence_core::{Command, Event, SpawnTuning};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    cap: u32,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and the
    /// maximum number of enemies ever created.
    #[must_use]
    pub const fn new(spawn_interval: Duration, cap: u32) -> Self {
        Self {
            spawn_interval,
            cap,
        }
    }
}

impl From<&SpawnTuning> for Config {
    fn from(tuning: &SpawnTuning) -> Self {
        Self::new(tuning.interval(), tuning.cap)
    }
}

/// Pure system that emits at most one spawn command per tick.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    cap: u32,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            cap: config.cap,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes the tick's events and the all-time spawn count to emit spawn
    /// commands.
    ///
    /// The timer resets to zero on a spawn, so a long tick never produces more
    /// than one enemy. Once `total_spawned` reaches the cap nothing is emitted
    /// again, however much time passes.
    pub fn handle(&mut self, events: &[Event], total_spawned: u32, out: &mut Vec<Command>) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
            }
        }

        if self.accumulator >= self.spawn_interval && total_spawned < self.cap {
            self.accumulator = Duration::ZERO;
            out.push(Command::SpawnEnemy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(millis: u64) -> [Event; 1] {
        [Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }]
    }

    #[test]
    fn waits_for_a_full_interval() {
        let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 10));
        let mut commands = Vec::new();

        spawning.handle(&tick(600), 0, &mut commands);
        assert!(commands.is_empty());

        spawning.handle(&tick(400), 0, &mut commands);
        assert_eq!(commands, vec![Command::SpawnEnemy]);
        assert!(spawning.accumulator.is_zero());
    }

    #[test]
    fn long_ticks_spawn_once_and_discard_the_excess() {
        let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 10));
        let mut commands = Vec::new();

        spawning.handle(&tick(3_500), 0, &mut commands);
        assert_eq!(commands.len(), 1);
        assert!(spawning.accumulator.is_zero());
    }

    #[test]
    fn cap_counts_every_enemy_ever_created() {
        let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 2));
        let mut commands = Vec::new();

        spawning.handle(&tick(1_000), 2, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn ignores_unrelated_events() {
        let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 10));
        let mut commands = Vec::new();

        spawning.handle(
            &[Event::EnemyReachedEnd {
                enemy: tower_defence_core::EnemyId::new(0),
            }],
            0,
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
