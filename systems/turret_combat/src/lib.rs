#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use tower_defence_core::{Command, TurretTarget, TurretView};

/// Turret combat system that queues firing commands for ready turrets.
#[derive(Debug, Default)]
pub struct TurretCombat {
    scratch: Vec<Command>,
}

impl TurretCombat {
    /// Creates a new turret combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for targeted turrets whose
    /// cooldown has reached their fire interval.
    pub fn handle(
        &mut self,
        turrets: &TurretView,
        turret_targets: &[TurretTarget],
        out: &mut Vec<Command>,
    ) {
        if turret_targets.is_empty() || turrets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in turret_targets {
            if let Some(turret) = turrets.get(target.turret) {
                if turret.is_ready() {
                    self.scratch.push(Command::FireProjectile {
                        turret: target.turret,
                        target: target.enemy,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::time::Duration;
    use tower_defence_core::{CellCoord, EnemyId, TurretId, TurretSnapshot};

    #[test]
    fn firing_respects_cooldown_readiness() {
        let mut system = TurretCombat::new();
        let turrets = TurretView::from_snapshots(vec![
            snapshot(2, Duration::from_millis(500)),
            snapshot(5, Duration::from_millis(750)),
        ]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(&turrets, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    turret: TurretId::new(2),
                    target: EnemyId::new(4),
                },
                Command::FireProjectile {
                    turret: TurretId::new(5),
                    target: EnemyId::new(1),
                },
            ],
        );
    }

    #[test]
    fn cooling_or_missing_turrets_are_skipped() {
        let mut system = TurretCombat::new();
        let turrets = TurretView::from_snapshots(vec![
            snapshot(3, Duration::from_millis(250)),
            snapshot(8, Duration::from_millis(500)),
        ]);
        let targets = vec![target(3, 9), target(8, 2), target(42, 3)];
        let mut out = Vec::new();

        system.handle(&turrets, &targets, &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                turret: TurretId::new(8),
                target: EnemyId::new(2),
            }],
        );
    }

    #[test]
    fn ready_turrets_without_targets_stay_silent() {
        let mut system = TurretCombat::new();
        let turrets = TurretView::from_snapshots(vec![snapshot(1, Duration::from_secs(5))]);
        let mut out = Vec::new();

        system.handle(&turrets, &[], &mut out);

        assert!(out.is_empty());
    }

    fn snapshot(turret: u32, cooldown: Duration) -> TurretSnapshot {
        TurretSnapshot {
            id: TurretId::new(turret),
            cell: CellCoord::new(0, 0),
            position: Vec2::ZERO,
            range: 100.0,
            fire_interval: Duration::from_millis(500),
            cooldown,
        }
    }

    fn target(turret: u32, enemy: u32) -> TurretTarget {
        TurretTarget {
            turret: TurretId::new(turret),
            enemy: EnemyId::new(enemy),
            turret_position: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }
    }
}
