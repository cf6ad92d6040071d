#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic turret targets from world snapshots.

use tower_defence_core::{EnemySnapshot, EnemyView, TurretSnapshot, TurretTarget, TurretView};

/// Rule deciding which in-range enemy a turret aims at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetPolicy {
    /// The last travelling enemy in collection order that lies within range.
    ///
    /// No distance ranking is performed; ties are broken purely by the order
    /// enemies appear in the live collection. Enemies that died or reached
    /// the end earlier in the tick are skipped, since compaction removes them
    /// before the next projectile step.
    #[default]
    LastInRange,
}

impl TargetPolicy {
    fn select<'a>(
        self,
        turret: &TurretSnapshot,
        candidates: impl Iterator<Item = &'a EnemySnapshot>,
    ) -> Option<&'a EnemySnapshot> {
        match self {
            Self::LastInRange => candidates
                .filter(|enemy| enemy.position.distance(turret.position) <= turret.range)
                .last(),
        }
    }
}

/// Turret targeting system applying a fixed [`TargetPolicy`].
#[derive(Debug, Default)]
pub struct TurretTargeting {
    policy: TargetPolicy,
}

impl TurretTargeting {
    /// Creates a targeting system using the provided policy.
    #[must_use]
    pub const fn new(policy: TargetPolicy) -> Self {
        Self { policy }
    }

    /// Computes turret targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Only travelling enemies are candidates; turrets without
    /// an enemy in range produce no entry.
    pub fn handle(&self, turrets: &TurretView, enemies: &EnemyView, out: &mut Vec<TurretTarget>) {
        out.clear();

        if turrets.is_empty() || enemies.is_empty() {
            return;
        }

        for turret in turrets.iter() {
            let candidates = enemies.iter().filter(|enemy| enemy.state.is_traveling());
            if let Some(enemy) = self.policy.select(turret, candidates) {
                out.push(TurretTarget {
                    turret: turret.id,
                    enemy: enemy.id,
                    turret_position: turret.position,
                    enemy_position: enemy.position,
                });
            }
        }
    }
}
