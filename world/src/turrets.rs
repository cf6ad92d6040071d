//! Authoritative turret state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use tower_defence_core::{CellCoord, TileKind, TurretId, TurretSnapshot, TurretTuning};

use crate::grid::Grid;

/// State of a turret stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TurretState {
    /// Identifier allocated by the world for the turret.
    pub(crate) id: TurretId,
    /// Turret slot the turret occupies.
    pub(crate) cell: CellCoord,
    /// World-space centre of the slot.
    pub(crate) position: Vec2,
    /// Detection radius in world units.
    pub(crate) range: f32,
    /// Minimum time between shots.
    pub(crate) fire_interval: Duration,
    /// Time accumulated since the last shot.
    pub(crate) cooldown: Duration,
}

impl TurretState {
    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown >= self.fire_interval
    }

    fn snapshot(&self) -> TurretSnapshot {
        TurretSnapshot {
            id: self.id,
            cell: self.cell,
            position: self.position,
            range: self.range,
            fire_interval: self.fire_interval,
            cooldown: self.cooldown,
        }
    }
}

/// Registry holding every turret of the level, keyed by identifier.
#[derive(Debug)]
pub(crate) struct TurretRegistry {
    entries: BTreeMap<TurretId, TurretState>,
}

impl TurretRegistry {
    /// Places one turret on every turret slot, allocating identifiers in
    /// row-major slot order.
    pub(crate) fn from_grid(grid: &Grid, tuning: &TurretTuning) -> Self {
        let fire_interval = tuning.fire_interval();
        let entries = grid
            .cells_of_kind(TileKind::TurretSlot)
            .enumerate()
            .map(|(index, cell)| {
                let id = TurretId::new(index as u32);
                let state = TurretState {
                    id,
                    cell,
                    position: grid.cell_center(cell),
                    range: tuning.range,
                    fire_interval,
                    cooldown: Duration::ZERO,
                };
                (id, state)
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Accumulates elapsed time on every turret's cooldown.
    pub(crate) fn charge(&mut self, dt: Duration) {
        for turret in self.entries.values_mut() {
            turret.cooldown = turret.cooldown.saturating_add(dt);
        }
    }

    pub(crate) fn get_mut(&mut self, id: TurretId) -> Option<&mut TurretState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn snapshots(&self) -> Vec<TurretSnapshot> {
        self.entries.values().map(TurretState::snapshot).collect()
    }
}
