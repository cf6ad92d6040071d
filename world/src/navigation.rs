//! One-shot route discovery used by the world crate.

use std::collections::VecDeque;

use glam::Vec2;
use tower_defence_core::{CellCoord, TileKind};

use crate::{grid::Grid, LevelError};

/// Ordered waypoints enemies follow from the entrance to the exit.
///
/// Consecutive waypoints are turn points; enemies travel in a straight line
/// between their centres. The route always holds at least two waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    waypoints: Vec<CellCoord>,
    centers: Vec<Vec2>,
}

impl Route {
    /// Waypoint cells in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// World-space centres of the waypoints in travel order.
    #[must_use]
    pub fn centers(&self) -> &[Vec2] {
        &self.centers
    }

    /// Number of waypoints on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; a route is never shorter than two waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Centre of the entrance waypoint.
    #[must_use]
    pub fn entrance(&self) -> Vec2 {
        self.centers[0]
    }
}

/// Discovers the route by flood-filling from `start` through non-empty tiles.
///
/// The fill is breadth-first. Waypoints are recorded in the order they leave
/// the queue, so the authored layout must make that order match the intended
/// travel order. Empty tiles are closed the first time they are inspected and
/// never expanded.
pub fn extract_route(grid: &Grid, start: CellCoord) -> Result<Route, LevelError> {
    let Some(found) = grid.tile(start) else {
        return Err(LevelError::StartOutOfBounds {
            start,
            dimension: grid.dimension(),
        });
    };
    if found != TileKind::Waypoint {
        return Err(LevelError::StartNotWaypoint { start, found });
    }

    let dimension = grid.dimension();
    let width = usize::try_from(dimension).unwrap_or(0);
    let mut closed = vec![false; width * width];
    let mut queue = VecDeque::new();
    let mut waypoints = Vec::new();

    if let Some(start_index) = index(width, start) {
        closed[start_index] = true;
    }
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if grid.tile_at(cell) == TileKind::Waypoint {
            waypoints.push(cell);
        }

        for neighbor in neighbors(cell, dimension) {
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };
            if closed[neighbor_index] {
                continue;
            }
            closed[neighbor_index] = true;

            if grid.tile_at(neighbor).is_traversable() {
                queue.push_back(neighbor);
            }
        }
    }

    if waypoints.len() < 2 {
        return Err(LevelError::RouteTooShort {
            found: waypoints.len(),
        });
    }

    let centers = waypoints
        .iter()
        .map(|&waypoint| grid.cell_center(waypoint))
        .collect();

    Ok(Route { waypoints, centers })
}

fn neighbors(cell: CellCoord, dimension: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(row, cell.column()));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < dimension {
            candidates[count] = Some(CellCoord::new(cell.row(), column));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < dimension {
            candidates[count] = Some(CellCoord::new(row, cell.column()));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.row(), column));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
