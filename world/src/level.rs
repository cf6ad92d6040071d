//! Fixed level layout and level construction errors.

use thiserror::Error;
use tower_defence_core::{CellCoord, TileKind};

use crate::grid::Grid;

const CLASSIC_START: CellCoord = CellCoord::new(0, 0);

// 0 empty, 1 path, 2 waypoint, 3 turret slot. The corridor is one tile wide
// and never runs beside itself, so flood order follows the route.
const CLASSIC_LAYOUT: [[u8; 10]; 10] = [
    [2, 1, 1, 1, 2, 0, 0, 0, 0, 0],
    [0, 3, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 0, 3, 0, 0, 0],
    [0, 0, 0, 3, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 2, 1, 1, 1, 2, 0],
    [0, 0, 0, 0, 0, 0, 3, 0, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
    [0, 2, 1, 1, 1, 1, 1, 1, 2, 0],
    [0, 1, 0, 0, 3, 0, 0, 0, 0, 0],
    [0, 2, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Authored level: a grid plus the waypoint enemies enter from.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    grid: Grid,
    start: CellCoord,
}

impl Level {
    /// Creates a level from a grid and its entrance waypoint.
    #[must_use]
    pub fn new(grid: Grid, start: CellCoord) -> Self {
        Self { grid, start }
    }

    /// Builds the level from rows of compact tile codes.
    pub fn from_codes<R>(
        rows: &[R],
        start: CellCoord,
        tile_length: f32,
    ) -> Result<Self, LevelError>
    where
        R: AsRef<[u8]>,
    {
        Ok(Self::new(Grid::from_codes(rows, tile_length)?, start))
    }

    /// The built-in ten by ten layout with five turret slots.
    pub fn classic(tile_length: f32) -> Result<Self, LevelError> {
        Self::from_codes(&CLASSIC_LAYOUT, CLASSIC_START, tile_length)
    }

    /// Tile grid of the level.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Waypoint the route starts from.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Splits the level into its grid and start cell.
    #[must_use]
    pub fn into_parts(self) -> (Grid, CellCoord) {
        (self.grid, self.start)
    }
}

/// Reasons a level cannot be turned into a playable world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The layout has no rows.
    #[error("level layout is empty")]
    EmptyGrid,
    /// The layout has more rows than coordinates can address.
    #[error("level layout has {rows} rows, more than a grid can address")]
    TooLarge {
        /// Number of rows supplied.
        rows: usize,
    },
    /// A row's length differs from the number of rows.
    #[error("level row {row} has {found} tiles, expected {expected}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Tiles every row must contain.
        expected: usize,
        /// Tiles the row actually contains.
        found: usize,
    },
    /// A tile code does not name any tile kind.
    #[error("unknown tile code {code} at {cell:?}")]
    UnknownTile {
        /// Cell carrying the code.
        cell: CellCoord,
        /// Code that failed to decode.
        code: u8,
    },
    /// The start cell lies outside the grid.
    #[error("start cell {start:?} lies outside the {dimension}x{dimension} grid")]
    StartOutOfBounds {
        /// Requested start cell.
        start: CellCoord,
        /// Dimension of the grid.
        dimension: u32,
    },
    /// The start cell is not a waypoint.
    #[error("start cell {start:?} is {found:?}, expected a waypoint")]
    StartNotWaypoint {
        /// Requested start cell.
        start: CellCoord,
        /// Tile found at the start cell.
        found: TileKind,
    },
    /// Fewer than two waypoints are reachable from the start cell.
    #[error("route needs at least two waypoints, found {found}")]
    RouteTooShort {
        /// Number of waypoints discovered.
        found: usize,
    },
}
