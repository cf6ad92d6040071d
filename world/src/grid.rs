//! Static tile classification over a square level grid.

use glam::Vec2;
use tower_defence_core::{CellCoord, TileKind};

use crate::LevelError;

/// Square matrix of tiles describing the authored level.
///
/// The grid never changes after construction. Its dimension travels with the
/// value, so every coordinate check is made against the grid itself rather
/// than a shared constant.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dimension: u32,
    tile_length: f32,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Builds a grid from rows of compact tile codes.
    ///
    /// Every row must have as many entries as there are rows, and every code
    /// must decode through [`TileKind::from_code`].
    pub fn from_codes<R>(rows: &[R], tile_length: f32) -> Result<Self, LevelError>
    where
        R: AsRef<[u8]>,
    {
        if rows.is_empty() {
            return Err(LevelError::EmptyGrid);
        }

        let expected = rows.len();
        let dimension =
            u32::try_from(expected).map_err(|_| LevelError::TooLarge { rows: expected })?;
        let mut tiles = Vec::with_capacity(expected * expected);

        for (row_index, row) in rows.iter().enumerate() {
            let codes = row.as_ref();
            if codes.len() != expected {
                return Err(LevelError::NotSquare {
                    row: row_index,
                    expected,
                    found: codes.len(),
                });
            }

            for (column_index, &code) in codes.iter().enumerate() {
                let Some(kind) = TileKind::from_code(code) else {
                    return Err(LevelError::UnknownTile {
                        cell: CellCoord::new(row_index as u32, column_index as u32),
                        code,
                    });
                };
                tiles.push(kind);
            }
        }

        Ok(Self {
            dimension,
            tile_length,
            tiles,
        })
    }

    /// Number of rows, which equals the number of columns.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total side length of the grid measured in world units.
    #[must_use]
    pub fn side_length(&self) -> f32 {
        self.dimension as f32 * self.tile_length
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.dimension && cell.column() < self.dimension
    }

    /// Tile stored at the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Tile stored at the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the grid. Callers derive coordinates
    /// from the grid itself, so an out-of-range cell is a logic error.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> TileKind {
        match self.tile(cell) {
            Some(kind) => kind,
            None => panic!(
                "cell ({}, {}) lies outside the {}x{} grid",
                cell.row(),
                cell.column(),
                self.dimension,
                self.dimension
            ),
        }
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.column() as f32 + 0.5) * self.tile_length,
            (cell.row() as f32 + 0.5) * self.tile_length,
        )
    }

    /// World-space box covered by the cell.
    #[must_use]
    pub fn cell_bounds(&self, cell: CellCoord) -> CellBounds {
        let min = Vec2::new(
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        );
        CellBounds {
            min,
            max: min + Vec2::splat(self.tile_length),
        }
    }

    /// Cells holding the provided tile kind in row-major order.
    pub fn cells_of_kind(&self, kind: TileKind) -> impl Iterator<Item = CellCoord> + '_ {
        let dimension = self.dimension;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, tile)| **tile == kind)
            .map(move |(index, _)| {
                let index = index as u32;
                CellCoord::new(index / dimension, index % dimension)
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.dimension).ok()?;
        Some(row * width + column)
    }
}

/// Axis-aligned box expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    /// Corner with the smallest coordinates.
    pub min: Vec2,
    /// Corner with the largest coordinates.
    pub max: Vec2,
}

impl CellBounds {
    /// Reports whether two boxes overlap, touching edges included.
    #[must_use]
    pub fn overlaps(&self, other: &CellBounds) -> bool {
        let x = self.max.x >= other.min.x && self.min.x <= other.max.x;
        let y = self.max.y >= other.min.y && self.min.y <= other.max.y;
        x && y
    }

    /// Reports whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        let rows: [[u8; 3]; 3] = [[2, 1, 2], [0, 0, 3], [0, 0, 0]];
        Grid::from_codes(&rows, 10.0).expect("valid grid")
    }

    #[test]
    fn tiles_decode_in_row_major_order() {
        let grid = grid();
        assert_eq!(grid.dimension(), 3);
        assert_eq!(grid.tile_at(CellCoord::new(0, 0)), TileKind::Waypoint);
        assert_eq!(grid.tile_at(CellCoord::new(0, 1)), TileKind::Path);
        assert_eq!(grid.tile_at(CellCoord::new(1, 2)), TileKind::TurretSlot);
        assert_eq!(grid.tile_at(CellCoord::new(2, 2)), TileKind::Empty);
    }

    #[test]
    fn lookups_outside_the_grid_are_rejected() {
        let grid = grid();
        assert!(!grid.contains(CellCoord::new(3, 0)));
        assert_eq!(grid.tile(CellCoord::new(0, 3)), None);
    }

    #[test]
    #[should_panic(expected = "outside the 3x3 grid")]
    fn tile_at_panics_outside_the_grid() {
        let _ = grid().tile_at(CellCoord::new(5, 5));
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows: [&[u8]; 2] = [&[2, 1], &[0]];
        assert_eq!(
            Grid::from_codes(&rows, 1.0),
            Err(LevelError::NotSquare {
                row: 1,
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn rejects_unknown_codes() {
        let rows: [[u8; 2]; 2] = [[0, 7], [0, 0]];
        assert_eq!(
            Grid::from_codes(&rows, 1.0),
            Err(LevelError::UnknownTile {
                cell: CellCoord::new(0, 1),
                code: 7,
            })
        );
    }

    #[test]
    fn rejects_empty_layouts() {
        let rows: [[u8; 0]; 0] = [];
        assert_eq!(Grid::from_codes(&rows, 1.0), Err(LevelError::EmptyGrid));
    }

    #[test]
    fn cell_geometry_uses_tile_length() {
        let grid = grid();
        let cell = CellCoord::new(1, 2);
        assert_eq!(grid.cell_center(cell), Vec2::new(25.0, 15.0));

        let bounds = grid.cell_bounds(cell);
        assert_eq!(bounds.min, Vec2::new(20.0, 10.0));
        assert_eq!(bounds.max, Vec2::new(30.0, 20.0));
        assert_eq!(bounds.center(), grid.cell_center(cell));
        assert!(bounds.contains(grid.cell_center(cell)));
    }

    #[test]
    fn neighbouring_cells_touch_but_distant_cells_do_not() {
        let grid = grid();
        let origin = grid.cell_bounds(CellCoord::new(0, 0));
        assert!(origin.overlaps(&grid.cell_bounds(CellCoord::new(0, 1))));
        assert!(!origin.overlaps(&grid.cell_bounds(CellCoord::new(0, 2))));
    }

    #[test]
    fn cells_of_kind_scans_row_major() {
        let rows: [[u8; 2]; 2] = [[3, 0], [2, 3]];
        let grid = Grid::from_codes(&rows, 1.0).expect("valid grid");
        let slots: Vec<_> = grid.cells_of_kind(TileKind::TurretSlot).collect();
        assert_eq!(slots, vec![CellCoord::new(0, 0), CellCoord::new(1, 1)]);
    }
}
