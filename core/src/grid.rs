//! Binary occupancy grid derived from painted path tiles.

use crate::{ScaledCoord, TileRect};

/// Dense wall/walkable matrix stored in row-major order.
///
/// Coordinates are always `(column, row)`. The grid is rebuilt wholesale when
/// the painted tiles change and is read-only afterwards, so systems share it
/// by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    columns: u32,
    rows: u32,
    walls: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates a grid where every cell is a wall.
    #[must_use]
    pub fn walled(columns: u32, rows: u32) -> Self {
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows))
            .expect("grid dimensions fit in memory");
        Self {
            columns,
            rows,
            walls: vec![true; cell_count],
        }
    }

    /// Builds a grid by clearing a `brush_width` square around every coordinate.
    ///
    /// Overlapping tiles are cleared more than once, which is harmless.
    ///
    /// # Panics
    ///
    /// Panics when a tile does not lie entirely inside the grid. Callers must
    /// validate coordinates first (see [`crate::LevelLayout::new`]); clipping
    /// them here would silently corrupt the maze.
    #[must_use]
    pub fn build(coords: &[ScaledCoord], columns: u32, rows: u32, brush_width: u32) -> Self {
        let mut grid = Self::walled(columns, rows);
        for &coord in coords {
            let tile = TileRect::centered(coord, brush_width);
            assert!(
                grid.contains_rect(&tile),
                "tile centered at ({}, {}) with width {brush_width} lies outside the {columns}x{rows} grid",
                coord.x(),
                coord.y(),
            );
            grid.clear_rect(&tile);
        }
        grid
    }

    /// Builds a grid from explicit rows where `1` marks a wall and `0` a walkable cell.
    ///
    /// # Panics
    ///
    /// Panics when the rows are ragged.
    #[must_use]
    pub fn from_rows<R: AsRef<[u8]>>(cells: &[R]) -> Self {
        let columns = cells.first().map_or(0, |row| row.as_ref().len());
        let mut walls = Vec::with_capacity(columns * cells.len());
        for (index, row) in cells.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(
                row.len(),
                columns,
                "grid row {index} has {} cells, expected {columns}",
                row.len()
            );
            walls.extend(row.iter().map(|&cell| cell != 0));
        }

        Self {
            columns: u32::try_from(columns).expect("column count fits in u32"),
            rows: u32::try_from(cells.len()).expect("row count fits in u32"),
            walls,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Rectangle covering the whole grid.
    #[must_use]
    pub const fn bounds(&self) -> TileRect {
        TileRect::new(0, 0, self.columns, self.rows)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, column: i32, row: i32) -> bool {
        self.index(column, row).is_some()
    }

    /// Reports whether the cell is inside the grid and walkable.
    #[must_use]
    pub fn is_walkable(&self, column: i32, row: i32) -> bool {
        self.index(column, row).is_some_and(|index| !self.walls[index])
    }

    /// Reports whether the cell is inside the grid and blocked.
    #[must_use]
    pub fn is_wall(&self, column: i32, row: i32) -> bool {
        self.index(column, row).is_some_and(|index| self.walls[index])
    }

    /// Reports whether the rectangle lies entirely within the grid bounds.
    #[must_use]
    pub fn contains_rect(&self, rect: &TileRect) -> bool {
        self.bounds().contains(rect)
    }

    /// True iff the rectangle is inside the grid and every covered cell is walkable.
    ///
    /// This is the single predicate behind every legality check in the engine.
    #[must_use]
    pub fn is_rect_clear(&self, rect: &TileRect) -> bool {
        if !self.contains_rect(rect) {
            return false;
        }
        (rect.top()..rect.bottom())
            .all(|row| (rect.left()..rect.right()).all(|column| self.is_walkable(column, row)))
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.walls.iter().filter(|wall| !**wall).count()
    }

    fn clear_rect(&mut self, rect: &TileRect) {
        for row in rect.top()..rect.bottom() {
            for column in rect.left()..rect.right() {
                if let Some(index) = self.index(column, row) {
                    self.walls[index] = false;
                }
            }
        }
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        usize::try_from(row)
            .ok()?
            .checked_mul(width)?
            .checked_add(usize::try_from(column).ok()?)
    }
}
