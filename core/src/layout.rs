//! Validated level layouts ready to be turned into occupancy grids.

use thiserror::Error;

use crate::{Fidelity, OccupancyGrid, PixelCoord, ScaledCoord, TileRect};

/// Reasons externally supplied layout data is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The grid has no columns or no rows.
    #[error("layout grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The tile width scaled down to zero grid units.
    #[error("layout tile width must be at least one grid unit")]
    ZeroTileWidth,
    /// No path tiles were painted.
    #[error("layout must contain at least one path tile")]
    EmptyPath,
    /// A painted tile does not fit inside the grid.
    #[error("path tile centered at ({x}, {y}) does not fit inside the grid")]
    TileOutOfBounds {
        /// Column of the offending tile center.
        x: i32,
        /// Row of the offending tile center.
        y: i32,
    },
}

/// Maze layout expressed in scaled grid space.
///
/// Construction validates every tile against the grid bounds, so
/// [`LevelLayout::grid`] never trips the assertions in
/// [`OccupancyGrid::build`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    columns: u32,
    rows: u32,
    tile_width: u32,
    path: Vec<ScaledCoord>,
}

impl LevelLayout {
    /// Validates and captures a layout already expressed in grid space.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_width: u32,
        path: Vec<ScaledCoord>,
    ) -> Result<Self, LayoutError> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid { columns, rows });
        }
        if tile_width == 0 {
            return Err(LayoutError::ZeroTileWidth);
        }
        if path.is_empty() {
            return Err(LayoutError::EmptyPath);
        }

        let bounds = TileRect::new(0, 0, columns, rows);
        if let Some(outside) = path
            .iter()
            .find(|coord| !bounds.contains(&TileRect::centered(**coord, tile_width)))
        {
            return Err(LayoutError::TileOutOfBounds {
                x: outside.x(),
                y: outside.y(),
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_width,
            path,
        })
    }

    /// Scales a raw pixel layout into grid space and validates it.
    pub fn from_pixels(
        path: &[PixelCoord],
        width: u32,
        height: u32,
        tile_width: u32,
        fidelity: Fidelity,
    ) -> Result<Self, LayoutError> {
        let scaled = path.iter().map(|coord| fidelity.scale(*coord)).collect();
        Self::new(
            fidelity.scale_length(width),
            fidelity.scale_length(height),
            fidelity.scale_length(tile_width),
            scaled,
        )
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of every painted tile in grid units.
    #[must_use]
    pub const fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Painted tile centers in authoring order; never empty.
    #[must_use]
    pub fn path(&self) -> &[ScaledCoord] {
        &self.path
    }

    /// Builds the occupancy grid for the layout.
    #[must_use]
    pub fn grid(&self) -> OccupancyGrid {
        OccupancyGrid::build(&self.path, self.columns, self.rows, self.tile_width)
    }
}
