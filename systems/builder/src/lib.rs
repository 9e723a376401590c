#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level-authoring system that keeps painted corridors exactly one tile wide.
//!
//! Every proposed tile is checked against the tiles it touches. A corridor
//! passes when no square wider than the brush fits inside it and every
//! inside corner leaves a diagonal gap of at least one brush width. Layouts
//! that pass reduce entity movement legality to plain rectangle-in-grid
//! tests.

mod corners;
mod path_builder;

use snack_attack_core::{OccupancyGrid, ScaledCoord, TileRect};
use thiserror::Error;

pub use path_builder::{snap_to_spacing, tile_within_bounds, Erasure, PathBuilder, Proposal};

/// Dimensions of the authoring canvas in grid space plus the brush width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathCanvas {
    /// Number of grid columns available for painting.
    pub columns: u32,
    /// Number of grid rows available for painting.
    pub rows: u32,
    /// Side length of every painted tile.
    pub brush_width: u32,
}

impl PathCanvas {
    /// Creates a canvas description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, brush_width: u32) -> Self {
        Self {
            columns,
            rows,
            brush_width,
        }
    }

    /// Rectangle covering the whole canvas.
    #[must_use]
    pub const fn bounds(&self) -> TileRect {
        TileRect::new(0, 0, self.columns, self.rows)
    }

    /// Tile painted by the brush at `center`.
    #[must_use]
    pub const fn tile(&self, center: ScaledCoord) -> TileRect {
        TileRect::centered(center, self.brush_width)
    }
}

/// Ways a painted corridor can stop being uniform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    /// A walkable square wider than the brush fits inside the corridor.
    #[error("corridor opens into a {span}x{span} area, wider than the brush")]
    Overwide {
        /// Side of the largest walkable square found.
        span: u32,
    },
    /// An inside corner leaves a diagonal gap that is too narrow, or two
    /// inside corners face each other across an overly wide gap.
    #[error("corner diagonal does not match the brush width")]
    SharpCorner,
}

/// Returns true when adding `candidate` keeps the corridor uniform.
///
/// # Panics
///
/// Panics when the candidate or an existing tile does not fit inside the
/// canvas; bounds are the caller's responsibility (see [`tile_within_bounds`]).
#[must_use]
pub fn is_uniform_path(
    existing: &[ScaledCoord],
    candidate: ScaledCoord,
    canvas: PathCanvas,
) -> bool {
    find_violation(existing, candidate, canvas).is_none()
}

/// Reports the first uniformity violation `candidate` would introduce.
///
/// Only tiles overlapping or tangent to the candidate take part, and the
/// check runs on a grid window just large enough to hold them.
#[must_use]
pub fn find_violation(
    existing: &[ScaledCoord],
    candidate: ScaledCoord,
    canvas: PathCanvas,
) -> Option<Violation> {
    let reach = canvas.tile(candidate).expanded(1);
    let mut touching = vec![candidate];
    touching.extend(
        existing
            .iter()
            .copied()
            .filter(|coord| reach.intersects(&canvas.tile(*coord))),
    );

    // An isolated tile cannot create a width violation.
    if touching.len() == 1 {
        return None;
    }

    let local = local_grid(&touching, canvas);
    evaluate(&local, canvas.brush_width)
}

/// Checks a complete layout, as required after erasing a tile.
#[must_use]
pub fn find_layout_violation(coords: &[ScaledCoord], canvas: PathCanvas) -> Option<Violation> {
    if coords.is_empty() {
        return None;
    }
    let grid = OccupancyGrid::build(coords, canvas.columns, canvas.rows, canvas.brush_width);
    evaluate(&grid, canvas.brush_width)
}

/// Side of the largest square made only of walkable cells.
///
/// Classic maximal-square dynamic programme: a walkable cell extends the
/// smallest of the squares ending above, to the left and diagonally.
#[must_use]
pub fn largest_open_square(grid: &OccupancyGrid) -> u32 {
    let columns = usize::try_from(grid.columns()).unwrap_or(0);
    let mut previous = vec![0_u32; columns];
    let mut current = vec![0_u32; columns];
    let mut largest = 0;

    for row in 0..grid.rows() as i32 {
        for column in 0..columns {
            current[column] = if grid.is_walkable(column as i32, row) {
                if column == 0 {
                    1
                } else {
                    1 + previous[column].min(current[column - 1]).min(previous[column - 1])
                }
            } else {
                0
            };
            largest = largest.max(current[column]);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    largest
}

fn evaluate(grid: &OccupancyGrid, brush_width: u32) -> Option<Violation> {
    let span = largest_open_square(grid);
    if span > brush_width {
        return Some(Violation::Overwide { span });
    }
    if !corners::diagonals_are_legal(grid, brush_width) {
        return Some(Violation::SharpCorner);
    }
    None
}

/// Materialises the touching tiles into a grid window.
///
/// The window keeps a one-cell wall margin around the tiles wherever the
/// canvas allows it, so diagonal walks stop on the same wall or canvas edge
/// they would reach on the full canvas.
fn local_grid(tiles: &[ScaledCoord], canvas: PathCanvas) -> OccupancyGrid {
    let covered = tiles
        .iter()
        .map(|coord| canvas.tile(*coord))
        .reduce(|acc, tile| acc.union(&tile))
        .unwrap_or_else(|| canvas.bounds());
    let grown = covered.expanded(1);

    let left = grown.left().max(0);
    let top = grown.top().max(0);
    let right = grown.right().min(canvas.bounds().right());
    let bottom = grown.bottom().min(canvas.bounds().bottom());

    let shifted: Vec<_> = tiles
        .iter()
        .map(|coord| ScaledCoord::new(coord.x() - left, coord.y() - top))
        .collect();

    OccupancyGrid::build(
        &shifted,
        (right - left).unsigned_abs(),
        (bottom - top).unsigned_abs(),
        canvas.brush_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_open_square_measures_widest_area() {
        let grid = OccupancyGrid::from_rows(&[
            [0u8, 0, 0, 1],
            [0, 0, 0, 1],
            [0, 0, 0, 0],
            [1, 0, 0, 0],
        ]);
        assert_eq!(largest_open_square(&grid), 3);
    }

    #[test]
    fn largest_open_square_of_walled_grid_is_zero() {
        assert_eq!(largest_open_square(&OccupancyGrid::walled(5, 5)), 0);
    }

    #[test]
    fn isolated_candidate_is_always_accepted() {
        let canvas = PathCanvas::new(40, 40, 4);
        let existing = [ScaledCoord::new(4, 4)];
        assert_eq!(
            find_violation(&existing, ScaledCoord::new(20, 20), canvas),
            None
        );
    }

    #[test]
    fn local_window_keeps_a_wall_margin() {
        let canvas = PathCanvas::new(40, 40, 4);
        let grid = local_grid(&[ScaledCoord::new(10, 10), ScaledCoord::new(14, 10)], canvas);

        assert_eq!((grid.columns(), grid.rows()), (10, 6));
        assert_eq!(grid.walkable_count(), 8 * 4);
        assert!(grid.is_wall(0, 0));
    }

    #[test]
    fn local_window_is_clamped_to_the_canvas() {
        let canvas = PathCanvas::new(40, 40, 4);
        let grid = local_grid(&[ScaledCoord::new(2, 2), ScaledCoord::new(6, 2)], canvas);

        assert_eq!((grid.columns(), grid.rows()), (9, 5));
        assert!(grid.is_walkable(0, 0));
    }
}
