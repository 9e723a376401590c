//! Diagonal clearance at inside corners of a painted corridor.

use snack_attack_core::OccupancyGrid;

/// Diagonal offsets `(dc, dr)` pointing from a corner cell toward its wall.
const WALL_DIAGONALS: [(i32, i32); 4] = [(-1, 1), (-1, -1), (1, 1), (1, -1)];

/// Returns false when any inside corner has an illegal diagonal gap.
///
/// An inside corner is a walkable cell whose two axis neighbours toward a
/// diagonal are walkable while the diagonal cell itself is a wall. From each
/// such corner the gap is measured away from the wall, counting walkable
/// cells (the corner included) until a wall or the grid edge. The gap must be
/// at least `brush_width`. A wider gap that ends on a wall is also illegal
/// when the last walkable cell is itself an inside corner facing back.
pub(crate) fn diagonals_are_legal(grid: &OccupancyGrid, brush_width: u32) -> bool {
    for row in 0..grid.rows() as i32 {
        for column in 0..grid.columns() as i32 {
            for (dc, dr) in WALL_DIAGONALS {
                if !is_inside_corner(grid, column, row, dc, dr) {
                    continue;
                }

                let walk = measure_gap(grid, column, row, -dc, -dr);
                if walk.span < brush_width {
                    return false;
                }
                if walk.span > brush_width && !walk.reached_edge {
                    let far_column = column - dc * (walk.span as i32 - 1);
                    let far_row = row - dr * (walk.span as i32 - 1);
                    if is_inside_corner(grid, far_column, far_row, -dc, -dr) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

fn is_inside_corner(grid: &OccupancyGrid, column: i32, row: i32, dc: i32, dr: i32) -> bool {
    grid.is_walkable(column, row)
        && grid.is_walkable(column + dc, row)
        && grid.is_walkable(column, row + dr)
        && grid.is_wall(column + dc, row + dr)
}

#[derive(Debug)]
struct DiagonalGap {
    span: u32,
    reached_edge: bool,
}

fn measure_gap(grid: &OccupancyGrid, column: i32, row: i32, dc: i32, dr: i32) -> DiagonalGap {
    let mut span = 1_u32;
    loop {
        let step = span as i32;
        let (next_column, next_row) = (column + dc * step, row + dr * step);
        if !grid.contains(next_column, next_row) {
            return DiagonalGap {
                span,
                reached_edge: true,
            };
        }
        if !grid.is_walkable(next_column, next_row) {
            return DiagonalGap {
                span,
                reached_edge: false,
            };
        }
        span += 1;
    }
}
