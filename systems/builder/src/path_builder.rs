//! Interactive path authoring: snapping, bounds, add, erase and undo.

use snack_attack_core::{LayoutError, LevelLayout, ScaledCoord, TileRect};

use crate::{find_layout_violation, find_violation, PathCanvas, Violation};

/// Outcome of proposing a new tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Proposal {
    /// The tile was added to the path at the snapped center.
    Accepted(ScaledCoord),
    /// The snapped center matches the previous proposal; nothing was evaluated.
    Unchanged,
    /// The snapped center is already part of the path.
    Duplicate(ScaledCoord),
    /// The snapped tile does not fit on the canvas.
    OutOfBounds(ScaledCoord),
    /// The snapped tile would break corridor uniformity.
    Rejected(ScaledCoord, Violation),
}

/// Outcome of erasing a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Erasure {
    /// The tile was removed from the path.
    Removed(ScaledCoord),
    /// No tile is painted at the snapped center.
    NotPainted,
    /// Removing the tile would leave a non-uniform layout.
    Refused(Violation),
}

/// Shifts a tile so its top-left corner lands on a multiple of `spacing`.
///
/// Remainders up to half the spacing round down, larger ones round up.
/// Coarser placement keeps turns stair-stepped and corridors aligned.
#[must_use]
pub fn snap_to_spacing(center: ScaledCoord, tile_width: u32, spacing: u32) -> ScaledCoord {
    if spacing == 0 {
        return center;
    }
    let tile = TileRect::centered(center, tile_width);
    let spacing = spacing as i32;
    let shift = |origin: i32| {
        let remainder = origin.rem_euclid(spacing);
        if remainder * 2 <= spacing {
            -remainder
        } else {
            spacing - remainder
        }
    };
    ScaledCoord::new(center.x() + shift(tile.left()), center.y() + shift(tile.top()))
}

/// Reports whether the brush tile at `center` lies entirely on the canvas.
#[must_use]
pub fn tile_within_bounds(center: ScaledCoord, canvas: PathCanvas) -> bool {
    canvas.bounds().contains(&canvas.tile(center))
}

/// Accumulates painted tiles, rejecting any that would break uniformity.
#[derive(Clone, Debug)]
pub struct PathBuilder {
    canvas: PathCanvas,
    spacing: u32,
    coords: Vec<ScaledCoord>,
    last_proposed: Option<ScaledCoord>,
}

impl PathBuilder {
    /// Creates an empty builder for the canvas, snapping to `spacing`.
    #[must_use]
    pub fn new(canvas: PathCanvas, spacing: u32) -> Self {
        Self {
            canvas,
            spacing,
            coords: Vec::new(),
            last_proposed: None,
        }
    }

    /// Canvas the builder paints on.
    #[must_use]
    pub const fn canvas(&self) -> PathCanvas {
        self.canvas
    }

    /// Accepted tile centers in painting order.
    #[must_use]
    pub fn coords(&self) -> &[ScaledCoord] {
        &self.coords
    }

    /// Snaps the cursor and adds the resulting tile when it keeps the path uniform.
    pub fn propose(&mut self, cursor: ScaledCoord) -> Proposal {
        let center = snap_to_spacing(cursor, self.canvas.brush_width, self.spacing);
        if self.coords.contains(&center) {
            return Proposal::Duplicate(center);
        }
        if self.last_proposed == Some(center) {
            return Proposal::Unchanged;
        }
        self.last_proposed = Some(center);

        if !tile_within_bounds(center, self.canvas) {
            tracing::debug!(x = center.x(), y = center.y(), "path tile outside canvas");
            return Proposal::OutOfBounds(center);
        }

        if let Some(violation) = find_violation(&self.coords, center, self.canvas) {
            tracing::debug!(
                x = center.x(),
                y = center.y(),
                %violation,
                "path tile rejected"
            );
            return Proposal::Rejected(center, violation);
        }

        self.coords.push(center);
        Proposal::Accepted(center)
    }

    /// Removes the tile under the cursor if the remaining layout stays uniform.
    pub fn erase(&mut self, cursor: ScaledCoord) -> Erasure {
        let center = snap_to_spacing(cursor, self.canvas.brush_width, self.spacing);
        let Some(index) = self.coords.iter().position(|coord| *coord == center) else {
            return Erasure::NotPainted;
        };

        let mut remaining = self.coords.clone();
        let _ = remaining.remove(index);
        if let Some(violation) = find_layout_violation(&remaining, self.canvas) {
            tracing::debug!(x = center.x(), y = center.y(), %violation, "erase refused");
            return Erasure::Refused(violation);
        }

        self.coords = remaining;
        if self.last_proposed == Some(center) {
            self.last_proposed = None;
        }
        Erasure::Removed(center)
    }

    /// Removes the most recently accepted tile.
    pub fn undo(&mut self) -> Option<ScaledCoord> {
        let removed = self.coords.pop();
        self.last_proposed = None;
        removed
    }

    /// Converts the painted path into a validated level layout.
    pub fn into_layout(self) -> Result<LevelLayout, LayoutError> {
        LevelLayout::new(
            self.canvas.columns,
            self.canvas.rows,
            self.canvas.brush_width,
            self.coords,
        )
    }
}
