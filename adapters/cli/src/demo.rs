//! Built-in demo maze authored through the path builder.

use snack_attack_core::ScaledCoord;
use snack_attack_system_builder::{snap_to_spacing, PathBuilder, PathCanvas, Proposal};

/// Outcome of painting the demo maze stroke by stroke.
#[derive(Debug)]
pub(crate) struct Authoring {
    pub(crate) builder: PathBuilder,
    pub(crate) accepted: usize,
    pub(crate) rejected: Vec<Proposal>,
}

/// Cursor positions of a rectangular loop split by a vertical crossbar.
///
/// Every position is pre-aligned to the snapping step so consecutive tiles
/// overlap by a constant amount and the corridor keeps the brush width.
pub(crate) fn demo_strokes(canvas: PathCanvas, spacing: u32) -> Vec<ScaledCoord> {
    let inset = canvas.brush_width as i32;
    let snap = |x: i32, y: i32| {
        snap_to_spacing(ScaledCoord::new(x, y), canvas.brush_width, spacing)
    };
    let near = snap(inset, inset);
    let far = snap(canvas.columns as i32 - inset, canvas.rows as i32 - inset);
    let middle = snap((near.x() + far.x()) / 2, near.y()).x();
    let step = (spacing as i32).max(1);
    let (left, top, right, bottom) = (near.x(), near.y(), far.x(), far.y());

    let mut strokes = Vec::new();
    strokes.extend(run(left, right, step).map(|x| ScaledCoord::new(x, top)));
    strokes.extend(run(top + step, bottom, step).map(|y| ScaledCoord::new(right, y)));
    strokes.extend(run(left, right - step, step).rev().map(|x| ScaledCoord::new(x, bottom)));
    strokes.extend(run(top + step, bottom - step, step).rev().map(|y| ScaledCoord::new(left, y)));
    strokes.extend(run(top + step, bottom - step, step).map(|y| ScaledCoord::new(middle, y)));
    strokes
}

/// Inclusive run from `start` toward `end` in increments of `step`.
fn run(start: i32, end: i32, step: i32) -> impl DoubleEndedIterator<Item = i32> {
    let count = if end < start { 0 } else { (end - start) / step + 1 };
    (0..count).map(move |index| start + index * step)
}

/// Paints the demo maze, recording every proposal the builder refused.
pub(crate) fn author(canvas: PathCanvas, spacing: u32) -> Authoring {
    let mut builder = PathBuilder::new(canvas, spacing);
    let mut accepted = 0;
    let mut rejected = Vec::new();

    for cursor in demo_strokes(canvas, spacing) {
        match builder.propose(cursor) {
            Proposal::Accepted(_) => accepted += 1,
            Proposal::Duplicate(_) | Proposal::Unchanged => {}
            refused @ (Proposal::OutOfBounds(_) | Proposal::Rejected(..)) => {
                rejected.push(refused);
            }
        }
    }

    Authoring {
        builder,
        accepted,
        rejected,
    }
}
