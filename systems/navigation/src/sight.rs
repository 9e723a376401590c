use snack_attack_core::{Direction, OccupancyGrid, TileRect};
use snack_attack_system_movement::Mover;

/// Direction from `seeker` toward `target` when an unobstructed straight line joins them.
///
/// Sightlines exist only along a shared row or column. The strip between
/// the two centres, as wide as the seeker's path box, must be walkable and
/// must not touch any barrier.
#[must_use]
pub fn line_of_sight(
    seeker: &Mover,
    target: &Mover,
    barriers: &[TileRect],
    grid: &OccupancyGrid,
) -> Option<Direction> {
    let direction = seeker.center().direction_to(target.center())?;
    let corridor = sight_strip(seeker, target, direction);

    if !grid.is_rect_clear(&corridor) {
        return None;
    }
    if barriers.iter().any(|barrier| barrier.intersects(&corridor)) {
        return None;
    }
    Some(direction)
}

fn sight_strip(seeker: &Mover, target: &Mover, direction: Direction) -> TileRect {
    let own = seeker.path_rect();
    let inset = (seeker.path_width() / 2) as i32;
    let (from, to) = (seeker.center(), target.center());

    if direction.is_horizontal() {
        let left = own.left().min(target.path_rect().left()) + inset;
        TileRect::new(left, own.top(), from.x().abs_diff(to.x()), own.height())
    } else {
        let top = own.top().min(target.path_rect().top()) + inset;
        TileRect::new(own.left(), top, own.width(), from.y().abs_diff(to.y()))
    }
}
