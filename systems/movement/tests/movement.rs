use std::time::Duration;

use snack_attack_core::{Direction, OccupancyGrid, ScaledCoord, Steering};
use snack_attack_system_movement::{Mover, Step};

const TICK: Duration = Duration::from_millis(125);

/// Horizontal corridor along the top of a 16x8 grid with a branch turning
/// south at its east end.
fn l_corridor() -> OccupancyGrid {
    let coords = [
        ScaledCoord::new(2, 2),
        ScaledCoord::new(6, 2),
        ScaledCoord::new(10, 2),
        ScaledCoord::new(14, 2),
        ScaledCoord::new(14, 6),
    ];
    OccupancyGrid::build(&coords, 16, 8, 4)
}

fn mover_at(x: i32, y: i32, speed: f64) -> Mover {
    Mover::new(ScaledCoord::new(x, y), 4, 2, speed)
}

#[test]
fn whole_units_moved_match_accumulated_budget() {
    let grid = l_corridor();
    let mut mover = mover_at(2, 2, 12.0);
    mover.steer(Steering::Toward(Direction::East));

    let moved: Vec<u32> = (0..6).map(|_| mover.tick(&grid, TICK).moved).collect();

    assert_eq!(moved, vec![1, 2, 1, 2, 1, 2]);
    assert_eq!(mover.center(), ScaledCoord::new(11, 2));
    assert_eq!(mover.budget(), 0.0);
}

#[test]
fn slow_movers_skip_ticks_without_stopping() {
    let grid = l_corridor();
    let mut mover = mover_at(2, 2, 2.0);
    mover.steer(Steering::Toward(Direction::East));

    let steps: Vec<Step> = (0..4).map(|_| mover.tick(&grid, TICK)).collect();

    assert!(steps[..3].iter().all(|step| *step == Step::default()));
    assert_eq!(steps[3].moved, 1);
    assert_eq!(mover.center(), ScaledCoord::new(3, 2));
}

#[test]
fn fast_mover_is_clamped_to_the_last_legal_unit() {
    let grid = l_corridor();
    let mut mover = mover_at(10, 2, 40.0);
    mover.steer(Steering::Toward(Direction::East));

    let step = mover.tick(&grid, TICK);
    assert_eq!(step.moved, 4);
    assert!(!step.stopped);
    assert_eq!(mover.center(), ScaledCoord::new(14, 2));
    assert!(grid.is_rect_clear(&mover.path_rect()));

    let blocked = mover.tick(&grid, TICK);
    assert_eq!(
        blocked,
        Step {
            moved: 0,
            direction: None,
            stopped: true,
        }
    );
    assert_eq!(mover.motion(), None);
}

#[test]
fn stopped_flag_is_transient() {
    let grid = l_corridor();
    let mut mover = mover_at(14, 2, 8.0);
    mover.steer(Steering::Toward(Direction::East));

    assert!(mover.tick(&grid, TICK).stopped);
    assert!(mover.is_stopped());

    mover.steer(Steering::Toward(Direction::West));
    let step = mover.tick(&grid, TICK);
    assert!(!step.stopped);
    assert!(!mover.is_stopped());
    assert_eq!(step.direction, Some(Direction::West));
}

#[test]
fn stopped_is_only_reported_when_budget_was_spendable() {
    let grid = l_corridor();
    let mut mover = mover_at(14, 2, 2.0);
    mover.steer(Steering::Toward(Direction::East));

    let stopped: Vec<bool> = (0..4).map(|_| mover.tick(&grid, TICK).stopped).collect();

    assert_eq!(stopped, vec![false, false, false, true]);
}

#[test]
fn legal_moves_are_reversible() {
    let grid = l_corridor();
    let mut mover = mover_at(2, 2, 24.0);
    mover.steer(Steering::Toward(Direction::East));

    for _ in 0..3 {
        let step = mover.tick(&grid, TICK);
        let direction = step.direction.expect("corridor is open eastward");
        assert!(mover.can_move(direction.reverse(), step.moved, &grid));
    }
}

#[test]
fn requested_turn_waits_until_it_becomes_legal() {
    let grid = l_corridor();
    let mut mover = mover_at(2, 2, 8.0);
    mover.steer(Steering::Toward(Direction::East));
    let _ = mover.tick(&grid, TICK);

    mover.steer(Steering::Toward(Direction::South));
    let mut turned_at = None;
    for _ in 0..20 {
        let step = mover.tick(&grid, TICK);
        if step.direction == Some(Direction::South) {
            turned_at = Some(mover.center());
            break;
        }
        assert_eq!(step.direction, Some(Direction::East));
    }

    assert_eq!(turned_at, Some(ScaledCoord::new(14, 3)));
    assert_eq!(mover.heading(), Some(Direction::South));
}

#[test]
fn unset_request_keeps_momentum() {
    let grid = l_corridor();
    let mut mover = mover_at(2, 2, 8.0);
    mover.steer(Steering::Toward(Direction::East));
    let _ = mover.tick(&grid, TICK);

    mover.steer(Steering::Unset);
    let step = mover.tick(&grid, TICK);

    assert_eq!(step.direction, Some(Direction::East));
    assert_eq!(mover.center(), ScaledCoord::new(4, 2));
}

#[test]
fn halt_clears_momentum_without_reporting_a_stop() {
    let grid = l_corridor();
    let mut mover = mover_at(2, 2, 8.0);
    mover.steer(Steering::Toward(Direction::East));
    let _ = mover.tick(&grid, TICK);

    mover.steer(Steering::Halt);
    let step = mover.tick(&grid, TICK);

    assert_eq!(step, Step::default());
    assert_eq!(mover.heading(), None);
    assert_eq!(mover.motion(), None);

    mover.steer(Steering::Unset);
    assert_eq!(mover.tick(&grid, TICK), Step::default());
}

#[test]
fn orientation_follows_direction_changes() {
    let grid = l_corridor();
    let mut mover = mover_at(13, 2, 8.0);
    mover.steer(Steering::Toward(Direction::East));
    let _ = mover.tick(&grid, TICK);
    assert_eq!(mover.orientation().facing, Some(Direction::East));

    mover.steer(Steering::Toward(Direction::South));
    let _ = mover.tick(&grid, TICK);
    let orientation = mover.orientation();
    assert_eq!(orientation.rotation_degrees, -90);
    assert!(!orientation.mirrored);
    assert_eq!(orientation.facing, Some(Direction::South));
}

#[test]
fn non_rotating_movers_keep_their_pose() {
    let grid = l_corridor();
    let mut mover = mover_at(2, 2, 8.0).rotating(false);
    mover.steer(Steering::Toward(Direction::East));
    let _ = mover.tick(&grid, TICK);

    assert_eq!(mover.orientation().facing, None);
    assert_eq!(mover.motion(), Some(Direction::East));
}

#[test]
fn reverse_turns_heading_around() {
    let grid = l_corridor();
    let mut mover = mover_at(6, 2, 8.0);
    mover.steer(Steering::Toward(Direction::East));
    let _ = mover.tick(&grid, TICK);

    assert!(mover.reverse());
    let step = mover.tick(&grid, TICK);

    assert_eq!(step.direction, Some(Direction::West));
    assert_eq!(mover.center(), ScaledCoord::new(6, 2));
}

#[test]
fn reverse_without_a_heading_changes_nothing() {
    let mut mover = mover_at(6, 2, 8.0);

    assert!(!mover.reverse());
    assert_eq!(mover.heading(), None);
    assert_eq!(mover.desired(), Steering::Unset);
}

#[test]
fn hit_boxes_decide_collisions() {
    let first = mover_at(4, 4, 1.0);
    let touching = mover_at(5, 4, 1.0);
    let apart = mover_at(6, 4, 1.0);

    assert!(first.collides_with(&touching));
    assert!(!first.collides_with(&apart));
}

#[test]
fn delta_checks_match_directional_checks() {
    let grid = l_corridor();
    let mover = mover_at(12, 2, 1.0);

    assert!(mover.can_move_by(2, 0, &grid));
    assert!(!mover.can_move_by(3, 0, &grid));
    assert!(!mover.can_move_by(0, -1, &grid));
    assert!(mover.can_move_by(0, 0, &grid));
}

#[test]
#[should_panic(expected = "diagonal displacement")]
fn diagonal_deltas_are_rejected() {
    let _ = mover_at(6, 2, 1.0).can_move_by(1, 1, &l_corridor());
}
