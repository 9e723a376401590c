use std::{collections::HashSet, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snack_attack_core::{Direction, EnemyKind, OccupancyGrid, ScaledCoord, Steering, TileRect};
use snack_attack_system_movement::Mover;
use snack_attack_system_navigation::{line_of_sight, Decision, Enemy, Surroundings};
use snack_attack_system_pathfinding::{compute_flow_field, FlowField, NavGraph};

const TICK: Duration = Duration::from_millis(125);
const TILE: u32 = 4;

fn straight_path() -> Vec<ScaledCoord> {
    (0..4).map(|step| ScaledCoord::new(2 + 4 * step, 2)).collect()
}

fn straight_grid() -> OccupancyGrid {
    OccupancyGrid::build(&straight_path(), 16, 4, TILE)
}

fn straight_flow(goal: ScaledCoord) -> FlowField {
    let graph = NavGraph::build(&straight_path(), TILE);
    compute_flow_field(&graph, goal).expect("goal lies on the path")
}

fn enemy_at(kind: EnemyKind, x: i32, y: i32) -> Enemy {
    Enemy::new(kind, Mover::new(ScaledCoord::new(x, y), TILE, TILE, 8.0))
}

fn target_at(x: i32, y: i32) -> Mover {
    Mover::new(ScaledCoord::new(x, y), TILE, TILE, 8.0)
}

#[test]
fn lone_reverse_option_is_taken_for_every_seed() {
    let grid = OccupancyGrid::build(&[ScaledCoord::new(2, 2), ScaledCoord::new(6, 2)], 8, 4, TILE);

    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut enemy = enemy_at(EnemyKind::Wanderer, 6, 2);
        enemy.mover_mut().steer(Steering::Toward(Direction::East));

        let decision = enemy.navigate_step(None, &[], &grid, TICK, &mut rng);

        assert_eq!(decision, Decision::Backtracking(Direction::West));
        assert_eq!(enemy.mover().desired(), Steering::Toward(Direction::West));
    }
}

#[test]
fn enclosed_enemy_halts() {
    let grid = OccupancyGrid::build(&[ScaledCoord::new(2, 2)], 4, 4, TILE);
    let mut enemy = enemy_at(EnemyKind::Wanderer, 2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    assert_eq!(
        enemy.navigate_step(None, &[], &grid, TICK, &mut rng),
        Decision::DeadEnd
    );
    assert_eq!(enemy.mover().desired(), Steering::Halt);
}

#[test]
fn wandering_avoids_backtracking_at_junctions() {
    let crossroads = [
        ScaledCoord::new(6, 6),
        ScaledCoord::new(2, 6),
        ScaledCoord::new(10, 6),
        ScaledCoord::new(6, 2),
        ScaledCoord::new(6, 10),
    ];
    let grid = OccupancyGrid::build(&crossroads, 12, 12, TILE);
    let mut chosen = HashSet::new();

    for seed in 0..64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut enemy = enemy_at(EnemyKind::Wanderer, 6, 6);
        enemy.mover_mut().steer(Steering::Toward(Direction::East));

        match enemy.navigate_step(None, &[], &grid, TICK, &mut rng) {
            Decision::Wandering(direction) => {
                assert_ne!(direction, Direction::West);
                let _ = chosen.insert(direction);
            }
            other => panic!("unexpected decision {other:?}"),
        }
    }

    assert_eq!(
        chosen,
        HashSet::from([Direction::East, Direction::North, Direction::South])
    );
}

#[test]
fn identical_state_and_seed_give_identical_choices() {
    let run = || {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut enemy = enemy_at(EnemyKind::Wanderer, 6, 2);
        let grid = straight_grid();
        (0..8)
            .map(|_| {
                let decision = enemy.navigate_step(None, &[], &grid, TICK, &mut rng);
                let _ = enemy.mover_mut().tick(&grid, TICK);
                decision
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn clear_sightline_starts_a_chase() {
    let grid = straight_grid();
    let target = target_at(14, 2);
    let mut enemy = enemy_at(EnemyKind::Tracker, 2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let decision = enemy.navigate_step(Some(&target), &[], &grid, TICK, &mut rng);

    assert_eq!(decision, Decision::Chasing(Direction::East));
    assert!(enemy.has_seen_target());
}

#[test]
fn sightlines_need_alignment_open_floor_and_no_barriers() {
    let grid = straight_grid();
    let seeker = target_at(2, 2);

    assert_eq!(
        line_of_sight(&seeker, &target_at(14, 2), &[], &grid),
        Some(Direction::East)
    );
    assert_eq!(line_of_sight(&seeker, &target_at(14, 3), &[], &grid), None);
    assert_eq!(line_of_sight(&seeker, &seeker, &[], &grid), None);

    let barrier = TileRect::centered(ScaledCoord::new(8, 2), 2);
    assert_eq!(
        line_of_sight(&seeker, &target_at(14, 2), &[barrier], &grid),
        None
    );

    let gapped = OccupancyGrid::build(
        &[
            ScaledCoord::new(2, 2),
            ScaledCoord::new(6, 2),
            ScaledCoord::new(14, 2),
        ],
        16,
        4,
        TILE,
    );
    assert_eq!(line_of_sight(&seeker, &target_at(14, 2), &[], &gapped), None);
}

#[test]
fn barrier_hides_the_target() {
    let grid = straight_grid();
    let target = target_at(14, 2);
    let barriers = [TileRect::centered(ScaledCoord::new(8, 2), 2)];
    let mut enemy = enemy_at(EnemyKind::Tracker, 2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let _ = enemy.navigate_step(Some(&target), &barriers, &grid, TICK, &mut rng);

    assert!(!enemy.has_seen_target());
}

#[test]
fn invincible_enemies_follow_the_field_on_nodes() {
    let grid = straight_grid();
    let flow = straight_flow(ScaledCoord::new(14, 2));
    let surroundings = Surroundings {
        grid: &grid,
        target: None,
        barriers: &[],
        flow: Some(&flow),
    };
    let mut enemy = enemy_at(EnemyKind::Invincible, 2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    assert_eq!(
        enemy.plan(&surroundings, TICK, &mut rng),
        Decision::FollowingFlow(Direction::East)
    );
    assert!(enemy.is_path_finding());

    enemy.mover_mut().move_by(1, 0);
    assert_eq!(enemy.plan(&surroundings, TICK, &mut rng), Decision::Holding);
    assert_eq!(enemy.mover().desired(), Steering::Toward(Direction::East));
}

#[test]
fn wanderers_ignore_the_field() {
    let grid = straight_grid();
    let flow = straight_flow(ScaledCoord::new(14, 2));
    let surroundings = Surroundings {
        grid: &grid,
        target: None,
        barriers: &[],
        flow: Some(&flow),
    };
    let mut enemy = enemy_at(EnemyKind::Wanderer, 6, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let decision = enemy.plan(&surroundings, TICK, &mut rng);

    assert!(!matches!(decision, Decision::FollowingFlow(_)));
    assert!(!enemy.is_path_finding());
}

#[test]
fn trackers_switch_to_the_field_after_a_sighting() {
    let grid = straight_grid();
    let target = target_at(14, 2);
    let flow = straight_flow(ScaledCoord::new(14, 2));
    let surroundings = Surroundings {
        grid: &grid,
        target: Some(&target),
        barriers: &[],
        flow: Some(&flow),
    };
    let mut enemy = enemy_at(EnemyKind::Tracker, 2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    assert_eq!(
        enemy.plan(&surroundings, TICK, &mut rng),
        Decision::Chasing(Direction::East)
    );
    assert_eq!(
        enemy.plan(&surroundings, TICK, &mut rng),
        Decision::FollowingFlow(Direction::East)
    );
}

#[test]
fn reaching_the_goal_node_returns_to_wandering() {
    let grid = straight_grid();
    let flow = straight_flow(ScaledCoord::new(14, 2));
    let surroundings = Surroundings {
        grid: &grid,
        target: None,
        barriers: &[],
        flow: Some(&flow),
    };
    let mut enemy = enemy_at(EnemyKind::Invincible, 14, 2);
    enemy.mover_mut().steer(Steering::Toward(Direction::East));
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    assert_eq!(
        enemy.plan(&surroundings, TICK, &mut rng),
        Decision::Backtracking(Direction::West)
    );
    assert!(!enemy.is_path_finding());
}

#[test]
fn respawn_clears_behaviour_flags() {
    let grid = straight_grid();
    let target = target_at(14, 2);
    let mut enemy = enemy_at(EnemyKind::Tracker, 2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let _ = enemy.navigate_step(Some(&target), &[], &grid, TICK, &mut rng);
    let _ = enemy.mover_mut().tick(&grid, TICK);

    enemy.respawn(ScaledCoord::new(6, 2));

    assert!(!enemy.has_seen_target());
    assert_eq!(enemy.mover().center(), ScaledCoord::new(6, 2));
    assert_eq!(enemy.mover().desired(), Steering::Unset);
}

#[test]
fn deflected_enemies_ignore_the_field_until_contact_ends() {
    let grid = straight_grid();
    let flow = straight_flow(ScaledCoord::new(14, 2));
    let surroundings = Surroundings {
        grid: &grid,
        target: None,
        barriers: &[],
        flow: Some(&flow),
    };
    let mut enemy = enemy_at(EnemyKind::Invincible, 6, 2);
    enemy.mover_mut().steer(Steering::Toward(Direction::East));
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    assert!(enemy.deflect());
    assert_eq!(
        enemy.plan(&surroundings, TICK, &mut rng),
        Decision::Wandering(Direction::West)
    );

    enemy.clear_deflection();
    assert_eq!(
        enemy.plan(&surroundings, TICK, &mut rng),
        Decision::FollowingFlow(Direction::East)
    );
}
