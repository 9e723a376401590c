#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Direction selection for enemies.
//!
//! Every enemy kind shares one policy parameterised by its
//! [`BehaviorProfile`]. Enemies wander without backtracking, chase the
//! target along a clear sightline and, once a flow field is available and
//! their profile allows it, follow the field toward the target.

mod sight;

use std::time::Duration;

use rand::{seq::SliceRandom, Rng};
use snack_attack_core::{
    BehaviorProfile, Direction, EnemyKind, FlowFieldUse, OccupancyGrid, ScaledCoord, Steering,
    TileRect,
};
use snack_attack_system_movement::Mover;
use snack_attack_system_pathfinding::{FlowField, FlowVector};

pub use sight::line_of_sight;

/// Shared read-only state consulted while choosing a direction.
#[derive(Clone, Copy, Debug)]
pub struct Surroundings<'a> {
    /// Occupancy grid of the level.
    pub grid: &'a OccupancyGrid,
    /// Entity the enemies hunt, if present.
    pub target: Option<&'a Mover>,
    /// Hit boxes that block sightlines and deflect enemies.
    pub barriers: &'a [TileRect],
    /// Flow field toward the target, once one has been computed.
    pub flow: Option<&'a FlowField>,
}

/// What the policy decided for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// No whole unit of motion is due; nothing was evaluated.
    Waiting,
    /// The enemy sits on a flow-field node and adopted its vector.
    FollowingFlow(Direction),
    /// Between flow-field nodes; the current request is kept.
    Holding,
    /// The target has been seen and the way ahead is still open.
    Chasing(Direction),
    /// A non-reversing direction was picked at random.
    Wandering(Direction),
    /// Turning back is the only way forward.
    Backtracking(Direction),
    /// No direction is open; the enemy halts.
    DeadEnd,
}

/// Enemy state layered on top of its kinematics.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    mover: Mover,
    kind: EnemyKind,
    has_seen_target: bool,
    path_finding: bool,
    deflected: bool,
}

impl Enemy {
    /// Wraps a mover with the behaviour of `kind`.
    #[must_use]
    pub fn new(kind: EnemyKind, mover: Mover) -> Self {
        Self {
            mover,
            kind,
            has_seen_target: false,
            path_finding: false,
            deflected: false,
        }
    }

    /// Kinematic state.
    #[must_use]
    pub const fn mover(&self) -> &Mover {
        &self.mover
    }

    /// Mutable kinematic state, used by the world to tick the enemy.
    pub fn mover_mut(&mut self) -> &mut Mover {
        &mut self.mover
    }

    /// Enemy variant.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Behaviour parameters of the variant.
    #[must_use]
    pub const fn profile(&self) -> BehaviorProfile {
        self.kind.profile()
    }

    /// Whether the enemy has spotted its target since the last reset.
    ///
    /// Set by a successful sightline check and sticky afterwards; cleared by
    /// [`Enemy::deflect`] and [`Enemy::respawn`].
    #[must_use]
    pub const fn has_seen_target(&self) -> bool {
        self.has_seen_target
    }

    /// Whether the enemy is currently steering by the flow field.
    #[must_use]
    pub const fn is_path_finding(&self) -> bool {
        self.path_finding
    }

    /// Whether the enemy is still in contact with the barrier that last
    /// deflected it. Flow-field guidance is ignored meanwhile.
    #[must_use]
    pub const fn is_deflected(&self) -> bool {
        self.deflected
    }

    /// Turns the enemy around after it ran into a barrier.
    ///
    /// The contact counts as handled until [`Enemy::clear_deflection`] is
    /// called, so repeated calls during one contact do nothing. Returns
    /// whether the enemy actually reversed.
    pub fn deflect(&mut self) -> bool {
        if self.deflected {
            return false;
        }
        self.deflected = true;
        self.has_seen_target = false;
        self.path_finding = false;
        self.mover.reverse()
    }

    /// Ends a barrier contact once the hit box has left every barrier.
    pub fn clear_deflection(&mut self) {
        self.deflected = false;
    }

    /// Returns the enemy to `center` with every behaviour flag cleared.
    pub fn respawn(&mut self, center: ScaledCoord) {
        self.mover.place(center);
        self.has_seen_target = false;
        self.path_finding = false;
        self.deflected = false;
    }

    /// Chooses the steering request for the coming tick.
    ///
    /// Flow-field guidance takes precedence when the profile allows it, the
    /// enemy stands on a field node and it is not in contact with a barrier
    /// that deflected it; otherwise the wandering policy in
    /// [`Enemy::navigate_step`] runs.
    pub fn plan<R: Rng>(
        &mut self,
        surroundings: &Surroundings<'_>,
        dt: Duration,
        rng: &mut R,
    ) -> Decision {
        let uses_flow = !self.deflected
            && match self.profile().flow_field {
                FlowFieldUse::Never => false,
                FlowFieldUse::AfterSighting => self.has_seen_target,
                FlowFieldUse::Always => true,
            };

        if let Some(flow) = surroundings.flow.filter(|_| uses_flow) {
            match flow.vector(self.mover.center()) {
                Some(FlowVector::Toward(direction)) => {
                    self.mover.steer(Steering::Toward(direction));
                    self.path_finding = true;
                    return Decision::FollowingFlow(direction);
                }
                Some(FlowVector::Goal | FlowVector::Unreachable) => self.path_finding = false,
                None if self.path_finding => return Decision::Holding,
                None => {}
            }
        }

        self.navigate_step(
            surroundings.target,
            surroundings.barriers,
            surroundings.grid,
            dt,
            rng,
        )
    }

    /// Wandering and chasing policy, evaluated only when motion is imminent.
    ///
    /// Candidates are tested in a fixed order: straight on, the two
    /// perpendicular turns, then reverse. Reversing happens only when it is
    /// the sole option, and a chasing enemy keeps going straight while it can.
    pub fn navigate_step<R: Rng>(
        &mut self,
        target: Option<&Mover>,
        barriers: &[TileRect],
        grid: &OccupancyGrid,
        dt: Duration,
        rng: &mut R,
    ) -> Decision {
        if !self.mover.is_step_imminent(dt) {
            return Decision::Waiting;
        }

        if !self.has_seen_target {
            if let Some(direction) =
                target.and_then(|target| line_of_sight(&self.mover, target, barriers, grid))
            {
                self.mover.steer(Steering::Toward(direction));
                self.has_seen_target = true;
            }
        }

        let ahead = match self.mover.desired().direction() {
            Some(direction) => direction,
            None => {
                let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                self.mover.steer(Steering::Toward(direction));
                direction
            }
        };

        let [left, right] = ahead.orthogonals();
        let candidates = [ahead, left, right, ahead.reverse()];
        let open: Vec<Direction> = candidates
            .into_iter()
            .filter(|&direction| self.mover.can_move(direction, 1, grid))
            .collect();

        let decision = match open.as_slice() {
            [] => Decision::DeadEnd,
            [only] if *only == ahead.reverse() => Decision::Backtracking(*only),
            [first, ..] if self.has_seen_target && *first == ahead => Decision::Chasing(ahead),
            _ => {
                let forward: Vec<Direction> = open
                    .iter()
                    .copied()
                    .filter(|&direction| direction != ahead.reverse())
                    .collect();
                match forward.choose(rng) {
                    Some(&direction) => Decision::Wandering(direction),
                    None => Decision::DeadEnd,
                }
            }
        };

        match decision {
            Decision::DeadEnd => {
                tracing::debug!(
                    x = self.mover.center().x(),
                    y = self.mover.center().y(),
                    "enemy reached a dead end"
                );
                self.mover.steer(Steering::Halt);
            }
            Decision::Backtracking(direction) | Decision::Wandering(direction) => {
                self.mover.steer(Steering::Toward(direction));
            }
            Decision::Waiting
            | Decision::FollowingFlow(_)
            | Decision::Holding
            | Decision::Chasing(_) => {}
        }
        decision
    }
}
