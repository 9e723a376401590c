#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic kinematics for every entity that moves through the maze.
//!
//! A [`Mover`] owns a centre point, a path box used for wall legality and a
//! hit box used for contact tests. Speeds are fractional; each tick adds
//! `speed * dt` to a budget and only whole grid units are spent, so slow
//! entities simply skip ticks and motion is independent of frame rate.

mod orientation;

use std::time::Duration;

use snack_attack_core::{Direction, OccupancyGrid, ScaledCoord, Steering, TileRect};

pub use orientation::Orientation;

/// Outcome of a single [`Mover::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step {
    /// Grid units travelled this tick.
    pub moved: u32,
    /// Direction of travel when `moved` is nonzero.
    pub direction: Option<Direction>,
    /// Whether a whole-unit budget was denied motion by walls.
    pub stopped: bool,
}

/// Kinematic state of one moving entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Mover {
    center: ScaledCoord,
    path_width: u32,
    hit_width: u32,
    speed: f64,
    budget: f64,
    desired: Steering,
    heading: Option<Direction>,
    motion: Option<Direction>,
    stopped: bool,
    orientation: Orientation,
    can_rotate: bool,
    has_moved: bool,
}

impl Mover {
    /// Creates a stationary mover centred on `center`.
    ///
    /// `speed` is expressed in grid units per second.
    #[must_use]
    pub fn new(center: ScaledCoord, path_width: u32, hit_width: u32, speed: f64) -> Self {
        Self {
            center,
            path_width,
            hit_width,
            speed,
            budget: 0.0,
            desired: Steering::Unset,
            heading: None,
            motion: None,
            stopped: false,
            orientation: Orientation::default(),
            can_rotate: true,
            has_moved: false,
        }
    }

    /// Enables or disables orientation tracking.
    #[must_use]
    pub fn rotating(mut self, can_rotate: bool) -> Self {
        self.can_rotate = can_rotate;
        self
    }

    /// Centre of the entity.
    #[must_use]
    pub const fn center(&self) -> ScaledCoord {
        self.center
    }

    /// Side of the square box checked against walls.
    #[must_use]
    pub const fn path_width(&self) -> u32 {
        self.path_width
    }

    /// Side of the square box checked against other entities.
    #[must_use]
    pub const fn hit_width(&self) -> u32 {
        self.hit_width
    }

    /// Speed in grid units per second.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Fractional distance carried over to the next tick.
    #[must_use]
    pub const fn budget(&self) -> f64 {
        self.budget
    }

    /// Most recent steering request.
    #[must_use]
    pub const fn desired(&self) -> Steering {
        self.desired
    }

    /// Direction the entity keeps travelling in while it stays legal.
    #[must_use]
    pub const fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Direction of the last accepted displacement; cleared when stopped.
    #[must_use]
    pub const fn motion(&self) -> Option<Direction> {
        self.motion
    }

    /// True only for the tick in which walls denied a nonzero budget.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Current sprite pose.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether orientation follows motion.
    #[must_use]
    pub const fn can_rotate(&self) -> bool {
        self.can_rotate
    }

    /// Whether the entity has moved since it was created or placed.
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Rectangle tested against walls.
    #[must_use]
    pub const fn path_rect(&self) -> TileRect {
        TileRect::centered(self.center, self.path_width)
    }

    /// Rectangle tested against other entities.
    #[must_use]
    pub const fn hit_rect(&self) -> TileRect {
        TileRect::centered(self.center, self.hit_width)
    }

    /// Reports whether the hit boxes of both movers overlap.
    #[must_use]
    pub const fn collides_with(&self, other: &Mover) -> bool {
        self.hit_rect().intersects(&other.hit_rect())
    }

    /// Replaces the speed, keeping any accumulated budget.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Issues a steering request, applied on the next tick.
    pub fn steer(&mut self, steering: Steering) {
        self.desired = steering;
    }

    /// Turns the entity around on the spot.
    ///
    /// Both the heading and any pending request are reversed; legality is
    /// checked on the next tick as usual. Returns false when the entity had
    /// neither a heading nor a request, in which case nothing changes.
    pub fn reverse(&mut self) -> bool {
        let Some(direction) = self.heading.or(self.desired.direction()) else {
            return false;
        };
        self.heading = Some(direction.reverse());
        self.desired = Steering::Toward(direction.reverse());
        true
    }

    /// Teleports the entity and resets every piece of motion state.
    pub fn place(&mut self, center: ScaledCoord) {
        *self = Self::new(center, self.path_width, self.hit_width, self.speed)
            .rotating(self.can_rotate);
    }

    /// Translates the entity without any legality check.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.center = ScaledCoord::new(self.center.x() + dx, self.center.y() + dy);
        self.has_moved = true;
    }

    /// Reports whether moving `distance` units in `direction` stays on walkable cells.
    ///
    /// Only the strip swept by the leading edge of the path box is tested;
    /// the rest of the box is already known to be clear.
    #[must_use]
    pub fn can_move(&self, direction: Direction, distance: u32, grid: &OccupancyGrid) -> bool {
        grid.is_rect_clear(&swept_strip(&self.path_rect(), direction, distance))
    }

    /// Delta form of [`Mover::can_move`].
    ///
    /// # Panics
    ///
    /// Panics when both components are nonzero.
    #[must_use]
    pub fn can_move_by(&self, dx: i32, dy: i32, grid: &OccupancyGrid) -> bool {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.can_move(direction, (dx + dy).unsigned_abs(), grid),
            None => grid.is_rect_clear(&self.path_rect()),
        }
    }

    /// Reports whether the next tick of length `dt` will spend at least one unit.
    #[must_use]
    pub fn is_step_imminent(&self, dt: Duration) -> bool {
        self.budget + self.speed * dt.as_secs_f64() >= 1.0
    }

    /// Advances the entity by one tick.
    pub fn tick(&mut self, grid: &OccupancyGrid, dt: Duration) -> Step {
        self.budget += self.speed * dt.as_secs_f64();
        let whole = self.budget.floor();
        self.budget -= whole;
        let whole = whole as u32;

        let attempting = self.resolve_heading(grid);
        let Some(direction) = self.heading else {
            self.stopped = attempting && whole > 0;
            if self.stopped {
                self.motion = None;
                tracing::trace!(x = self.center.x(), y = self.center.y(), "mover blocked");
            }
            return Step {
                stopped: self.stopped,
                ..Step::default()
            };
        };

        self.stopped = false;
        if whole == 0 {
            return Step::default();
        }

        let distance = self.largest_legal_step(direction, whole, grid);
        let (dx, dy) = direction.delta();
        let signed = distance as i32;
        self.move_by(dx * signed, dy * signed);

        if self.motion != Some(direction) && self.can_rotate {
            self.orientation = self.orientation.turned(direction);
        }
        self.motion = Some(direction);

        tracing::trace!(
            x = self.center.x(),
            y = self.center.y(),
            ?direction,
            distance,
            "mover advanced"
        );
        Step {
            moved: distance,
            direction: Some(direction),
            stopped: false,
        }
    }

    /// Applies the steering request to the heading.
    ///
    /// Returns true when the entity wanted to move, i.e. a heading or a
    /// directional request existed before resolution.
    fn resolve_heading(&mut self, grid: &OccupancyGrid) -> bool {
        match self.desired {
            Steering::Halt => {
                self.heading = None;
                self.motion = None;
                false
            }
            Steering::Toward(direction) if self.can_move(direction, 1, grid) => {
                self.heading = Some(direction);
                true
            }
            Steering::Toward(_) | Steering::Unset => {
                let attempting = self.heading.is_some() || self.desired != Steering::Unset;
                if let Some(heading) = self.heading {
                    if !self.can_move(heading, 1, grid) {
                        self.heading = None;
                    }
                }
                attempting
            }
        }
    }

    /// Largest step in `1..=whole` that stays legal; the first unit is known legal.
    fn largest_legal_step(&self, direction: Direction, whole: u32, grid: &OccupancyGrid) -> u32 {
        if self.can_move(direction, whole, grid) {
            return whole;
        }
        let (mut legal, mut illegal) = (1, whole);
        while illegal - legal > 1 {
            let midpoint = legal + (illegal - legal) / 2;
            if self.can_move(direction, midpoint, grid) {
                legal = midpoint;
            } else {
                illegal = midpoint;
            }
        }
        legal
    }
}

fn swept_strip(path: &TileRect, direction: Direction, distance: u32) -> TileRect {
    let reach = distance as i32;
    match direction {
        Direction::East => TileRect::new(path.right(), path.top(), distance, path.height()),
        Direction::West => TileRect::new(path.left() - reach, path.top(), distance, path.height()),
        Direction::South => TileRect::new(path.left(), path.bottom(), path.width(), distance),
        Direction::North => TileRect::new(path.left(), path.top() - reach, path.width(), distance),
    }
}
