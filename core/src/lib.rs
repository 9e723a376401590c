#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snack Attack movement engine.
//!
//! This crate defines the geometry every other crate speaks: the two
//! coordinate spaces, half-open tile rectangles, cardinal directions and the
//! [`OccupancyGrid`] built from painted path tiles. It also carries the
//! message surface used by the world: adapters submit [`Command`] values, the
//! world applies them and reports [`Event`] values back.

mod grid;
mod layout;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use grid::OccupancyGrid;
pub use layout::{LayoutError, LevelLayout};

/// Cardinal movement directions. Diagonal travel does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in the order wandering entities sample them.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    /// Unit displacement `(dx, dy)` for the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// The two perpendicular directions, in the fixed order navigation tests them.
    ///
    /// The first entry swaps the delta components and the second entry is its
    /// negation, so `East` yields `[South, North]` and `North` yields
    /// `[West, East]`.
    #[must_use]
    pub const fn orthogonals(self) -> [Self; 2] {
        match self {
            Self::North => [Self::West, Self::East],
            Self::East => [Self::South, Self::North],
            Self::South => [Self::East, Self::West],
            Self::West => [Self::North, Self::South],
        }
    }

    /// Returns true when the direction moves along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// Converts a single-axis delta into a direction.
    ///
    /// Returns `None` for the zero delta.
    ///
    /// # Panics
    ///
    /// Panics when both components are nonzero. Diagonal displacements are a
    /// caller bug, not a runtime condition.
    #[must_use]
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        assert!(
            dx == 0 || dy == 0,
            "diagonal displacement ({dx}, {dy}) is not a legal movement"
        );
        match (dx.signum(), dy.signum()) {
            (1, _) => Some(Self::East),
            (-1, _) => Some(Self::West),
            (_, 1) => Some(Self::South),
            (_, -1) => Some(Self::North),
            _ => None,
        }
    }
}

/// Heading requested for an entity.
///
/// `Unset` and `Halt` are deliberately distinct: an unset request keeps the
/// entity's momentum while a halt clears it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Steering {
    /// No request has been issued; the current heading is kept while legal.
    #[default]
    Unset,
    /// Explicit stop request.
    Halt,
    /// Travel in the provided direction as soon as it becomes legal.
    Toward(Direction),
}

impl Steering {
    /// Direction carried by the request, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Toward(direction) => Some(direction),
            Self::Unset | Self::Halt => None,
        }
    }
}

/// Raw pixel coordinate as produced by level files and the authoring tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PixelCoord {
    x: i32,
    y: i32,
}

impl PixelCoord {
    /// Creates a new raw pixel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Coordinate in scaled grid space. Every grid operation works in this space.
///
/// A coordinate names the center of a square tile whose width is known from
/// context (brush width while painting, path width for entities).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScaledCoord {
    x: i32,
    y: i32,
}

impl ScaledCoord {
    /// Creates a new scaled coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Coordinate reached by travelling `distance` units in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    /// Direction from `self` toward `other` when both lie on one axis.
    ///
    /// Returns `None` for coincident or unaligned coordinates.
    #[must_use]
    pub fn direction_to(self, other: ScaledCoord) -> Option<Direction> {
        if self.x != other.x && self.y != other.y {
            return None;
        }
        Direction::from_delta(other.x - self.x, other.y - self.y)
    }
}

/// Maze fidelity: the divisor turning raw pixels into scaled grid units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    /// Four raw pixels per grid unit.
    Coarse,
    /// Two raw pixels per grid unit.
    #[default]
    Normal,
    /// One raw pixel per grid unit.
    Fine,
}

impl Fidelity {
    /// Number of raw pixels folded into one grid unit.
    #[must_use]
    pub const fn factor(self) -> i32 {
        match self {
            Self::Coarse => 4,
            Self::Normal => 2,
            Self::Fine => 1,
        }
    }

    /// Converts a raw pixel coordinate into grid space, truncating.
    #[must_use]
    pub const fn scale(self, coord: PixelCoord) -> ScaledCoord {
        ScaledCoord::new(coord.x / self.factor(), coord.y / self.factor())
    }

    /// Converts a raw pixel length into grid units, truncating.
    #[must_use]
    pub const fn scale_length(self, length: u32) -> u32 {
        length / self.factor().unsigned_abs()
    }
}

/// Named pacing presets shared by every moving entity in a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSpeed {
    /// 144 raw pixels per second.
    #[default]
    Slow,
    /// 180 raw pixels per second.
    Medium,
    /// 240 raw pixels per second.
    Fast,
    /// 360 raw pixels per second.
    Frantic,
}

impl LevelSpeed {
    /// Base speed in raw pixels per second.
    #[must_use]
    pub const fn pixels_per_second(self) -> u32 {
        match self {
            Self::Slow => 144,
            Self::Medium => 180,
            Self::Fast => 240,
            Self::Frantic => 360,
        }
    }

    /// Speed in scaled grid units per second for the provided fidelity.
    #[must_use]
    pub fn scaled_speed(self, fidelity: Fidelity) -> f64 {
        f64::from(fidelity.scale_length(self.pixels_per_second()))
    }
}

/// Axis-aligned rectangle in scaled grid space.
///
/// The right and bottom edges are excluded, matching discrete cell coverage:
/// a rectangle with `left == 2` and `width == 3` covers columns 2, 3 and 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
}

impl TileRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Square tile of side `width` whose center is `center`.
    ///
    /// The top-left corner sits `width / 2` units before the center, so odd
    /// widths place the extra cell after the center.
    #[must_use]
    pub const fn centered(center: ScaledCoord, width: u32) -> Self {
        let half = (width / 2) as i32;
        Self::new(center.x - half, center.y - half, width, width)
    }

    /// First covered column.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// First covered row.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Column just past the rectangle.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    /// Row just past the rectangle.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }

    /// Horizontal extent in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Vertical extent in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns true when the rectangle covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reports whether both rectangles share at least one cell.
    ///
    /// Rectangles that merely touch along an edge do not intersect, and an
    /// empty rectangle intersects nothing.
    #[must_use]
    pub const fn intersects(&self, other: &TileRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Reports whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains(&self, other: &TileRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Rectangle grown by `amount` cells on every side.
    #[must_use]
    pub const fn expanded(&self, amount: u32) -> Self {
        Self::new(
            self.left - amount as i32,
            self.top - amount as i32,
            self.width + 2 * amount,
            self.height + 2 * amount,
        )
    }

    /// Rectangle moved by the provided delta.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Smallest rectangle covering both inputs.
    #[must_use]
    pub fn union(&self, other: &TileRect) -> Self {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(
            left,
            top,
            (right - left).unsigned_abs(),
            (bottom - top).unsigned_abs(),
        )
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a barrier item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BarrierId(u32);

impl BarrierId {
    /// Creates a new barrier identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Every mobile entity the world simulates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Actor {
    /// The player-controlled entity.
    Player,
    /// The single in-flight projectile.
    Projectile,
    /// A non-player entity.
    Enemy(EnemyId),
}

/// How an enemy makes use of a computed flow field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowFieldUse {
    /// The enemy only wanders and chases along sightlines.
    Never,
    /// The enemy routes through the field once it has seen the target.
    AfterSighting,
    /// The enemy routes through the field whenever one is available.
    Always,
}

/// Behaviour parameters consumed by the shared navigation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BehaviorProfile {
    /// Whether projectile hits destroy the enemy.
    pub can_be_damaged: bool,
    /// When the enemy follows the flow field.
    pub flow_field: FlowFieldUse,
}

/// Enemy variants. All of them share one navigation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Wanders randomly and charges along clear sightlines.
    Wanderer,
    /// Wanders until it spots the target, then tracks it through the maze.
    Tracker,
    /// Cannot be damaged and always hunts the target through the maze.
    Invincible,
}

impl EnemyKind {
    /// Behaviour parameters for the variant.
    #[must_use]
    pub const fn profile(self) -> BehaviorProfile {
        match self {
            Self::Wanderer => BehaviorProfile {
                can_be_damaged: true,
                flow_field: FlowFieldUse::Never,
            },
            Self::Tracker => BehaviorProfile {
                can_be_damaged: true,
                flow_field: FlowFieldUse::AfterSighting,
            },
            Self::Invincible => BehaviorProfile {
                can_be_damaged: false,
                flow_field: FlowFieldUse::Always,
            },
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Updates the player's requested heading.
    SteerPlayer {
        /// Heading produced by input handling.
        steering: Steering,
    },
    /// Advances the simulation by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Fires a projectile ahead of the player if none is in flight.
    LaunchProjectile,
    /// Returns the player and every enemy to their spawn points.
    RespawnActors,
    /// Adds an enemy of the provided kind at the provided coordinate.
    SpawnEnemy {
        /// Variant of the new enemy.
        kind: EnemyKind,
        /// Center of the new enemy in grid space.
        at: ScaledCoord,
    },
    /// Places a barrier item that blocks sightlines and deflects enemies.
    PlaceBarrier {
        /// Center of the barrier in grid space.
        at: ScaledCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an actor changed position.
    ActorMoved {
        /// Actor that moved.
        actor: Actor,
        /// Center before the move.
        from: ScaledCoord,
        /// Center after the move.
        to: ScaledCoord,
    },
    /// Reports that an actor's step budget was denied by a wall this tick.
    ActorStopped {
        /// Actor that was blocked.
        actor: Actor,
    },
    /// Reports that the flow field was recomputed toward a new goal.
    FlowFieldRebuilt {
        /// Node the field now converges on.
        goal: ScaledCoord,
    },
    /// Reports that an enemy bounced off a barrier.
    EnemyDeflected {
        /// Enemy that turned around.
        enemy: EnemyId,
        /// Barrier that caused the bounce.
        barrier: BarrierId,
    },
    /// Confirms that an enemy joined the level.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Center where the enemy appeared.
        at: ScaledCoord,
    },
    /// Confirms that a barrier was placed.
    BarrierPlaced {
        /// Identifier assigned to the barrier.
        barrier: BarrierId,
        /// Center of the barrier.
        at: ScaledCoord,
    },
    /// Confirms that a projectile left the player.
    ProjectileLaunched {
        /// Center where the projectile appeared.
        at: ScaledCoord,
        /// Direction of flight.
        direction: Direction,
    },
    /// Reports that the projectile was removed from play.
    ProjectileSpent {
        /// Last center of the projectile.
        at: ScaledCoord,
    },
    /// Reports that the projectile struck an enemy.
    EnemyHit {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Whether the enemy was removed.
        destroyed: bool,
    },
    /// Reports that an enemy touched the player.
    PlayerCaught {
        /// Enemy that reached the player.
        enemy: EnemyId,
    },
    /// Confirms that the player and enemies returned to their spawn points.
    ActorsRespawned,
}
