use snack_attack_core::Direction;

/// Sprite pose derived from recent motion, consumed by renderers.
///
/// Sprites are drawn facing east. Vertical travel rotates the sprite a
/// quarter turn and mirrors it so that its top keeps pointing the way it did
/// during the last horizontal run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Orientation {
    /// Counter-clockwise rotation applied before mirroring.
    pub rotation_degrees: i16,
    /// Whether the rotated sprite is flipped horizontally.
    pub mirrored: bool,
    /// Direction of the motion that produced this pose; `None` before the first move.
    pub facing: Option<Direction>,
}

impl Orientation {
    /// Pose after the entity starts travelling in `next`.
    #[must_use]
    pub fn turned(self, next: Direction) -> Self {
        let (rotation_degrees, mirrored) = match next {
            Direction::East => (0, false),
            Direction::West => (0, true),
            Direction::North => self.vertical_pose(90, Direction::South),
            Direction::South => self.vertical_pose(-90, Direction::North),
        };
        Self {
            rotation_degrees,
            mirrored,
            facing: Some(next),
        }
    }

    fn vertical_pose(self, rotation: i16, opposite: Direction) -> (i16, bool) {
        match self.facing {
            Some(Direction::East) => (rotation, false),
            Some(Direction::West) => (rotation, true),
            Some(facing) if facing == opposite && self.rotation_degrees == -rotation => {
                (rotation, !self.mirrored)
            }
            None => (rotation, false),
            Some(_) => (self.rotation_degrees, self.mirrored),
        }
    }
}
