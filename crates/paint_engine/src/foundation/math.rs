//! Math utilities and types
//!
//! Provides the integer coordinate types used by the paint core. World
//! coordinates are in map units (32 units per tile), screen coordinates are
//! in pixels at the viewport's zoom level. All rotations are quantised to
//! the four 90-degree isometric camera orientations.

pub use nalgebra::{Vector2, Vector3};

/// 2D world coordinate (map units)
pub type WorldXY = Vector2<i32>;

/// 3D world coordinate (map units, z in height units)
pub type WorldXYZ = Vector3<i32>;

/// 2D screen coordinate (pixels)
pub type ScreenXY = Vector2<i32>;

/// Width of one map tile in world units
pub const TILE_SIZE: i32 = 32;

/// One of the four fixed 90-degree quantised camera orientations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// Default orientation
    #[default]
    R0,
    /// Rotated 90 degrees clockwise
    R1,
    /// Rotated 180 degrees
    R2,
    /// Rotated 270 degrees clockwise
    R3,
}

impl Rotation {
    /// All rotations in index order
    pub const ALL: [Self; 4] = [Self::R0, Self::R1, Self::R2, Self::R3];

    /// Rotation from a numeric index; only the low two bits are used
    #[must_use]
    pub fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::R0,
            1 => Self::R1,
            2 => Self::R2,
            _ => Self::R3,
        }
    }

    /// Numeric index of this rotation (0-3)
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::R0 => 0,
            Self::R1 => 1,
            Self::R2 => 2,
            Self::R3 => 3,
        }
    }

    /// The rotation applied to paint offsets and bounding boxes.
    ///
    /// World-to-screen rotation and bounding-box rotation are computed in
    /// opposite traversal order, so rotations 1 and 3 swap here.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self::from_index(self.index().wrapping_mul(3))
    }
}

/// Rotate a 2D world coordinate by a quantised camera rotation
#[must_use]
pub fn rotate_xy(v: WorldXY, rotation: Rotation) -> WorldXY {
    match rotation {
        Rotation::R0 => v,
        Rotation::R1 => WorldXY::new(v.y, -v.x),
        Rotation::R2 => WorldXY::new(-v.x, -v.y),
        Rotation::R3 => WorldXY::new(-v.y, v.x),
    }
}

/// Rotate a 3D world coordinate about the z axis by a quantised rotation
#[must_use]
pub fn rotate_xyz(v: WorldXYZ, rotation: Rotation) -> WorldXYZ {
    let xy = rotate_xy(WorldXY::new(v.x, v.y), rotation);
    WorldXYZ::new(xy.x, xy.y, v.z)
}

/// Project a 3D world coordinate into 2D screen space for a camera rotation.
///
/// The halving must floor toward negative infinity, not truncate: rotations
/// 1-3 negate coordinates, and an odd negative sum divided with `/` would
/// land one pixel high.
#[must_use]
pub fn project_to_screen(rotation: Rotation, pos: WorldXYZ) -> ScreenXY {
    let rotated = rotate_xy(WorldXY::new(pos.x, pos.y), rotation);
    ScreenXY::new(rotated.y - rotated.x, ((rotated.x + rotated.y) >> 1) - pos.z)
}

/// Floor-align a value to a power-of-two step.
///
/// Rounds toward negative infinity, so negative screen coordinates snap
/// consistently with positive ones.
#[must_use]
pub fn floor_align(value: i32, step: i32) -> i32 {
    debug_assert!(step > 0 && (step as u32).is_power_of_two());
    value & !(step - 1)
}
