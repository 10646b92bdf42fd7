use bevy_math::{Quat, Vec3};

/// Position and orientation of a cube, either as rendered or as simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub const fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Upright pose at `translation`.
    pub const fn at(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY)
    }

    /// Interpolates translation linearly and rotation spherically.
    pub fn interpolate(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t),
        }
    }
}
