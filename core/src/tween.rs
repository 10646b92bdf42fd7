use bevy_math::curve::{Curve, EaseFunction};

use crate::pose::Pose;

/// Eased move of a visual pose from `from` to `to`.
///
/// Position and orientation share one tween, so replacing it cancels both
/// channels at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseTween {
    pub from: Pose,
    pub to: Pose,
    /// Clock time (seconds) the tween started at.
    pub start: f64,
    pub duration: f32,
}

impl PoseTween {
    pub fn new(from: Pose, to: Pose, start: f64, duration: f32) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.start) / self.duration as f64) as f32).clamp(0.0, 1.0)
    }

    /// Pose at `now` on a cubic ease-in-out curve.
    pub fn sample(&self, now: f64) -> Pose {
        let eased = EaseFunction::CubicInOut.sample_clamped(self.progress(now));
        self.from.interpolate(&self.to, eased)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}
