//! Seams to the rigid-body engine.
//!
//! The core never steps bodies itself. The Bevy client implements these
//! traits over Rapier components; tests implement them with a fake.

use bevy_math::Vec3;

use crate::body::BodyId;
use crate::pose::Pose;

/// Per-body commands issued by the assignment controller.
pub trait PhysicsBackend {
    /// Removes the body from the physics step. Its physics pose goes stale
    /// until the next [`PhysicsBackend::wake`].
    fn sleep(&mut self, id: BodyId);

    /// Hands `pose` to the physics body and puts it back into the step.
    /// `velocity: None` keeps whatever velocity the body had.
    fn wake(&mut self, id: BodyId, pose: Pose, velocity: Option<Vec3>);
}

/// Read access used by the visual sync.
pub trait BodyReadback {
    fn is_sleeping(&self, id: BodyId) -> bool;
    fn pose(&self, id: BodyId) -> Option<Pose>;
}

/// A physics world the core can advance on its own (headless runs, tests).
pub trait PhysicsStepper: PhysicsBackend + BodyReadback {
    fn step(&mut self, dt: f32);
}

/// Fixed-step accumulator: frame time in, whole physics steps out.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    pub dt: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Adds `delta` seconds and returns how many steps to run now.
    ///
    /// At most `max_substeps` are returned; time beyond that is dropped so a
    /// long stall doesn't snowball into ever longer frames.
    pub fn advance(&mut self, delta: f32) -> u32 {
        if !(delta.is_finite() && delta > 0.0) || self.dt <= 0.0 {
            return 0;
        }
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if self.accumulator >= self.dt {
            self.accumulator %= self.dt;
        }
        steps
    }
}
