use crate::body::{BodyState, BodyStore};
use crate::config::SimulationConfig;
use crate::physics::{BodyReadback, FixedTimestep, PhysicsStepper};

/// Copies the driving pose of every body into its visual pose.
///
/// Active bodies follow physics unless the engine has them asleep; animating
/// bodies follow their tween. Tween poses are never written back to physics.
pub fn sync_visuals(store: &mut BodyStore, readback: &impl BodyReadback, now: f64) {
    for body in store.iter_mut() {
        match &body.state {
            BodyState::Active => {
                if readback.is_sleeping(body.id) {
                    continue;
                }
                if let Some(pose) = readback.pose(body.id) {
                    body.visual = pose;
                }
            }
            BodyState::Animating(tween) if tween.is_finished(now) => body.visual = tween.to,
            BodyState::Animating(tween) => body.visual = tween.sample(now),
        }
    }
}

/// Per-frame driver for headless runs: fixed physics steps, then visual sync.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    timestep: FixedTimestep,
}

impl FrameLoop {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            timestep: FixedTimestep::new(dt, max_substeps),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.physics_dt, config.max_substeps)
    }

    /// Returns the number of physics steps taken.
    pub fn tick(
        &mut self,
        store: &mut BodyStore,
        stepper: &mut impl PhysicsStepper,
        now: f64,
        delta: f32,
    ) -> u32 {
        let steps = self.timestep.advance(delta);
        for _ in 0..steps {
            stepper.step(self.timestep.dt);
        }
        sync_visuals(store, &*stepper, now);
        steps
    }
}
