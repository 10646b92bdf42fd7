use bevy_math::Vec3;
use rand::Rng;

use crate::body::{BodyState, BodyStore};
use crate::config::SimulationConfig;
use crate::physics::PhysicsBackend;
use crate::targets::TargetPoint;
use crate::tween::PoseTween;

/// Outcome of one [`AssignmentController::form_text`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormReport {
    /// Bodies now flying to a target.
    pub formed: usize,
    /// Bodies handed back to physics for lack of a target.
    pub released: usize,
    /// Targets left over because there were more points than bodies.
    pub dropped: usize,
}

/// Moves bodies between physics control and target animations.
///
/// Every call cancels whatever animation a body had before deciding what it
/// does next, so the latest command always wins.
#[derive(Debug, Clone)]
pub struct AssignmentController {
    pub form_duration: f32,
    pub scatter_horizontal: f32,
    pub scatter_vertical: f32,
}

impl Default for AssignmentController {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl AssignmentController {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            form_duration: config.form_duration,
            scatter_horizontal: config.scatter_horizontal,
            scatter_vertical: config.scatter_vertical,
        }
    }

    /// Body `i` takes `targets[i]`; bodies past the end of `targets` go back
    /// to physics from their current visual pose.
    pub fn form_text(
        &self,
        store: &mut BodyStore,
        targets: &[TargetPoint],
        now: f64,
        physics: &mut impl PhysicsBackend,
    ) -> FormReport {
        let mut report = FormReport::default();

        for (index, body) in store.iter_mut().enumerate() {
            body.state = BodyState::Active;

            match targets.get(index) {
                Some(target) => {
                    physics.sleep(body.id);
                    body.state = BodyState::Animating(PoseTween::new(
                        body.visual,
                        target.pose(),
                        now,
                        self.form_duration,
                    ));
                    report.formed += 1;
                }
                None => {
                    physics.wake(body.id, body.visual, None);
                    report.released += 1;
                }
            }
        }

        report.dropped = targets.len().saturating_sub(store.len());
        if report.dropped > 0 {
            tracing::warn!(
                "{} target points exceed {} cubes and were dropped",
                report.dropped,
                store.len()
            );
        }
        report
    }

    /// Releases every body to physics with a small random kick.
    pub fn fall_down(
        &self,
        store: &mut BodyStore,
        physics: &mut impl PhysicsBackend,
        rng: &mut impl Rng,
    ) -> usize {
        for body in store.iter_mut() {
            body.state = BodyState::Active;
            let velocity = self.scatter_velocity(rng);
            physics.wake(body.id, body.visual, Some(velocity));
        }
        store.len()
    }

    /// Horizontal jitter in [-h, h) on x and z, upward speed in [0, v).
    pub fn scatter_velocity(&self, rng: &mut impl Rng) -> Vec3 {
        Vec3::new(
            (rng.gen::<f32>() - 0.5) * 2.0 * self.scatter_horizontal,
            rng.gen::<f32>() * self.scatter_vertical,
            (rng.gen::<f32>() - 0.5) * 2.0 * self.scatter_horizontal,
        )
    }
}
