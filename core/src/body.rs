use bevy_math::Vec3;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::pose::Pose;
use crate::tween::PoseTween;

/// Stable index of a cube for the lifetime of its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// Who drives a cube's visual pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyState {
    /// Simulated; the visual pose follows physics every frame.
    Active,
    /// Out of the physics step; the visual pose follows the tween.
    Animating(PoseTween),
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub visual: Pose,
    pub state: BodyState,
}

impl Body {
    pub fn is_active(&self) -> bool {
        matches!(self.state, BodyState::Active)
    }

    pub fn tween(&self) -> Option<&PoseTween> {
        match &self.state {
            BodyState::Animating(tween) => Some(tween),
            BodyState::Active => None,
        }
    }
}

/// Every cube of the scene, indexed by [`BodyId`].
#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
}

impl BodyStore {
    /// Active cubes scattered above the ground.
    pub fn spawn(config: &SimulationConfig, rng: &mut impl Rng) -> Self {
        let extent = config.spawn_half_extent;
        let store = Self::from_poses((0..config.cube_count).map(|_| {
            Pose::at(Vec3::new(
                (rng.gen::<f32>() - 0.5) * 2.0 * extent,
                rng.gen::<f32>() * config.spawn_height_range + config.spawn_height_min,
                (rng.gen::<f32>() - 0.5) * 2.0 * extent,
            ))
        }));
        tracing::info!("Simulation started with {} cubes", store.len());
        store
    }

    pub fn from_poses(poses: impl IntoIterator<Item = Pose>) -> Self {
        let bodies = poses
            .into_iter()
            .enumerate()
            .map(|(index, visual)| Body {
                id: BodyId(index),
                visual,
                state: BodyState::Active,
            })
            .collect();
        Self { bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn animating_count(&self) -> usize {
        self.bodies.iter().filter(|b| !b.is_active()).count()
    }
}
