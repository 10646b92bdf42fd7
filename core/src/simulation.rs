use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::body::BodyStore;
use crate::config::SimulationConfig;
use crate::controller::{AssignmentController, FormReport};
use crate::error::LetterfallError;
use crate::font::FontSlot;
use crate::frame::{sync_visuals, FrameLoop};
use crate::outline::GlyphSource;
use crate::physics::{BodyReadback, PhysicsBackend, PhysicsStepper};
use crate::targets::{DetailMode, TargetSampler};

/// What a submission did to the cubes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Submission {
    /// Empty text: every cube was released with a random kick.
    Released { bodies: usize },
    /// Cubes were sent toward the lettering.
    Formed {
        mode: DetailMode,
        points: usize,
        report: FormReport,
    },
}

/// Everything the scene needs between frames: the cubes, the font, and the
/// services that move cubes around.
pub struct Simulation<G> {
    pub bodies: BodyStore,
    pub controller: AssignmentController,
    pub sampler: TargetSampler,
    pub font: FontSlot<G>,
    frame: FrameLoop,
    rng: ChaCha8Rng,
}

impl<G: GlyphSource> Simulation<G> {
    pub fn new(config: &SimulationConfig) -> Self {
        let mut rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let bodies = BodyStore::spawn(config, &mut rng);
        Self {
            bodies,
            controller: AssignmentController::from_config(config),
            sampler: TargetSampler::from_config(config),
            font: FontSlot::default(),
            frame: FrameLoop::from_config(config),
            rng,
        }
    }

    /// Submit button / Enter. Empty text releases everything, anything else
    /// forms lettering and needs the font.
    pub fn submit(
        &mut self,
        text: &str,
        mode: DetailMode,
        now: f64,
        physics: &mut impl PhysicsBackend,
    ) -> Result<Submission, LetterfallError> {
        if text.is_empty() {
            return Ok(self.fall_down(physics));
        }
        self.form_text(text, mode, now, physics)
    }

    pub fn form_text(
        &mut self,
        text: &str,
        mode: DetailMode,
        now: f64,
        physics: &mut impl PhysicsBackend,
    ) -> Result<Submission, LetterfallError> {
        let glyphs = self.font.ready()?;
        let targets = self
            .sampler
            .sample(glyphs, text, mode, self.bodies.len(), &mut self.rng)?;
        let report = self
            .controller
            .form_text(&mut self.bodies, &targets, now, physics);

        tracing::info!(
            "Forming {text:?} ({mode}): {} points, {} cubes used, {} released",
            targets.len(),
            report.formed,
            report.released
        );
        Ok(Submission::Formed {
            mode,
            points: targets.len(),
            report,
        })
    }

    pub fn fall_down(&mut self, physics: &mut impl PhysicsBackend) -> Submission {
        let bodies = self
            .controller
            .fall_down(&mut self.bodies, physics, &mut self.rng);
        tracing::info!("Released {bodies} cubes");
        Submission::Released { bodies }
    }

    /// Visual sync only, for hosts that step physics themselves.
    pub fn sync(&mut self, now: f64, readback: &impl BodyReadback) {
        sync_visuals(&mut self.bodies, readback, now);
    }

    /// Fixed steps plus sync, for hosts that hand the core a stepper.
    pub fn tick(&mut self, now: f64, delta: f32, stepper: &mut impl PhysicsStepper) -> u32 {
        self.frame.tick(&mut self.bodies, stepper, now, delta)
    }

    /// Throws away every cube and scatters a fresh set. The font stays loaded.
    pub fn respawn(&mut self, config: &SimulationConfig) {
        self.bodies = BodyStore::spawn(config, &mut self.rng);
        self.controller = AssignmentController::from_config(config);
        self.sampler = TargetSampler::from_config(config);
        self.frame = FrameLoop::from_config(config);
    }
}
