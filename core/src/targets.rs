use std::fmt;

use bevy_math::{Quat, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::error::LetterfallError;
use crate::outline::GlyphSource;
use crate::pose::Pose;
use crate::surface::SurfaceSampler;
use crate::text_mesh::{TextMesh, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetailMode {
    /// Raw vertices of a low-resolution mesh, in mesh order.
    #[default]
    Coarse,
    /// One shuffled surface sample per body.
    Detailed,
}

impl DetailMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailMode::Coarse => "coarse",
            DetailMode::Detailed => "detailed",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DetailMode::Coarse => DetailMode::Detailed,
            DetailMode::Detailed => DetailMode::Coarse,
        }
    }
}

impl fmt::Display for DetailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one cube should end up. Always upright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPoint {
    pub position: Vec3,
    pub rotation: Quat,
}

impl TargetPoint {
    pub fn upright(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// Turns text into target points using one text style per detail mode.
#[derive(Debug, Clone)]
pub struct TargetSampler {
    pub coarse: TextStyle,
    pub detailed: TextStyle,
}

impl Default for TargetSampler {
    fn default() -> Self {
        Self {
            coarse: TextStyle::coarse(),
            detailed: TextStyle::detailed(),
        }
    }
}

impl TargetSampler {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            coarse: config.coarse_style,
            detailed: config.detailed_style,
        }
    }

    pub fn style(&self, mode: DetailMode) -> &TextStyle {
        match mode {
            DetailMode::Coarse => &self.coarse,
            DetailMode::Detailed => &self.detailed,
        }
    }

    /// Centered mesh for `text` in `mode`'s style.
    pub fn mesh(
        &self,
        glyphs: &impl GlyphSource,
        text: &str,
        mode: DetailMode,
    ) -> Result<TextMesh, LetterfallError> {
        let mut mesh = TextMesh::build(glyphs, text, self.style(mode))?;
        mesh.center();
        Ok(mesh)
    }

    /// Target points for `text`.
    ///
    /// Coarse returns every mesh vertex in mesh order, so repeated calls give
    /// the same sequence. Detailed draws exactly `body_count` area-weighted
    /// surface points and shuffles them. Text with no ink yields no points.
    pub fn sample(
        &self,
        glyphs: &impl GlyphSource,
        text: &str,
        mode: DetailMode,
        body_count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<TargetPoint>, LetterfallError> {
        let mesh = self.mesh(glyphs, text, mode)?;

        let points = match mode {
            DetailMode::Coarse => mesh
                .positions
                .iter()
                .copied()
                .map(TargetPoint::upright)
                .collect(),
            DetailMode::Detailed => {
                let sampler = SurfaceSampler::new(&mesh);
                if sampler.total_area() <= 0.0 {
                    tracing::warn!("text {text:?} has no surface to sample");
                    return Ok(Vec::new());
                }
                let mut points: Vec<TargetPoint> = (0..body_count)
                    .filter_map(|_| sampler.sample(rng))
                    .map(TargetPoint::upright)
                    .collect();
                points.shuffle(rng);
                points
            }
        };
        Ok(points)
    }
}
