use bevy_math::Vec3;
use rand::Rng;

use crate::text_mesh::TextMesh;

/// Area-weighted random points on a triangle mesh.
pub struct SurfaceSampler<'a> {
    mesh: &'a TextMesh,
    /// Running sum of triangle areas; `cumulative[i]` includes triangle i.
    cumulative: Vec<f32>,
}

impl<'a> SurfaceSampler<'a> {
    pub fn new(mesh: &'a TextMesh) -> Self {
        let mut total = 0.0;
        let cumulative = mesh
            .triangles()
            .map(|[a, b, c]| {
                let area = 0.5 * (b - a).cross(c - a).length();
                if area.is_finite() {
                    total += area;
                }
                total
            })
            .collect();
        Self { mesh, cumulative }
    }

    pub fn total_area(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// One uniformly distributed surface point, or `None` if the mesh has no
    /// area.
    pub fn sample(&self, rng: &mut impl Rng) -> Option<Vec3> {
        let total = self.total_area();
        if total <= 0.0 {
            return None;
        }

        let pick = rng.gen_range(0.0..total);
        let index = self
            .cumulative
            .partition_point(|&running| running <= pick)
            .min(self.cumulative.len() - 1);
        let tri = self.mesh.positions.get(index * 3..index * 3 + 3)?;
        let (a, b, c) = (tri[0], tri[1], tri[2]);

        let mut u: f32 = rng.gen();
        let mut v: f32 = rng.gen();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        Some(a + (b - a) * u + (c - a) * v)
    }
}
