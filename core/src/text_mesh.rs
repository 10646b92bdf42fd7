//! Text rasterizer: glyph outlines to an extruded (optionally beveled)
//! triangle mesh.
//!
//! The mesh is a plain non-indexed triangle list. Vertex order is stable for
//! a given font, text and style: front caps, back caps, then the side walls of
//! each contour ring, glyph by glyph. Coarse target sampling relies on that
//! order.

use std::f32::consts::FRAC_PI_2;

use bevy_math::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers,
};
use serde::{Deserialize, Serialize};

use crate::error::LetterfallError;
use crate::outline::{signed_area, GlyphSource};

/// Miter offsets are clamped to this multiple of the bevel size so sharp
/// glyph corners don't spike.
const MAX_MITER: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bevel {
    /// How far the bevel reaches past the front and back faces (z)
    pub thickness: f32,
    /// How far the bevel grows the outline (xy)
    pub size: f32,
    pub segments: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Em size in world units
    pub size: f32,
    /// Extrusion depth along +z
    pub depth: f32,
    /// Straight pieces per curved outline segment
    pub curve_segments: u32,
    pub bevel: Option<Bevel>,
}

impl TextStyle {
    /// Low-resolution block letters: few vertices that trace the letterforms.
    pub fn coarse() -> Self {
        Self {
            size: 3.0,
            depth: 0.5,
            curve_segments: 1,
            bevel: None,
        }
    }

    pub fn detailed() -> Self {
        Self {
            size: 3.0,
            depth: 0.5,
            curve_segments: 12,
            bevel: Some(Bevel {
                thickness: 0.2,
                size: 0.1,
                segments: 5,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err("size must be finite and > 0".to_string());
        }
        if !self.depth.is_finite() || self.depth < 0.0 {
            return Err("depth must be finite and >= 0".to_string());
        }
        if self.curve_segments == 0 {
            return Err("curve_segments must be >= 1".to_string());
        }
        if let Some(bevel) = self.bevel {
            if bevel.segments == 0 {
                return Err("bevel segments must be >= 1".to_string());
            }
            if !bevel.thickness.is_finite() || !bevel.size.is_finite() {
                return Err("bevel thickness and size must be finite".to_string());
            }
        }
        Ok(())
    }

    /// (z, outline offset) of every contour ring from front to back.
    fn rings(&self) -> Vec<(f32, f32)> {
        let Some(bevel) = self.bevel else {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        };

        let segments = bevel.segments.max(1);
        let profile = |b: u32| {
            let t = b as f32 / segments as f32;
            (
                bevel.thickness * (t * FRAC_PI_2).cos(),
                bevel.size * (t * FRAC_PI_2).sin(),
            )
        };

        let mut rings = Vec::with_capacity(2 * segments as usize + 2);
        for b in 0..segments {
            let (z, offset) = profile(b);
            rings.push((-z, offset));
        }
        rings.push((0.0, bevel.size));
        rings.push((self.depth, bevel.size));
        for b in (0..segments).rev() {
            let (z, offset) = profile(b);
            rings.push((self.depth + z, offset));
        }
        rings
    }
}

/// Non-indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMesh {
    pub positions: Vec<Vec3>,
}

impl TextMesh {
    /// Lays `text` out along +x (new lines go down) and extrudes every glyph.
    ///
    /// Characters the font has no glyph for are skipped.
    pub fn build(
        glyphs: &impl GlyphSource,
        text: &str,
        style: &TextStyle,
    ) -> Result<Self, LetterfallError> {
        let scale = style.size / glyphs.units_per_em();
        let line_advance = glyphs.line_height() * scale;
        let rings = style.rings();

        let mut mesh = TextMesh::default();
        let mut pen = Vec2::ZERO;

        for ch in text.chars() {
            if ch == '\n' {
                pen.x = 0.0;
                pen.y -= line_advance;
                continue;
            }
            let Some(glyph) = glyphs.glyph(ch) else {
                tracing::warn!("no glyph for {ch:?}, skipping");
                continue;
            };

            let loops: Vec<Vec<Vec2>> = glyph
                .contours
                .iter()
                .map(|contour| {
                    contour
                        .flatten(style.curve_segments)
                        .into_iter()
                        .map(|p| pen + p * scale)
                        .collect::<Vec<_>>()
                })
                .filter(|points| points.len() >= 3)
                .collect();

            if !loops.is_empty() {
                extrude_glyph(&loops, &rings, &mut mesh.positions)?;
            }
            pen.x += glyph.advance * scale;
        }

        tracing::debug!(
            vertices = mesh.vertex_count(),
            text_len = text.chars().count(),
            "text mesh built"
        );
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned (min, max), or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Moves the bounding-box center to the origin.
    pub fn center(&mut self) {
        if let Some((min, max)) = self.bounds() {
            let mid = (min + max) * 0.5;
            for p in &mut self.positions {
                *p -= mid;
            }
        }
    }
}

fn extrude_glyph(
    loops: &[Vec<Vec2>],
    rings: &[(f32, f32)],
    out: &mut Vec<Vec3>,
) -> Result<(), LetterfallError> {
    let caps = tessellate(loops)?;
    let (front_z, _) = rings[0];
    let (back_z, _) = rings[rings.len() - 1];

    // Front cap faces -z, so its winding is flipped.
    for [a, b, c] in &caps {
        out.extend([c.extend(front_z), b.extend(front_z), a.extend(front_z)]);
    }
    for [a, b, c] in &caps {
        out.extend([a.extend(back_z), b.extend(back_z), c.extend(back_z)]);
    }

    let fill_on_left = fill_on_left(loops);
    for points in loops {
        let dirs = offset_directions(points, fill_on_left);
        let layers: Vec<Vec<Vec3>> = rings
            .iter()
            .map(|&(z, offset)| {
                points
                    .iter()
                    .zip(&dirs)
                    .map(|(p, dir)| (*p + *dir * offset).extend(z))
                    .collect()
            })
            .collect();

        for pair in layers.windows(2) {
            side_walls(&pair[0], &pair[1], out);
        }
    }
    Ok(())
}

/// Triangulates the glyph face with the non-zero rule, so holes need no
/// classification.
fn tessellate(loops: &[Vec<Vec2>]) -> Result<Vec<[Vec2; 3]>, LetterfallError> {
    let mut builder = Path::builder();
    for points in loops {
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    FillTessellator::new().tessellate_path(
        &path,
        &FillOptions::non_zero(),
        &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
            let p = vertex.position();
            Vec2::new(p.x, p.y)
        }),
    )?;

    Ok(buffers
        .indices
        .chunks_exact(3)
        .map(|t| {
            [
                buffers.vertices[t[0] as usize],
                buffers.vertices[t[1] as usize],
                buffers.vertices[t[2] as usize],
            ]
        })
        .collect())
}

/// The outer contour (largest area) decides which side of every loop is ink.
fn fill_on_left(loops: &[Vec<Vec2>]) -> bool {
    loops
        .iter()
        .map(|points| signed_area(points))
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .is_none_or(|area| area >= 0.0)
}

/// Per-vertex miter directions pointing away from the ink.
fn offset_directions(points: &[Vec2], fill_on_left: bool) -> Vec<Vec2> {
    let n = points.len();
    let away = |edge: Vec2| {
        let d = edge.normalize_or_zero();
        if fill_on_left {
            Vec2::new(d.y, -d.x)
        } else {
            Vec2::new(-d.y, d.x)
        }
    };

    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let n0 = away(cur - prev);
            let n1 = away(next - cur);

            let denom = 1.0 + n0.dot(n1);
            if denom < 1e-4 {
                return n0;
            }
            let miter = (n0 + n1) / denom;
            if miter.length() > MAX_MITER {
                miter.normalize() * MAX_MITER
            } else {
                miter
            }
        })
        .collect()
}

fn side_walls(lower: &[Vec3], upper: &[Vec3], out: &mut Vec<Vec3>) {
    let n = lower.len();
    for i in 0..n {
        let j = (i + 1) % n;
        out.extend([lower[i], lower[j], upper[j]]);
        out.extend([lower[i], upper[j], upper[i]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{demo_font, BlockGlyphs};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn coarse_bar_vertex_count() {
        let mesh = TextMesh::build(&BlockGlyphs, "I", &TextStyle::coarse()).unwrap();
        // 2 cap triangles per face, 4 walls of 2 triangles.
        assert_eq!(mesh.triangle_count(), 2 + 2 + 8);
        assert_eq!(mesh.vertex_count(), 36);
    }

    #[test]
    fn ring_glyph_keeps_its_hole() {
        let mesh = TextMesh::build(&BlockGlyphs, "O", &TextStyle::coarse()).unwrap();
        // Annulus with 8 corners: 8 cap triangles per face, 8 walls.
        assert_eq!(mesh.triangle_count(), 8 + 8 + 16);

        let hole_center = Vec3::new(0.9, 1.05, 0.0);
        let caps_cover_hole = mesh.triangles().take(16).any(|[a, b, c]| {
            let (a, b, c) = (a.truncate(), b.truncate(), c.truncate());
            let p = hole_center.truncate();
            let s = |u: Vec2, v: Vec2| (v - u).perp_dot(p - u);
            let (d0, d1, d2) = (s(a, b), s(b, c), s(c, a));
            (d0 >= 0.0 && d1 >= 0.0 && d2 >= 0.0) || (d0 <= 0.0 && d1 <= 0.0 && d2 <= 0.0)
        });
        assert!(!caps_cover_hole);
    }

    #[test]
    fn glyphs_scale_to_em_size() {
        let mesh = TextMesh::build(&BlockGlyphs, "I", &TextStyle::coarse()).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert!(approx(min.x, 0.0) && approx(max.x, 0.6));
        assert!(approx(min.y, 0.0) && approx(max.y, 2.1));
        assert!(approx(min.z, 0.0) && approx(max.z, 0.5));
    }

    #[test]
    fn bevel_grows_outline_and_depth() {
        let style = TextStyle::detailed();
        let mesh = TextMesh::build(&BlockGlyphs, "I", &style).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert!(approx(min.x, -0.1) && approx(max.x, 0.7));
        assert!(approx(min.z, -0.2) && approx(max.z, 0.7));

        // 5 + 2 + 5 rings give 11 wall bands of 4 quads.
        assert_eq!(mesh.triangle_count(), 2 + 2 + 11 * 8);
    }

    #[test]
    fn bevel_grows_clockwise_outline_outward() {
        let style = TextStyle::detailed();
        let bevel = style.bevel.unwrap();
        let (ccw_min, ccw_max) = TextMesh::build(&BlockGlyphs, "I", &style)
            .unwrap()
            .bounds()
            .unwrap();
        let (min, max) = TextMesh::build(&BlockGlyphs, "l", &style)
            .unwrap()
            .bounds()
            .unwrap();

        assert!(approx(min.x, -bevel.size) && approx(max.x, 0.6 + bevel.size));
        assert!(approx(min.y, -bevel.size) && approx(max.y, 2.1 + bevel.size));
        assert!(min.abs_diff_eq(ccw_min, 1e-4));
        assert!(max.abs_diff_eq(ccw_max, 1e-4));
    }

    #[test]
    fn truetype_glyph_bevels_outward() {
        let font = demo_font();
        let (flat_min, flat_max) = TextMesh::build(&font, "A", &TextStyle::coarse())
            .unwrap()
            .bounds()
            .unwrap();
        // A spans (6, 0)..(541, 656) font units at 3 / 1000 per unit.
        assert!(approx(flat_min.x, 0.018) && approx(flat_max.x, 1.623));
        assert!(approx(flat_min.y, 0.0) && approx(flat_max.y, 1.968));

        let style = TextStyle::detailed();
        let size = style.bevel.unwrap().size;
        let (min, max) = TextMesh::build(&font, "A", &style).unwrap().bounds().unwrap();

        // Horizontal baseline and apex edges move by exactly the bevel size;
        // the slanted feet miter further out.
        assert!(approx(min.y, flat_min.y - size));
        assert!(approx(max.y, flat_max.y + size));
        assert!(min.x < flat_min.x - size + 1e-4);
        assert!(max.x > flat_max.x + size - 1e-4);
        assert!(approx(min.z, -0.2) && approx(max.z, 0.7));
    }

    #[test]
    fn rings_profile_without_bevel_is_two_flat_layers() {
        assert_eq!(TextStyle::coarse().rings(), vec![(0.0, 0.0), (0.5, 0.0)]);
    }

    #[test]
    fn curve_segments_add_vertices() {
        let coarse = TextMesh::build(&BlockGlyphs, "D", &TextStyle::coarse()).unwrap();
        let mut fine_style = TextStyle::coarse();
        fine_style.curve_segments = 12;
        let fine = TextMesh::build(&BlockGlyphs, "D", &fine_style).unwrap();
        assert!(fine.vertex_count() > coarse.vertex_count());
    }

    #[test]
    fn center_moves_bounds_around_origin() {
        let mut mesh = TextMesh::build(&BlockGlyphs, "IO", &TextStyle::coarse()).unwrap();
        mesh.center();
        let (min, max) = mesh.bounds().unwrap();
        assert!((min + max).abs().max_element() < 1e-4);
    }

    #[test]
    fn layout_advances_and_breaks_lines() {
        let mesh = TextMesh::build(&BlockGlyphs, "I\nI", &TextStyle::coarse()).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert!(approx(max.x, 0.6));
        assert!(approx(min.y, -3.6));
        assert!(approx(max.y, 2.1));

        let wide = TextMesh::build(&BlockGlyphs, "I I", &TextStyle::coarse()).unwrap();
        let (_, max) = wide.bounds().unwrap();
        // Two advances of 0.9 then the bar.
        assert!(approx(max.x, 1.8 + 0.6));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let mesh = TextMesh::build(&BlockGlyphs, "?I", &TextStyle::coarse()).unwrap();
        assert_eq!(mesh.vertex_count(), 36);
        let blank = TextMesh::build(&BlockGlyphs, "  ", &TextStyle::coarse()).unwrap();
        assert_eq!(blank.vertex_count(), 0);
        assert!(blank.bounds().is_none());
    }

    #[test]
    fn miter_directions_point_outward_for_ccw_square() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let dirs = offset_directions(&square, true);
        assert!(dirs[0].abs_diff_eq(Vec2::new(-1.0, -1.0), 1e-5));
        assert!(dirs[2].abs_diff_eq(Vec2::new(1.0, 1.0), 1e-5));
    }

    #[test]
    fn miter_directions_point_outward_for_cw_square() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];
        assert!(!fill_on_left(&[square.clone()]));

        let dirs = offset_directions(&square, false);
        assert!(dirs[0].abs_diff_eq(Vec2::new(-1.0, -1.0), 1e-5));
        assert!(dirs[1].abs_diff_eq(Vec2::new(-1.0, 1.0), 1e-5));
        assert!(dirs[2].abs_diff_eq(Vec2::new(1.0, 1.0), 1e-5));
        assert!(dirs[3].abs_diff_eq(Vec2::new(1.0, -1.0), 1e-5));
    }
}
