use bevy_math::Vec2;

/// Below this distance two flattened points are treated as the same point.
const MERGE_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Vec2),
    Quad { ctrl: Vec2, to: Vec2 },
    Cubic { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

impl Segment {
    pub fn end(&self) -> Vec2 {
        match *self {
            Segment::Line(to) | Segment::Quad { to, .. } | Segment::Cubic { to, .. } => to,
        }
    }
}

/// One closed loop of a glyph, in font units (y up).
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub start: Vec2,
    pub segments: Vec<Segment>,
}

impl Contour {
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    /// Polyline approximation of the contour.
    ///
    /// Lines stay single segments, each curve becomes `curve_segments`
    /// straight pieces. The closing point is not repeated.
    pub fn flatten(&self, curve_segments: u32) -> Vec<Vec2> {
        let divisions = curve_segments.max(1);
        let mut points = vec![self.start];
        let mut cursor = self.start;

        for segment in &self.segments {
            match *segment {
                Segment::Line(to) => points.push(to),
                Segment::Quad { ctrl, to } => {
                    for j in 1..=divisions {
                        let t = j as f32 / divisions as f32;
                        let u = 1.0 - t;
                        points.push(cursor * (u * u) + ctrl * (2.0 * u * t) + to * (t * t));
                    }
                }
                Segment::Cubic { ctrl1, ctrl2, to } => {
                    for j in 1..=divisions {
                        let t = j as f32 / divisions as f32;
                        let u = 1.0 - t;
                        points.push(
                            cursor * (u * u * u)
                                + ctrl1 * (3.0 * u * u * t)
                                + ctrl2 * (3.0 * u * t * t)
                                + to * (t * t * t),
                        );
                    }
                }
            }
            cursor = segment.end();
        }

        points.dedup_by(|b, a| a.distance(*b) < MERGE_EPSILON);
        while points.len() > 1 && points[0].distance(points[points.len() - 1]) < MERGE_EPSILON {
            points.pop();
        }
        points
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    /// Horizontal advance in font units.
    pub advance: f32,
    pub contours: Vec<Contour>,
}

/// Anything that can hand out glyph outlines: a parsed font file, or a
/// hand-built alphabet in tests.
pub trait GlyphSource {
    fn units_per_em(&self) -> f32;

    /// Distance between baselines, in font units.
    fn line_height(&self) -> f32;

    /// Outline for `ch`, or `None` when the font has no glyph for it.
    fn glyph(&self, ch: char) -> Option<GlyphOutline>;
}

/// Shoelace area; positive for counter-clockwise loops (y up).
pub fn signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}
