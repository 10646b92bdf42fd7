use std::fmt;
use std::sync::Arc;

use bevy_math::Vec2;
use ttf_parser::{Face, OutlineBuilder};

use crate::error::LetterfallError;
use crate::outline::{Contour, GlyphOutline, GlyphSource, Segment};

/// A TrueType/OpenType face backed by its raw bytes.
///
/// Metrics are read once up front. Glyph lookups re-open the face, which only
/// reads the table directory; outlines are decoded per call.
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    units_per_em: f32,
    line_height: f32,
}

impl FontFace {
    /// Validates `data` as a font and keeps it for glyph lookups.
    pub fn from_bytes(data: impl Into<Arc<Vec<u8>>>) -> Result<Self, LetterfallError> {
        let data = data.into();
        let (units_per_em, line_height) = {
            let face = Face::parse(&data, 0)?;
            (
                face.units_per_em() as f32,
                face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32,
            )
        };
        Ok(Self {
            data,
            units_per_em,
            line_height,
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        // Bytes were validated in from_bytes.
        Face::parse(&self.data, 0).ok()
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl GlyphSource for FontFace {
    fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn glyph(&self, ch: char) -> Option<GlyphOutline> {
        let face = self.face()?;
        let id = face.glyph_index(ch)?;
        let advance = face.glyph_hor_advance(id).unwrap_or(0) as f32;

        let mut collector = ContourCollector::default();
        // Blank glyphs (space) have no outline but still advance.
        let _ = face.outline_glyph(id, &mut collector);

        Some(GlyphOutline {
            advance,
            contours: collector.finish(),
        })
    }
}

#[derive(Default)]
struct ContourCollector {
    done: Vec<Contour>,
    current: Option<Contour>,
}

impl ContourCollector {
    fn push(&mut self, segment: Segment) {
        if let Some(contour) = self.current.as_mut() {
            contour.segments.push(segment);
        }
    }

    fn finish(mut self) -> Vec<Contour> {
        self.close();
        self.done
    }
}

impl OutlineBuilder for ContourCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.close();
        self.current = Some(Contour::new(Vec2::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(Segment::Line(Vec2::new(x, y)));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.push(Segment::Quad {
            ctrl: Vec2::new(x1, y1),
            to: Vec2::new(x, y),
        });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.push(Segment::Cubic {
            ctrl1: Vec2::new(x1, y1),
            ctrl2: Vec2::new(x2, y2),
            to: Vec2::new(x, y),
        });
    }

    fn close(&mut self) {
        if let Some(contour) = self.current.take() {
            if !contour.segments.is_empty() {
                self.done.push(contour);
            }
        }
    }
}

/// Single-shot font readiness.
///
/// Starts `Pending`, moves once to `Ready` or `Failed`, and never changes
/// again.
#[derive(Debug)]
pub enum FontSlot<G> {
    Pending,
    Ready(G),
    Failed(String),
}

impl<G> Default for FontSlot<G> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<G> FontSlot<G> {
    /// Returns false (and keeps the current state) unless the slot was pending.
    pub fn resolve(&mut self, glyphs: G) -> bool {
        if !self.is_pending() {
            tracing::warn!("font slot already settled; ignoring late resolve");
            return false;
        }
        *self = Self::Ready(glyphs);
        tracing::info!("Font loaded, lettering ready");
        true
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if !self.is_pending() {
            tracing::warn!("font slot already settled; ignoring late failure");
            return false;
        }
        let reason = reason.into();
        tracing::error!("Font load failed: {reason}");
        *self = Self::Failed(reason);
        true
    }

    pub fn ready(&self) -> Result<&G, LetterfallError> {
        match self {
            Self::Pending => Err(LetterfallError::FontNotReady),
            Self::Ready(glyphs) => Ok(glyphs),
            Self::Failed(reason) => Err(LetterfallError::FontUnavailable(reason.clone())),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
