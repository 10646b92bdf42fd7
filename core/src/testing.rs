//! Fixtures shared by unit tests.

use std::collections::HashMap;

use bevy_math::{Vec2, Vec3};

use crate::body::BodyId;
use crate::font::FontFace;
use crate::outline::{Contour, GlyphOutline, GlyphSource, Segment};
use crate::physics::{BodyReadback, PhysicsBackend, PhysicsStepper};
use crate::pose::Pose;

/// Axis-aligned loop; counter-clockwise unless `reverse`.
pub(crate) fn rect(min: Vec2, max: Vec2, reverse: bool) -> Contour {
    let mut corners = vec![
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        min,
    ];
    if reverse {
        corners = vec![Vec2::new(min.x, max.y), max, Vec2::new(max.x, min.y), min];
    }
    let mut contour = Contour::new(min);
    contour
        .segments
        .extend(corners.into_iter().map(Segment::Line));
    contour
}

/// Blocky alphabet: `I` is a bar, `O` a square ring, `D` a bar with a
/// curved bowl, space is blank. `l` is `I` wound clockwise, as TrueType
/// outlines are.
pub(crate) struct BlockGlyphs;

impl GlyphSource for BlockGlyphs {
    fn units_per_em(&self) -> f32 {
        1000.0
    }

    fn line_height(&self) -> f32 {
        1200.0
    }

    fn glyph(&self, ch: char) -> Option<GlyphOutline> {
        match ch {
            'I' => Some(GlyphOutline {
                advance: 300.0,
                contours: vec![rect(Vec2::ZERO, Vec2::new(200.0, 700.0), false)],
            }),
            'l' => Some(GlyphOutline {
                advance: 300.0,
                contours: vec![rect(Vec2::ZERO, Vec2::new(200.0, 700.0), true)],
            }),
            'O' => Some(GlyphOutline {
                advance: 700.0,
                contours: vec![
                    rect(Vec2::ZERO, Vec2::new(600.0, 700.0), false),
                    rect(Vec2::new(150.0, 150.0), Vec2::new(450.0, 550.0), true),
                ],
            }),
            'D' => {
                let mut bowl = Contour::new(Vec2::ZERO);
                bowl.segments.push(Segment::Line(Vec2::new(300.0, 0.0)));
                bowl.segments.push(Segment::Quad {
                    ctrl: Vec2::new(700.0, 350.0),
                    to: Vec2::new(300.0, 700.0),
                });
                bowl.segments.push(Segment::Line(Vec2::new(0.0, 700.0)));
                bowl.segments.push(Segment::Line(Vec2::ZERO));
                Some(GlyphOutline {
                    advance: 650.0,
                    contours: vec![bowl],
                })
            }
            ' ' => Some(GlyphOutline {
                advance: 300.0,
                contours: Vec::new(),
            }),
            _ => None,
        }
    }
}

/// Two-glyph TrueType font: `.notdef` and an `A` with a triangular counter.
pub(crate) const DEMO_FONT: &[u8] = include_bytes!("../tests/fonts/demo.ttf");

pub(crate) fn demo_font() -> FontFace {
    FontFace::from_bytes(DEMO_FONT.to_vec()).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FakeBody {
    pub(crate) pose: Pose,
    pub(crate) velocity: Vec3,
    pub(crate) sleeping: bool,
    pub(crate) wake_count: u32,
}

/// Physics stand-in: bodies fall at a constant speed while awake.
#[derive(Default)]
pub(crate) struct FakePhysics {
    pub(crate) bodies: HashMap<BodyId, FakeBody>,
    pub(crate) steps: u32,
}

impl FakePhysics {
    pub(crate) fn body(&self, id: BodyId) -> FakeBody {
        self.bodies.get(&id).copied().unwrap_or(FakeBody {
            pose: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            sleeping: false,
            wake_count: 0,
        })
    }

    pub(crate) fn is_asleep(&self, id: BodyId) -> bool {
        self.body(id).sleeping
    }
}

impl PhysicsBackend for FakePhysics {
    fn sleep(&mut self, id: BodyId) {
        let mut body = self.body(id);
        body.sleeping = true;
        body.velocity = Vec3::ZERO;
        self.bodies.insert(id, body);
    }

    fn wake(&mut self, id: BodyId, pose: Pose, velocity: Option<Vec3>) {
        let mut body = self.body(id);
        body.pose = pose;
        if let Some(v) = velocity {
            body.velocity = v;
        }
        body.sleeping = false;
        body.wake_count += 1;
        self.bodies.insert(id, body);
    }
}

impl BodyReadback for FakePhysics {
    fn is_sleeping(&self, id: BodyId) -> bool {
        self.body(id).sleeping
    }

    fn pose(&self, id: BodyId) -> Option<Pose> {
        self.bodies.get(&id).map(|b| b.pose)
    }
}

impl PhysicsStepper for FakePhysics {
    fn step(&mut self, dt: f32) {
        self.steps += 1;
        for body in self.bodies.values_mut() {
            if !body.sleeping {
                body.pose.translation.y -= dt;
            }
        }
    }
}
