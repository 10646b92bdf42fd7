use std::f32::consts::FRAC_PI_2;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::UpdateSet;

const ROTATE_RADIANS_PER_DOT: f32 = 0.005;
const ZOOM_PER_LINE: f32 = 0.1;
const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 200.0;
/// Keeps the eye off the poles so `looking_at` stays well defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

pub struct OrbitCameraPlugin;

/// Spherical eye position around a focus point.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub(crate) struct OrbitCamera {
    pub(crate) focus: Vec3,
    pub(crate) radius: f32,
    /// Around +y, zero looks down -z.
    pub(crate) yaw: f32,
    /// Elevation above the focus plane.
    pub(crate) pitch: f32,
}

impl OrbitCamera {
    pub(crate) fn looking_at(eye: Vec3, focus: Vec3) -> Self {
        let offset = eye - focus;
        let radius = offset.length().max(MIN_RADIUS);
        let pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        Self {
            focus,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    pub(crate) fn eye(&self) -> Vec3 {
        let horizontal = self.radius * self.pitch.cos();
        self.focus
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.radius * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    /// Dragging right swings the eye left around the focus; dragging down
    /// raises it.
    pub(crate) fn rotate(&mut self, drag: Vec2) {
        self.yaw -= drag.x * ROTATE_RADIANS_PER_DOT;
        self.pitch = (self.pitch + drag.y * ROTATE_RADIANS_PER_DOT).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive `lines` (wheel up) moves closer.
    pub(crate) fn zoom(&mut self, lines: f32) {
        self.radius = (self.radius * (1.0 - lines * ZOOM_PER_LINE)).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    pub(crate) fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.focus, Vec3::Y)
    }
}

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, orbit_camera_system.in_set(UpdateSet::Input));
    }
}

fn orbit_camera_system(
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    buttons: Res<ButtonInput<MouseButton>>,
    q_ui: Query<&Interaction>,
    mut q_camera: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let mut drag = Vec2::ZERO;
    for event in mouse_motion.read() {
        drag += event.delta;
    }
    let mut scroll = 0.0;
    for event in mouse_wheel.read() {
        scroll += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / 16.0,
        };
    }

    // Clicks on the HUD must not spin the scene.
    let over_ui = q_ui.iter().any(|i| *i != Interaction::None);
    let rotating = buttons.pressed(MouseButton::Left) && !over_ui;

    for (mut orbit, mut transform) in &mut q_camera {
        if rotating && drag != Vec2::ZERO {
            orbit.rotate(drag);
        }
        if scroll != 0.0 {
            orbit.zoom(scroll);
        }
        if orbit.is_changed() {
            *transform = orbit.transform();
        }
    }
}
