pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;

/// Vertical field of view of the scene camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_EYE: [f32; 3] = [0.0, 5.0, 20.0];

/// Half extent of the static ground slab; its top face sits at y = 0.
pub const GROUND_HALF_EXTENT: f32 = 100.0;
pub const GROUND_HALF_THICKNESS: f32 = 0.5;

pub const LIGHT_POSITION: [f32; 3] = [5.0, 10.0, 7.5];
pub const LIGHT_ILLUMINANCE: f32 = 4_000.0;
pub const AMBIENT_BRIGHTNESS: f32 = 400.0;

/// Native env var carrying a query string, e.g. `numCubes=800`.
pub const QUERY_ENV: &str = "LETTERFALL_QUERY";
/// Native env var carrying a JSON `SimulationConfig` override.
pub const CONFIG_ENV: &str = "LETTERFALL_CONFIG";
/// Native env var with an asset path to a TTF/OTF for the lettering.
pub const FONT_ENV: &str = "LETTERFALL_FONT";

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const BACKGROUND: u32 = 0x000000;
    pub const CUBE: u32 = 0x00aaff;
    pub const LIGHT: u32 = 0xffffff;
    pub const ACCENT: u32 = 0x00aaff;
    pub const TEXT: u32 = 0xe6eef5;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}
