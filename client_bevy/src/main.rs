mod constants;
mod game;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use bevy_rapier3d::prelude::*;

use constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use game::{CorePlugin, CubesPlugin, HudPlugin, LetteringPlugin, OrbitCameraPlugin, StartupInput};

fn main() {
    let startup = startup_input();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Letterfall".to_string(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(CorePlugin { startup })
        .add_plugins(CubesPlugin)
        .add_plugins(LetteringPlugin)
        .add_plugins(OrbitCameraPlugin)
        .add_plugins(HudPlugin)
        .run();
}

#[cfg(not(target_arch = "wasm32"))]
fn startup_input() -> StartupInput {
    use constants::{CONFIG_ENV, FONT_ENV, QUERY_ENV};

    StartupInput {
        query: std::env::var(QUERY_ENV).unwrap_or_default(),
        config_json: std::env::var(CONFIG_ENV).ok(),
        font_path: std::env::var(FONT_ENV).ok().filter(|s| !s.is_empty()),
    }
}

#[cfg(target_arch = "wasm32")]
fn startup_input() -> StartupInput {
    let query = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();

    StartupInput {
        query,
        config_json: None,
        font_path: None,
    }
}
