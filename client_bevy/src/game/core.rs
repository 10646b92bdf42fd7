use bevy::prelude::*;
use bevy::time::Virtual;
use bevy_rapier3d::prelude::{Collider, Friction, RapierConfiguration, Restitution, RigidBody, TimestepMode};
use letterfall_core::config::{cube_count_from_query, SimulationConfig};
use letterfall_core::font::FontFace;
use letterfall_core::simulation::Simulation;
use std::time::Duration;

use crate::constants::{
    color_from_hex, Colors, AMBIENT_BRIGHTNESS, CAMERA_EYE, CAMERA_FOV_DEGREES, CONFIG_ENV,
    GROUND_HALF_EXTENT, GROUND_HALF_THICKNESS, LIGHT_ILLUMINANCE, LIGHT_POSITION,
};

use super::orbit::OrbitCamera;

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Lettering,
    Visuals,
}

/// Raw startup values read from the environment or the page URL.
#[derive(Debug, Clone, Default)]
pub struct StartupInput {
    pub query: String,
    pub config_json: Option<String>,
    pub font_path: Option<String>,
}

pub struct CorePlugin {
    pub startup: StartupInput,
}

#[derive(Resource, Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) config: SimulationConfig,
    pub(crate) font_path: Option<String>,
}

/// The headless simulation, owned by the app.
#[derive(Resource)]
pub(crate) struct LetterScene {
    pub(crate) sim: Simulation<FontFace>,
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let config = resolve_config(&self.startup.query, self.startup.config_json.as_deref());
        let dt = config.physics_dt;

        app.insert_resource(LetterScene {
            sim: Simulation::new(&config),
        })
        .insert_resource(Settings {
            config,
            font_path: self.startup.font_path.clone(),
        })
        .insert_resource(ClearColor(color_from_hex(Colors::BACKGROUND)))
        .insert_resource(Time::<Fixed>::from_seconds(dt as f64))
        .insert_resource(TimestepMode::Fixed { dt, substeps: 1 })
        .configure_sets(
            Update,
            (UpdateSet::Input, UpdateSet::Lettering, UpdateSet::Visuals).chain(),
        )
        .add_systems(
            Startup,
            (
                setup_scene,
                configure_virtual_time_catchup_cap,
                configure_rapier_gravity,
            )
                .chain(),
        );
    }
}

/// JSON override (if any and valid), then the query's cube count on top.
pub(crate) fn resolve_config(query: &str, config_json: Option<&str>) -> SimulationConfig {
    let mut config = match config_json.map(SimulationConfig::from_json) {
        None => SimulationConfig::default(),
        Some(Ok(config)) => match config.validate() {
            Ok(()) => {
                info!("Using config from {CONFIG_ENV}");
                config
            }
            Err(err) => {
                warn!("Ignoring invalid {CONFIG_ENV}: {err}");
                SimulationConfig::default()
            }
        },
        Some(Err(err)) => {
            warn!("Ignoring unparsable {CONFIG_ENV}: {err}");
            SimulationConfig::default()
        }
    };

    if let Some(count) = cube_count_from_query(query) {
        config.cube_count = count;
    }
    config
}

fn setup_scene(mut commands: Commands, settings: Res<Settings>) {
    // WebGL2 MSAA is expensive (often CPU fallback).
    #[cfg(target_arch = "wasm32")]
    let msaa = Msaa::Off;
    #[cfg(not(target_arch = "wasm32"))]
    let msaa = Msaa::Sample4;

    let eye = Vec3::from_array(CAMERA_EYE);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        msaa,
        Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y),
        AmbientLight {
            color: color_from_hex(Colors::LIGHT),
            brightness: AMBIENT_BRIGHTNESS,
            ..default()
        },
        OrbitCamera::looking_at(eye, Vec3::ZERO),
    ));

    commands.spawn((
        DirectionalLight {
            color: color_from_hex(Colors::LIGHT),
            illuminance: LIGHT_ILLUMINANCE,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(LIGHT_POSITION)).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Invisible floor; only the cubes are drawn.
    let config = &settings.config;
    commands.spawn((
        RigidBody::Fixed,
        Collider::cuboid(GROUND_HALF_EXTENT, GROUND_HALF_THICKNESS, GROUND_HALF_EXTENT),
        Friction::coefficient(config.friction),
        Restitution::coefficient(config.restitution),
        Transform::from_xyz(0.0, -GROUND_HALF_THICKNESS, 0.0),
    ));
}

fn configure_rapier_gravity(
    settings: Res<Settings>,
    mut q_config: Query<&mut RapierConfiguration>,
) {
    for mut cfg in &mut q_config {
        cfg.gravity = Vec3::new(0.0, settings.config.gravity_y, 0.0);
    }
}

fn configure_virtual_time_catchup_cap(
    settings: Res<Settings>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    // A slow frame runs at most max_substeps fixed steps; the rest is dropped.
    let config = &settings.config;
    let max_delta = config.physics_dt as f64 * config.max_substeps as f64;
    virtual_time.set_max_delta(Duration::from_secs_f64(max_delta));
}
