use bevy::asset::LoadState;
use bevy::prelude::*;
use letterfall_core::config::SimulationConfig;
use letterfall_core::font::FontFace;
use letterfall_core::simulation::Submission;
use letterfall_core::targets::DetailMode;
use letterfall_core::LetterfallError;

use super::cubes::{despawn_cube_field, spawn_cube_field, CubeAssets, CubeField, RapierCubes};
use super::{LetterScene, Settings, UpdateSet};

pub struct LetteringPlugin;

/// Text from the HUD. Empty text releases every cube.
#[derive(Message, Clone, Debug, PartialEq)]
pub(crate) struct SubmitText {
    pub(crate) text: String,
    pub(crate) mode: DetailMode,
}

/// Start over with a new cube count.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub(crate) struct RestartScene {
    pub(crate) cube_count: usize,
}

/// Font asset feeding the lettering. Without a configured path this is
/// Bevy's embedded default font.
#[derive(Resource)]
pub(crate) struct LetteringFont {
    handle: Handle<Font>,
}

/// Last thing the lettering did, for the HUD status line.
#[derive(Resource, Default, Debug)]
pub(crate) struct LetteringStatus {
    pub(crate) line: String,
}

impl Plugin for LetteringPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LetteringStatus>()
            .add_message::<SubmitText>()
            .add_message::<RestartScene>()
            .add_systems(Startup, start_font_load)
            .add_systems(
                Update,
                (poll_font_system, submit_text_system, restart_system)
                    .chain()
                    .in_set(UpdateSet::Lettering),
            );
    }
}

fn start_font_load(
    mut commands: Commands,
    settings: Res<Settings>,
    asset_server: Res<AssetServer>,
) {
    let handle = match &settings.font_path {
        Some(path) => {
            info!("Loading lettering font from {path}");
            asset_server.load(path.clone())
        }
        None => Handle::default(),
    };
    commands.insert_resource(LetteringFont { handle });
}

fn poll_font_system(
    font: Option<Res<LetteringFont>>,
    fonts: Res<Assets<Font>>,
    asset_server: Res<AssetServer>,
    mut scene: ResMut<LetterScene>,
) {
    if !scene.sim.font.is_pending() {
        return;
    }
    let Some(font) = font else {
        return;
    };

    if let Some(loaded) = fonts.get(&font.handle) {
        match FontFace::from_bytes(loaded.data.clone()) {
            Ok(face) => {
                scene.sim.font.resolve(face);
            }
            Err(err) => {
                scene.sim.font.fail(err.to_string());
            }
        }
        return;
    }

    if let LoadState::Failed(err) = asset_server.load_state(font.handle.id()) {
        scene.sim.font.fail(err.to_string());
    }
}

fn submit_text_system(
    time: Res<Time>,
    mut submits: MessageReader<SubmitText>,
    mut scene: ResMut<LetterScene>,
    mut rapier: RapierCubes,
    mut status: ResMut<LetteringStatus>,
) {
    let now = time.elapsed_secs_f64();
    for msg in submits.read() {
        status.line = match scene.sim.submit(&msg.text, msg.mode, now, &mut rapier) {
            Ok(outcome) => describe(&outcome),
            Err(err) => {
                warn!("Lettering rejected: {err}");
                status_for_error(&err)
            }
        };
    }
}

fn restart_system(
    mut commands: Commands,
    mut restarts: MessageReader<RestartScene>,
    mut settings: ResMut<Settings>,
    mut scene: ResMut<LetterScene>,
    assets: Option<Res<CubeAssets>>,
    mut field: ResMut<CubeField>,
    mut status: ResMut<LetteringStatus>,
) {
    let Some(msg) = restarts.read().last().copied() else {
        return;
    };
    if navigate_to_restart(msg.cube_count) {
        return;
    }
    let Some(assets) = assets else {
        return;
    };

    let config = SimulationConfig {
        cube_count: msg.cube_count,
        ..settings.config.clone()
    };
    despawn_cube_field(&mut commands, &mut field);
    scene.sim.respawn(&config);
    spawn_cube_field(&mut commands, &config, &scene.sim.bodies, &assets, &mut field);
    status.line = format!("Restarted with {} cubes", config.cube_count);
    settings.config = config;
}

/// Browser restart: reload the page with the count in the query string.
/// Returns false when the page can't be navigated and the field should be
/// respawned in place.
#[cfg(target_arch = "wasm32")]
fn navigate_to_restart(cube_count: usize) -> bool {
    let query = letterfall_core::config::restart_query(cube_count);
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.location().set_search(&query) {
        Ok(()) => true,
        Err(err) => {
            warn!("Could not reload with {query}: {err:?}");
            false
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn navigate_to_restart(_cube_count: usize) -> bool {
    false
}

pub(crate) fn status_for_error(err: &LetterfallError) -> String {
    match err {
        LetterfallError::FontNotReady | LetterfallError::FontUnavailable(_) => {
            format!("Not ready: {err}")
        }
        _ => format!("Lettering failed: {err}"),
    }
}

pub(crate) fn describe(outcome: &Submission) -> String {
    match outcome {
        Submission::Released { bodies } => format!("Released {bodies} cubes"),
        Submission::Formed {
            mode,
            points,
            report,
        } => {
            let mut line = format!(
                "{mode}: {points} points, {} cubes used",
                report.formed
            );
            if report.dropped > 0 {
                line.push_str(&format!(", {} points unused", report.dropped));
            }
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterfall_core::controller::FormReport;
    use letterfall_core::simulation::Simulation;

    fn make_test_app() -> App {
        let config = SimulationConfig {
            cube_count: 6,
            rng_seed: Some(11),
            ..Default::default()
        };
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(LetterScene {
            sim: Simulation::new(&config),
        });
        app.insert_resource(Settings {
            config,
            font_path: None,
        });
        app.init_resource::<CubeField>();
        app.init_resource::<LetteringStatus>();
        app.add_message::<SubmitText>();
        app.add_message::<RestartScene>();
        app
    }

    #[test]
    fn describes_submissions() {
        assert_eq!(
            describe(&Submission::Released { bodies: 500 }),
            "Released 500 cubes"
        );
        let formed = Submission::Formed {
            mode: DetailMode::Coarse,
            points: 720,
            report: FormReport {
                formed: 500,
                released: 0,
                dropped: 220,
            },
        };
        assert_eq!(
            describe(&formed),
            "coarse: 720 points, 500 cubes used, 220 points unused"
        );
    }

    #[test]
    fn errors_are_labelled_by_cause() {
        assert_eq!(
            status_for_error(&LetterfallError::FontNotReady),
            "Not ready: font not ready"
        );
        assert_eq!(
            status_for_error(&LetterfallError::FontUnavailable("404".to_string())),
            "Not ready: font unavailable: 404"
        );
        let Err(parse) = FontFace::from_bytes(vec![0u8; 4]) else {
            panic!("four zero bytes parsed as a font");
        };
        assert!(status_for_error(&parse).starts_with("Lettering failed: invalid font data"));
    }

    #[test]
    fn text_before_font_is_reported_not_applied() {
        let mut app = make_test_app();
        app.add_systems(Update, submit_text_system);

        app.world_mut().write_message(SubmitText {
            text: "HI".to_string(),
            mode: DetailMode::Coarse,
        });
        app.update();

        let status = app.world().resource::<LetteringStatus>();
        assert!(status.line.starts_with("Not ready"));
        assert_eq!(
            app.world().resource::<LetterScene>().sim.bodies.animating_count(),
            0
        );
    }

    #[test]
    fn empty_text_releases_cubes() {
        let mut app = make_test_app();
        app.add_systems(Update, submit_text_system);

        app.world_mut().write_message(SubmitText {
            text: String::new(),
            mode: DetailMode::Detailed,
        });
        app.update();

        assert_eq!(
            app.world().resource::<LetteringStatus>().line,
            "Released 6 cubes"
        );
    }

    #[test]
    fn restart_respawns_with_new_count() {
        let mut app = make_test_app();
        app.insert_resource(CubeAssets::for_tests());
        app.add_systems(Update, restart_system);

        app.world_mut()
            .write_message(RestartScene { cube_count: 9 });
        app.update();

        assert_eq!(app.world().resource::<LetterScene>().sim.bodies.len(), 9);
        assert_eq!(app.world().resource::<CubeField>().len(), 9);
        assert_eq!(app.world().resource::<Settings>().config.cube_count, 9);
    }
}
