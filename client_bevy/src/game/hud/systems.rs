use bevy::ecs::system::SystemParam;
use bevy::input::keyboard::KeyboardInput;
use bevy::input::ButtonState;
use bevy::prelude::*;
use letterfall_core::font::FontSlot;

use crate::constants::{color_from_hex, Colors};
use crate::game::lettering::{LetteringStatus, RestartScene, SubmitText};
use crate::game::LetterScene;

use super::types::{
    apply_count_key, apply_key, panel_border, step_cube_count, HudCountDownButton,
    HudCountFieldButton, HudCountText, HudCountUpButton, HudDetailButton, HudDetailText, HudFocus,
    HudRestartButton, HudStatusText, HudSubmitButton, HudSubmitText, HudTextFieldButton,
    HudTextFieldText, HudUiState, KeyAction, PLACEHOLDER, UI_DIM,
};

type ButtonInteractionQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Interaction,
        Option<&'static HudTextFieldButton>,
        Option<&'static HudCountFieldButton>,
        Option<&'static HudSubmitButton>,
        Option<&'static HudDetailButton>,
        Option<&'static HudCountDownButton>,
        Option<&'static HudCountUpButton>,
        Option<&'static HudRestartButton>,
    ),
    (Changed<Interaction>, With<Button>),
>;

type DetailTextQuery<'w, 's> = Query<'w, 's, &'static mut Text, With<HudDetailText>>;
type CountTextQuery<'w, 's> = Query<'w, 's, &'static mut Text, With<HudCountText>>;
type ControlTextSet<'w, 's> =
    ParamSet<'w, 's, (DetailTextQuery<'static, 'static>, CountTextQuery<'static, 'static>)>;

#[derive(SystemParam)]
pub(super) struct ButtonQueries<'w, 's> {
    query: ButtonInteractionQuery<'w, 's>,
}

#[derive(SystemParam)]
pub(super) struct LetteringWriters<'w> {
    submits: MessageWriter<'w, SubmitText>,
    restarts: MessageWriter<'w, RestartScene>,
}

#[derive(SystemParam)]
pub(super) struct FieldBorderQueries<'w, 's> {
    text: Query<
        'w,
        's,
        &'static mut BorderColor,
        (With<HudTextFieldButton>, Without<HudCountFieldButton>),
    >,
    count: Query<
        'w,
        's,
        &'static mut BorderColor,
        (With<HudCountFieldButton>, Without<HudTextFieldButton>),
    >,
}

#[derive(SystemParam)]
pub(super) struct SubmitButtonQueries<'w, 's> {
    borders: Query<'w, 's, &'static mut BorderColor, With<HudSubmitButton>>,
    labels: Query<'w, 's, &'static mut TextColor, With<HudSubmitText>>,
}

fn submit_current_text(hud_ui: &HudUiState, writers: &mut LetteringWriters) {
    writers.submits.write(SubmitText {
        text: hud_ui.text.clone(),
        mode: hud_ui.mode,
    });
}

fn request_restart(hud_ui: &HudUiState, writers: &mut LetteringWriters) {
    writers.restarts.write(RestartScene {
        cube_count: hud_ui.restart_count(),
    });
}

pub(super) fn keyboard_text_system(
    mut keys: MessageReader<KeyboardInput>,
    mut hud_ui: ResMut<HudUiState>,
    scene: Res<LetterScene>,
    mut writers: LetteringWriters,
) {
    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        match hud_ui.focus {
            HudFocus::Text => {
                if apply_key(&mut hud_ui.text, &event.logical_key) == KeyAction::Submit
                    && scene.sim.font.is_ready()
                {
                    submit_current_text(&hud_ui, &mut writers);
                }
            }
            HudFocus::Count => {
                if apply_count_key(&mut hud_ui.cube_count, &event.logical_key) == KeyAction::Submit {
                    request_restart(&hud_ui, &mut writers);
                }
            }
        }
    }
}

pub(super) fn handle_button_interactions(
    mut buttons: ButtonQueries,
    mut hud_ui: ResMut<HudUiState>,
    scene: Res<LetterScene>,
    mut writers: LetteringWriters,
) {
    for (interaction, text_field, count_field, submit, detail, count_down, count_up, restart) in
        &mut buttons.query
    {
        if *interaction != Interaction::Pressed {
            continue;
        }

        if text_field.is_some() {
            hud_ui.focus = HudFocus::Text;
        }
        if count_field.is_some() {
            hud_ui.focus = HudFocus::Count;
        }
        if submit.is_some() && scene.sim.font.is_ready() {
            submit_current_text(&hud_ui, &mut writers);
        }
        if detail.is_some() {
            hud_ui.mode = hud_ui.mode.toggled();
        }
        if count_down.is_some() {
            hud_ui.cube_count = step_cube_count(hud_ui.cube_count, -1);
        }
        if count_up.is_some() {
            hud_ui.cube_count = step_cube_count(hud_ui.cube_count, 1);
        }
        if restart.is_some() {
            request_restart(&hud_ui, &mut writers);
        }
    }
}

pub(super) fn update_text_field_ui(
    hud_ui: Res<HudUiState>,
    mut q_field: Query<(&mut Text, &mut TextColor), With<HudTextFieldText>>,
) {
    if !hud_ui.is_changed() {
        return;
    }
    if let Ok((mut text, mut color)) = q_field.single_mut() {
        let focused = hud_ui.focus == HudFocus::Text;
        if hud_ui.text.is_empty() && !focused {
            text.0 = PLACEHOLDER.to_string();
            color.0 = color_from_hex(UI_DIM);
        } else if hud_ui.text.is_empty() {
            text.0 = format!("|  {PLACEHOLDER}");
            color.0 = color_from_hex(UI_DIM);
        } else {
            text.0 = if focused {
                format!("{}|", hud_ui.text)
            } else {
                hud_ui.text.clone()
            };
            color.0 = color_from_hex(Colors::TEXT);
        }
    }
}

pub(super) fn update_controls_ui(hud_ui: Res<HudUiState>, mut texts: ControlTextSet) {
    if !hud_ui.is_changed() {
        return;
    }
    if let Ok(mut text) = texts.p0().single_mut() {
        text.0 = hud_ui.mode.as_str().to_string();
    }
    if let Ok(mut text) = texts.p1().single_mut() {
        text.0 = if hud_ui.focus == HudFocus::Count {
            format!("{}|", hud_ui.cube_count)
        } else {
            hud_ui.cube_count.to_string()
        };
    }
}

/// Highlights the field that receives typed keys.
pub(super) fn update_focus_ui(hud_ui: Res<HudUiState>, mut borders: FieldBorderQueries) {
    if !hud_ui.is_changed() {
        return;
    }
    let alpha = |focus: HudFocus| if hud_ui.focus == focus { 0.9 } else { 0.3 };
    for mut border in &mut borders.text {
        *border = BorderColor::all(panel_border(alpha(HudFocus::Text)));
    }
    for mut border in &mut borders.count {
        *border = BorderColor::all(panel_border(alpha(HudFocus::Count)));
    }
}

/// Submit stays dim until the font is ready.
pub(super) fn update_submit_button_ui(scene: Res<LetterScene>, mut queries: SubmitButtonQueries) {
    let ready = scene.sim.font.is_ready();
    let border_alpha = if ready { 0.8 } else { 0.2 };

    for mut border in &mut queries.borders {
        *border = BorderColor::all(panel_border(border_alpha));
    }
    for mut color in &mut queries.labels {
        color.0 = if ready {
            color_from_hex(Colors::ACCENT)
        } else {
            color_from_hex(UI_DIM).with_alpha(0.5)
        };
    }
}

pub(super) fn update_status_ui(
    scene: Res<LetterScene>,
    status: Res<LetteringStatus>,
    mut q_status: Query<&mut Text, With<HudStatusText>>,
) {
    let Ok(mut text) = q_status.single_mut() else {
        return;
    };
    let line = match &scene.sim.font {
        FontSlot::Pending => "Loading font...".to_string(),
        FontSlot::Failed(reason) => format!("Font unavailable: {reason}"),
        FontSlot::Ready(_) if status.line.is_empty() => {
            format!("{} cubes, ready", scene.sim.bodies.len())
        }
        FontSlot::Ready(_) => status.line.clone(),
    };
    if text.0 != line {
        text.0 = line;
    }
}

#[cfg(test)]
mod tests {
    use bevy::input::keyboard::{Key, KeyCode};
    use letterfall_core::config::SimulationConfig;
    use letterfall_core::simulation::Simulation;
    use letterfall_core::targets::DetailMode;

    use super::*;

    fn make_test_app() -> App {
        let config = SimulationConfig {
            cube_count: 4,
            rng_seed: Some(1),
            ..Default::default()
        };
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(LetterScene {
            sim: Simulation::new(&config),
        });
        app.insert_resource(HudUiState {
            text: String::new(),
            mode: DetailMode::Coarse,
            cube_count: 500,
            focus: HudFocus::Text,
        });
        app.init_resource::<LetteringStatus>();
        app.add_message::<SubmitText>();
        app.add_message::<RestartScene>();
        app.add_message::<KeyboardInput>();
        app
    }

    fn mark_font_failed(app: &mut App) {
        let mut scene = app.world_mut().resource_mut::<LetterScene>();
        scene.sim.font.fail("missing");
    }

    fn drain<M: Message + Clone>(app: &mut App) -> Vec<M> {
        app.world_mut()
            .resource_mut::<Messages<M>>()
            .drain()
            .collect()
    }

    fn key(app: &mut App, logical_key: Key) {
        let window = app.world_mut().spawn_empty().id();
        app.world_mut().write_message(KeyboardInput {
            key_code: KeyCode::KeyA,
            logical_key,
            state: ButtonState::Pressed,
            text: None,
            repeat: false,
            window,
        });
    }

    #[test]
    fn buttons_toggle_mode_and_step_count() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_button_interactions);

        app.world_mut()
            .spawn((Button, Interaction::Pressed, HudDetailButton));
        app.world_mut()
            .spawn((Button, Interaction::Pressed, HudCountUpButton));

        app.update();

        let ui = app.world().resource::<HudUiState>();
        assert_eq!(ui.mode, DetailMode::Detailed);
        assert_eq!(ui.cube_count, 600);
    }

    #[test]
    fn restart_button_sends_pending_count() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_button_interactions);
        app.world_mut().resource_mut::<HudUiState>().cube_count = 1200;

        app.world_mut()
            .spawn((Button, Interaction::Pressed, HudRestartButton));
        app.update();

        assert_eq!(
            drain::<RestartScene>(&mut app),
            vec![RestartScene { cube_count: 1200 }]
        );
    }

    #[test]
    fn count_field_takes_typed_count_and_restarts_on_enter() {
        let mut app = make_test_app();
        app.add_systems(
            Update,
            (handle_button_interactions, keyboard_text_system).chain(),
        );

        app.world_mut()
            .spawn((Button, Interaction::Pressed, HudCountFieldButton));
        for _ in 0..3 {
            key(&mut app, Key::Backspace);
        }
        key(&mut app, Key::Character("2".into()));
        key(&mut app, Key::Character("5".into()));
        key(&mut app, Key::Character("0".into()));
        key(&mut app, Key::Enter);
        app.update();

        let ui = app.world().resource::<HudUiState>();
        assert_eq!(ui.focus, HudFocus::Count);
        assert_eq!(ui.cube_count, 250);
        assert!(ui.text.is_empty());
        assert_eq!(
            drain::<RestartScene>(&mut app),
            vec![RestartScene { cube_count: 250 }]
        );
    }

    #[test]
    fn focus_border_follows_clicked_field() {
        let mut app = make_test_app();
        app.add_systems(Update, (handle_button_interactions, update_focus_ui).chain());
        let text_field = app
            .world_mut()
            .spawn((Button, HudTextFieldButton, BorderColor::all(Color::NONE)))
            .id();
        let count_field = app
            .world_mut()
            .spawn((
                Button,
                Interaction::Pressed,
                HudCountFieldButton,
                BorderColor::all(Color::NONE),
            ))
            .id();

        app.update();

        let alpha = |entity| {
            app.world()
                .get::<BorderColor>(entity)
                .unwrap()
                .top
                .to_srgba()
                .alpha
        };
        assert!((alpha(count_field) - panel_border(0.9).to_srgba().alpha).abs() < 1e-4);
        assert!((alpha(text_field) - panel_border(0.3).to_srgba().alpha).abs() < 1e-4);
    }

    #[test]
    fn submit_is_inert_until_font_ready() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_button_interactions);
        app.world_mut().resource_mut::<HudUiState>().text = "HELLO".to_string();

        app.world_mut()
            .spawn((Button, Interaction::Pressed, HudSubmitButton));
        app.update();

        assert!(drain::<SubmitText>(&mut app).is_empty());
    }

    #[test]
    fn typing_edits_text_without_font() {
        let mut app = make_test_app();
        app.add_systems(Update, keyboard_text_system);

        key(&mut app, Key::Character("O".into()));
        key(&mut app, Key::Character("K".into()));
        key(&mut app, Key::Enter);
        app.update();

        assert_eq!(app.world().resource::<HudUiState>().text, "OK");
        assert!(drain::<SubmitText>(&mut app).is_empty());
    }

    #[test]
    fn text_field_shows_placeholder_or_caret() {
        let mut app = make_test_app();
        app.add_systems(Update, update_text_field_ui);
        let field = app
            .world_mut()
            .spawn((HudTextFieldText, Text::new(""), TextColor(Color::NONE)))
            .id();

        app.update();
        assert_eq!(
            app.world().get::<Text>(field).unwrap().0,
            format!("|  {PLACEHOLDER}")
        );

        app.world_mut().resource_mut::<HudUiState>().text = "AB".to_string();
        app.update();
        assert_eq!(app.world().get::<Text>(field).unwrap().0, "AB|");

        app.world_mut().resource_mut::<HudUiState>().focus = HudFocus::Count;
        app.update();
        assert_eq!(app.world().get::<Text>(field).unwrap().0, "AB");
    }

    #[test]
    fn controls_mirror_ui_state() {
        let mut app = make_test_app();
        app.add_systems(Update, update_controls_ui);
        let detail = app
            .world_mut()
            .spawn((HudDetailText, Text::new("")))
            .id();
        let count = app.world_mut().spawn((HudCountText, Text::new(""))).id();

        {
            let mut ui = app.world_mut().resource_mut::<HudUiState>();
            ui.mode = DetailMode::Detailed;
            ui.cube_count = 42;
        }
        app.update();

        assert_eq!(app.world().get::<Text>(detail).unwrap().0, "detailed");
        assert_eq!(app.world().get::<Text>(count).unwrap().0, "42");
    }

    #[test]
    fn status_reports_font_state() {
        let mut app = make_test_app();
        app.add_systems(Update, update_status_ui);
        let status = app
            .world_mut()
            .spawn((HudStatusText, Text::new("")))
            .id();

        app.update();
        assert_eq!(app.world().get::<Text>(status).unwrap().0, "Loading font...");

        mark_font_failed(&mut app);
        app.update();
        assert_eq!(
            app.world().get::<Text>(status).unwrap().0,
            "Font unavailable: missing"
        );
    }

    #[test]
    fn submit_button_dims_without_font() {
        let mut app = make_test_app();
        app.add_systems(Update, update_submit_button_ui);
        let button = app
            .world_mut()
            .spawn((HudSubmitButton, BorderColor::all(Color::NONE)))
            .id();

        app.update();

        let border = app.world().get::<BorderColor>(button).unwrap();
        let expected = panel_border(0.2).to_srgba();
        assert!((border.top.to_srgba().alpha - expected.alpha).abs() < 1e-4);
    }
}
