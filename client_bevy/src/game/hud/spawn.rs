use bevy::prelude::*;

use crate::constants::{color_from_hex, Colors};

use super::types::{
    panel_bg, panel_border, HudCountDownButton, HudCountFieldButton, HudCountText,
    HudCountUpButton, HudDetailButton, HudDetailText, HudRestartButton, HudStatusText,
    HudSubmitButton, HudSubmitText, HudTextFieldButton, HudTextFieldText, HudUiState, CONTROL_HEIGHT, FIELD_WIDTH, PANEL_BOTTOM, PANEL_LEFT,
    PLACEHOLDER, STATUS_LEFT, STATUS_TOP, UI_DIM,
};

fn button(width: f32) -> (Button, Node, BackgroundColor, BorderColor, BorderRadius) {
    (
        Button,
        Node {
            width: Val::Px(width),
            height: Val::Px(CONTROL_HEIGHT),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            border: UiRect::all(Val::Px(1.0)),
            ..default()
        },
        BackgroundColor(panel_bg(0.6)),
        BorderColor::all(panel_border(0.4)),
        BorderRadius::all(Val::Px(6.0)),
    )
}

pub(super) fn spawn_hud(mut commands: Commands, hud_ui: Res<HudUiState>) {
    let medium = TextFont::from_font_size(14.0);

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(STATUS_LEFT),
            top: Val::Px(STATUS_TOP),
            ..default()
        },
        Text::new("Loading font..."),
        medium.clone(),
        TextColor(color_from_hex(UI_DIM)),
        HudStatusText,
    ));

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(PANEL_LEFT),
                bottom: Val::Px(PANEL_BOTTOM),
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::Center,
                column_gap: Val::Px(6.0),
                padding: UiRect::all(Val::Px(8.0)),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(panel_bg(0.85)),
            BorderColor::all(panel_border(0.3)),
            BorderRadius::all(Val::Px(8.0)),
        ))
        .with_children(|panel| {
            panel
                .spawn((
                    Button,
                    HudTextFieldButton,
                    Node {
                        width: Val::Px(FIELD_WIDTH),
                        height: Val::Px(CONTROL_HEIGHT),
                        align_items: AlignItems::Center,
                        padding: UiRect::horizontal(Val::Px(8.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        overflow: Overflow::clip(),
                        ..default()
                    },
                    BackgroundColor(panel_bg(1.0)),
                    BorderColor::all(panel_border(0.6)),
                    BorderRadius::all(Val::Px(6.0)),
                ))
                .with_children(|field| {
                    field.spawn((
                        Text::new(PLACEHOLDER),
                        medium.clone(),
                        TextColor(color_from_hex(UI_DIM)),
                        HudTextFieldText,
                    ));
                });

            panel
                .spawn((button(72.0), HudSubmitButton))
                .with_children(|b| {
                    b.spawn((
                        Text::new("Form"),
                        medium.clone(),
                        TextColor(color_from_hex(UI_DIM)),
                        HudSubmitText,
                    ));
                });

            panel
                .spawn((button(92.0), HudDetailButton))
                .with_children(|b| {
                    b.spawn((
                        Text::new(hud_ui.mode.as_str()),
                        medium.clone(),
                        TextColor(color_from_hex(Colors::TEXT)),
                        HudDetailText,
                    ));
                });

            panel
                .spawn((button(CONTROL_HEIGHT), HudCountDownButton))
                .with_children(|b| {
                    b.spawn((
                        Text::new("-"),
                        medium.clone(),
                        TextColor(color_from_hex(Colors::TEXT)),
                    ));
                });

            panel
                .spawn((button(56.0), HudCountFieldButton))
                .with_children(|b| {
                    b.spawn((
                        Text::new(hud_ui.cube_count.to_string()),
                        medium.clone(),
                        TextColor(color_from_hex(Colors::TEXT)),
                        HudCountText,
                    ));
                });

            panel
                .spawn((button(CONTROL_HEIGHT), HudCountUpButton))
                .with_children(|b| {
                    b.spawn((
                        Text::new("+"),
                        medium.clone(),
                        TextColor(color_from_hex(Colors::TEXT)),
                    ));
                });

            panel
                .spawn((button(80.0), HudRestartButton))
                .with_children(|b| {
                    b.spawn((
                        Text::new("Restart"),
                        medium.clone(),
                        TextColor(color_from_hex(Colors::TEXT)),
                    ));
                });
        });
}
