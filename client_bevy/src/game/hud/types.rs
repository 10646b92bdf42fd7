use bevy::input::keyboard::Key;
use bevy::prelude::*;
use letterfall_core::config::DEFAULT_CUBE_COUNT;
use letterfall_core::targets::DetailMode;

use crate::game::Settings;

pub(super) const PANEL_LEFT: f32 = 12.0;
pub(super) const PANEL_BOTTOM: f32 = 12.0;
pub(super) const STATUS_LEFT: f32 = 14.0;
pub(super) const STATUS_TOP: f32 = 10.0;

pub(super) const FIELD_WIDTH: f32 = 280.0;
pub(super) const CONTROL_HEIGHT: f32 = 30.0;

pub(super) const MAX_TEXT_CHARS: usize = 48;
pub(super) const COUNT_STEP: usize = 100;
pub(super) const MIN_CUBE_COUNT: usize = 1;
pub(super) const MAX_CUBE_COUNT: usize = 5000;

pub(super) const UI_DIM: u32 = 0x7f8c99;
pub(super) const PLACEHOLDER: &str = "type text, Enter to form";

/// Which field receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum HudFocus {
    #[default]
    Text,
    Count,
}

/// Form state of the HUD controls.
#[derive(Resource, Debug, Clone, PartialEq)]
pub(crate) struct HudUiState {
    pub(crate) text: String,
    pub(crate) mode: DetailMode,
    /// Count the next restart uses; the running field may differ.
    pub(crate) cube_count: usize,
    pub(crate) focus: HudFocus,
}

impl HudUiState {
    /// Count sent on restart; an emptied field restarts with one cube.
    pub(crate) fn restart_count(&self) -> usize {
        self.cube_count.clamp(MIN_CUBE_COUNT, MAX_CUBE_COUNT)
    }
}

impl FromWorld for HudUiState {
    fn from_world(world: &mut World) -> Self {
        let cube_count = world
            .get_resource::<Settings>()
            .map(|settings| settings.config.cube_count)
            .unwrap_or(DEFAULT_CUBE_COUNT);
        Self {
            text: String::new(),
            mode: DetailMode::default(),
            cube_count,
            focus: HudFocus::default(),
        }
    }
}

#[derive(Component)]
pub(super) struct HudTextFieldText;

#[derive(Component)]
pub(super) struct HudTextFieldButton;

#[derive(Component)]
pub(super) struct HudSubmitButton;

#[derive(Component)]
pub(super) struct HudSubmitText;

#[derive(Component)]
pub(super) struct HudDetailButton;

#[derive(Component)]
pub(super) struct HudDetailText;

#[derive(Component)]
pub(super) struct HudCountDownButton;

#[derive(Component)]
pub(super) struct HudCountUpButton;

#[derive(Component)]
pub(super) struct HudCountFieldButton;

#[derive(Component)]
pub(super) struct HudCountText;

#[derive(Component)]
pub(super) struct HudRestartButton;

#[derive(Component)]
pub(super) struct HudStatusText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyAction {
    Edited,
    Submit,
    Ignored,
}

/// Applies one pressed key to the text field.
pub(super) fn apply_key(text: &mut String, key: &Key) -> KeyAction {
    match key {
        Key::Enter => KeyAction::Submit,
        Key::Backspace => {
            if text.pop().is_some() {
                KeyAction::Edited
            } else {
                KeyAction::Ignored
            }
        }
        Key::Space => push_chars(text, " "),
        Key::Character(chars) => push_chars(text, chars),
        _ => KeyAction::Ignored,
    }
}

fn push_chars(text: &mut String, chars: &str) -> KeyAction {
    let mut edited = false;
    for c in chars.chars().filter(|c| !c.is_control()) {
        if text.chars().count() >= MAX_TEXT_CHARS {
            break;
        }
        text.push(c);
        edited = true;
    }
    if edited {
        KeyAction::Edited
    } else {
        KeyAction::Ignored
    }
}

/// Applies one pressed key to the cube-count field. Digits that would push
/// the count past `MAX_CUBE_COUNT` are ignored.
pub(super) fn apply_count_key(count: &mut usize, key: &Key) -> KeyAction {
    match key {
        Key::Enter => KeyAction::Submit,
        Key::Backspace => {
            if *count == 0 {
                return KeyAction::Ignored;
            }
            *count /= 10;
            KeyAction::Edited
        }
        Key::Character(chars) => {
            let mut edited = false;
            for digit in chars.chars().filter_map(|c| c.to_digit(10)) {
                let next = *count * 10 + digit as usize;
                if next > MAX_CUBE_COUNT {
                    break;
                }
                *count = next;
                edited = true;
            }
            if edited {
                KeyAction::Edited
            } else {
                KeyAction::Ignored
            }
        }
        _ => KeyAction::Ignored,
    }
}

/// Moves the restart count by whole `COUNT_STEP`s, clamped to the allowed
/// range.
pub(super) fn step_cube_count(current: usize, steps: i64) -> usize {
    let next = current as i64 + steps * COUNT_STEP as i64;
    next.clamp(MIN_CUBE_COUNT as i64, MAX_CUBE_COUNT as i64) as usize
}

pub(super) fn panel_bg(alpha: f32) -> Color {
    Color::srgba(8.0 / 255.0, 14.0 / 255.0, 22.0 / 255.0, alpha)
}

pub(super) fn panel_border(alpha: f32) -> Color {
    Color::srgba(0.0, 170.0 / 255.0, 1.0, alpha)
}
