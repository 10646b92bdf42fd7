mod spawn;
mod systems;
mod types;

use bevy::prelude::*;

use super::UpdateSet;
use types::HudUiState;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudUiState>()
            .add_systems(Startup, spawn::spawn_hud)
            .add_systems(
                Update,
                (systems::keyboard_text_system, systems::handle_button_interactions)
                    .chain()
                    .in_set(UpdateSet::Input),
            )
            .add_systems(
                Update,
                (
                    systems::update_text_field_ui,
                    systems::update_controls_ui,
                    systems::update_focus_ui,
                    systems::update_submit_button_ui,
                    systems::update_status_ui,
                )
                    .chain()
                    .in_set(UpdateSet::Visuals),
            );
    }
}
