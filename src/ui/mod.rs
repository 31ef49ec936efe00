//! UI domain: boss encounter HUD.

mod hud_boss;

pub use hud_boss::phase_color;

use bevy::prelude::*;

use crate::ui::hud_boss::{
    cleanup_boss_healthbar, spawn_boss_healthbar, update_boss_healthbar, update_boss_phase_display,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_boss_healthbar,
                update_boss_healthbar,
                update_boss_phase_display,
                cleanup_boss_healthbar,
            )
                .chain(),
        );
    }
}
