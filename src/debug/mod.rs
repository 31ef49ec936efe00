//! Debug domain: runtime hotkeys for exercising the boss encounter.
//!
//! All hotkeys need Ctrl held:
//! - I: toggle player invincibility
//! - D: toggle the boss info overlay
//! - K / L: light / heavy hit on the boss
//! - U: stun the boss
//! - 1 / 2 / 3: force a melee / ranged / slam attack

mod state;
mod systems;

pub use state::DebugState;

use bevy::prelude::*;

use crate::debug::systems::{apply_invincibility, handle_debug_hotkeys, update_debug_info_overlay};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>().add_systems(
            Update,
            (
                handle_debug_hotkeys,
                apply_invincibility,
                update_debug_info_overlay,
            )
                .chain(),
        );
    }
}
