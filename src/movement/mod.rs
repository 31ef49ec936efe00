//! Movement domain: top-down player locomotion and physics layers.

mod bootstrap;
mod components;
mod resources;
mod systems;

pub use bootstrap::{
    ARENA_HALF_SIZE, PLAYER_MAX_HEALTH, PLAYER_SIZE, spawn_arena_walls, spawn_player,
};
pub use components::{GameLayer, Player, Wall};
pub use resources::{MovementInput, MovementTuning};
pub use systems::movement::step_velocity;

use bevy::prelude::*;

use crate::movement::systems::{apply_movement, read_input};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_systems(Update, (read_input, apply_movement).chain());
    }
}
