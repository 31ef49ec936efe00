//! Encounters domain: boss activation and encounter lifecycle.

mod activation;
mod events;
#[cfg(test)]
mod tests;
mod types;

pub use activation::{ZONE_RADIUS, spawn_activation_zone};
pub use events::BossActivatedEvent;
pub use types::{ActiveEncounter, BossActivationZone, EncounterConfig};

use bevy::prelude::*;

use crate::encounters::activation::{activate_boss_encounter, conclude_boss_encounter};

pub struct EncountersPlugin;

impl Plugin for EncountersPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveEncounter>()
            .init_resource::<EncounterConfig>()
            .add_message::<BossActivatedEvent>()
            .add_systems(
                Update,
                (activate_boss_encounter, conclude_boss_encounter).chain(),
            );
    }
}
