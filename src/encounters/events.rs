//! Encounters domain: encounter lifecycle events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// The player entered an activation zone and the boss woke up
#[derive(Debug)]
pub struct BossActivatedEvent {
    pub boss: Entity,
    pub target: Entity,
}

impl Message for BossActivatedEvent {}
