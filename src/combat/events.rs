//! Combat domain: combat-related events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::combat::patterns::ProjectileSpawnSpec;
use crate::combat::phase::Phase;
use crate::combat::signals::AnimationTrigger;

#[derive(Debug)]
pub struct DamageEvent {
    pub source: Entity,
    pub target: Entity,
    pub amount: u32,
    /// Velocity imposed on the target, zero for none
    pub knockback: Vec2,
}

impl Message for DamageEvent {}

#[derive(Debug)]
pub struct BossHealthChangedEvent {
    pub boss: Entity,
    pub health: u32,
    pub max_health: u32,
}

impl Message for BossHealthChangedEvent {}

#[derive(Debug)]
pub struct BossPhaseChangeEvent {
    pub boss: Entity,
    pub new_phase: Phase,
}

impl Message for BossPhaseChangeEvent {}

#[derive(Debug)]
pub struct BossDefeatedEvent {
    pub boss: Entity,
}

impl Message for BossDefeatedEvent {}

/// The boss's post-death grace delay elapsed
#[derive(Debug)]
pub struct EncounterConcludedEvent {
    pub boss: Entity,
}

impl Message for EncounterConcludedEvent {}

#[derive(Debug)]
pub struct BossAnimationEvent {
    pub boss: Entity,
    pub trigger: AnimationTrigger,
}

impl Message for BossAnimationEvent {}

#[derive(Debug)]
pub struct ProjectileSpawnEvent {
    pub owner: Entity,
    pub spec: ProjectileSpawnSpec,
    /// Homing projectiles steer toward this entity
    pub target: Option<Entity>,
}

impl Message for ProjectileSpawnEvent {}
