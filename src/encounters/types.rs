//! Encounters domain: encounter tracking resources and components.

use bevy::prelude::*;

/// Trigger volume that wakes `boss` when the player walks in. Consumed on use.
#[derive(Component, Debug)]
pub struct BossActivationZone {
    pub boss: Entity,
}

/// Seed for the boss controllers spawned this session
#[derive(Resource, Debug, Clone)]
pub struct EncounterConfig {
    pub seed: u64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
        }
    }
}

impl EncounterConfig {
    /// Per-boss seed so that two bosses never share a random stream.
    pub fn seed_for(&self, boss: Entity) -> u64 {
        self.seed.wrapping_add(boss.to_bits())
    }
}

/// Tracks the boss encounter currently in progress
#[derive(Resource, Debug, Default)]
pub struct ActiveEncounter {
    /// The boss being fought
    pub boss: Option<Entity>,
    /// Whether the encounter is currently active
    pub is_active: bool,
    /// Set once the boss died and its grace delay elapsed
    pub is_completed: bool,
}

impl ActiveEncounter {
    /// Start a new encounter against `boss`
    pub fn start(&mut self, boss: Entity) {
        self.boss = Some(boss);
        self.is_active = true;
        self.is_completed = false;
    }

    /// Mark encounter as completed
    pub fn complete(&mut self) {
        self.is_active = false;
        self.is_completed = true;
    }

    /// Reset for next encounter
    pub fn reset(&mut self) {
        self.boss = None;
        self.is_active = false;
        self.is_completed = false;
    }
}
