//! Encounters domain: unit tests for encounter tracking.

use bevy::prelude::*;

use super::{ActiveEncounter, EncounterConfig};

#[test]
fn test_active_encounter_lifecycle() {
    let mut world = World::new();
    let boss = world.spawn_empty().id();
    let mut encounter = ActiveEncounter::default();
    assert!(!encounter.is_active);

    encounter.start(boss);
    assert!(encounter.is_active);
    assert!(!encounter.is_completed);
    assert_eq!(encounter.boss, Some(boss));

    encounter.complete();
    assert!(!encounter.is_active);
    assert!(encounter.is_completed);

    encounter.reset();
    assert_eq!(encounter.boss, None);
    assert!(!encounter.is_active);
    assert!(!encounter.is_completed);
}

#[test]
fn test_bosses_get_distinct_seeds() {
    let mut world = World::new();
    let config = EncounterConfig { seed: 99 };
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();
    assert_ne!(config.seed_for(a), config.seed_for(b));
    assert_eq!(config.seed_for(a), config.seed_for(a));
}
