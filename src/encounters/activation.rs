//! Encounters domain: waking the boss and wrapping the encounter up.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::combat::{BossBrain, BossController, BossTarget, BossTuning, EncounterConcludedEvent};
use crate::encounters::events::BossActivatedEvent;
use crate::encounters::types::{ActiveEncounter, BossActivationZone, EncounterConfig};
use crate::movement::{GameLayer, Player};

pub const ZONE_RADIUS: f32 = 120.0;

/// Spawn an activation sensor for `boss` centered on `position`.
pub fn spawn_activation_zone(commands: &mut Commands, boss: Entity, position: Vec2) -> Entity {
    commands
        .spawn((
            BossActivationZone { boss },
            Transform::from_xyz(position.x, position.y, 0.0),
            Collider::circle(ZONE_RADIUS),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player]),
        ))
        .id()
}

pub(crate) fn activate_boss_encounter(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionStart>,
    mut activated_events: MessageWriter<BossActivatedEvent>,
    mut encounter: ResMut<ActiveEncounter>,
    tuning: Res<BossTuning>,
    config: Res<EncounterConfig>,
    zones: Query<&BossActivationZone>,
    players: Query<Entity, With<Player>>,
    existing: Query<(), With<BossBrain>>,
) {
    let mut woken = Vec::new();
    for event in collision_events.read() {
        let pairs = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];

        for (zone_entity, other) in pairs {
            let Ok(zone) = zones.get(zone_entity) else {
                continue;
            };
            let Ok(player) = players.get(other) else {
                continue;
            };
            // Zone is single use
            commands.entity(zone_entity).try_despawn();

            if existing.contains(zone.boss) || woken.contains(&zone.boss) {
                continue;
            }
            woken.push(zone.boss);

            match BossController::new(tuning.clone(), config.seed_for(zone.boss)) {
                Ok(controller) => {
                    commands
                        .entity(zone.boss)
                        .insert((BossBrain(controller), BossTarget(player)));
                    encounter.start(zone.boss);
                    activated_events.write(BossActivatedEvent {
                        boss: zone.boss,
                        target: player,
                    });
                    info!("Boss {:?} activated by {:?}", zone.boss, player);
                }
                Err(e) => {
                    error!("Boss {:?} not activated: {}", zone.boss, e);
                }
            }
        }
    }
}

pub(crate) fn conclude_boss_encounter(
    mut commands: Commands,
    mut concluded_events: MessageReader<EncounterConcludedEvent>,
    mut encounter: ResMut<ActiveEncounter>,
) {
    for event in concluded_events.read() {
        if encounter.boss == Some(event.boss) {
            encounter.complete();
        }
        commands.entity(event.boss).try_despawn();
        info!("Boss {:?} removed, encounter concluded", event.boss);
    }
}
