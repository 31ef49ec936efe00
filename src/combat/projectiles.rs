//! Combat domain: projectile entities released by boss volleys.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::combat::components::{Combatant, Invulnerable, Team};
use crate::combat::events::{DamageEvent, ProjectileSpawnEvent};
use crate::combat::resources::BossTuning;
use crate::movement::{ARENA_HALF_SIZE, GameLayer};

const PROJECTILE_RADIUS: f32 = 5.0;

#[derive(Component, Debug)]
pub struct Projectile {
    pub owner: Entity,
    pub damage: u32,
    pub speed: f32,
    pub direction: Vec2,
    pub age: Duration,
    pub lifetime: Duration,
    pub homing: Option<Homing>,
}

#[derive(Debug, Clone, Copy)]
pub struct Homing {
    pub target: Entity,
    /// Flies straight until `age` reaches this
    pub delay: Duration,
    pub turn_rate: f32,
}

/// Turns `direction` toward `to_target` by `turn_rate * dt` of the gap.
pub fn steer(direction: Vec2, to_target: Vec2, turn_rate: f32, dt: f32) -> Vec2 {
    let desired = to_target.normalize_or_zero();
    if desired == Vec2::ZERO {
        return direction;
    }
    let t = (turn_rate * dt).clamp(0.0, 1.0);
    direction.lerp(desired, t).normalize_or(direction)
}

pub(crate) fn spawn_projectiles(
    mut commands: Commands,
    mut spawn_events: MessageReader<ProjectileSpawnEvent>,
    tuning: Res<BossTuning>,
) {
    for event in spawn_events.read() {
        let spec = event.spec;
        let homing = match (spec.homing, event.target) {
            (true, Some(target)) => Some(Homing {
                target,
                delay: Duration::from_millis(tuning.projectiles.homing_delay_ms),
                turn_rate: tuning.projectiles.homing_turn_rate,
            }),
            _ => None,
        };

        commands.spawn((
            Projectile {
                owner: event.owner,
                damage: spec.damage,
                speed: spec.speed,
                direction: spec.direction,
                age: Duration::ZERO,
                lifetime: spec.lifetime,
                homing,
            },
            Team::Enemy,
            Sprite {
                color: if homing.is_some() {
                    Color::srgb(0.9, 0.3, 0.9)
                } else {
                    Color::srgb(1.0, 0.6, 0.2)
                },
                custom_size: Some(Vec2::splat(PROJECTILE_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(spec.position.x, spec.position.y, 1.0),
            RigidBody::Kinematic,
            Collider::circle(PROJECTILE_RADIUS),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::EnemyHitbox, [GameLayer::Player, GameLayer::Wall]),
            LinearVelocity(spec.direction * spec.speed),
        ));
    }
}

pub(crate) fn steer_projectiles(
    time: Res<Time>,
    targets: Query<&Transform, Without<Projectile>>,
    mut projectiles: Query<(&Transform, &mut Projectile, &mut LinearVelocity)>,
) {
    let dt = time.delta_secs();

    for (transform, mut projectile, mut velocity) in &mut projectiles {
        projectile.age += time.delta();

        let Some(homing) = projectile.homing else {
            continue;
        };
        if projectile.age < homing.delay {
            continue;
        }
        // Target gone: keep flying straight
        let Ok(target) = targets.get(homing.target) else {
            continue;
        };

        let to_target = (target.translation - transform.translation).truncate();
        projectile.direction = steer(projectile.direction, to_target, homing.turn_rate, dt);
        velocity.0 = projectile.direction * projectile.speed;
    }
}

/// Despawns projectiles past their lifetime or outside the arena.
pub(crate) fn expire_projectiles(
    mut commands: Commands,
    query: Query<(Entity, &Projectile, &Transform)>,
) {
    for (entity, projectile, transform) in &query {
        let escaped = transform.translation.truncate().abs().max_element() > ARENA_HALF_SIZE;
        if projectile.age >= projectile.lifetime || escaped {
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn detect_projectile_hits(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionStart>,
    mut damage_events: MessageWriter<DamageEvent>,
    projectiles: Query<(&Projectile, &Team)>,
    targets: Query<(&Team, &Invulnerable), With<Combatant>>,
) {
    for event in collision_events.read() {
        let pairs = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];

        for (projectile_entity, other) in pairs {
            let Ok((projectile, projectile_team)) = projectiles.get(projectile_entity) else {
                continue;
            };

            // Anything else it touches is a wall, which absorbs it
            if let Ok((team, invuln)) = targets.get(other) {
                if team == projectile_team || other == projectile.owner {
                    continue;
                }
                if !invuln.is_invulnerable() {
                    damage_events.write(DamageEvent {
                        source: projectile.owner,
                        target: other,
                        amount: projectile.damage,
                        knockback: Vec2::ZERO,
                    });
                }
            }
            commands.entity(projectile_entity).try_despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steer_turns_toward_target() {
        let steered = steer(Vec2::X, Vec2::new(0.0, 10.0), 2.0, 0.1);
        assert!(steered.y > 0.0);
        assert!(steered.x > 0.0);
        assert!((steered.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_steer_large_step_snaps_to_target() {
        let steered = steer(Vec2::X, Vec2::new(0.0, -4.0), 2.0, 1.0);
        assert!((steered - Vec2::NEG_Y).length() < 1e-4);
    }

    #[test]
    fn test_steer_keeps_direction_without_target_offset() {
        assert_eq!(steer(Vec2::Y, Vec2::ZERO, 2.0, 0.5), Vec2::Y);
    }
}
