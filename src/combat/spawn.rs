//! Combat domain: boss and hitbox spawning helpers.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::components::{
    AnimationParams, Boss, BossHitbox, Combatant, Invulnerable, PlayerHitbox, Team,
};
use crate::combat::policy::AttackKind;
use crate::combat::resources::{BossTuning, PlayerAttackTuning};
use crate::movement::GameLayer;

pub const BOSS_SIZE: f32 = 64.0;
/// Melee hitbox reach around the boss center
pub const MELEE_RADIUS: f32 = 56.0;
/// Slam area radius around the boss center
pub const SLAM_RADIUS: f32 = 110.0;

/// Spawn the dormant boss. Its controller is attached when the encounter
/// activates.
pub fn spawn_boss(commands: &mut Commands, position: Vec2, tuning: &BossTuning) -> Entity {
    let boss = commands
        .spawn((
            // Identity & Combat
            (
                Boss,
                Combatant,
                Team::Enemy,
                Invulnerable::default(),
                AnimationParams::default(),
            ),
            // Rendering
            (
                Sprite {
                    color: Color::srgb(0.9, 0.1, 0.1),
                    custom_size: Some(Vec2::splat(BOSS_SIZE)),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, 0.0),
                Visibility::default(),
            ),
            // Physics
            (
                RigidBody::Kinematic,
                Collider::rectangle(BOSS_SIZE, BOSS_SIZE),
                CollisionEventsEnabled,
                CollisionLayers::new(GameLayer::Enemy, [GameLayer::Wall, GameLayer::PlayerHitbox]),
                LinearVelocity::default(),
                LockedAxes::ROTATION_LOCKED,
            ),
        ))
        .id();

    spawn_hitbox(commands, boss, AttackKind::Melee, MELEE_RADIUS, tuning);
    spawn_hitbox(commands, boss, AttackKind::AreaSlam, SLAM_RADIUS, tuning);
    boss
}

/// Reusable sensor volume parented to the boss, disabled until an attack
/// turns it on.
fn spawn_hitbox(
    commands: &mut Commands,
    boss: Entity,
    kind: AttackKind,
    radius: f32,
    tuning: &BossTuning,
) -> Entity {
    let damage = tuning.attacks.get(kind).damage;
    commands
        .spawn((
            BossHitbox::new(boss, kind, damage, tuning.knockback_speed),
            Transform::default(),
            Collider::circle(radius),
            Sensor,
            CollisionEventsEnabled,
            CollidingEntities::default(),
            CollisionLayers::new(GameLayer::EnemyHitbox, [GameLayer::Player]),
            ColliderDisabled,
            ChildOf(boss),
        ))
        .id()
}

/// The player's swing volume, parented to the player. Collidable only while a
/// swing is live.
pub fn spawn_player_hitbox(
    commands: &mut Commands,
    player: Entity,
    tuning: &PlayerAttackTuning,
) -> Entity {
    commands
        .spawn((
            PlayerHitbox::new(player, tuning),
            Transform::from_xyz(0.0, tuning.hitbox_offset, 0.0),
            Collider::rectangle(tuning.hitbox_size, tuning.hitbox_size),
            Sensor,
            CollisionEventsEnabled,
            CollidingEntities::default(),
            CollisionLayers::new(GameLayer::PlayerHitbox, [GameLayer::Enemy]),
            ColliderDisabled,
            ChildOf(player),
        ))
        .id()
}
