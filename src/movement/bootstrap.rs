//! Movement domain: player and arena bootstrap.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::combat::{Combatant, Health, Invulnerable, PlayerAttackTuning, Team, spawn_player_hitbox};
use crate::movement::{GameLayer, Player, Wall};

pub const PLAYER_SIZE: f32 = 24.0;
pub const PLAYER_MAX_HEALTH: u32 = 10;
/// Half extents of the square arena
pub const ARENA_HALF_SIZE: f32 = 360.0;
const WALL_THICKNESS: f32 = 20.0;

/// Spawn the player along with its swing hitbox.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    attack: &PlayerAttackTuning,
) -> Entity {
    let player = commands
        .spawn((
            // Identity & Combat
            (
                Player,
                Combatant,
                Team::Player,
                Health::new(PLAYER_MAX_HEALTH),
                Invulnerable::default(),
            ),
            // Rendering
            (
                Sprite {
                    color: Color::srgb(0.9, 0.9, 0.9),
                    custom_size: Some(Vec2::splat(PLAYER_SIZE)),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, 0.0),
            ),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(PLAYER_SIZE, PLAYER_SIZE),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::Wall, GameLayer::EnemyHitbox, GameLayer::Sensor],
                ),
                LinearVelocity::default(),
                LockedAxes::ROTATION_LOCKED,
                GravityScale(0.0),
            ),
        ))
        .id();
    spawn_player_hitbox(commands, player, attack);
    player
}

/// Four walls enclosing the arena.
pub fn spawn_arena_walls(commands: &mut Commands) {
    let span = ARENA_HALF_SIZE * 2.0 + WALL_THICKNESS;
    let walls = [
        (Vec2::new(0.0, ARENA_HALF_SIZE), Vec2::new(span, WALL_THICKNESS)),
        (Vec2::new(0.0, -ARENA_HALF_SIZE), Vec2::new(span, WALL_THICKNESS)),
        (Vec2::new(ARENA_HALF_SIZE, 0.0), Vec2::new(WALL_THICKNESS, span)),
        (Vec2::new(-ARENA_HALF_SIZE, 0.0), Vec2::new(WALL_THICKNESS, span)),
    ];

    for (position, size) in walls {
        commands.spawn((
            Wall,
            Sprite {
                color: Color::srgb(0.25, 0.25, 0.3),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.0),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            CollisionLayers::new(
                GameLayer::Wall,
                [GameLayer::Player, GameLayer::Enemy, GameLayer::EnemyHitbox],
            ),
        ));
    }
}
