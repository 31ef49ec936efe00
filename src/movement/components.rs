//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Arena walls
    Wall,
    /// Player character
    Player,
    /// The boss body
    Enemy,
    /// Sensors (activation zones) - should not block movement
    Sensor,
    /// Player hitboxes (damage the boss)
    PlayerHitbox,
    /// Boss hitboxes and projectiles (damage the player)
    EnemyHitbox,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;
