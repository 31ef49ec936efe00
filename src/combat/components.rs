//! Combat domain: ECS components wrapping the boss controller.

use bevy::prelude::*;

use crate::combat::controller::BossController;
use crate::combat::policy::AttackKind;
use crate::combat::resources::PlayerAttackTuning;

/// Marks the boss entity
#[derive(Component, Debug)]
pub struct Boss;

/// The boss's behavior controller. Added when the encounter activates.
#[derive(Component, Debug)]
pub struct BossBrain(pub BossController);

/// Entity the boss chases and aims at
#[derive(Component, Debug, Clone, Copy)]
pub struct BossTarget(pub Entity);

/// Marks an entity as a combat participant
#[derive(Component, Debug)]
pub struct Combatant;

/// Health for entities without a controller (the player)
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

/// Invulnerability frames - entity cannot take damage
#[derive(Component, Debug, Default)]
pub struct Invulnerable {
    pub timer: f32,
}

impl Invulnerable {
    pub fn is_invulnerable(&self) -> bool {
        self.timer > 0.0
    }
}

/// One of the boss's reusable damage volumes, toggled by the controller.
#[derive(Component, Debug)]
pub struct BossHitbox {
    pub owner: Entity,
    pub kind: AttackKind,
    pub damage: u32,
    /// Speed the target is pushed away with
    pub knockback: f32,
    pub enabled: bool,
    /// Targets already damaged during the current activation
    pub hit_entities: Vec<Entity>,
}

impl BossHitbox {
    pub fn new(owner: Entity, kind: AttackKind, damage: u32, knockback: f32) -> Self {
        Self {
            owner,
            kind,
            damage,
            knockback,
            enabled: false,
            hit_entities: Vec::new(),
        }
    }
}

/// The player's swing volume, a child sensor of the player.
#[derive(Component, Debug)]
pub struct PlayerHitbox {
    pub owner: Entity,
    pub damage: u32,
    /// Time left with the volume live
    pub active_timer: f32,
    /// Time left before the next swing may start
    pub cooldown_timer: f32,
    pub duration: f32,
    pub cooldown: f32,
    /// Targets already damaged by the current swing
    pub hit_entities: Vec<Entity>,
}

impl PlayerHitbox {
    pub fn new(owner: Entity, tuning: &PlayerAttackTuning) -> Self {
        Self {
            owner,
            damage: tuning.damage,
            active_timer: 0.0,
            cooldown_timer: 0.0,
            duration: tuning.duration,
            cooldown: tuning.cooldown,
            hit_entities: Vec::new(),
        }
    }

    /// Starts a swing. Ignored while a swing is live or cooling down.
    pub fn swing(&mut self) -> bool {
        if self.is_active() || self.cooldown_timer > 0.0 {
            return false;
        }
        self.active_timer = self.duration;
        self.cooldown_timer = self.cooldown;
        self.hit_entities.clear();
        true
    }

    pub fn update(&mut self, dt: f32) {
        self.active_timer = (self.active_timer - dt).max(0.0);
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.active_timer > 0.0
    }

    /// Records a hit on `target`. False outside a swing or for a repeat hit.
    pub fn register_hit(&mut self, target: Entity) -> bool {
        if !self.is_active() || self.hit_entities.contains(&target) {
            return false;
        }
        self.hit_entities.push(target);
        true
    }
}

/// Team affiliation to prevent friendly fire
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Player,
    Enemy,
}

/// Animator parameters mirrored from the controller each frame.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationParams {
    pub is_moving: bool,
    /// Last non-zero movement direction (`MoveX` / `MoveY`)
    pub facing: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hitbox() -> (PlayerHitbox, Entity) {
        let mut world = World::new();
        let owner = world.spawn_empty().id();
        let target = world.spawn_empty().id();
        let tuning = PlayerAttackTuning::default();
        (PlayerHitbox::new(owner, &tuning), target)
    }

    #[test]
    fn test_swing_hits_each_target_once() {
        let (mut hitbox, target) = hitbox();
        assert!(hitbox.swing());
        assert!(hitbox.register_hit(target));
        assert!(!hitbox.register_hit(target));

        hitbox.update(0.1);
        assert!(!hitbox.register_hit(target));
    }

    #[test]
    fn test_hits_outside_a_swing_are_ignored() {
        let (mut hitbox, target) = hitbox();
        assert!(!hitbox.register_hit(target));

        hitbox.swing();
        hitbox.update(0.2);
        assert!(!hitbox.is_active());
        assert!(!hitbox.register_hit(target));
    }

    #[test]
    fn test_swing_respects_cooldown() {
        let (mut hitbox, target) = hitbox();
        assert!(hitbox.swing());
        assert!(!hitbox.swing());

        hitbox.update(0.2);
        assert!(!hitbox.swing());

        hitbox.update(0.2);
        assert!(hitbox.swing());
        assert!(hitbox.register_hit(target));
    }
}
