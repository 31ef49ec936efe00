//! Combat domain: systems driving boss controllers and delivering damage.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::combat::components::{
    AnimationParams, Boss, BossBrain, BossHitbox, BossTarget, Combatant, Health, Invulnerable,
    PlayerHitbox, Team,
};
use crate::combat::events::{
    BossAnimationEvent, BossDefeatedEvent, BossHealthChangedEvent, BossPhaseChangeEvent,
    DamageEvent, EncounterConcludedEvent, ProjectileSpawnEvent,
};
use crate::combat::policy::AttackKind;
use crate::combat::resources::{CombatInput, PlayerAttackTuning};
use crate::combat::signals::{AnimationCue, BossNotice};
use crate::movement::MovementInput;

/// Player invulnerability after taking a hit, in seconds
pub const PLAYER_IFRAMES: f32 = 0.5;
/// Upper bound on a knockback impulse
const MAX_KNOCKBACK_SPEED: f32 = 800.0;

/// Velocity pushing a target at `to` away from a hitbox at `from`. A target on
/// the hitbox center is pushed along +X.
pub fn knockback_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).try_normalize().unwrap_or(Vec2::X) * speed
}

pub(crate) fn read_combat_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<CombatInput>,
) {
    input.attack = keyboard.any_just_pressed([KeyCode::Space, KeyCode::KeyJ]);
}

pub(crate) fn update_invulnerability_timers(time: Res<Time>, mut query: Query<&mut Invulnerable>) {
    let dt = time.delta_secs();
    for mut invuln in &mut query {
        if invuln.timer > 0.0 {
            invuln.timer -= dt;
        }
    }
}

/// Ticks player swings and starts a new one on attack input. The volume is
/// only collidable while a swing is live.
pub(crate) fn update_player_swings(
    mut commands: Commands,
    time: Res<Time>,
    input: Res<CombatInput>,
    movement: Res<MovementInput>,
    tuning: Res<PlayerAttackTuning>,
    mut hitboxes: Query<(Entity, &mut PlayerHitbox, &mut Transform, Has<ColliderDisabled>)>,
) {
    let dt = time.delta_secs();

    for (entity, mut hitbox, mut transform, disabled) in &mut hitboxes {
        hitbox.update(dt);
        if input.attack && hitbox.swing() {
            // Standing still keeps the previous aim
            if let Some(aim) = movement.axis.try_normalize() {
                transform.translation = (aim * tuning.hitbox_offset).extend(0.0);
            }
            debug!("Player swing toward {:?}", transform.translation.truncate());
        }

        let active = hitbox.is_active();
        if active && disabled {
            commands.entity(entity).remove::<ColliderDisabled>();
        } else if !active && !disabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}

/// A live swing damages each overlapping enemy once.
pub(crate) fn detect_player_hitbox_hits(
    mut damage_events: MessageWriter<DamageEvent>,
    mut hitboxes: Query<(&mut PlayerHitbox, &CollidingEntities)>,
    targets: Query<&Team, With<Combatant>>,
) {
    for (mut hitbox, colliding) in &mut hitboxes {
        if !hitbox.is_active() {
            continue;
        }
        for &target in colliding.iter() {
            let Ok(team) = targets.get(target) else {
                continue;
            };
            if *team != Team::Enemy || !hitbox.register_hit(target) {
                continue;
            }
            damage_events.write(DamageEvent {
                source: hitbox.owner,
                target,
                amount: hitbox.damage,
                knockback: Vec2::ZERO,
            });
        }
    }
}

/// Routes damage aimed at a boss into its controller.
pub(crate) fn apply_boss_damage(
    mut damage_events: MessageReader<DamageEvent>,
    mut bosses: Query<&mut BossBrain>,
) {
    for event in damage_events.read() {
        let Ok(mut brain) = bosses.get_mut(event.target) else {
            continue;
        };
        let result = brain.0.apply_damage(event.amount);
        if !result.accepted {
            debug!(
                "Boss ignored {} damage from {:?}",
                event.amount, event.source
            );
        }
    }
}

pub(crate) fn tick_boss_brains(
    time: Res<Time>,
    mut bosses: Query<(&mut BossBrain, &Transform, Option<&BossTarget>)>,
    transforms: Query<&Transform, Without<BossBrain>>,
) {
    let dt = time.delta();

    for (mut brain, transform, target) in &mut bosses {
        let position = transform.translation.truncate();
        let target_position = target
            .and_then(|target| transforms.get(target.0).ok())
            .map(|t| t.translation.truncate());
        brain.0.tick(dt, position, target_position);
    }
}

/// Hands the controller's queued signals to the mover, animator, spawner and UI.
pub(crate) fn dispatch_boss_signals(
    mut bosses: Query<(
        Entity,
        &mut BossBrain,
        &mut LinearVelocity,
        &mut Visibility,
        &mut AnimationParams,
        Option<&BossTarget>,
    )>,
    mut health_events: MessageWriter<BossHealthChangedEvent>,
    mut phase_events: MessageWriter<BossPhaseChangeEvent>,
    mut defeated_events: MessageWriter<BossDefeatedEvent>,
    mut concluded_events: MessageWriter<EncounterConcludedEvent>,
    mut animation_events: MessageWriter<BossAnimationEvent>,
    mut projectile_events: MessageWriter<ProjectileSpawnEvent>,
) {
    for (boss, mut brain, mut velocity, mut visibility, mut params, target) in &mut bosses {
        let signals = brain.0.drain_signals();

        velocity.0 = signals.motion.velocity();
        *visibility = if brain.0.state().is_visible() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        for cue in signals.cues {
            match cue {
                AnimationCue::Trigger(trigger) => {
                    animation_events.write(BossAnimationEvent { boss, trigger });
                }
                AnimationCue::Moving(moving) => params.is_moving = moving,
                AnimationCue::Facing(direction) => params.facing = direction,
            }
        }

        for spec in signals.projectiles {
            projectile_events.write(ProjectileSpawnEvent {
                owner: boss,
                spec,
                target: target.map(|t| t.0),
            });
        }

        for notice in signals.notices {
            match notice {
                BossNotice::HealthChanged { health, max_health } => {
                    health_events.write(BossHealthChangedEvent {
                        boss,
                        health,
                        max_health,
                    });
                }
                BossNotice::PhaseChanged(new_phase) => {
                    phase_events.write(BossPhaseChangeEvent { boss, new_phase });
                }
                BossNotice::Died => {
                    defeated_events.write(BossDefeatedEvent { boss });
                }
                BossNotice::Concluded => {
                    concluded_events.write(EncounterConcludedEvent { boss });
                }
            }
        }
    }
}

/// Mirrors the controller's hitbox flags onto the hitbox colliders, and turns
/// off the boss's own collider once it is dead.
pub(crate) fn sync_boss_hitboxes(
    mut commands: Commands,
    brains: Query<(Entity, &BossBrain, Has<ColliderDisabled>), With<Boss>>,
    mut hitboxes: Query<(Entity, &mut BossHitbox)>,
) {
    for (entity, mut hitbox) in &mut hitboxes {
        let Ok((_, brain, _)) = brains.get(hitbox.owner) else {
            continue;
        };
        let flags = brain.0.hitboxes();
        let enabled = match hitbox.kind {
            AttackKind::Melee => flags.melee,
            AttackKind::AreaSlam => flags.area,
            AttackKind::Ranged => false,
        };
        if enabled == hitbox.enabled {
            continue;
        }

        hitbox.enabled = enabled;
        if enabled {
            hitbox.hit_entities.clear();
            commands.entity(entity).remove::<ColliderDisabled>();
        } else {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }

    for (entity, brain, disabled) in &brains {
        if !brain.0.is_alive() && !disabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}

/// Enabled boss hitboxes damage each overlapping opponent once per activation
/// and push it away from the hitbox center.
pub(crate) fn detect_boss_hitbox_hits(
    mut damage_events: MessageWriter<DamageEvent>,
    mut hitboxes: Query<(&mut BossHitbox, &CollidingEntities, &GlobalTransform)>,
    targets: Query<(&Team, &Invulnerable, &Transform), With<Combatant>>,
) {
    for (mut hitbox, colliding, origin) in &mut hitboxes {
        if !hitbox.enabled {
            continue;
        }
        for &target in colliding.iter() {
            if target == hitbox.owner || hitbox.hit_entities.contains(&target) {
                continue;
            }
            let Ok((team, invuln, transform)) = targets.get(target) else {
                continue;
            };
            if *team == Team::Enemy || invuln.is_invulnerable() {
                continue;
            }

            hitbox.hit_entities.push(target);
            let from = origin.translation().truncate();
            let to = transform.translation.truncate();
            damage_events.write(DamageEvent {
                source: hitbox.owner,
                target,
                amount: hitbox.damage,
                knockback: knockback_velocity(from, to, hitbox.knockback),
            });
        }
    }
}

/// Damage sink for everything that is not a boss.
pub(crate) fn apply_damage(
    mut damage_events: MessageReader<DamageEvent>,
    mut query: Query<(&mut Health, &mut Invulnerable), Without<BossBrain>>,
) {
    for event in damage_events.read() {
        let Ok((mut health, mut invuln)) = query.get_mut(event.target) else {
            continue;
        };
        if invuln.is_invulnerable() {
            continue;
        }
        let dealt = health.take_damage(event.amount);
        invuln.timer = PLAYER_IFRAMES;
        info!(
            "{:?} took {} damage ({}/{})",
            event.target, dealt, health.current, health.max
        );
    }
}

/// Replaces the velocity of knocked-back targets. Bosses move on their own.
pub(crate) fn apply_knockback(
    mut damage_events: MessageReader<DamageEvent>,
    mut query: Query<&mut LinearVelocity, Without<BossBrain>>,
) {
    for event in damage_events.read() {
        if event.knockback == Vec2::ZERO {
            continue;
        }
        let Ok(mut velocity) = query.get_mut(event.target) else {
            continue;
        };
        velocity.0 = event.knockback.clamp_length_max(MAX_KNOCKBACK_SPEED);
        debug!("{:?} knocked back at {:?}", event.target, velocity.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockback_points_away_from_hitbox() {
        let velocity = knockback_velocity(Vec2::ZERO, Vec2::new(0.0, -40.0), 300.0);
        assert_eq!(velocity, Vec2::new(0.0, -300.0));

        let diagonal = knockback_velocity(Vec2::new(10.0, 10.0), Vec2::new(13.0, 14.0), 5.0);
        assert!((diagonal - Vec2::new(3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_knockback_on_hitbox_center_still_pushes() {
        let velocity = knockback_velocity(Vec2::ONE, Vec2::ONE, 300.0);
        assert_eq!(velocity, Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_zero_speed_gives_no_knockback() {
        let velocity = knockback_velocity(Vec2::ZERO, Vec2::X, 0.0);
        assert_eq!(velocity, Vec2::ZERO);
    }
}
