//! Combat domain: the boss controller and the systems that drive it.

mod attack_loop;
mod components;
mod controller;
mod events;
mod executor;
mod health;
mod patterns;
mod phase;
mod policy;
mod projectiles;
mod resources;
mod scheduler;
mod signals;
mod spawn;
mod state;
mod systems;
#[cfg(test)]
mod tests;

pub use attack_loop::AttackLoop;
pub use components::{
    AnimationParams, Boss, BossBrain, BossHitbox, BossTarget, Combatant, Health, Invulnerable,
    PlayerHitbox, Team,
};
pub use controller::{ATTACK_LOOP, BossController, BossRoutine, DEATH_GRACE, INVULNERABILITY};
pub use events::{
    BossAnimationEvent, BossDefeatedEvent, BossHealthChangedEvent, BossPhaseChangeEvent,
    DamageEvent, EncounterConcludedEvent, ProjectileSpawnEvent,
};
pub use executor::{AttackExecutor, AttackStage};
pub use health::{DamageResult, HitOutcome, InvulnerabilityWindow};
pub use patterns::{
    PatternIter, PatternLayout, ProjectilePattern, ProjectileSpawnSpec, ShotParams, TimedSpawn,
    generate,
};
pub use phase::{Phase, PhaseMachine, PhaseModifiers, PhaseTable, PhaseThreshold, PhaseThresholds};
pub use policy::{AttackKind, AttackPlan, AttackWeights, Volley, choose_attack, move_speed};
pub use projectiles::{Homing, Projectile, steer};
pub use resources::{
    AttackProfile, AttackProfiles, BossTuning, CombatInput, ConfigError, MsRange,
    PlayerAttackTuning, ProjectileTuning, TUNING_SCHEMA_VERSION,
};
pub use scheduler::{Poll, Progress, Routine, Scheduler, Wait, WaitUntil};
pub use signals::{AnimationCue, AnimationTrigger, BossNotice, Motion, Signals};
pub use spawn::{spawn_boss, spawn_player_hitbox};
pub use state::{BossState, CombatCx, Hitboxes};
pub use systems::knockback_velocity;

use bevy::prelude::*;

use crate::combat::projectiles::{
    detect_projectile_hits, expire_projectiles, spawn_projectiles, steer_projectiles,
};
use crate::combat::systems::{
    apply_boss_damage, apply_damage, apply_knockback, detect_boss_hitbox_hits,
    detect_player_hitbox_hits, dispatch_boss_signals, read_combat_input, sync_boss_hitboxes,
    tick_boss_brains, update_invulnerability_timers, update_player_swings,
};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BossTuning>()
            .init_resource::<PlayerAttackTuning>()
            .init_resource::<CombatInput>()
            .add_message::<DamageEvent>()
            .add_message::<BossHealthChangedEvent>()
            .add_message::<BossPhaseChangeEvent>()
            .add_message::<BossDefeatedEvent>()
            .add_message::<EncounterConcludedEvent>()
            .add_message::<BossAnimationEvent>()
            .add_message::<ProjectileSpawnEvent>()
            .add_systems(
                Update,
                (
                    read_combat_input,
                    update_invulnerability_timers,
                    update_player_swings,
                    detect_player_hitbox_hits,
                    apply_boss_damage,
                    tick_boss_brains,
                    dispatch_boss_signals,
                    sync_boss_hitboxes,
                    detect_boss_hitbox_hits,
                    apply_damage,
                    apply_knockback,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    spawn_projectiles,
                    steer_projectiles,
                    expire_projectiles,
                    detect_projectile_hits,
                )
                    .chain()
                    .after(dispatch_boss_signals)
                    .before(apply_damage),
            );
    }
}
