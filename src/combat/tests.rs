//! Combat domain: scenario tests for the boss controller.

use std::time::Duration;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    ATTACK_LOOP, AnimationCue, AnimationTrigger, AttackKind, AttackStage, BossController,
    BossNotice, BossTuning, ConfigError, DEATH_GRACE, INVULNERABILITY, Phase, PhaseThreshold,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn controller() -> BossController {
    BossController::new(BossTuning::default(), 42).unwrap()
}

fn stage(boss: &BossController) -> Option<AttackStage> {
    boss.current_attack().map(|(_, stage)| stage)
}

/// Advances the boss standing at the origin with no target.
fn idle(boss: &mut BossController, duration: Duration) {
    boss.tick(duration, Vec2::ZERO, None);
}

#[test]
fn test_new_boss_starts_full_in_phase_one() {
    let mut boss = controller();
    assert_eq!(boss.health(), 300);
    assert_eq!(boss.phase(), Phase::One);
    assert!(boss.is_running(ATTACK_LOOP));

    let signals = boss.drain_signals();
    let full = BossNotice::HealthChanged {
        health: 300,
        max_health: 300,
    };
    assert_eq!(signals.notices, vec![full]);
}

#[test]
fn test_invalid_tuning_fails_construction() {
    let tuning = BossTuning {
        phase_thresholds: Vec::new(),
        ..Default::default()
    };
    assert_eq!(
        BossController::new(tuning, 1).unwrap_err(),
        ConfigError::NoPhaseThresholds
    );

    let tuning = BossTuning {
        phase_thresholds: vec![
            PhaseThreshold::new(30, Phase::Three),
            PhaseThreshold::new(70, Phase::Two),
        ],
        ..Default::default()
    };
    assert!(BossController::new(tuning, 1).is_err());
}

#[test]
fn test_ninety_damage_enters_phase_two() {
    let mut boss = controller();
    boss.drain_signals();

    let result = boss.apply_damage(90);
    assert!(result.accepted);
    assert_eq!(result.new_health, 210);
    assert_eq!(result.phase, Phase::Two);
    assert!(result.phase_changed);
    assert!(!result.died);

    // The transition hit does not open an invulnerability window
    assert!(!boss.state().is_invulnerable());
    assert!(!boss.is_running(INVULNERABILITY));
    assert!(boss.is_running(ATTACK_LOOP));

    let signals = boss.drain_signals();
    assert!(signals.triggers().any(|t| t == AnimationTrigger::Phase2));
    let entered = BossNotice::PhaseChanged(Phase::Two);
    let health = BossNotice::HealthChanged {
        health: 210,
        max_health: 300,
    };
    assert!(signals.notices.contains(&entered));
    assert!(signals.notices.contains(&health));
}

#[test]
fn test_thirty_percent_forces_phase_three_once() {
    let mut boss = controller();
    assert!(boss.apply_damage(90).phase_changed);

    let result = boss.apply_damage(119);
    assert_eq!(result.new_health, 91);
    assert_eq!(result.phase, Phase::Two);
    assert!(!result.phase_changed);
    assert!(boss.state().is_invulnerable());

    idle(&mut boss, ms(600));
    let result = boss.apply_damage(1);
    assert!(result.accepted);
    assert_eq!(result.new_health, 90);
    assert_eq!(result.phase, Phase::Three);
    assert!(result.phase_changed);

    let result = boss.apply_damage(1);
    assert!(result.accepted);
    assert_eq!(result.new_health, 89);
    assert_eq!(result.phase, Phase::Three);
    assert!(!result.phase_changed);
}

#[test]
fn test_single_hit_skips_to_deepest_phase() {
    let mut boss = controller();
    boss.drain_signals();

    let result = boss.apply_damage(250);
    assert_eq!(result.phase, Phase::Three);
    assert!(result.phase_changed);

    let signals = boss.drain_signals();
    let phase_notices: Vec<_> = signals
        .notices
        .iter()
        .filter(|n| matches!(n, BossNotice::PhaseChanged(_)))
        .collect();
    assert_eq!(phase_notices, vec![&BossNotice::PhaseChanged(Phase::Three)]);
}

#[test]
fn test_phase_three_loop_uses_phase_three_volleys() {
    let mut boss = controller();
    boss.apply_damage(250);
    boss.drain_signals();

    assert!(boss.force_attack(AttackKind::Ranged));
    // Telegraph 400 ms plus the longest possible active window
    let origin = Vec2::new(100.0, 50.0);
    boss.tick(ms(900), origin, Some(Vec2::new(300.0, 50.0)));

    let signals = boss.drain_signals();
    assert_eq!(signals.projectiles.len(), 16);
    for spec in &signals.projectiles {
        assert!(spec.homing);
        assert_eq!(spec.position, origin);
        assert!((spec.speed - 220.0 * 1.3).abs() < 1e-3);
    }
    // First projectile points at the target
    assert!((signals.projectiles[0].direction - Vec2::X).length() < 1e-4);
}

#[test]
fn test_lethal_hit_kills_and_later_hits_are_rejected() {
    let tuning = BossTuning {
        max_health: 50,
        ..Default::default()
    };
    let mut boss = BossController::new(tuning, 7).unwrap();
    boss.drain_signals();

    let result = boss.apply_damage(1000);
    assert!(result.accepted);
    assert!(result.died);
    assert_eq!(result.new_health, 0);
    assert!(!boss.is_alive());
    assert!(boss.state().is_dead());

    let later = boss.apply_damage(5);
    assert!(!later.accepted);
    assert_eq!(later.new_health, 0);

    let signals = boss.drain_signals();
    assert!(signals.triggers().any(|t| t == AnimationTrigger::Die));
    assert!(signals.notices.contains(&BossNotice::Died));
    assert!(!boss.is_running(ATTACK_LOOP));
    assert!(boss.is_running(DEATH_GRACE));
}

#[test]
fn test_encounter_concludes_after_grace_delay() {
    let mut boss = controller();
    boss.apply_damage(300);
    boss.drain_signals();

    boss.tick(ms(1499), Vec2::ZERO, Some(Vec2::new(50.0, 0.0)));
    assert!(!boss.is_concluded());
    assert!(boss.motion().is_still());
    let notices = boss.drain_signals().notices;
    assert!(!notices.contains(&BossNotice::Concluded));

    idle(&mut boss, ms(1));
    assert!(boss.is_concluded());
    let notices = boss.drain_signals().notices;
    assert!(notices.contains(&BossNotice::Concluded));
}

#[test]
fn test_invulnerability_window_boundary() {
    let mut boss = controller();
    assert!(boss.apply_damage(10).accepted);
    assert!(boss.state().is_invulnerable());

    idle(&mut boss, ms(599));
    assert!(!boss.apply_damage(5).accepted);
    assert_eq!(boss.health(), 290);

    idle(&mut boss, ms(1));
    assert!(!boss.state().is_invulnerable());
    assert!(boss.state().is_visible());
    assert!(boss.apply_damage(5).accepted);
    assert_eq!(boss.health(), 285);

    // A fresh hit restarts the window
    idle(&mut boss, ms(300));
    assert!(!boss.apply_damage(5).accepted);
}

#[test]
fn test_invulnerability_blinks_sprite() {
    let mut boss = controller();
    boss.apply_damage(10);
    assert!(!boss.state().is_visible());

    idle(&mut boss, ms(150));
    assert!(boss.state().is_visible());
    idle(&mut boss, ms(100));
    assert!(!boss.state().is_visible());
    idle(&mut boss, ms(350));
    assert!(boss.state().is_visible());
}

#[test]
fn test_zero_damage_is_rejected() {
    let mut boss = controller();
    let result = boss.apply_damage(0);
    assert!(!result.accepted);
    assert_eq!(result.new_health, 300);
    assert!(!boss.state().is_invulnerable());
}

#[test]
fn test_phase_change_mid_attack_disables_hitboxes() {
    let mut boss = controller();
    assert!(boss.force_attack(AttackKind::Melee));
    idle(&mut boss, ms(500));
    assert_eq!(
        boss.current_attack(),
        Some((AttackKind::Melee, AttackStage::Active))
    );
    assert!(boss.hitboxes().melee);

    assert!(boss.apply_damage(90).phase_changed);
    assert!(!boss.hitboxes().any_enabled());
    assert!(!boss.state().is_attacking());
    assert_eq!(boss.current_attack(), None);

    idle(&mut boss, ms(16));
    assert!(!boss.hitboxes().any_enabled());
}

#[test]
fn test_death_mid_slam_disables_hitboxes() {
    let mut boss = controller();
    assert!(boss.force_attack(AttackKind::AreaSlam));
    idle(&mut boss, ms(700));
    assert!(boss.hitboxes().area);

    assert!(boss.apply_damage(1000).died);
    assert!(!boss.hitboxes().any_enabled());
    assert!(!boss.state().is_attacking());

    idle(&mut boss, ms(16));
    assert!(!boss.hitboxes().any_enabled());
}

#[test]
fn test_damage_during_active_window_keeps_attack_running() {
    let mut boss = controller();
    boss.force_attack(AttackKind::Melee);
    idle(&mut boss, ms(550));

    assert!(boss.apply_damage(10).accepted);
    assert_eq!(
        boss.current_attack(),
        Some((AttackKind::Melee, AttackStage::Active))
    );
    assert!(boss.hitboxes().melee);
}

#[test]
fn test_attack_stages_run_in_order() {
    let mut boss = controller();
    assert!(boss.force_attack(AttackKind::Melee));
    assert!(boss.state().is_attacking());
    assert_eq!(
        boss.current_attack(),
        Some((AttackKind::Melee, AttackStage::Telegraph))
    );
    assert!(!boss.hitboxes().melee);

    idle(&mut boss, ms(500));
    assert_eq!(stage(&boss), Some(AttackStage::Active));

    idle(&mut boss, ms(200));
    assert_eq!(stage(&boss), Some(AttackStage::Recover));
    assert!(!boss.hitboxes().melee);
    assert!(boss.state().is_attacking());

    idle(&mut boss, ms(150));
    assert_eq!(stage(&boss), Some(AttackStage::Cooldown));
    assert!(!boss.state().is_attacking());
}

#[test]
fn test_attack_rejected_while_one_is_in_flight() {
    let mut boss = controller();
    assert!(boss.force_attack(AttackKind::Melee));
    assert!(!boss.force_attack(AttackKind::Ranged));

    // Through telegraph, active and recover into the cooldown
    idle(&mut boss, ms(850));
    assert_eq!(stage(&boss), Some(AttackStage::Cooldown));
    assert!(!boss.force_attack(AttackKind::Ranged));

    idle(&mut boss, ms(1300));
    assert_eq!(boss.current_attack(), None);
    assert!(boss.force_attack(AttackKind::Ranged));
}

#[test]
fn test_leftover_time_carries_across_stages() {
    let mut boss = controller();
    boss.force_attack(AttackKind::Melee);
    // 500 telegraph + 200 active + 100 into recovery
    idle(&mut boss, ms(800));
    assert_eq!(stage(&boss), Some(AttackStage::Recover));
    idle(&mut boss, ms(50));
    assert_eq!(stage(&boss), Some(AttackStage::Cooldown));
}

#[test]
fn test_stun_rules_follow_attack_stage() {
    let mut boss = controller();
    boss.force_attack(AttackKind::Melee);
    idle(&mut boss, ms(500));

    // Active window: rejected
    assert!(!boss.stun(ms(1000)));
    assert!(!boss.state().is_stunned());

    // Recovery: cancels the attack
    idle(&mut boss, ms(200));
    assert!(boss.stun(ms(1000)));
    assert!(boss.state().is_stunned());
    assert_eq!(boss.current_attack(), None);
    assert!(!boss.state().is_attacking());
    assert!(!boss.force_attack(AttackKind::Melee));

    boss.tick(ms(999), Vec2::ZERO, Some(Vec2::new(500.0, 0.0)));
    assert!(boss.state().is_stunned());
    assert!(boss.motion().is_still());

    idle(&mut boss, ms(1));
    assert!(!boss.state().is_stunned());
    assert!(boss.force_attack(AttackKind::Melee));
}

#[test]
fn test_stun_during_cooldown_pauses_it() {
    let mut boss = controller();
    boss.force_attack(AttackKind::Melee);
    idle(&mut boss, ms(900));
    assert_eq!(stage(&boss), Some(AttackStage::Cooldown));

    assert!(boss.stun(ms(500)));
    idle(&mut boss, ms(2000));
    // 500 ms stunned, then the remaining ~1150 ms of cooldown
    assert!(!boss.state().is_stunned());
    assert_eq!(boss.current_attack(), None);
}

#[test]
fn test_dead_boss_cannot_be_stunned_or_attack() {
    let mut boss = controller();
    boss.apply_damage(300);
    assert!(!boss.stun(ms(100)));
    assert!(!boss.force_attack(AttackKind::Melee));
}

#[test]
fn test_boss_approaches_then_attacks() {
    let mut boss = controller();
    let target = Some(Vec2::new(500.0, 0.0));

    boss.tick(ms(16), Vec2::ZERO, target);
    let motion = boss.motion();
    assert!((motion.direction - Vec2::X).length() < 1e-4);
    assert_eq!(motion.speed, 90.0);
    let signals = boss.drain_signals();
    assert!(signals.cues.contains(&AnimationCue::Moving(true)));
    assert!(signals.cues.contains(&AnimationCue::Facing(Vec2::X)));

    let mut attacked = false;
    for _ in 0..130 {
        boss.tick(ms(16), Vec2::ZERO, target);
        if let Some((_, AttackStage::Telegraph)) = boss.current_attack() {
            attacked = true;
            assert!(boss.motion().is_still());
            break;
        }
    }
    assert!(attacked, "approach is bounded by its 2 s upper limit");
}

#[test]
fn test_target_in_range_ends_approach_early() {
    let mut boss = controller();
    boss.tick(ms(16), Vec2::ZERO, Some(Vec2::new(10.0, 0.0)));
    assert!(boss.current_attack().is_some());
}

#[test]
fn test_missing_target_idles() {
    let mut boss = controller();
    for _ in 0..300 {
        idle(&mut boss, ms(16));
        assert!(boss.motion().is_still());
        assert_eq!(boss.current_attack(), None);
    }
    let signals = boss.drain_signals();
    assert!(signals.cues.contains(&AnimationCue::Moving(false)));
}

#[test]
fn test_random_fights_keep_invariants() {
    for seed in 0..40 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut boss = BossController::new(BossTuning::default(), seed).unwrap();
        let mut last_health = boss.health();
        let mut last_phase = boss.phase();

        for _ in 0..400 {
            if rng.random_bool(0.3) {
                let result = boss.apply_damage(rng.random_range(0..40));
                if result.accepted {
                    assert!(result.new_health < last_health);
                }
            }
            if rng.random_bool(0.05) {
                boss.stun(ms(rng.random_range(100..800)));
            }

            let x = rng.random_range(-300.0..300.0);
            let y = rng.random_range(-300.0..300.0);
            let target = Vec2::new(x, y);
            boss.tick(ms(rng.random_range(0..120)), Vec2::ZERO, Some(target));

            let state = boss.state();
            assert!(state.health() <= state.max_health());
            assert!(state.health() <= last_health);
            assert!(state.phase() >= last_phase);
            assert_eq!(state.health() == 0, state.is_dead());
            assert!(!(state.is_attacking() && state.is_dead()));
            if state.is_dead() {
                assert!(!boss.hitboxes().any_enabled());
            }
            if let Some((_, stage)) = boss.current_attack() {
                if boss.hitboxes().any_enabled() {
                    assert_eq!(stage, AttackStage::Active);
                }
                assert!(!(state.is_stunned() && stage == AttackStage::Active));
            }

            last_health = state.health();
            last_phase = state.phase();
            boss.drain_signals();
        }
    }
}
