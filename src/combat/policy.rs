//! Combat domain: attack selection and phase scaling.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::patterns::ProjectilePattern;
use crate::combat::phase::{Phase, PhaseModifiers};
use crate::combat::resources::BossTuning;
use crate::combat::signals::AnimationTrigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AttackKind {
    Melee,
    Ranged,
    AreaSlam,
}

impl AttackKind {
    pub const ALL: [AttackKind; 3] = [AttackKind::Melee, AttackKind::Ranged, AttackKind::AreaSlam];

    pub fn trigger(self) -> AnimationTrigger {
        match self {
            AttackKind::Melee => AnimationTrigger::AttackHeavy,
            AttackKind::Ranged => AnimationTrigger::AttackShoot,
            AttackKind::AreaSlam => AnimationTrigger::AttackStomp,
        }
    }
}

/// Relative selection weights. They need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AttackWeights {
    pub melee: f32,
    pub ranged: f32,
    pub area_slam: f32,
}

impl AttackWeights {
    pub fn new(melee: f32, ranged: f32, area_slam: f32) -> Self {
        Self {
            melee,
            ranged,
            area_slam,
        }
    }

    pub fn uniform() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn weight(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Melee => self.melee,
            AttackKind::Ranged => self.ranged,
            AttackKind::AreaSlam => self.area_slam,
        }
    }

    pub fn total(&self) -> f32 {
        self.melee + self.ranged + self.area_slam
    }

    pub fn probability(&self, kind: AttackKind) -> f32 {
        self.weight(kind) / self.total()
    }

    pub fn is_valid(&self) -> bool {
        let usable = |kind: AttackKind| self.weight(kind).is_finite() && self.weight(kind) >= 0.0;
        AttackKind::ALL.into_iter().all(usable) && self.total() > 0.0
    }

    /// Maps a uniform roll in `[0, 1)` onto an attack.
    pub fn pick(&self, roll: f32) -> AttackKind {
        let mut remaining = roll.clamp(0.0, 1.0) * self.total();
        let mut fallback = AttackKind::Melee;
        for kind in AttackKind::ALL {
            let weight = self.weight(kind);
            if weight <= 0.0 {
                continue;
            }
            if remaining < weight {
                return kind;
            }
            remaining -= weight;
            fallback = kind;
        }
        // Only reachable through float slack at roll ~= 1.0
        fallback
    }
}

/// Chooses the next attack for the phase from one uniform draw.
pub fn choose_attack(modifiers: &PhaseModifiers, rng: &mut impl Rng) -> AttackKind {
    modifiers.weights.pick(rng.random::<f32>())
}

/// Projectiles released during an attack's active window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volley {
    pub pattern: ProjectilePattern,
    pub count: u32,
    pub speed: f32,
    pub homing: bool,
}

/// One attack with every phase multiplier already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackPlan {
    pub kind: AttackKind,
    pub phase: Phase,
    pub telegraph: Duration,
    pub active: Duration,
    pub recover: Duration,
    pub cooldown: Duration,
    pub volley: Option<Volley>,
}

impl AttackPlan {
    /// Builds the plan for `kind` in `phase`. Ranged attacks draw their
    /// pattern from `rng` (spiral or full circle, even odds).
    pub fn new(kind: AttackKind, phase: Phase, tuning: &BossTuning, rng: &mut impl Rng) -> Self {
        let modifiers = tuning.phases.get(phase);
        let profile = tuning.attacks.get(kind);
        let projectile_speed = tuning.projectiles.speed * modifiers.projectile_speed;

        let volley = match kind {
            AttackKind::Melee => None,
            AttackKind::Ranged => {
                let pattern = if rng.random_bool(0.5) {
                    ProjectilePattern::Spiral
                } else {
                    ProjectilePattern::FullCircle
                };
                Some(Volley {
                    pattern,
                    count: modifiers.projectile_count,
                    speed: projectile_speed,
                    homing: modifiers.homing_projectiles,
                })
            }
            AttackKind::AreaSlam => modifiers.radial_slam.then_some(Volley {
                pattern: ProjectilePattern::RadialBurst,
                count: modifiers.projectile_count,
                speed: projectile_speed,
                homing: false,
            }),
        };

        let base_cooldown = Duration::from_millis(profile.cooldown_ms);
        let mut active = Duration::from_millis(profile.active_ms);
        if let Some(volley) = &volley {
            let span = volley.pattern.span(volley.count, &tuning.pattern_layout());
            active = active.max(span);
        }

        Self {
            kind,
            phase,
            telegraph: Duration::from_millis(profile.telegraph_ms),
            active,
            recover: Duration::from_millis(profile.recover_ms),
            cooldown: scale(base_cooldown, modifiers.cooldown),
            volley,
        }
    }
}

/// `base * factor`, saturating at `Duration::MAX`.
fn scale(base: Duration, factor: f32) -> Duration {
    let secs = base.as_secs_f32() * factor.max(0.0);
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::MAX)
}

/// Approach speed in `phase`.
pub fn move_speed(tuning: &BossTuning, phase: Phase) -> f32 {
    tuning.move_speed * tuning.phases.get(phase).move_speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::combat::phase::PhaseTable;

    #[test]
    fn test_pick_covers_weight_ranges() {
        let weights = AttackWeights::new(0.25, 0.50, 0.25);
        assert_eq!(weights.pick(0.0), AttackKind::Melee);
        assert_eq!(weights.pick(0.24), AttackKind::Melee);
        assert_eq!(weights.pick(0.25), AttackKind::Ranged);
        assert_eq!(weights.pick(0.74), AttackKind::Ranged);
        assert_eq!(weights.pick(0.75), AttackKind::AreaSlam);
        assert_eq!(weights.pick(1.0), AttackKind::AreaSlam);
    }

    #[test]
    fn test_zero_weight_is_never_picked() {
        let weights = AttackWeights::new(0.0, 1.0, 0.0);
        for i in 0..100 {
            assert_eq!(weights.pick(i as f32 / 100.0), AttackKind::Ranged);
        }
    }

    #[test]
    fn test_choose_attack_distribution_follows_table() {
        let table = PhaseTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draws = 20_000;

        for (_, modifiers) in table.iter() {
            let mut counts = [0u32; 3];
            for _ in 0..draws {
                let index = match choose_attack(modifiers, &mut rng) {
                    AttackKind::Melee => 0,
                    AttackKind::Ranged => 1,
                    AttackKind::AreaSlam => 2,
                };
                counts[index] += 1;
            }
            for (i, kind) in AttackKind::ALL.into_iter().enumerate() {
                let observed = counts[i] as f32 / draws as f32;
                let expected = modifiers.weights.probability(kind);
                assert!(
                    (observed - expected).abs() < 0.02,
                    "{kind:?}: observed {observed}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn test_cooldown_scales_multiplicatively() {
        let tuning = BossTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let base = Duration::from_millis(tuning.attacks.melee.cooldown_ms);

        for phase in Phase::ALL {
            let plan = AttackPlan::new(AttackKind::Melee, phase, &tuning, &mut rng);
            let expected = base.mul_f32(tuning.phases.get(phase).cooldown);
            assert_eq!(plan.cooldown, expected);
            assert!(plan.volley.is_none());
        }
        assert_eq!(move_speed(&tuning, Phase::Three), tuning.move_speed * 1.6);
    }

    #[test]
    fn test_oversized_cooldown_multiplier_saturates() {
        let mut tuning = BossTuning::default();
        tuning.phases.one.cooldown = 1e30;
        assert!(tuning.validate().is_ok());

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let plan = AttackPlan::new(AttackKind::Melee, Phase::One, &tuning, &mut rng);
        assert_eq!(plan.cooldown, Duration::MAX);
    }

    #[test]
    fn test_ranged_volley_uses_phase_count() {
        let tuning = BossTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for (phase, count) in [(Phase::One, 8), (Phase::Two, 12), (Phase::Three, 16)] {
            let plan = AttackPlan::new(AttackKind::Ranged, phase, &tuning, &mut rng);
            let volley = plan.volley.expect("ranged attacks always fire a volley");
            assert_eq!(volley.count, count);
            assert_eq!(volley.homing, phase == Phase::Three);
            let span = volley.pattern.span(count, &tuning.pattern_layout());
            assert!(plan.active >= span);
        }
    }

    #[test]
    fn test_radial_slam_only_after_first_phase() {
        let tuning = BossTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let p1 = AttackPlan::new(AttackKind::AreaSlam, Phase::One, &tuning, &mut rng);
        assert!(p1.volley.is_none());

        let p2 = AttackPlan::new(AttackKind::AreaSlam, Phase::Two, &tuning, &mut rng);
        let volley = p2.volley.unwrap();
        assert_eq!(volley.pattern, ProjectilePattern::RadialBurst);
        assert_eq!(volley.count, 12);
    }
}
