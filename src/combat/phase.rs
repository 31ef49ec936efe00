//! Combat domain: boss phases, health thresholds and per-phase modifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::policy::AttackWeights;
use crate::combat::resources::ConfigError;
use crate::combat::signals::AnimationTrigger;

/// Encounter phase. Ordering follows escalation: `One < Two < Three`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize,
)]
pub enum Phase {
    #[default]
    One,
    Two,
    Three,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::One, Phase::Two, Phase::Three];

    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
            Phase::Three => 3,
        }
    }

    /// Animation trigger fired when the encounter enters this phase.
    pub fn trigger(self) -> Option<AnimationTrigger> {
        match self {
            Phase::One => None,
            Phase::Two => Some(AnimationTrigger::Phase2),
            Phase::Three => Some(AnimationTrigger::Phase3),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// Escalate to `phase` once health is at or below `health_percent` of max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhaseThreshold {
    pub health_percent: u32,
    pub phase: Phase,
}

impl PhaseThreshold {
    pub fn new(health_percent: u32, phase: Phase) -> Self {
        Self {
            health_percent,
            phase,
        }
    }

    /// Integer comparison so that `health == percent * max / 100` counts as crossed.
    pub fn is_crossed(&self, health: u32, max_health: u32) -> bool {
        u64::from(health) * 100 <= u64::from(self.health_percent) * u64::from(max_health)
    }
}

/// Validated, strictly descending list of thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseThresholds(Vec<PhaseThreshold>);

impl PhaseThresholds {
    pub fn new(thresholds: Vec<PhaseThreshold>) -> Result<Self, ConfigError> {
        if thresholds.is_empty() {
            return Err(ConfigError::NoPhaseThresholds);
        }
        for threshold in &thresholds {
            if threshold.health_percent == 0 || threshold.health_percent > 100 {
                return Err(ConfigError::ThresholdOutOfRange {
                    health_percent: threshold.health_percent,
                });
            }
            if threshold.phase == Phase::One {
                return Err(ConfigError::ThresholdPhaseOrder);
            }
        }
        for pair in thresholds.windows(2) {
            if pair[1].health_percent >= pair[0].health_percent {
                return Err(ConfigError::ThresholdsNotDescending);
            }
            if pair[1].phase <= pair[0].phase {
                return Err(ConfigError::ThresholdPhaseOrder);
            }
        }
        Ok(Self(thresholds))
    }

    /// Deepest phase whose threshold the given health has crossed.
    pub fn phase_for(&self, health: u32, max_health: u32) -> Phase {
        self.0
            .iter()
            .filter(|t| t.is_crossed(health, max_health))
            .map(|t| t.phase)
            .max()
            .unwrap_or(Phase::One)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseThreshold> {
        self.0.iter()
    }
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self(vec![
            PhaseThreshold::new(70, Phase::Two),
            PhaseThreshold::new(30, Phase::Three),
        ])
    }
}

/// Per-phase scaling. Multipliers apply to the base tuning values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PhaseModifiers {
    pub move_speed: f32,
    pub cooldown: f32,
    pub projectile_count: u32,
    pub projectile_speed: f32,
    pub weights: AttackWeights,
    /// Ranged volleys steer toward the target
    pub homing_projectiles: bool,
    /// Area slams also release a radial burst
    pub radial_slam: bool,
}

/// Lookup table of modifiers keyed by phase.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PhaseTable {
    pub one: PhaseModifiers,
    pub two: PhaseModifiers,
    pub three: PhaseModifiers,
}

impl PhaseTable {
    pub fn get(&self, phase: Phase) -> &PhaseModifiers {
        match phase {
            Phase::One => &self.one,
            Phase::Two => &self.two,
            Phase::Three => &self.three,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, &PhaseModifiers)> {
        Phase::ALL
            .into_iter()
            .map(move |phase| (phase, self.get(phase)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (phase, modifiers) in self.iter() {
            let multipliers = [
                ("move_speed", modifiers.move_speed),
                ("cooldown", modifiers.cooldown),
                ("projectile_speed", modifiers.projectile_speed),
            ];
            for (field, value) in multipliers {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::InvalidMultiplier { phase, field });
                }
            }
            if modifiers.projectile_count == 0 {
                return Err(ConfigError::ZeroProjectileCount(phase));
            }
            if !modifiers.weights.is_valid() {
                return Err(ConfigError::InvalidWeights(phase));
            }
        }
        Ok(())
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self {
            one: PhaseModifiers {
                move_speed: 1.0,
                cooldown: 1.0,
                projectile_count: 8,
                projectile_speed: 1.0,
                weights: AttackWeights::uniform(),
                homing_projectiles: false,
                radial_slam: false,
            },
            two: PhaseModifiers {
                move_speed: 1.3,
                cooldown: 0.8,
                projectile_count: 12,
                projectile_speed: 1.15,
                weights: AttackWeights::new(0.25, 0.50, 0.25),
                homing_projectiles: false,
                radial_slam: true,
            },
            three: PhaseModifiers {
                move_speed: 1.6,
                cooldown: 0.6,
                projectile_count: 16,
                projectile_speed: 1.3,
                weights: AttackWeights::new(0.30, 0.30, 0.40),
                homing_projectiles: true,
                radial_slam: true,
            },
        }
    }
}

/// Phase state machine: decides transitions from health and never goes back.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    thresholds: PhaseThresholds,
    table: PhaseTable,
}

impl PhaseMachine {
    pub fn new(thresholds: PhaseThresholds, table: PhaseTable) -> Result<Self, ConfigError> {
        table.validate()?;
        Ok(Self { thresholds, table })
    }

    pub fn modifiers(&self, phase: Phase) -> &PhaseModifiers {
        self.table.get(phase)
    }

    /// Phase to move to after health changed, if it is later than `current`.
    pub fn escalation(&self, current: Phase, health: u32, max_health: u32) -> Option<Phase> {
        let target = self.thresholds.phase_for(health, max_health);
        (target > current).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_thresholds_are_rejected() {
        assert_eq!(
            PhaseThresholds::new(Vec::new()),
            Err(ConfigError::NoPhaseThresholds)
        );
    }

    #[test]
    fn test_thresholds_must_descend() {
        let result = PhaseThresholds::new(vec![
            PhaseThreshold::new(30, Phase::Two),
            PhaseThreshold::new(70, Phase::Three),
        ]);
        assert_eq!(result, Err(ConfigError::ThresholdsNotDescending));

        let result = PhaseThresholds::new(vec![
            PhaseThreshold::new(70, Phase::Three),
            PhaseThreshold::new(30, Phase::Two),
        ]);
        assert_eq!(result, Err(ConfigError::ThresholdPhaseOrder));
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let thresholds = PhaseThresholds::default();
        assert_eq!(thresholds.phase_for(211, 300), Phase::One);
        assert_eq!(thresholds.phase_for(210, 300), Phase::Two);
        assert_eq!(thresholds.phase_for(91, 300), Phase::Two);
        assert_eq!(thresholds.phase_for(90, 300), Phase::Three);
        assert_eq!(thresholds.phase_for(0, 300), Phase::Three);
    }

    #[test]
    fn test_escalation_never_reverts() {
        let thresholds = PhaseThresholds::default();
        let machine = PhaseMachine::new(thresholds, PhaseTable::default()).unwrap();
        assert_eq!(machine.escalation(Phase::One, 200, 300), Some(Phase::Two));
        assert_eq!(machine.escalation(Phase::Three, 299, 300), None);
        assert_eq!(machine.escalation(Phase::Two, 150, 300), None);
        // A single large hit skips straight to the deepest crossed phase
        assert_eq!(machine.escalation(Phase::One, 10, 300), Some(Phase::Three));
    }

    #[test]
    fn test_default_table_matches_phase_scaling() {
        let table = PhaseTable::default();
        let expected = [
            (Phase::One, 1.0, 1.0, 8),
            (Phase::Two, 1.3, 0.8, 12),
            (Phase::Three, 1.6, 0.6, 16),
        ];
        for (phase, speed, cooldown, count) in expected {
            let modifiers = table.get(phase);
            assert_eq!(modifiers.move_speed, speed);
            assert_eq!(modifiers.cooldown, cooldown);
            assert_eq!(modifiers.projectile_count, count);
        }
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_table_rejects_zero_multiplier() {
        let mut table = PhaseTable::default();
        table.two.cooldown = 0.0;
        let expected = ConfigError::InvalidMultiplier {
            phase: Phase::Two,
            field: "cooldown",
        };
        assert_eq!(table.validate(), Err(expected));
    }
}
