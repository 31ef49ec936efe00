//! Combat domain: boss tuning resources and configuration errors.

use std::fmt;
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::patterns::PatternLayout;
use crate::combat::phase::{Phase, PhaseTable, PhaseThreshold, PhaseThresholds};
use crate::combat::policy::AttackKind;

pub const TUNING_SCHEMA_VERSION: u32 = 1;

/// Inclusive millisecond range used for randomized delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MsRange {
    pub min: u64,
    pub max: u64,
}

impl MsRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Roll a duration within range (inclusive)
    pub fn roll(&self, rng: &mut impl rand::Rng) -> Duration {
        if self.min >= self.max {
            return Duration::from_millis(self.min);
        }
        Duration::from_millis(rng.random_range(self.min..=self.max))
    }
}

/// Timing and damage of one attack kind, before phase scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttackProfile {
    pub telegraph_ms: u64,
    pub active_ms: u64,
    pub recover_ms: u64,
    pub cooldown_ms: u64,
    /// Contact damage; unused by ranged attacks (projectiles carry their own)
    pub damage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttackProfiles {
    /// Default: 500/200/150 ms, cooldown 1200 ms, 2 damage
    pub melee: AttackProfile,
    /// Default: 400/400/400 ms, cooldown 1600 ms
    pub ranged: AttackProfile,
    /// Default: 700/300/200 ms, cooldown 2000 ms, 3 damage
    pub area_slam: AttackProfile,
}

impl AttackProfiles {
    pub fn get(&self, kind: AttackKind) -> &AttackProfile {
        match kind {
            AttackKind::Melee => &self.melee,
            AttackKind::Ranged => &self.ranged,
            AttackKind::AreaSlam => &self.area_slam,
        }
    }
}

impl Default for AttackProfiles {
    fn default() -> Self {
        Self {
            melee: AttackProfile {
                telegraph_ms: 500,
                active_ms: 200,
                recover_ms: 150,
                cooldown_ms: 1200,
                damage: 2,
            },
            ranged: AttackProfile {
                telegraph_ms: 400,
                active_ms: 400,
                recover_ms: 400,
                cooldown_ms: 1600,
                damage: 0,
            },
            area_slam: AttackProfile {
                telegraph_ms: 700,
                active_ms: 300,
                recover_ms: 200,
                cooldown_ms: 2000,
                damage: 3,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ProjectileTuning {
    /// Base speed in pixels per second (default: 220)
    pub speed: f32,
    pub damage: u32,
    pub lifetime_ms: u64,
    /// Angular step between spiral projectiles (default: 12)
    pub spiral_step_degrees: f32,
    pub spiral_interval_ms: u64,
    /// Sub-bursts of a full circle volley (default: 1)
    pub full_circle_bursts: u32,
    pub burst_interval_ms: u64,
    /// Homing projectiles fly straight for this long first
    pub homing_delay_ms: u64,
    /// Direction lerp factor per second while homing
    pub homing_turn_rate: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 220.0,
            damage: 1,
            lifetime_ms: 4000,
            spiral_step_degrees: 12.0,
            spiral_interval_ms: 30,
            full_circle_bursts: 1,
            burst_interval_ms: 120,
            homing_delay_ms: 300,
            homing_turn_rate: 2.0,
        }
    }
}

/// Everything needed to build a boss controller. Loaded from
/// `assets/data/boss_tuning.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BossTuning {
    pub schema_version: u32,
    pub max_health: u32,
    pub invulnerability_ms: u64,
    pub blink_interval_ms: u64,
    /// Delay between death and encounter conclusion
    pub death_grace_ms: u64,
    pub move_speed: f32,
    /// Approach ends early once the target is this close
    pub engage_distance: f32,
    pub approach_ms: MsRange,
    pub phase_thresholds: Vec<PhaseThreshold>,
    pub phases: PhaseTable,
    pub attacks: AttackProfiles,
    pub projectiles: ProjectileTuning,
    /// Speed a contact hitbox pushes its target away with
    pub knockback_speed: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            schema_version: TUNING_SCHEMA_VERSION,
            max_health: 300,
            invulnerability_ms: 600,
            blink_interval_ms: 100,
            death_grace_ms: 1500,
            move_speed: 90.0,
            engage_distance: 64.0,
            approach_ms: MsRange::new(1000, 2000),
            phase_thresholds: PhaseThresholds::default().iter().copied().collect(),
            phases: PhaseTable::default(),
            attacks: AttackProfiles::default(),
            projectiles: ProjectileTuning::default(),
            knockback_speed: 300.0,
        }
    }
}

impl BossTuning {
    pub fn invulnerability(&self) -> Duration {
        Duration::from_millis(self.invulnerability_ms)
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }

    pub fn death_grace(&self) -> Duration {
        Duration::from_millis(self.death_grace_ms)
    }

    pub fn projectile_lifetime(&self) -> Duration {
        Duration::from_millis(self.projectiles.lifetime_ms)
    }

    pub fn pattern_layout(&self) -> PatternLayout {
        PatternLayout::from_tuning(&self.projectiles)
    }

    /// Checks every field the controller relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        if self.blink_interval_ms == 0 {
            return Err(ConfigError::ZeroBlinkInterval);
        }
        if self.approach_ms.min > self.approach_ms.max {
            return Err(ConfigError::InvalidRange("approach_ms"));
        }
        let turn_rate = self.projectiles.homing_turn_rate;
        let speeds = [
            ("move_speed", self.move_speed),
            ("projectiles.speed", self.projectiles.speed),
            ("projectiles.homing_turn_rate", turn_rate),
            ("knockback_speed", self.knockback_speed),
        ];
        for (field, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue(field));
            }
        }
        if !self.engage_distance.is_finite() || self.engage_distance < 0.0 {
            return Err(ConfigError::InvalidValue("engage_distance"));
        }
        PhaseThresholds::new(self.phase_thresholds.clone())?;
        self.phases.validate()
    }
}

/// Player swing parameters.
#[derive(Resource, Debug, Clone)]
pub struct PlayerAttackTuning {
    pub damage: u32,
    /// Seconds the swing hitbox stays live
    pub duration: f32,
    /// Seconds between swing starts
    pub cooldown: f32,
    /// Hitbox center distance from the player, along the aim
    pub hitbox_offset: f32,
    pub hitbox_size: f32,
}

impl Default for PlayerAttackTuning {
    fn default() -> Self {
        Self {
            damage: 10,
            duration: 0.15,
            cooldown: 0.3,
            hitbox_offset: 28.0,
            hitbox_size: 28.0,
        }
    }
}

/// Attack input for the current frame.
#[derive(Resource, Debug, Default)]
pub struct CombatInput {
    pub attack: bool,
}

/// Inconsistent boss configuration. Fatal for the boss being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroMaxHealth,
    ZeroBlinkInterval,
    NoPhaseThresholds,
    ThresholdOutOfRange {
        health_percent: u32,
    },
    ThresholdsNotDescending,
    /// Thresholds must target later phases, in ascending order
    ThresholdPhaseOrder,
    InvalidWeights(Phase),
    InvalidMultiplier {
        phase: Phase,
        field: &'static str,
    },
    ZeroProjectileCount(Phase),
    /// Both carry the offending field name
    InvalidRange(&'static str),
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMaxHealth => write!(f, "max_health must be positive"),
            ConfigError::ZeroBlinkInterval => write!(f, "blink_interval_ms must be positive"),
            ConfigError::NoPhaseThresholds => write!(f, "phase_thresholds is empty"),
            ConfigError::ThresholdOutOfRange { health_percent } => {
                write!(f, "phase threshold {}% is outside 1..=100", health_percent)
            }
            ConfigError::ThresholdsNotDescending => {
                write!(f, "phase thresholds must be strictly descending")
            }
            ConfigError::ThresholdPhaseOrder => {
                write!(f, "phase thresholds must target later phases in order")
            }
            ConfigError::InvalidWeights(phase) => {
                write!(f, "attack weights for {} are negative or all zero", phase)
            }
            ConfigError::InvalidMultiplier { phase, field } => {
                write!(f, "{} multiplier `{}` must be positive", phase, field)
            }
            ConfigError::ZeroProjectileCount(phase) => {
                write!(f, "projectile_count for {} must be positive", phase)
            }
            ConfigError::InvalidRange(field) => {
                write!(f, "range `{}` has min greater than max", field)
            }
            ConfigError::InvalidValue(field) => {
                write!(f, "`{}` must be finite and non-negative", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
