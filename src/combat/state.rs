//! Combat domain: boss state and the context routines run against.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::combat::phase::{Phase, PhaseMachine};
use crate::combat::resources::BossTuning;
use crate::combat::signals::Signals;

/// Snapshot of the boss the encounter logic reasons about.
///
/// `health == 0` exactly when `is_dead`; `phase` never decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BossState {
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) phase: Phase,
    pub(crate) is_attacking: bool,
    pub(crate) is_invulnerable: bool,
    pub(crate) is_stunned: bool,
    pub(crate) is_dead: bool,
    /// Blink state while invulnerable, true otherwise
    pub(crate) is_visible: bool,
}

impl BossState {
    pub fn new(max_health: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            phase: Phase::One,
            is_attacking: false,
            is_invulnerable: false,
            is_stunned: false,
            is_dead: false,
            is_visible: true,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn is_invulnerable(&self) -> bool {
        self.is_invulnerable
    }

    pub fn is_stunned(&self) -> bool {
        self.is_stunned
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }
}

/// Enabled flags of the boss's damage volumes. Owned by the running attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hitboxes {
    pub melee: bool,
    pub area: bool,
}

impl Hitboxes {
    pub fn any_enabled(&self) -> bool {
        self.melee || self.area
    }

    pub fn disable_all(&mut self) {
        self.melee = false;
        self.area = false;
    }
}

/// Everything a routine may touch while it runs, borrowed from the controller.
pub struct CombatCx<'a> {
    pub state: &'a mut BossState,
    pub hitboxes: &'a mut Hitboxes,
    pub signals: &'a mut Signals,
    pub rng: &'a mut ChaCha8Rng,
    pub tuning: &'a BossTuning,
    pub phases: &'a PhaseMachine,
    pub position: Vec2,
    pub target: Option<Vec2>,
}

impl CombatCx<'_> {
    /// Vector from the boss to the target, zero when there is no target.
    pub fn aim(&self) -> Vec2 {
        self.target
            .map(|target| target - self.position)
            .unwrap_or(Vec2::ZERO)
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.target.map(|target| target.distance(self.position))
    }
}
