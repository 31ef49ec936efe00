//! Combat domain: outputs the boss controller hands to its collaborators.
//!
//! The controller never talks to the mover, animator, projectile spawner or
//! UI directly. It queues [`Signals`] that the ECS layer drains every frame.

use bevy::prelude::*;

use crate::combat::patterns::ProjectileSpawnSpec;
use crate::combat::phase::Phase;

/// Desired movement for this tick; the external mover integrates position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    pub direction: Vec2,
    pub speed: f32,
}

impl Motion {
    pub const STILL: Motion = Motion {
        direction: Vec2::ZERO,
        speed: 0.0,
    };

    pub fn toward(direction: Vec2, speed: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            speed,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }

    pub fn is_still(&self) -> bool {
        self.speed <= 0.0 || self.direction == Vec2::ZERO
    }
}

/// Named animator triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    AttackHeavy,
    AttackShoot,
    AttackStomp,
    Phase2,
    Phase3,
    Stunned,
    Die,
}

impl AnimationTrigger {
    pub fn name(self) -> &'static str {
        match self {
            AnimationTrigger::AttackHeavy => "Attack_Heavy",
            AnimationTrigger::AttackShoot => "Attack_Shoot",
            AnimationTrigger::AttackStomp => "Attack_Stomp",
            AnimationTrigger::Phase2 => "Phase2",
            AnimationTrigger::Phase3 => "Phase3",
            AnimationTrigger::Stunned => "Stunned",
            AnimationTrigger::Die => "Die",
        }
    }
}

/// Fire-and-forget animation parameter updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCue {
    Trigger(AnimationTrigger),
    /// `IsMoving`
    Moving(bool),
    /// `MoveX` / `MoveY`
    Facing(Vec2),
}

/// Change notifications for UI and encounter listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossNotice {
    HealthChanged {
        health: u32,
        max_health: u32,
    },
    PhaseChanged(Phase),
    Died,
    /// The post-death grace delay elapsed
    Concluded,
}

#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub motion: Motion,
    pub cues: Vec<AnimationCue>,
    pub projectiles: Vec<ProjectileSpawnSpec>,
    pub notices: Vec<BossNotice>,
}

impl Signals {
    pub fn trigger(&mut self, trigger: AnimationTrigger) {
        self.cues.push(AnimationCue::Trigger(trigger));
    }

    pub fn notify(&mut self, notice: BossNotice) {
        self.notices.push(notice);
    }

    pub fn spawn(&mut self, spec: ProjectileSpawnSpec) {
        self.projectiles.push(spec);
    }

    pub fn triggers(&self) -> impl Iterator<Item = AnimationTrigger> + '_ {
        self.cues.iter().filter_map(|cue| match cue {
            AnimationCue::Trigger(trigger) => Some(*trigger),
            _ => None,
        })
    }

    /// Takes the queued events, keeping the current motion.
    pub fn drain(&mut self) -> Signals {
        Signals {
            motion: self.motion,
            cues: std::mem::take(&mut self.cues),
            projectiles: std::mem::take(&mut self.projectiles),
            notices: std::mem::take(&mut self.notices),
        }
    }
}
