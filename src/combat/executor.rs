//! Combat domain: one attack's timed sequence.
//!
//! Telegraph -> Active -> Recover -> Cooldown. Leftover tick time rolls into
//! the next stage so stage boundaries do not drift with the frame rate.

use std::iter::Peekable;
use std::time::Duration;

use bevy::prelude::*;

use crate::combat::patterns::{self, PatternIter, ShotParams};
use crate::combat::policy::{AttackKind, AttackPlan};
use crate::combat::scheduler::Wait;
use crate::combat::signals::Motion;
use crate::combat::state::CombatCx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackStage {
    Telegraph,
    Active,
    Recover,
    Cooldown,
}

#[derive(Debug, Clone)]
pub struct AttackExecutor {
    plan: AttackPlan,
    stage: AttackStage,
    wait: Wait,
    volley: Option<Peekable<PatternIter>>,
}

impl AttackExecutor {
    /// Starts the telegraph of `plan`. Returns `None` while stunned or dead.
    pub fn begin(plan: AttackPlan, cx: &mut CombatCx<'_>) -> Option<Self> {
        if cx.state.is_stunned || cx.state.is_dead {
            return None;
        }
        cx.state.is_attacking = true;
        cx.signals.motion = Motion::STILL;
        cx.signals.trigger(plan.kind.trigger());
        debug!(
            "Boss telegraphs {:?} in {} ({:?})",
            plan.kind, plan.phase, plan.telegraph
        );
        Some(Self {
            plan,
            stage: AttackStage::Telegraph,
            wait: Wait::new(plan.telegraph),
            volley: None,
        })
    }

    pub fn kind(&self) -> AttackKind {
        self.plan.kind
    }

    pub fn stage(&self) -> AttackStage {
        self.stage
    }

    /// True until the cooldown starts; the boss stands still meanwhile.
    pub fn holds_position(&self) -> bool {
        self.stage != AttackStage::Cooldown
    }

    /// Advances the attack by `dt`. Returns the unused time once the
    /// cooldown has elapsed.
    pub fn advance(&mut self, cx: &mut CombatCx<'_>, dt: Duration) -> Option<Duration> {
        let mut dt = dt;
        loop {
            let finished = self.wait.advance(dt);
            if self.stage == AttackStage::Active {
                self.release_due(cx);
            }
            let leftover = finished?;

            match self.stage {
                AttackStage::Telegraph => self.enter_active(cx),
                AttackStage::Active => self.enter_recover(cx),
                AttackStage::Recover => self.enter_cooldown(cx),
                AttackStage::Cooldown => return Some(leftover),
            }
            dt = leftover;
        }
    }

    /// Aborts the attack. Damage volumes are always switched off.
    pub fn cancel(&mut self, cx: &mut CombatCx<'_>) {
        cx.hitboxes.disable_all();
        cx.state.is_attacking = false;
        self.volley = None;
        debug!(
            "Boss {:?} cancelled during {:?}",
            self.plan.kind, self.stage
        );
    }

    fn enter_active(&mut self, cx: &mut CombatCx<'_>) {
        self.stage = AttackStage::Active;
        self.wait = Wait::new(self.plan.active);
        match self.plan.kind {
            AttackKind::Melee => cx.hitboxes.melee = true,
            AttackKind::AreaSlam => cx.hitboxes.area = true,
            AttackKind::Ranged => {}
        }

        if let Some(volley) = self.plan.volley {
            let shot = ShotParams {
                speed: volley.speed,
                damage: cx.tuning.projectiles.damage,
                lifetime: cx.tuning.projectile_lifetime(),
                homing: volley.homing,
            };
            let spawns = patterns::generate(
                volley.pattern,
                volley.count,
                cx.position,
                cx.aim(),
                &cx.tuning.pattern_layout(),
                shot,
            );
            debug!(
                "Boss releases {:?} volley of {} projectiles",
                volley.pattern, volley.count
            );
            self.volley = Some(spawns.peekable());
            self.release_due(cx);
        }
    }

    fn enter_recover(&mut self, cx: &mut CombatCx<'_>) {
        self.stage = AttackStage::Recover;
        self.wait = Wait::new(self.plan.recover);
        cx.hitboxes.disable_all();
        self.volley = None;
    }

    fn enter_cooldown(&mut self, cx: &mut CombatCx<'_>) {
        self.stage = AttackStage::Cooldown;
        self.wait = Wait::new(self.plan.cooldown);
        cx.state.is_attacking = false;
    }

    fn release_due(&mut self, cx: &mut CombatCx<'_>) {
        let Some(volley) = self.volley.as_mut() else {
            return;
        };
        let elapsed = self.wait.elapsed();
        while let Some(spawn) = volley.next_if(|spawn| spawn.delay <= elapsed) {
            cx.signals.spawn(spawn.spec);
        }
    }
}
