//! Combat domain: the boss's approach/attack cycle for one phase.

use std::time::Duration;

use bevy::prelude::*;

use crate::combat::executor::{AttackExecutor, AttackStage};
use crate::combat::phase::Phase;
use crate::combat::policy::{self, AttackKind, AttackPlan};
use crate::combat::scheduler::{Poll, Progress, Routine, Wait, WaitUntil};
use crate::combat::signals::{AnimationTrigger, Motion};
use crate::combat::state::CombatCx;

#[derive(Debug, Clone)]
enum LoopStep {
    /// Chasing the target for a bounded, randomized time
    Approach(WaitUntil),
    /// Approach over; the next attack is chosen on the following resume
    Engage,
    Attack(AttackExecutor),
}

/// Runs approach -> select -> execute -> cooldown forever, scoped to one phase.
#[derive(Debug, Clone)]
pub struct AttackLoop {
    phase: Phase,
    step: LoopStep,
    stun: Option<Wait>,
}

impl AttackLoop {
    pub fn new(phase: Phase, cx: &mut CombatCx<'_>) -> Self {
        Self {
            phase,
            step: Self::approach(cx),
            stun: None,
        }
    }

    fn approach(cx: &mut CombatCx<'_>) -> LoopStep {
        LoopStep::Approach(WaitUntil::new(cx.tuning.approach_ms.roll(cx.rng)))
    }

    pub fn current_attack(&self) -> Option<(AttackKind, AttackStage)> {
        match &self.step {
            LoopStep::Attack(executor) => Some((executor.kind(), executor.stage())),
            _ => None,
        }
    }

    /// Starts `kind` right away. Rejected while an attack or its cooldown is
    /// in flight, or while stunned or dead.
    pub fn force_attack(&mut self, kind: AttackKind, cx: &mut CombatCx<'_>) -> bool {
        if matches!(self.step, LoopStep::Attack(_)) || self.stun.is_some() {
            return false;
        }
        self.begin_attack(kind, cx)
    }

    /// Stuns the boss for `duration`.
    ///
    /// Rejected during an attack's active window. A wind-up or recovery in
    /// progress is cancelled; cooldown and approach are only paused.
    pub fn stun(&mut self, duration: Duration, cx: &mut CombatCx<'_>) -> bool {
        if cx.state.is_dead {
            return false;
        }
        if let LoopStep::Attack(executor) = &mut self.step {
            match executor.stage() {
                AttackStage::Active => return false,
                AttackStage::Telegraph | AttackStage::Recover => {
                    executor.cancel(cx);
                    self.step = Self::approach(cx);
                }
                AttackStage::Cooldown => {}
            }
        }
        cx.state.is_stunned = true;
        cx.signals.motion = Motion::STILL;
        cx.signals.trigger(AnimationTrigger::Stunned);
        self.stun = Some(Wait::new(duration));
        info!("Boss stunned for {:?}", duration);
        true
    }

    fn begin_attack(&mut self, kind: AttackKind, cx: &mut CombatCx<'_>) -> bool {
        let plan = AttackPlan::new(kind, self.phase, cx.tuning, cx.rng);
        match AttackExecutor::begin(plan, cx) {
            Some(executor) => {
                self.step = LoopStep::Attack(executor);
                true
            }
            None => false,
        }
    }

    fn chase(&self, cx: &mut CombatCx<'_>) {
        cx.signals.motion = match cx.target {
            Some(_) => Motion::toward(cx.aim(), policy::move_speed(cx.tuning, self.phase)),
            None => Motion::STILL,
        };
    }
}

impl Routine<CombatCx<'_>> for AttackLoop {
    fn resume(&mut self, cx: &mut CombatCx<'_>, dt: Duration) -> Progress {
        let mut dt = dt;

        if let Some(stun) = self.stun.as_mut() {
            cx.signals.motion = Motion::STILL;
            match stun.advance(dt) {
                Some(leftover) => {
                    self.stun = None;
                    cx.state.is_stunned = false;
                    dt = leftover;
                }
                None => return Progress::Running,
            }
        }

        let mut attacked = false;
        loop {
            match &mut self.step {
                LoopStep::Approach(until) => {
                    let Some(distance) = cx.distance_to_target() else {
                        cx.signals.motion = Motion::STILL;
                        debug!("Boss has no target, idling");
                        return Progress::Running;
                    };
                    let in_range = distance <= cx.tuning.engage_distance;
                    match until.poll(in_range, dt) {
                        Poll::Pending => {
                            self.chase(cx);
                            return Progress::Running;
                        }
                        Poll::Ready(leftover) | Poll::TimedOut(leftover) => {
                            self.step = LoopStep::Engage;
                            dt = leftover;
                        }
                    }
                }
                LoopStep::Engage => {
                    // At most one new attack per resume
                    if attacked {
                        cx.signals.motion = Motion::STILL;
                        return Progress::Running;
                    }
                    attacked = true;
                    let modifiers = cx.phases.modifiers(self.phase);
                    let kind = policy::choose_attack(modifiers, cx.rng);
                    if !self.begin_attack(kind, cx) {
                        return Progress::Running;
                    }
                }
                LoopStep::Attack(executor) => match executor.advance(cx, dt) {
                    Some(leftover) => {
                        self.step = Self::approach(cx);
                        dt = leftover;
                    }
                    None => {
                        if executor.holds_position() {
                            cx.signals.motion = Motion::STILL;
                        } else {
                            self.chase(cx);
                        }
                        return Progress::Running;
                    }
                },
            }
        }
    }

    fn cleanup(&mut self, cx: &mut CombatCx<'_>) {
        if let LoopStep::Attack(executor) = &mut self.step {
            executor.cancel(cx);
        }
        self.stun = None;
        cx.state.is_stunned = false;
        cx.signals.motion = Motion::STILL;
    }
}
