//! Combat domain: the boss controller tying state, routines and signals together.

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat::attack_loop::AttackLoop;
use crate::combat::executor::AttackStage;
use crate::combat::health::{DamageResult, HitOutcome, InvulnerabilityWindow};
use crate::combat::phase::{Phase, PhaseMachine, PhaseThresholds};
use crate::combat::policy::AttackKind;
use crate::combat::resources::{BossTuning, ConfigError};
use crate::combat::scheduler::{Progress, Routine, Scheduler, Wait};
use crate::combat::signals::{AnimationCue, AnimationTrigger, BossNotice, Motion, Signals};
use crate::combat::state::{BossState, CombatCx, Hitboxes};

pub const ATTACK_LOOP: &str = "attack_loop";
pub const INVULNERABILITY: &str = "invulnerability";
pub const DEATH_GRACE: &str = "death_grace";

/// Every routine a boss can run.
#[derive(Debug, Clone)]
pub enum BossRoutine {
    AttackLoop(AttackLoop),
    Invulnerability(InvulnerabilityWindow),
    DeathGrace(Wait),
}

impl Routine<CombatCx<'_>> for BossRoutine {
    fn resume(&mut self, cx: &mut CombatCx<'_>, dt: Duration) -> Progress {
        match self {
            BossRoutine::AttackLoop(attack_loop) => attack_loop.resume(cx, dt),
            BossRoutine::Invulnerability(window) => window.resume(cx, dt),
            BossRoutine::DeathGrace(wait) => {
                if wait.advance(dt).is_none() {
                    return Progress::Running;
                }
                cx.signals.notify(BossNotice::Concluded);
                info!("Boss encounter concluded");
                Progress::Finished
            }
        }
    }

    fn cleanup(&mut self, cx: &mut CombatCx<'_>) {
        match self {
            BossRoutine::AttackLoop(attack_loop) => attack_loop.cleanup(cx),
            BossRoutine::Invulnerability(window) => window.cleanup(cx),
            BossRoutine::DeathGrace(_) => {}
        }
    }
}

/// Phase-driven boss behavior, advanced once per frame with [`tick`].
///
/// Damage may arrive between any two ticks and is resolved synchronously:
/// by the time [`apply_damage`] returns, any phase transition or death has
/// fully taken effect.
///
/// [`tick`]: BossController::tick
/// [`apply_damage`]: BossController::apply_damage
#[derive(Debug)]
pub struct BossController {
    tuning: BossTuning,
    phases: PhaseMachine,
    state: BossState,
    hitboxes: Hitboxes,
    signals: Signals,
    rng: ChaCha8Rng,
    routines: Scheduler<BossRoutine>,
    position: Vec2,
    target: Option<Vec2>,
}

impl BossController {
    /// Validates `tuning` and starts the phase one attack loop.
    pub fn new(tuning: BossTuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let thresholds = PhaseThresholds::new(tuning.phase_thresholds.clone())?;
        let phases = PhaseMachine::new(thresholds, tuning.phases.clone())?;

        let mut controller = Self {
            state: BossState::new(tuning.max_health),
            tuning,
            phases,
            hitboxes: Hitboxes::default(),
            signals: Signals::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            routines: Scheduler::new(),
            position: Vec2::ZERO,
            target: None,
        };

        let (routines, mut cx) = controller.split();
        let attack_loop = AttackLoop::new(Phase::One, &mut cx);
        routines.start(ATTACK_LOOP, BossRoutine::AttackLoop(attack_loop), &mut cx);
        cx.signals.notify(BossNotice::HealthChanged {
            health: cx.state.health,
            max_health: cx.state.max_health,
        });
        Ok(controller)
    }

    fn split(&mut self) -> (&mut Scheduler<BossRoutine>, CombatCx<'_>) {
        (
            &mut self.routines,
            CombatCx {
                state: &mut self.state,
                hitboxes: &mut self.hitboxes,
                signals: &mut self.signals,
                rng: &mut self.rng,
                tuning: &self.tuning,
                phases: &self.phases,
                position: self.position,
                target: self.target,
            },
        )
    }

    /// Advances every running routine by `dt`. `target` is `None` while the
    /// target cannot be located; the boss then idles.
    pub fn tick(&mut self, dt: Duration, position: Vec2, target: Option<Vec2>) {
        self.position = position;
        self.target = target;

        let (routines, mut cx) = self.split();
        routines.tick(&mut cx, dt);

        if self.state.is_dead {
            self.signals.motion = Motion::STILL;
        }
        let motion = self.signals.motion;
        let cues = &mut self.signals.cues;
        cues.push(AnimationCue::Moving(!motion.is_still()));
        if !motion.is_still() {
            cues.push(AnimationCue::Facing(motion.direction));
        }
    }

    /// Applies `amount` damage.
    ///
    /// Rejected while dead or invulnerable, and for zero amounts. An accepted
    /// hit either kills the boss, escalates the phase, or opens an
    /// invulnerability window.
    pub fn apply_damage(&mut self, amount: u32) -> DamageResult {
        let (routines, mut cx) = self.split();
        let outcome = cx.state.take_damage(amount);
        if outcome == HitOutcome::Rejected {
            return DamageResult::rejected(cx.state);
        }

        cx.signals.notify(BossNotice::HealthChanged {
            health: cx.state.health,
            max_health: cx.state.max_health,
        });
        let mut result = DamageResult {
            accepted: true,
            new_health: cx.state.health,
            phase: cx.state.phase,
            phase_changed: false,
            died: false,
        };

        if outcome == HitOutcome::Killed {
            routines.cancel_all(&mut cx);
            cx.hitboxes.disable_all();
            cx.state.is_attacking = false;
            cx.state.is_invulnerable = false;
            cx.state.is_stunned = false;
            cx.state.is_visible = true;
            cx.signals.motion = Motion::STILL;
            cx.signals.trigger(AnimationTrigger::Die);
            cx.signals.notify(BossNotice::Died);
            let grace = Wait::new(cx.tuning.death_grace());
            routines.start(DEATH_GRACE, BossRoutine::DeathGrace(grace), &mut cx);
            info!("Boss defeated");
            result.died = true;
            return result;
        }

        let (health, max_health) = (cx.state.health, cx.state.max_health);
        match cx.phases.escalation(cx.state.phase, health, max_health) {
            Some(next) => {
                Self::enter_phase(routines, &mut cx, next);
                result.phase = next;
                result.phase_changed = true;
            }
            None => {
                let window = InvulnerabilityWindow::open(
                    cx.state,
                    cx.tuning.invulnerability(),
                    cx.tuning.blink_interval(),
                );
                let routine = BossRoutine::Invulnerability(window);
                routines.start(INVULNERABILITY, routine, &mut cx);
            }
        }
        result
    }

    fn enter_phase(routines: &mut Scheduler<BossRoutine>, cx: &mut CombatCx<'_>, next: Phase) {
        let previous = cx.state.phase;
        routines.cancel(ATTACK_LOOP, cx);
        routines.cancel(INVULNERABILITY, cx);
        cx.hitboxes.disable_all();
        cx.state.is_attacking = false;
        cx.state.is_invulnerable = false;
        cx.state.is_stunned = false;
        cx.state.is_visible = true;
        cx.state.phase = next;

        let attack_loop = AttackLoop::new(next, cx);
        routines.start(ATTACK_LOOP, BossRoutine::AttackLoop(attack_loop), cx);
        if let Some(trigger) = next.trigger() {
            cx.signals.trigger(trigger);
        }
        cx.signals.notify(BossNotice::PhaseChanged(next));
        info!(
            "Boss phase {} -> {} at {}/{} health",
            previous, next, cx.state.health, cx.state.max_health
        );
    }

    /// Stuns the boss. See [`AttackLoop::stun`] for when this is rejected.
    pub fn stun(&mut self, duration: Duration) -> bool {
        let (routines, mut cx) = self.split();
        match routines.get_mut(ATTACK_LOOP) {
            Some(BossRoutine::AttackLoop(attack_loop)) => attack_loop.stun(duration, &mut cx),
            _ => false,
        }
    }

    /// Starts `kind` immediately, skipping selection. Returns false when an
    /// attack is already in flight or the boss is stunned or dead.
    pub fn force_attack(&mut self, kind: AttackKind) -> bool {
        let (routines, mut cx) = self.split();
        match routines.get_mut(ATTACK_LOOP) {
            Some(BossRoutine::AttackLoop(attack_loop)) => attack_loop.force_attack(kind, &mut cx),
            _ => false,
        }
    }

    pub fn state(&self) -> &BossState {
        &self.state
    }

    pub fn health(&self) -> u32 {
        self.state.health
    }

    pub fn max_health(&self) -> u32 {
        self.state.max_health
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_alive(&self) -> bool {
        !self.state.is_dead
    }

    /// Dead and the grace delay has elapsed.
    pub fn is_concluded(&self) -> bool {
        self.state.is_dead && self.routines.is_empty()
    }

    pub fn hitboxes(&self) -> Hitboxes {
        self.hitboxes
    }

    pub fn current_attack(&self) -> Option<(AttackKind, AttackStage)> {
        match self.routines.get(ATTACK_LOOP) {
            Some(BossRoutine::AttackLoop(attack_loop)) => attack_loop.current_attack(),
            _ => None,
        }
    }

    pub fn is_running(&self, routine: &str) -> bool {
        self.routines.is_running(routine)
    }

    pub fn motion(&self) -> Motion {
        self.signals.motion
    }

    /// Takes the cues, projectiles and notices queued since the last drain.
    pub fn drain_signals(&mut self) -> Signals {
        self.signals.drain()
    }
}
