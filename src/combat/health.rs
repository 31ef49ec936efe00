//! Combat domain: damage intake and invulnerability windows.

use std::time::Duration;

use crate::combat::phase::Phase;
use crate::combat::scheduler::{Progress, Routine, Wait};
use crate::combat::state::{BossState, CombatCx};

/// Outcome of one `apply_damage` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    pub accepted: bool,
    pub new_health: u32,
    pub phase: Phase,
    pub phase_changed: bool,
    pub died: bool,
}

impl DamageResult {
    pub fn rejected(state: &BossState) -> Self {
        Self {
            accepted: false,
            new_health: state.health,
            phase: state.phase,
            phase_changed: false,
            died: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Rejected,
    Wounded,
    Killed,
}

impl BossState {
    /// Subtracts `amount` from health unless the boss is dead, invulnerable,
    /// or `amount` is zero. Health saturates at zero.
    pub fn take_damage(&mut self, amount: u32) -> HitOutcome {
        if self.is_dead || self.is_invulnerable || amount == 0 {
            return HitOutcome::Rejected;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.is_dead = true;
            HitOutcome::Killed
        } else {
            HitOutcome::Wounded
        }
    }
}

/// Post-hit window during which damage is rejected and the sprite blinks.
#[derive(Debug, Clone)]
pub struct InvulnerabilityWindow {
    window: Wait,
    blink_interval: Duration,
}

impl InvulnerabilityWindow {
    /// Opens the window on `state`.
    pub fn open(state: &mut BossState, duration: Duration, blink_interval: Duration) -> Self {
        state.is_invulnerable = true;
        state.is_visible = false;
        Self {
            window: Wait::new(duration),
            blink_interval,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.window.remaining()
    }

    fn close(state: &mut BossState) {
        state.is_invulnerable = false;
        state.is_visible = true;
    }
}

impl Routine<CombatCx<'_>> for InvulnerabilityWindow {
    fn resume(&mut self, cx: &mut CombatCx<'_>, dt: Duration) -> Progress {
        if self.window.advance(dt).is_some() {
            Self::close(cx.state);
            return Progress::Finished;
        }
        // Hidden on even blink slots, starting hidden
        let slot = self.window.elapsed().as_micros() / self.blink_interval.as_micros().max(1);
        cx.state.is_visible = slot % 2 == 1;
        Progress::Running
    }

    fn cleanup(&mut self, cx: &mut CombatCx<'_>) {
        Self::close(cx.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut state = BossState::new(50);
        assert_eq!(state.take_damage(1000), HitOutcome::Killed);
        assert_eq!(state.health(), 0);
        assert!(state.is_dead());
        assert_eq!(state.take_damage(5), HitOutcome::Rejected);
    }

    #[test]
    fn test_zero_and_invulnerable_hits_are_rejected() {
        let mut state = BossState::new(100);
        assert_eq!(state.take_damage(0), HitOutcome::Rejected);

        state.is_invulnerable = true;
        assert_eq!(state.take_damage(10), HitOutcome::Rejected);
        assert_eq!(state.health(), 100);
    }

    #[test]
    fn test_opening_window_hides_sprite() {
        let mut state = BossState::new(100);
        let window = InvulnerabilityWindow::open(
            &mut state,
            Duration::from_millis(600),
            Duration::from_millis(100),
        );
        assert!(state.is_invulnerable());
        assert!(!state.is_visible());
        assert_eq!(window.remaining(), Duration::from_millis(600));
    }
}
