//! Movement domain: top-down locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{MovementInput, MovementTuning, Player};

/// Moves `velocity` toward `axis * max_speed`, accelerating while there is
/// input and decelerating to rest otherwise.
pub fn step_velocity(velocity: Vec2, axis: Vec2, tuning: &MovementTuning, dt: f32) -> Vec2 {
    if axis.length_squared() > 0.01 {
        let target = axis * tuning.max_speed;
        let delta = target - velocity;
        let step = tuning.accel * dt;
        if delta.length() <= step {
            target
        } else {
            velocity + delta.normalize() * step
        }
    } else {
        let speed = velocity.length();
        let step = tuning.decel * dt;
        if speed <= step {
            Vec2::ZERO
        } else {
            velocity - velocity / speed * step
        }
    }
}

pub(crate) fn apply_movement(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<&mut LinearVelocity, With<Player>>,
) {
    let dt = time.delta_secs();

    for mut velocity in &mut query {
        velocity.0 = step_velocity(velocity.0, input.axis, &tuning, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accelerates_up_to_max_speed() {
        let tuning = MovementTuning::default();
        let mut velocity = Vec2::ZERO;
        for _ in 0..60 {
            velocity = step_velocity(velocity, Vec2::X, &tuning, 1.0 / 60.0);
        }
        assert_eq!(velocity, Vec2::new(tuning.max_speed, 0.0));
    }

    #[test]
    fn test_decelerates_to_rest_without_input() {
        let tuning = MovementTuning::default();
        let mut velocity = Vec2::new(0.0, tuning.max_speed);
        for _ in 0..60 {
            velocity = step_velocity(velocity, Vec2::ZERO, &tuning, 1.0 / 60.0);
        }
        assert_eq!(velocity, Vec2::ZERO);
    }
}
