//! Combat domain: projectile pattern generation.
//!
//! Geometry for each projectile is computed from its index alone, so the
//! stagger delays never influence where a projectile points.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::resources::ProjectileTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ProjectilePattern {
    /// Fixed angular step per projectile, released one after another
    Spiral,
    /// Evenly divides the circle, released in one or more sub-bursts
    FullCircle,
    /// Evenly divides the circle, released at once (area slam follow-up)
    RadialBurst,
}

/// Immutable description of one projectile handed to the spawner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawnSpec {
    pub position: Vec2,
    /// Unit vector
    pub direction: Vec2,
    pub angle_degrees: f32,
    pub speed: f32,
    pub homing: bool,
    pub damage: u32,
    pub lifetime: Duration,
}

/// A spawn spec plus its release delay relative to the start of the volley.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSpawn {
    pub delay: Duration,
    pub spec: ProjectileSpawnSpec,
}

/// Per-shot values shared by every projectile of a volley.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotParams {
    pub speed: f32,
    pub damage: u32,
    pub lifetime: Duration,
    pub homing: bool,
}

/// Spacing and stagger settings for the patterns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternLayout {
    pub spiral_step_degrees: f32,
    pub spiral_interval: Duration,
    pub full_circle_bursts: u32,
    pub burst_interval: Duration,
}

impl PatternLayout {
    pub fn from_tuning(tuning: &ProjectileTuning) -> Self {
        Self {
            spiral_step_degrees: tuning.spiral_step_degrees,
            spiral_interval: Duration::from_millis(tuning.spiral_interval_ms),
            full_circle_bursts: tuning.full_circle_bursts,
            burst_interval: Duration::from_millis(tuning.burst_interval_ms),
        }
    }

    /// Sub-burst count clamped to `1..=max(1, count / 2)`.
    fn bursts_for(&self, count: u32) -> u32 {
        self.full_circle_bursts.clamp(1, (count / 2).max(1))
    }
}

impl ProjectilePattern {
    fn angle_step(self, count: u32, layout: &PatternLayout) -> f32 {
        match self {
            ProjectilePattern::Spiral => layout.spiral_step_degrees,
            ProjectilePattern::FullCircle | ProjectilePattern::RadialBurst => {
                360.0 / count.max(1) as f32
            }
        }
    }

    fn delay(self, index: u32, count: u32, layout: &PatternLayout) -> Duration {
        match self {
            ProjectilePattern::Spiral => layout.spiral_interval * index,
            ProjectilePattern::FullCircle => {
                let burst = index * layout.bursts_for(count) / count.max(1);
                layout.burst_interval * burst
            }
            ProjectilePattern::RadialBurst => Duration::ZERO,
        }
    }

    /// Time between the first and the last release of a `count` volley.
    pub fn span(self, count: u32, layout: &PatternLayout) -> Duration {
        if count == 0 {
            return Duration::ZERO;
        }
        self.delay(count - 1, count, layout)
    }
}

/// Lazily yields the spawns of one volley in release order.
#[derive(Debug, Clone)]
pub struct PatternIter {
    pattern: ProjectilePattern,
    layout: PatternLayout,
    shot: ShotParams,
    origin: Vec2,
    base_angle: f32,
    step: f32,
    count: u32,
    index: u32,
}

impl Iterator for PatternIter {
    type Item = TimedSpawn;

    fn next(&mut self) -> Option<TimedSpawn> {
        if self.index >= self.count {
            return None;
        }
        let i = self.index;
        self.index += 1;

        let angle_degrees = self.base_angle + i as f32 * self.step;
        let direction = Vec2::from_angle(angle_degrees.to_radians());
        Some(TimedSpawn {
            delay: self.pattern.delay(i, self.count, &self.layout),
            spec: ProjectileSpawnSpec {
                position: self.origin,
                direction,
                angle_degrees,
                speed: self.shot.speed,
                homing: self.shot.homing,
                damage: self.shot.damage,
                lifetime: self.shot.lifetime,
            },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.index) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for PatternIter {}

/// Builds the spawns of a volley fired from `origin`. The first projectile
/// points along `aim` (the boss to target direction), or along +X when `aim`
/// is zero.
pub fn generate(
    pattern: ProjectilePattern,
    count: u32,
    origin: Vec2,
    aim: Vec2,
    layout: &PatternLayout,
    shot: ShotParams,
) -> PatternIter {
    let base_angle = if aim == Vec2::ZERO {
        0.0
    } else {
        aim.y.atan2(aim.x).to_degrees()
    };
    PatternIter {
        pattern,
        layout: *layout,
        shot,
        origin,
        base_angle,
        step: pattern.angle_step(count, layout),
        count,
        index: 0,
    }
}
