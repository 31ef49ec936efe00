//! Debug domain: state for debug tooling.

use bevy::prelude::*;

/// Resource tracking debug mode state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether player is invincible
    pub invincible: bool,
    /// Whether to show the boss info overlay
    pub show_info: bool,
}

/// Marker for debug info overlay (boss health, phase, attack)
#[derive(Component, Debug)]
pub struct DebugInfoOverlay;

/// Damage dealt by the debug damage hotkeys
pub const LIGHT_HIT: u32 = 10;
pub const HEAVY_HIT: u32 = 100;
/// Stun length for the debug stun hotkey, in milliseconds
pub const STUN_MS: u64 = 1500;
