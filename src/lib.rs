//! Boss arena: a top-down boss fight with a phase-driven combat controller.

pub mod combat;
pub mod content;
#[cfg(feature = "dev-tools")]
pub mod debug;
pub mod encounters;
pub mod movement;
pub mod ui;
