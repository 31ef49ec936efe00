//! Content domain: data-driven tuning loaded from `assets/data`.

mod loader;

pub use loader::{
    BOSS_TUNING_FILE, ContentLoadError, load_boss_tuning, load_boss_tuning_or_default,
    parse_boss_tuning,
};

use bevy::prelude::*;
use std::path::Path;

pub const DATA_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        let tuning = load_boss_tuning_or_default(Path::new(DATA_DIR));
        app.insert_resource(tuning);
    }
}
