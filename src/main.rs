use avian2d::prelude::*;
use bevy::prelude::*;

use boss_arena::combat::{BossTuning, PlayerAttackTuning, spawn_boss};
use boss_arena::{combat, content, encounters, movement, ui};

const PLAYER_START: Vec2 = Vec2::new(0.0, -240.0);
const BOSS_START: Vec2 = Vec2::new(0.0, 160.0);

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Boss Arena".to_string(),
            resolution: (1280, 720).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .insert_resource(Gravity(Vec2::ZERO))
    .add_plugins((
        content::ContentPlugin,
        combat::CombatPlugin,
        movement::MovementPlugin,
        encounters::EncountersPlugin,
        ui::UiPlugin,
    ))
    .add_systems(Startup, setup_arena);

    #[cfg(feature = "dev-tools")]
    app.add_plugins(boss_arena::debug::DebugPlugin);

    app.run();
}

fn setup_arena(mut commands: Commands, tuning: Res<BossTuning>, attack: Res<PlayerAttackTuning>) {
    commands.spawn(Camera2d);

    movement::spawn_arena_walls(&mut commands);
    movement::spawn_player(&mut commands, PLAYER_START, &attack);

    let boss = spawn_boss(&mut commands, BOSS_START, &tuning);
    encounters::spawn_activation_zone(&mut commands, boss, BOSS_START);
}
