//! Debug domain: hotkeys for poking the boss at runtime.

use std::time::Duration;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::combat::{AttackKind, BossBrain, DamageEvent, Health, Invulnerable};
use crate::debug::state::{DebugInfoOverlay, DebugState, HEAVY_HIT, LIGHT_HIT, STUN_MS};
use crate::movement::Player;

/// Handle keyboard shortcuts for debug actions (Ctrl+Key)
pub(crate) fn handle_debug_hotkeys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    mut damage_events: MessageWriter<DamageEvent>,
    mut bosses: Query<(Entity, &mut BossBrain)>,
    player_query: Query<Entity, With<Player>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    // Ctrl+I: Toggle invincibility
    if keyboard.just_pressed(KeyCode::KeyI) {
        debug_state.invincible = !debug_state.invincible;
        let label = if debug_state.invincible { "ON" } else { "OFF" };
        info!("[DEBUG] Invincibility {}", label);
    }

    // Ctrl+D: Toggle boss info overlay
    if keyboard.just_pressed(KeyCode::KeyD) {
        debug_state.show_info = !debug_state.show_info;
        if debug_state.show_info {
            spawn_debug_info_overlay(&mut commands);
        } else {
            for entity in &existing_overlay {
                commands.entity(entity).despawn();
            }
        }
    }

    // Ctrl+K / Ctrl+L: Hit the boss through the regular damage path
    let hit = if keyboard.just_pressed(KeyCode::KeyK) {
        Some(LIGHT_HIT)
    } else if keyboard.just_pressed(KeyCode::KeyL) {
        Some(HEAVY_HIT)
    } else {
        None
    };
    if let (Some(amount), Some(source)) = (hit, player_query.iter().next()) {
        for (boss, _) in &bosses {
            damage_events.write(DamageEvent {
                source,
                target: boss,
                amount,
                knockback: Vec2::ZERO,
            });
            info!("[DEBUG] {} damage to boss {:?}", amount, boss);
        }
    }

    // Ctrl+U: Stun
    if keyboard.just_pressed(KeyCode::KeyU) {
        for (boss, mut brain) in &mut bosses {
            let stunned = brain.0.stun(Duration::from_millis(STUN_MS));
            let outcome = if stunned { "ok" } else { "rejected" };
            info!("[DEBUG] Stun boss {:?}: {}", boss, outcome);
        }
    }

    // Ctrl+1/2/3: Force an attack
    let forced = [
        (KeyCode::Digit1, AttackKind::Melee),
        (KeyCode::Digit2, AttackKind::Ranged),
        (KeyCode::Digit3, AttackKind::AreaSlam),
    ]
    .into_iter()
    .find(|(key, _)| keyboard.just_pressed(*key));
    if let Some((_, kind)) = forced {
        for (boss, mut brain) in &mut bosses {
            let outcome = if brain.0.force_attack(kind) {
                "ok"
            } else {
                "rejected"
            };
            info!("[DEBUG] Force {:?} on boss {:?}: {}", kind, boss, outcome);
        }
    }
}

/// Apply invincibility effect to player
pub(crate) fn apply_invincibility(
    debug_state: Res<DebugState>,
    mut player_query: Query<(&mut Health, &mut Invulnerable), With<Player>>,
) {
    if !debug_state.invincible {
        return;
    }

    for (mut health, mut invuln) in &mut player_query {
        // Keep invulnerability frames active
        invuln.timer = 1.0;

        if health.current < health.max {
            health.current = health.max;
        }
    }
}

/// Update the debug info overlay with the current boss state
pub(crate) fn update_debug_info_overlay(
    debug_state: Res<DebugState>,
    bosses: Query<&BossBrain>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        return;
    }
    let Ok(mut text) = overlay_query.single_mut() else {
        return;
    };

    **text = match bosses.iter().next() {
        Some(brain) => {
            let boss = &brain.0;
            let state = boss.state();
            let hitboxes = boss.hitboxes();
            let lines = [
                format!("HP: {}/{}", state.health(), state.max_health()),
                format!("Phase: {}", state.phase()),
                format!("Attack: {:?}", boss.current_attack()),
                format!("Hitboxes: melee={} area={}", hitboxes.melee, hitboxes.area),
                format!("Invulnerable: {}", state.is_invulnerable()),
                format!("Stunned: {}", state.is_stunned()),
            ];
            lines.join("\n")
        }
        None => "Boss dormant".to_string(),
    };
}

fn spawn_debug_info_overlay(commands: &mut Commands) {
    commands.spawn((
        DebugInfoOverlay,
        Text::new("Loading..."),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.9, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            top: Val::Px(20.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ZIndex(500),
    ));
}
