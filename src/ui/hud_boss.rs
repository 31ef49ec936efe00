//! UI domain: boss health bar UI.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::combat::{BossHealthChangedEvent, BossPhaseChangeEvent, EncounterConcludedEvent, Phase};
use crate::encounters::BossActivatedEvent;

const BOSS_HEALTHBAR_WIDTH: f32 = 400.0;
const BOSS_HEALTHBAR_HEIGHT: f32 = 24.0;
const BOSS_HEALTHBAR_BOTTOM: f32 = 40.0;

/// Marker for the boss health bar UI container
#[derive(Component)]
pub struct BossHealthBarUI {
    pub owner: Entity,
}

/// Marker for the boss health bar fill element
#[derive(Component)]
pub struct BossHealthBarFill {
    pub owner: Entity,
}

/// Marker for boss name label
#[derive(Component)]
pub struct BossNameLabel {
    pub owner: Entity,
}

/// Fill color for each phase
pub fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::One => Color::srgb(0.8, 0.1, 0.1),
        Phase::Two => Color::srgb(0.9, 0.4, 0.1),
        Phase::Three => Color::srgb(0.6, 0.0, 0.6),
    }
}

pub(crate) fn spawn_boss_healthbar(
    mut commands: Commands,
    mut activated_events: MessageReader<BossActivatedEvent>,
    existing_bars: Query<&BossHealthBarFill>,
) {
    for event in activated_events.read() {
        let boss_entity = event.boss;
        let has_bar = existing_bars.iter().any(|bar| bar.owner == boss_entity);
        if has_bar {
            continue;
        }

        // Spawn boss health bar UI at bottom center of screen
        commands
            .spawn((
                BossHealthBarUI { owner: boss_entity },
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(BOSS_HEALTHBAR_BOTTOM),
                    left: Val::Percent(50.0),
                    margin: UiRect::left(Val::Px(-BOSS_HEALTHBAR_WIDTH / 2.0)),
                    width: Val::Px(BOSS_HEALTHBAR_WIDTH),
                    height: Val::Px(BOSS_HEALTHBAR_HEIGHT),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Start,
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.05, 0.05, 0.05, 0.9)),
                BorderColor::all(Color::srgb(0.6, 0.1, 0.1)),
            ))
            .with_children(|parent| {
                parent.spawn((
                    BossHealthBarFill { owner: boss_entity },
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(phase_color(Phase::One)),
                ));
            });

        commands.spawn((
            BossNameLabel { owner: boss_entity },
            Text::new(format!("BOSS - {}", Phase::One)),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(Color::srgb(0.9, 0.9, 0.9)),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(BOSS_HEALTHBAR_BOTTOM + BOSS_HEALTHBAR_HEIGHT + 8.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-40.0)),
                ..default()
            },
        ));
    }
}

pub(crate) fn update_boss_healthbar(
    mut health_events: MessageReader<BossHealthChangedEvent>,
    mut fill_query: Query<(&BossHealthBarFill, &mut Node)>,
) {
    for event in health_events.read() {
        let percent = event.health as f32 / event.max_health.max(1) as f32;
        for (fill, mut node) in &mut fill_query {
            if fill.owner == event.boss {
                node.width = Val::Percent(percent * 100.0);
            }
        }
    }
}

pub(crate) fn update_boss_phase_display(
    mut phase_events: MessageReader<BossPhaseChangeEvent>,
    mut fill_query: Query<(&BossHealthBarFill, &mut BackgroundColor)>,
    mut label_query: Query<(&BossNameLabel, &mut Text)>,
) {
    for event in phase_events.read() {
        for (fill, mut bg_color) in &mut fill_query {
            if fill.owner == event.boss {
                bg_color.0 = phase_color(event.new_phase);
            }
        }
        for (label, mut text) in &mut label_query {
            if label.owner == event.boss {
                text.0 = format!("BOSS - {}", event.new_phase);
            }
        }
    }
}

pub(crate) fn cleanup_boss_healthbar(
    mut commands: Commands,
    mut concluded_events: MessageReader<EncounterConcludedEvent>,
    bar_query: Query<(Entity, &BossHealthBarUI)>,
    name_query: Query<(Entity, &BossNameLabel)>,
) {
    for event in concluded_events.read() {
        for (bar_entity, bar) in &bar_query {
            if bar.owner == event.boss {
                commands.entity(bar_entity).despawn();
            }
        }
        for (name_entity, label) in &name_query {
            if label.owner == event.boss {
                commands.entity(name_entity).despawn();
            }
        }
    }
}
