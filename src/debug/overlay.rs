use bevy::prelude::*;

use crate::core::system::system_order::PhaseFlowSet;
use crate::monitor::{poll_phase_monitor, PhaseMonitor};

#[derive(Component)]
pub struct PhaseOverlayText;

pub struct PhaseOverlayPlugin;

impl Plugin for PhaseOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, phase_overlay_spawn).add_systems(
            Update,
            phase_overlay_update
                .in_set(PhaseFlowSet::Observe)
                .after(poll_phase_monitor),
        );
    }
}

fn phase_overlay_spawn(mut commands: Commands) {
    // Top-left anchored UI text node; default font, no asset loading.
    commands.spawn((
        Text::new("The application is not running."),
        TextFont {
            font_size: 16.0,
            ..Default::default()
        },
        TextColor(Color::WHITE),
        bevy::ui::Node {
            position_type: bevy::ui::PositionType::Absolute,
            top: Val::Px(4.0),
            left: Val::Px(6.0),
            ..Default::default()
        },
        PhaseOverlayText,
    ));
}

fn phase_overlay_update(
    mut monitor: ResMut<PhaseMonitor>,
    mut q_text: Query<&mut Text, With<PhaseOverlayText>>,
) {
    if !monitor.bypass_change_detection().take_repaint() {
        return;
    }
    let label = monitor.label();
    for mut text in q_text.iter_mut() {
        text.0.clone_from(&label);
    }
}
