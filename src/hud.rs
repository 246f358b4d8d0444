use bevy::prelude::*;

use crate::assets::MyStates;
use crate::camera::CameraRig;
use crate::turret::Turret;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(MyStates::Next), spawn_hud)
            .add_systems(Update, update_hud.run_if(in_state(MyStates::Next)));
    }
}

#[derive(Component)]
struct HudReadout;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        HudReadout,
        Name::new("HUD Readout"),
        GlobalZIndex(10),
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.9, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        },
    ));
}

fn update_hud(
    mut readouts: Query<&mut Text, With<HudReadout>>,
    camera_query: Query<&CameraRig>,
    turret_query: Query<&Turret>,
) {
    let Ok(mut text) = readouts.single_mut() else {
        return;
    };
    let Ok(rig) = camera_query.single() else {
        return;
    };
    let Ok(turret) = turret_query.single() else {
        return;
    };

    text.0 = format!(
        "camera: {} (preset {})\nyaw {:+.1}  pitch {:+.1}",
        rig.mode, rig.preset_index, turret.yaw, turret.pitch
    );
}
