pub mod controller;

pub use controller::*;

use bevy::prelude::*;

use crate::assets::MyStates;

/// Plugin for the two-axis turret
pub struct TurretPlugin;

impl Plugin for TurretPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AimAdjust>();
        app.add_observer(controller::sync_turret_to_nodes);
        app.add_systems(
            Update,
            (
                controller::handle_turret_keys,
                controller::apply_aim_adjust,
                controller::apply_turret_rotation,
            )
                .chain()
                .run_if(in_state(MyStates::Next)),
        );
    }
}
