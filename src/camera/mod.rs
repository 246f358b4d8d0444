pub mod switcher;

pub use switcher::*;

use bevy::prelude::*;

use crate::assets::MyStates;

/// Plugin for the preset/follow camera rig
pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CameraCommand>();
        app.add_systems(
            Update,
            (
                switcher::handle_preset_keys,
                switcher::apply_camera_commands,
                switcher::advance_transitions,
                switcher::follow_target,
            )
                .chain()
                .run_if(in_state(MyStates::Next)),
        );
    }
}
