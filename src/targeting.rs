use avian3d::prelude::*;
use bevy::prelude::*;

use crate::aim;
use crate::assets::MyStates;
use crate::shoot::{FireCommand, ShotState};
use crate::turret::{AimAdjust, Turret};

/// Node-name filter for clickable things; anything else the ray touches is
/// ignored.
pub const TARGET_NAME: &str = "Target";

const MAX_RAY_DISTANCE: f32 = 500.0;

pub struct TargetingPlugin;

impl Plugin for TargetingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_click.run_if(in_state(MyStates::Next)));
    }
}

/// Click → camera ray → physics raycast → aim correction + fire.
#[allow(clippy::too_many_arguments)]
pub fn handle_click(
    mouse: Res<ButtonInput<MouseButton>>,
    state: Res<ShotState>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    spatial_query: SpatialQuery,
    names: Query<&Name>,
    parents: Query<&ChildOf>,
    turret_query: Query<&Turret>,
    node_transforms: Query<&GlobalTransform>,
    mut aim_writer: MessageWriter<AimAdjust>,
    mut fire_writer: MessageWriter<FireCommand>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    if !state.sequence.is_idle() {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        error!("no camera to cast the aim ray from");
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    let Some(hit) = spatial_query.cast_ray(
        ray.origin,
        ray.direction,
        MAX_RAY_DISTANCE,
        true,
        &SpatialQueryFilter::default(),
    ) else {
        info!("aim ray hit nothing");
        return;
    };

    if !is_named_target(hit.entity, &names, &parents) {
        let name = names
            .get(hit.entity)
            .map(|n| n.as_str().to_owned())
            .unwrap_or_else(|_| format!("{:?}", hit.entity));
        info!("aim ray hit non-target {name}");
        return;
    }

    let hit_point = ray.origin + *ray.direction * hit.distance;

    let Ok(turret) = turret_query.single() else {
        return;
    };
    // The pitch pivot sits on the yaw axis, so its world position never
    // changes with the turret angles and a frame-old value is exact.
    let Ok(pivot) = node_transforms.get(turret.pitch_node) else {
        return;
    };

    let muzzle = turret.muzzle_position(pivot.translation());
    let target_direction = (hit_point - muzzle).normalize_or_zero();
    let facing = turret.facing();

    let (yaw, pitch) = aim::yaw_pitch_between(facing, target_direction);
    info!("hit at {hit_point:?}; correcting yaw {yaw:+.1} pitch {pitch:+.1}");

    aim_writer.write(AimAdjust { yaw, pitch });
    fire_writer.write(FireCommand);
}

/// The hit entity or any of its ancestors must carry the target name;
/// colliders usually sit on child meshes.
fn is_named_target(entity: Entity, names: &Query<&Name>, parents: &Query<&ChildOf>) -> bool {
    if names.get(entity).is_ok_and(|n| n.as_str() == TARGET_NAME) {
        return true;
    }
    parents
        .iter_ancestors(entity)
        .any(|ancestor| names.get(ancestor).is_ok_and(|n| n.as_str() == TARGET_NAME))
}
