use bevy::prelude::*;
use strum_macros::Display;

/// Where the camera gets its pose from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub enum CameraMode {
    /// Parked at one of the preset transforms.
    #[default]
    Fixed,
    /// Chasing a target entity with a positional offset.
    Follow,
}

/// Component for the switchable game camera
#[derive(Component)]
pub struct CameraRig {
    pub mode: CameraMode,
    /// Index into `CameraPresets`, kept in range by wrapping.
    pub preset_index: usize,
    /// Offset from the follow target, world space.
    pub follow_offset: Vec3,
    /// Exponential smoothing speed for follow mode (higher = snappier).
    pub follow_smoothing: f32,
    /// Chase the target's rotation as well. Kept around but off: the fixed
    /// offset already frames the cannonball fine.
    pub follow_rotation: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Fixed,
            preset_index: 0,
            follow_offset: Vec3::new(0.0, 2.5, 6.0),
            follow_smoothing: 8.0,
            follow_rotation: false,
        }
    }
}

/// Ordered list of fixed camera poses.
#[derive(Resource, Default)]
pub struct CameraPresets(pub Vec<Transform>);

/// Entity the camera chases while in follow mode.
#[derive(Component)]
pub struct FollowTarget(pub Entity);

/// Timed move between two camera poses.
#[derive(Component)]
pub struct CameraTransition {
    pub from: Transform,
    pub to: Transform,
    pub timer: Timer,
}

pub const TRANSITION_SECONDS: f32 = 0.35;

#[derive(Message, Debug, Clone, Copy)]
pub enum CameraCommand {
    SetMode(CameraMode),
    SwitchToPreset(usize),
    FollowEntity(Entity),
}

/// Next preset index, wrapping past the end of the list.
pub fn next_index(current: usize, len: usize) -> usize {
    (current + 1) % len
}

/// Previous preset index, wrapping below zero.
pub fn previous_index(current: usize, len: usize) -> usize {
    (current + len - 1) % len
}

/// Cycle through presets with the arrow keys while in fixed mode.
pub fn handle_preset_keys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    presets: Res<CameraPresets>,
    mut camera_query: Query<(Entity, &mut CameraRig, &Transform)>,
) {
    let Ok((entity, mut rig, transform)) = camera_query.single_mut() else {
        return;
    };

    if rig.mode != CameraMode::Fixed || presets.0.is_empty() {
        return;
    }

    let next = if keyboard.just_pressed(KeyCode::ArrowRight) {
        Some(next_index(rig.preset_index, presets.0.len()))
    } else if keyboard.just_pressed(KeyCode::ArrowLeft) {
        Some(previous_index(rig.preset_index, presets.0.len()))
    } else {
        None
    };

    let Some(next) = next else {
        return;
    };

    rig.preset_index = next;
    commands.entity(entity).insert(CameraTransition {
        from: *transform,
        to: presets.0[next],
        timer: Timer::from_seconds(TRANSITION_SECONDS, TimerMode::Once),
    });
}

/// Apply mode/preset/follow requests from other systems.
pub fn apply_camera_commands(
    mut commands: Commands,
    mut messages: MessageReader<CameraCommand>,
    presets: Res<CameraPresets>,
    mut camera_query: Query<(Entity, &mut CameraRig, &Transform)>,
) {
    let Ok((entity, mut rig, transform)) = camera_query.single_mut() else {
        return;
    };

    for command in messages.read() {
        match *command {
            CameraCommand::SetMode(mode) => {
                rig.mode = mode;
                if mode == CameraMode::Follow {
                    // An in-flight preset move would fight the follow system.
                    commands.entity(entity).remove::<CameraTransition>();
                }
            }
            CameraCommand::SwitchToPreset(index) => {
                if index >= presets.0.len() {
                    warn!(
                        "camera preset {index} out of range ({} presets)",
                        presets.0.len()
                    );
                    continue;
                }
                rig.preset_index = index;
                commands.entity(entity).insert(CameraTransition {
                    from: *transform,
                    to: presets.0[index],
                    timer: Timer::from_seconds(TRANSITION_SECONDS, TimerMode::Once),
                });
            }
            CameraCommand::FollowEntity(target) => {
                commands.entity(entity).insert(FollowTarget(target));
            }
        }
    }
}

/// Advance timed preset transitions: lerp position, slerp rotation.
pub fn advance_transitions(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut CameraTransition)>,
) {
    for (entity, mut transform, mut transition) in query.iter_mut() {
        transition.timer.tick(time.delta());

        let t = transition.timer.fraction();
        let eased = t * t * (3.0 - 2.0 * t);
        transform.translation = transition
            .from
            .translation
            .lerp(transition.to.translation, eased);
        transform.rotation = transition.from.rotation.slerp(transition.to.rotation, eased);

        if transition.timer.finished() {
            *transform = transition.to;
            commands.entity(entity).remove::<CameraTransition>();
        }
    }
}

/// In follow mode, exponentially smooth the camera toward the target plus
/// the configured offset.
pub fn follow_target(
    mut commands: Commands,
    time: Res<Time>,
    mut camera_query: Query<(Entity, &mut Transform, &CameraRig, &FollowTarget)>,
    targets: Query<&GlobalTransform, Without<CameraRig>>,
) {
    let Ok((entity, mut transform, rig, follow)) = camera_query.single_mut() else {
        return;
    };

    if rig.mode != CameraMode::Follow {
        return;
    }

    let Ok(target) = targets.get(follow.0) else {
        // Target despawned under us; drop the reference and stay put.
        commands.entity(entity).remove::<FollowTarget>();
        return;
    };

    let desired = target.translation() + rig.follow_offset;
    let smoothing = 1.0 - (-time.delta_secs() * rig.follow_smoothing).exp();
    transform.translation = transform.translation.lerp(desired, smoothing);

    if rig.follow_rotation {
        let target_rotation = Transform::from_translation(transform.translation)
            .looking_at(target.translation(), Vec3::Y)
            .rotation;
        transform.rotation = transform.rotation.slerp(target_rotation, smoothing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_index_wraps_at_end() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(1, 3), 2);
        assert_eq!(next_index(2, 3), 0);
    }

    #[test]
    fn previous_index_wraps_below_zero() {
        assert_eq!(previous_index(0, 3), 2);
        assert_eq!(previous_index(2, 3), 1);
        assert_eq!(previous_index(1, 1), 0);
    }

    #[test]
    fn full_cycle_returns_home() {
        let len = 5;
        let mut index = 0;
        for _ in 0..len {
            index = next_index(index, len);
        }
        assert_eq!(index, 0);
        for _ in 0..len {
            index = previous_index(index, len);
        }
        assert_eq!(index, 0);
    }
}
