use bevy::prelude::*;

/// Two-axis turret state. `yaw` is the horizontal heading of the barrel in
/// degrees, measured in the `atan2(z, x)` sense; `pitch` is its elevation
/// above the horizon in degrees, always within [min_pitch, max_pitch]. The
/// barrel points (and fires) along the pitch node's local +X.
///
/// These are the same angle conventions `aim::yaw_pitch_between` reports, so
/// its deltas apply directly.
#[derive(Component, Debug)]
pub struct Turret {
    pub yaw_node: Entity,
    pub pitch_node: Entity,
    pub yaw: f32,
    pub pitch: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Degrees per key press.
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    /// Distance from the pitch pivot to the muzzle, along the barrel.
    pub muzzle_offset: f32,
}

impl Turret {
    pub fn new(yaw_node: Entity, pitch_node: Entity) -> Self {
        Self {
            yaw_node,
            pitch_node,
            yaw: 0.0,
            pitch: 0.0,
            min_pitch: -30.0,
            max_pitch: 60.0,
            yaw_speed: 1.0,
            pitch_speed: 1.0,
            muzzle_offset: 1.6,
        }
    }

    pub fn adjust_yaw(&mut self, delta: f32) {
        self.yaw += delta;
    }

    /// The single mutation point for pitch; the clamp holds no matter who
    /// asked for the change.
    pub fn adjust_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(self.min_pitch, self.max_pitch);
    }

    /// World-space firing direction for the current angles.
    ///
    /// `from_rotation_y` turns headings the other way round, hence the
    /// negation: heading(facing) == yaw must hold for aim deltas to land.
    pub fn facing(&self) -> Vec3 {
        Quat::from_rotation_y(-self.yaw.to_radians())
            * Quat::from_rotation_z(self.pitch.to_radians())
            * Vec3::X
    }

    /// Where the cannonball leaves the barrel, given the pitch pivot's world
    /// position.
    pub fn muzzle_position(&self, pivot: Vec3) -> Vec3 {
        pivot + self.facing() * self.muzzle_offset
    }
}

/// One-shot externally requested aim delta, in degrees.
#[derive(Message, Debug, Clone, Copy)]
pub struct AimAdjust {
    pub yaw: f32,
    pub pitch: f32,
}

/// Initialize the angles from the authored rotations of the two nodes, so a
/// barrel spawned pre-tilted down-range starts from that orientation rather
/// than from zero.
pub fn sync_turret_to_nodes(
    on: On<Add, Turret>,
    mut turret_query: Query<&mut Turret>,
    transforms: Query<&Transform>,
) {
    let Ok(mut turret) = turret_query.get_mut(on.event_target()) else {
        return;
    };

    if let Ok(yaw_transform) = transforms.get(turret.yaw_node) {
        let (y_angle, _, _) = yaw_transform.rotation.to_euler(EulerRot::YXZ);
        turret.yaw = -y_angle.to_degrees();
    }
    if let Ok(pitch_transform) = transforms.get(turret.pitch_node) {
        let (z_angle, _, _) = pitch_transform.rotation.to_euler(EulerRot::ZYX);
        let authored = z_angle.to_degrees();
        turret.pitch = authored.clamp(turret.min_pitch, turret.max_pitch);
    }
}

/// A/D nudge yaw, W/S nudge pitch, one step per key press.
pub fn handle_turret_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut turret_query: Query<&mut Turret>,
) {
    let Ok(mut turret) = turret_query.single_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyD) {
        let step = -turret.yaw_speed;
        turret.adjust_yaw(step);
    }
    if keyboard.just_pressed(KeyCode::KeyA) {
        let step = turret.yaw_speed;
        turret.adjust_yaw(step);
    }
    if keyboard.just_pressed(KeyCode::KeyW) {
        let step = turret.pitch_speed;
        turret.adjust_pitch(step);
    }
    if keyboard.just_pressed(KeyCode::KeyS) {
        let step = -turret.pitch_speed;
        turret.adjust_pitch(step);
    }
}

/// Apply raycast-derived aim corrections.
pub fn apply_aim_adjust(
    mut messages: MessageReader<AimAdjust>,
    mut turret_query: Query<&mut Turret>,
) {
    let Ok(mut turret) = turret_query.single_mut() else {
        return;
    };

    for adjust in messages.read() {
        turret.adjust_yaw(adjust.yaw);
        turret.adjust_pitch(adjust.pitch);
    }
}

/// Write the current angles onto the two rotation nodes.
pub fn apply_turret_rotation(
    turret_query: Query<&Turret, Changed<Turret>>,
    mut transforms: Query<&mut Transform>,
) {
    for turret in turret_query.iter() {
        if let Ok(mut yaw_transform) = transforms.get_mut(turret.yaw_node) {
            yaw_transform.rotation = Quat::from_rotation_y(-turret.yaw.to_radians());
        }
        if let Ok(mut pitch_transform) = transforms.get_mut(turret.pitch_node) {
            pitch_transform.rotation = Quat::from_rotation_z(turret.pitch.to_radians());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn test_turret() -> Turret {
        Turret::new(Entity::PLACEHOLDER, Entity::PLACEHOLDER)
    }

    #[test]
    fn pitch_clamps_against_monotonic_increase() {
        let mut turret = test_turret();
        for _ in 0..200 {
            turret.adjust_pitch(1.0);
            assert!(turret.pitch <= turret.max_pitch);
        }
        assert_eq!(turret.pitch, turret.max_pitch);
    }

    #[test]
    fn pitch_clamps_against_monotonic_decrease() {
        let mut turret = test_turret();
        for _ in 0..200 {
            turret.adjust_pitch(-2.5);
            assert!(turret.pitch >= turret.min_pitch);
        }
        assert_eq!(turret.pitch, turret.min_pitch);
    }

    #[test]
    fn pitch_clamps_single_large_external_delta() {
        // The raycast path feeds arbitrary one-shot deltas; the clamp must
        // hold there too.
        let mut turret = test_turret();
        turret.adjust_pitch(400.0);
        assert_eq!(turret.pitch, turret.max_pitch);
        turret.adjust_pitch(-400.0);
        assert_eq!(turret.pitch, turret.min_pitch);
    }

    #[test]
    fn yaw_is_unclamped() {
        let mut turret = test_turret();
        turret.adjust_yaw(400.0);
        assert_eq!(turret.yaw, 400.0);
    }

    #[test]
    fn facing_matches_angle_conventions() {
        let mut turret = test_turret();
        turret.yaw = -90.0;
        turret.pitch = 0.0;
        // heading -90 is -Z, level with the horizon
        assert!(turret.facing().abs_diff_eq(Vec3::NEG_Z, 1e-5));

        turret.pitch = 30.0;
        let facing = turret.facing();
        assert!((facing.y - 30f32.to_radians().sin()).abs() < 1e-5);
        assert!((facing.z.atan2(facing.x).to_degrees() + 90.0).abs() < 1e-3);
    }

    #[test]
    fn click_correction_aims_barrel_at_target() {
        // Scene-shaped numbers: muzzle up on the turret, target block down
        // range and off to the side.
        let mut turret = test_turret();
        turret.yaw = -90.0;
        turret.pitch = 10.0;

        let muzzle = Vec3::new(0.0, 2.1, 12.0);
        let hit_point = Vec3::new(-6.0, 1.95, -10.5);
        let target_direction = (hit_point - muzzle).normalize();

        let (yaw, pitch) = crate::aim::yaw_pitch_between(turret.facing(), target_direction);
        turret.adjust_yaw(yaw);
        turret.adjust_pitch(pitch);

        let error = turret.facing().angle_between(target_direction).to_degrees();
        assert!(error < 0.1, "post-correction facing off by {error} degrees");
        assert!(turret.pitch > turret.min_pitch && turret.pitch < turret.max_pitch);
    }

    #[test]
    fn correction_is_idempotent_for_reachable_targets() {
        let mut turret = test_turret();
        turret.yaw = -90.0;
        turret.pitch = 0.0;

        let target_direction = Vec3::new(0.2, 0.05, -1.0).normalize();
        let (yaw, pitch) = crate::aim::yaw_pitch_between(turret.facing(), target_direction);
        turret.adjust_yaw(yaw);
        turret.adjust_pitch(pitch);

        // A second click on the same point must produce a ~zero delta.
        let (yaw, pitch) = crate::aim::yaw_pitch_between(turret.facing(), target_direction);
        assert!(yaw.abs() < 1e-3, "residual yaw {yaw}");
        assert!(pitch.abs() < 1e-3, "residual pitch {pitch}");
    }

    #[test]
    fn turret_starts_from_authored_node_rotations() {
        let mut world = World::new();
        world.add_observer(sync_turret_to_nodes);

        let yaw_node = world
            .spawn(Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2)))
            .id();
        let pitch_node = world
            .spawn(Transform::from_rotation(Quat::from_rotation_z(
                10f32.to_radians(),
            )))
            .id();
        let turret_entity = world.spawn(Turret::new(yaw_node, pitch_node)).id();

        let turret = world.get::<Turret>(turret_entity).unwrap();
        assert!((turret.yaw + 90.0).abs() < 1e-3, "yaw was {}", turret.yaw);
        assert!((turret.pitch - 10.0).abs() < 1e-3, "pitch was {}", turret.pitch);
    }

    #[test]
    fn muzzle_position_sits_on_the_barrel_axis() {
        let mut turret = test_turret();
        turret.yaw = -90.0;
        turret.pitch = 0.0;
        let pivot = Vec3::new(0.0, 1.0, 12.0);
        let muzzle = turret.muzzle_position(pivot);
        assert!(muzzle.abs_diff_eq(Vec3::new(0.0, 1.0, 12.0 - turret.muzzle_offset), 1e-5));
    }
}
