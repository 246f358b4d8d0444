use bevy::prelude::*;

/// Yaw and pitch delta, in degrees, that rotates the `current` facing
/// direction onto the `target` direction.
///
/// Yaw is the signed angle between the horizontal (Y-removed) projections of
/// the two directions, computed as an atan2 difference and normalized to
/// [-180, 180). Pitch is the difference of the arcsine of the Y components.
/// Inputs don't have to be normalized.
pub fn yaw_pitch_between(current: Vec3, target: Vec3) -> (f32, f32) {
    let a = current.normalize_or_zero();
    let b = target.normalize_or_zero();

    let a_horizontal = Vec3::new(a.x, 0.0, a.z).normalize_or_zero();
    let b_horizontal = Vec3::new(b.x, 0.0, b.z).normalize_or_zero();

    // A degenerate horizontal projection (straight up/down) has no heading;
    // yaw is zero rather than NaN or the other vector's raw heading.
    let yaw = if a_horizontal == Vec3::ZERO || b_horizontal == Vec3::ZERO {
        0.0
    } else {
        b_horizontal.z.atan2(b_horizontal.x) - a_horizontal.z.atan2(a_horizontal.x)
    };
    let pitch = b.y.clamp(-1.0, 1.0).asin() - a.y.clamp(-1.0, 1.0).asin();

    (normalize_yaw(yaw.to_degrees()), pitch.to_degrees())
}

/// Wraps a yaw angle in degrees into [-180, 180).
fn normalize_yaw(mut yaw: f32) -> f32 {
    if yaw >= 180.0 {
        yaw -= 360.0;
    }
    if yaw < -180.0 {
        yaw += 360.0;
    }
    yaw
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn parallel_directions_are_zero() {
        let (yaw, pitch) = yaw_pitch_between(Vec3::new(0.3, 0.5, -0.7), Vec3::new(0.3, 0.5, -0.7));
        assert!(yaw.abs() < EPSILON, "yaw was {yaw}");
        assert!(pitch.abs() < EPSILON, "pitch was {pitch}");
    }

    #[test]
    fn perpendicular_horizontal_directions_are_ninety() {
        let (yaw, pitch) = yaw_pitch_between(Vec3::X, Vec3::Z);
        assert!((yaw - 90.0).abs() < EPSILON, "yaw was {yaw}");
        assert!(pitch.abs() < EPSILON);

        let (yaw, _) = yaw_pitch_between(Vec3::X, Vec3::NEG_Z);
        assert!((yaw + 90.0).abs() < EPSILON, "yaw was {yaw}");
    }

    #[test]
    fn pitch_from_elevated_target() {
        let elevated = Vec3::new(0.0, std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2);
        let (yaw, pitch) = yaw_pitch_between(Vec3::Z, elevated);
        assert!(yaw.abs() < EPSILON, "yaw was {yaw}");
        assert!((pitch - 45.0).abs() < 1e-3, "pitch was {pitch}");
    }

    #[test]
    fn yaw_always_in_half_open_range() {
        for i in 0..72 {
            let angle = i as f32 * 5.0_f32.to_radians();
            let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
            let (yaw, _) = yaw_pitch_between(Vec3::NEG_X, dir);
            assert!(
                (-180.0..180.0).contains(&yaw),
                "yaw {yaw} out of range for step {i}"
            );
        }
    }

    #[test]
    fn opposite_directions_wrap_to_minus_180() {
        let (yaw, _) = yaw_pitch_between(Vec3::X, Vec3::NEG_X);
        assert!((yaw + 180.0).abs() < EPSILON, "yaw was {yaw}");
    }

    #[test]
    fn straight_up_target_has_no_yaw() {
        let (yaw, pitch) = yaw_pitch_between(Vec3::Z, Vec3::Y);
        assert!(yaw.abs() < EPSILON);
        assert!((pitch - 90.0).abs() < 1e-3, "pitch was {pitch}");
    }

    #[test]
    fn unnormalized_inputs_are_fine() {
        let (yaw, pitch) = yaw_pitch_between(Vec3::X * 15.0, Vec3::Z * 0.01);
        assert!((yaw - 90.0).abs() < EPSILON);
        assert!(pitch.abs() < EPSILON);
    }
}
