use bevy::math::{Quat, Vec2, Vec3};

/// Pitch never leaves ±`MAX_PITCH` degrees, whatever limit is configured.
pub const MAX_PITCH: f32 = 90.0;

/// Pitch of the camera and yaw of the body, both in degrees.
///
/// Positive pitch looks down. Positive yaw turns the body to the right.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraOrientation {
    pitch: f32,
    yaw: f32,
}

impl CameraOrientation {
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Accumulated body yaw, unbounded.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn tick(&mut self, mouse_delta: Vec2, dt: f32, sensitivity: f32, pitch_limit: f32) {
        if !mouse_delta.is_finite() {
            return;
        }
        // NaN limits fall back to the hard bound, negative ones to zero.
        let limit = pitch_limit.min(MAX_PITCH).max(0.0);
        self.pitch -= mouse_delta.y * sensitivity * dt;
        self.pitch = self.pitch.clamp(-limit, limit);
        self.yaw += mouse_delta.x * sensitivity * dt;
    }

    /// Local tilt of the camera relative to the body.
    pub fn camera_tilt(&self) -> Quat {
        Quat::from_rotation_x(-self.pitch.to_radians())
    }

    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    pub fn body_forward(&self) -> Vec3 {
        self.body_rotation() * Vec3::NEG_Z
    }

    pub fn body_right(&self) -> Vec3 {
        self.body_rotation() * Vec3::X
    }

    pub fn camera_forward(&self) -> Vec3 {
        self.body_rotation() * self.camera_tilt() * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_stays_clamped_under_violent_input() {
        let mut camera = CameraOrientation::default();
        let deltas = [250.0, -900.0, 3.0, 1e6, -1e6, 0.5, -42.0];
        for (i, dy) in deltas.iter().cycle().take(500).enumerate() {
            let dt = if i % 3 == 0 { 0.5 } else { 0.016 };
            camera.tick(Vec2::new(1.0, *dy), dt, 500.0, 90.0);
            assert!((-90.0..=90.0).contains(&camera.pitch()), "{}", camera.pitch());
        }
    }

    #[test]
    fn mouse_up_looks_up() {
        let mut camera = CameraOrientation::default();
        camera.tick(Vec2::new(0.0, 0.1), 0.1, 500.0, 90.0);
        assert!(camera.pitch() < 0.0);
        assert!(camera.camera_forward().y > 0.0);
    }

    #[test]
    fn yaw_is_unbounded_and_turns_right() {
        let mut camera = CameraOrientation::default();
        for _ in 0..100 {
            camera.tick(Vec2::new(1.0, 0.0), 0.1, 50.0, 90.0);
        }
        assert!((camera.yaw() - 500.0).abs() < 1e-2);

        let mut quarter = CameraOrientation::default();
        quarter.tick(Vec2::new(1.0, 0.0), 1.0, 90.0, 90.0);
        let forward = quarter.body_forward();
        assert!((forward - Vec3::X).length() < 1e-5, "{forward}");
        assert!((quarter.body_right() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn oversized_or_broken_limits_fall_back_to_the_hard_bound() {
        let mut camera = CameraOrientation::default();
        camera.tick(Vec2::new(0.0, -10.0), 0.05, 500.0, 120.0);
        assert_eq!(camera.pitch(), MAX_PITCH);

        camera.tick(Vec2::new(0.0, 10.0), 0.05, 500.0, f32::NAN);
        assert_eq!(camera.pitch(), -MAX_PITCH);

        camera.tick(Vec2::new(0.0, 1.0), 0.05, 500.0, -1.0);
        assert_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut camera = CameraOrientation::default();
        camera.tick(Vec2::new(f32::NAN, 1.0), 0.1, 500.0, 90.0);
        assert_eq!(camera, CameraOrientation::default());
    }
}
