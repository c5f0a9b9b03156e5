//! Camera placement for the perspective presets.
//!
//! Two modes are supported: an autonomous orbit whose angle advances by a
//! fixed amount each frame, and a pointer-driven mode that maps the pointer
//! position linearly onto `[-sensitivity, sensitivity]` on both axes.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Angle added to the orbit on every auto-rotated frame (radians).
pub const AUTO_ROTATE_DELTA: f32 = 0.005;

/// Linearly maps `value` from `[start1, stop1]` onto `[start2, stop2]`.
///
/// The result is not clamped.
#[inline]
pub fn map_range(value: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    start2 + (value - start1) / (stop1 - start1) * (stop2 - start2)
}

/// Distance from the scene at which a 60° vertical field of view exactly
/// spans `height`.
#[inline]
pub fn default_eye_depth(height: f32) -> f32 {
    height / (2.0 * (PI / 6.0).tan())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    fn looking_at_origin(x: f32, y: f32, height: f32) -> Self {
        Self {
            eye: Vec3::new(x, y, default_eye_depth(height)),
            center: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Accumulated orbit angle for auto-rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitCamera {
    pub angle: f32,
}

impl OrbitCamera {
    /// Advances the orbit by [`AUTO_ROTATE_DELTA`] and returns the new pose.
    pub fn advance(&mut self, sensitivity: f32, height: f32) -> CameraPose {
        self.angle += AUTO_ROTATE_DELTA;
        CameraPose::looking_at_origin(
            self.angle.sin() * sensitivity,
            self.angle.cos() * sensitivity,
            height,
        )
    }
}

/// Camera pose for the pointer-driven mode.
pub fn pointer_pose(pointer: Vec2, canvas: Vec2, sensitivity: f32) -> CameraPose {
    let x = map_range(pointer.x, 0.0, canvas.x, -sensitivity, sensitivity);
    let y = map_range(pointer.y, 0.0, canvas.y, -sensitivity, sensitivity);
    CameraPose::looking_at_origin(x, y, canvas.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_range_is_linear_and_unclamped() {
        assert_eq!(map_range(0.0, 0.0, 10.0, -1.0, 1.0), -1.0);
        assert_eq!(map_range(5.0, 0.0, 10.0, -1.0, 1.0), 0.0);
        assert_eq!(map_range(10.0, 0.0, 10.0, -1.0, 1.0), 1.0);
        assert_eq!(map_range(20.0, 0.0, 10.0, -1.0, 1.0), 3.0);
    }

    #[test]
    fn pointer_pose_is_symmetric_around_canvas_center() {
        let canvas = Vec2::new(800.0, 600.0);

        let center = pointer_pose(canvas * 0.5, canvas, 800.0);
        assert!(center.eye.x.abs() < 1e-3 && center.eye.y.abs() < 1e-3);

        let corner = pointer_pose(Vec2::ZERO, canvas, 800.0);
        assert_eq!(corner.eye.x, -800.0);
        assert_eq!(corner.eye.y, -800.0);

        let far = pointer_pose(canvas, canvas, 800.0);
        assert_eq!(far.eye.x, 800.0);
        assert_eq!(far.eye.y, 800.0);
    }

    #[test]
    fn pose_looks_at_origin_from_default_depth() {
        let pose = pointer_pose(Vec2::ZERO, Vec2::new(800.0, 600.0), 1.0);
        assert_eq!(pose.center, Vec3::ZERO);
        assert_eq!(pose.up, Vec3::Y);
        assert!((pose.eye.z - 300.0 / (PI / 6.0).tan()).abs() < 1e-3);
    }

    #[test]
    fn orbit_accumulates_fixed_delta() {
        let mut orbit = OrbitCamera::default();
        let mut pose = orbit.advance(100.0, 600.0);
        for _ in 0..9 {
            pose = orbit.advance(100.0, 600.0);
        }

        let expected = 10.0 * AUTO_ROTATE_DELTA;
        assert!((orbit.angle - expected).abs() < 1e-6);
        assert!((pose.eye.x - expected.sin() * 100.0).abs() < 1e-3);
        assert!((pose.eye.y - expected.cos() * 100.0).abs() < 1e-3);
    }
}
