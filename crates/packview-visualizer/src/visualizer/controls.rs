//! Orbit controls: pointer-driven and automatic rotation of the camera
//! around its target, advanced once per frame.

use super::camera::Camera;
use std::f32::consts::TAU;

/// Rotation left after damping that is treated as settled
const SETTLE_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub auto_rotate: bool,
    /// Full turns per minute
    pub auto_rotate_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pending_yaw: f32,
    pending_pitch: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            enable_damping: false,
            damping_factor: 0.05,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a rotation from a pointer drag, in pixels.
    ///
    /// Dragging the full viewport height turns the camera once around.
    pub fn pointer_drag(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_yaw += TAU * dx / viewport_height * self.rotate_speed;
        self.pending_pitch += TAU * dy / viewport_height * self.rotate_speed;
    }

    /// Whether queued rotation is still being applied
    pub fn is_moving(&self) -> bool {
        self.pending_yaw.abs() > SETTLE_EPSILON || self.pending_pitch.abs() > SETTLE_EPSILON
    }

    /// Advance by `dt` seconds. Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) -> bool {
        let mut yaw = 0.0;
        let mut pitch = 0.0;

        if self.auto_rotate {
            yaw += TAU / 60.0 * self.auto_rotate_speed * dt;
        }

        if self.enable_damping {
            let factor = self.damping_factor.clamp(0.0, 1.0);
            yaw += self.pending_yaw * factor;
            pitch += self.pending_pitch * factor;
            self.pending_yaw *= 1.0 - factor;
            self.pending_pitch *= 1.0 - factor;
            if !self.is_moving() {
                self.pending_yaw = 0.0;
                self.pending_pitch = 0.0;
            }
        } else {
            yaw += self.pending_yaw;
            pitch += self.pending_pitch;
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
        }

        if yaw == 0.0 && pitch == 0.0 {
            return false;
        }
        camera.orbit(yaw, pitch);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_controls_do_not_move_camera() {
        let mut controls = OrbitControls::new();
        let mut cam = Camera::default();
        let before = cam.get_eye_position();
        assert!(!controls.update(&mut cam, 1.0 / 60.0));
        assert_eq!(cam.get_eye_position(), before);
    }

    #[test]
    fn test_auto_rotate_full_turn_per_minute_at_speed_one() {
        let mut controls = OrbitControls {
            auto_rotate: true,
            auto_rotate_speed: 1.0,
            ..Default::default()
        };
        let mut cam = Camera::default();
        let yaw0 = cam.yaw;
        controls.update(&mut cam, 15.0);
        assert!((cam.yaw - yaw0 - TAU / 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_drag_applies_at_once_without_damping() {
        let mut controls = OrbitControls::new();
        let mut cam = Camera::default();
        let yaw0 = cam.yaw;
        controls.pointer_drag(100.0, 0.0, 400.0);
        assert!(controls.update(&mut cam, 0.016));
        assert!((cam.yaw - yaw0 - TAU / 4.0).abs() < 1e-4);
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_damping_spreads_rotation_over_frames() {
        let mut controls = OrbitControls {
            enable_damping: true,
            damping_factor: 0.5,
            ..Default::default()
        };
        let mut cam = Camera::default();
        let yaw0 = cam.yaw;
        controls.pointer_drag(100.0, 0.0, 400.0);
        controls.update(&mut cam, 0.016);
        assert!((cam.yaw - yaw0 - TAU / 8.0).abs() < 1e-4);
        assert!(controls.is_moving());
        for _ in 0..64 {
            controls.update(&mut cam, 0.016);
        }
        assert!(!controls.is_moving());
        assert!((cam.yaw - yaw0 - TAU / 4.0).abs() < 1e-3);
    }
}
