use glam::{Mat4, Vec3};

/// Orbit camera around a target point, Y-up.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,   // radians, measured from +X towards +Z
    pub pitch: f32, // radians
    pub fov: f32,   // degrees
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_position(Vec3::new(8.0, 4.0, -8.0), Vec3::ZERO)
    }
}

impl Camera {
    /// Camera at `eye` looking at `target`
    pub fn from_position(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let limit = 89.0f32.to_radians();
        Self {
            target,
            distance,
            yaw: offset.z.atan2(offset.x),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-limit, limit),
            fov: 75.0,
            aspect_ratio: 1.0,
            near: 0.1,
            far: 100.0,
            min_distance: 0.5,
            max_distance: 100.0,
        }
    }

    pub fn update_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;

        // Keep clear of the poles so the up vector stays valid
        let limit = 89.0f32.to_radians();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    pub fn get_eye_position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        // Y-up convention
        let offset = Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw) * self.distance;

        self.target + offset
    }

    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.get_eye_position(), self.target, Vec3::Y)
    }

    pub fn set_view(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw = yaw_deg.to_radians();
        self.pitch = pitch_deg.to_radians();
        self.orbit(0.0, 0.0);
    }

    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }

    pub fn fit_to_bounds(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let max_dim = (max - min).max_element();

        self.target = center;

        // distance = (size/2) / tan(fov/2), with a margin
        let fov_rad = self.fov.to_radians();
        let distance = (max_dim * 1.2) / (fov_rad / 2.0).tan();

        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_position_round_trips_eye() {
        let eye = Vec3::new(8.0, 4.0, -8.0);
        let cam = Camera::from_position(eye, Vec3::ZERO);
        assert!((cam.distance - 12.0).abs() < 1e-4);
        assert!(cam.get_eye_position().distance(eye) < 1e-4);
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut cam = Camera::default();
        cam.orbit(0.0, 10.0);
        assert!(cam.pitch <= 89.0f32.to_radians() + 1e-6);
        cam.orbit(0.0, -20.0);
        assert!(cam.pitch >= -89.0f32.to_radians() - 1e-6);
    }

    #[test]
    fn test_fit_to_bounds_targets_center_and_clamps() {
        let mut cam = Camera::default();
        cam.fit_to_bounds(Vec3::ZERO, Vec3::splat(4.0));
        assert_eq!(cam.target, Vec3::splat(2.0));
        assert!(cam.distance > 4.0);

        cam.fit_to_bounds(Vec3::ZERO, Vec3::splat(0.01));
        assert_eq!(cam.distance, cam.min_distance);
    }

    #[test]
    fn test_target_projects_to_center() {
        let cam = Camera::default();
        let clip = cam.view_projection() * cam.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }
}
