use glam::{Mat4, Vec2, Vec3};

use crate::input::PointerInput;
use crate::settings::CameraSettings;
use crate::util::picking::Ray;

/// Perspective orbit camera. Stands in for the host's camera and controls:
/// it supplies the view direction and pointer rays that vertex dragging needs.
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            position: Vec3::from_array(settings.position),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: settings.fov_degrees.to_radians(),
            near: settings.near_plane,
            far: settings.far_plane,
            aspect: 16.0 / 9.0,
        }
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space direction the camera looks along.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Orbit around the target by yaw/pitch deltas (in radians), keeping distance.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let offset = self.position - self.target;
        let distance = offset.length();
        if distance <= 0.0 {
            return;
        }
        let yaw = offset.x.atan2(offset.z) + delta_yaw;
        let pitch = ((offset.y / distance).asin() + delta_pitch)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.position = self.target
            + distance * Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
    }

    /// Everything a pointer event needs: the ray under `screen_pos` and the view direction.
    pub fn pointer_input(&self, screen_pos: Vec2, screen_size: Vec2) -> PointerInput {
        let ray = Ray::from_screen(screen_pos, screen_size, self.view_projection());
        PointerInput::new(ray, self.forward())
    }
}
