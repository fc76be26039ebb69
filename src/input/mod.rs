use glam::Vec3;

use crate::util::picking::Ray;

/// What the host knows about the pointer at the moment of an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// World-space ray from the camera through the pointer.
    pub ray: Ray,
    /// World-space direction the camera is looking.
    pub camera_direction: Vec3,
}

impl PointerInput {
    pub fn new(ray: Ray, camera_direction: Vec3) -> Self {
        Self {
            ray,
            camera_direction: camera_direction.normalize_or_zero(),
        }
    }
}

/// Pointer events the host forwards, one at a time, between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PointerInput),
    Move(PointerInput),
    Up,
}
