use std::fmt;

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scene::mesh::Mesh;

/// Stable, opaque handle for an object in the scene graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Translation, XYZ Euler rotation (radians) and non-uniform scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// Surface appearance of a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// sRGB components in 0..1.
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
}

pub const DEFAULT_COLOR: u32 = 0x44aa88;

impl Default for Material {
    fn default() -> Self {
        Self {
            color: rgb_from_hex(DEFAULT_COLOR),
            opacity: 1.0,
            transparent: false,
        }
    }
}

impl Material {
    pub fn hex(&self) -> String {
        let [r, g, b] = self.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Opacity is clamped to 0..1; anything below fully opaque turns on blending.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.opacity < 1.0;
    }
}

pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Kinds of thing the scene can hold.
///
/// Vertex editing only exists for the `Mesh` arm.
#[derive(Clone, Debug)]
pub enum Renderable {
    Mesh(Mesh),
    /// Transform-only placeholder with no geometry.
    Empty(Transform),
}

impl Renderable {
    pub fn transform(&self) -> &Transform {
        match self {
            Renderable::Mesh(mesh) => &mesh.transform,
            Renderable::Empty(transform) => transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Renderable::Mesh(mesh) => &mut mesh.transform,
            Renderable::Empty(transform) => transform,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Renderable::Mesh(mesh) => Some(mesh),
            Renderable::Empty(_) => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            Renderable::Mesh(mesh) => Some(mesh),
            Renderable::Empty(_) => None,
        }
    }
}

/// An entry in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub visible: bool,
    pub renderable: Renderable,
}

impl SceneObject {
    pub fn new(renderable: Renderable, name: String) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            visible: true,
            renderable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_matches_default_hex() {
        assert_eq!(Material::default().hex(), "#44aa88");
    }

    #[test]
    fn opacity_below_one_enables_transparency() {
        let mut material = Material::default();
        material.set_opacity(0.4);
        assert!(material.transparent);
        material.set_opacity(3.0);
        assert_eq!(material.opacity, 1.0);
        assert!(!material.transparent);
    }

    #[test]
    fn euler_rotation_is_applied_x_then_y_then_z() {
        let t = Transform {
            rotation: Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            ..Default::default()
        };
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-6);
    }
}
