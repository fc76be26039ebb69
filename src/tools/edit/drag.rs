use std::collections::BTreeSet;

use glam::Vec3;

use crate::error::EditError;
use crate::input::PointerInput;
use crate::scene::{Mesh, ObjectId};
use crate::util::picking::Plane;

/// One in-progress vertex drag on a single object.
///
/// `indices` is the whole coincidence class of the grabbed vertex, captured at
/// drag start, so welded corners move together. Positions are in the object's
/// local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    object: ObjectId,
    indices: BTreeSet<usize>,
    position: Vec3,
    initial_position: Vec3,
}

impl DragSession {
    /// Open a drag on vertex `index` of `mesh`, grabbed at `world_position`.
    pub fn begin(
        object: ObjectId,
        mesh: &Mesh,
        index: usize,
        world_position: Vec3,
        epsilon: f32,
    ) -> Result<Self, EditError> {
        let indices = mesh.find_coincident(index, epsilon)?;
        let local = mesh.world_to_local(world_position)?;
        Ok(Self {
            object,
            indices,
            position: local,
            initial_position: local,
        })
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn indices(&self) -> &BTreeSet<usize> {
        &self.indices
    }

    /// Current local-space position of the dragged vertices.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    /// Camera-facing plane through the dragged point's current world position.
    ///
    /// Rebuilt every move: both the camera and the object transform may have
    /// changed since the last event.
    pub fn constraint_plane(&self, mesh: &Mesh, camera_direction: Vec3) -> Plane {
        Plane::from_normal_and_point(camera_direction, mesh.local_to_world(self.position))
    }

    /// Resolve the pointer to a new local-space position on the constraint plane.
    pub fn resolve(&self, mesh: &Mesh, pointer: &PointerInput) -> Result<Vec3, EditError> {
        let plane = self.constraint_plane(mesh, pointer.camera_direction);
        let t = pointer
            .ray
            .intersect_plane(&plane)
            .ok_or(EditError::DegenerateIntersection)?;
        mesh.world_to_local(pointer.ray.point_at(t))
    }

    /// Write `local_position` to every vertex in the class and advance the session.
    pub fn apply(&mut self, mesh: &mut Mesh, local_position: Vec3) -> Result<(), EditError> {
        mesh.write_positions(&self.indices, local_position)?;
        self.position = local_position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::primitives::PrimitiveKind;
    use crate::util::picking::Ray;

    fn cube_session(mesh: &Mesh, index: usize) -> DragSession {
        let world = mesh.world_position(index).unwrap();
        DragSession::begin(ObjectId::new(), mesh, index, world, 1e-4).unwrap()
    }

    #[test]
    fn begin_captures_local_start_and_class() {
        let mut cube = PrimitiveKind::Cube.build();
        cube.transform.position = Vec3::new(2.0, 0.0, 0.0);
        let session = cube_session(&cube, 0);
        assert_eq!(session.indices().len(), 3);
        assert!((session.position() - cube.position(0).unwrap()).length() < 1e-6);
        assert_eq!(session.position(), session.initial_position());
    }

    #[test]
    fn resolve_moves_within_camera_plane() {
        let cube = PrimitiveKind::Cube.build();
        let session = cube_session(&cube, 0);
        let start = cube.position(0).unwrap();

        // Camera looks down -Z; pointer ray shifted one unit up in Y.
        let pointer = PointerInput::new(
            Ray::new(start + Vec3::new(0.0, 1.0, 10.0), Vec3::NEG_Z),
            Vec3::NEG_Z,
        );
        let local = session.resolve(&cube, &pointer).unwrap();
        assert!((local - (start + Vec3::Y)).length() < 1e-5);
    }

    #[test]
    fn resolve_converts_into_scaled_local_frame() {
        let mut cube = PrimitiveKind::Cube.build();
        cube.transform.scale = Vec3::new(2.0, 2.0, 2.0);
        let session = cube_session(&cube, 0);
        let world_start = cube.world_position(0).unwrap();

        let pointer = PointerInput::new(
            Ray::new(world_start + Vec3::new(1.0, 0.0, 10.0), Vec3::NEG_Z),
            Vec3::NEG_Z,
        );
        let local = session.resolve(&cube, &pointer).unwrap();
        let expected = cube.position(0).unwrap() + Vec3::new(0.5, 0.0, 0.0);
        assert!((local - expected).length() < 1e-5);
    }

    #[test]
    fn parallel_ray_is_degenerate() {
        let cube = PrimitiveKind::Cube.build();
        let session = cube_session(&cube, 0);
        let pointer = PointerInput::new(Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::X), Vec3::NEG_Z);
        assert_eq!(session.resolve(&cube, &pointer), Err(EditError::DegenerateIntersection));
    }

    #[test]
    fn apply_moves_whole_class() {
        let mut cube = PrimitiveKind::Cube.build();
        let mut session = cube_session(&cube, 0);
        let target = Vec3::new(-1.0, 1.0, 1.0);
        session.apply(&mut cube, target).unwrap();
        for &i in session.indices() {
            assert_eq!(cube.position(i).unwrap(), target);
        }
        assert_eq!(session.position(), target);
        assert_ne!(session.initial_position(), target);
    }
}
