use std::collections::BTreeSet;

use glam::{Mat4, Vec3};

use crate::error::EditError;
use crate::scene::object::{Material, Transform};

/// Distance under which two vertices count as the same point.
pub const COINCIDENCE_EPSILON: f32 = 1e-4;

/// Triangle mesh with a fixed-length vertex buffer.
///
/// Positions are edited in place; vertices are never inserted or removed, so an
/// index stays valid for the life of the mesh.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    /// Triangle list. `None` means every three consecutive vertices form a triangle.
    indices: Option<Vec<u32>>,
    pub transform: Transform,
    pub material: Material,
    /// Bumped on every normal recompute so the renderer knows to re-upload.
    normals_revision: u64,
}

impl Mesh {
    /// Build a mesh from raw buffers with an identity transform and default material.
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        let mut mesh = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
            transform: Transform::default(),
            material: Material::default(),
            normals_revision: 0,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn normals_revision(&self) -> u64 {
        self.normals_revision
    }

    pub fn position(&self, index: usize) -> Result<Vec3, EditError> {
        self.positions.get(index).copied().ok_or(EditError::VertexOutOfRange {
            index,
            count: self.positions.len(),
        })
    }

    /// All vertices whose local position lies strictly within `epsilon` of vertex `index`.
    ///
    /// Linear scan over the whole buffer. Only meant to run once per drag start.
    /// The result always contains `index` itself.
    pub fn find_coincident(&self, index: usize, epsilon: f32) -> Result<BTreeSet<usize>, EditError> {
        let target = self.position(index)?;
        let mut found: BTreeSet<usize> = self
            .positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.distance(target) < epsilon)
            .map(|(i, _)| i)
            .collect();
        // A non-positive epsilon would otherwise exclude the query vertex.
        found.insert(index);
        Ok(found)
    }

    /// Move every vertex in `indices` to `local_position`, then recompute all normals.
    ///
    /// Validates every index before writing anything, so a bad index leaves the
    /// buffer untouched.
    pub fn write_positions<'a>(
        &mut self,
        indices: impl IntoIterator<Item = &'a usize> + Clone,
        local_position: Vec3,
    ) -> Result<(), EditError> {
        let count = self.positions.len();
        if let Some(&index) = indices.clone().into_iter().find(|&&i| i >= count) {
            return Err(EditError::VertexOutOfRange { index, count });
        }
        for &i in indices {
            self.positions[i] = local_position;
        }
        self.compute_vertex_normals();
        Ok(())
    }

    /// Full normal recompute.
    ///
    /// Indexed meshes accumulate area-weighted face normals per shared vertex.
    /// Non-indexed meshes give each triangle's corners that triangle's normal.
    pub fn compute_vertex_normals(&mut self) {
        self.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);

        match &self.indices {
            Some(indices) => {
                for tri in indices.chunks_exact(3) {
                    let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                    if a >= self.positions.len() || b >= self.positions.len() || c >= self.positions.len() {
                        continue;
                    }
                    let face = face_normal_unnormalized(self.positions[a], self.positions[b], self.positions[c]);
                    self.normals[a] += face;
                    self.normals[b] += face;
                    self.normals[c] += face;
                }
            }
            None => {
                for (tri, normals) in self.positions.chunks_exact(3).zip(self.normals.chunks_exact_mut(3)) {
                    let face = face_normal_unnormalized(tri[0], tri[1], tri[2]);
                    normals.iter_mut().for_each(|n| *n = face);
                }
            }
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
        self.normals_revision += 1;
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// Map a world-space point into this mesh's local frame using its current transform.
    pub fn world_to_local(&self, world_point: Vec3) -> Result<Vec3, EditError> {
        let matrix = self.world_matrix();
        if matrix.determinant() == 0.0 {
            return Err(EditError::SingularTransform);
        }
        let inverse = matrix.inverse();
        if !inverse.is_finite() {
            return Err(EditError::SingularTransform);
        }
        Ok(inverse.transform_point3(world_point))
    }

    pub fn local_to_world(&self, local_point: Vec3) -> Vec3 {
        self.world_matrix().transform_point3(local_point)
    }

    pub fn world_position(&self, index: usize) -> Result<Vec3, EditError> {
        Ok(self.local_to_world(self.position(index)?))
    }
}

fn face_normal_unnormalized(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (c - b).cross(a - b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_corners() -> Mesh {
        let mut positions = Vec::new();
        for x in [-0.5, 0.5] {
            for y in [-0.5, 0.5] {
                for z in [-0.5, 0.5] {
                    positions.push(Vec3::new(x, y, z));
                }
            }
        }
        // Two triangles per face, index layout doesn't matter for coincidence.
        let indices = vec![
            0, 1, 3, 0, 3, 2, 4, 6, 7, 4, 7, 5, 0, 4, 5, 0, 5, 1,
            2, 3, 7, 2, 7, 6, 0, 2, 6, 0, 6, 4, 1, 5, 7, 1, 7, 3,
        ];
        Mesh::new(positions, Some(indices))
    }

    #[test]
    fn distinct_corners_are_not_coincident() {
        let mesh = unit_cube_corners();
        let found = mesh.find_coincident(0, COINCIDENCE_EPSILON).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn coincidence_respects_epsilon() {
        let near = Mesh::new(vec![Vec3::ZERO, Vec3::new(1e-5, 0.0, 0.0), Vec3::X], None);
        let found = near.find_coincident(0, COINCIDENCE_EPSILON).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![0, 1]);

        let far = Mesh::new(vec![Vec3::ZERO, Vec3::new(1e-3, 0.0, 0.0), Vec3::X], None);
        let found = far.find_coincident(0, COINCIDENCE_EPSILON).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn coincidence_class_is_the_same_from_any_member() {
        let p = Vec3::new(0.25, -1.0, 3.0);
        let mesh = Mesh::new(vec![p, Vec3::ONE, p, Vec3::ZERO, p, Vec3::NEG_ONE], None);
        let from_first = mesh.find_coincident(0, COINCIDENCE_EPSILON).unwrap();
        let from_last = mesh.find_coincident(4, COINCIDENCE_EPSILON).unwrap();
        assert_eq!(from_first, from_last);
        assert_eq!(from_first.into_iter().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn coincidence_rejects_out_of_range_index() {
        let mesh = unit_cube_corners();
        assert_eq!(
            mesh.find_coincident(8, COINCIDENCE_EPSILON),
            Err(EditError::VertexOutOfRange { index: 8, count: 8 })
        );
    }

    #[test]
    fn write_positions_is_idempotent_and_recomputes_each_time() {
        let mut mesh = unit_cube_corners();
        let target = Vec3::new(1.0, 2.0, 3.0);
        let indices = [0usize, 1];

        let rev0 = mesh.normals_revision();
        mesh.write_positions(&indices, target).unwrap();
        let after_first = mesh.positions().to_vec();
        let normals_first = mesh.normals().to_vec();
        mesh.write_positions(&indices, target).unwrap();

        assert_eq!(mesh.positions(), after_first.as_slice());
        assert_eq!(mesh.normals(), normals_first.as_slice());
        assert_eq!(mesh.normals_revision(), rev0 + 2);
        assert_eq!(mesh.position(0).unwrap(), target);
        assert_eq!(mesh.position(1).unwrap(), target);
    }

    #[test]
    fn write_positions_with_bad_index_leaves_buffer_alone() {
        let mut mesh = unit_cube_corners();
        let before = mesh.positions().to_vec();
        let result = mesh.write_positions(&[0usize, 42], Vec3::splat(9.0));
        assert!(matches!(result, Err(EditError::VertexOutOfRange { index: 42, .. })));
        assert_eq!(mesh.positions(), before.as_slice());
    }

    #[test]
    fn non_indexed_triangle_normals_face_outward() {
        // Counter-clockwise in the XY plane, seen from +Z.
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None);
        for n in mesh.normals() {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn world_local_round_trip_uses_current_transform() {
        let mut mesh = unit_cube_corners();
        mesh.transform.position = Vec3::new(1.0, 0.0, 0.0);
        mesh.transform.scale = Vec3::new(2.0, 1.0, 1.0);
        let local = mesh.world_to_local(Vec3::new(3.0, 0.0, 0.0)).unwrap();
        assert!((local - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);

        mesh.transform.position = Vec3::ZERO;
        let local = mesh.world_to_local(Vec3::new(3.0, 0.0, 0.0)).unwrap();
        assert!((local - Vec3::new(1.5, 0.0, 0.0)).length() < 1e-6);
        assert!((mesh.local_to_world(local) - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn zero_scale_is_reported_as_singular() {
        let mut mesh = unit_cube_corners();
        mesh.transform.scale = Vec3::new(0.0, 1.0, 1.0);
        assert_eq!(mesh.world_to_local(Vec3::ONE), Err(EditError::SingularTransform));
    }

    #[test]
    fn tiny_scale_still_round_trips() {
        let mut mesh = unit_cube_corners();
        mesh.transform.scale = Vec3::splat(0.004);
        mesh.transform.position = Vec3::new(0.0, 1.0, 0.0);
        for i in 0..mesh.vertex_count() {
            let world = mesh.world_position(i).unwrap();
            let local = mesh.world_to_local(world).unwrap();
            assert!((local - mesh.position(i).unwrap()).length() < 1e-4);
        }
    }

    #[test]
    fn vertices_exactly_epsilon_apart_are_not_coincident() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), Vec3::Y], None);
        let found = mesh.find_coincident(0, 0.5).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![0]);
    }
}
