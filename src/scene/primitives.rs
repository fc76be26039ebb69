use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::scene::mesh::Mesh;

/// Built-in shapes the toolbar can add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Tetrahedron,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 5] = [
        PrimitiveKind::Cube,
        PrimitiveKind::Sphere,
        PrimitiveKind::Cylinder,
        PrimitiveKind::Cone,
        PrimitiveKind::Tetrahedron,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "Cube",
            PrimitiveKind::Sphere => "Sphere",
            PrimitiveKind::Cylinder => "Cylinder",
            PrimitiveKind::Cone => "Cone",
            PrimitiveKind::Tetrahedron => "Tetrahedron",
        }
    }

    /// Build the shape at the origin with default material and identity transform.
    pub fn build(self) -> Mesh {
        match self {
            PrimitiveKind::Cube => generate_box(Vec3::ONE),
            PrimitiveKind::Sphere => generate_sphere(0.5, 32, 32),
            PrimitiveKind::Cylinder => generate_cylinder(0.5, 0.5, 1.0, 32),
            PrimitiveKind::Cone => generate_cylinder(0.0, 0.5, 1.0, 32),
            PrimitiveKind::Tetrahedron => generate_tetrahedron(0.5),
        }
    }
}

/// Box with four unshared vertices per side, so each corner appears three times.
pub fn generate_box(size: Vec3) -> Mesh {
    let h = size * 0.5;
    // (normal, right, up) with right x up == normal
    let sides = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, right, up) in sides {
        let center = normal * h;
        let r = right * h;
        let u = up * h;
        let base = positions.len() as u32;
        // top-left, top-right, bottom-left, bottom-right
        positions.extend_from_slice(&[center - r + u, center + r + u, center - r - u, center + r - u]);
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 2, base + 3, base + 1]);
    }

    Mesh::new(positions, Some(indices))
}

/// UV sphere. The seam column and the pole rows are duplicated vertices.
pub fn generate_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let columns = width_segments + 1;
    let mut positions = Vec::with_capacity(columns * (height_segments + 1));

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            positions.push(Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            ));
        }
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = (iy * columns + ix + 1) as u32;
            let b = (iy * columns + ix) as u32;
            let c = ((iy + 1) * columns + ix) as u32;
            let d = ((iy + 1) * columns + ix + 1) as u32;
            // Pole rows collapse to a single triangle per segment.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh::new(positions, Some(indices))
}

/// Capped cylinder along Y. A zero top radius gives a cone with no top cap.
pub fn generate_cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: usize) -> Mesh {
    let radial_segments = radial_segments.max(3);
    let half_h = height * 0.5;
    let ring = radial_segments + 1;
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    // Top rim then bottom rim, each closing the seam with a repeated vertex.
    for (radius, y) in [(radius_top, half_h), (radius_bottom, -half_h)] {
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            positions.push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
        }
    }

    for x in 0..radial_segments {
        let a = x as u32;
        let b = (ring + x) as u32;
        let c = (ring + x + 1) as u32;
        let d = (x + 1) as u32;
        if radius_top > 0.0 {
            indices.extend_from_slice(&[a, b, d]);
        }
        if radius_bottom > 0.0 {
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    if radius_top > 0.0 {
        push_cap(&mut positions, &mut indices, radius_top, half_h, radial_segments, true);
    }
    if radius_bottom > 0.0 {
        push_cap(&mut positions, &mut indices, radius_bottom, -half_h, radial_segments, false);
    }

    Mesh::new(positions, Some(indices))
}

fn push_cap(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>, radius: f32, y: f32, segments: usize, top: bool) {
    // One center vertex per segment so each wedge keeps its own normal.
    let center_start = positions.len() as u32;
    for _ in 0..segments {
        positions.push(Vec3::new(0.0, y, 0.0));
    }
    let rim_start = positions.len() as u32;
    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        positions.push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
    }
    for x in 0..segments as u32 {
        let c = center_start + x;
        let i = rim_start + x;
        if top {
            indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/// Regular tetrahedron, non-indexed: every face owns its three corners.
pub fn generate_tetrahedron(radius: f32) -> Mesh {
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];
    let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

    let positions = faces
        .iter()
        .flat_map(|face| face.iter().map(|&i| corners[i].normalize() * radius))
        .collect();

    Mesh::new(positions, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::COINCIDENCE_EPSILON;

    #[test]
    fn vertex_counts_match_tessellation() {
        assert_eq!(PrimitiveKind::Cube.build().vertex_count(), 24);
        assert_eq!(PrimitiveKind::Sphere.build().vertex_count(), 33 * 33);
        assert_eq!(PrimitiveKind::Cylinder.build().vertex_count(), 66 + 65 * 2);
        assert_eq!(PrimitiveKind::Cone.build().vertex_count(), 66 + 65);
        assert_eq!(PrimitiveKind::Tetrahedron.build().vertex_count(), 12);
    }

    #[test]
    fn too_few_segments_are_clamped() {
        let sphere = generate_sphere(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 4 * 3);
        assert!(sphere.positions().iter().all(|p| p.is_finite()));

        let cylinder = generate_cylinder(1.0, 1.0, 1.0, 0);
        assert_eq!(cylinder.vertex_count(), generate_cylinder(1.0, 1.0, 1.0, 3).vertex_count());
        assert!(cylinder.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn cube_corners_are_shared_by_three_sides() {
        let cube = PrimitiveKind::Cube.build();
        for i in 0..cube.vertex_count() {
            assert_eq!(cube.find_coincident(i, COINCIDENCE_EPSILON).unwrap().len(), 3);
        }
    }

    #[test]
    fn cube_normals_point_away_from_center() {
        let cube = PrimitiveKind::Cube.build();
        for (p, n) in cube.positions().iter().zip(cube.normals()) {
            assert!(p.dot(*n) > 0.0, "normal {n} at {p} faces inward");
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn tetrahedron_normals_point_away_from_center() {
        let tet = PrimitiveKind::Tetrahedron.build();
        for (p, n) in tet.positions().iter().zip(tet.normals()) {
            assert!(p.dot(*n) > 0.0);
        }
        assert_eq!(tet.find_coincident(0, COINCIDENCE_EPSILON).unwrap().len(), 3);
    }

    #[test]
    fn cone_apex_is_a_coincident_ring() {
        let cone = PrimitiveKind::Cone.build();
        // The whole top row collapses onto the apex.
        assert_eq!(cone.find_coincident(0, COINCIDENCE_EPSILON).unwrap().len(), 33);
    }

    #[test]
    fn primitives_fit_in_unit_bounds() {
        for kind in PrimitiveKind::ALL {
            let mesh = kind.build();
            assert!(mesh.positions().iter().all(|p| p.abs().max_element() <= 0.5 + 1e-5), "{}", kind.label());
        }
    }
}
