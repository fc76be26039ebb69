use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::scene::{Mesh, ObjectId, Scene};

/// A ray in 3D space with origin and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Infinite plane `normal . p == normal . point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }
}

/// A vertex handle hit by a pointer ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleHit {
    pub index: usize,
    pub distance: f32,
    pub world_position: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray from screen coordinates (pixels) through the camera.
    /// `screen_pos` is in pixels from top-left, `screen_size` is viewport width/height.
    pub fn from_screen(screen_pos: Vec2, screen_size: Vec2, view_proj: Mat4) -> Self {
        let ndc_x = (2.0 * screen_pos.x / screen_size.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_pos.y / screen_size.y); // Y is flipped

        let inv_vp = view_proj.inverse();

        let near_point = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
        let far_point = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Self::new(near_point, far_point - near_point)
    }

    /// Intersect ray with a triangle (Möller–Trumbore algorithm).
    /// Returns distance along ray if hit, None if miss.
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(edge2);
        let a = edge1.dot(h);

        if a.abs() < 1e-7 {
            return None; // Parallel to triangle
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * self.direction.dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t > 1e-7 { Some(t) } else { None }
    }

    /// Distance along the ray to `plane`.
    /// None if the ray is parallel to the plane or the plane is behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < 1e-7 {
            return None;
        }
        let t = (plane.point - self.origin).dot(plane.normal) / denom;
        if t >= 0.0 { Some(t) } else { None }
    }

    /// Nearest non-negative distance to a sphere surface, or None on a miss.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let near = -b - sqrt_disc;
        let far = -b + sqrt_disc;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin is inside the sphere.
            Some(0.0)
        } else {
            None
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Project a 3D point to 2D screen coordinates.
/// Returns None if the point is behind the camera.
pub fn project_to_screen(pos: Vec3, view_proj: Mat4, screen_size: Vec2) -> Option<Vec2> {
    let clip = view_proj * pos.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * screen_size.x,
        (1.0 - ndc.y) * 0.5 * screen_size.y,
    ))
}

/// Pick the closest vertex handle (a sphere of `radius` around each world-space
/// vertex) hit by the ray. Ties go to the lower index.
pub fn pick_handle(ray: &Ray, world_positions: impl IntoIterator<Item = Vec3>, radius: f32) -> Option<HandleHit> {
    let mut closest: Option<HandleHit> = None;

    for (index, world_position) in world_positions.into_iter().enumerate() {
        if let Some(distance) = ray.intersect_sphere(world_position, radius) {
            let dominated = closest.as_ref().is_some_and(|c| c.distance <= distance);
            if !dominated {
                closest = Some(HandleHit { index, distance, world_position });
            }
        }
    }

    closest
}

/// Nearest hit of the ray against a mesh's triangles, in world space.
pub fn intersect_mesh(ray: &Ray, mesh: &Mesh) -> Option<f32> {
    let world: Vec<Vec3> = mesh.positions().iter().map(|&p| mesh.local_to_world(p)).collect();
    let hit = |tri: [usize; 3]| -> Option<f32> {
        let [a, b, c] = tri;
        ray.intersect_triangle(*world.get(a)?, *world.get(b)?, *world.get(c)?)
    };

    let distances: Vec<f32> = match mesh.indices() {
        Some(indices) => indices
            .chunks_exact(3)
            .filter_map(|t| hit([t[0] as usize, t[1] as usize, t[2] as usize]))
            .collect(),
        None => (0..world.len() / 3).filter_map(|i| hit([3 * i, 3 * i + 1, 3 * i + 2])).collect(),
    };
    distances.into_iter().reduce(f32::min)
}

/// Pick the closest visible mesh object hit by the ray.
pub fn pick_object(ray: &Ray, scene: &Scene) -> Option<ObjectId> {
    scene
        .objects()
        .iter()
        .filter(|o| o.visible)
        .filter_map(|o| Some((o.id, intersect_mesh(ray, o.renderable.as_mesh()?)?)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_hit_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let plane = Plane::from_normal_and_point(Vec3::Z, Vec3::new(0.0, 0.0, 1.0));
        let t = ray.intersect_plane(&plane).unwrap();
        assert!((t - 4.0).abs() < 1e-6);
        assert!((ray.point_at(t) - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn parallel_and_behind_planes_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let parallel = Plane::from_normal_and_point(Vec3::Y, Vec3::Y);
        assert_eq!(ray.intersect_plane(&parallel), None);

        let behind = Plane::from_normal_and_point(Vec3::X, Vec3::NEG_X);
        assert_eq!(ray.intersect_plane(&behind), None);
    }

    #[test]
    fn sphere_hits_report_near_surface() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert_eq!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0), None);
    }

    #[test]
    fn pick_handle_prefers_nearest() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let handles = [Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(3.0, 0.0, 0.0)];
        let hit = pick_handle(&ray, handles, 0.05).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.world_position, handles[1]);
    }

    #[test]
    fn pick_object_takes_nearest_visible_mesh() {
        use crate::scene::Renderable;
        use crate::scene::primitives::PrimitiveKind;

        let mut scene = Scene::new();
        let far = scene.add(Renderable::Mesh(PrimitiveKind::Cube.build()), "Far");
        let mut near_mesh = PrimitiveKind::Cube.build();
        near_mesh.transform.position = Vec3::new(0.0, 0.0, 3.0);
        let near = scene.add(Renderable::Mesh(near_mesh), "Near");

        let ray = Ray::new(Vec3::new(0.1, 0.1, 10.0), Vec3::NEG_Z);
        assert_eq!(pick_object(&ray, &scene), Some(near));

        scene.set_visible(near, false);
        assert_eq!(pick_object(&ray, &scene), Some(far));

        let miss = Ray::new(Vec3::new(5.0, 5.0, 10.0), Vec3::NEG_Z);
        assert_eq!(pick_object(&miss, &scene), None);
    }

    #[test]
    fn screen_center_ray_goes_through_target() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let ray = Ray::from_screen(Vec2::new(50.0, 50.0), Vec2::new(100.0, 100.0), proj * view);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        let screen = project_to_screen(Vec3::ZERO, proj * view, Vec2::new(100.0, 100.0)).unwrap();
        assert!((screen - Vec2::new(50.0, 50.0)).length() < 1e-3);
    }
}
