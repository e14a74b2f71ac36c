use glam::{Mat4, Vec2, Vec3, Vec4};

use super::camera::Camera;

/// World-space ray cast from the camera through a screen point.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Result of a successful ray/target intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub point: Vec3,
    pub uv: Vec2,
    pub distance: f32,
}

/// Convert canvas pixel coordinates to normalized device coordinates
/// (+Y up, so the screen Y axis is inverted).
#[inline]
pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        2.0 * x / width.max(1.0) - 1.0,
        1.0 - 2.0 * y / height.max(1.0),
    )
}

/// Unproject an NDC point through the camera into a world-space ray.
pub fn camera_ray(camera: &Camera, ndc: Vec2) -> Ray {
    let inv = camera.view_proj().inverse();
    let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let far: Vec3 = p_far.truncate() / p_far.w;
    Ray {
        origin: camera.eye,
        dir: (far - camera.eye).normalize(),
    }
}

/// Invisible camera-facing plane sized to fill the frustum at its depth.
/// Guarantees a contact point before any geometry is loaded.
#[derive(Clone, Copy, Debug)]
pub struct InteractionPlane {
    pub center: Vec3,
    pub half_extent: Vec2,
}

impl InteractionPlane {
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        if ray.dir.z.abs() < 1e-6 {
            return None;
        }
        let t = (self.center.z - ray.origin.z) / ray.dir.z;
        if t < 0.0 {
            return None;
        }
        let point = ray.origin + ray.dir * t;
        let local = point - self.center;
        let uv = Vec2::new(
            (local.x / (2.0 * self.half_extent.x) + 0.5).clamp(0.0, 1.0),
            (local.y / (2.0 * self.half_extent.y) + 0.5).clamp(0.0, 1.0),
        );
        Some(Hit {
            point,
            uv,
            distance: t,
        })
    }
}

/// Non-rendered geometric snapshot used only for ray intersection — the
/// collision proxy of the stone and the pick shape of the cloth. Geometry is
/// stored in object-local space; `transform` is kept in sync with the
/// rendered object every frame.
#[derive(Clone, Debug)]
pub struct RaycastMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub transform: Mat4,
}

impl RaycastMesh {
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            uvs,
            indices,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Nearest triangle intersection, with barycentric-interpolated UV where
    /// the mesh carries texture coordinates.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let inv = self.transform.inverse();
        let origin = inv.transform_point3(ray.origin);
        let dir = inv.transform_vector3(ray.dir);

        let mut best: Option<(f32, usize, f32, f32)> = None;
        for (tri, chunk) in self.indices.chunks_exact(3).enumerate() {
            let a = self.positions[chunk[0] as usize];
            let b = self.positions[chunk[1] as usize];
            let c = self.positions[chunk[2] as usize];
            if let Some((t, u, v)) = ray_triangle(origin, dir, a, b, c) {
                match best {
                    Some((bt, ..)) if bt <= t => {}
                    _ => best = Some((t, tri, u, v)),
                }
            }
        }

        let (t, tri, u, v) = best?;
        let local = origin + dir * t;
        let point = self.transform.transform_point3(local);
        let uv = if self.uvs.is_empty() {
            Vec2::ZERO
        } else {
            let i = tri * 3;
            let (a, b, c) = (
                self.uvs[self.indices[i] as usize],
                self.uvs[self.indices[i + 1] as usize],
                self.uvs[self.indices[i + 2] as usize],
            );
            a * (1.0 - u - v) + b * u + c * v
        };
        Some(Hit {
            point,
            uv,
            distance: point.distance(ray.origin),
        })
    }
}

/// Moller-Trumbore, no backface culling. Returns (t, bary_u, bary_v).
fn ray_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<(f32, f32, f32)> {
    const EPS: f32 = 1e-7;
    let ab = b - a;
    let ac = c - a;
    let p = dir.cross(ac);
    let det = ab.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(ab);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = ac.dot(q) * inv_det;
    (t > EPS).then_some((t, u, v))
}

/// One entry in the contextual target set.
pub enum Target<'a> {
    Plane(&'a InteractionPlane),
    Mesh(&'a RaycastMesh),
}

/// Test every target and keep the nearest hit, tagged with the index of the
/// target that produced it. `None` is a genuine miss — callers retain their
/// previous contact point rather than snapping to a default.
pub fn project(ray: &Ray, targets: &[Target]) -> Option<(usize, Hit)> {
    let mut best: Option<(usize, Hit)> = None;
    for (i, target) in targets.iter().enumerate() {
        let hit = match target {
            Target::Plane(p) => p.intersect(ray),
            Target::Mesh(m) => m.intersect(ray),
        };
        if let Some(h) = hit {
            match &best {
                Some((_, b)) if b.distance <= h.distance => {}
                _ => best = Some((i, h)),
            }
        }
    }
    best
}
