// Host-side tests for pointer projection: NDC conversion, ray building and
// the nearest-first target intersection.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod core {
    pub mod camera {
        include!("../src/core/camera.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod project {
        include!("../src/core/project.rs");
    }
}

use crate::core::camera::Camera;
use crate::core::project::{
    camera_ray, project, screen_to_ndc, InteractionPlane, Ray, RaycastMesh, Target,
};
use glam::{Mat4, Vec2, Vec3};

fn big_triangle(z: f32) -> RaycastMesh {
    let mut mesh = RaycastMesh::new(
        vec![
            Vec3::new(-10.0, -10.0, 0.0),
            Vec3::new(10.0, -10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ],
        vec![Vec2::ZERO, Vec2::X, Vec2::Y],
        vec![0, 1, 2],
    );
    mesh.set_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, z)));
    mesh
}

#[test]
fn screen_to_ndc_maps_corners_with_inverted_y() {
    assert_eq!(screen_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
    assert_eq!(screen_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    assert_eq!(screen_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
}

#[test]
fn center_ray_points_down_the_view_axis() {
    let camera = Camera::new(1.0);
    let ray = camera_ray(&camera, Vec2::ZERO);
    assert_eq!(ray.origin, camera.eye);
    assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4);
}

#[test]
fn plane_guarantees_a_forward_hit() {
    let camera = Camera::new(16.0 / 9.0);
    let plane = InteractionPlane {
        center: Vec3::ZERO,
        half_extent: Vec2::new(4.0, 3.0),
    };
    for ndc in [
        Vec2::ZERO,
        Vec2::new(0.8, 0.8),
        Vec2::new(-0.9, 0.4),
        Vec2::new(0.3, -0.95),
    ] {
        let hit = plane
            .intersect(&camera_ray(&camera, ndc))
            .expect("plane must be hit");
        assert!(hit.point.z.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&hit.uv.x));
        assert!((0.0..=1.0).contains(&hit.uv.y));
    }
}

#[test]
fn plane_misses_parallel_rays() {
    let plane = InteractionPlane {
        center: Vec3::ZERO,
        half_extent: Vec2::ONE,
    };
    let ray = Ray {
        origin: Vec3::new(0.0, 0.0, 5.0),
        dir: Vec3::X,
    };
    assert!(plane.intersect(&ray).is_none());
}

#[test]
fn triangle_hit_interpolates_uv() {
    let mesh = RaycastMesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![Vec2::ZERO, Vec2::X, Vec2::Y],
        vec![0, 1, 2],
    );
    let ray = Ray {
        origin: Vec3::new(0.25, 0.25, 1.0),
        dir: Vec3::NEG_Z,
    };
    let hit = mesh.intersect(&ray).expect("triangle must be hit");
    assert!(hit.point.z.abs() < 1e-6);
    assert!((hit.uv - Vec2::new(0.25, 0.25)).length() < 1e-5);
    assert!((hit.distance - 1.0).abs() < 1e-5);
}

#[test]
fn mesh_transform_moves_the_hit() {
    let mesh = big_triangle(-2.0);
    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    let hit = mesh.intersect(&ray).expect("translated mesh must be hit");
    assert!((hit.point.z + 2.0).abs() < 1e-5);
    assert!((hit.distance - 2.0).abs() < 1e-5);
}

#[test]
fn project_picks_the_nearest_target() {
    let near = big_triangle(-1.0);
    let far = big_triangle(-3.0);
    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    let (index, hit) = project(&ray, &[Target::Mesh(&far), Target::Mesh(&near)])
        .expect("both targets are in front of the ray");
    assert_eq!(index, 1, "the nearer target must win");
    assert!((hit.point.z + 1.0).abs() < 1e-5);
}

#[test]
fn project_reports_a_genuine_miss() {
    let mesh = big_triangle(-1.0);
    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::Z,
    };
    assert!(project(&ray, &[Target::Mesh(&mesh)]).is_none());
}

#[test]
fn behind_the_origin_triangles_are_ignored() {
    let mesh = big_triangle(2.0);
    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    assert!(mesh.intersect(&ray).is_none());
}
