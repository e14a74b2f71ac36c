// Host-side tests for the displacement field and smoothing filters.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod core {
    pub mod displace {
        include!("../src/core/displace.rs");
    }
    pub mod smoothing {
        include!("../src/core/smoothing.rs");
    }
}

use crate::core::displace::displace_target;
use crate::core::smoothing::{approach, approach_vec3, frame_alpha, REF_FRAME_DT};
use glam::Vec3;

#[test]
fn falloff_magnitude_matches_linear_profile() {
    // A vertex 1.5 units from the contact with radius 3 and strength 1 gets
    // an offset of (1 - 1.5/3) * 1 = 0.5 along its outward radial direction.
    let rest = Vec3::new(1.5, 0.0, 0.0);
    let contact = Vec3::ZERO;
    let target = displace_target(rest, contact, 3.0, 1.0);
    let offset = target - rest;
    assert!((offset.length() - 0.5).abs() < 1e-6);
    assert!((offset.normalize() - rest.normalize()).length() < 1e-6);
}

#[test]
fn outside_radius_targets_rest_exactly() {
    let rest = Vec3::new(4.0, 1.0, 0.0);
    let contact = Vec3::ZERO;
    assert_eq!(displace_target(rest, contact, 3.0, 1.0), rest);
}

#[test]
fn strength_scales_offset_linearly() {
    let rest = Vec3::new(0.0, 1.0, 0.0);
    let contact = Vec3::ZERO;
    let full = (displace_target(rest, contact, 2.0, 1.0) - rest).length();
    let half = (displace_target(rest, contact, 2.0, 0.5) - rest).length();
    assert!((full - 2.0 * half).abs() < 1e-6);
}

#[test]
fn degenerate_inputs_stay_finite() {
    // Rest at the origin has no outward direction; the target is rest itself.
    let target = displace_target(Vec3::ZERO, Vec3::ZERO, 3.0, 1.0);
    assert_eq!(target, Vec3::ZERO);
    // A zero radius never displaces.
    let rest = Vec3::ONE;
    assert_eq!(displace_target(rest, rest, 0.0, 1.0), rest);
}

#[test]
fn out_of_range_vertices_converge_to_rest_without_overshoot() {
    // Repeated smoothing ticks must converge a displaced vertex back onto its
    // rest position and never move past it.
    let rest = Vec3::new(5.0, 0.0, 0.0);
    let contact = Vec3::ZERO;
    let mut position = Vec3::new(5.6, 0.4, -0.2);
    let mut prev_dist = position.distance(rest);
    for _ in 0..600 {
        let target = displace_target(rest, contact, 3.0, 1.0);
        position = approach_vec3(position, target, 0.05);
        let dist = position.distance(rest);
        assert!(dist <= prev_dist + 1e-6, "distance to rest must not grow");
        prev_dist = dist;
    }
    assert!(prev_dist < 1e-3, "vertex should settle on rest, got {prev_dist}");
}

#[test]
fn frame_alpha_matches_reference_rate_at_nominal_interval() {
    for alpha in [0.05_f32, 0.1, 0.15, 0.5] {
        let rescaled = frame_alpha(alpha, REF_FRAME_DT);
        assert!((rescaled - alpha).abs() < 1e-5);
    }
}

#[test]
fn frame_alpha_is_monotonic_in_dt() {
    let mut prev = 0.0;
    for i in 1..=20 {
        let dt = i as f32 * 0.004;
        let a = frame_alpha(0.15, dt);
        assert!(a > prev);
        assert!(a <= 1.0);
        prev = a;
    }
}

#[test]
fn frame_alpha_doubled_interval_composes() {
    // One step at 2*dt must equal two steps at dt.
    let alpha = 0.2;
    let one_big = approach(0.0, 1.0, frame_alpha(alpha, 2.0 * REF_FRAME_DT));
    let mut two_small = 0.0;
    for _ in 0..2 {
        two_small = approach(two_small, 1.0, frame_alpha(alpha, REF_FRAME_DT));
    }
    assert!((one_big - two_small).abs() < 1e-5);
}
