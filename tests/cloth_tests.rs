// Host-side tests for the cloth uniform bridge and the shader variant
// builder. The main crate is wasm-only, so we include the pure-Rust modules
// directly.

#![allow(dead_code)]
mod core {
    pub mod cloth {
        include!("../src/core/cloth.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod smoothing {
        include!("../src/core/smoothing.rs");
    }
    pub mod transition {
        include!("../src/core/transition.rs");
    }
}
mod cloth_shader {
    include!("../src/render/cloth_shader.rs");
}

use crate::core::cloth::ClothBridge;
use crate::core::constants::{CLOTH_REVEAL_DELAY_SEC, CLOTH_SCALE_DURATION_SEC};
use glam::{Vec2, Vec3};

const DT: f32 = 1.0 / 60.0;

#[test]
fn time_is_monotonic_and_never_rewinds() {
    let mut bridge = ClothBridge::new(1.0);
    let mut prev = 0.0;
    for dt in [DT, 0.1, 0.0, -0.5, DT] {
        bridge.advance(dt, Vec3::ZERO, Vec2::ZERO, false);
        assert!(bridge.uniforms.time >= prev);
        prev = bridge.uniforms.time;
    }
}

#[test]
fn set_point_overrides_the_hover_approach() {
    let mut bridge = ClothBridge::new(1.0);
    for _ in 0..240 {
        bridge.advance(DT, Vec3::ZERO, Vec2::ZERO, true);
    }
    // The hover path has long since converged toward 1, but the set-point
    // is authoritative and still zero.
    assert!(bridge.hover_intensity > 0.9);
    assert_eq!(bridge.uniforms.intensity, 0.0);

    bridge.begin_reveal();
    bridge.advance(DT, Vec3::ZERO, Vec2::ZERO, false);
    assert_eq!(bridge.uniforms.intensity, 1.0);
}

#[test]
fn contact_uniforms_approach_their_inputs() {
    let mut bridge = ClothBridge::new(1.0);
    let target_uv = Vec2::new(0.8, 0.2);
    let target_point = Vec3::new(1.0, -2.0, 0.5);
    for _ in 0..600 {
        bridge.advance(DT, target_point, target_uv, false);
    }
    assert!((bridge.uniforms.contact_uv - target_uv).length() < 1e-3);
    assert!((bridge.uniforms.contact_point - target_point).length() < 1e-2);
}

#[test]
fn reveal_waits_for_the_delay_then_grows_to_original_scale() {
    let mut bridge = ClothBridge::new(1.4);
    bridge.begin_reveal();

    let delay_frames = (CLOTH_REVEAL_DELAY_SEC / DT).floor() as usize - 1;
    for _ in 0..delay_frames {
        bridge.advance(DT, Vec3::ZERO, Vec2::ZERO, false);
        assert_eq!(bridge.scale, 0.0, "scale must hold zero during the delay");
    }

    let grow_frames = (CLOTH_SCALE_DURATION_SEC / DT).ceil() as usize + 2;
    for _ in 0..grow_frames {
        bridge.advance(DT, Vec3::ZERO, Vec2::ZERO, false);
    }
    assert!((bridge.scale - 1.4).abs() < 1e-4);
}

#[test]
fn conceal_shrinks_back_to_zero_immediately() {
    let mut bridge = ClothBridge::new(1.4);
    bridge.begin_reveal();
    for _ in 0..120 {
        bridge.advance(DT, Vec3::ZERO, Vec2::ZERO, false);
    }
    assert!((bridge.scale - 1.4).abs() < 1e-4);

    bridge.begin_conceal();
    assert_eq!(bridge.offset_intensity, 0.0);
    for _ in 0..60 {
        bridge.advance(DT, Vec3::ZERO, Vec2::ZERO, false);
    }
    assert!(bridge.scale.abs() < 1e-4);
}

#[test]
fn shader_module_declares_every_streamed_uniform() {
    let source = cloth_shader::cloth_shader_source(0.3, 0.4);
    for field in ["time", "contact_point", "contact_uv", "intensity"] {
        assert!(
            source.contains(field),
            "shader must declare uniform `{field}`"
        );
    }
    assert!(source.contains("struct ClothParams"));
    assert!(source.contains("fn displace("));
    assert!(source.contains("displace(position, normal, uv)"));
}

#[test]
fn displacement_expression_embeds_its_parameters() {
    let body = cloth_shader::displacement_fn(0.25, 1.5);
    assert!(body.contains("0.25"));
    assert!(body.contains("1.5"));
    assert!(body.contains("smoothstep"));
    assert!(body.contains("cloth.intensity"));
}
