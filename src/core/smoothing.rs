use glam::{Vec2, Vec3};

/// Exponential approach filters. This is the system's only form of temporal
/// smoothing: every frame, `current += (target - current) * alpha`.
///
/// Rates throughout the crate are quoted per reference frame and rescaled to
/// the actual frame duration with [`frame_alpha`], so motion speed stays
/// stable at variable refresh rates.

/// Nominal frame interval the reference rates are quoted at.
pub const REF_FRAME_DT: f32 = 1.0 / 60.0;

/// Rescale a per-reference-frame rate to an actual frame duration.
///
/// Equal to `alpha_ref` when `dt == REF_FRAME_DT`; monotonic in `dt`.
#[inline]
pub fn frame_alpha(alpha_ref: f32, dt: f32) -> f32 {
    let a = alpha_ref.clamp(0.0, 1.0);
    1.0 - (1.0 - a).powf(dt.max(0.0) / REF_FRAME_DT)
}

#[inline]
pub fn approach(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

#[inline]
pub fn approach_vec2(current: Vec2, target: Vec2, alpha: f32) -> Vec2 {
    current + (target - current) * alpha
}

#[inline]
pub fn approach_vec3(current: Vec3, target: Vec3, alpha: f32) -> Vec3 {
    current + (target - current) * alpha
}
