use glam::{Vec2, Vec3};

use super::constants::{CLOTH_REVEAL_DELAY_SEC, CLOTH_SCALE_DURATION_SEC, CLOTH_UNIFORM_ALPHA};
use super::smoothing::{approach, approach_vec2, approach_vec3, frame_alpha};
use super::transition::ease_in_out_cubic;

/// Uniform values streamed to the cloth's per-vertex displacement shader.
/// The displacement itself executes on the rendering device; this side only
/// guarantees monotonic time and well-formed values every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClothUniforms {
    pub time: f32,
    pub contact_point: Vec3,
    pub contact_uv: Vec2,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug)]
struct ScaleAnim {
    from: f32,
    to: f32,
    elapsed: f32,
}

/// Per-frame control state for the cloth: the uniform bridge plus the scale
/// animation driven by the transition boundaries.
#[derive(Clone, Copy, Debug)]
pub struct ClothBridge {
    pub uniforms: ClothUniforms,
    /// Authoritative intensity set-point, toggled 0/1 at transition
    /// boundaries. Overwrites the hover-approach value below.
    pub offset_intensity: f32,
    /// Exponential approach toward the hover flag. Computed every frame but
    /// immediately overridden by `offset_intensity`; kept to match the
    /// original control scheme.
    pub hover_intensity: f32,
    pub original_scale: f32,
    pub scale: f32,
    reveal_delay: Option<f32>,
    scale_anim: Option<ScaleAnim>,
}

impl ClothBridge {
    pub fn new(original_scale: f32) -> Self {
        Self {
            uniforms: ClothUniforms::default(),
            offset_intensity: 0.0,
            hover_intensity: 0.0,
            original_scale,
            scale: 0.0,
            reveal_delay: None,
            scale_anim: None,
        }
    }

    /// Arm the delayed grow to `original_scale` and make the displacement
    /// authoritative. Called when the stone finishes transitioning out.
    pub fn begin_reveal(&mut self) {
        self.reveal_delay = Some(CLOTH_REVEAL_DELAY_SEC);
        self.offset_intensity = 1.0;
    }

    /// Shrink to zero immediately. Called the moment a transition back in is
    /// accepted.
    pub fn begin_conceal(&mut self) {
        self.reveal_delay = None;
        self.offset_intensity = 0.0;
        self.scale_anim = Some(ScaleAnim {
            from: self.scale,
            to: 0.0,
            elapsed: 0.0,
        });
    }

    /// Advance every uniform component one frame.
    pub fn advance(&mut self, dt: f32, contact_point: Vec3, contact_uv: Vec2, hovering: bool) {
        self.uniforms.time += dt.max(0.0);

        let alpha = frame_alpha(CLOTH_UNIFORM_ALPHA, dt);
        self.uniforms.contact_point =
            approach_vec3(self.uniforms.contact_point, contact_point, alpha);
        self.uniforms.contact_uv = approach_vec2(self.uniforms.contact_uv, contact_uv, alpha);

        let hover_target = if hovering { 1.0 } else { 0.0 };
        self.hover_intensity = approach(self.hover_intensity, hover_target, alpha);
        // The direct set-point is authoritative over the hover approach.
        self.uniforms.intensity = self.offset_intensity;

        if let Some(delay) = self.reveal_delay.as_mut() {
            *delay -= dt;
            if *delay <= 0.0 {
                self.reveal_delay = None;
                self.scale_anim = Some(ScaleAnim {
                    from: self.scale,
                    to: self.original_scale,
                    elapsed: 0.0,
                });
            }
        }

        if let Some(anim) = self.scale_anim.as_mut() {
            anim.elapsed += dt;
            let t = (anim.elapsed / CLOTH_SCALE_DURATION_SEC).clamp(0.0, 1.0);
            self.scale = anim.from + (anim.to - anim.from) * ease_in_out_cubic(t);
            if t >= 1.0 {
                self.scale_anim = None;
            }
        }
    }
}
