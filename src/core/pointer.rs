use glam::{Vec2, Vec3};

use super::project::Hit;

/// Pointer-derived state, written once per input event (raw values, contact)
/// and once per frame (smoothed values).
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    pub screen_px: Vec2,
    pub ndc_target: Vec2,
    pub ndc: Vec2,
    pub contact_point: Vec3,
    pub contact_uv: Vec2,
    pub hovering: bool,
    pub cursor_dot: Vec2,
}

impl PointerState {
    /// Apply a projection result. A miss keeps the previous contact point and
    /// UV — "no hit" is never treated as "hit at the origin".
    pub fn apply_hit(&mut self, hit: Option<Hit>, hovering: bool) {
        if let Some(h) = hit {
            self.contact_point = h.point;
            self.contact_uv = h.uv;
        }
        self.hovering = hovering;
    }
}
