use glam::Vec2;

/// Width/height of the camera frustum cross-section at `distance` in front of
/// the eye. Used once to size the always-hit interaction plane.
#[inline]
pub fn frustum_size_at(fovy_radians: f32, aspect: f32, distance: f32) -> Vec2 {
    let height = 2.0 * distance * (fovy_radians * 0.5).tan();
    Vec2::new(height * aspect, height)
}
