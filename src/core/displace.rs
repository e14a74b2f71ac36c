use glam::Vec3;

/// Target position for a node under the radial falloff field around the
/// contact point.
///
/// Outside `radius` the target is the rest position itself (full relaxation).
/// Inside, the node is pushed radially outward from the object's local
/// origin, not away from the contact point, so the surface bulges rather
/// than being shoved from the finger. The caller lerps live positions toward
/// the returned target; nothing is written here.
#[inline]
pub fn displace_target(rest: Vec3, contact: Vec3, radius: f32, strength: f32) -> Vec3 {
    if radius <= 0.0 {
        return rest;
    }
    let dist = rest.distance(contact);
    if dist > radius {
        return rest;
    }
    let falloff = (1.0 - dist / radius) * strength;
    rest + rest.normalize_or_zero() * falloff
}
