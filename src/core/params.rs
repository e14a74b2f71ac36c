/// Externally tunable numeric knobs. Mutated only by the debug panel; the
/// core reads them every frame and tolerates mid-frame changes.

#[derive(Clone, Copy, Debug)]
pub struct Knob {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub value: f32,
}

impl Knob {
    pub const fn new(min: f32, max: f32, step: f32, value: f32) -> Self {
        Self {
            min,
            max,
            step,
            value,
        }
    }

    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TunableParams {
    pub displace_strength: Knob,
    pub lerp_alpha: Knob,
    pub rotation_lerp_alpha: Knob,
    pub radius: Knob,
    pub rotation_x: Knob,
    pub rotation_y: Knob,
}

impl Default for TunableParams {
    fn default() -> Self {
        Self {
            displace_strength: Knob::new(0.0, 1.0, 0.001, 1.0),
            lerp_alpha: Knob::new(0.0, 0.5, 0.0001, 0.05),
            rotation_lerp_alpha: Knob::new(0.0, 0.6, 0.001, 0.05),
            radius: Knob::new(0.0, 4.0, 0.001, 3.0),
            rotation_x: Knob::new(0.0, 0.2, 0.001, 0.07),
            rotation_y: Knob::new(0.0, 0.2, 0.001, 0.15),
        }
    }
}

impl TunableParams {
    /// Knob lookup by the panel's element id.
    pub fn knob_mut(&mut self, id: &str) -> Option<&mut Knob> {
        match id {
            "displace-strength" => Some(&mut self.displace_strength),
            "lerp-alpha" => Some(&mut self.lerp_alpha),
            "rotation-lerp-alpha" => Some(&mut self.rotation_lerp_alpha),
            "displace-radius" => Some(&mut self.radius),
            "rotation-x" => Some(&mut self.rotation_x),
            "rotation-y" => Some(&mut self.rotation_y),
            _ => None,
        }
    }

    pub fn knob(&self, id: &str) -> Option<Knob> {
        match id {
            "displace-strength" => Some(self.displace_strength),
            "lerp-alpha" => Some(self.lerp_alpha),
            "rotation-lerp-alpha" => Some(self.rotation_lerp_alpha),
            "displace-radius" => Some(self.radius),
            "rotation-x" => Some(self.rotation_x),
            "rotation-y" => Some(self.rotation_y),
            _ => None,
        }
    }

    /// Panel element ids, in display order.
    pub const IDS: [&'static str; 6] = [
        "displace-strength",
        "lerp-alpha",
        "rotation-lerp-alpha",
        "displace-radius",
        "rotation-x",
        "rotation-y",
    ];
}
