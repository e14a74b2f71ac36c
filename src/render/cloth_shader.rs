// WGSL variant builder for the cloth's displacement material.
//
// The injected uniform block and the displacement expression are first-class
// pieces assembled into a complete shader module, rather than text patched
// into some other material's source. Host tests assert the assembled module
// declares every streamed uniform.

/// Uniform block consumed by the displacement stage. Field order matches
/// `render::ClothParamsRaw`.
pub const CLOTH_UNIFORM_DECL: &str = "\
struct ClothParams {
  model: mat4x4<f32>,
  contact_point: vec4<f32>,
  contact_uv: vec2<f32>,
  time: f32,
  intensity: f32,
};
";

/// Per-vertex displacement: smooth falloff around the contact UV, pushed
/// along the vertex normal and scaled by the streamed intensity.
pub fn displacement_fn(falloff_radius: f32, amplitude: f32) -> String {
    format!(
        "\
fn displace(position: vec3<f32>, normal: vec3<f32>, uv: vec2<f32>) -> vec3<f32> {{
  let d = distance(uv, cloth.contact_uv);
  let falloff = 1.0 - smoothstep(0.0, {radius:?}, d);
  let ripple = sin(d * 24.0 - cloth.time * 3.0) * 0.08;
  let offset = (falloff + falloff * ripple) * {amplitude:?} * cloth.intensity;
  return position + normal * offset;
}}
",
        radius = falloff_radius,
        amplitude = amplitude,
    )
}

/// Assemble the full cloth shader module.
pub fn cloth_shader_source(falloff_radius: f32, amplitude: f32) -> String {
    format!(
        "\
// Cloth pass: device-side vertex displacement around the pointer contact.

struct SceneUniforms {{
  view_proj: mat4x4<f32>,
}};

{uniforms}
@group(0) @binding(0) var<uniform> scene: SceneUniforms;
@group(1) @binding(0) var<uniform> cloth: ClothParams;

{displace}
struct VsOut {{
  @builtin(position) pos: vec4<f32>,
  @location(0) normal: vec3<f32>,
  @location(1) uv: vec2<f32>,
  @location(2) lift: f32,
}};

@vertex
fn vs_main(
  @location(0) position: vec3<f32>,
  @location(1) normal: vec3<f32>,
  @location(2) uv: vec2<f32>,
) -> VsOut {{
  var out: VsOut;
  let displaced = displace(position, normal, uv);
  let world = cloth.model * vec4<f32>(displaced, 1.0);
  out.pos = scene.view_proj * world;
  out.normal = normalize((cloth.model * vec4<f32>(normal, 0.0)).xyz);
  out.uv = uv;
  out.lift = distance(displaced, position);
  return out;
}}

const AMBIENT: f32 = 0.5;
const FRONT_DIR: vec3<f32> = vec3<f32>(0.0, 0.0, 1.0);
const BASE: vec3<f32> = vec3<f32>(0.55, 0.57, 0.66);

@fragment
fn fs_main(frag: VsOut) -> @location(0) vec4<f32> {{
  let n = normalize(frag.normal);
  let light = AMBIENT + max(dot(n, FRONT_DIR), 0.0);
  // Lifted regions read slightly brighter so the displacement is legible.
  let rgb = BASE * light * (1.0 + frag.lift * 0.8);
  return vec4<f32>(rgb / (rgb + vec3<f32>(1.0)), 1.0);
}}
",
        uniforms = CLOTH_UNIFORM_DECL,
        displace = displacement_fn(falloff_radius, amplitude),
    )
}
