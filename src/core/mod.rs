pub mod bounds;
pub mod camera;
pub mod clip;
pub mod cloth;
pub mod constants;
pub mod displace;
pub mod params;
pub mod pointer;
pub mod project;
pub mod scene;
pub mod smoothing;
pub mod transition;

pub use constants::*;

// Shaders bundled as string constants (the cloth shader is assembled at
// runtime by render::cloth_shader).
pub static STONE_WGSL: &str = include_str!("../../shaders/stone.wgsl");
