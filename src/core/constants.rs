use glam::Vec3;

// Core tuning constants shared by the pure scene logic and the web frontend.

// Camera (fixed perspective rig; only the aspect changes at runtime)
pub const CAMERA_FOVY_RADIANS: f32 = 75.0 * std::f32::consts::PI / 180.0;
pub const CAMERA_Z: f32 = 5.0;
pub const CAMERA_ZNEAR: f32 = 1.0;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Fixed smoothing rates, quoted per reference frame (see smoothing::frame_alpha)
pub const POINTER_SMOOTH_ALPHA: f32 = 0.15;
pub const CURSOR_DOT_ALPHA: f32 = 0.08;
pub const CLOTH_UNIFORM_ALPHA: f32 = 0.1;

// Stone placement, applied once when the asset finishes loading
pub const STONE_POSITION: Vec3 = Vec3::new(-0.25, 0.0, 0.0);
pub const STONE_SCALE: f32 = 0.9;
pub const STONE_TILT_X: f32 = std::f32::consts::PI / 10.0;

// Pitch the rotation target orbits around (the resting tilt, roughly PI / 10)
pub const ROTATION_BASE_X: f32 = 0.3;

// Transition timeline
pub const TRANSITION_DURATION_SEC: f32 = 0.9;
pub const CLOTH_REVEAL_DELAY_SEC: f32 = 0.35;
pub const CLOTH_SCALE_DURATION_SEC: f32 = 0.6;

// Cloth shader displacement (UV-space falloff radius, world-space amplitude)
pub const CLOTH_FALLOFF_RADIUS: f32 = 0.3;
pub const CLOTH_WAVE_AMPLITUDE: f32 = 0.4;

// Cloth placement relative to the stone's resolved transform
pub const CLOTH_OFFSET: Vec3 = Vec3::new(0.25, 0.0, 0.4);
