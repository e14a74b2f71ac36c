/// Frontend wiring constants: asset locations and the DOM contract with the
/// host page. Scene tuning lives in `core::constants`.

// Packaged assets, served alongside the page
pub const STONE_ASSET_URL: &str = "/stone.glb";
pub const CLOTH_ASSET_URL: &str = "/cloth.glb";

// DOM element ids the page may provide; missing ones are skipped
pub const CANVAS_ID: &str = "app-canvas";
pub const CURSOR_DOT_ID: &str = "cursor-dot";
