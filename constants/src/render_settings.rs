/// Semi-glossy fabric finish shared by every garment part
pub const GARMENT_ROUGHNESS: f32 = 0.55;
pub const GARMENT_CLEARCOAT: f32 = 0.1;
pub const GARMENT_CLEARCOAT_ROUGHNESS: f32 = 0.3;

/// Orbit camera zoom bounds (distance from the garment centre)
pub const MIN_CAMERA_DISTANCE: f32 = 1.8;
pub const MAX_CAMERA_DISTANCE: f32 = 6.0;
pub const DEFAULT_CAMERA_DISTANCE: f32 = 3.2;

/// Pitch clamp so the camera never flips over the poles
pub const MAX_CAMERA_PITCH: f32 = 1.3;

/// Vertical field of view in degrees
pub const CAMERA_FOV_DEGREES: f32 = 45.0;

/// Mouse sensitivities
pub const ORBIT_SENSITIVITY: f32 = 0.005;
pub const ZOOM_LINE_STEP: f32 = 0.25;
pub const ZOOM_PIXEL_STEP: f32 = 0.01;

/// Logo scale limits accepted from the form
pub const MIN_LOGO_SCALE: f32 = 0.05;
pub const MAX_LOGO_SCALE: f32 = 4.0;
