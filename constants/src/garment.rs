//! Parametric garment proportions in world units (metres-ish, torso centred at origin).

/// Torso box (width, height, depth)
pub const TORSO_SIZE: (f32, f32, f32) = (1.0, 1.3, 0.42);

/// Shoulder sphere radius and horizontal offset from centre
pub const SHOULDER_RADIUS: f32 = 0.24;
pub const SHOULDER_OFFSET_X: f32 = 0.5;
pub const SHOULDER_HEIGHT: f32 = 0.5;

/// Sleeve cylinders, tilted outward from the shoulders
pub const SLEEVE_RADIUS: f32 = 0.19;
pub const SLEEVE_LENGTH: f32 = 0.55;
pub const SLEEVE_OFFSET_X: f32 = 0.72;
pub const SLEEVE_HEIGHT: f32 = 0.3;
pub const SLEEVE_TILT_RADIANS: f32 = 0.9;

/// Collar sphere sitting on top of the torso
pub const COLLAR_RADIUS: f32 = 0.17;
pub const COLLAR_HEIGHT: f32 = 0.66;

/// Decal placement on the torso faces
pub const DECAL_HEIGHT: f32 = 0.15;
pub const DECAL_SURFACE_OFFSET: f32 = 0.002;
pub const DECAL_BASE_SIZE: f32 = 0.5;
