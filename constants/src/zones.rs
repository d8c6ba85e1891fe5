//! Zone rectangles as `(x, y, width, height)` fractions of the composite canvas.
//!
//! Front and back are the large chest-height panels of the UV unwrap, left
//! and right are the narrow sleeve strips underneath them. None overlap.

pub const FRONT_ZONE: (f32, f32, f32, f32) = (0.06, 0.12, 0.38, 0.42);
pub const BACK_ZONE: (f32, f32, f32, f32) = (0.56, 0.12, 0.38, 0.42);
pub const LEFT_ZONE: (f32, f32, f32, f32) = (0.06, 0.66, 0.18, 0.22);
pub const RIGHT_ZONE: (f32, f32, f32, f32) = (0.76, 0.66, 0.18, 0.22);
