//! Shared defaults for the garment customizer workspace.
//!
//! Compositor resolution and zone layout, garment mesh proportions, material
//! finish and camera limits. Runtime configuration (the customizer manifest)
//! overrides a subset of these.

pub mod assets;
pub mod garment;
pub mod render_settings;
pub mod texture;
pub mod zones;
