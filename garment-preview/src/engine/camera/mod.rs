//! Orbit camera for inspecting the garment.
//!
//! Left-drag orbits around the garment centre, the wheel zooms within fixed
//! limits. There is no panning: the garment always stays centred.

/// Orbit camera resource and controller system.
pub mod orbit_camera;
