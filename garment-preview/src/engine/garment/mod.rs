//! Parametric garment: primitive mesh assembly, shared material and decal.
//!
//! Geometry is spawned once. Texture swaps only rebind the material and the
//! decal image.

/// Single-logo decal quad and its placement on the torso faces.
pub mod decal;

/// Shared garment material and its rebinding from the preview state.
pub mod material;

/// Torso, shoulder, sleeve and collar primitives.
pub mod mesh;

/// What the preview currently shows.
pub mod preview_state;
