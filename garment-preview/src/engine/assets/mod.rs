//! Runtime configuration assets.

/// Customizer manifest: compositor settings, design store location and catalog.
pub mod customizer_manifest;
