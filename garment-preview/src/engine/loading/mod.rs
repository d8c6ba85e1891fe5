//! Startup loading of the customizer manifest.
//!
//! The preview keeps running on compiled-in defaults when the manifest is
//! missing or invalid, so loading never blocks the app for good.

/// Manifest request and resolution into compositor, catalog and design store.
pub mod manifest_loader;

/// Loading progress flags driving the `Loading` to `Running` transition.
pub mod progress;
