//! Runtime systems around the preview: diagnostics, loading feedback and
//! native-only input.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Loading placeholder shown while the manifest or a composite is pending.
pub mod loading_overlay;

/// Keyboard shortcuts for render mode and reference overlay (native builds).
pub mod render_mode;

/// Dropping image files onto the native window fills the side slots.
pub mod file_drop;
