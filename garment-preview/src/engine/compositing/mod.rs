//! Bridge between the design session and the preview material.
//!
//! Dirty sessions are composed off the main thread, finished composites are
//! committed through the session's generation check and uploaded as images.

/// Background compose tasks: dispatch, polling and host notifications.
pub mod compose_task;

/// Session inputs mirrored into `GarmentPreviewState`.
pub mod preview_sync;

/// Composite and logo upload into Bevy `Image` assets.
pub mod texture_binding;
