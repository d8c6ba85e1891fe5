/// Composite canvas resolution used when no reference template is loaded
pub const FALLBACK_TEXTURE_SIZE: u32 = 2048;

/// Largest drawing surface the compositor will try to allocate (per side)
pub const MAX_SURFACE_DIMENSION: u32 = 16384;

/// Reference overlay opacity while no side artwork is present
pub const REFERENCE_ALPHA_EMPTY: f32 = 0.80;

/// Reference overlay opacity once at least one side image is present
pub const REFERENCE_ALPHA_WITH_ARTWORK: f32 = 0.35;

/// Upper bound for one batch of side image loads (milliseconds)
pub const IMAGE_LOAD_TIMEOUT_MS: u64 = 20_000;

/// Base colour used when the session has not chosen one yet
pub const DEFAULT_BASE_COLOR: &str = "#f5f5f5";
