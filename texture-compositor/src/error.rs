//! Error taxonomy for the compositor boundary.
use crate::side::SideKey;
use thiserror::Error;

/// Why a single side image could not contribute to the composite.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetLoadError {
    #[error("could not read image source: {0}")]
    Io(String),
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("malformed data URL: {0}")]
    InvalidDataUrl(String),
    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("image load timed out")]
    Timeout,
}

/// Per-side load failure. Recovered locally: the side simply stays empty.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{side} image failed to load: {reason}")]
pub struct AssetLoadFailure {
    pub side: SideKey,
    pub reason: AssetLoadError,
}

/// Failures that end a compute without producing a composite.
///
/// The caller keeps whatever composite it committed last.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompositorError {
    /// The drawing surface could not be created.
    #[error("compositor unavailable: {0}")]
    Unavailable(String),
    /// A user supplied template override could not be decoded.
    #[error("template override is not a readable image: {0}")]
    InvalidTemplateOverride(String),
    /// A newer compute superseded this one before it finished.
    #[error("compute {generation} superseded by {latest}")]
    StaleComputeDiscarded { generation: u64, latest: u64 },
}

impl CompositorError {
    /// Stale results are control flow, not something to show the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, CompositorError::StaleComputeDiscarded { .. })
    }
}

/// Rejected zone configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ZoneLayoutError {
    #[error("{side} zone lies outside the canvas: {detail}")]
    OutOfBounds { side: SideKey, detail: String },
    #[error("{side} zone has no area")]
    Empty { side: SideKey },
    #[error("{first} and {second} zones overlap")]
    Overlap { first: SideKey, second: SideKey },
}

/// Errors from reading a `compose-texture` job file.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("job file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid zone layout: {0}")]
    Zones(#[from] ZoneLayoutError),
    #[error("unknown side '{0}' (expected front, back, left or right)")]
    UnknownSide(String),
    #[error(transparent)]
    Compositor(#[from] CompositorError),
    #[error("could not encode composite: {0}")]
    Encode(String),
}
