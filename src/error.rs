//! Error types shared by the engine.
//!
//! None of these are fatal. Callers either skip the update that produced the
//! error or surface a single notice to the user.

use thiserror::Error;

use crate::canvas::CanvasId;
use crate::tile::TileId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The canvas rectangle has not been measured yet (or has zero area).
    #[error("canvas boundary is not available")]
    BoundaryUnavailable,

    /// A drop was rejected because the canvas already holds `limit` tiles.
    #[error("Maximum {limit} images allowed on {canvas}. Please remove an image before adding a new one.")]
    CapacityExceeded { canvas: String, limit: usize },

    /// The natural size probe failed; the drop continues with a fallback size.
    #[error("could not resolve natural size of {src}: {reason}")]
    ImageResolutionFailed { src: String, reason: String },

    /// A session or command referenced a tile that is no longer in the store.
    #[error("tile {0} is no longer present")]
    DanglingReference(TileId),

    /// A gesture start was requested while another gesture is running.
    #[error("another gesture is already active")]
    GestureActive,

    #[error("unknown canvas {0}")]
    UnknownCanvas(CanvasId),
}

impl EngineError {
    /// Whether this error should be shown to the user rather than only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, EngineError::CapacityExceeded { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
