//! Layout events emitted by the masonry kernel to subscribers (renderers, feeds, etc.)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Events emitted while bricks resolve and settle into columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MasonryEvent {
    /// Placement was discarded and is being rebuilt from scratch.
    LayoutReset {
        /// Configuration version the new placement belongs to.
        version: u64,
        column_count: usize,
    },

    /// A brick resolved and was inserted into a column.
    BrickPlaced {
        uri: String,
        column: usize,
        index: usize,
    },

    /// A brick was excluded from placement. Other bricks are unaffected.
    Warning(Warning),

    /// Every expected brick has been placed. Fires once per settled state.
    EndReached { resolved: usize },
}

/// Recoverable, per-brick problems.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum Warning {
    #[error("image failed to load: {uri}: {reason}")]
    ResolutionFailed {
        uri: String,
        index: usize,
        reason: String,
    },

    #[error("invalid dimensions for {uri}: {width}x{height}")]
    InvalidDimensions { uri: String, width: f32, height: f32 },

    #[error("duplicate brick ignored: {uri}")]
    DuplicateBrick { uri: String },
}

impl Warning {
    /// URI of the brick this warning concerns.
    pub fn uri(&self) -> &str {
        match self {
            Warning::ResolutionFailed { uri, .. }
            | Warning::InvalidDimensions { uri, .. }
            | Warning::DuplicateBrick { uri } => uri,
        }
    }
}
