//! Kernel error types.

use masonry_layout::LayoutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MasonryError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no tokio runtime available to resolve images")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, MasonryError>;
