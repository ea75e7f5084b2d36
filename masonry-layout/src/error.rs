//! Layout error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("column {column} out of range for {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
