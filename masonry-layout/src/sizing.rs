//! Column sizing.
//!
//! The gutter is a percentage of the parent width. It is shared between
//! neighbouring columns, so each column gives up half of it.

use masonry_api::Dimensions;

use crate::error::{LayoutError, Result};

/// Inter-brick spacing for a parent of `total_width`.
#[inline]
pub fn gutter(total_width: f32, spacing: f32) -> f32 {
    (total_width / 100.0) * spacing
}

/// Pixel width of one column.
pub fn column_width(total_width: f32, spacing: f32, column_count: usize) -> Result<f32> {
    if column_count == 0 {
        return Err(LayoutError::InvalidConfiguration(
            "column count must be at least 1".to_string(),
        ));
    }
    Ok((total_width / column_count as f32) - (gutter(total_width, spacing) / 2.0))
}

/// Scale `dims` to `column_width`, keeping the aspect ratio.
pub fn resize_to_column(dims: Dimensions, column_width: f32) -> Result<Dimensions> {
    if !dims.is_valid() {
        return Err(LayoutError::InvalidDimensions {
            width: dims.width,
            height: dims.height,
        });
    }

    let divider = dims.width / column_width;
    Ok(Dimensions::new(dims.width / divider, dims.height / divider))
}
