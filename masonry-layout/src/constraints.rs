//! Layout constraints supplied by the host.
//!
//! Only `column_count` and `strategy` invalidate placement. Width and height
//! follow the parent view and change freely (rotation, resize) without
//! re-resolving anything.

use masonry_api::Strategy;

use crate::error::{LayoutError, Result};
use crate::sizing;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub total_width: f32,
    /// Not used for placement; carried for the renderer.
    pub total_height: f32,
    pub column_count: usize,
    /// Gutter as a percentage of `total_width`.
    pub spacing: f32,
    pub strategy: Strategy,
}

impl Constraints {
    pub fn new(column_count: usize, strategy: Strategy) -> Self {
        Self {
            total_width: 0.0,
            total_height: 0.0,
            column_count,
            spacing: 1.0,
            strategy,
        }
    }

    /// Set the parent size.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.total_width = width;
        self.total_height = height;
        self
    }

    /// Set the spacing factor.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Reject degenerate constraints. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if self.column_count == 0 {
            return Err(LayoutError::InvalidConfiguration(
                "column count must be at least 1".to_string(),
            ));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(LayoutError::InvalidConfiguration(format!(
                "spacing must be a finite number >= 0, got {}",
                self.spacing
            )));
        }
        if !self.total_width.is_finite() || self.total_width < 0.0 {
            return Err(LayoutError::InvalidConfiguration(format!(
                "width must be a finite number >= 0, got {}",
                self.total_width
            )));
        }
        if !self.total_height.is_finite() || self.total_height < 0.0 {
            return Err(LayoutError::InvalidConfiguration(format!(
                "height must be a finite number >= 0, got {}",
                self.total_height
            )));
        }
        if self.total_width > 0.0 {
            let width = self.column_width()?;
            if width <= 0.0 {
                return Err(LayoutError::InvalidConfiguration(format!(
                    "spacing {} leaves no room for {} columns in width {}",
                    self.spacing, self.column_count, self.total_width
                )));
            }
        }
        Ok(())
    }

    /// Whether moving from `previous` to `self` discards existing placement.
    pub fn invalidates(&self, previous: &Constraints) -> bool {
        self.column_count != previous.column_count || self.strategy != previous.strategy
    }

    #[inline]
    pub fn gutter(&self) -> f32 {
        sizing::gutter(self.total_width, self.spacing)
    }

    #[inline]
    pub fn column_width(&self) -> Result<f32> {
        sizing::column_width(self.total_width, self.spacing, self.column_count)
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::new(2, Strategy::Order)
    }
}
