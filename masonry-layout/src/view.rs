//! Column views - the placement table sized for rendering.
//!
//! Each brick is scaled to the column width. The gutter becomes the brick's
//! top margin, except for the first brick of a column.

use masonry_api::{BrickKey, Dimensions};
use serde::Serialize;

use crate::constraints::Constraints;
use crate::error::Result;
use crate::placement::PlacementTable;
use crate::sizing::resize_to_column;

/// A placed brick scaled to its column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizedBrick {
    pub key: BrickKey,
    pub uri: String,
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

/// One column ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub column: usize,
    pub width: f32,
    pub bricks: Vec<SizedBrick>,
}

impl ColumnView {
    /// Rendered height including margins.
    pub fn height(&self) -> f32 {
        self.bricks.iter().map(|b| b.height + b.margin_top).sum()
    }
}

/// Size every bucket of `table` for `constraints`.
///
/// Always returns `column_count` views, empty where no brick has landed yet.
/// Bricks that cannot be scaled to a positive size are left out.
pub fn column_views(table: &PlacementTable, constraints: &Constraints) -> Result<Vec<ColumnView>> {
    let width = constraints.column_width()?;
    let gutter = constraints.gutter();

    let views = (0..constraints.column_count)
        .map(|column| {
            let bricks = table
                .bucket(column)
                .unwrap_or_default()
                .iter()
                .enumerate()
                .filter_map(|(position, brick)| {
                    let size: Dimensions = resize_to_column(brick.dimensions, width).ok()?;
                    if !(size.width > 0.0) {
                        return None;
                    }
                    Some(SizedBrick {
                        key: BrickKey { column, position },
                        uri: brick.uri.clone(),
                        index: brick.index,
                        width: size.width,
                        height: size.height,
                        margin_top: if position == 0 { 0.0 } else { gutter },
                        data: brick.data.clone(),
                    })
                })
                .collect();
            ColumnView {
                column,
                width,
                bricks,
            }
        })
        .collect();

    Ok(views)
}
