//! Placement - column assignment and the column buckets.
//!
//! Two strategies decide where a brick goes:
//!
//! - `Order`: round-robin on the arrival index. Deterministic, independent of
//!   dimensions and of the order in which images finish resolving.
//! - `Balance`: the currently shortest column wins, and its height grows by
//!   the brick's height once scaled to the column width.
//!
//! Balance is a greedy online heuristic. Bricks resolve asynchronously, so the
//! order they are balanced in is completion order, not arrival order, and the
//! result can drift from an ideal packing. That is inherent to placing bricks
//! as they arrive.

use masonry_api::{PlacedBrick, Strategy};

use crate::error::{LayoutError, Result};

// =========================================================================
// ColumnHeights
// =========================================================================

/// Accumulated rendered height per column. Only Balance reads or writes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnHeights(Vec<f32>);

impl ColumnHeights {
    /// A zero vector with one entry per column.
    pub fn zeroed(column_count: usize) -> Self {
        Self(vec![0.0; column_count])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Index of the shortest column. Ties go to the lowest index.
    pub fn shortest(&self) -> usize {
        self.0
            .iter()
            .enumerate()
            .fold(0, |shortest, (i, &h)| if h < self.0[shortest] { i } else { shortest })
    }

    /// Grow one column.
    pub fn add(&mut self, column: usize, height: f32) {
        if let Some(h) = self.0.get_mut(column) {
            *h += height;
        }
    }

    /// Rescale every column, e.g. after the column width changed.
    pub fn scale(&mut self, factor: f32) {
        for h in &mut self.0 {
            *h *= factor;
        }
    }
}

/// Pick a column for the brick at `index`.
///
/// `aspect_ratio` is height / width of the brick and `column_width` the
/// current column width. Under Balance the chosen column's height is grown
/// by `column_width * aspect_ratio`; under Order `heights` is left alone.
pub fn assign_column(
    index: usize,
    aspect_ratio: f32,
    strategy: Strategy,
    column_count: usize,
    column_width: f32,
    heights: &mut ColumnHeights,
) -> Result<usize> {
    if column_count == 0 {
        return Err(LayoutError::InvalidConfiguration(
            "column count must be at least 1".to_string(),
        ));
    }

    match strategy {
        Strategy::Order => Ok(index % column_count),
        Strategy::Balance => {
            if heights.len() != column_count {
                return Err(LayoutError::InvalidConfiguration(format!(
                    "column heights track {} columns, expected {}",
                    heights.len(),
                    column_count
                )));
            }
            let column = heights.shortest();
            heights.add(column, column_width * aspect_ratio);
            Ok(column)
        }
    }
}

// =========================================================================
// PlacementTable
// =========================================================================

/// Column buckets of placed bricks, column-major.
///
/// Buckets are created lazily as bricks land in them, never past
/// `column_count`. Every placed brick is in exactly one bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlacementTable {
    buckets: Vec<Vec<PlacedBrick>>,
    column_count: usize,
}

impl PlacementTable {
    pub fn new(column_count: usize) -> Self {
        Self {
            buckets: Vec::with_capacity(column_count),
            column_count,
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// The buckets created so far.
    pub fn buckets(&self) -> &[Vec<PlacedBrick>] {
        &self.buckets
    }

    /// One bucket, if it has been created.
    pub fn bucket(&self, column: usize) -> Option<&[PlacedBrick]> {
        self.buckets.get(column).map(Vec::as_slice)
    }

    /// Total number of placed bricks.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.iter().any(|b| b.uri == uri)
    }

    /// All placed bricks, column by column.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedBrick> {
        self.buckets.iter().flatten()
    }

    /// Insert a resolved brick into its column.
    ///
    /// With `sorted`, the bucket stays ascending by arrival index; otherwise
    /// the brick is appended in completion order.
    pub fn insert(&mut self, brick: PlacedBrick, sorted: bool) -> Result<()> {
        let column = brick.column;
        if column >= self.column_count {
            return Err(LayoutError::ColumnOutOfRange {
                column,
                columns: self.column_count,
            });
        }

        if self.buckets.len() <= column {
            self.buckets.resize_with(column + 1, Vec::new);
        }

        let bucket = &mut self.buckets[column];
        if sorted {
            let pos = bucket.partition_point(|b| b.index < brick.index);
            bucket.insert(pos, brick);
        } else {
            bucket.push(brick);
        }
        Ok(())
    }

    /// Sort every bucket by arrival index.
    pub fn sort(&mut self) {
        for bucket in &mut self.buckets {
            bucket.sort_by_key(|b| b.index);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
