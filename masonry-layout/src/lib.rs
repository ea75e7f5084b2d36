//! Masonry Layout - the placement engine.
//!
//! Pure, synchronous logic that decides which column every brick lands in:
//!
//! - Column sizing (gutter and column width from the parent width)
//! - Placement (Order / Balance strategies, column buckets)
//! - Diffing (append vs. wholesale replacement of the brick list)
//! - The layout reducer that ties them together
//!
//! # Architecture
//!
//! ```text
//! LayoutEvent -> LayoutState::apply() -> Transition { requests, events }
//! ```
//!
//! Nothing here performs I/O or spawns tasks. The kernel dispatches the
//! resolve requests and feeds completions back one at a time.

pub mod constraints;
pub mod diff;
pub mod placement;
pub mod render;
pub mod sizing;
pub mod state;
pub mod view;

mod error;

pub use constraints::Constraints;
pub use diff::{DiffOutcome, diff, unique_bricks};
pub use error::{LayoutError, Result};
pub use placement::{ColumnHeights, PlacementTable, assign_column};
pub use render::{DefaultImageRenderer, ImageProps, ImageRenderer, ImageStyle, ResizeMethod};
pub use sizing::{column_width, gutter, resize_to_column};
pub use state::{LayoutEvent, LayoutState, ResolveRequest, Transition};
pub use view::{ColumnView, SizedBrick, column_views};
