//! Layout state - the placement reducer.
//!
//! All mutation of column heights and buckets goes through
//! [`LayoutState::apply`], one event at a time. Resolution runs concurrently
//! elsewhere, but its results come back here serially, so the heights vector
//! never sees interleaved updates.
//!
//! Arrival indices are handed out when a brick is dispatched, before anything
//! resolves. Under `Order` the column is fixed at that point too. Under
//! `Balance` it is chosen when the brick's dimensions arrive.
//!
//! Every invalidating change bumps `version`. Requests carry the version they
//! were issued under and completions from an older version are dropped.

use std::collections::BTreeMap;

use masonry_api::{Brick, Dimensions, MasonryEvent, PlacedBrick, Strategy, Warning};

use crate::constraints::Constraints;
use crate::diff::{diff, unique_bricks};
use crate::error::Result;
use crate::placement::{ColumnHeights, PlacementTable, assign_column};

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// New constraints and/or brick list from the host.
    Configure {
        constraints: Constraints,
        bricks: Vec<Brick>,
    },

    /// A dispatched brick's dimensions are known.
    Resolved {
        version: u64,
        index: usize,
        dimensions: Dimensions,
    },

    /// A dispatched brick could not be resolved.
    Failed {
        version: u64,
        index: usize,
        reason: String,
    },

    /// The parent view was resized. Never invalidates placement.
    LayoutChanged { width: f32, height: f32 },

    /// Toggle sorted buckets.
    SetSorted(bool),
}

/// A brick that needs its dimensions resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub version: u64,
    pub index: usize,
    pub brick: Brick,
}

/// What applying one event produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// Bricks to hand to the resolver.
    pub requests: Vec<ResolveRequest>,
    /// Events for subscribers, in order.
    pub events: Vec<MasonryEvent>,
}

/// A dispatched brick awaiting its dimensions.
#[derive(Debug, Clone, PartialEq)]
struct Pending {
    brick: Brick,
    /// Pre-assigned column (Order only).
    column: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct LayoutState {
    constraints: Constraints,
    sorted: bool,
    /// Bumped on every invalidating change.
    version: u64,
    /// Current unique brick list, in arrival order.
    bricks: Vec<Brick>,
    heights: ColumnHeights,
    table: PlacementTable,
    /// Outstanding resolutions keyed by arrival index. One per brick.
    pending: BTreeMap<usize, Pending>,
    /// Bricks still expected to be placed (failures are subtracted).
    unique_count: usize,
    resolved_count: usize,
    end_reached: bool,
}

impl LayoutState {
    pub fn new(constraints: Constraints, sorted: bool) -> Result<Self> {
        constraints.validate()?;
        Ok(Self {
            constraints,
            sorted,
            version: 0,
            bricks: Vec::new(),
            heights: ColumnHeights::zeroed(constraints.column_count),
            table: PlacementTable::new(constraints.column_count),
            pending: BTreeMap::new(),
            unique_count: 0,
            resolved_count: 0,
            end_reached: false,
        })
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn heights(&self) -> &ColumnHeights {
        &self.heights
    }

    pub fn table(&self) -> &PlacementTable {
        &self.table
    }

    pub fn unique_count(&self) -> usize {
        self.unique_count
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved_count
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// No resolutions outstanding.
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply one event. Only `Configure` with bad constraints fails, and then
    /// the state is left untouched.
    pub fn apply(&mut self, event: LayoutEvent) -> Result<Transition> {
        let mut out = Transition::default();
        match event {
            LayoutEvent::Configure { constraints, bricks } => {
                self.configure(constraints, bricks, &mut out)?
            }
            LayoutEvent::Resolved {
                version,
                index,
                dimensions,
            } => self.resolved(version, index, dimensions, &mut out)?,
            LayoutEvent::Failed {
                version,
                index,
                reason,
            } => self.failed(version, index, reason, &mut out),
            LayoutEvent::LayoutChanged { width, height } => {
                let constraints = self.constraints.size(width, height);
                constraints.validate()?;
                self.resize(constraints);
            }
            LayoutEvent::SetSorted(sorted) => {
                if sorted && !self.sorted {
                    self.table.sort();
                }
                self.sorted = sorted;
            }
        }
        Ok(out)
    }

    // =====================================================================
    // Configuration
    // =====================================================================

    fn configure(
        &mut self,
        constraints: Constraints,
        bricks: Vec<Brick>,
        out: &mut Transition,
    ) -> Result<()> {
        constraints.validate()?;

        let (bricks, duplicates) = unique_bricks(bricks);
        for uri in duplicates {
            tracing::warn!("duplicate brick ignored: {}", uri);
            out.events
                .push(MasonryEvent::Warning(Warning::DuplicateBrick { uri }));
        }

        let outcome = diff(&self.bricks, &bricks);
        let invalidating = constraints.invalidates(&self.constraints) || !outcome.is_incremental();

        if invalidating {
            self.constraints = constraints;
            self.reset(bricks, out);
            return Ok(());
        }

        self.resize(constraints);
        self.bricks = bricks;

        if outcome.delta.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            "appending {} bricks at offset {}",
            outcome.delta.len(),
            outcome.offset
        );
        self.unique_count += outcome.delta.len();
        self.end_reached = false;
        for (i, brick) in outcome.delta.into_iter().enumerate() {
            self.dispatch(outcome.offset + i, brick, out)?;
        }
        Ok(())
    }

    /// Discard all placement and resubmit every brick.
    fn reset(&mut self, bricks: Vec<Brick>, out: &mut Transition) {
        let column_count = self.constraints.column_count;

        self.version += 1;
        self.heights = ColumnHeights::zeroed(column_count);
        self.table = PlacementTable::new(column_count);
        self.pending.clear();
        self.unique_count = bricks.len();
        self.resolved_count = 0;
        self.end_reached = false;
        self.bricks = bricks;

        tracing::info!(
            "layout reset: version {}, {} columns, {} bricks",
            self.version,
            column_count,
            self.bricks.len()
        );
        out.events.push(MasonryEvent::LayoutReset {
            version: self.version,
            column_count,
        });

        let bricks = self.bricks.clone();
        for (index, brick) in bricks.into_iter().enumerate() {
            // Column count was validated, Order assignment cannot fail.
            if let Err(e) = self.dispatch(index, brick, out) {
                tracing::warn!("failed to dispatch brick {}: {}", index, e);
            }
        }
    }

    /// Apply non-invalidating constraint changes (size, spacing).
    fn resize(&mut self, constraints: Constraints) {
        let before = self.reference_width();
        self.constraints = constraints;
        let after = self.reference_width();

        if self.constraints.strategy == Strategy::Balance && before != after {
            self.heights.scale(after / before);
        }
    }

    /// Column width used for balance heights. Before the parent has been
    /// measured the column width is unknown; a unit width keeps the relative
    /// heights meaningful until then.
    fn reference_width(&self) -> f32 {
        match self.constraints.column_width() {
            Ok(w) if w > 0.0 => w,
            _ => 1.0,
        }
    }

    fn dispatch(&mut self, index: usize, brick: Brick, out: &mut Transition) -> Result<()> {
        let column = match self.constraints.strategy {
            Strategy::Order => Some(assign_column(
                index,
                0.0,
                Strategy::Order,
                self.constraints.column_count,
                0.0,
                &mut self.heights,
            )?),
            Strategy::Balance => None,
        };

        self.pending.insert(
            index,
            Pending {
                brick: brick.clone(),
                column,
            },
        );
        out.requests.push(ResolveRequest {
            version: self.version,
            index,
            brick,
        });
        Ok(())
    }

    // =====================================================================
    // Completions
    // =====================================================================

    fn take_pending(&mut self, version: u64, index: usize) -> Option<Pending> {
        if version != self.version {
            tracing::debug!(
                "discarding stale completion for {} (version {}, current {})",
                index,
                version,
                self.version
            );
            return None;
        }
        let pending = self.pending.remove(&index);
        if pending.is_none() {
            tracing::debug!("ignoring completion for unknown brick {}", index);
        }
        pending
    }

    fn resolved(
        &mut self,
        version: u64,
        index: usize,
        dimensions: Dimensions,
        out: &mut Transition,
    ) -> Result<()> {
        let Some(pending) = self.take_pending(version, index) else {
            return Ok(());
        };

        if !dimensions.is_valid() {
            tracing::warn!(
                "invalid dimensions for {}: {}x{}",
                pending.brick.uri,
                dimensions.width,
                dimensions.height
            );
            self.unique_count -= 1;
            out.events
                .push(MasonryEvent::Warning(Warning::InvalidDimensions {
                    uri: pending.brick.uri,
                    width: dimensions.width,
                    height: dimensions.height,
                }));
            self.check_settled(out);
            return Ok(());
        }

        let column = match pending.column {
            Some(column) => column,
            None => assign_column(
                index,
                dimensions.aspect_ratio(),
                self.constraints.strategy,
                self.constraints.column_count,
                self.reference_width(),
                &mut self.heights,
            )?,
        };

        let placed = PlacedBrick::new(pending.brick, dimensions, column, index);
        let uri = placed.uri.clone();
        self.table.insert(placed, self.sorted)?;
        self.resolved_count += 1;

        tracing::debug!("placed {} (index {}) in column {}", uri, index, column);
        out.events.push(MasonryEvent::BrickPlaced { uri, column, index });
        self.check_settled(out);
        Ok(())
    }

    fn failed(&mut self, version: u64, index: usize, reason: String, out: &mut Transition) {
        let Some(pending) = self.take_pending(version, index) else {
            return;
        };

        tracing::warn!("image failed to load: {}: {}", pending.brick.uri, reason);
        self.unique_count -= 1;
        out.events
            .push(MasonryEvent::Warning(Warning::ResolutionFailed {
                uri: pending.brick.uri,
                index,
                reason,
            }));
        self.check_settled(out);
    }

    /// Signal end-reached once per settled state.
    fn check_settled(&mut self, out: &mut Transition) {
        if self.end_reached || self.bricks.is_empty() {
            return;
        }
        if self.resolved_count == self.unique_count && self.pending.is_empty() {
            self.end_reached = true;
            out.events.push(MasonryEvent::EndReached {
                resolved: self.resolved_count,
            });
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
