//! Masonry Kernel - drives the placement engine.
//!
//! This crate owns the running layout:
//! - Dispatching resolve requests to an [`ImageResolver`] on tokio
//! - Feeding completions back into the layout reducer one at a time
//! - Broadcasting [`MasonryEvent`]s to subscribers
//! - Configuration loading
//!
//! Resolution tasks run concurrently and finish in any order. Their results
//! travel over a channel and are applied serially, so placement state is
//! only ever touched from the owner of the [`Masonry`].

mod config;
mod error;

pub use config::MasonryConfig;
pub use error::{MasonryError, Result};

pub use masonry_api::{Brick, Dimensions, MasonryEvent, PlacedBrick, Strategy, Warning};
pub use masonry_layout::{
    ColumnView, DefaultImageRenderer, ImageProps, ImageRenderer, ImageStyle, LayoutState,
    PlacementTable, SizedBrick,
};
pub use masonry_resolver::ImageResolver;

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use masonry_layout::{LayoutEvent, ResolveRequest, Transition};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};

/// Callback invoked with the resolved count when the layout settles.
pub type EndReachedCallback = Box<dyn FnMut(usize) + Send>;

/// Outcome of one resolve request.
#[derive(Debug)]
struct Completion {
    version: u64,
    index: usize,
    uri: String,
    result: std::result::Result<Dimensions, String>,
}

/// The masonry kernel - owns layout state and resolves bricks into it.
pub struct Masonry {
    state: LayoutState,
    config: MasonryConfig,
    resolver: Arc<dyn ImageResolver>,
    renderer: Box<dyn ImageRenderer>,
    style: ImageStyle,
    /// Dimensions already resolved, keyed by URI.
    cache: HashMap<String, Dimensions>,
    /// Runtime resolve tasks are spawned on.
    runtime: Handle,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    event_tx: broadcast::Sender<MasonryEvent>,
    on_end_reached: Option<EndReachedCallback>,
}

impl Masonry {
    /// Create a kernel with the default renderer and an event receiver.
    pub fn new(
        config: MasonryConfig,
        resolver: Arc<dyn ImageResolver>,
    ) -> Result<(Self, broadcast::Receiver<MasonryEvent>)> {
        let masonry = Self::builder(resolver).config(config).build()?;
        let rx = masonry.subscribe();
        Ok((masonry, rx))
    }

    pub fn builder(resolver: Arc<dyn ImageResolver>) -> MasonryBuilder {
        MasonryBuilder::new(resolver)
    }

    /// Subscribe to layout events.
    pub fn subscribe(&self) -> broadcast::Receiver<MasonryEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &MasonryConfig {
        &self.config
    }

    /// The underlying layout state.
    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn table(&self) -> &PlacementTable {
        self.state.table()
    }

    /// Passed through for the renderer's list.
    pub fn end_reached_threshold(&self) -> f32 {
        self.config.end_reached_threshold
    }

    // =====================================================================
    // Host inputs
    // =====================================================================

    /// Replace the brick list. Appends resolve only the new bricks.
    pub fn set_bricks(&mut self, bricks: Vec<Brick>) -> Result<()> {
        let constraints = *self.state.constraints();
        self.apply_configure(constraints, bricks)
    }

    /// Apply a new configuration to the current bricks.
    pub fn set_config(&mut self, config: MasonryConfig) -> Result<()> {
        let bricks = self.state.bricks().to_vec();
        self.update(config, bricks)
    }

    /// Apply a configuration and brick list together.
    pub fn update(&mut self, config: MasonryConfig, bricks: Vec<Brick>) -> Result<()> {
        config.validate()?;
        let current = self.state.constraints();
        let constraints = config.constraints(current.total_width, current.total_height);

        self.apply_configure(constraints, bricks)?;
        if config.sorted != self.state.sorted() {
            self.apply(LayoutEvent::SetSorted(config.sorted))?;
        }
        self.config = config;
        Ok(())
    }

    /// The parent view was measured or resized.
    pub fn on_layout_changed(&mut self, width: f32, height: f32) -> Result<()> {
        self.apply(LayoutEvent::LayoutChanged { width, height })
    }

    /// Register the end-reached callback, replacing any previous one.
    pub fn on_end_reached(&mut self, callback: impl FnMut(usize) + Send + 'static) {
        self.on_end_reached = Some(Box::new(callback));
    }

    // =====================================================================
    // Completions
    // =====================================================================

    /// Wait for one completion and apply it.
    ///
    /// Returns `false` without waiting when nothing is outstanding.
    pub async fn step(&mut self) -> Result<bool> {
        if self.state.is_settled() {
            return Ok(false);
        }
        match self.completion_rx.recv().await {
            Some(completion) => {
                self.complete(completion)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply every completion that is already available. Never waits.
    pub fn process_ready(&mut self) -> Result<usize> {
        let mut count = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.complete(completion)?;
            count += 1;
        }
        Ok(count)
    }

    /// Wait until no resolutions are outstanding.
    pub async fn settle(&mut self) -> Result<()> {
        while self.step().await? {}
        Ok(())
    }

    // =====================================================================
    // Output
    // =====================================================================

    /// Columns sized for the current parent width.
    pub fn column_views(&self) -> Result<Vec<ColumnView>> {
        Ok(masonry_layout::column_views(
            self.state.table(),
            self.state.constraints(),
        )?)
    }

    /// Image props per column, through the configured renderer.
    pub fn image_props(&self) -> Result<Vec<Vec<ImageProps>>> {
        Ok(self
            .column_views()?
            .iter()
            .map(|view| {
                view.bricks
                    .iter()
                    .map(|brick| self.renderer.render(brick, &self.style))
                    .collect()
            })
            .collect())
    }

    // =====================================================================
    // Internals
    // =====================================================================

    fn apply_configure(
        &mut self,
        constraints: masonry_layout::Constraints,
        bricks: Vec<Brick>,
    ) -> Result<()> {
        let version = self.state.version();
        self.apply(LayoutEvent::Configure {
            constraints,
            bricks,
        })?;

        if self.state.version() != version {
            let live: HashSet<&str> = self.state.bricks().iter().map(Brick::key).collect();
            self.cache.retain(|uri, _| live.contains(uri.as_str()));
        }
        Ok(())
    }

    fn apply(&mut self, event: LayoutEvent) -> Result<()> {
        let transition = self.state.apply(event)?;
        self.emit(transition)
    }

    fn complete(&mut self, completion: Completion) -> Result<()> {
        let Completion {
            version,
            index,
            uri,
            result,
        } = completion;

        let event = match result {
            Ok(dimensions) => {
                if self.config.reuse_resolved && version == self.state.version() {
                    self.cache.insert(uri, dimensions);
                }
                LayoutEvent::Resolved {
                    version,
                    index,
                    dimensions,
                }
            }
            Err(reason) => LayoutEvent::Failed {
                version,
                index,
                reason,
            },
        };
        self.apply(event)
    }

    fn emit(&mut self, transition: Transition) -> Result<()> {
        let Transition { requests, events } = transition;

        for event in events {
            if let MasonryEvent::EndReached { resolved } = event {
                tracing::debug!("end reached with {} bricks", resolved);
                if let Some(callback) = self.on_end_reached.as_mut() {
                    callback(resolved);
                }
            }
            // No subscribers is fine.
            let _ = self.event_tx.send(event);
        }

        for request in requests {
            self.dispatch(request);
        }
        Ok(())
    }

    fn dispatch(&mut self, request: ResolveRequest) {
        let ResolveRequest {
            version,
            index,
            brick,
        } = request;

        let known = brick.dimensions.or_else(|| {
            self.config
                .reuse_resolved
                .then(|| self.cache.get(&brick.uri).copied())
                .flatten()
        });

        if let Some(dimensions) = known {
            let _ = self.completion_tx.send(Completion {
                version,
                index,
                uri: brick.uri,
                result: Ok(dimensions),
            });
            return;
        }

        let resolver = self.resolver.clone();
        let tx = self.completion_tx.clone();

        self.runtime.spawn(async move {
            let result = match AssertUnwindSafe(resolver.resolve(&brick)).catch_unwind().await {
                Ok(Ok(dimensions)) => Ok(dimensions),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err("resolver panicked".to_string()),
            };
            let _ = tx.send(Completion {
                version,
                index,
                uri: brick.uri,
                result,
            });
        });
    }
}

// =========================================================================
// Builder
// =========================================================================

/// Builds a [`Masonry`]. The renderer is fixed here for the kernel's life.
pub struct MasonryBuilder {
    config: MasonryConfig,
    resolver: Arc<dyn ImageResolver>,
    renderer: Option<Box<dyn ImageRenderer>>,
    style: ImageStyle,
    size: (f32, f32),
    runtime: Option<Handle>,
    on_end_reached: Option<EndReachedCallback>,
}

impl MasonryBuilder {
    pub fn new(resolver: Arc<dyn ImageResolver>) -> Self {
        Self {
            config: MasonryConfig::default(),
            resolver,
            renderer: None,
            style: ImageStyle::default(),
            size: (0.0, 0.0),
            runtime: None,
            on_end_reached: None,
        }
    }

    pub fn config(mut self, config: MasonryConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the default image renderer.
    pub fn renderer(mut self, renderer: impl ImageRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Styling passed to the renderer for every image.
    pub fn style(mut self, style: ImageStyle) -> Self {
        self.style = style;
        self
    }

    /// Initial parent size, if already known.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = (width, height);
        self
    }

    /// Spawn resolve tasks on `handle` instead of the current runtime.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn on_end_reached(mut self, callback: impl FnMut(usize) + Send + 'static) -> Self {
        self.on_end_reached = Some(Box::new(callback));
        self
    }

    /// Fails outside a tokio runtime unless one was given with
    /// [`runtime`](Self::runtime).
    pub fn build(self) -> Result<Masonry> {
        self.config.validate()?;
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| MasonryError::NoRuntime)?,
        };
        let (width, height) = self.size;
        let state = LayoutState::new(self.config.constraints(width, height), self.config.sorted)?;

        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(1024);

        Ok(Masonry {
            state,
            config: self.config,
            resolver: self.resolver,
            renderer: self
                .renderer
                .unwrap_or_else(|| Box::new(DefaultImageRenderer)),
            style: self.style,
            cache: HashMap::new(),
            runtime,
            completion_tx,
            completion_rx,
            event_tx,
            on_end_reached: self.on_end_reached,
        })
    }
}
