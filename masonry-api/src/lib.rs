//! Masonry API - Shared types and events for the masonry placement runtime.

mod brick;
mod event;

pub use brick::*;
pub use event::*;
