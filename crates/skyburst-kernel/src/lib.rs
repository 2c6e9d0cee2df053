//! # Skyburst Kernel
//!
//! CPU particle simulation for a single firework's life:
//! - Fixed-capacity trail buffers
//! - Gaussian sparkle jitter (Box–Muller)
//! - Launch trail emitter (rising phase)
//! - Burst shapes (spherical and pixel-raster) and the burst simulator
//! - Point batches handed to an external point-cloud renderer
//!
//! Everything here is single-threaded and driven by a per-frame `update(dt)`.
//! Buffers are mutated in place; renderers borrow them for the duration of a
//! draw call only.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod burst;
pub mod emitter;
pub mod jitter;
pub mod render;
pub mod shape;
pub mod trail;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::burst::*;
    pub use crate::emitter::*;
    pub use crate::jitter::*;
    pub use crate::render::*;
    pub use crate::shape::*;
    pub use crate::trail::*;
    pub use crate::TickOutcome;
}

pub use prelude::*;

/// Result of advancing an emitter or simulator by one tick.
///
/// `Completed` is edge-triggered: it is returned by exactly one call, after
/// which every further update reports `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still animating
    Running,
    /// Finished during this tick
    Completed,
    /// Already finished or disposed; nothing was touched
    Idle,
}

impl TickOutcome {
    /// Whether this tick carried the completion edge.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}
