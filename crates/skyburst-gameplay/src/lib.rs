//! # Skyburst Gameplay
//!
//! Show-level systems built on the simulation kernel.
//!
//! This crate provides:
//! - Firework specs (peony, chrysanthemum, illustration)
//! - The per-firework lifecycle state machine
//! - The scene coordinator that owns every active firework
//! - Launch triggers (button, timer, jump) and the jump detector
//! - Illustration record decoding
//! - Event bus for show notifications

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod events;
pub mod illustration;
pub mod jump;
pub mod lifecycle;
pub mod scene;
pub mod spec;
pub mod trigger;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::events::*;
    pub use crate::illustration::*;
    pub use crate::jump::*;
    pub use crate::lifecycle::*;
    pub use crate::scene::*;
    pub use crate::spec::*;
    pub use crate::trigger::*;
}

pub use prelude::*;
