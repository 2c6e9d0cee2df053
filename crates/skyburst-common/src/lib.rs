//! # Skyburst Common
//!
//! Common types, utilities, and shared abstractions for Skyburst.
//!
//! This crate provides foundational types used across all Skyburst crates:
//! - ID types (`FireworkId`)
//! - Colors with HSL hue rotation
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod ids;

/// World-space vector used for positions, velocities and displacements.
pub use glam::Vec3;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use glam::Vec3;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firework_id_generation() {
        let id1 = FireworkId::new();
        let id2 = FireworkId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
    }

    #[test]
    fn test_error_conversion() {
        let err: SkyburstError = ShapeError::ZeroSegments.into();
        assert!(err.to_string().contains("segment"));
    }

    #[test]
    fn test_named_color_hue_shift() {
        let red = Color::parse("red").unwrap_or(Color::WHITE);
        let shifted = red.shift_hue(120.0);
        assert!(shifted.g > 0.99);
        assert!(shifted.r < 0.01);
    }
}
