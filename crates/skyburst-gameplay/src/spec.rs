//! Firework specifications.
//!
//! A [`FireworkSpec`] is everything needed to fly one firework from launch to
//! extinguishment. It is created per trigger, validated once, and consumed by
//! a [`LifecycleController`](crate::lifecycle::LifecycleController).

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skyburst_common::{Color, LaunchError, ShapeError, SkyburstResult};
use skyburst_kernel::{BurstParams, BurstShape, PixelGrid, DEFAULT_CELL_SPACING, DEFAULT_SEGMENTS};

/// Seconds the launch trail takes to reach the burst point.
pub const DEFAULT_LAUNCH_DURATION: f32 = 2.0;

/// Hue rotation between consecutive peony layers, in degrees.
pub const LAYER_HUE_STEP: f32 = 120.0;

/// When a multi-layer burst counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerCompletion {
    /// Every layer must have completed
    #[default]
    AllLayers,
    /// The first layer to complete finishes the whole firework
    FirstLayer,
}

/// Immutable description of one firework.
#[derive(Debug, Clone, PartialEq)]
pub struct FireworkSpec {
    /// Launch start
    pub origin: Vec3,
    /// Launch end and burst center
    pub target: Vec3,
    /// Base color
    pub color: Color,
    /// Burst size factor
    pub size: f32,
    /// Star layout
    pub shape: BurstShape,
    /// Concentric layers (peony)
    pub layer_count: u32,
    /// Launch duration in seconds
    pub launch_duration: f32,
    /// Burst tunables
    pub burst: BurstParams,
    /// Completion rule for multi-layer bursts
    pub layer_completion: LayerCompletion,
    /// Extra seconds of lifetime for each layer after the first
    pub layer_stagger: f32,
}

impl FireworkSpec {
    /// Single-layer peony.
    #[must_use]
    pub fn peony(origin: Vec3, target: Vec3, color: Color) -> Self {
        Self {
            origin,
            target,
            color,
            size: 1.0,
            shape: BurstShape::Spherical {
                segments: DEFAULT_SEGMENTS,
            },
            layer_count: 1,
            launch_duration: DEFAULT_LAUNCH_DURATION,
            burst: BurstParams::spherical(),
            layer_completion: LayerCompletion::default(),
            layer_stagger: 0.0,
        }
    }

    /// Chrysanthemum: a peony that leaves a sparkle trail.
    #[must_use]
    pub fn chrysanthemum(origin: Vec3, target: Vec3, color: Color) -> Self {
        Self {
            burst: BurstParams::chrysanthemum(),
            ..Self::peony(origin, target, color)
        }
    }

    /// Illustration burst tracing a pixel-art silhouette.
    #[must_use]
    pub fn illustration(origin: Vec3, target: Vec3, color: Color, grid: PixelGrid) -> Self {
        Self {
            shape: BurstShape::Raster {
                grid,
                cell_spacing: DEFAULT_CELL_SPACING,
            },
            burst: BurstParams::raster(),
            ..Self::peony(origin, target, color)
        }
    }

    /// Sets the size factor.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Sets the layer count.
    pub fn with_layers(mut self, layer_count: u32) -> Self {
        self.layer_count = layer_count;
        self
    }

    /// Sets the launch duration.
    pub fn with_launch_duration(mut self, seconds: f32) -> Self {
        self.launch_duration = seconds;
        self
    }

    /// Sets the multi-layer completion rule.
    pub fn with_layer_completion(mut self, rule: LayerCompletion) -> Self {
        self.layer_completion = rule;
        self
    }

    /// Sets the per-layer lifetime stagger.
    pub fn with_layer_stagger(mut self, seconds: f32) -> Self {
        self.layer_stagger = seconds;
        self
    }

    /// Rejects specs that could only produce NaN positions or no burst at all.
    pub fn validate(&self) -> SkyburstResult<()> {
        if !self.origin.is_finite() || !self.target.is_finite() {
            return Err(LaunchError::NonFiniteCoordinate.into());
        }
        if !self.launch_duration.is_finite() || self.launch_duration <= 0.0 {
            return Err(LaunchError::InvalidDuration(self.launch_duration).into());
        }
        if (self.target - self.origin).length() <= f32::EPSILON {
            return Err(LaunchError::DegenerateLaunch.into());
        }
        if self.layer_count == 0 {
            return Err(LaunchError::ZeroLayers.into());
        }
        if !self.layer_stagger.is_finite() || self.layer_stagger < 0.0 {
            return Err(LaunchError::InvalidStagger(self.layer_stagger).into());
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ShapeError::InvalidSize(self.size).into());
        }
        self.shape.validate()?;
        Ok(())
    }

    /// Size of layer `index`: `size / (index + 1)`.
    #[must_use]
    pub fn layer_size(&self, index: u32) -> f32 {
        self.size / (index as f32 + 1.0)
    }

    /// Burst tunables for layer `index`: lifetime grows by `index * layer_stagger`.
    #[must_use]
    pub fn layer_params(&self, index: u32) -> BurstParams {
        BurstParams {
            lifetime: self.burst.lifetime + index as f32 * self.layer_stagger,
            ..self.burst
        }
    }

    /// Color of layer `index`: base hue rotated by `index * 120°`.
    #[must_use]
    pub fn layer_color(&self, index: u32) -> Color {
        if index == 0 {
            self.color
        } else {
            self.color.shift_hue(index as f32 * LAYER_HUE_STEP)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_common::SkyburstError;

    fn up() -> (Vec3, Vec3) {
        (Vec3::new(0.0, -10.0, 0.0), Vec3::new(0.0, 0.0, 0.0))
    }

    #[test]
    fn test_presets_validate() {
        let (from, to) = up();
        assert!(FireworkSpec::peony(from, to, Color::WHITE).validate().is_ok());
        assert!(FireworkSpec::chrysanthemum(from, to, Color::WHITE).validate().is_ok());
        let grid = PixelGrid::new(vec![vec![true]]).expect("1x1 grid");
        assert!(FireworkSpec::illustration(from, to, Color::WHITE, grid).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_layers_and_bad_size() {
        let (from, to) = up();
        let spec = FireworkSpec::peony(from, to, Color::WHITE).with_layers(0);
        assert!(matches!(spec.validate(), Err(SkyburstError::Launch(LaunchError::ZeroLayers))));

        let spec = FireworkSpec::peony(from, to, Color::WHITE).with_size(-2.0);
        assert!(matches!(spec.validate(), Err(SkyburstError::Shape(ShapeError::InvalidSize(_)))));
    }

    #[test]
    fn test_rejects_zero_segments() {
        let (from, to) = up();
        let mut spec = FireworkSpec::peony(from, to, Color::WHITE);
        spec.shape = BurstShape::Spherical { segments: 0 };
        assert!(matches!(spec.validate(), Err(SkyburstError::Shape(ShapeError::ZeroSegments))));
    }

    #[test]
    fn test_rejects_degenerate_launch() {
        let spec = FireworkSpec::peony(Vec3::ONE, Vec3::ONE, Color::WHITE);
        assert!(matches!(spec.validate(), Err(SkyburstError::Launch(LaunchError::DegenerateLaunch))));
    }

    #[test]
    fn test_layer_size_and_color() {
        let (from, to) = up();
        let spec = FireworkSpec::peony(from, to, Color::rgb(1.0, 0.0, 0.0))
            .with_size(3.0)
            .with_layers(3);
        assert_eq!(spec.layer_size(0), 3.0);
        assert_eq!(spec.layer_size(2), 1.0);
        assert_eq!(spec.layer_color(0), Color::rgb(1.0, 0.0, 0.0));
        let second = spec.layer_color(1);
        assert!(second.g > 0.99 && second.r < 0.01);
    }

    #[test]
    fn test_layer_stagger() {
        let (from, to) = up();
        let spec = FireworkSpec::peony(from, to, Color::WHITE).with_layers(3);
        assert_eq!(spec.layer_params(2), spec.burst);

        let spec = spec.with_layer_stagger(0.5);
        assert_eq!(spec.layer_params(0).lifetime, spec.burst.lifetime);
        assert_eq!(spec.layer_params(2).lifetime, spec.burst.lifetime + 1.0);
        assert_eq!(spec.layer_params(2).gravity, spec.burst.gravity);

        let spec = spec.with_layer_stagger(-1.0);
        assert!(matches!(
            spec.validate(),
            Err(SkyburstError::Launch(LaunchError::InvalidStagger(_)))
        ));
    }
}
