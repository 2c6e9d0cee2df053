//! Burst simulator.
//!
//! Integrates a fixed set of stars outward from a shared center under gravity
//! and per-tick velocity decay while the material fades. Stars are stored as
//! parallel position/velocity buffers that are mutated in place every tick.
//!
//! # Example
//!
//! ```
//! use skyburst_kernel::{BurstParams, BurstShape, BurstSimulator, TickOutcome};
//! use skyburst_common::{Color, Vec3};
//!
//! let shape = BurstShape::spherical(20).unwrap();
//! let mut burst = BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, 1.0, BurstParams::spherical()).unwrap();
//!
//! assert_eq!(burst.update(1.0 / 60.0), TickOutcome::Running);
//! assert!(burst.opacity() < 1.0);
//! ```

use glam::Vec3;
use skyburst_common::{Color, ShapeError};
use tracing::{debug, warn};

use crate::jitter::GaussianJitter;
use crate::render::{BatchKind, PointBatch, RenderSurface};
use crate::shape::BurstShape;
use crate::trail::{TrailBuffer, SPARKLE_TRAIL_CAPACITY};
use crate::TickOutcome;

/// Star speed at `size == 1`, in world units per tick.
pub const BASE_SPEED: f32 = 0.3;

/// Seconds a burst lives before it completes.
pub const BURST_LIFETIME: f32 = 4.0;

/// Which stars feed the sparkle trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailSource {
    /// Every star contributes one sample per sampling tick
    AllParticles,
    /// Only the star at this index contributes
    Representative(usize),
}

/// Sparkle trail configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParams {
    /// Samples kept
    pub capacity: usize,
    /// Sample on every n-th tick (0 is treated as 1)
    pub sample_interval: u32,
    /// Per-axis jitter applied to each sample
    pub jitter_std_dev: f32,
    /// Stars that feed the trail
    pub source: TrailSource,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            capacity: SPARKLE_TRAIL_CAPACITY,
            sample_interval: 2,
            jitter_std_dev: 0.0,
            source: TrailSource::AllParticles,
        }
    }
}

/// Tunable burst constants.
///
/// These are visual parameters, not physics: the presets reproduce the look
/// of each firework family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstParams {
    /// Subtracted from every star's vertical velocity each tick
    pub gravity: f32,
    /// Velocity multiplier applied each tick once time has elapsed
    pub decay: f32,
    /// Opacity removed each tick once time has elapsed
    pub opacity_step: f32,
    /// Opacity at activation
    pub initial_opacity: f32,
    /// Seconds until completion
    pub lifetime: f32,
    /// Star speed at `size == 1`
    pub base_speed: f32,
    /// Star point sprite size
    pub point_size: f32,
    /// Optional sparkle trail
    pub trail: Option<TrailParams>,
}

impl BurstParams {
    /// Peony preset.
    #[must_use]
    pub const fn spherical() -> Self {
        Self {
            gravity: 0.05,
            decay: 0.98,
            opacity_step: 0.005,
            initial_opacity: 1.0,
            lifetime: BURST_LIFETIME,
            base_speed: BASE_SPEED,
            point_size: 1.0,
            trail: None,
        }
    }

    /// Chrysanthemum preset: spherical with a sparkle trail from every star.
    #[must_use]
    pub fn chrysanthemum() -> Self {
        Self {
            point_size: 0.5,
            trail: Some(TrailParams::default()),
            ..Self::spherical()
        }
    }

    /// Illustration preset: weak gravity and small points so the silhouette
    /// stays legible.
    #[must_use]
    pub const fn raster() -> Self {
        Self {
            gravity: 0.005,
            point_size: 0.2,
            ..Self::spherical()
        }
    }

    /// Default preset for a shape.
    #[must_use]
    pub const fn for_shape(shape: &BurstShape) -> Self {
        if shape.is_raster() {
            Self::raster()
        } else {
            Self::spherical()
        }
    }
}

impl Default for BurstParams {
    fn default() -> Self {
        Self::spherical()
    }
}

/// A single star, copied out of the simulator's buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World position
    pub position: Vec3,
    /// Velocity in world units per tick
    pub velocity: Vec3,
}

/// Sparkle trail state.
#[derive(Debug, Clone)]
struct SparkleTrail {
    buffer: TrailBuffer,
    params: TrailParams,
    jitter: GaussianJitter,
}

/// Explosion-phase simulator.
#[derive(Debug, Clone)]
pub struct BurstSimulator {
    /// Star positions
    positions: Vec<Vec3>,
    /// Star velocities
    velocities: Vec<Vec3>,
    /// Material color
    color: Color,
    /// Material opacity
    opacity: f32,
    /// Burst center
    center: Vec3,
    /// Size factor the burst was built with
    size: f32,
    /// Tunables
    params: BurstParams,
    /// Optional sparkle trail
    trail: Option<SparkleTrail>,
    /// Seconds since activation
    elapsed: f32,
    /// Ticks integrated
    ticks: u64,
    /// Completion edge already reported
    completed: bool,
    /// Buffers released
    disposed: bool,
    /// Non-finite velocity already logged
    warned_non_finite: bool,
}

impl BurstSimulator {
    /// Builds a burst around `center`.
    pub fn new(
        shape: &BurstShape,
        center: Vec3,
        color: Color,
        size: f32,
        params: BurstParams,
    ) -> Result<Self, ShapeError> {
        shape.validate()?;
        if !size.is_finite() || size <= 0.0 {
            return Err(ShapeError::InvalidSize(size));
        }

        let layout = shape.layout(center, size, params.base_speed);
        let trail = params.trail.map(|trail_params| SparkleTrail {
            buffer: TrailBuffer::new(trail_params.capacity),
            params: trail_params,
            jitter: GaussianJitter::new(trail_params.jitter_std_dev),
        });

        debug!(
            particles = layout.positions.len(),
            raster = shape.is_raster(),
            size,
            "burst created"
        );

        Ok(Self {
            positions: layout.positions,
            velocities: layout.velocities,
            color,
            opacity: params.initial_opacity,
            center,
            size,
            params,
            trail,
            elapsed: 0.0,
            ticks: 0,
            completed: false,
            disposed: false,
            warned_non_finite: false,
        })
    }

    /// Makes the sparkle trail jitter deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        if let Some(trail) = self.trail.as_mut() {
            trail.jitter = GaussianJitter::with_seed(trail.params.jitter_std_dev, seed);
        }
        self
    }

    /// Advances by `dt` seconds.
    ///
    /// A negative or non-finite `dt` is ignored.
    pub fn update(&mut self, dt: f32) -> TickOutcome {
        if self.completed || self.disposed {
            return TickOutcome::Idle;
        }
        if !dt.is_finite() || dt < 0.0 {
            return TickOutcome::Running;
        }

        self.elapsed += dt;
        if self.elapsed > self.params.lifetime {
            self.completed = true;
            debug!(elapsed = self.elapsed, "burst complete");
            return TickOutcome::Completed;
        }

        self.integrate();
        self.sample_trail();

        if self.elapsed > 0.0 {
            for velocity in &mut self.velocities {
                *velocity *= self.params.decay;
            }
            self.opacity = (self.opacity - self.params.opacity_step).max(0.0);
        }

        self.ticks += 1;
        TickOutcome::Running
    }

    fn integrate(&mut self) {
        let gravity = self.params.gravity;
        let mut skipped = 0usize;

        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            if !velocity.is_finite() {
                skipped += 1;
                continue;
            }
            velocity.y -= gravity;
            *position += *velocity;
        }

        if skipped > 0 && !self.warned_non_finite {
            self.warned_non_finite = true;
            warn!(skipped, "skipping stars with non-finite velocity");
        }
    }

    fn sample_trail(&mut self) {
        let Some(trail) = self.trail.as_mut() else {
            return;
        };
        let interval = u64::from(trail.params.sample_interval.max(1));
        if self.ticks % interval != 0 {
            return;
        }

        match trail.params.source {
            TrailSource::AllParticles => {
                for position in &self.positions {
                    let sample = trail.jitter.apply(*position);
                    trail.buffer.push(sample);
                }
            },
            TrailSource::Representative(index) => {
                if let Some(position) = self.positions.get(index) {
                    let sample = trail.jitter.apply(*position);
                    trail.buffer.push(sample);
                }
            },
        }
    }

    /// Hands the stars (and sparkle trail, if any) to the renderer.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        if self.disposed || self.completed {
            return;
        }
        if !self.positions.is_empty() {
            surface.draw_points(&PointBatch::new(
                BatchKind::Stars,
                &self.positions,
                self.color,
                self.opacity,
                self.params.point_size,
            ));
        }
        if let Some(trail) = &self.trail {
            if !trail.buffer.is_empty() {
                surface.draw_points(&PointBatch::from_slices(
                    BatchKind::SparkleTrail,
                    trail.buffer.as_slices(),
                    self.color,
                    self.opacity,
                    self.params.point_size,
                ));
            }
        }
    }

    /// Frees star and trail storage. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.positions = Vec::new();
        self.velocities = Vec::new();
        if let Some(trail) = self.trail.as_mut() {
            trail.buffer.release();
        }
        self.disposed = true;
        debug!("burst disposed");
    }

    /// Number of stars.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Star `index`, if it exists.
    #[must_use]
    pub fn particle(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            velocity: *self.velocities.get(index)?,
        })
    }

    /// Iterates all stars.
    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        self.positions
            .iter()
            .zip(&self.velocities)
            .map(|(position, velocity)| Particle {
                position: *position,
                velocity: *velocity,
            })
    }

    /// Star positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Material opacity.
    #[must_use]
    pub const fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Material color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Burst center.
    #[must_use]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Size factor.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Tunables.
    #[must_use]
    pub const fn params(&self) -> &BurstParams {
        &self.params
    }

    /// Seconds since activation.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Sparkle trail, if configured.
    #[must_use]
    pub fn trail(&self) -> Option<&TrailBuffer> {
        self.trail.as_ref().map(|trail| &trail.buffer)
    }

    /// Whether completion has been reported.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether buffers have been released.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[cfg(test)]
    fn poison_velocity(&mut self, index: usize) {
        self.velocities[index] = Vec3::splat(f32::NAN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::VertexBuffer;
    use crate::shape::PixelGrid;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn peony(size: f32) -> BurstSimulator {
        let shape = BurstShape::spherical(20).expect("valid shape");
        BurstSimulator::new(&shape, Vec3::new(0.0, 10.0, 0.0), Color::WHITE, size, BurstParams::spherical())
            .expect("valid burst")
    }

    #[test]
    fn test_initial_speed_matches_size() {
        let burst = peony(2.0);
        assert_eq!(burst.particle_count(), 400);
        for particle in burst.particles() {
            assert!((particle.velocity.length() - 2.0 * BASE_SPEED).abs() < 1e-5);
        }
    }

    #[test]
    fn test_single_tick_integration() {
        let mut burst = peony(1.0);
        let before = burst.particle(0).expect("star 0");
        burst.update(DT);
        let after = burst.particle(0).expect("star 0");

        let expected_velocity = before.velocity - Vec3::new(0.0, 0.05, 0.0);
        assert!((after.position - (before.position + expected_velocity)).length() < 1e-5);
        assert!((after.velocity - expected_velocity * 0.98).length() < 1e-5);
        assert!((burst.opacity() - 0.995).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dt_does_not_decay() {
        let mut burst = peony(1.0);
        burst.update(0.0);
        assert_eq!(burst.opacity(), 1.0);
    }

    #[test]
    fn test_bad_dt_ignored() {
        let mut burst = peony(1.0);
        let start: Vec<Vec3> = burst.positions().to_vec();
        for dt in [f32::NAN, f32::NEG_INFINITY, -0.5] {
            assert_eq!(burst.update(dt), TickOutcome::Running);
        }
        assert_eq!(burst.elapsed(), 0.0);
        assert_eq!(burst.opacity(), 1.0);
        assert_eq!(burst.positions(), start.as_slice());

        assert_eq!(burst.update(DT), TickOutcome::Running);
        assert!(burst.positions().iter().all(|p| p.is_finite()));
        assert!(burst.opacity() < 1.0);
    }

    #[test]
    fn test_completes_once_after_lifetime() {
        let mut burst = peony(1.0);
        let mut completions = 0;
        let mut ticks = 0;
        while ticks < 400 {
            if burst.update(DT).is_completed() {
                completions += 1;
            }
            ticks += 1;
        }
        assert_eq!(completions, 1);
        assert!(burst.is_completed());
    }

    #[test]
    fn test_frozen_after_completion() {
        let mut burst = peony(1.0);
        assert_eq!(burst.update(5.0), TickOutcome::Completed);
        let snapshot: Vec<Vec3> = burst.positions().to_vec();
        assert_eq!(burst.update(DT), TickOutcome::Idle);
        assert_eq!(burst.positions(), snapshot.as_slice());
    }

    #[test]
    fn test_opacity_floors_at_zero() {
        let params = BurstParams {
            opacity_step: 0.3,
            ..BurstParams::spherical()
        };
        let shape = BurstShape::spherical(2).expect("valid");
        let mut burst = BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, 1.0, params).expect("valid");
        for _ in 0..10 {
            burst.update(DT);
        }
        assert_eq!(burst.opacity(), 0.0);
    }

    #[test]
    fn test_non_finite_velocity_is_skipped() {
        let mut burst = peony(1.0);
        burst.poison_velocity(3);
        let stuck = burst.particle(3).expect("star 3").position;
        burst.update(DT);
        assert_eq!(burst.particle(3).expect("star 3").position, stuck);
        assert!(burst.particle(4).expect("star 4").position.is_finite());
    }

    #[test]
    fn test_invalid_size_rejected() {
        let shape = BurstShape::spherical(20).expect("valid");
        for size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, size, BurstParams::spherical()),
                Err(ShapeError::InvalidSize(_))
            ));
        }
    }

    #[test]
    fn test_raster_uses_weak_gravity_and_flat_velocity() {
        let grid = PixelGrid::new(vec![vec![true, false], vec![false, true]]).expect("rectangular");
        let shape = BurstShape::raster(grid, 0.01).expect("valid");
        let params = BurstParams::for_shape(&shape);
        assert_eq!(params.gravity, 0.005);

        let mut burst = BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, 1.0, params).expect("valid");
        burst.update(DT);
        for particle in burst.particles() {
            assert_eq!(particle.position.z, 0.0);
        }
    }

    #[test]
    fn test_chrysanthemum_trail_sampling() {
        let shape = BurstShape::spherical(4).expect("valid");
        let mut burst = BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, 1.0, BurstParams::chrysanthemum())
            .expect("valid")
            .with_seed(1);

        burst.update(DT);
        assert_eq!(burst.trail().map(TrailBuffer::len), Some(16));
        burst.update(DT);
        assert_eq!(burst.trail().map(TrailBuffer::len), Some(16));
        burst.update(DT);
        assert_eq!(burst.trail().map(TrailBuffer::len), Some(32));
    }

    #[test]
    fn test_representative_trail() {
        let params = BurstParams {
            trail: Some(TrailParams {
                capacity: 3,
                sample_interval: 1,
                jitter_std_dev: 0.0,
                source: TrailSource::Representative(0),
            }),
            ..BurstParams::spherical()
        };
        let shape = BurstShape::spherical(4).expect("valid");
        let mut burst = BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, 1.0, params).expect("valid");
        for _ in 0..5 {
            burst.update(DT);
        }
        let trail = burst.trail().expect("trail configured");
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.newest(), burst.particle(0).map(|p| p.position));
    }

    #[test]
    fn test_render_batches_and_dispose() {
        let shape = BurstShape::spherical(4).expect("valid");
        let mut burst = BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, 1.0, BurstParams::chrysanthemum())
            .expect("valid");
        burst.update(DT);

        let mut surface = VertexBuffer::new();
        burst.render(&mut surface);
        assert_eq!(surface.len(), 32);

        burst.dispose();
        burst.dispose();
        assert_eq!(burst.particle_count(), 0);
        assert_eq!(burst.update(DT), TickOutcome::Idle);

        surface.clear();
        burst.render(&mut surface);
        assert!(surface.is_empty());
    }

    proptest! {
        #[test]
        fn prop_opacity_non_increasing(steps in proptest::collection::vec(0.0f32..0.1, 1..300)) {
            let shape = BurstShape::spherical(3).expect("valid");
            let mut burst = BurstSimulator::new(&shape, Vec3::ZERO, Color::WHITE, 1.0, BurstParams::spherical())
                .expect("valid");
            let mut last = burst.opacity();
            for dt in steps {
                burst.update(dt);
                prop_assert!(burst.opacity() <= last);
                prop_assert!(burst.opacity() >= 0.0);
                last = burst.opacity();
            }
        }
    }
}
