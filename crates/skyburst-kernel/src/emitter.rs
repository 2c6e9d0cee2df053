//! Launch trail emitter.
//!
//! Moves a single point at constant speed from `origin` to `target` over
//! `duration` seconds and records a sparkling trail of where it has been.
//! Once the elapsed time passes `duration` the emitter reports completion
//! exactly once and stops touching its buffers.

use glam::Vec3;
use skyburst_common::{Color, LaunchError};
use tracing::debug;

use crate::jitter::{GaussianJitter, LAUNCH_JITTER_STD_DEV};
use crate::render::{BatchKind, PointBatch, RenderSurface};
use crate::trail::{TrailBuffer, LAUNCH_TRAIL_CAPACITY};
use crate::TickOutcome;

/// Visual parameters of a launch trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterParams {
    /// Trail samples kept
    pub trail_capacity: usize,
    /// Per-axis sparkle standard deviation
    pub jitter_std_dev: f32,
    /// Point sprite size
    pub point_size: f32,
    /// Trail opacity
    pub opacity: f32,
}

impl Default for EmitterParams {
    fn default() -> Self {
        Self {
            trail_capacity: LAUNCH_TRAIL_CAPACITY,
            jitter_std_dev: LAUNCH_JITTER_STD_DEV,
            point_size: 0.5,
            opacity: 0.8,
        }
    }
}

/// Rising-phase emitter.
#[derive(Debug, Clone)]
pub struct TrailEmitter {
    /// Launch start
    origin: Vec3,
    /// Launch end (burst center)
    target: Vec3,
    /// Unit vector from origin to target
    direction: Vec3,
    /// Distance from origin to target
    distance: f32,
    /// Seconds to travel the full distance
    duration: f32,
    /// Trail color
    color: Color,
    /// Visual parameters
    params: EmitterParams,
    /// Seconds since activation
    elapsed: f32,
    /// Current head position (without jitter)
    position: Vec3,
    /// Recent jittered positions
    trail: TrailBuffer,
    /// Sparkle source
    jitter: GaussianJitter,
    /// Completion edge already reported
    finished: bool,
    /// Buffers released
    disposed: bool,
}

impl TrailEmitter {
    /// Creates an emitter with default trail parameters.
    pub fn new(origin: Vec3, target: Vec3, duration: f32, color: Color) -> Result<Self, LaunchError> {
        if !origin.is_finite() || !target.is_finite() {
            return Err(LaunchError::NonFiniteCoordinate);
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(LaunchError::InvalidDuration(duration));
        }
        let offset = target - origin;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return Err(LaunchError::DegenerateLaunch);
        }

        let params = EmitterParams::default();
        Ok(Self {
            origin,
            target,
            direction: offset / distance,
            distance,
            duration,
            color,
            params,
            elapsed: 0.0,
            position: origin,
            trail: TrailBuffer::new(params.trail_capacity),
            jitter: GaussianJitter::new(params.jitter_std_dev),
            finished: false,
            disposed: false,
        })
    }

    /// Replaces the trail parameters. Resets the (still empty) trail.
    pub fn with_params(mut self, params: EmitterParams) -> Self {
        self.trail = TrailBuffer::new(params.trail_capacity);
        self.jitter = GaussianJitter::new(params.jitter_std_dev);
        self.params = params;
        self
    }

    /// Makes the sparkle deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.jitter = GaussianJitter::with_seed(self.params.jitter_std_dev, seed);
        self
    }

    /// Head position at `t` seconds after activation, ignoring jitter.
    #[must_use]
    pub fn position_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * (t / self.duration) * self.distance
    }

    /// Advances by `dt` seconds.
    ///
    /// A negative or non-finite `dt` is ignored.
    pub fn update(&mut self, dt: f32) -> TickOutcome {
        if self.finished || self.disposed {
            return TickOutcome::Idle;
        }
        if !dt.is_finite() || dt < 0.0 {
            return TickOutcome::Running;
        }

        self.elapsed += dt;
        if self.elapsed > self.duration {
            self.finished = true;
            debug!(elapsed = self.elapsed, "launch complete");
            return TickOutcome::Completed;
        }

        self.position = self.position_at(self.elapsed);
        let sample = self.jitter.apply(self.position);
        self.trail.push(sample);
        TickOutcome::Running
    }

    /// Hands the current trail to the renderer.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        if self.disposed || self.trail.is_empty() {
            return;
        }
        surface.draw_points(&PointBatch::from_slices(
            BatchKind::LaunchTrail,
            self.trail.as_slices(),
            self.color,
            self.params.opacity,
            self.params.point_size,
        ));
    }

    /// Frees the trail storage. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.trail.release();
        self.disposed = true;
        debug!("launch emitter disposed");
    }

    /// Launch start.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Launch end.
    #[must_use]
    pub const fn target(&self) -> Vec3 {
        self.target
    }

    /// Launch duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds since activation.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current head position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Current trail.
    #[must_use]
    pub const fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// Whether completion has been reported.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether buffers have been released.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::VertexBuffer;

    fn straight_up() -> TrailEmitter {
        TrailEmitter::new(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 2.0, Color::WHITE)
            .expect("valid launch")
            .with_seed(3)
    }

    #[test]
    fn test_interpolates_linearly() {
        let mut emitter = straight_up();
        assert_eq!(emitter.update(1.0), TickOutcome::Running);
        assert!((emitter.position() - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
        assert!((emitter.position_at(0.5) - Vec3::new(0.0, 2.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_completion_fires_once() {
        let mut emitter = straight_up();
        emitter.update(1.0);
        assert_eq!(emitter.update(1.01), TickOutcome::Completed);
        assert!(emitter.is_finished());
        assert_eq!(emitter.update(0.5), TickOutcome::Idle);
        assert_eq!(emitter.update(0.5), TickOutcome::Idle);
    }

    #[test]
    fn test_exact_duration_is_not_complete() {
        let mut emitter = straight_up();
        assert_eq!(emitter.update(2.0), TickOutcome::Running);
        assert_eq!(emitter.update(0.001), TickOutcome::Completed);
    }

    #[test]
    fn test_trail_bounded_and_jittered() {
        let mut emitter = straight_up();
        for _ in 0..100 {
            emitter.update(0.01);
        }
        assert_eq!(emitter.trail().len(), LAUNCH_TRAIL_CAPACITY);
        let newest = emitter.trail().newest().expect("trail has samples");
        assert_ne!(newest, emitter.position());
        assert!((newest - emitter.position()).length() < 1.0);
    }

    #[test]
    fn test_no_mutation_after_completion() {
        let mut emitter = straight_up();
        emitter.update(2.5);
        let before = emitter.trail().len();
        emitter.update(0.1);
        assert_eq!(emitter.trail().len(), before);
    }

    #[test]
    fn test_bad_dt_ignored() {
        let mut emitter = straight_up();
        assert_eq!(emitter.update(f32::NAN), TickOutcome::Running);
        assert_eq!(emitter.update(-1.0), TickOutcome::Running);
        assert_eq!(emitter.update(f32::INFINITY), TickOutcome::Running);
        assert_eq!(emitter.elapsed(), 0.0);
        assert!(emitter.trail().is_empty());

        assert_eq!(emitter.update(1.0), TickOutcome::Running);
        assert!((emitter.position() - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
        assert_eq!(emitter.update(1.5), TickOutcome::Completed);
        assert!(emitter.trail().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            TrailEmitter::new(Vec3::ZERO, Vec3::Y, 0.0, Color::WHITE).err(),
            Some(LaunchError::InvalidDuration(0.0))
        );
        assert_eq!(
            TrailEmitter::new(Vec3::ONE, Vec3::ONE, 1.0, Color::WHITE).err(),
            Some(LaunchError::DegenerateLaunch)
        );
        assert_eq!(
            TrailEmitter::new(Vec3::splat(f32::NAN), Vec3::ONE, 1.0, Color::WHITE).err(),
            Some(LaunchError::NonFiniteCoordinate)
        );
    }

    #[test]
    fn test_render_and_dispose() {
        let mut emitter = straight_up();
        emitter.update(0.1);
        emitter.update(0.1);

        let mut surface = VertexBuffer::new();
        emitter.render(&mut surface);
        assert_eq!(surface.len(), 2);
        assert_eq!(surface.vertices()[0].color[3], 0.8);

        emitter.dispose();
        emitter.dispose();
        assert!(emitter.trail().is_empty());
        assert_eq!(emitter.update(0.1), TickOutcome::Idle);

        surface.clear();
        emitter.render(&mut surface);
        assert!(surface.is_empty());
    }
}
